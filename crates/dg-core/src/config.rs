//! Configuration types and loading

use serde::{Deserialize, Serialize};

use crate::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};

/// Grid configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page on mount
    pub page_size: usize,
    /// Page sizes offered by the pagination control
    pub page_size_options: Vec<usize>,
    /// Drop responses that resolve after a newer request was applied
    pub fence_responses: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            fence_responses: true,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl GridConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(size) = lookup("DATAGRID_PAGE_SIZE") {
            config.page_size = parse_page_size("DATAGRID_PAGE_SIZE", &size)?;
        }

        if let Some(options) = lookup("DATAGRID_PAGE_SIZE_OPTIONS") {
            config.page_size_options = options
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| parse_page_size("DATAGRID_PAGE_SIZE_OPTIONS", part))
                .collect::<Result<Vec<_>, _>>()?;
        }

        if let Some(fence) = lookup("DATAGRID_FENCE_RESPONSES") {
            config.fence_responses = parse_bool("DATAGRID_FENCE_RESPONSES", &fence)?;
        }

        if !config.page_size_options.contains(&config.page_size) {
            config.page_size_options.push(config.page_size);
            config.page_size_options.sort_unstable();
        }

        tracing::debug!(
            page_size = config.page_size,
            options = ?config.page_size_options,
            fence_responses = config.fence_responses,
            "Loaded grid configuration"
        );

        Ok(config)
    }
}

fn parse_page_size(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "page size must be positive".to_string(),
        }),
        Ok(size) => Ok(size),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {:?}", other),
        }),
    }
}
