//! Edit commands given on the command line

use std::str::FromStr;

use dg_core::error::GridResult;
use dg_grid::{DataSource, FetchOutcome, GridController};
use dg_queries::{FilterOperator, QueryEvent};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Expected {expected} in command: {command}")]
    Malformed {
        command: String,
        expected: &'static str,
    },
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// One grid edit, written as `kind:args`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCommand {
    /// `sort:<field>`
    Sort(String),
    /// `filter:<field>:<op>:<value>`
    Filter {
        field: String,
        operator: FilterOperator,
        value: String,
    },
    /// `remove:<field>:<index>`
    Remove { field: String, index: usize },
    /// `clear`
    Clear,
    /// `page:<n>`, 1-based
    Page(usize),
    /// `size:<n>`
    Size(usize),
}

fn parse_number(s: &str) -> Result<usize, CommandError> {
    s.parse()
        .map_err(|_| CommandError::InvalidNumber(s.to_string()))
}

impl FromStr for GridCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |expected| CommandError::Malformed {
            command: s.to_string(),
            expected,
        };
        let (kind, args) = s.split_once(':').unwrap_or((s, ""));

        match kind {
            "sort" if !args.is_empty() => Ok(Self::Sort(args.to_string())),
            "sort" => Err(malformed("a field")),
            "filter" => {
                let mut parts = args.splitn(3, ':');
                let (Some(field), Some(op), Some(value)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    return Err(malformed("field, operator and value"));
                };
                let operator = FilterOperator::from_token(op)
                    .ok_or_else(|| CommandError::UnknownOperator(op.to_string()))?;
                Ok(Self::Filter {
                    field: field.to_string(),
                    operator,
                    value: value.to_string(),
                })
            }
            "remove" => {
                let (field, index) = args
                    .split_once(':')
                    .ok_or_else(|| malformed("field and index"))?;
                Ok(Self::Remove {
                    field: field.to_string(),
                    index: parse_number(index)?,
                })
            }
            "clear" => Ok(Self::Clear),
            "page" => match parse_number(args)? {
                0 => Err(malformed("a page number starting at 1")),
                n => Ok(Self::Page(n)),
            },
            "size" => Ok(Self::Size(parse_number(args)?)),
            _ => Err(CommandError::Unknown(s.to_string())),
        }
    }
}

impl GridCommand {
    /// Apply this command to a grid.
    ///
    /// Filters go through the column's filter editor, adding one criterion
    /// next to the ones already committed for that field.
    pub async fn run<R, S>(&self, grid: &GridController<R, S>) -> GridResult<FetchOutcome>
    where
        R: Send + Sync + 'static,
        S: DataSource<R>,
    {
        match self {
            Self::Sort(field) => grid.dispatch(QueryEvent::set_sort(field)).await,
            Self::Filter {
                field,
                operator,
                value,
            } => {
                if !grid.columns().allows(field, *operator) {
                    debug!(%field, %operator, "Skipping filter the column does not offer");
                    return Ok(FetchOutcome::Skipped);
                }
                if !grid.open_filter_editor(field) {
                    return Ok(FetchOutcome::Skipped);
                }
                grid.edit_filter_editor(|editor| {
                    editor.set_draft_operator(*operator);
                    editor.set_draft_value(value.clone());
                    editor.add_draft()
                });
                grid.apply_filter_editor().await
            }
            Self::Remove { field, index } => {
                grid.dispatch(QueryEvent::remove_filter(field, *index)).await
            }
            Self::Clear => grid.dispatch(QueryEvent::ClearFilters).await,
            Self::Page(number) => grid.dispatch(QueryEvent::set_page(number - 1)).await,
            Self::Size(limit) => grid.dispatch(QueryEvent::set_page_size(*limit)).await,
        }
    }
}
