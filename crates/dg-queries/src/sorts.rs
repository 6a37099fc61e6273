//! Query Sort Order
//!
//! A grid sorts by at most one column at a time.

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    /// Parse from a query string token
    pub fn from_token(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// The active sort: one field and its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    /// The column to sort by
    pub field: String,
    #[serde(rename = "dir")]
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Reverse the sort direction
    pub fn reversed(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }

    /// Sort criterion after the user clicks `field`'s sort toggle.
    ///
    /// Clicking the active column flips its direction; any other column
    /// replaces the active sort in ascending order.
    pub fn toggled(current: Option<&SortCriterion>, field: &str) -> SortCriterion {
        match current {
            Some(active) if active.field == field => active.clone().reversed(),
            _ => SortCriterion::asc(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::from_token("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::from_token("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_token("up"), None);
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.reverse(), SortDirection::Asc);
    }

    #[test]
    fn test_sort_criterion() {
        let criterion = SortCriterion::asc("joinDate");
        assert_eq!(criterion.field, "joinDate");
        assert_eq!(criterion.direction, SortDirection::Asc);

        let reversed = criterion.reversed();
        assert_eq!(reversed.direction, SortDirection::Desc);
    }

    #[test]
    fn test_toggled_same_field_flips() {
        let active = SortCriterion::asc("name");
        assert_eq!(SortCriterion::toggled(Some(&active), "name"), SortCriterion::desc("name"));
        let active = SortCriterion::desc("name");
        assert_eq!(SortCriterion::toggled(Some(&active), "name"), SortCriterion::asc("name"));
    }

    #[test]
    fn test_toggled_other_field_starts_ascending() {
        let active = SortCriterion::desc("name");
        assert_eq!(SortCriterion::toggled(Some(&active), "age"), SortCriterion::asc("age"));
        assert_eq!(SortCriterion::toggled(None, "age"), SortCriterion::asc("age"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(SortCriterion::desc("age")).unwrap();
        assert_eq!(json, serde_json::json!({"field": "age", "dir": "desc"}));
    }
}
