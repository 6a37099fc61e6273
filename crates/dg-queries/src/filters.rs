//! Query Filters
//!
//! A filter criterion is one (field, operator, value) condition on a column.
//! All criteria in a set combine with AND, including several criteria on the
//! same field.


use serde::{Deserialize, Serialize};

use crate::columns::ColumnType;

/// Filter operators that can be applied to a column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals (eq)
    #[serde(rename = "eq")]
    Equals,
    /// Not equals (ne)
    #[serde(rename = "ne")]
    NotEquals,
    /// Substring match (contains)
    #[serde(rename = "contains")]
    Contains,
    /// Prefix match (startswith)
    #[serde(rename = "startswith")]
    StartsWith,
    /// Suffix match (endswith)
    #[serde(rename = "endswith")]
    EndsWith,
    /// Less than (lt)
    #[serde(rename = "lt")]
    LessThan,
    /// Less than or equal (lte)
    #[serde(rename = "lte")]
    LessThanOrEqual,
    /// Greater than (gt)
    #[serde(rename = "gt")]
    GreaterThan,
    /// Greater than or equal (gte)
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
}

impl FilterOperator {
    /// Every operator, in menu order
    pub const ALL: [FilterOperator; 9] = [
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
    ];

    /// Parse operator from its query string token
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Equals),
            "ne" => Some(Self::NotEquals),
            "contains" => Some(Self::Contains),
            "startswith" => Some(Self::StartsWith),
            "endswith" => Some(Self::EndsWith),
            "lt" => Some(Self::LessThan),
            "lte" => Some(Self::LessThanOrEqual),
            "gt" => Some(Self::GreaterThan),
            "gte" => Some(Self::GreaterThanOrEqual),
            _ => None,
        }
    }

    /// Query string token
    pub fn token(&self) -> &'static str {
        match self {
            Self::Equals => "eq",
            Self::NotEquals => "ne",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
        }
    }

    /// Human-readable label for a column of the given type.
    ///
    /// Date columns read the ordering operators as before/after.
    pub fn label(&self, column_type: ColumnType) -> &'static str {
        match (self, column_type) {
            (Self::Equals, _) => "Equals",
            (Self::NotEquals, _) => "Not Equals",
            (Self::Contains, _) => "Contains",
            (Self::StartsWith, _) => "Starts With",
            (Self::EndsWith, _) => "Ends With",
            (Self::LessThan, ColumnType::Date) => "Before",
            (Self::LessThanOrEqual, ColumnType::Date) => "Before or On",
            (Self::GreaterThan, ColumnType::Date) => "After",
            (Self::GreaterThanOrEqual, ColumnType::Date) => "After or On",
            (Self::LessThan, _) => "Less Than",
            (Self::LessThanOrEqual, _) => "Less Than or Equal",
            (Self::GreaterThan, _) => "Greater Than",
            (Self::GreaterThanOrEqual, _) => "Greater Than or Equal",
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// The column being filtered
    pub field: String,
    /// The operator to apply
    #[serde(rename = "type")]
    pub operator: FilterOperator,
    /// Raw value as typed by the user
    pub value: String,
}

impl FilterCriterion {
    /// Create a new filter criterion
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create an equals criterion
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Equals, value)
    }

    /// Create a contains criterion
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Contains, value)
    }

    /// Create a greater-than criterion
    pub fn greater_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value)
    }

    /// Create a less-than criterion
    pub fn less_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }

    /// A criterion needs a field and a non-empty value
    pub fn is_valid(&self) -> bool {
        !self.field.is_empty() && !self.value.is_empty()
    }

    /// Operator/value pair without the field
    pub fn condition(&self) -> FilterCondition {
        FilterCondition {
            operator: self.operator,
            value: self.value.clone(),
        }
    }
}

/// An operator/value pair not yet bound to a field.
///
/// This is what the filter editor collects before it is committed for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(rename = "type")]
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterCondition {
    pub fn new(operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    /// Bind this condition to a field
    pub fn bind(self, field: impl Into<String>) -> FilterCriterion {
        FilterCriterion {
            field: field.into(),
            operator: self.operator,
            value: self.value,
        }
    }
}

/// Filter set - an ordered collection of criteria with AND semantics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    criteria: Vec<FilterCriterion>,
}

impl FilterSet {
    /// Create a new empty filter set
    pub fn new() -> Self {
        Self { criteria: vec![] }
    }

    /// Add a criterion to the set
    pub fn add(&mut self, criterion: FilterCriterion) -> &mut Self {
        self.criteria.push(criterion);
        self
    }

    /// Add a criterion and return self (builder pattern)
    pub fn with(mut self, criterion: FilterCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// All criteria in insertion order
    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Criteria for one field, in the order they were added
    pub fn for_field(&self, field: &str) -> Vec<&FilterCriterion> {
        self.criteria.iter().filter(|c| c.field == field).collect()
    }

    /// Operator/value pairs for one field
    pub fn conditions_for(&self, field: &str) -> Vec<FilterCondition> {
        self.criteria
            .iter()
            .filter(|c| c.field == field)
            .map(FilterCriterion::condition)
            .collect()
    }

    /// Check if a specific field is being filtered
    pub fn has_filter_for(&self, field: &str) -> bool {
        self.criteria.iter().any(|c| c.field == field)
    }

    /// Drop every criterion for `field` and append `conditions` bound to it.
    ///
    /// Criteria for other fields keep their relative order.
    pub fn replace_for(&mut self, field: &str, conditions: Vec<FilterCondition>) {
        self.criteria.retain(|c| c.field != field);
        self.criteria
            .extend(conditions.into_iter().map(|condition| condition.bind(field)));
    }

    /// Remove the `index`-th criterion among those for `field`.
    ///
    /// Returns the removed criterion, or `None` when the index is out of range.
    pub fn remove_for_at(&mut self, field: &str, index: usize) -> Option<FilterCriterion> {
        let position = self
            .criteria
            .iter()
            .enumerate()
            .filter(|(_, c)| c.field == field)
            .nth(index)
            .map(|(position, _)| position)?;
        Some(self.criteria.remove(position))
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }
}

impl FromIterator<FilterCriterion> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterCriterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterSet {
        FilterSet::new()
            .with(FilterCriterion::greater_than("age", "25"))
            .with(FilterCriterion::contains("name", "jo"))
            .with(FilterCriterion::less_than("age", "40"))
            .with(FilterCriterion::equals("role", "Admin"))
    }

    #[test]
    fn test_operator_tokens() {
        for op in FilterOperator::ALL {
            assert_eq!(FilterOperator::from_token(op.token()), Some(op));
        }
        assert_eq!(FilterOperator::from_token("like"), None);
        assert_eq!(FilterOperator::GreaterThan.to_string(), "gt");
    }

    #[test]
    fn test_operator_labels_depend_on_type() {
        assert_eq!(FilterOperator::LessThan.label(ColumnType::Number), "Less Than");
        assert_eq!(FilterOperator::LessThan.label(ColumnType::Date), "Before");
        assert_eq!(
            FilterOperator::GreaterThanOrEqual.label(ColumnType::Date),
            "After or On"
        );
        assert_eq!(FilterOperator::StartsWith.label(ColumnType::String), "Starts With");
    }

    #[test]
    fn test_criterion_json_shape() {
        let json = serde_json::to_value(FilterCriterion::greater_than("age", "25")).unwrap();
        assert_eq!(json, serde_json::json!({"field": "age", "type": "gt", "value": "25"}));
    }

    #[test]
    fn test_for_field_keeps_order() {
        let set = sample();
        let ages: Vec<_> = set.for_field("age").iter().map(|c| c.value.as_str()).collect();
        assert_eq!(ages, vec!["25", "40"]);
        assert!(set.has_filter_for("role"));
        assert!(!set.has_filter_for("email"));
    }

    #[test]
    fn test_replace_for_leaves_other_fields() {
        let mut set = sample();
        set.replace_for(
            "age",
            vec![FilterCondition::new(FilterOperator::Equals, "30")],
        );

        assert_eq!(set.len(), 3);
        assert_eq!(set.criteria()[0], FilterCriterion::contains("name", "jo"));
        assert_eq!(set.criteria()[1], FilterCriterion::equals("role", "Admin"));
        assert_eq!(set.criteria()[2], FilterCriterion::equals("age", "30"));
    }

    #[test]
    fn test_replace_with_empty_removes_field() {
        let mut set = sample();
        set.replace_for("age", vec![]);
        assert!(!set.has_filter_for("age"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_for_at_uses_per_field_index() {
        let mut set = sample();
        let removed = set.remove_for_at("age", 1).unwrap();
        assert_eq!(removed, FilterCriterion::less_than("age", "40"));
        assert_eq!(set.len(), 3);
        assert_eq!(set.for_field("age").len(), 1);
    }

    #[test]
    fn test_remove_for_at_out_of_range() {
        let mut set = sample();
        assert!(set.remove_for_at("age", 2).is_none());
        assert!(set.remove_for_at("email", 0).is_none());
        assert_eq!(set, sample());
    }

    #[test]
    fn test_criterion_validity() {
        assert!(FilterCriterion::equals("name", "John").is_valid());
        assert!(!FilterCriterion::equals("name", "").is_valid());
        assert!(!FilterCriterion::equals("", "John").is_valid());
    }
}
