//! Query Builder
//!
//! Fluent API for the initial query state of a grid.

use dg_core::pagination::Pagination;

use crate::columns::ColumnSet;
use crate::filters::{FilterCriterion, FilterOperator, FilterSet};
use crate::query::QueryState;
use crate::sorts::{SortCriterion, SortDirection};

/// Builder for constructing query states fluently
#[derive(Debug, Default)]
pub struct QueryBuilder {
    filters: FilterSet,
    sort: Option<SortCriterion>,
    page_index: usize,
    page_size: Option<usize>,
}

impl QueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    // Filter methods

    /// Add a raw filter criterion
    pub fn filter(mut self, criterion: FilterCriterion) -> Self {
        self.filters.add(criterion);
        self
    }

    /// Add a filter from its parts
    pub fn where_field(
        self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        self.filter(FilterCriterion::new(field, operator, value))
    }

    pub fn equals(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::Equals, value)
    }

    pub fn not_equals(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::NotEquals, value)
    }

    pub fn contains(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::Contains, value)
    }

    pub fn starts_with(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::StartsWith, value)
    }

    pub fn ends_with(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::EndsWith, value)
    }

    pub fn greater_than(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::GreaterThan, value)
    }

    pub fn less_than(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_field(field, FilterOperator::LessThan, value)
    }

    /// Inclusive range, as two criteria on the same field
    pub fn between(
        self,
        field: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let field = field.into();
        self.where_field(field.clone(), FilterOperator::GreaterThanOrEqual, from)
            .where_field(field, FilterOperator::LessThanOrEqual, to)
    }

    // Sort methods

    /// Sort by a field; replaces any earlier sort
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortCriterion::new(field, direction));
        self
    }

    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort_by(field, SortDirection::Asc)
    }

    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort_by(field, SortDirection::Desc)
    }

    // Pagination

    /// 0-based page index
    pub fn page(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Build the query state
    pub fn build(self) -> QueryState {
        let limit = self.page_size.unwrap_or_default();
        QueryState::new()
            .with_filters(self.filters)
            .with_pagination(Pagination::at_page(self.page_index, limit))
            .with_sort_option(self.sort)
    }

    /// Build the query state, dropping anything `columns` does not declare
    pub fn build_for<R>(self, columns: &ColumnSet<R>) -> QueryState {
        self.build().restricted_to(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Column;

    #[test]
    fn test_builder_defaults() {
        let query = QueryBuilder::new().build();
        assert_eq!(query, QueryState::new());
    }

    #[test]
    fn test_builder_with_filters() {
        let query = QueryBuilder::new()
            .contains("name", "jo")
            .greater_than("age", "25")
            .between("joinDate", "2023-01-01", "2023-03-31")
            .build();

        assert_eq!(query.filters.len(), 4);
        assert_eq!(query.filters_for("joinDate").len(), 2);
    }

    #[test]
    fn test_builder_sort_replaces() {
        let query = QueryBuilder::new().sort_asc("name").sort_desc("age").build();
        assert_eq!(query.sort, Some(SortCriterion::desc("age")));
    }

    #[test]
    fn test_builder_pagination() {
        let query = QueryBuilder::new().page_size(25).page(2).build();
        assert_eq!(query.limit, 25);
        assert_eq!(query.offset, 50);
    }

    #[test]
    fn test_build_for_drops_undeclared() {
        let columns: ColumnSet<(String, u32)> = ColumnSet::new()
            .with(Column::string("name", "Name", |r: &(String, u32)| r.0.clone()))
            .with(Column::number("age", "Age", |r: &(String, u32)| r.1.to_string()));

        let query = QueryBuilder::new()
            .contains("name", "jo")
            .contains("age", "3")
            .equals("email", "x@example.com")
            .sort_asc("email")
            .build_for(&columns);

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters.criteria()[0].field, "name");
        assert!(query.sort.is_none());
    }
}
