//! Query State
//!
//! The full set of active filters, the optional sort, and pagination. A grid
//! holds exactly one of these; every edit replaces it with a new value.

use dg_core::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::columns::ColumnSet;
use crate::filters::{FilterCriterion, FilterSet};
use crate::sorts::{SortCriterion, SortDirection};

/// Filters, sort, and pagination of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    /// Filter criteria, ANDed, in the order they were committed
    #[serde(rename = "filter", default)]
    pub filters: FilterSet,
    /// At most one active sort
    #[serde(rename = "order", default, with = "order_list")]
    pub sort: Option<SortCriterion>,
    /// Rows skipped before the current page
    #[serde(default)]
    pub offset: usize,
    /// Rows per page, always positive
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    /// Empty query on the first page with the default page size
    pub fn new() -> Self {
        Self {
            filters: FilterSet::new(),
            sort: None,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }

    /// Empty query with a given page size. Zero falls back to the default.
    pub fn with_page_size(limit: usize) -> Self {
        Self {
            limit: Pagination::new(0, limit).limit,
            ..Self::new()
        }
    }

    /// Add a filter criterion
    pub fn with_filter(mut self, criterion: FilterCriterion) -> Self {
        self.filters.add(criterion);
        self
    }

    /// Set the filters
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Set the sort
    pub fn with_sort(mut self, sort: SortCriterion) -> Self {
        self.sort = Some(sort);
        self
    }

    pub(crate) fn with_sort_option(mut self, sort: Option<SortCriterion>) -> Self {
        self.sort = sort;
        self
    }

    /// Set raw offset and limit
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.offset = pagination.offset;
        self.limit = pagination.limit;
        self
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.offset, self.limit)
    }

    /// 0-based page index
    pub fn page_index(&self) -> usize {
        self.pagination().page_index()
    }

    /// 1-based page number
    pub fn page_number(&self) -> usize {
        self.pagination().page_number()
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Direction of the sort if `field` is the active sort column
    pub fn sort_direction_for(&self, field: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|s| s.field == field)
            .map(|s| s.direction)
    }

    /// Criteria committed for one field
    pub fn filters_for(&self, field: &str) -> Vec<&FilterCriterion> {
        self.filters.for_field(field)
    }

    /// Copy of this state without filters or sort the columns cannot accept.
    ///
    /// Criteria without a value, on undeclared fields, or with an operator the
    /// column type does not offer are dropped. So is a sort on an undeclared
    /// field.
    pub fn restricted_to<R>(&self, columns: &ColumnSet<R>) -> QueryState {
        let filters: FilterSet = self
            .filters
            .criteria()
            .iter()
            .filter(|c| {
                let allowed = c.is_valid() && columns.allows(&c.field, c.operator);
                if !allowed {
                    tracing::debug!(
                        field = %c.field,
                        operator = %c.operator,
                        "Dropping undeclared filter"
                    );
                }
                allowed
            })
            .cloned()
            .collect();

        let sort = self
            .sort
            .clone()
            .filter(|s| columns.has_column(&s.field));

        QueryState {
            filters,
            sort,
            offset: self.offset,
            limit: self.pagination().limit,
        }
    }

    /// JSON object handed to data sources: `{filter, order, offset, limit}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "filter": self.filters,
            "order": self.sort.iter().collect::<Vec<_>>(),
            "offset": self.offset,
            "limit": self.limit,
        })
    }
}

/// (De)serializes the single optional sort as a list of order entries
mod order_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::sorts::SortCriterion;

    pub fn serialize<S>(sort: &Option<SortCriterion>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let list: Vec<&SortCriterion> = sort.iter().collect();
        list.serialize(serializer)
    }

    /// Only the first entry survives; a grid sorts by one column at a time.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SortCriterion>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<SortCriterion>::deserialize(deserializer)?;
        Ok(list.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Column;

    #[test]
    fn test_query_creation() {
        let query = QueryState::new();
        assert!(!query.has_filters());
        assert!(query.sort.is_none());
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 10);
        assert_eq!(query.page_number(), 1);
    }

    #[test]
    fn test_page_index_from_offset() {
        let query = QueryState::new().with_pagination(Pagination::new(20, 10));
        assert_eq!(query.page_index(), 2);
    }

    #[test]
    fn test_with_page_size_zero() {
        assert_eq!(QueryState::with_page_size(0).limit, 10);
        assert_eq!(QueryState::with_page_size(25).limit, 25);
    }

    #[test]
    fn test_sort_direction_for() {
        let query = QueryState::new().with_sort(SortCriterion::desc("name"));
        assert_eq!(query.sort_direction_for("name"), Some(SortDirection::Desc));
        assert_eq!(query.sort_direction_for("age"), None);
    }

    #[test]
    fn test_json_shape() {
        let query = QueryState::new()
            .with_filter(FilterCriterion::greater_than("age", "25"))
            .with_sort(SortCriterion::asc("name"));

        let json = query.to_json();
        assert_eq!(
            json,
            serde_json::json!({
                "filter": [{"field": "age", "type": "gt", "value": "25"}],
                "order": [{"field": "name", "dir": "asc"}],
                "offset": 0,
                "limit": 10,
            })
        );
        assert_eq!(serde_json::to_value(&query).unwrap(), json);
    }

    #[test]
    fn test_restricted_to_drops_empty_values() {
        let columns: ColumnSet<u32> =
            ColumnSet::new().with(Column::number("age", "Age", |n: &u32| n.to_string()));
        let query = QueryState::new()
            .with_filter(FilterCriterion::greater_than("age", ""))
            .with_filter(FilterCriterion::less_than("age", "40"));

        let restricted = query.restricted_to(&columns);
        assert_eq!(restricted.filters.len(), 1);
        assert_eq!(restricted.filters.criteria()[0], FilterCriterion::less_than("age", "40"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"order": [{"field": "age", "dir": "desc"}, {"field": "name", "dir": "asc"}]}"#;
        let query: QueryState = serde_json::from_str(json).unwrap();
        assert_eq!(query.sort, Some(SortCriterion::desc("age")));
        assert_eq!(query.limit, 10);
        assert!(query.filters.is_empty());
    }
}
