//! Query State Reducer
//!
//! Every user edit is a [`QueryEvent`]. [`reduce`] takes the full prior state
//! and one event and returns the full next state; the prior state is never
//! touched. Malformed events (out of range index, zero page size) return an
//! unchanged copy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filters::FilterCondition;
use crate::query::QueryState;
use crate::sorts::SortCriterion;

/// A discrete edit to a [`QueryState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryEvent {
    /// Sort toggle clicked on a column header
    SetSort { field: String },
    /// Filter editor applied for a column
    ReplaceFilters {
        field: String,
        conditions: Vec<FilterCondition>,
    },
    /// Chip deleted under a column header; `index` counts only that field's criteria
    RemoveFilter { field: String, index: usize },
    /// 0-based page index selected
    SetPage { page_index: usize },
    /// Rows-per-page changed
    SetPageSize { limit: usize },
    /// Drop every filter
    ClearFilters,
    /// Drop the active sort
    ClearSort,
}

impl QueryEvent {
    pub fn set_sort(field: impl Into<String>) -> Self {
        Self::SetSort {
            field: field.into(),
        }
    }

    pub fn replace_filters(field: impl Into<String>, conditions: Vec<FilterCondition>) -> Self {
        Self::ReplaceFilters {
            field: field.into(),
            conditions,
        }
    }

    pub fn remove_filter(field: impl Into<String>, index: usize) -> Self {
        Self::RemoveFilter {
            field: field.into(),
            index,
        }
    }

    pub fn set_page(page_index: usize) -> Self {
        Self::SetPage { page_index }
    }

    pub fn set_page_size(limit: usize) -> Self {
        Self::SetPageSize { limit }
    }

    /// The column this event targets, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SetSort { field }
            | Self::ReplaceFilters { field, .. }
            | Self::RemoveFilter { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Produce the state that follows `state` after `event`
pub fn reduce(state: &QueryState, event: QueryEvent) -> QueryState {
    let mut next = state.clone();

    match event {
        QueryEvent::SetSort { field } => {
            next.sort = Some(SortCriterion::toggled(state.sort.as_ref(), &field));
        }
        QueryEvent::ReplaceFilters { field, conditions } => {
            next.filters.replace_for(&field, conditions);
        }
        QueryEvent::RemoveFilter { field, index } => {
            if next.filters.remove_for_at(&field, index).is_none() {
                debug!(%field, index, "Ignoring removal of missing filter");
            }
        }
        QueryEvent::SetPage { page_index } => {
            let pagination = state.pagination().with_page(page_index);
            next.offset = pagination.offset;
            next.limit = pagination.limit;
        }
        QueryEvent::SetPageSize { limit } => {
            if limit == 0 {
                debug!("Ignoring zero page size");
            } else {
                let pagination = state.pagination().with_limit(limit);
                next.offset = pagination.offset;
                next.limit = pagination.limit;
            }
        }
        QueryEvent::ClearFilters => next.filters.clear(),
        QueryEvent::ClearSort => next.sort = None,
    }

    next
}

impl QueryState {
    /// Shorthand for [`reduce`]
    pub fn apply(&self, event: QueryEvent) -> QueryState {
        reduce(self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterCriterion, FilterOperator};
    use crate::sorts::SortDirection;
    use dg_core::pagination::Pagination;

    fn filtered() -> QueryState {
        QueryState::new()
            .with_filter(FilterCriterion::greater_than("age", "25"))
            .with_filter(FilterCriterion::contains("name", "jo"))
            .with_filter(FilterCriterion::less_than("age", "40"))
    }

    #[test]
    fn test_set_sort_toggles_direction() {
        let first = QueryState::new().apply(QueryEvent::set_sort("name"));
        assert_eq!(first.sort_direction_for("name"), Some(SortDirection::Asc));

        let second = first.apply(QueryEvent::set_sort("name"));
        assert_eq!(second.sort_direction_for("name"), Some(SortDirection::Desc));

        let third = second.apply(QueryEvent::set_sort("name"));
        assert_eq!(third.sort_direction_for("name"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_set_sort_other_field_replaces() {
        let state = QueryState::new()
            .apply(QueryEvent::set_sort("name"))
            .apply(QueryEvent::set_sort("name"))
            .apply(QueryEvent::set_sort("age"));

        assert_eq!(state.sort, Some(SortCriterion::asc("age")));
        assert_eq!(state.sort_direction_for("name"), None);
    }

    #[test]
    fn test_set_sort_keeps_filters_and_page() {
        let before = filtered().with_pagination(Pagination::new(20, 10));
        let after = before.apply(QueryEvent::set_sort("age"));
        assert_eq!(after.filters, before.filters);
        assert_eq!(after.offset, 20);
        assert_eq!(after.limit, 10);
    }

    #[test]
    fn test_replace_filters_only_touches_field() {
        let before = filtered();
        let after = before.apply(QueryEvent::replace_filters(
            "age",
            vec![FilterCondition::new(FilterOperator::Equals, "30")],
        ));

        assert_eq!(after.filters_for("name"), before.filters_for("name"));
        assert_eq!(after.filters_for("age"), vec![&FilterCriterion::equals("age", "30")]);
    }

    #[test]
    fn test_remove_filter() {
        let after = filtered().apply(QueryEvent::remove_filter("age", 0));
        let ages: Vec<_> = after.filters_for("age").iter().map(|c| c.value.clone()).collect();
        assert_eq!(ages, vec!["40"]);
        assert_eq!(after.filters.len(), 2);
    }

    #[test]
    fn test_remove_filter_invalid_index_is_noop() {
        let before = filtered();
        assert_eq!(before.apply(QueryEvent::remove_filter("age", 5)), before);
        assert_eq!(before.apply(QueryEvent::remove_filter("email", 0)), before);
    }

    #[test]
    fn test_set_page() {
        let state = QueryState::new().apply(QueryEvent::set_page(2));
        assert_eq!(state.offset, 20);
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn test_set_page_size_resets_offset() {
        let state = QueryState::new()
            .apply(QueryEvent::set_page(2))
            .apply(QueryEvent::set_page_size(25));
        assert_eq!(state.offset, 0);
        assert_eq!(state.limit, 25);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_set_page_size_zero_is_noop() {
        let before = QueryState::new().apply(QueryEvent::set_page(3));
        assert_eq!(before.apply(QueryEvent::set_page_size(0)), before);
    }

    #[test]
    fn test_clear_events() {
        let state = filtered()
            .apply(QueryEvent::set_sort("age"))
            .apply(QueryEvent::set_page(1));

        let cleared = state.apply(QueryEvent::ClearFilters);
        assert!(!cleared.has_filters());
        assert!(cleared.sort.is_some());
        assert_eq!(cleared.offset, 10);

        let unsorted = state.apply(QueryEvent::ClearSort);
        assert!(unsorted.sort.is_none());
        assert_eq!(unsorted.filters, state.filters);
    }

    #[test]
    fn test_reduce_leaves_prior_state() {
        let before = filtered();
        let snapshot = before.clone();
        let _ = reduce(&before, QueryEvent::ClearFilters);
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_event_json() {
        let event = QueryEvent::remove_filter("age", 1);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "remove_filter", "field": "age", "index": 1}));
        assert_eq!(event.field(), Some("age"));
        assert_eq!(QueryEvent::ClearSort.field(), None);
    }
}
