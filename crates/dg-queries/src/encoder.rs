//! Query String Encoding
//!
//! Serializes a [`QueryState`] into the bracket-indexed filter query format
//! consumed by backends, and parses it back:
//!
//! ```text
//! ?filter[0][field]=age&filter[0][type]=gt&filter[0][value]=25&order[0][field]=name&order[0][dir]=asc&page=1&pageSize=10
//! ```
//!
//! Filters come first in list order, then the sort, then the 1-based page
//! number and the page size. Keys are written literally; values are
//! form-url-encoded.

use std::collections::BTreeMap;
use std::fmt::Write;

use thiserror::Error;
use dg_core::pagination::Pagination;
use url::form_urlencoded;

use crate::filters::{FilterCriterion, FilterOperator, FilterSet};
use crate::query::QueryState;
use crate::sorts::{SortCriterion, SortDirection};

/// Errors raised while parsing a query string
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),
    #[error("Unknown sort direction: {0}")]
    UnknownDirection(String),
    #[error("Invalid number for {key}: {value}")]
    InvalidNumber { key: String, value: String },
    #[error("Incomplete {kind} entry at index {index}: missing {missing}")]
    Incomplete {
        kind: &'static str,
        index: usize,
        missing: &'static str,
    },
}

fn encode_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Serialize a query state. Identical states always give identical strings.
pub fn encode(state: &QueryState) -> String {
    let mut out = String::from("?");

    for (i, criterion) in state.filters.criteria().iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "filter[{i}][field]={}&filter[{i}][type]={}&filter[{i}][value]={}&",
            encode_value(&criterion.field),
            criterion.operator.token(),
            encode_value(&criterion.value),
        );
    }

    if let Some(sort) = &state.sort {
        let _ = write!(
            out,
            "order[0][field]={}&order[0][dir]={}&",
            encode_value(&sort.field),
            sort.direction.as_str(),
        );
    }

    let pagination = state.pagination();
    let _ = write!(
        out,
        "page={}&pageSize={}",
        pagination.page_number(),
        pagination.limit
    );

    out
}

#[derive(Default)]
struct PartialFilter {
    field: Option<String>,
    operator: Option<FilterOperator>,
    value: Option<String>,
}

#[derive(Default)]
struct PartialOrder {
    field: Option<String>,
    direction: Option<SortDirection>,
}

/// Split `filter[3][type]` into `(3, "type")` for the given prefix
fn indexed_key<'a>(key: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('[')?;
    let (index, rest) = rest.split_once(']')?;
    let name = rest.strip_prefix('[')?.strip_suffix(']')?;
    Some((index.parse().ok()?, name))
}

fn parse_number(key: &str, value: &str) -> Result<usize, QueryParseError> {
    value.parse().map_err(|_| QueryParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse a query string produced by [`encode`].
///
/// Missing pagination falls back to page 1 with the default page size. When
/// several order entries are present only the lowest index is kept.
pub fn decode(input: &str) -> Result<QueryState, QueryParseError> {
    let input = input.strip_prefix('?').unwrap_or(input);

    let mut filters: BTreeMap<usize, PartialFilter> = BTreeMap::new();
    let mut orders: BTreeMap<usize, PartialOrder> = BTreeMap::new();
    let mut page: Option<usize> = None;
    let mut page_size: Option<usize> = None;

    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        let key: &str = &key;
        let value = value.into_owned();

        if let Some((index, name)) = indexed_key(key, "filter") {
            let entry = filters.entry(index).or_default();
            match name {
                "field" => entry.field = Some(value),
                "type" => {
                    entry.operator = Some(
                        FilterOperator::from_token(&value)
                            .ok_or(QueryParseError::UnknownOperator(value))?,
                    )
                }
                "value" => entry.value = Some(value),
                _ => return Err(QueryParseError::UnknownParameter(key.to_string())),
            }
        } else if let Some((index, name)) = indexed_key(key, "order") {
            let entry = orders.entry(index).or_default();
            match name {
                "field" => entry.field = Some(value),
                "dir" => {
                    entry.direction = Some(
                        SortDirection::from_token(&value)
                            .ok_or(QueryParseError::UnknownDirection(value))?,
                    )
                }
                _ => return Err(QueryParseError::UnknownParameter(key.to_string())),
            }
        } else {
            match key {
                "page" => page = Some(parse_number(key, &value)?),
                "pageSize" => page_size = Some(parse_number(key, &value)?),
                _ => return Err(QueryParseError::UnknownParameter(key.to_string())),
            }
        }
    }

    let filters = filters
        .into_iter()
        .map(|(index, partial)| {
            let missing = |what| QueryParseError::Incomplete {
                kind: "filter",
                index,
                missing: what,
            };
            Ok(FilterCriterion::new(
                partial.field.ok_or_else(|| missing("field"))?,
                partial.operator.ok_or_else(|| missing("type"))?,
                partial.value.ok_or_else(|| missing("value"))?,
            ))
        })
        .collect::<Result<FilterSet, QueryParseError>>()?;

    let sort = match orders.into_iter().next() {
        Some((index, partial)) => {
            let field = partial.field.ok_or(QueryParseError::Incomplete {
                kind: "order",
                index,
                missing: "field",
            })?;
            Some(SortCriterion::new(field, partial.direction.unwrap_or_default()))
        }
        None => None,
    };

    let page_index = page.unwrap_or(1).saturating_sub(1);
    let pagination = Pagination::at_page(page_index, page_size.unwrap_or_default());

    Ok(QueryState::new()
        .with_filters(filters)
        .with_sort_option(sort)
        .with_pagination(pagination))
}

impl QueryState {
    /// Shorthand for [`encode`]
    pub fn to_query_string(&self) -> String {
        encode(self)
    }
}
