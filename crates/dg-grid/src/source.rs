//! Data Sources
//!
//! A data source turns a [`QueryState`] into one page of rows plus the total
//! number of matching rows. The grid calls it once per query change and never
//! batches, retries, or cancels.

use std::cmp::Ordering;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use dg_core::error::DataSourceError;
use dg_core::pagination::Page;
use dg_queries::{
    ColumnSet, ColumnType, FilterCriterion, FilterOperator, QueryState, SortDirection,
};
use parking_lot::RwLock;
use tracing::{debug, instrument};

/// Date format of date column cells and filter values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Supplies rows for a query
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource<R: Send + Sync + 'static>: Send + Sync {
    /// Fetch the page described by `query`
    async fn fetch(&self, query: &QueryState) -> Result<Page<R>, DataSourceError>;
}

/// Data source backed by an async closure
pub struct FnDataSource<F> {
    f: F,
}

/// Wrap an async closure taking the query state as a data source
pub fn from_fn<F>(f: F) -> FnDataSource<F> {
    FnDataSource { f }
}

#[async_trait]
impl<R, F, Fut> DataSource<R> for FnDataSource<F>
where
    R: Send + Sync + 'static,
    F: Fn(QueryState) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<R>, DataSourceError>> + Send,
{
    async fn fetch(&self, query: &QueryState) -> Result<Page<R>, DataSourceError> {
        (self.f)(query.clone()).await
    }
}

/// In-memory data source evaluating queries over a row vector.
///
/// Cells are read through the column accessors. String operators compare
/// case-insensitively; number and date columns compare parsed values, and a
/// cell or filter value that does not parse never matches.
pub struct MemoryDataSource<R> {
    rows: RwLock<Vec<R>>,
    columns: ColumnSet<R>,
    latency: Option<Duration>,
}

impl<R> MemoryDataSource<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub fn new(columns: ColumnSet<R>, rows: Vec<R>) -> Self {
        Self {
            rows: RwLock::new(rows),
            columns,
            latency: None,
        }
    }

    /// Delay every fetch, to simulate a remote backend
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the stored rows
    pub fn set_rows(&self, rows: Vec<R>) {
        *self.rows.write() = rows;
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Evaluate a query synchronously
    pub fn query(&self, query: &QueryState) -> Page<R> {
        let rows = self.rows.read();

        let mut matching: Vec<&R> = rows
            .iter()
            .filter(|row| {
                query
                    .filters
                    .criteria()
                    .iter()
                    .all(|criterion| self.row_matches(row, criterion))
            })
            .collect();

        if let Some(sort) = &query.sort {
            if let Some(column) = self.columns.get(&sort.field) {
                matching.sort_by(|a, b| {
                    let ordering =
                        compare_cells(column.column_type, &column.cell(a), &column.cell(b));
                    match sort.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                });
            }
        }

        let pagination = query.pagination();
        let total_count = matching.len();
        let page: Vec<R> = matching
            .into_iter()
            .skip(pagination.offset)
            .take(pagination.limit)
            .cloned()
            .collect();

        Page::new(page, total_count)
    }

    fn row_matches(&self, row: &R, criterion: &FilterCriterion) -> bool {
        match self.columns.get(&criterion.field) {
            Some(column) => cell_matches(
                column.column_type,
                &column.cell(row),
                criterion.operator,
                &criterion.value,
            ),
            None => false,
        }
    }
}

#[async_trait]
impl<R> DataSource<R> for MemoryDataSource<R>
where
    R: Clone + Send + Sync + 'static,
{
    #[instrument(
        skip_all,
        fields(filters = query.filters.len(), offset = query.offset, limit = query.limit)
    )]
    async fn fetch(&self, query: &QueryState) -> Result<Page<R>, DataSourceError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let page = self.query(query);
        debug!(rows = page.len(), total = page.total_count, "Evaluated query in memory");
        Ok(page)
    }
}

/// Compare two cells of a column type. Unparseable values sort last.
pub fn compare_cells(column_type: ColumnType, a: &str, b: &str) -> Ordering {
    match column_type {
        ColumnType::String => a.to_lowercase().cmp(&b.to_lowercase()),
        ColumnType::Number => compare_parsed(parse_number(a), parse_number(b)),
        ColumnType::Date => compare_parsed(parse_date(a), parse_date(b)),
    }
}

fn compare_parsed<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Check one cell against one filter condition
pub fn cell_matches(
    column_type: ColumnType,
    cell: &str,
    operator: FilterOperator,
    value: &str,
) -> bool {
    match column_type {
        ColumnType::String => {
            let cell = cell.to_lowercase();
            let value = value.to_lowercase();
            match operator {
                FilterOperator::Equals => cell == value,
                FilterOperator::NotEquals => cell != value,
                FilterOperator::Contains => cell.contains(&value),
                FilterOperator::StartsWith => cell.starts_with(&value),
                FilterOperator::EndsWith => cell.ends_with(&value),
                ordering => compare_matches(ordering, Some(cell.cmp(&value))),
            }
        }
        ColumnType::Number => {
            let ordering = match (parse_number(cell), parse_number(value)) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            };
            compare_matches(operator, ordering)
        }
        ColumnType::Date => {
            let ordering = match (parse_date(cell), parse_date(value)) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => None,
            };
            compare_matches(operator, ordering)
        }
    }
}

fn compare_matches(operator: FilterOperator, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match operator {
        FilterOperator::Equals => ordering == Ordering::Equal,
        FilterOperator::NotEquals => ordering != Ordering::Equal,
        FilterOperator::LessThan => ordering == Ordering::Less,
        FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
        FilterOperator::GreaterThan => ordering == Ordering::Greater,
        FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
        FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith => false,
    }
}
