//! Grid Controller
//!
//! Owns the query state a grid shows, its encoded query string, and the page
//! currently displayed. Every edit runs validate, reduce, encode, then one
//! fetch against the data source.
//!
//! Fetches are stamped with a monotonically increasing sequence number. With
//! response fencing enabled, a page whose sequence is older than the one
//! already displayed is discarded instead of overwriting newer rows.

use std::sync::atomic::{AtomicU64, Ordering};

use dg_core::config::GridConfig;
use dg_core::error::{GridError, GridResult};
use dg_core::pagination::Page;
use dg_queries::{reduce, ColumnSet, QueryEvent, QueryState};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::editor::FilterEditor;
use crate::source::DataSource;
use crate::view::GridView;

/// Result of one edit or refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The fetched page is now displayed
    Applied { sequence: u64, total_count: usize },
    /// A newer page was already displayed when this one arrived
    Stale { sequence: u64 },
    /// The edit was a no-op; nothing was fetched
    Skipped,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

struct QuerySnapshot {
    state: QueryState,
    query_string: String,
}

impl QuerySnapshot {
    fn new(state: QueryState) -> Self {
        Self {
            query_string: state.to_query_string(),
            state,
        }
    }
}

struct Displayed<R> {
    page: Page<R>,
    sequence: u64,
}

/// Drives one grid: query state, filter editor, and displayed rows
pub struct GridController<R, S> {
    columns: ColumnSet<R>,
    source: S,
    config: GridConfig,
    query: RwLock<QuerySnapshot>,
    displayed: RwLock<Displayed<R>>,
    next_sequence: AtomicU64,
    editor: Mutex<FilterEditor>,
}

impl<R, S> GridController<R, S>
where
    R: Send + Sync + 'static,
    S: DataSource<R>,
{
    /// Create a controller starting from an empty query with the configured page size.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or the first edit.
    pub fn new(columns: ColumnSet<R>, source: S, config: GridConfig) -> Self {
        let state = QueryState::with_page_size(config.page_size);
        Self {
            columns,
            source,
            config,
            query: RwLock::new(QuerySnapshot::new(state)),
            displayed: RwLock::new(Displayed {
                page: Page::empty(),
                sequence: 0,
            }),
            next_sequence: AtomicU64::new(0),
            editor: Mutex::new(FilterEditor::new()),
        }
    }

    /// Start from a given query, dropping filters and sort on undeclared columns
    pub fn with_initial_state(self, state: QueryState) -> Self {
        *self.query.write() = QuerySnapshot::new(state.restricted_to(&self.columns));
        self
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Current query state
    pub fn state(&self) -> QueryState {
        self.query.read().state.clone()
    }

    /// Query string of the current state
    pub fn query_string(&self) -> String {
        self.query.read().query_string.clone()
    }

    /// Sequence number of the displayed page, 0 before the first one
    pub fn displayed_sequence(&self) -> u64 {
        self.displayed.read().sequence
    }

    pub fn total_count(&self) -> usize {
        self.displayed.read().page.total_count
    }

    /// Rows currently displayed
    pub fn rows(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.displayed.read().page.rows.clone()
    }

    /// Fetch the page for the current query
    #[instrument(skip(self), fields(sequence = tracing::field::Empty))]
    pub async fn refresh(&self) -> GridResult<FetchOutcome> {
        let (query, sequence) = {
            let snapshot = self.query.read();
            (snapshot.state.clone(), self.issue_sequence())
        };
        tracing::Span::current().record("sequence", sequence);
        self.fetch(query, sequence).await
    }

    /// Apply one edit and fetch the resulting page.
    ///
    /// Edits on undeclared columns, and edits that leave the query unchanged,
    /// return [`FetchOutcome::Skipped`] without fetching. A failed fetch leaves
    /// the new query in place and the displayed rows untouched.
    #[instrument(skip(self), fields(sequence = tracing::field::Empty))]
    pub async fn dispatch(&self, event: QueryEvent) -> GridResult<FetchOutcome> {
        let Some(event) = self.validate(event) else {
            return Ok(FetchOutcome::Skipped);
        };

        let (query, sequence) = {
            let mut snapshot = self.query.write();
            let next = reduce(&snapshot.state, event);
            if next == snapshot.state {
                debug!("Edit left the query unchanged");
                return Ok(FetchOutcome::Skipped);
            }
            *snapshot = QuerySnapshot::new(next.clone());
            (next, self.issue_sequence())
        };
        tracing::Span::current().record("sequence", sequence);

        self.fetch(query, sequence).await
    }

    /// Open the filter editor on a column. Undeclared columns are ignored.
    pub fn open_filter_editor(&self, field: &str) -> bool {
        let Some(column_type) = self.columns.column_type(field) else {
            debug!(%field, "Ignoring filter editor for undeclared column");
            return false;
        };
        let committed = self.query.read().state.filters.conditions_for(field);
        self.editor.lock().open(field, column_type, committed);
        true
    }

    /// Run a closure against the filter editor
    pub fn edit_filter_editor<T>(&self, f: impl FnOnce(&mut FilterEditor) -> T) -> T {
        f(&mut self.editor.lock())
    }

    /// Snapshot of the filter editor
    pub fn filter_editor(&self) -> FilterEditor {
        self.editor.lock().clone()
    }

    pub fn cancel_filter_editor(&self) {
        self.editor.lock().cancel();
    }

    /// Commit the filter editor's tentative criteria and fetch
    pub async fn apply_filter_editor(&self) -> GridResult<FetchOutcome> {
        let event = self.editor.lock().apply();
        match event {
            Some(event) => self.dispatch(event).await,
            None => {
                debug!("Ignoring apply on closed filter editor");
                Ok(FetchOutcome::Skipped)
            }
        }
    }

    /// Presentation model of the current query and displayed page
    pub fn view(&self) -> GridView {
        let snapshot = self.query.read();
        let displayed = self.displayed.read();
        let editor = self.editor.lock();
        GridView::build(
            &self.columns,
            &snapshot.state,
            &displayed.page,
            &editor,
            &self.config.page_size_options,
        )
    }

    fn issue_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Drop edits the columns cannot accept
    fn validate(&self, event: QueryEvent) -> Option<QueryEvent> {
        if let Some(field) = event.field() {
            if !self.columns.has_column(field) {
                debug!(%field, "Ignoring edit on undeclared column");
                return None;
            }
        }

        match event {
            QueryEvent::ReplaceFilters { field, conditions } => {
                let column_type = self.columns.column_type(&field)?;
                let conditions = conditions
                    .into_iter()
                    .filter(|condition| {
                        let allowed =
                            column_type.allows(condition.operator) && !condition.value.is_empty();
                        if !allowed {
                            debug!(
                                %field,
                                operator = %condition.operator,
                                "Dropping filter condition"
                            );
                        }
                        allowed
                    })
                    .collect();
                Some(QueryEvent::ReplaceFilters { field, conditions })
            }
            other => Some(other),
        }
    }

    async fn fetch(&self, query: QueryState, sequence: u64) -> GridResult<FetchOutcome> {
        match self.source.fetch(&query).await {
            Ok(page) => Ok(self.apply_page(page, sequence)),
            Err(source) => {
                warn!(sequence, error = %source, "Data source fetch failed");
                Err(GridError::DataSource { sequence, source })
            }
        }
    }

    fn apply_page(&self, page: Page<R>, sequence: u64) -> FetchOutcome {
        let mut displayed = self.displayed.write();
        if self.config.fence_responses && sequence < displayed.sequence {
            debug!(sequence, displayed = displayed.sequence, "Discarding stale response");
            return FetchOutcome::Stale { sequence };
        }

        let total_count = page.total_count;
        info!(sequence, rows = page.len(), total = total_count, "Page applied");
        *displayed = Displayed { page, sequence };
        FetchOutcome::Applied {
            sequence,
            total_count,
        }
    }
}
