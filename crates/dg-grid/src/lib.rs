//! # dg-grid
//!
//! Stateful side of Datagrid RS: the controller that turns edits into
//! fetches, the per-column filter editor, data source adapters, and the
//! presentation model a UI renders.
//!
//! ## Example
//!
//! ```no_run
//! use dg_core::config::GridConfig;
//! use dg_grid::{GridController, MemoryDataSource};
//! use dg_queries::{Column, ColumnSet, QueryEvent};
//!
//! # async fn run() -> dg_core::error::GridResult<()> {
//! let columns: ColumnSet<(String, u32)> = ColumnSet::new()
//!     .with(Column::string("name", "Name", |r: &(String, u32)| r.0.clone()))
//!     .with(Column::number("age", "Age", |r: &(String, u32)| r.1.to_string()));
//! let source = MemoryDataSource::new(columns.clone(), vec![("John Doe".into(), 30)]);
//!
//! let grid = GridController::new(columns, source, GridConfig::default());
//! grid.refresh().await?;
//! grid.dispatch(QueryEvent::set_sort("age")).await?;
//! println!("{}", grid.view());
//! # Ok(())
//! # }
//! ```

pub mod editor;
pub mod source;
pub mod view;
pub mod controller;

pub use editor::{DraftFilter, FilterEditor, OpenEditor};
pub use source::{from_fn, DataSource, FnDataSource, MemoryDataSource};
pub use view::{FilterChip, GridView, HeaderCell, PaginationBar, SortIndicator};
pub use controller::{FetchOutcome, GridController};
