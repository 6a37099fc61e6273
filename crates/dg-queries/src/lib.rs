//! # dg-queries
//!
//! Query layer of Datagrid RS: the filter/sort/pagination state a grid is
//! showing, the edits that change it, and its query string form.
//!
//! ## Structure
//!
//! - `filters` - Filter criteria and operators
//! - `sorts` - The single active sort and its direction
//! - `columns` - Column declarations with typed row accessors
//! - `query` - The query state
//! - `reducer` - Edit events and the pure state transition
//! - `encoder` - Query string encoding and decoding
//! - `builder` - Fluent API for initial query states
//!
//! ## Example
//!
//! ```
//! use dg_queries::{QueryBuilder, QueryEvent};
//!
//! let query = QueryBuilder::new()
//!     .greater_than("age", "25")
//!     .sort_asc("name")
//!     .build();
//!
//! let next = query.apply(QueryEvent::set_page_size(25));
//! assert_eq!(next.offset, 0);
//! assert!(next.to_query_string().contains("filter[0][type]=gt"));
//! ```

pub mod filters;
pub mod sorts;
pub mod columns;
pub mod query;
pub mod reducer;
pub mod encoder;
pub mod builder;

// Re-exports for convenience
pub use filters::{FilterCondition, FilterCriterion, FilterOperator, FilterSet};
pub use sorts::{SortCriterion, SortDirection};
pub use columns::{Column, ColumnSet, ColumnType};
pub use query::QueryState;
pub use reducer::{reduce, QueryEvent};
pub use encoder::{decode, encode, QueryParseError};
pub use builder::QueryBuilder;
