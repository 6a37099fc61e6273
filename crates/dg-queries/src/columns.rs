//! Grid Columns
//!
//! Column declarations are static and supplied by the caller. Each column
//! carries a typed accessor that turns a row into the string shown in its cell,
//! so no dynamic key lookup on rows is needed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filters::FilterOperator;

/// Value type of a column. Determines which filter operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Date,
}

const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::Contains,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
];

const ORDERED_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
];

impl ColumnType {
    /// Operators offered for this type, in menu order
    pub fn operators(&self) -> &'static [FilterOperator] {
        match self {
            Self::String => STRING_OPERATORS,
            Self::Number | Self::Date => ORDERED_OPERATORS,
        }
    }

    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.operators().contains(&operator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

type Accessor<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// A column declaration for rows of type `R`
pub struct Column<R> {
    /// Field identifier used in filters and sorts
    pub field: String,
    /// Header label
    pub header_name: String,
    /// Width in pixels
    pub width: u32,
    pub column_type: ColumnType,
    accessor: Accessor<R>,
}

impl<R> Column<R> {
    /// Create a new column
    pub fn new<F>(
        field: impl Into<String>,
        header_name: impl Into<String>,
        column_type: ColumnType,
        accessor: F,
    ) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            width: 150,
            column_type,
            accessor: Arc::new(accessor),
        }
    }

    /// Create a string column
    pub fn string<F>(field: impl Into<String>, header_name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::new(field, header_name, ColumnType::String, accessor)
    }

    /// Create a number column
    pub fn number<F>(field: impl Into<String>, header_name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::new(field, header_name, ColumnType::Number, accessor)
    }

    /// Create a date column. Cell values are expected as `YYYY-MM-DD`.
    pub fn date<F>(field: impl Into<String>, header_name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::new(field, header_name, ColumnType::Date, accessor)
    }

    /// Set the width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Cell text for a row
    pub fn cell(&self, row: &R) -> String {
        (self.accessor)(row)
    }

    /// Check if the operator is allowed for this column's type
    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.column_type.allows(operator)
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            header_name: self.header_name.clone(),
            width: self.width,
            column_type: self.column_type,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("header_name", &self.header_name)
            .field("width", &self.width)
            .field("column_type", &self.column_type)
            .finish_non_exhaustive()
    }
}

/// The declared columns of a grid, in display order
pub struct ColumnSet<R> {
    columns: Vec<Column<R>>,
}

impl<R> ColumnSet<R> {
    pub fn new() -> Self {
        Self { columns: vec![] }
    }

    /// Add a column
    pub fn add(&mut self, column: Column<R>) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Add a column (builder pattern)
    pub fn with(mut self, column: Column<R>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by field
    pub fn get(&self, field: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn column_type(&self, field: &str) -> Option<ColumnType> {
        self.get(field).map(|c| c.column_type)
    }

    /// Check that `field` is declared and accepts `operator`
    pub fn allows(&self, field: &str, operator: FilterOperator) -> bool {
        self.get(field).is_some_and(|c| c.allows(operator))
    }

    /// Field names in display order
    pub fn fields(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.field.as_str()).collect()
    }

    /// Render a row as one string per column
    pub fn cells(&self, row: &R) -> Vec<String> {
        self.columns.iter().map(|c| c.cell(row)).collect()
    }
}

impl<R> Default for ColumnSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<R> FromIterator<Column<R>> for ColumnSet<R> {
    fn from_iter<I: IntoIterator<Item = Column<R>>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
