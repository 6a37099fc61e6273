//! Presentation model
//!
//! Plain data a UI toolkit renders: header cells with sort indicators and
//! filter chips, row cells as strings, and the pagination bar.

use std::fmt;

use dg_core::pagination::{Page, PageWindow};
use dg_queries::{ColumnSet, ColumnType, QueryState, SortDirection};
use serde::Serialize;

use crate::editor::FilterEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIndicator {
    Ascending,
    Descending,
    Inactive,
}

impl SortIndicator {
    fn from_direction(direction: Option<SortDirection>) -> Self {
        match direction {
            Some(SortDirection::Asc) => Self::Ascending,
            Some(SortDirection::Desc) => Self::Descending,
            None => Self::Inactive,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ascending => "^",
            Self::Descending => "v",
            Self::Inactive => "",
        }
    }
}

/// Removable chip for one applied filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    /// `"<operator token>: <value>"`
    pub label: String,
    /// Position among this field's criteria, for removal
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub field: String,
    pub label: String,
    pub width: u32,
    pub column_type: ColumnType,
    pub sort: SortIndicator,
    pub chips: Vec<FilterChip>,
    /// Whether the filter editor is open on this column
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBar {
    #[serde(flatten)]
    pub window: PageWindow,
    pub page_size_options: Vec<usize>,
}

/// Everything needed to draw the grid once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
    pub pagination: PaginationBar,
    pub query_string: String,
    pub editor: FilterEditor,
}

impl GridView {
    pub fn build<R>(
        columns: &ColumnSet<R>,
        state: &QueryState,
        page: &Page<R>,
        editor: &FilterEditor,
        page_size_options: &[usize],
    ) -> Self {
        let headers = columns
            .columns()
            .iter()
            .map(|column| HeaderCell {
                field: column.field.clone(),
                label: column.header_name.clone(),
                width: column.width,
                column_type: column.column_type,
                sort: SortIndicator::from_direction(state.sort_direction_for(&column.field)),
                chips: state
                    .filters_for(&column.field)
                    .into_iter()
                    .enumerate()
                    .map(|(index, criterion)| FilterChip {
                        label: format!("{}: {}", criterion.operator.token(), criterion.value),
                        index,
                    })
                    .collect(),
                editing: editor.field() == Some(column.field.as_str()),
            })
            .collect();

        let rows = page.rows.iter().map(|row| columns.cells(row)).collect();

        Self {
            headers,
            rows,
            pagination: PaginationBar {
                window: state.pagination().window(page.total_count),
                page_size_options: page_size_options.to_vec(),
            },
            query_string: state.to_query_string(),
            editor: editor.clone(),
        }
    }
}

/// Plain text table, one line per header, row, and the pagination bar
impl fmt::Display for GridView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let heading = header.label.len() + header.sort.symbol().len() + 1;
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(String::len)
                    .fold(heading, usize::max)
            })
            .collect();

        for (header, width) in self.headers.iter().zip(&widths) {
            let heading = format!("{} {}", header.label, header.sort.symbol());
            write!(f, "| {:<width$} ", heading.trim_end(), width = *width)?;
        }
        writeln!(f, "|")?;

        for (header, width) in self.headers.iter().zip(&widths) {
            let chips: Vec<&str> = header.chips.iter().map(|c| c.label.as_str()).collect();
            write!(f, "| {:<width$} ", chips.join(", "), width = *width)?;
        }
        writeln!(f, "|")?;

        for width in &widths {
            write!(f, "|{}", "-".repeat(width + 2))?;
        }
        writeln!(f, "|")?;

        if self.rows.is_empty() {
            writeln!(f, "(no rows)")?;
        }
        for row in &self.rows {
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "| {:<width$} ", cell, width = *width)?;
            }
            writeln!(f, "|")?;
        }

        let window = &self.pagination.window;
        write!(
            f,
            "{}-{} of {} | page {}/{} | rows per page {} {:?}",
            window.first_row,
            window.last_row,
            window.total_count,
            window.page_index.saturating_add(1),
            window.total_pages.max(1),
            window.page_size,
            self.pagination.page_size_options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_queries::{Column, QueryBuilder};

    fn columns() -> ColumnSet<(String, u32)> {
        ColumnSet::new()
            .with(Column::string("name", "Name", |r: &(String, u32)| r.0.clone()).with_width(200))
            .with(Column::number("age", "Age", |r: &(String, u32)| r.1.to_string()))
    }

    fn page() -> Page<(String, u32)> {
        Page::new(vec![("John Doe".into(), 30), ("Jane Smith".into(), 28)], 12)
    }

    #[test]
    fn test_headers() {
        let state = QueryBuilder::new()
            .greater_than("age", "25")
            .less_than("age", "40")
            .sort_desc("age")
            .build();
        let view = GridView::build(&columns(), &state, &page(), &FilterEditor::new(), &[5, 10, 25]);

        let name = &view.headers[0];
        assert_eq!(name.width, 200);
        assert_eq!(name.sort, SortIndicator::Inactive);
        assert!(name.chips.is_empty());

        let age = &view.headers[1];
        assert_eq!(age.width, 150);
        assert_eq!(age.sort, SortIndicator::Descending);
        assert_eq!(
            age.chips,
            vec![
                FilterChip { label: "gt: 25".into(), index: 0 },
                FilterChip { label: "lt: 40".into(), index: 1 },
            ]
        );
    }

    #[test]
    fn test_rows_and_pagination() {
        let state = QueryBuilder::new().page_size(2).page(1).build();
        let view = GridView::build(&columns(), &state, &page(), &FilterEditor::new(), &[5, 10, 25]);

        assert_eq!(view.rows[0], vec!["John Doe", "30"]);
        let window = view.pagination.window;
        assert_eq!(window.page_index, 1);
        assert_eq!(window.first_row, 3);
        assert_eq!(window.last_row, 4);
        assert_eq!(window.total_pages, 6);
        assert!(window.has_previous && window.has_next);
        assert_eq!(view.query_string, "?page=2&pageSize=2");
    }

    #[test]
    fn test_editing_flag() {
        let mut editor = FilterEditor::new();
        editor.open("age", ColumnType::Number, vec![]);
        let view = GridView::build(&columns(), &QueryState::new(), &Page::empty(), &editor, &[10]);
        assert!(!view.headers[0].editing);
        assert!(view.headers[1].editing);
    }

    #[test]
    fn test_display() {
        let state = QueryBuilder::new().sort_asc("name").build();
        let text = GridView::build(&columns(), &state, &page(), &FilterEditor::new(), &[5, 10, 25])
            .to_string();
        assert!(text.starts_with("| Name ^"));
        assert!(text.contains("| Jane Smith "));
        assert!(text.ends_with("1-10 of 12 | page 1/2 | rows per page 10 [5, 10, 25]"));
    }

    #[test]
    fn test_display_empty() {
        let editor = FilterEditor::new();
        let text = GridView::build(&columns(), &QueryState::new(), &Page::empty(), &editor, &[10])
            .to_string();
        assert!(text.contains("(no rows)"));
        assert!(text.ends_with("0-0 of 0 | page 1/1 | rows per page 10 [10]"));
    }
}
