//! Pagination types
//!
//! Offset/limit pagination as driven by a page-index control, plus the
//! page window shown next to the table.

use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the pagination control
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Offset/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Rows skipped before the current page
    pub offset: usize,
    /// Rows per page, always positive
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Create from raw offset and limit. A zero limit falls back to the default.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: if limit == 0 { DEFAULT_PAGE_SIZE } else { limit },
        }
    }

    /// Pagination positioned at a 0-based page index
    pub fn at_page(page_index: usize, limit: usize) -> Self {
        let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        Self {
            offset: page_index.saturating_mul(limit),
            limit,
        }
    }

    /// 0-based page index (`offset / limit`)
    pub fn page_index(&self) -> usize {
        self.offset / self.limit
    }

    /// 1-based page number, as sent to backends
    pub fn page_number(&self) -> usize {
        self.page_index().saturating_add(1)
    }

    /// Move to a 0-based page index, keeping the limit
    pub fn with_page(self, page_index: usize) -> Self {
        Self::at_page(page_index, self.limit)
    }

    /// Change the page size and return to the first page
    pub fn with_limit(self, limit: usize) -> Self {
        Self::new(0, limit)
    }

    /// Compute the window shown for a result of `total_count` rows
    pub fn window(&self, total_count: usize) -> PageWindow {
        let total_pages = total_count.div_ceil(self.limit);
        let first_row = if self.offset < total_count {
            self.offset + 1
        } else {
            0
        };
        let end = self.offset.saturating_add(self.limit);
        let last_row = end.min(total_count);

        PageWindow {
            page_index: self.page_index(),
            page_size: self.limit,
            total_count,
            total_pages,
            first_row,
            last_row,
            has_previous: self.offset > 0,
            has_next: end < total_count,
        }
    }
}

/// What a pagination control displays for the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub page_index: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based number of the first row on the page, 0 when the page is empty
    pub first_row: usize,
    /// 1-based number of the last row on the page
    pub last_row: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// One page of rows returned by a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page
    #[serde(rename = "data")]
    pub rows: Vec<T>,
    /// Total rows matching the filters, across all pages
    #[serde(rename = "count")]
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn new(rows: Vec<T>, total_count: usize) -> Self {
        Self { rows, total_count }
    }

    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index_from_offset() {
        let p = Pagination::new(20, 10);
        assert_eq!(p.page_index(), 2);
        assert_eq!(p.page_number(), 3);
    }

    #[test]
    fn test_with_limit_resets_offset() {
        let p = Pagination::new(20, 10).with_limit(25);
        assert_eq!(p.offset, 0);
        assert_eq!(p.limit, 25);
        assert_eq!(p.page_index(), 0);
    }

    #[test]
    fn test_with_page_keeps_offset_multiple_of_limit() {
        let p = Pagination::default().with_page(4);
        assert_eq!(p.offset, 40);
        assert_eq!(p.offset % p.limit, 0);
    }

    #[test]
    fn test_zero_limit_falls_back_to_default() {
        assert_eq!(Pagination::new(0, 0).limit, DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::at_page(3, 0).offset, 30);
    }

    #[test]
    fn test_window_middle_page() {
        let window = Pagination::new(10, 10).window(35);
        assert_eq!(window.total_pages, 4);
        assert_eq!(window.first_row, 11);
        assert_eq!(window.last_row, 20);
        assert!(window.has_previous);
        assert!(window.has_next);
    }

    #[test]
    fn test_window_last_partial_page() {
        let window = Pagination::new(30, 10).window(35);
        assert_eq!(window.first_row, 31);
        assert_eq!(window.last_row, 35);
        assert!(!window.has_next);
    }

    #[test]
    fn test_window_empty_result() {
        let window = Pagination::default().window(0);
        assert_eq!(window.total_pages, 0);
        assert_eq!(window.first_row, 0);
        assert_eq!(window.last_row, 0);
        assert!(!window.has_previous);
        assert!(!window.has_next);
    }

    #[test]
    fn test_saturated_offset() {
        let p = Pagination::new(0, 1).with_page(usize::MAX);
        assert_eq!(p.offset, usize::MAX);
        assert_eq!(p.page_number(), usize::MAX);

        let window = Pagination::default().with_page(usize::MAX).window(5);
        assert_eq!(window.first_row, 0);
        assert_eq!(window.last_row, 5);
        assert!(window.has_previous);
        assert!(!window.has_next);
    }

    #[test]
    fn test_page_json_shape() {
        let page = Page::new(vec!["a", "b"], 7);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["count"], 7);
        assert_eq!(json["data"][1], "b");
    }
}
