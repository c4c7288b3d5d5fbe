//! Pagination engine

use serde::{Deserialize, Serialize};

use crate::GridError;

/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the footer selector
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Current page window over the filtered and sorted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredPagination")]
pub struct PaginationState {
    page_index: usize,
    page_size: usize,
}

#[derive(Deserialize)]
struct StoredPagination {
    page_index: usize,
    page_size: usize,
}

impl TryFrom<StoredPagination> for PaginationState {
    type Error = GridError;

    fn try_from(stored: StoredPagination) -> Result<Self, Self::Error> {
        let state = Self::new(stored.page_size)?;
        Ok(Self {
            page_index: stored.page_index,
            ..state
        })
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    /// Start on the first page with the given size
    pub fn new(page_size: usize) -> Result<Self, GridError> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        Ok(Self {
            page_index: 0,
            page_size,
        })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `total` rows; at least one, even with no rows
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Same state with the page index pulled into range for `total` rows
    pub fn clamped(self, total: usize) -> Self {
        let last = self.page_count(total) - 1;
        Self {
            page_index: self.page_index.min(last),
            ..self
        }
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn first(self) -> Self {
        Self { page_index: 0, ..self }
    }

    pub fn previous(self) -> Self {
        if self.can_previous() {
            Self {
                page_index: self.page_index - 1,
                ..self
            }
        } else {
            self
        }
    }

    pub fn next(self, total: usize) -> Self {
        if self.can_next(total) {
            Self {
                page_index: self.page_index + 1,
                ..self
            }
        } else {
            self
        }
    }

    pub fn last(self, total: usize) -> Self {
        Self {
            page_index: self.page_count(total) - 1,
            ..self
        }
    }

    /// Jump to a page; out-of-range targets leave the state unchanged
    pub fn go_to(self, page_index: usize, total: usize) -> Self {
        if page_index < self.page_count(total) {
            Self { page_index, ..self }
        } else {
            self
        }
    }

    /// Change the page size, keeping the previously first visible row on
    /// screen. A zero size is ignored.
    pub fn with_page_size(self, page_size: usize, total: usize) -> Self {
        if page_size == 0 {
            return self;
        }
        let first_row = self.page_index * self.page_size;
        Self {
            page_index: first_row / page_size,
            page_size,
        }
        .clamped(total)
    }

    /// Row range `[start, end)` of the current page within `total` rows
    pub fn window(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub page_count: usize,
}

/// Slice the current page out of `rows`
pub fn apply<T: Clone>(rows: &[T], pagination: &PaginationState) -> Page<T> {
    let window = pagination.window(rows.len());
    Page {
        rows: rows[window].to_vec(),
        page_count: pagination.page_count(rows.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(page_index: usize, page_size: usize) -> PaginationState {
        PaginationState { page_index, page_size }
    }

    #[test]
    fn test_twenty_five_rows_make_three_pages() {
        let rows: Vec<usize> = (0..25).collect();
        let pagination = state(0, 10);

        let first = apply(&rows, &pagination);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.rows.len(), 10);

        let last = apply(&rows, &pagination.last(rows.len()));
        assert_eq!(last.rows, (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_rows_still_have_one_page() {
        let rows: Vec<usize> = Vec::new();
        let page = apply(&rows, &PaginationState::default());
        assert_eq!(page.page_count, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_pages_concatenate_to_all_rows() {
        for total in 0..40 {
            for size in 1..12 {
                let rows: Vec<usize> = (0..total).collect();
                let mut pagination = state(0, size);
                let page_count = pagination.page_count(total);
                assert_eq!(page_count, total.div_ceil(size).max(1));

                let mut seen = Vec::new();
                for index in 0..page_count {
                    pagination = pagination.go_to(index, total);
                    let page = apply(&rows, &pagination);
                    assert!(page.rows.len() <= size);
                    seen.extend(page.rows);
                }
                assert_eq!(seen, rows);
            }
        }
    }

    #[test]
    fn test_navigation_out_of_range_is_noop() {
        let total = 25;
        let pagination = state(2, 10);
        assert_eq!(pagination.next(total), pagination);
        assert_eq!(pagination.go_to(3, total), pagination);
        assert_eq!(state(0, 10).previous(), state(0, 10));
        assert_eq!(pagination.previous().page_index(), 1);
        assert_eq!(pagination.first().page_index(), 0);
    }

    #[test]
    fn test_clamp_after_rows_shrink() {
        assert_eq!(state(4, 10).clamped(12).page_index(), 1);
        assert_eq!(state(4, 10).clamped(0).page_index(), 0);
        assert_eq!(state(1, 10).clamped(12).page_index(), 1);
    }

    #[test]
    fn test_page_size_change_keeps_first_visible_row() {
        // First visible row is 20
        let resized = state(2, 10).with_page_size(20, 45);
        assert_eq!(resized, state(1, 20));
        assert!(resized.window(45).contains(&20));

        // Never lands past the last page
        assert_eq!(state(4, 10).with_page_size(50, 45), state(0, 50));

        // Zero is ignored
        assert_eq!(state(1, 10).with_page_size(0, 45), state(1, 10));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert_eq!(PaginationState::new(0), Err(GridError::InvalidPageSize));
        assert_eq!(PaginationState::new(20).map(|p| p.page_size()), Ok(20));
    }

    #[test]
    fn test_stored_zero_page_size_is_rejected() {
        let stored = serde_json::from_str::<PaginationState>(r#"{"page_index":0,"page_size":0}"#);
        assert!(stored.is_err());

        let stored: PaginationState = serde_json::from_str(r#"{"page_index":2,"page_size":20}"#).unwrap();
        assert_eq!(stored.page_index(), 2);
        assert_eq!(stored.page_count(45), 3);
    }
}
