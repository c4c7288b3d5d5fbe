//! Core functionality for the data grid
//!
//! This crate provides the row model, the filter/sort/pagination/expansion
//! engines and the orchestrator that composes them into one grid state.
//! It has no UI dependency; rendering lives in `dg-views`.

pub mod column;
pub mod events;
pub mod expansion;
pub mod facets;
pub mod filter;
pub mod format;
pub mod grid;
pub mod pagination;
pub mod query;
pub mod row;
pub mod selection;
pub mod sort;

use thiserror::Error;

// Re-export commonly used types
pub use column::{ColumnDef, ColumnId, ColumnSet};
pub use events::{EventBus, GridEvent};
pub use expansion::ExpansionState;
pub use facets::{FacetCache, FacetOption};
pub use filter::{BucketRange, FilterKind, FilterState, FilterValue, NumericBucket};
pub use format::{BadgeRule, CellText, ColumnKind, Tone};
pub use grid::{project, reduce, DataGrid, DetailBinding, GridAction, GridContext, GridPage, GridState, Projection};
pub use pagination::{PaginationState, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
pub use row::{CellValue, GridRow, NoDetail, RowId};
pub use selection::{ColumnVisibility, RowSelection};
pub use sort::{SortDirection, SortKey, SortState, SortType};

/// Errors raised while constructing grid state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Page size must be positive")]
    InvalidPageSize,

    #[error("Invalid value for query parameter '{param}': {value}")]
    InvalidQueryValue {
        param: String,
        value: String,
    },
}
