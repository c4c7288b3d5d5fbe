//! egui rendering of data grids
//!
//! Drawing never mutates a grid directly. Every widget records a
//! [`dg_core::GridAction`] and [`GridView::ui`] applies them once the frame
//! is laid out.

pub mod cells;
pub mod grid_view;
pub mod pagination;
pub mod toolbar;

pub use grid_view::{GridView, GridViewConfig};
