//! Column visibility and row selection
//!
//! Both are purely presentational: they never change which rows pass the
//! filter or how they are ordered.

use ahash::{AHashMap, AHashSet};

use crate::column::ColumnId;
use crate::row::RowId;

/// Which columns are shown; every column is visible until hidden
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: AHashMap<ColumnId, bool>,
}

impl ColumnVisibility {
    pub fn is_visible(&self, column: &str) -> bool {
        !self.hidden.get(column).copied().unwrap_or(false)
    }

    pub fn set_visible(&mut self, column: impl Into<ColumnId>, visible: bool) {
        let column = column.into();
        if visible {
            self.hidden.remove(&column);
        } else {
            self.hidden.insert(column, true);
        }
    }

    pub fn toggle(&mut self, column: &str) {
        let visible = self.is_visible(column);
        self.set_visible(column, !visible);
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    /// Number of hidden columns
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

/// Selected rows, keyed by row identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: AHashSet<RowId>,
}

impl RowSelection {
    pub fn is_selected(&self, row: &RowId) -> bool {
        self.selected.contains(row)
    }

    pub fn set(&mut self, row: RowId, selected: bool) {
        if selected {
            self.selected.insert(row);
        } else {
            self.selected.remove(&row);
        }
    }

    pub fn toggle(&mut self, row: RowId) {
        if !self.selected.remove(&row) {
            self.selected.insert(row);
        }
    }

    /// Select or deselect several rows at once (e.g. the current page)
    pub fn set_many<I>(&mut self, rows: I, selected: bool)
    where
        I: IntoIterator<Item = RowId>,
    {
        for row in rows {
            self.set(row, selected);
        }
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }

    /// Keep only the selected rows for which `keep` returns true
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&RowId) -> bool,
    {
        self.selected.retain(|row| keep(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_visible_by_default() {
        let mut visibility = ColumnVisibility::default();
        assert!(visibility.is_visible("chain"));

        visibility.toggle("chain");
        assert!(!visibility.is_visible("chain"));
        assert_eq!(visibility.hidden_count(), 1);

        visibility.show_all();
        assert!(visibility.is_visible("chain"));
    }

    #[test]
    fn test_row_selection_toggle_and_bulk() {
        let mut selection = RowSelection::default();
        selection.toggle(RowId::from("a"));
        assert!(selection.is_selected(&RowId::from("a")));
        selection.toggle(RowId::from("a"));
        assert_eq!(selection.count(), 0);

        selection.set_many(["a", "b", "c"].map(RowId::from), true);
        assert_eq!(selection.count(), 3);
        selection.set_many(["a", "b"].map(RowId::from), false);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![&RowId::from("c")]);
    }
}
