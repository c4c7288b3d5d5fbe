//! Expansion engine
//!
//! Tracks which rows are expanded and owns the state of each row's nested
//! grid. Nested state is created on first expansion and kept when the row is
//! collapsed, so re-expanding shows the same filters, sort and page.

use ahash::{AHashMap, AHashSet};

use crate::grid::GridState;
use crate::row::RowId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionState {
    expanded: AHashSet<RowId>,
    nested: AHashMap<RowId, GridState>,
}

impl ExpansionState {
    /// Flip a row's expansion. `fresh` builds the nested grid state the
    /// first time the row opens. Returns whether the row is now expanded.
    pub fn toggle<F>(&mut self, row: RowId, fresh: F) -> bool
    where
        F: FnOnce() -> GridState,
    {
        if self.expanded.remove(&row) {
            return false;
        }
        self.nested.entry(row.clone()).or_insert_with(fresh);
        self.expanded.insert(row);
        true
    }

    pub fn is_expanded(&self, row: &RowId) -> bool {
        self.expanded.contains(row)
    }

    /// Nested grid state for a row that has been expanded at least once
    pub fn nested(&self, row: &RowId) -> Option<&GridState> {
        self.nested.get(row)
    }

    pub fn nested_mut(&mut self, row: &RowId) -> Option<&mut GridState> {
        self.nested.get_mut(row)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    pub fn expanded_ids(&self) -> impl Iterator<Item = &RowId> {
        self.expanded.iter()
    }

    /// Forget everything, including nested state (used on data reload)
    pub fn clear(&mut self) {
        self.expanded.clear();
        self.nested.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortDirection, SortState};

    fn nested_defaults() -> GridState {
        GridState::default().with_sort(SortState::by("buy_counts", SortDirection::Descending))
    }

    #[test]
    fn test_rows_expand_independently() {
        let mut expansion = ExpansionState::default();
        let a = RowId::from("a");
        let b = RowId::from("b");

        assert!(expansion.toggle(a.clone(), nested_defaults));
        assert!(expansion.toggle(b.clone(), nested_defaults));
        assert!(expansion.is_expanded(&a));
        assert!(expansion.is_expanded(&b));

        assert!(!expansion.toggle(a.clone(), nested_defaults));
        assert!(!expansion.is_expanded(&a));
        assert!(expansion.is_expanded(&b));
        assert_eq!(expansion.expanded_count(), 1);
    }

    #[test]
    fn test_nested_state_survives_collapse() {
        let mut expansion = ExpansionState::default();
        let row = RowId::from("solana:So111");

        expansion.toggle(row.clone(), nested_defaults);
        if let Some(state) = expansion.nested_mut(&row) {
            state.search = "whale".to_string();
        }

        expansion.toggle(row.clone(), nested_defaults);
        expansion.toggle(row.clone(), GridState::default);

        let state = expansion.nested(&row).cloned().unwrap_or_default();
        assert_eq!(state.search, "whale");
        assert_eq!(state.sort, SortState::by("buy_counts", SortDirection::Descending));
    }

    #[test]
    fn test_clear_drops_nested_state() {
        let mut expansion = ExpansionState::default();
        let row = RowId::from("x");
        expansion.toggle(row.clone(), nested_defaults);
        expansion.clear();
        assert!(!expansion.is_expanded(&row));
        assert!(expansion.nested(&row).is_none());
    }
}
