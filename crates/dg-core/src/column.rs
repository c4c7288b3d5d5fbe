//! Column definitions
//!
//! Columns are static configuration: an id, a label, a value accessor and
//! the capabilities (sort, filter, hide) the toolbar and headers expose.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::facets::FacetOption;
use crate::filter::FilterKind;
use crate::format::{format_cell, CellText, ColumnKind};
use crate::row::CellValue;
use crate::sort::SortType;

/// Column identifier
pub type ColumnId = String;

/// Reads a cell value out of a row
pub type Accessor<R> = Arc<dyn Fn(&R) -> CellValue + Send + Sync>;

/// Builds an external link for a row (e.g. a token explorer page)
pub type LinkBuilder<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Yields the text fields the global search box matches against
pub type SearchFields<R> = Arc<dyn Fn(&R) -> Vec<&str> + Send + Sync>;

/// Label/value pairs shown when hovering a cell
pub type TooltipLines<R> = Arc<dyn Fn(&R) -> Vec<(String, String)> + Send + Sync>;

/// Definition of a single grid column
pub struct ColumnDef<R> {
    pub id: ColumnId,
    pub label: String,
    pub kind: ColumnKind,
    accessor: Option<Accessor<R>>,
    link: Option<LinkBuilder<R>>,
    tooltip: Option<TooltipLines<R>>,
    sort_type: Option<SortType>,
    sort_descending_first: bool,
    filter: Option<FilterKind>,
    options: Option<Vec<FacetOption>>,
    empty_option_label: Option<String>,
    can_hide: bool,
}

impl<R> ColumnDef<R> {
    /// Create a data column reading its value through `accessor`
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> CellValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ColumnKind::Text,
            accessor: Some(Arc::new(accessor)),
            link: None,
            tooltip: None,
            sort_type: None,
            sort_descending_first: false,
            filter: None,
            options: None,
            empty_option_label: None,
            can_hide: true,
        }
    }

    /// Create a display-only column (expander, details button) with no value
    pub fn display(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ColumnKind::Text,
            accessor: None,
            link: None,
            tooltip: None,
            sort_type: None,
            sort_descending_first: false,
            filter: None,
            options: None,
            empty_option_label: None,
            can_hide: false,
        }
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enable sorting with the given comparator
    pub fn sortable(mut self, sort_type: SortType) -> Self {
        self.sort_type = Some(sort_type);
        self
    }

    /// First header click sorts descending instead of ascending
    pub fn sort_descending_first(mut self) -> Self {
        self.sort_descending_first = true;
        self
    }

    /// Enable filtering with the given predicate family
    pub fn filterable(mut self, filter: FilterKind) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Fixed facet options instead of options derived from the rows
    pub fn options(mut self, options: Vec<FacetOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Add a facet option matching rows whose value is missing
    pub fn empty_option(mut self, label: impl Into<String>) -> Self {
        self.empty_option_label = Some(label.into());
        self
    }

    pub fn link<F>(mut self, builder: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.link = Some(Arc::new(builder));
        self
    }

    /// Attach hover details; display columns then show their label as text
    pub fn tooltip<F>(mut self, lines: F) -> Self
    where
        F: Fn(&R) -> Vec<(String, String)> + Send + Sync + 'static,
    {
        self.tooltip = Some(Arc::new(lines));
        self
    }

    pub fn hideable(mut self, can_hide: bool) -> Self {
        self.can_hide = can_hide;
        self
    }

    /// Read this column's value from a row
    pub fn value(&self, row: &R) -> CellValue {
        self.accessor
            .as_ref()
            .map(|accessor| accessor(row))
            .unwrap_or_default()
    }

    /// Format this column's value for display
    pub fn render(&self, row: &R) -> CellText {
        if self.accessor.is_none() && self.tooltip.is_some() {
            return CellText::plain(self.label.clone());
        }
        let mut text = format_cell(&self.kind, &self.value(row));
        text.href = self.link.as_ref().map(|link| link(row));
        text
    }

    /// Hover details for a row, if the column has any
    pub fn tooltip_lines(&self, row: &R) -> Option<Vec<(String, String)>> {
        self.tooltip.as_ref().map(|lines| lines(row))
    }

    pub fn has_value(&self) -> bool {
        self.accessor.is_some()
    }

    pub fn can_sort(&self) -> bool {
        self.accessor.is_some() && self.sort_type.is_some()
    }

    pub fn can_filter(&self) -> bool {
        self.accessor.is_some() && self.filter.is_some()
    }

    pub fn can_hide(&self) -> bool {
        self.can_hide
    }

    pub fn sort_type(&self) -> Option<SortType> {
        self.sort_type
    }

    pub fn starts_descending(&self) -> bool {
        self.sort_descending_first
    }

    pub fn filter_kind(&self) -> Option<&FilterKind> {
        self.filter.as_ref()
    }

    pub fn static_options(&self) -> Option<&[FacetOption]> {
        self.options.as_deref()
    }

    pub fn empty_option_label(&self) -> Option<&str> {
        self.empty_option_label.as_deref()
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind.clone(),
            accessor: self.accessor.clone(),
            link: self.link.clone(),
            tooltip: self.tooltip.clone(),
            sort_type: self.sort_type,
            sort_descending_first: self.sort_descending_first,
            filter: self.filter.clone(),
            options: self.options.clone(),
            empty_option_label: self.empty_option_label.clone(),
            can_hide: self.can_hide,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("sort_type", &self.sort_type)
            .field("filter", &self.filter)
            .field("can_hide", &self.can_hide)
            .finish()
    }
}

/// Ordered set of columns plus the global search fields
pub struct ColumnSet<R> {
    columns: Vec<ColumnDef<R>>,
    index: AHashMap<ColumnId, usize>,
    search: Option<SearchFields<R>>,
}

impl<R> ColumnSet<R> {
    pub fn new(columns: Vec<ColumnDef<R>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.id.clone(), idx))
            .collect();

        Self {
            columns,
            index,
            search: None,
        }
    }

    /// Set the fields the search box matches (may include nested fields)
    pub fn with_search<F>(mut self, fields: F) -> Self
    where
        F: Fn(&R) -> Vec<&str> + Send + Sync + 'static,
    {
        self.search = Some(Arc::new(fields));
        self
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDef<R>> {
        self.index.get(id).map(|&idx| &self.columns[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef<R>> {
        self.columns.iter()
    }

    /// Columns offering a filter in the toolbar
    pub fn filterable(&self) -> impl Iterator<Item = &ColumnDef<R>> {
        self.columns.iter().filter(|c| c.can_filter())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    /// Text fields of `row` the search box looks at
    pub fn search_fields<'a>(&self, row: &'a R) -> Vec<&'a str> {
        self.search
            .as_ref()
            .map(|fields| fields(row))
            .unwrap_or_default()
    }
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            index: self.index.clone(),
            search: self.search.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSet")
            .field("columns", &self.columns)
            .field("has_search", &self.search.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: String,
        volume: f64,
    }

    #[test]
    fn test_display_column_has_no_capabilities() {
        let column: ColumnDef<Row> = ColumnDef::display("details", "Details").sortable(SortType::Basic);
        assert!(!column.can_sort());
        assert!(!column.can_hide());
        assert_eq!(column.value(&Row { name: "a".into(), volume: 1.0 }), CellValue::Missing);
    }

    #[test]
    fn test_lookup_by_id() {
        let columns = ColumnSet::new(vec![
            ColumnDef::new("name", "Name", |r: &Row| CellValue::from(&r.name)),
            ColumnDef::new("volume", "Volume", |r: &Row| r.volume.into()).sortable(SortType::Basic),
        ]);

        let row = Row { name: "PEPE".into(), volume: 12.5 };
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.get("volume").map(|c| c.value(&row)), Some(CellValue::Number(12.5)));
        assert!(columns.get("missing").is_none());
        assert!(columns.get("volume").is_some_and(|c| c.can_sort()));
    }

    #[test]
    fn test_search_fields_default_empty() {
        let columns: ColumnSet<Row> = ColumnSet::new(Vec::new());
        let row = Row { name: "x".into(), volume: 0.0 };
        assert!(columns.search_fields(&row).is_empty());

        let columns: ColumnSet<Row> = ColumnSet::new(Vec::new()).with_search(|r: &Row| vec![r.name.as_str()]);
        assert_eq!(columns.search_fields(&row), vec!["x"]);
    }

    #[test]
    fn test_display_column_with_tooltip_renders_label() {
        let column: ColumnDef<Row> = ColumnDef::display("details", "Details")
            .tooltip(|r: &Row| vec![("Volume".to_string(), r.volume.to_string())]);
        let row = Row { name: "x".into(), volume: 2.5 };

        assert_eq!(column.render(&row).text, "Details");
        assert_eq!(column.tooltip_lines(&row), Some(vec![("Volume".to_string(), "2.5".to_string())]));
    }
}
