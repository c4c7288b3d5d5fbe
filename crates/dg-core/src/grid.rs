//! Data grid orchestrator
//!
//! [`GridState`] holds every state slice of one grid instance. Changes go
//! through the pure [`reduce`] function; [`DataGrid`] owns the rows, the
//! column configuration and the current state, and recomputes the visible
//! window in the fixed order filter, sort, paginate.

use std::sync::Arc;

use ahash::AHashSet;
use tracing::{debug, info};

use crate::column::{ColumnId, ColumnSet};
use crate::events::{EventBus, FiltersReset, PageChanged, RowExpansionToggled, RowsReplaced, SortChanged};
use crate::expansion::ExpansionState;
use crate::facets::{derive_facet_options, facet_counts, FacetCache, FacetOption};
use crate::filter::{self, FilterState, FilterValue};
use crate::pagination::{self, PaginationState};
use crate::query;
use crate::row::{GridRow, NoDetail, RowId};
use crate::selection::{ColumnVisibility, RowSelection};
use crate::sort::{self, SortState};

/// Complete state of one grid instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridState {
    pub search: String,
    pub filters: FilterState,
    pub sort: SortState,
    pub pagination: PaginationState,
    pub expansion: ExpansionState,
    pub visibility: ColumnVisibility,
    pub selection: RowSelection,
}

impl GridState {
    /// Start with a different page size; zero is ignored
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if let Ok(pagination) = PaginationState::new(page_size) {
            self.pagination = pagination;
        }
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    /// Whether search text or any column filter is active
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || !self.filters.is_empty()
    }
}

/// A user interaction, applied by [`reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    SetSearch(String),
    SetFilter { column: ColumnId, value: FilterValue },
    ToggleFacetValue { column: ColumnId, value: String },
    ClearFilter(ColumnId),
    /// Clear search and column filters; sort, page, expansion and selection stay
    ResetFilters,
    /// Header activation: advance the column's sort cycle
    ToggleSort(ColumnId),
    SetSort(SortState),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    GoToPage(usize),
    SetPageSize(usize),
    ToggleExpanded(RowId),
    ToggleColumnVisibility(ColumnId),
    SetColumnVisibility { column: ColumnId, visible: bool },
    ShowAllColumns,
    ToggleRowSelected(RowId),
    SetRowsSelected { rows: Vec<RowId>, selected: bool },
    ClearSelection,
}

/// What [`reduce`] needs to know about the rows and columns
pub trait GridContext {
    /// Number of rows passing the state's search and filters
    fn filtered_len(&self, state: &GridState) -> usize;

    fn can_sort(&self, column: &str) -> bool;

    fn sorts_descending_first(&self, column: &str) -> bool;

    fn can_hide(&self, column: &str) -> bool;

    /// State for a nested grid opened for the first time
    fn fresh_nested_state(&self) -> GridState;
}

/// Apply an action, returning the next state. `state` is left untouched.
pub fn reduce(state: &GridState, action: &GridAction, ctx: &dyn GridContext) -> GridState {
    let mut next = state.clone();

    match action {
        GridAction::SetSearch(text) => {
            next.search = text.clone();
            clamp_page(&mut next, ctx);
        }
        GridAction::SetFilter { column, value } => {
            next.filters.set(column.clone(), value.clone());
            clamp_page(&mut next, ctx);
        }
        GridAction::ToggleFacetValue { column, value } => {
            next.filters.toggle_value(column, value);
            clamp_page(&mut next, ctx);
        }
        GridAction::ClearFilter(column) => {
            next.filters.remove(column);
            clamp_page(&mut next, ctx);
        }
        GridAction::ResetFilters => {
            next.search.clear();
            next.filters.clear();
            clamp_page(&mut next, ctx);
        }
        GridAction::ToggleSort(column) => {
            if ctx.can_sort(column) {
                next.sort = next.sort.toggled(column, ctx.sorts_descending_first(column));
            }
        }
        GridAction::SetSort(sort) => next.sort = sort.clone(),
        GridAction::FirstPage => next.pagination = next.pagination.first(),
        GridAction::PreviousPage => next.pagination = next.pagination.previous(),
        GridAction::NextPage => next.pagination = next.pagination.next(ctx.filtered_len(state)),
        GridAction::LastPage => next.pagination = next.pagination.last(ctx.filtered_len(state)),
        GridAction::GoToPage(index) => {
            next.pagination = next.pagination.go_to(*index, ctx.filtered_len(state));
        }
        GridAction::SetPageSize(size) => {
            next.pagination = next.pagination.with_page_size(*size, ctx.filtered_len(state));
        }
        GridAction::ToggleExpanded(row) => {
            next.expansion.toggle(row.clone(), || ctx.fresh_nested_state());
        }
        GridAction::ToggleColumnVisibility(column) => {
            if ctx.can_hide(column) {
                next.visibility.toggle(column);
            }
        }
        GridAction::SetColumnVisibility { column, visible } => {
            if *visible || ctx.can_hide(column) {
                next.visibility.set_visible(column.clone(), *visible);
            }
        }
        GridAction::ShowAllColumns => next.visibility.show_all(),
        GridAction::ToggleRowSelected(row) => next.selection.toggle(row.clone()),
        GridAction::SetRowsSelected { rows, selected } => {
            next.selection.set_many(rows.iter().cloned(), *selected);
        }
        GridAction::ClearSelection => next.selection.clear(),
    }

    next
}

fn clamp_page(state: &mut GridState, ctx: &dyn GridContext) {
    let total = ctx.filtered_len(state);
    state.pagination = state.pagination.clamped(total);
}

/// Row indices of the current page plus counts, after filter, sort, paginate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub indices: Vec<usize>,
    pub filtered_len: usize,
    /// Selected rows among the filtered ones
    pub selected_len: usize,
    pub page_index: usize,
    pub page_count: usize,
}

/// Run the pipeline for `state` over `rows`
pub fn project<R: GridRow>(rows: &[R], columns: &ColumnSet<R>, state: &GridState) -> Projection {
    let mut indices = filter::apply(rows, columns, &state.filters, &state.search);
    sort::apply(rows, columns, &state.sort, &mut indices);

    let filtered_len = indices.len();
    let selected_len = if state.selection.count() == 0 {
        0
    } else {
        indices
            .iter()
            .filter(|&&i| state.selection.is_selected(&rows[i].row_id()))
            .count()
    };
    let current = state.pagination.clamped(filtered_len);
    let page = pagination::apply(&indices, &current);

    Projection {
        indices: page.rows,
        filtered_len,
        selected_len,
        page_index: current.page_index(),
        page_count: page.page_count,
    }
}

/// [`GridContext`] over a row slice
struct RowsContext<'a, R> {
    rows: &'a [R],
    columns: &'a ColumnSet<R>,
    nested: Option<&'a GridState>,
}

impl<R> GridContext for RowsContext<'_, R> {
    fn filtered_len(&self, state: &GridState) -> usize {
        filter::apply(self.rows, self.columns, &state.filters, &state.search).len()
    }

    fn can_sort(&self, column: &str) -> bool {
        self.columns.get(column).is_some_and(|c| c.can_sort())
    }

    fn sorts_descending_first(&self, column: &str) -> bool {
        self.columns.get(column).is_some_and(|c| c.starts_descending())
    }

    fn can_hide(&self, column: &str) -> bool {
        self.columns.get(column).is_some_and(|c| c.can_hide())
    }

    fn fresh_nested_state(&self) -> GridState {
        self.nested.cloned().unwrap_or_default()
    }
}

/// How a parent row exposes its nested detail rows
pub struct DetailBinding<R, C> {
    columns: Arc<ColumnSet<C>>,
    rows: Arc<dyn Fn(&R) -> &[C] + Send + Sync>,
    initial_state: GridState,
}

impl<R, C> DetailBinding<R, C> {
    pub fn new<F>(columns: ColumnSet<C>, rows: F, initial_state: GridState) -> Self
    where
        F: Fn(&R) -> &[C] + Send + Sync + 'static,
    {
        Self {
            columns: Arc::new(columns),
            rows: Arc::new(rows),
            initial_state,
        }
    }

    pub fn columns(&self) -> &ColumnSet<C> {
        &self.columns
    }

    pub fn initial_state(&self) -> &GridState {
        &self.initial_state
    }

    pub fn rows_of<'a>(&self, parent: &'a R) -> &'a [C] {
        (self.rows)(parent)
    }
}

/// One rendered page
#[derive(Debug)]
pub struct GridPage<'a, R> {
    pub rows: Vec<&'a R>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub filtered_len: usize,
    pub total_len: usize,
    pub selected_count: usize,
}

impl<R> GridPage<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// e.g. `Page 2 of 3`
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count)
    }

    /// `25 row(s)`, or `1 of 25 row(s) selected.` once something is selected
    pub fn selection_label(&self) -> String {
        if self.selected_count == 0 {
            format!("{} row(s)", self.filtered_len)
        } else {
            format!("{} of {} row(s) selected.", self.selected_count, self.filtered_len)
        }
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// A grid instance: rows, columns and state
pub struct DataGrid<R: GridRow, C: GridRow = NoDetail> {
    name: String,
    rows: Arc<[R]>,
    generation: u64,
    columns: Arc<ColumnSet<R>>,
    state: GridState,
    facets: FacetCache,
    detail: Option<DetailBinding<R, C>>,
    events: Option<Arc<EventBus>>,
}

impl<R: GridRow, C: GridRow> DataGrid<R, C> {
    /// Mount a grid with default state
    pub fn new(name: impl Into<String>, columns: ColumnSet<R>, rows: Vec<R>) -> Self {
        Self {
            name: name.into(),
            rows: rows.into(),
            generation: 1,
            columns: Arc::new(columns),
            state: GridState::default(),
            facets: FacetCache::new(),
            detail: None,
            events: None,
        }
    }

    pub fn with_state(mut self, state: GridState) -> Self {
        self.state = state;
        self.state.pagination = self.state.pagination.clamped(self.filtered_len());
        self
    }

    /// Give rows a nested grid over their detail collection
    pub fn with_detail(mut self, detail: DetailBinding<R, C>) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Bumped every time the row set is replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn detail(&self) -> Option<&DetailBinding<R, C>> {
        self.detail.as_ref()
    }

    pub fn filtered_len(&self) -> usize {
        filter::apply(&self.rows, &self.columns, &self.state.filters, &self.state.search).len()
    }

    /// Apply a user interaction
    pub fn dispatch(&mut self, action: GridAction) {
        let ctx = RowsContext {
            rows: &self.rows,
            columns: &self.columns,
            nested: self.detail.as_ref().map(|d| &d.initial_state),
        };
        let next = reduce(&self.state, &action, &ctx);

        debug!("Grid '{}' applied {:?}", self.name, action);
        let previous = std::mem::replace(&mut self.state, next);
        self.publish_changes(&previous, &action);
    }

    fn publish_changes(&self, previous: &GridState, action: &GridAction) {
        let Some(events) = &self.events else {
            return;
        };
        let grid = self.name.clone();

        match action {
            GridAction::ResetFilters => events.publish(FiltersReset { grid: grid.clone() }),
            GridAction::ToggleExpanded(row) => events.publish(RowExpansionToggled {
                grid: grid.clone(),
                row: row.clone(),
                expanded: self.state.expansion.is_expanded(row),
            }),
            _ => {}
        }

        if previous.sort != self.state.sort {
            events.publish(SortChanged {
                grid: grid.clone(),
                sort: self.state.sort.clone(),
            });
        }

        if previous.pagination != self.state.pagination {
            events.publish(PageChanged {
                grid,
                page_index: self.state.pagination.page_index(),
                page_size: self.state.pagination.page_size(),
            });
        }
    }

    /// Apply an interaction to the nested grid of an expanded row.
    /// Ignored when the row is unknown or has never been expanded.
    pub fn dispatch_nested(&mut self, row: &RowId, action: GridAction) {
        let Some(binding) = self.detail.as_ref() else {
            return;
        };
        let Some(parent) = self.rows.iter().find(|r| r.row_id() == *row) else {
            return;
        };
        let ctx = RowsContext {
            rows: binding.rows_of(parent),
            columns: &binding.columns,
            nested: None,
        };
        if let Some(state) = self.state.expansion.nested_mut(row) {
            *state = reduce(state, &action, &ctx);
            debug!("Grid '{}' row {} nested applied {:?}", self.name, row, action);
        }
    }

    /// Swap in a freshly loaded row set.
    ///
    /// Facet options, expansion and the page index reset; filters and sort
    /// carry over; selection keeps only rows still present.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = rows.into();
        self.generation += 1;
        self.facets.clear();

        let present: AHashSet<RowId> = self.rows.iter().map(GridRow::row_id).collect();
        self.state.selection.retain(|row| present.contains(row));
        self.state.expansion.clear();
        self.state.pagination = self.state.pagination.first();

        info!(
            "Grid '{}' loaded {} rows (generation {})",
            self.name,
            self.rows.len(),
            self.generation
        );

        if let Some(events) = &self.events {
            events.publish(RowsReplaced {
                grid: self.name.clone(),
                row_count: self.rows.len(),
            });
        }
    }

    /// Current page after filter, sort and paginate
    pub fn page(&self) -> GridPage<'_, R> {
        let projection = project(&self.rows, &self.columns, &self.state);
        GridPage {
            rows: projection.indices.iter().map(|&i| &self.rows[i]).collect(),
            page_index: projection.page_index,
            page_count: projection.page_count,
            page_size: self.state.pagination.page_size(),
            filtered_len: projection.filtered_len,
            total_len: self.rows.len(),
            selected_count: projection.selected_len,
        }
    }

    /// Facet options for a column, derived from the unfiltered rows
    pub fn facet_options(&self, column: &str) -> Arc<Vec<FacetOption>> {
        self.facets.get_or_derive(self.generation, column, || {
            self.columns
                .get(column)
                .map(|c| derive_facet_options(&self.rows, c))
                .unwrap_or_default()
        })
    }

    /// Unfiltered row count per facet option of a column
    pub fn facet_counts(&self, column: &str) -> Arc<Vec<usize>> {
        self.facets.get_or_count(self.generation, column, || {
            let options = self.facet_options(column);
            match self.columns.get(column) {
                Some(c) => facet_counts(&self.rows, c, &options),
                None => vec![0; options.len()],
            }
        })
    }

    /// Number of detail rows under a row; missing lists count as empty
    pub fn detail_len(&self, row: &R) -> usize {
        self.detail.as_ref().map_or(0, |binding| binding.rows_of(row).len())
    }

    /// Current page of an expanded row's nested grid
    pub fn nested_page(&self, row: &RowId) -> Option<GridPage<'_, C>> {
        if !self.state.expansion.is_expanded(row) {
            return None;
        }
        let binding = self.detail.as_ref()?;
        let state = self.state.expansion.nested(row)?;
        let parent = self.rows.iter().find(|r| r.row_id() == *row)?;
        let detail_rows = binding.rows_of(parent);

        let projection = project(detail_rows, &binding.columns, state);
        Some(GridPage {
            rows: projection.indices.iter().map(|&i| &detail_rows[i]).collect(),
            page_index: projection.page_index,
            page_count: projection.page_count,
            page_size: state.pagination.page_size(),
            filtered_len: projection.filtered_len,
            total_len: detail_rows.len(),
            selected_count: projection.selected_len,
        })
    }

    /// Select or deselect every row on the current page
    pub fn select_page(&mut self, selected: bool) {
        let rows: Vec<RowId> = self.page().rows.iter().map(|r| r.row_id()).collect();
        self.dispatch(GridAction::SetRowsSelected { rows, selected });
    }

    /// Whether every row on the current page is selected
    pub fn is_page_selected(&self) -> bool {
        let page = self.page();
        !page.is_empty() && page.rows.iter().all(|r| self.state.selection.is_selected(&r.row_id()))
    }

    /// `query` with this grid's page size written to `perPage`
    pub fn per_page_query(&self, query: &str) -> String {
        query::with_per_page(query, self.state.pagination.page_size())
    }
}

impl<R: GridRow, C: GridRow> std::fmt::Debug for DataGrid<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("name", &self.name)
            .field("rows", &self.rows.len())
            .field("generation", &self.generation)
            .field("state", &self.state)
            .finish()
    }
}
