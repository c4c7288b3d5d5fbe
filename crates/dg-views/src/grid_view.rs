//! Grid view implementation

use std::hash::Hash;
use std::ops::Range;

use dg_core::{
    ColumnDef, ColumnKind, ColumnSet, DataGrid, GridAction, GridPage, GridRow, GridState, RowId,
    DEFAULT_PAGE_SIZE_OPTIONS,
};
use egui::{Align, Button, Id, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBody, TableBuilder};
use tracing::trace;

use crate::cells::{self, sort_marker};
use crate::pagination::footer_ui;
use crate::toolbar::{search_box, toolbar_ui};

const HEADER_HEIGHT: f32 = 24.0;
const CHECKBOX_WIDTH: f32 = 28.0;
const EXPANDER_WIDTH: f32 = 32.0;
const FOOTER_HEIGHT: f32 = 36.0;

/// Configuration for grid views
#[derive(Debug, Clone)]
pub struct GridViewConfig {
    /// Leading checkbox column and selection summary
    pub selectable: bool,
    pub striped_rows: bool,
    pub row_height: f32,
    pub page_size_options: Vec<usize>,
    /// Page sizes offered under nested tables
    pub nested_page_size_options: Vec<usize>,
}

impl Default for GridViewConfig {
    fn default() -> Self {
        Self {
            selectable: true,
            striped_rows: true,
            row_height: 28.0,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            nested_page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

/// Draws a [`DataGrid`] with its toolbar, table, nested tables and footer
#[derive(Debug, Clone)]
pub struct GridView {
    id: Id,
    pub config: GridViewConfig,
}

/// What a single table draw needs, shared by the top-level and nested tables
struct TableLayout<'a, T> {
    columns: Vec<&'a ColumnDef<T>>,
    state: &'a GridState,
    selectable: bool,
    /// Present when rows can expand; yields the nested row count
    detail_len: Option<&'a dyn Fn(&T) -> usize>,
    row_height: f32,
    striped: bool,
}

impl GridView {
    pub fn new(id_source: impl Hash) -> Self {
        Self {
            id: Id::new(id_source),
            config: GridViewConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GridViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Draw the grid and apply the interactions recorded while drawing
    pub fn ui<R: GridRow, C: GridRow>(&self, ui: &mut Ui, grid: &mut DataGrid<R, C>) {
        let mut actions = Vec::new();
        let mut nested_actions = Vec::new();

        {
            let grid: &DataGrid<R, C> = grid;
            toolbar_ui(ui, grid, &mut actions);
            ui.add_space(4.0);

            let page = grid.page();
            let max_height = (ui.available_height() - FOOTER_HEIGHT).max(HEADER_HEIGHT);
            ScrollArea::both()
                .id_source(self.id.with("rows"))
                .auto_shrink([false, true])
                .max_height(max_height)
                .show(ui, |ui| {
                    self.table_ui(ui, grid, &page, &mut actions, &mut nested_actions);
                });

            ui.separator();
            footer_ui(
                ui,
                self.id.with("footer"),
                &page,
                &self.config.page_size_options,
                self.config.selectable,
                &mut actions,
            );
        }

        if !actions.is_empty() || !nested_actions.is_empty() {
            trace!(
                "Grid '{}' frame produced {} action(s), {} nested",
                grid.name(),
                actions.len(),
                nested_actions.len()
            );
        }
        for action in actions {
            grid.dispatch(action);
        }
        for (row, action) in nested_actions {
            grid.dispatch_nested(&row, action);
        }
    }

    fn table_ui<R: GridRow, C: GridRow>(
        &self,
        ui: &mut Ui,
        grid: &DataGrid<R, C>,
        page: &GridPage<'_, R>,
        actions: &mut Vec<GridAction>,
        nested_actions: &mut Vec<(RowId, GridAction)>,
    ) {
        let state = grid.state();
        let detail_len = |row: &R| grid.detail_len(row);
        let layout = TableLayout {
            columns: visible_columns(grid.columns(), state),
            state,
            selectable: self.config.selectable,
            detail_len: grid.detail().map(|_| &detail_len as &dyn Fn(&R) -> usize),
            row_height: self.config.row_height,
            striped: self.config.striped_rows,
        };

        let page_ids: Vec<RowId> = page.rows.iter().map(|r| r.row_id()).collect();
        let expanded: Vec<bool> = page_ids
            .iter()
            .map(|id| grid.detail().is_some() && state.expansion.is_expanded(id))
            .collect();

        // Each expanded row closes a table segment; its nested grid sits
        // between that segment and the next
        for (segment, range) in split_segments(&expanded).into_iter().enumerate() {
            let header = (segment == 0).then_some(page_ids.as_slice());
            ui.push_id(segment, |ui| {
                draw_table(ui, &layout, &page.rows[range.clone()], header, actions);
            });

            if let Some(last) = range.end.checked_sub(1).filter(|&i| expanded[i]) {
                self.nested_ui(ui, grid, &page_ids[last], nested_actions);
            }
        }

        if page.is_empty() {
            no_results(ui);
        }
    }

    fn nested_ui<R: GridRow, C: GridRow>(
        &self,
        ui: &mut Ui,
        grid: &DataGrid<R, C>,
        row: &RowId,
        nested_actions: &mut Vec<(RowId, GridAction)>,
    ) {
        let (Some(binding), Some(state), Some(page)) = (
            grid.detail(),
            grid.state().expansion.nested(row),
            grid.nested_page(row),
        ) else {
            return;
        };

        let mut actions = Vec::new();
        let layout = TableLayout {
            columns: visible_columns(binding.columns(), state),
            state,
            selectable: false,
            detail_len: None,
            row_height: self.config.row_height,
            striped: self.config.striped_rows,
        };
        let page_ids: Vec<RowId> = page.rows.iter().map(|r| r.row_id()).collect();

        egui::Frame::group(ui.style()).inner_margin(8.0).show(ui, |ui| {
            ui.push_id(row.as_str(), |ui| {
                if binding.columns().has_search() {
                    search_box(ui, &state.search, &mut actions);
                    ui.add_space(4.0);
                }

                draw_table(ui, &layout, &page.rows, Some(page_ids.as_slice()), &mut actions);
                if page.is_empty() {
                    no_results(ui);
                }

                footer_ui(
                    ui,
                    self.id.with(("nested", row.as_str())),
                    &page,
                    &self.config.nested_page_size_options,
                    false,
                    &mut actions,
                );
            });
        });

        nested_actions.extend(actions.into_iter().map(|action| (row.clone(), action)));
    }
}

fn visible_columns<'a, T>(columns: &'a ColumnSet<T>, state: &GridState) -> Vec<&'a ColumnDef<T>> {
    columns
        .iter()
        .filter(|c| !c.can_hide() || state.visibility.is_visible(&c.id))
        .collect()
}

/// Split a page into table segments, each ending at an expanded row. An
/// empty page still yields one (header-only) segment.
fn split_segments(expanded: &[bool]) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, &open) in expanded.iter().enumerate() {
        if open {
            segments.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < expanded.len() || segments.is_empty() {
        segments.push(start..expanded.len());
    }
    segments
}

/// Fixed column width; segments of one table must line up
fn column_width<T>(column: &ColumnDef<T>) -> f32 {
    if !column.has_value() {
        return if column.label.is_empty() { EXPANDER_WIDTH } else { 80.0 };
    }
    match column.kind {
        ColumnKind::Image => 64.0,
        ColumnKind::Badge(_) => 90.0,
        ColumnKind::Date => 180.0,
        ColumnKind::Link { .. } => 170.0,
        ColumnKind::Numeric { .. } | ColumnKind::Percent { .. } => 130.0,
        ColumnKind::Duration => 120.0,
        ColumnKind::Text | ColumnKind::Handle => 150.0,
    }
}

fn no_results(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui| {
        ui.weak("No results.");
    });
    ui.add_space(8.0);
}

fn draw_table<T: GridRow>(
    ui: &mut Ui,
    layout: &TableLayout<'_, T>,
    rows: &[&T],
    header: Option<&[RowId]>,
    actions: &mut Vec<GridAction>,
) {
    let mut builder = TableBuilder::new(ui)
        .striped(layout.striped)
        .resizable(false)
        .vscroll(false)
        .cell_layout(Layout::left_to_right(Align::Center));

    if layout.selectable {
        builder = builder.column(Column::exact(CHECKBOX_WIDTH));
    }
    for column in &layout.columns {
        builder = builder.column(Column::exact(column_width(column)).clip(true));
    }

    match header {
        Some(page_ids) => builder
            .header(HEADER_HEIGHT, |mut header| {
                if layout.selectable {
                    header.col(|ui| {
                        let mut all =
                            !page_ids.is_empty() && page_ids.iter().all(|id| layout.state.selection.is_selected(id));
                        if ui.checkbox(&mut all, "").on_hover_text("Select all").changed() {
                            actions.push(GridAction::SetRowsSelected {
                                rows: page_ids.to_vec(),
                                selected: all,
                            });
                        }
                    });
                }

                for column in &layout.columns {
                    header.col(|ui| {
                        if column.can_sort() {
                            let marker = sort_marker(layout.state.sort.direction_of(&column.id));
                            let title = RichText::new(format!("{} {}", column.label, marker)).strong();
                            if ui.add(Button::new(title).frame(false)).clicked() {
                                actions.push(GridAction::ToggleSort(column.id.clone()));
                            }
                        } else {
                            ui.strong(column.label.as_str());
                        }
                    });
                }
            })
            .body(|body| body_rows(body, layout, rows, actions)),
        None => builder.body(|body| body_rows(body, layout, rows, actions)),
    }
}

fn body_rows<T: GridRow>(mut body: TableBody<'_>, layout: &TableLayout<'_, T>, rows: &[&T], actions: &mut Vec<GridAction>) {
    for &row in rows {
        let id = row.row_id();
        body.row(layout.row_height, |mut table_row| {
            if layout.selectable {
                table_row.col(|ui| {
                    let mut checked = layout.state.selection.is_selected(&id);
                    if ui.checkbox(&mut checked, "").changed() {
                        actions.push(GridAction::ToggleRowSelected(id.clone()));
                    }
                });
            }

            for column in &layout.columns {
                table_row.col(|ui| cell(ui, layout, column, row, &id, actions));
            }
        });
    }
}

fn cell<T: GridRow>(
    ui: &mut Ui,
    layout: &TableLayout<'_, T>,
    column: &ColumnDef<T>,
    row: &T,
    id: &RowId,
    actions: &mut Vec<GridAction>,
) {
    let tooltip = column.tooltip_lines(row);

    if !column.has_value() && tooltip.is_none() {
        if let Some(detail_len) = layout.detail_len {
            let expanded = layout.state.expansion.is_expanded(id);
            let icon = if expanded { "▼" } else { "▶" };
            let response = ui
                .add(Button::new(icon).frame(false))
                .on_hover_text(format!("{} nested row(s)", detail_len(row)));
            if response.clicked() {
                actions.push(GridAction::ToggleExpanded(id.clone()));
            }
        }
        return;
    }

    let response = cells::cell_ui(ui, &column.render(row));
    if let Some(lines) = tooltip {
        response.on_hover_ui(|ui| cells::details_grid(ui, lines));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{CellValue, FilterKind};

    struct Row;

    #[test]
    fn test_empty_page_keeps_header_segment() {
        assert_eq!(split_segments(&[]), vec![0..0]);
    }

    #[test]
    fn test_segments_end_at_expanded_rows() {
        assert_eq!(split_segments(&[false, true, false]), vec![0..2, 2..3]);
        assert_eq!(split_segments(&[false, false, true]), vec![0..3]);
        assert_eq!(split_segments(&[true, true]), vec![0..1, 1..2]);
        assert_eq!(split_segments(&[false, false]), vec![0..2]);
    }

    #[test]
    fn test_hidden_columns_are_skipped_unless_pinned() {
        let columns: ColumnSet<Row> = ColumnSet::new(vec![
            ColumnDef::display("expander", ""),
            ColumnDef::new("chain", "Chain", |_: &Row| CellValue::from("solana")).filterable(FilterKind::MultiSelect),
            ColumnDef::new("avatar", "Avatar", |_: &Row| CellValue::Missing).hideable(false),
        ]);
        let mut state = GridState::default();
        state.visibility.set_visible("chain", false);
        state.visibility.set_visible("avatar", false);

        let ids: Vec<&str> = visible_columns(&columns, &state).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["expander", "avatar"]);
    }

    #[test]
    fn test_expander_column_is_narrow() {
        let expander: ColumnDef<Row> = ColumnDef::display("expander", "");
        let details: ColumnDef<Row> = ColumnDef::display("details", "Details");
        assert_eq!(column_width(&expander), EXPANDER_WIDTH);
        assert!(column_width(&details) > EXPANDER_WIDTH);
    }
}
