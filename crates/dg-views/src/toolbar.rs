//! Search box, filter menus, column menu and reset button

use dg_core::{ColumnDef, ColumnSet, DataGrid, FilterKind, FilterValue, GridAction, GridRow, GridState};
use egui::{Align, Layout, TextEdit, Ui};

const SEARCH_WIDTH: f32 = 220.0;
const TEXT_FILTER_WIDTH: f32 = 140.0;

/// Draw the toolbar above a grid
pub fn toolbar_ui<R: GridRow, C: GridRow>(ui: &mut Ui, grid: &DataGrid<R, C>, actions: &mut Vec<GridAction>) {
    let state = grid.state();

    ui.horizontal_wrapped(|ui| {
        if grid.columns().has_search() {
            search_box(ui, &state.search, actions);
        }

        for column in grid.columns().filterable() {
            match column.filter_kind() {
                Some(FilterKind::Text) => text_filter(ui, column, state, actions),
                Some(_) => facet_menu(ui, grid, column, actions),
                None => {}
            }
        }

        if state.is_filtered() && ui.button("Reset ✖").clicked() {
            actions.push(GridAction::ResetFilters);
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            column_menu(ui, grid.columns(), state, actions);
        });
    });
}

/// Global search input
pub fn search_box(ui: &mut Ui, search: &str, actions: &mut Vec<GridAction>) {
    let mut text = search.to_string();
    let response = ui.add(
        TextEdit::singleline(&mut text)
            .hint_text("Search...")
            .desired_width(SEARCH_WIDTH),
    );
    if response.changed() {
        actions.push(GridAction::SetSearch(text));
    }
}

/// Label of a facet menu button, with the number of selected values
pub fn facet_title(label: &str, selected: usize) -> String {
    if selected == 0 {
        format!("⊕ {label}")
    } else {
        format!("⊕ {label} ({selected})")
    }
}

fn facet_menu<R: GridRow, C: GridRow>(
    ui: &mut Ui,
    grid: &DataGrid<R, C>,
    column: &ColumnDef<R>,
    actions: &mut Vec<GridAction>,
) {
    let options = grid.facet_options(&column.id);
    let counts = grid.facet_counts(&column.id);
    let active = grid.state().filters.get(&column.id);
    let is_selected = |value: &str| active.is_some_and(|v| v.contains(value));
    let selected = options.iter().filter(|o| is_selected(&o.value)).count();

    ui.menu_button(facet_title(&column.label, selected), |ui| {
        if options.is_empty() {
            ui.weak("No options");
        }

        for (option, count) in options.iter().zip(counts.iter()) {
            ui.horizontal(|ui| {
                let mut checked = is_selected(&option.value);
                if ui.checkbox(&mut checked, option.label.as_str()).changed() {
                    actions.push(GridAction::ToggleFacetValue {
                        column: column.id.clone(),
                        value: option.value.clone(),
                    });
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.weak(count.to_string());
                });
            });
        }

        if selected > 0 {
            ui.separator();
            if ui.button("Clear filters").clicked() {
                actions.push(GridAction::ClearFilter(column.id.clone()));
                ui.close_menu();
            }
        }
    });
}

fn text_filter<R>(ui: &mut Ui, column: &ColumnDef<R>, state: &GridState, actions: &mut Vec<GridAction>) {
    let mut text = match state.filters.get(&column.id) {
        Some(FilterValue::Text(text)) => text.clone(),
        _ => String::new(),
    };
    let response = ui.add(
        TextEdit::singleline(&mut text)
            .hint_text(format!("Filter {}...", column.label.to_lowercase()))
            .desired_width(TEXT_FILTER_WIDTH),
    );
    if response.changed() {
        actions.push(if text.is_empty() {
            GridAction::ClearFilter(column.id.clone())
        } else {
            GridAction::SetFilter {
                column: column.id.clone(),
                value: FilterValue::Text(text),
            }
        });
    }
}

fn column_menu<R>(ui: &mut Ui, columns: &ColumnSet<R>, state: &GridState, actions: &mut Vec<GridAction>) {
    ui.menu_button("⚙ Columns", |ui| {
        for column in columns.iter().filter(|c| c.can_hide()) {
            let mut visible = state.visibility.is_visible(&column.id);
            if ui.checkbox(&mut visible, column.label.as_str()).changed() {
                actions.push(GridAction::SetColumnVisibility {
                    column: column.id.clone(),
                    visible,
                });
            }
        }

        if state.visibility.hidden_count() > 0 {
            ui.separator();
            if ui.button("Show All").clicked() {
                actions.push(GridAction::ShowAllColumns);
                ui.close_menu();
            }
        }
    });
}
