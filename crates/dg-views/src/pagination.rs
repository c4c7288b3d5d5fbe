//! Pagination footer

use dg_core::{GridAction, GridPage};
use egui::{Align, Button, Id, Layout, Ui};

/// Page sizes offered by the selector; the current size is always listed
pub fn page_size_choices(current: usize, options: &[usize]) -> Vec<usize> {
    let mut choices = options.to_vec();
    if !choices.contains(&current) {
        choices.push(current);
        choices.sort_unstable();
    }
    choices
}

/// Draw the footer: selection summary, page size selector, page label and
/// navigation buttons
pub fn footer_ui<T>(
    ui: &mut Ui,
    id: Id,
    page: &GridPage<'_, T>,
    options: &[usize],
    show_selection: bool,
    actions: &mut Vec<GridAction>,
) {
    ui.horizontal(|ui| {
        if show_selection {
            ui.weak(page.selection_label());
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let can_previous = page.can_previous();
            let can_next = page.can_next();

            if ui
                .add_enabled(can_next, Button::new("»"))
                .on_hover_text("Go to last page")
                .clicked()
            {
                actions.push(GridAction::LastPage);
            }
            if ui
                .add_enabled(can_next, Button::new("›"))
                .on_hover_text("Go to next page")
                .clicked()
            {
                actions.push(GridAction::NextPage);
            }
            if ui
                .add_enabled(can_previous, Button::new("‹"))
                .on_hover_text("Go to previous page")
                .clicked()
            {
                actions.push(GridAction::PreviousPage);
            }
            if ui
                .add_enabled(can_previous, Button::new("«"))
                .on_hover_text("Go to first page")
                .clicked()
            {
                actions.push(GridAction::FirstPage);
            }

            ui.label(page.page_label());
            ui.separator();
            page_size_selector(ui, id, page.page_size, options, actions);
            ui.label("Rows per page");
        });
    });
}

fn page_size_selector(ui: &mut Ui, id: Id, current: usize, options: &[usize], actions: &mut Vec<GridAction>) {
    let mut selected = current;
    egui::ComboBox::from_id_source(id.with("page_size"))
        .selected_text(current.to_string())
        .width(64.0)
        .show_ui(ui, |ui| {
            for size in page_size_choices(current, options) {
                ui.selectable_value(&mut selected, size, size.to_string());
            }
        });

    if selected != current {
        actions.push(GridAction::SetPageSize(selected));
    }
}
