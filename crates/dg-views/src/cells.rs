//! Cell widgets

use dg_core::{CellText, SortDirection, Tone};
use egui::{Align, Color32, Layout, Response, RichText, Stroke, Ui};

/// Header marker for a column's sort state
pub fn sort_marker(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Ascending) => "▲",
        Some(SortDirection::Descending) => "▼",
        None => "↕",
    }
}

/// Draw formatted cell content
pub fn cell_ui(ui: &mut Ui, cell: &CellText) -> Response {
    let layout = if cell.align_right {
        Layout::right_to_left(Align::Center)
    } else {
        Layout::left_to_right(Align::Center)
    };

    ui.with_layout(layout, |ui| {
        let response = match (&cell.href, cell.tone) {
            (Some(href), _) => ui.hyperlink_to(cell.text.as_str(), href),
            (None, Tone::Normal) => ui.label(cell.text.as_str()),
            (None, Tone::Muted) => ui.label(RichText::new(cell.text.as_str()).weak()),
            (None, tone) => badge(ui, &cell.text, tone),
        };
        match &cell.full_text {
            Some(full) => response.on_hover_text(full.as_str()),
            None => response,
        }
    })
    .inner
}

/// Rounded coloured label
pub fn badge(ui: &mut Ui, text: &str, tone: Tone) -> Response {
    let (fill, text_color, stroke) = badge_colors(tone, ui);
    egui::Frame::none()
        .fill(fill)
        .stroke(stroke)
        .rounding(8.0)
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| ui.label(RichText::new(text).color(text_color).small()))
        .response
}

fn badge_colors(tone: Tone, ui: &Ui) -> (Color32, Color32, Stroke) {
    let visuals = ui.visuals();
    match tone {
        Tone::Success => (Color32::from_rgb(22, 163, 74), Color32::WHITE, Stroke::NONE),
        Tone::Destructive => (Color32::from_rgb(220, 38, 38), Color32::WHITE, Stroke::NONE),
        Tone::Gold => (Color32::from_rgb(234, 179, 8), Color32::BLACK, Stroke::NONE),
        Tone::Silver => (Color32::from_rgb(156, 163, 175), Color32::BLACK, Stroke::NONE),
        Tone::Bronze => (Color32::from_rgb(180, 83, 9), Color32::WHITE, Stroke::NONE),
        Tone::Outline | Tone::Normal | Tone::Muted => (
            Color32::TRANSPARENT,
            visuals.text_color(),
            visuals.widgets.noninteractive.bg_stroke,
        ),
    }
}

/// Two-column label/value grid for hover details
pub fn details_grid(ui: &mut Ui, lines: Vec<(String, String)>) {
    egui::Grid::new("cell_details")
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            for (label, value) in lines {
                ui.strong(label);
                ui.label(value);
                ui.end_row();
            }
        });
}
