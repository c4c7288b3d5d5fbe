//! Dashboard pages: a grid, its view and the slot its rows load into

use std::sync::Arc;

use dg_core::query::{initial_page_size, PER_PAGE_PARAM};
use dg_core::{DataGrid, GridRow, NoDetail};
use dg_data::{available_dates, load_or_empty, rows_for_date, GridSettings, RowSource, SignalRow};
use dg_views::GridView;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::info;

/// Rows handed from a loading task to the UI thread
pub type Slot<T> = Arc<Mutex<Option<Vec<T>>>>;

/// Page size to start a grid with: `--per-page`, else the stored query,
/// else the configured size
pub fn startup_page_size(cli: Option<&str>, stored_query: Option<&str>, settings: &GridSettings) -> usize {
    let fallback = initial_page_size(stored_query, settings.page_size);
    let cli_query = cli.map(|value| format!("{PER_PAGE_PARAM}={value}"));
    initial_page_size(cli_query.as_deref(), fallback)
}

/// A grid together with its view and pending rows
pub struct GridPanel<R: GridRow, C: GridRow = NoDetail> {
    pub grid: DataGrid<R, C>,
    view: GridView,
    slot: Slot<R>,
    loading: bool,
    /// Query string the page size is persisted into
    query: String,
}

impl<R: GridRow, C: GridRow> GridPanel<R, C> {
    pub fn new(grid: DataGrid<R, C>, view: GridView, query: String) -> Self {
        Self {
            grid,
            view,
            slot: Arc::new(Mutex::new(None)),
            loading: false,
            query,
        }
    }

    /// Load rows on the runtime; they are picked up by [`Self::take_loaded`]
    pub fn load(&mut self, runtime: &Handle, ctx: &egui::Context, source: Box<dyn RowSource<R>>) {
        info!("Loading '{}' from {}", self.grid.name(), source.source_name());
        self.loading = true;

        let slot = Arc::clone(&self.slot);
        let ctx = ctx.clone();
        runtime.spawn(async move {
            let rows = load_or_empty(source.as_ref()).await;
            *slot.lock() = Some(rows);
            ctx.request_repaint();
        });
    }

    /// Rows finished loading since the last call
    pub fn take_loaded(&mut self) -> Option<Vec<R>> {
        let rows = self.slot.lock().take();
        if rows.is_some() {
            self.loading = false;
        }
        rows
    }

    /// Swap in finished rows, if any
    pub fn poll(&mut self) {
        if let Some(rows) = self.take_loaded() {
            self.grid.replace_rows(rows);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Stored query with this grid's current page size
    pub fn persisted_query(&self) -> String {
        self.grid.per_page_query(&self.query)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        if self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }
        self.view.ui(ui, &mut self.grid);
    }
}

/// Signal grid, showing one store date at a time
pub struct SignalPage {
    pub panel: GridPanel<SignalRow>,
    rows: Vec<SignalRow>,
    dates: Vec<String>,
    selected: Option<String>,
}

impl SignalPage {
    pub fn new(panel: GridPanel<SignalRow>) -> Self {
        Self {
            panel,
            rows: Vec::new(),
            dates: Vec::new(),
            selected: None,
        }
    }

    pub fn poll(&mut self) {
        if let Some(rows) = self.panel.take_loaded() {
            self.receive(rows);
        }
    }

    /// Take a new row set, keeping the selected date when it still exists
    pub fn receive(&mut self, rows: Vec<SignalRow>) {
        self.dates = available_dates(&rows);
        self.rows = rows;
        let keep = self.selected.as_ref().is_some_and(|d| self.dates.contains(d));
        if !keep {
            self.selected = self.dates.first().cloned();
        }
        self.apply_date();
    }

    pub fn select_date(&mut self, date: &str) {
        if self.selected.as_deref() != Some(date) {
            self.selected = Some(date.to_string());
            self.apply_date();
        }
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    fn apply_date(&mut self) {
        let rows = match &self.selected {
            Some(date) => rows_for_date(&self.rows, date),
            None => Vec::new(),
        };
        self.panel.grid.replace_rows(rows);
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let mut chosen = None;
        ui.horizontal(|ui| {
            ui.label("Date");
            egui::ComboBox::from_id_source("signal_date")
                .selected_text(self.selected.as_deref().unwrap_or("No dates"))
                .show_ui(ui, |ui| {
                    for date in &self.dates {
                        if ui
                            .selectable_label(self.selected.as_ref() == Some(date), date.as_str())
                            .clicked()
                        {
                            chosen = Some(date.clone());
                        }
                    }
                });
        });
        if let Some(date) = chosen {
            self.select_date(&date);
        }

        ui.add_space(4.0);
        self.panel.ui(ui);
    }
}
