//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use eframe::egui::{self, Context};
use tracing::{debug, error, info};

use dg_core::events::{FiltersReset, PageChanged, RowsReplaced};
use dg_core::{DataGrid, EventBus};
use dg_data::catalog::{kol_detail_binding, kol_token_columns, signal_columns, token_columns};
use dg_data::{
    EnvelopeSource, GridConfig, GridConfigFile, GridSettings, JsonFileSource, KolDetail, KolTokenRow,
    SignalSummaryResponse, TokenRow, TokenSummaryResponse,
};
use dg_views::{GridView, GridViewConfig};

mod pages;

use pages::{startup_page_size, GridPanel, SignalPage};

const TOKENS_QUERY_KEY: &str = "tokens.query";
const SIGNALS_QUERY_KEY: &str = "signals.query";
const KOLS_QUERY_KEY: &str = "kols.query";

/// Token, signal and KOL analytics grids
#[derive(Parser, Debug)]
#[command(name = "tokengrid", version, about)]
struct Args {
    /// Token rows as JSON: an array, or an object with a `tokens`/`data` array
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Saved token-summary API response
    #[arg(long, conflicts_with = "tokens")]
    token_summary: Option<PathBuf>,

    /// Saved signal-summary API response
    #[arg(long)]
    signals: Option<PathBuf>,

    /// KOL token rows as JSON
    #[arg(long)]
    kols: Option<PathBuf>,

    /// Rows per page for every grid, as a `perPage` value
    #[arg(long)]
    per_page: Option<String>,

    /// Grid settings file
    #[arg(long, default_value = "tokengrid.json")]
    config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Tokens,
    Signals,
    Kols,
}

/// Main application state
struct TokenGridApp {
    tab: Tab,
    tokens: GridPanel<TokenRow>,
    signals: SignalPage,
    kols: GridPanel<KolTokenRow, KolDetail>,

    config: GridConfig,
    config_path: PathBuf,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    /// Egui context
    egui_ctx: egui::Context,
}

impl TokenGridApp {
    fn new(cc: &eframe::CreationContext<'_>, args: Args, config: GridConfig, runtime: tokio::runtime::Runtime) -> Self {
        let events = Arc::new(EventBus::new());
        subscribe_logging(&events);

        let stored = |key: &str| cc.storage.and_then(|s| s.get_string(key)).unwrap_or_default();
        let per_page = args.per_page.as_deref();
        let today = chrono::Utc::now().date_naive();

        let tokens_query = stored(TOKENS_QUERY_KEY);
        let tokens = DataGrid::new("tokens", token_columns(today), Vec::new())
            .with_state(initial_state(&config.tokens, per_page, &tokens_query))
            .with_event_bus(Arc::clone(&events));
        let tokens = GridPanel::new(tokens, view("tokens", &config.tokens, &config.kol_details), tokens_query);

        let signals_query = stored(SIGNALS_QUERY_KEY);
        let signals = DataGrid::new("signals", signal_columns(), Vec::new())
            .with_state(initial_state(&config.signals, per_page, &signals_query))
            .with_event_bus(Arc::clone(&events));
        let signals = SignalPage::new(GridPanel::new(
            signals,
            view("signals", &config.signals, &config.kol_details),
            signals_query,
        ));

        let kols_query = stored(KOLS_QUERY_KEY);
        let kols = DataGrid::new("kol-tokens", kol_token_columns(), Vec::new())
            .with_state(initial_state(&config.kol_tokens, per_page, &kols_query))
            .with_detail(kol_detail_binding(config.kol_details.page_size))
            .with_event_bus(events);
        let kols = GridPanel::new(kols, view("kol-tokens", &config.kol_tokens, &config.kol_details), kols_query);

        let mut app = Self {
            tab: Tab::Tokens,
            tokens,
            signals,
            kols,
            config,
            config_path: args.config.clone(),
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
        };

        if let Some(path) = args.tokens {
            app.open_tokens(path);
        }
        if let Some(path) = args.token_summary {
            app.open_token_summary(path);
        }
        if let Some(path) = args.signals {
            app.open_signals(path);
        }
        if let Some(path) = args.kols {
            app.open_kols(path);
        }

        app
    }

    fn open_tokens(&mut self, path: PathBuf) {
        let source: JsonFileSource<TokenRow> = JsonFileSource::new(path);
        self.tokens
            .load(self.runtime.handle(), &self.egui_ctx, Box::new(source));
        self.tab = Tab::Tokens;
    }

    fn open_token_summary(&mut self, path: PathBuf) {
        let source: EnvelopeSource<TokenSummaryResponse> = EnvelopeSource::new(path);
        self.tokens
            .load(self.runtime.handle(), &self.egui_ctx, Box::new(source));
        self.tab = Tab::Tokens;
    }

    fn open_signals(&mut self, path: PathBuf) {
        let source: EnvelopeSource<SignalSummaryResponse> = EnvelopeSource::new(path);
        self.signals
            .panel
            .load(self.runtime.handle(), &self.egui_ctx, Box::new(source));
        self.tab = Tab::Signals;
    }

    fn open_kols(&mut self, path: PathBuf) {
        let source: JsonFileSource<KolTokenRow> = JsonFileSource::new(path);
        self.kols
            .load(self.runtime.handle(), &self.egui_ctx, Box::new(source));
        self.tab = Tab::Kols;
    }

    /// Write the current page sizes back to the settings file
    fn save_settings(&mut self) {
        self.config.tokens.page_size = self.tokens.grid.state().pagination.page_size();
        self.config.signals.page_size = self.signals.panel.grid.state().pagination.page_size();
        self.config.kol_tokens.page_size = self.kols.grid.state().pagination.page_size();

        let result = self
            .config
            .validate()
            .and_then(|_| GridConfigFile::save(&self.config_path, &self.config));
        if let Err(e) = result {
            error!("Failed to save grid settings: {}", e);
        }
    }

    /// Handle menu actions
    fn handle_menu(&mut self) {
        let ctx = self.egui_ctx.clone();
        egui::TopBottomPanel::top("menu_bar").show(&ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Tokens...").clicked() {
                        if let Some(path) = pick_json() {
                            self.open_tokens(path);
                        }
                        ui.close_menu();
                    }

                    if ui.button("Open Token Summary...").clicked() {
                        if let Some(path) = pick_json() {
                            self.open_token_summary(path);
                        }
                        ui.close_menu();
                    }

                    if ui.button("Open Signal Summary...").clicked() {
                        if let Some(path) = pick_json() {
                            self.open_signals(path);
                        }
                        ui.close_menu();
                    }

                    if ui.button("Open KOL Tokens...").clicked() {
                        if let Some(path) = pick_json() {
                            self.open_kols(path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Save Grid Settings").clicked() {
                        self.save_settings();
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.selectable_value(&mut self.tab, Tab::Tokens, "Tokens");
                ui.selectable_value(&mut self.tab, Tab::Signals, "Signals");
                ui.selectable_value(&mut self.tab, Tab::Kols, "KOL Trades");
            });
        });
    }
}

impl eframe::App for TokenGridApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.tokens.poll();
        self.signals.poll();
        self.kols.poll();

        // Menu bar
        self.handle_menu();

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Tokens => self.tokens.ui(ui),
            Tab::Signals => self.signals.ui(ui),
            Tab::Kols => self.kols.ui(ui),
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(TOKENS_QUERY_KEY, self.tokens.persisted_query());
        storage.set_string(SIGNALS_QUERY_KEY, self.signals.panel.persisted_query());
        storage.set_string(KOLS_QUERY_KEY, self.kols.persisted_query());
    }
}

fn initial_state(settings: &GridSettings, per_page: Option<&str>, stored_query: &str) -> dg_core::GridState {
    let page_size = startup_page_size(per_page, Some(stored_query), settings);
    settings.initial_state().with_page_size(page_size)
}

fn view(name: &str, settings: &GridSettings, nested: &GridSettings) -> GridView {
    GridView::new(name).with_config(GridViewConfig {
        page_size_options: settings.page_size_options.clone(),
        nested_page_size_options: nested.page_size_options.clone(),
        ..Default::default()
    })
}

fn pick_json() -> Option<PathBuf> {
    rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file()
}

fn subscribe_logging(events: &EventBus) {
    events.subscribe(|e: &RowsReplaced| debug!("Grid '{}' now holds {} rows", e.grid, e.row_count));
    events.subscribe(|e: &PageChanged| {
        debug!("Grid '{}' on page {} ({} per page)", e.grid, e.page_index + 1, e.page_size)
    });
    events.subscribe(|e: &FiltersReset| info!("Grid '{}' filters reset", e.grid));
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Starting tokengrid");

    let config = GridConfigFile::load(&args.config).unwrap_or_else(|e| {
        error!("Falling back to default grid settings: {}", e);
        GridConfig::default()
    });
    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };

    eframe::run_native(
        "tokengrid",
        options,
        Box::new(move |cc| Box::new(TokenGridApp::new(cc, args, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
