//! Main application entry point

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use eframe::egui::{self, Context, Ui};
use parking_lot::{Mutex, RwLock};
use serde_json::json;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use lh_core::events::events::{HistogramComputed, SplitRequested, ViewCleared, ViewFiltered};
use lh_core::{handler_from_fn, EventBus};
use lh_data::{load_dataset, Dataset, DatasetConfig};
use lh_views::{
    HistogramConfig, Panel, PanelContext, SharedViewHost, StackedHistogramPanel, ViewSlot, PANEL_NAME, RESET_ACTION,
};

mod demo;
mod samples;
mod viewport;

use viewport::Viewport;

#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Dataset file (JSON, JSON lines or CSV)
    input: Option<PathBuf>,

    /// Histogram settings as JSON
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Field to count on startup
    #[arg(long, short)]
    field: Option<String>,

    /// Start with the demo dataset
    #[arg(long)]
    demo: bool,
}

/// Main application state
struct LabelHistogramApp {
    /// Dock layout with the histogram panel and its companion
    viewport: Viewport,

    /// Shared view slot, host operations and event bus
    panel_ctx: PanelContext,

    host: Arc<SharedViewHost>,

    /// Status line, fed by panel events
    status: Arc<Mutex<String>>,

    /// A dataset was just installed and panels haven't loaded yet
    pending_load: bool,
}

impl LabelHistogramApp {
    fn new(cc: &eframe::CreationContext<'_>, args: Args, config: HistogramConfig) -> Self {
        let view: ViewSlot = Arc::new(RwLock::new(None));
        let host = Arc::new(SharedViewHost::new(view.clone()));
        let events = EventBus::new();
        let status = Arc::new(Mutex::new(String::from("No dataset loaded")));
        subscribe_status(&events, &status);

        let mut panel = StackedHistogramPanel::new(config);
        if let Some(state) = cc
            .storage
            .and_then(|storage| eframe::get_value::<serde_json::Value>(storage, PANEL_NAME))
        {
            debug!("Restoring panel state {}", state);
            panel.load_state(state);
        }
        if let Some(field) = &args.field {
            panel.load_state(json!({ "target_field": field }));
        }

        let mut viewport = Viewport::new();
        viewport.add_panel(Box::new(panel));

        let mut app = Self {
            viewport,
            panel_ctx: PanelContext::new(view, host.clone(), events),
            host,
            status,
            pending_load: false,
        };

        if let Some(path) = args.input {
            app.open_dataset(path);
        } else if args.demo {
            app.open_demo();
        }
        app
    }

    /// Install a dataset as the current view
    fn set_dataset(&mut self, dataset: Dataset) {
        info!("Loaded dataset '{}' with {} samples", dataset.name(), dataset.len());
        *self.status.lock() = format!("Loaded '{}' ({} samples)", dataset.name(), dataset.len());
        *self.panel_ctx.view.write() = Some(Box::new(dataset.into_view()));
        self.pending_load = true;
    }

    fn open_dataset(&mut self, path: PathBuf) {
        info!("Opening dataset: {:?}", path);
        match DatasetConfig::for_file(path.clone()).and_then(|config| load_dataset(&config)) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                error!("Failed to open dataset {:?}: {}", path, e);
                *self.status.lock() = format!("Failed to open {}: {}", path.display(), e);
            }
        }
    }

    fn open_demo(&mut self) {
        match demo::demo_dataset() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => error!("Failed to build demo dataset: {}", e),
        }
    }

    fn pick_dataset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Datasets", &["json", "jsonl", "ndjson", "csv"])
            .pick_file()
        {
            self.open_dataset(path);
        }
    }

    fn reset_charts(&mut self) {
        let failure = self
            .viewport
            .notify(&self.panel_ctx, |panel, ctx| panel.on_user_action(ctx, RESET_ACTION));
        self.report(failure);
    }

    fn report(&self, failure: Option<lh_views::PanelError>) {
        if let Some(e) = failure {
            *self.status.lock() = format!("Error: {}", e);
        }
    }

    /// Handle menu actions
    fn handle_menu(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Dataset...").clicked() {
                        ui.close_menu();
                        self.pick_dataset();
                    }
                    if ui.button("Demo Dataset").clicked() {
                        ui.close_menu();
                        self.open_demo();
                    }

                    ui.separator();

                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let has_data = self.panel_ctx.view.read().is_some();
                    if ui.add_enabled(has_data, egui::Button::new("Reset Charts")).clicked() {
                        ui.close_menu();
                        self.reset_charts();
                    }
                });
            });
        });
    }

    /// Show welcome screen
    fn show_welcome_screen(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading(egui::RichText::new("Label Histogram").size(36.0).strong());
            ui.label(
                egui::RichText::new("Count label values and click a bar to filter the samples")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(30.0);

            ui.horizontal(|ui| {
                if ui
                    .button("Demo Dataset")
                    .on_hover_text("Explore synthetic detections")
                    .clicked()
                {
                    self.open_demo();
                }
                if ui
                    .button("Open Dataset")
                    .on_hover_text("Load JSON, JSON lines or CSV samples")
                    .clicked()
                {
                    self.pick_dataset();
                }
            });
        });
    }
}

/// Mirror panel events on the status line
fn subscribe_status(events: &EventBus, status: &Arc<Mutex<String>>) {
    let line = status.clone();
    events.subscribe::<HistogramComputed>(handler_from_fn(move |event| {
        if let Some(e) = event.as_any().downcast_ref::<HistogramComputed>() {
            *line.lock() = format!("{}: {} values in {} buckets", e.field, e.total, e.buckets);
        }
    }));

    let line = status.clone();
    events.subscribe::<ViewFiltered>(handler_from_fn(move |event| {
        if let Some(e) = event.as_any().downcast_ref::<ViewFiltered>() {
            *line.lock() = format!("Filtered by {}: {} samples", e.filter, e.matching);
        }
    }));

    let line = status.clone();
    events.subscribe::<ViewCleared>(handler_from_fn(move |_| {
        *line.lock() = String::from("Filter cleared");
    }));

    events.subscribe::<SplitRequested>(handler_from_fn(|event| {
        if let Some(e) = event.as_any().downcast_ref::<SplitRequested>() {
            debug!("Panel '{}' requested companion '{}'", e.panel, e.companion);
        }
    }));
}

fn load_histogram_config(path: &Path) -> Result<HistogramConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

impl eframe::App for LabelHistogramApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if std::mem::take(&mut self.pending_load) {
            let failure = self.viewport.notify(&self.panel_ctx, |panel, ctx| panel.on_load(ctx));
            self.report(failure);
        }

        self.handle_menu(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status.lock().as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.panel_ctx.view.read().is_none() {
                self.show_welcome_screen(ui);
            } else {
                self.viewport.ui(ui, &self.panel_ctx);
            }
        });

        // Panels replaced the view while drawing
        if self.host.take_view_changed() {
            let failure = self.viewport.notify(&self.panel_ctx, |panel, ctx| panel.on_change_view(ctx));
            self.report(failure);
            ctx.request_repaint();
        }

        for (name, layout) in self.host.take_split_requests() {
            self.viewport.open_companion(&name, layout);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        for panel in self.viewport.panels() {
            eframe::set_value(storage, &panel.config().name, &panel.save_state());
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_histogram_config(path)?,
        None => HistogramConfig::default(),
    };

    info!("Starting label histogram");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Label Histogram",
        options,
        Box::new(move |cc| Box::new(LabelHistogramApp::new(cc, args, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
