use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, Ui};

use claims_explorer::config::AppConfig;
use claims_explorer::data::loader::DatasetCache;
use claims_explorer::data::model::Table;
use claims_explorer::state::UiState;
use claims_explorer::view::ViewCache;

use crate::ui::panels::{self, TopBarAction};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ClaimsExplorerApp {
    config: AppConfig,
    cache: DatasetCache,
    /// Set after a failed load; cleared by "Retry" so the file is not
    /// re-read every frame.
    load_error: Option<String>,
    state: Option<UiState>,
    view: ViewCache,
    status_message: Option<String>,
}

impl ClaimsExplorerApp {
    pub fn new(config: AppConfig, cache: DatasetCache) -> Self {
        Self {
            config,
            cache,
            load_error: None,
            state: None,
            view: ViewCache::default(),
            status_message: None,
        }
    }

    fn table(&mut self) -> Option<Arc<Table>> {
        if self.load_error.is_some() {
            return None;
        }
        match self.cache.get() {
            Ok(table) => Some(table),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.load_error = Some(e.to_string());
                None
            }
        }
    }

    /// Switch to another dataset; widget state starts over.
    fn open(&mut self, path: PathBuf) {
        log::info!("Opening {}", path.display());
        self.cache = DatasetCache::new(path);
        self.load_error = None;
        self.state = None;
        self.view = ViewCache::default();
        self.status_message = None;
    }

    fn load_error_screen(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(40.0);
            ui.heading("The dataset could not be loaded");
            if let Some(msg) = &self.load_error {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            ui.label(format!("Path: {}", self.cache.path().display()));
            if ui.button("Retry").clicked() {
                self.load_error = None;
            }
        });
    }
}

impl eframe::App for ClaimsExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, self.cache.path(), &self.status_message))
            .inner;
        if let TopBarAction::Open(path) = action {
            self.open(path);
        }

        let Some(table) = self.table() else {
            egui::CentralPanel::default().show(ctx, |ui| self.load_error_screen(ui));
            return;
        };

        let config = &self.config;
        let state = self.state.get_or_insert_with(|| UiState::new(&table, config));

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &table, state);
            });

        // ---- Re-run the pipeline when any widget changed ----
        let output = self.view.refresh(&table, state);

        // ---- Central panel: view ----
        let status = &mut self.status_message;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match output {
                    Some(Ok(output)) => panels::view(ui, output, status),
                    Some(Err(e)) => {
                        ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
                    }
                    None => {}
                });
        });
    }
}
