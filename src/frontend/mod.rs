//! Frontend module for the egui viewer
//!
//! The viewer receives loaded documents from the loader thread through
//! crossbeam channels and shows one card per document.
//!
//! # Main Types
//!
//! - [`WaveSenseApp`] - Main application state implementing [`eframe::App`]
//! - [`CardDeck`] - Open cards and the shared render settings
//! - [`PainterSurface`] - Renderer output drawn with an egui painter
//!
//! # Submodules
//!
//! - `card` - Card header, controls, canvas and tooltip
//! - `panels` - Settings, info panel, feature index, status bar
//! - [`state`] - egui-independent card state

mod card;
pub mod egui_surface;
mod panels;
pub mod state;

pub use egui_surface::PainterSurface;
pub use state::{AppAction, CardDeck, CardStatus, LoadRequest, WaveformCard};

use crate::config::{AppConfig, RenderConfig};
use crate::loader::LoaderBridge;
use panels::{FeatureIndexPanel, SettingsPanel, StatusBar};
use std::path::PathBuf;

/// File extensions offered when opening dumps
const DUMP_EXTENSIONS: &[&str] = &["txt", "log", "dump"];

/// Main application
pub struct WaveSenseApp {
    config: AppConfig,
    loader: LoaderBridge,
    deck: CardDeck,
    settings_open: bool,
    /// Render settings being edited, applied on change
    render_draft: RenderConfig,
}

impl WaveSenseApp {
    /// Create the app; `initial` paths are opened immediately
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        loader: LoaderBridge,
        initial: Vec<PathBuf>,
    ) -> Self {
        let deck = CardDeck::new(config.classifier.classifier(), config.render.clone());
        let mut app = Self {
            render_draft: deck.render_config().clone(),
            config,
            loader,
            deck,
            settings_open: false,
        };
        for path in initial {
            app.handle_action(AppAction::OpenDocument(path));
        }
        app
    }

    fn process_loader_messages(&mut self) -> bool {
        let messages = self.loader.drain();
        let had_messages = !messages.is_empty();

        for msg in messages {
            let requests = self.deck.handle_message(msg);
            for request in requests {
                self.request_load(request);
            }
        }

        had_messages
    }

    fn request_load(&mut self, request: LoadRequest) {
        if !self.loader.load_document(request.card_id, request.path.clone()) {
            tracing::error!("Loader unavailable, cannot load {:?}", request.path);
            if let Some(card) = self.deck.get_mut(request.card_id) {
                card.status = CardStatus::Failed("Loader is not running".to_string());
            }
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::OpenDocument(path) => {
                tracing::info!("Opening {:?}", path);
                let request = self.deck.open(path, None);
                self.request_load(request);
            }
            AppAction::OpenFeatureIndex(path) => {
                tracing::info!("Opening feature index {:?}", path);
                self.deck.clear_error();
                self.loader.load_feature_index(path);
            }
            AppAction::View { card, action } => self.deck.apply_view(card, action),
            AppAction::Reload(id) => {
                if let Some(request) = self.deck.reload(id) {
                    self.request_load(request);
                }
            }
            AppAction::Close(id) => {
                self.deck.close(id);
            }
            AppAction::Export(id) => {
                let Some(card) = self.deck.get_mut(id) else {
                    return;
                };
                let Some(path) = rfd::FileDialog::new()
                    .add_filter("WaveJSON", &["json"])
                    .set_file_name(card.export_file_name())
                    .save_file()
                else {
                    return;
                };
                if let Err(e) = card.export_to(&path, &self.config.export) {
                    tracing::warn!("Export failed: {}", e);
                }
            }
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Waveform...").clicked() {
                        if let Some(paths) = rfd::FileDialog::new()
                            .add_filter("Waveform dump", DUMP_EXTENSIONS)
                            .pick_files()
                        {
                            for path in paths {
                                self.handle_action(AppAction::OpenDocument(path));
                            }
                        }
                        ui.close();
                    }
                    if ui.button("Open Feature Index...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Markdown", &["md"])
                            .pick_file()
                        {
                            self.handle_action(AppAction::OpenFeatureIndex(path));
                        }
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Save Settings").clicked() {
                        self.save_config();
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.settings_open, "Render Settings").clicked() {
                        ui.close();
                    }
                });
            });
        });
    }

    fn save_config(&mut self) {
        self.config.render = self.deck.render_config().clone();
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }
}

impl eframe::App for WaveSenseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_loader_messages();
        let loading = self.deck.cards().iter().any(|c| c.is_loading());
        if had_messages || loading {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            StatusBar::render(ui, &self.deck);
        });

        if let Some((path, index)) = self.deck.feature_index() {
            egui::SidePanel::left("feature_index")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    FeatureIndexPanel::render(ui, path, index);
                });
        }

        if self.settings_open {
            let mut open = self.settings_open;
            let mut changed = false;
            egui::Window::new("Render Settings")
                .open(&mut open)
                .resizable(false)
                .show(ctx, |ui| {
                    changed = SettingsPanel::render(ui, &mut self.render_draft);
                });
            self.settings_open = open;
            if changed {
                self.deck.set_render_config(self.render_draft.clone());
            }
        }

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.deck.cards().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("File → Open Waveform... to load a dump");
                });
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                for card in self.deck.cards_mut() {
                    actions.extend(card::show_card(ui, card));
                    ui.add_space(8.0);
                }
            });
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.loader.shutdown();
    }
}
