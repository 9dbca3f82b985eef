//! Panel components for the viewer
//!
//! - [`SettingsPanel`] - Render inputs (sample cap, surface width)
//! - [`InfoPanelView`] - Values of every signal at the hovered sample
//! - [`FeatureIndexPanel`] - Features from an opened index
//! - [`StatusBar`] - Card counts and the last app-level error

use std::path::Path;

use egui::{Color32, RichText, Ui};

use crate::config::{RenderConfig, MIN_SURFACE_WIDTH};
use crate::interaction::InfoPanel;
use crate::loader::{CardId, FeatureIndex};
use crate::render::palette;

use super::egui_surface::to_color32;
use super::state::CardDeck;

/// Render settings editor
pub struct SettingsPanel;

impl SettingsPanel {
    /// Edit `render` in place; returns true when a value changed
    pub fn render(ui: &mut Ui, render: &mut RenderConfig) -> bool {
        let mut changed = false;
        egui::Grid::new("render_settings")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Visible samples:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut render.sample_cap)
                            .range(1..=1_000_000)
                            .speed(5.0),
                    )
                    .on_hover_text("Samples shown at zoom level 1")
                    .changed();
                ui.end_row();

                ui.label("Surface width:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut render.surface_width)
                            .range(MIN_SURFACE_WIDTH..=8000.0)
                            .suffix(" px"),
                    )
                    .changed();
                ui.end_row();
            });
        changed
    }
}

/// Hovered-sample readout under a canvas
pub struct InfoPanelView;

impl InfoPanelView {
    pub fn render(ui: &mut Ui, card_id: CardId, info: &InfoPanel) {
        ui.label(
            RichText::new(format!("Sample {} at t = {}", info.sample, info.time))
                .small()
                .strong(),
        );
        egui::Grid::new(("info_panel", card_id))
            .striped(true)
            .num_columns(4)
            .show(ui, |ui| {
                for entry in &info.entries {
                    ui.colored_label(to_color32(palette::trace(entry.kind)), "●");
                    ui.label(&entry.name);
                    ui.label(RichText::new(&entry.value).monospace());
                    ui.label(RichText::new(entry.kind.display_name()).small().weak());
                    ui.end_row();
                }
            });
    }
}

/// Features listed by a loaded index
pub struct FeatureIndexPanel;

impl FeatureIndexPanel {
    pub fn render(ui: &mut Ui, path: &Path, index: &FeatureIndex) {
        ui.heading("Features");
        ui.label(RichText::new(path.display().to_string()).small().weak());
        ui.separator();

        if index.is_empty() {
            ui.label("No features reference a waveform");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in &index.entries {
                egui::CollapsingHeader::new(&entry.feature)
                    .default_open(true)
                    .show(ui, |ui| {
                        for file in &entry.files {
                            let name = file
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_default();
                            ui.label(RichText::new(name).monospace().small())
                                .on_hover_text(file.display().to_string());
                        }
                    });
            }
        });
    }
}

/// Bottom bar
pub struct StatusBar;

impl StatusBar {
    pub fn render(ui: &mut Ui, deck: &CardDeck) {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 8.0;

            let cards = deck.cards();
            let loading = cards.iter().filter(|c| c.is_loading()).count();
            let failed = cards.iter().filter(|c| c.error().is_some()).count();

            ui.label(RichText::new(format!("Cards: {}", cards.len())).small());
            ui.separator();

            let loading_color = if loading > 0 {
                Color32::YELLOW
            } else {
                Color32::GRAY
            };
            ui.colored_label(loading_color, RichText::new(format!("Loading: {}", loading)).small());
            ui.separator();

            let failed_color = if failed > 0 {
                Color32::LIGHT_RED
            } else {
                Color32::GRAY
            };
            ui.colored_label(failed_color, RichText::new(format!("Failed: {}", failed)).small());

            let render = deck.render_config();
            ui.separator();
            ui.label(
                RichText::new(format!(
                    "{} samples @ {:.0} px",
                    render.sample_cap, render.surface_width
                ))
                .small(),
            );

            if let Some(error) = deck.last_error() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(Color32::RED, RichText::new(error).small());
                });
            }
        });
    }
}
