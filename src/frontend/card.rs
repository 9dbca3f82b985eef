//! One waveform card: header, controls, canvas, tooltip and info panel

use egui::{Color32, RichText, Sense, Ui};

use crate::interaction::{InteractionController, ViewAction};
use crate::render::{Point, Surface};

use super::egui_surface::PainterSurface;
use super::panels::InfoPanelView;
use super::state::{AppAction, CardStatus, WaveformCard};

const VIEW_CONTROLS: [ViewAction; 5] = [
    ViewAction::ZoomIn,
    ViewAction::ZoomOut,
    ViewAction::Reset,
    ViewAction::PanLeft,
    ViewAction::PanRight,
];

/// Draw `card`; pointer events are applied directly, everything else is returned
pub fn show_card(ui: &mut Ui, card: &mut WaveformCard) -> Vec<AppAction> {
    let mut actions = Vec::new();

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());

        // === Header ===
        ui.horizontal(|ui| {
            ui.label(RichText::new(card.title()).strong());
            if let Some(feature) = &card.feature {
                ui.label(RichText::new(feature).italics().weak());
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").on_hover_text("Close").clicked() {
                    actions.push(AppAction::Close(card.id));
                }
                if ui.small_button("⟳").on_hover_text("Reload").clicked() {
                    actions.push(AppAction::Reload(card.id));
                }
                if let Some(loaded_at) = card.loaded_at {
                    ui.label(
                        RichText::new(format!("loaded {}", loaded_at.format("%H:%M:%S")))
                            .small()
                            .weak(),
                    );
                }
            });
        });

        let id = card.id;
        match &mut card.status {
            CardStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            CardStatus::Failed(error) => {
                ui.colored_label(Color32::LIGHT_RED, format!("⚠ {}", error));
            }
            CardStatus::Ready(controller) => {
                // === Controls ===
                ui.horizontal(|ui| {
                    for action in VIEW_CONTROLS {
                        if ui.button(action.display_name()).clicked() {
                            actions.push(AppAction::View { card: id, action });
                        }
                    }
                    ui.separator();
                    if ui.button("Export WaveJSON...").clicked() {
                        actions.push(AppAction::Export(id));
                    }
                    let view = controller.view();
                    let window = controller.visible_window();
                    ui.label(
                        RichText::new(format!(
                            "zoom {:.2}× · samples {}..{} of {}",
                            view.zoom_level,
                            window.start,
                            window.end(),
                            controller.document().sample_count()
                        ))
                        .small(),
                    );
                });

                show_canvas(ui, id, controller);

                if let Some(info) = controller.info_panel() {
                    InfoPanelView::render(ui, id, info);
                }
            }
        }

        if let Some(error) = &card.export_error {
            ui.colored_label(Color32::LIGHT_RED, format!("Export failed: {}", error));
        } else if let Some(path) = &card.last_export {
            ui.label(
                RichText::new(format!("Exported to {}", path.display()))
                    .small()
                    .weak(),
            );
        }
    });

    actions
}

fn show_canvas(ui: &mut Ui, card_id: u64, controller: &mut InteractionController) {
    let (width, height) = {
        let frame = controller.frame();
        (frame.width(), frame.height())
    };

    egui::ScrollArea::horizontal()
        .id_salt(("canvas", card_id))
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(egui::vec2(width, height), Sense::hover());
            let origin = response.rect.min;

            match response.hover_pos() {
                Some(pos) => {
                    controller.pointer_moved(Point::new(pos.x - origin.x, pos.y - origin.y));
                }
                None => {
                    controller.pointer_left();
                }
            }

            painter.rect_filled(response.rect, 2.0, ui.visuals().extreme_bg_color);
            let mut surface = PainterSurface::new(painter, origin, width, height);
            controller.frame().replay(&mut surface);

            if let Some(tooltip) = controller.tooltip() {
                if response.hovered() {
                    egui::Area::new(egui::Id::new(("tooltip", card_id)))
                        .order(egui::Order::Tooltip)
                        .fixed_pos(origin + egui::vec2(tooltip.anchor.x, tooltip.anchor.y))
                        .interactable(false)
                        .show(ui.ctx(), |ui| {
                            egui::Frame::popup(ui.style()).show(ui, |ui| {
                                ui.label(RichText::new(tooltip.text()).monospace());
                            });
                        });
                }
            }
        });
}
