//! Top bar UI: app title, hemisphere controls, and status.

use super::colors;
use crate::state::{AppState, Opacity};
use eframe::egui::{self, Color32, RichText};

/// A control interaction for the app to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// The opacity slider moved
    OpacityChanged(Opacity),
    /// The toggle button was pressed
    Toggle,
    /// The user asked for an SVG copy of the map
    CopySvg,
}

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) -> Vec<ControlEvent> {
    let mut events = Vec::new();

    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new("Hemisphere Workbench")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                ui.label(RichText::new("Opacity:").size(12.0).color(colors::ui::LABEL));
                let mut opacity = state.view.opacity.get();
                let response = ui.add(
                    egui::Slider::new(&mut opacity, 0.0..=1.0)
                        .step_by(0.01)
                        .fixed_decimals(2),
                );
                if response.changed() {
                    events.push(ControlEvent::OpacityChanged(Opacity::new(opacity)));
                }

                if ui
                    .button(format!("{} Toggle", egui_phosphor::regular::ARROWS_CLOCKWISE))
                    .on_hover_text("Swap the primary and secondary hemispheres")
                    .clicked()
                {
                    events.push(ControlEvent::Toggle);
                }

                if ui
                    .button(format!("{} Copy SVG", egui_phosphor::regular::COPY))
                    .on_hover_text("Copy the current map as SVG")
                    .clicked()
                {
                    events.push(ControlEvent::CopySvg);
                }

                ui.separator();

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(colors::ui::VALUE),
                );
            });
        });

    events
}
