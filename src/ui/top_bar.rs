//! Top bar UI: app title, status, and theme toggle.

use super::colors::accent;
use crate::state::{Action, AppState};
use eframe::egui::{self, Align, Color32, Layout, RichText};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(40.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(format!(
                        "{} Adaptive Hybrid Enhancement Network",
                        icons::CLOUD_RAIN
                    ))
                    .strong()
                    .size(16.0)
                    .color(accent::TEAL),
                );
                ui.label(
                    RichText::new("for Single Image Deraining")
                        .size(13.0)
                        .color(accent::TEAL_DARK),
                );

                ui.separator();

                // Phase and status text
                ui.label(
                    RichText::new(state.processing.phase().label())
                        .size(12.0)
                        .strong()
                        .color(accent::TEAL),
                );
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = if state.settings.dark_mode {
                        format!("{} Light Mode", icons::SUN)
                    } else {
                        format!("{} Dark Mode", icons::MOON)
                    };
                    if ui.button(label).clicked() {
                        actions.push(Action::ToggleTheme);
                    }
                });
            });
        });
}
