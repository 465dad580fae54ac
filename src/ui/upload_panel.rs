//! Upload panel UI: drop zone, file picker, preview and submit.

use super::colors::{self, accent};
use super::{fit_within, format_file_size};
use crate::state::{Action, AppState, SourceImage};
use eframe::egui::{self, Align2, Color32, FontId, RichText, Stroke};
use egui_phosphor::regular as icons;

/// Preview height limit inside the panel.
const PREVIEW_MAX_HEIGHT: f32 = 256.0;

pub fn render_upload_panel(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    egui::SidePanel::left("upload_panel")
        .resizable(true)
        .default_width(320.0)
        .min_width(260.0)
        .max_width(480.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Upload Rainy Image").color(accent::TEAL));
                ui.separator();

                render_drop_zone(ui, state, actions);
                ui.add_space(10.0);

                if let Some(image) = state.source.current() {
                    render_preview(ui, state, image);
                    ui.add_space(10.0);
                }

                render_submit(ui, state, actions);

                if let Some(error) = state.visible_error() {
                    ui.add_space(10.0);
                    render_error(ui, &error.to_string());
                }
            });
        });
}

fn render_drop_zone(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    let dragging = state.acquisition.is_dragging();
    let stroke_color = if dragging {
        accent::TEAL
    } else {
        colors::DROP_ZONE_IDLE
    };

    egui::Frame::group(ui.style())
        .stroke(Stroke::new(2.0, stroke_color))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                let prompt = if dragging {
                    "Drop the image here!"
                } else {
                    "Drag & drop an image or click to select"
                };
                ui.label(RichText::new(prompt).size(14.0));
                ui.add_space(8.0);

                let picking = state.acquisition.is_picker_open();
                ui.add_enabled_ui(!picking, |ui| {
                    if ui
                        .button(format!("{} Choose File", icons::UPLOAD_SIMPLE))
                        .clicked()
                    {
                        actions.push(Action::PickRequested);
                    }
                });

                if picking {
                    ui.add_space(5.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Selecting file...");
                    });
                }
            });
        });
}

fn render_preview(ui: &mut egui::Ui, state: &AppState, image: &SourceImage) {
    let preview = image.preview();
    let max = egui::vec2(ui.available_width(), PREVIEW_MAX_HEIGHT);
    let size = fit_within(preview.size_vec2(), max, false);

    let response = ui
        .vertical_centered(|ui| ui.add(egui::Image::new((preview.id(), size))))
        .inner;

    if let Some(elapsed) = state.processing.running_elapsed() {
        let rect = response.rect;
        ui.painter()
            .rect_filled(rect, 8.0, Color32::from_black_alpha(150));

        let spinner_rect = egui::Rect::from_center_size(
            rect.center() - egui::vec2(0.0, 14.0),
            egui::Vec2::splat(32.0),
        );
        ui.put(spinner_rect, egui::Spinner::new().size(32.0).color(accent::TEAL));

        ui.painter().text(
            rect.center() + egui::vec2(0.0, 20.0),
            Align2::CENTER_CENTER,
            format!("Processing... Please wait ({:.1}s)", elapsed.as_secs_f32()),
            FontId::proportional(14.0),
            Color32::WHITE,
        );
    }

    let [width, height] = preview.dimensions();
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("{} {}", icons::IMAGE, image.name()))
                .strong()
                .monospace(),
        );
    });
    ui.label(
        RichText::new(format!(
            "{}x{} px, {}",
            width,
            height,
            format_file_size(image.byte_len() as u64)
        ))
        .small()
        .color(Color32::GRAY),
    );
}

fn render_submit(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    let running = state.processing.is_running();
    let label = if running {
        "Processing..."
    } else {
        "Derain Image"
    };

    let button = egui::Button::new(RichText::new(label).strong().size(15.0))
        .min_size(egui::vec2(ui.available_width(), 36.0));
    if ui.add_enabled(!running, button).clicked() {
        actions.push(Action::Submit);
    }

    if !state.source.is_empty() {
        ui.add_space(5.0);
        ui.vertical_centered(|ui| {
            if ui.small_button("Clear").clicked() {
                actions.push(Action::Reset);
            }
        });
    }
}

fn render_error(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(colors::error::FILL)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(format!("{} {}", icons::WARNING, message))
                    .color(colors::error::TEXT),
            );
        });
}

/// Full-window hint painted while a file is dragged over the application.
pub fn render_drop_overlay(ctx: &egui::Context, state: &AppState) {
    if !state.acquisition.is_dragging() {
        return;
    }

    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("drop_overlay"),
    ));
    let screen = ctx.screen_rect();
    painter.rect_filled(screen, 0.0, Color32::from_black_alpha(160));
    painter.text(
        screen.center(),
        Align2::CENTER_CENTER,
        "Drop the image here!",
        FontId::proportional(24.0),
        accent::TEAL,
    );
}
