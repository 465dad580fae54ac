//! Central comparison UI: before/after slider over the derained result.

use super::colors::{accent, slider};
use super::{fit_within, format_file_size};
use crate::state::{Action, AppState, ComparisonState, PreviewHandle};
use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, RichText, Sense, Stroke, Vec2,
};
use egui_phosphor::regular as icons;

/// Label fade duration, in seconds.
const LABEL_FADE: f32 = 0.2;

/// Vertical room kept under the slider for the hint text.
const HINT_HEIGHT: f32 = 28.0;

pub fn render_comparison(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let ready = (
            state.source.current(),
            state.processing.result(),
            state.comparison.state(),
        );

        match ready {
            (Some(source), Some(result), Some(comparison)) if state.comparison_ready() => {
                ui.heading(RichText::new("Results").color(accent::TEAL));
                ui.separator();

                ui.vertical_centered(|ui| {
                    render_slider(ui, source.preview(), result.preview(), comparison, actions);
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(format!(
                            "Slide to compare the rainy and derained images  |  {:.1}s, {}",
                            result.elapsed().as_secs_f32(),
                            format_file_size(result.byte_len() as u64)
                        ))
                        .small()
                        .color(Color32::GRAY),
                    );
                });
            }
            _ => render_placeholder(ui, state),
        }
    });
}

/// Paint the original left of the divider and the result right of it.
fn render_slider(
    ui: &mut egui::Ui,
    before: &PreviewHandle,
    after: &PreviewHandle,
    comparison: &ComparisonState,
    actions: &mut Vec<Action>,
) {
    let max = ui.available_size() - egui::vec2(0.0, HINT_HEIGHT);
    let size = fit_within(before.size_vec2(), max, true);
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let rect = response.rect;

    if let Some(pointer) = response.interact_pointer_pos() {
        if rect.width() > 0.0 {
            let position = (pointer.x - rect.left()) / rect.width() * 100.0;
            if (position - comparison.position()).abs() > f32::EPSILON {
                actions.push(Action::SliderMoved(position));
            }
        }
    }
    if response.hovered() || response.dragged() {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
    }

    let split = comparison.fraction();
    let split_x = egui::lerp(rect.left()..=rect.right(), split);

    painter.image(
        before.id(),
        Rect::from_min_max(rect.min, Pos2::new(split_x, rect.max.y)),
        Rect::from_min_max(Pos2::ZERO, Pos2::new(split, 1.0)),
        Color32::WHITE,
    );
    painter.image(
        after.id(),
        Rect::from_min_max(Pos2::new(split_x, rect.min.y), rect.max),
        Rect::from_min_max(Pos2::new(split, 0.0), Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );

    // Divider and handle
    painter.line_segment(
        [
            Pos2::new(split_x, rect.top()),
            Pos2::new(split_x, rect.bottom()),
        ],
        Stroke::new(2.0, slider::DIVIDER),
    );
    let handle = Pos2::new(split_x, rect.center().y);
    painter.circle(handle, 14.0, slider::DIVIDER, Stroke::new(2.0, accent::TEAL));
    painter.text(
        handle,
        Align2::CENTER_CENTER,
        icons::ARROWS_LEFT_RIGHT,
        FontId::proportional(16.0),
        accent::TEAL_DARK,
    );

    let ctx = ui.ctx();
    let before_opacity = ctx.animate_bool_with_time(
        response.id.with("before_label"),
        comparison.before_label_visible(),
        LABEL_FADE,
    );
    let after_opacity = ctx.animate_bool_with_time(
        response.id.with("after_label"),
        comparison.after_label_visible(),
        LABEL_FADE,
    );

    let inset = Vec2::splat(12.0);
    paint_label(
        &painter,
        rect.left_top() + inset,
        Align2::LEFT_TOP,
        "Before",
        before_opacity,
    );
    paint_label(
        &painter,
        rect.right_top() + egui::vec2(-inset.x, inset.y),
        Align2::RIGHT_TOP,
        "After",
        after_opacity,
    );
}

/// Pill-shaped label anchored at `pos`, faded by `opacity`.
fn paint_label(painter: &Painter, pos: Pos2, align: Align2, text: &str, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }

    let padding = egui::vec2(10.0, 4.0);
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(13.0),
        slider::LABEL_TEXT.gamma_multiply(opacity),
    );
    let background = align.anchor_size(pos, galley.size() + padding * 2.0);

    painter.rect_filled(
        background,
        background.height() / 2.0,
        slider::LABEL_FILL.gamma_multiply(opacity),
    );
    painter.galley(background.min + padding, galley, slider::LABEL_TEXT);
}

fn render_placeholder(ui: &mut egui::Ui, state: &AppState) {
    let message = if let Some(elapsed) = state.processing.running_elapsed() {
        format!("Deraining... {:.1}s", elapsed.as_secs_f32())
    } else if state.processing.failure().is_some() {
        "Deraining failed. Press \"Derain Image\" to retry.".to_string()
    } else if let Some(image) = state.source.current() {
        format!("Press \"Derain Image\" to process {}", image.name())
    } else {
        "Drag & drop an image or click Choose File to begin".to_string()
    };

    ui.centered_and_justified(|ui| {
        ui.label(
            RichText::new(format!("{} {}", icons::CLOUD_RAIN, message))
                .size(16.0)
                .color(Color32::GRAY),
        );
    });
}

