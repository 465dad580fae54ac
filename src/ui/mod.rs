//! UI modules for the deraining workbench.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, status, and theme toggle
//! - Upload panel: Drop zone, file picker, preview and submit
//! - Central comparison: Before/after slider over the result
//!
//! Panels only read the state; user input is pushed as actions and
//! dispatched by the application after rendering.

mod colors;
mod comparison;
mod top_bar;
mod upload_panel;

pub use comparison::render_comparison;
pub use top_bar::render_top_bar;
pub use upload_panel::{render_drop_overlay, render_upload_panel};

use eframe::egui::Vec2;

/// Scale `size` to fit inside `max`, keeping its aspect ratio.
///
/// Images are only enlarged when `upscale` is set.
pub(crate) fn fit_within(size: Vec2, max: Vec2, upscale: bool) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 || max.x <= 0.0 || max.y <= 0.0 {
        return Vec2::ZERO;
    }

    let mut scale = (max.x / size.x).min(max.y / size.y);
    if !upscale {
        scale = scale.min(1.0);
    }
    size * scale
}

/// Human-readable byte count.
pub(crate) fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
