//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// Accent colors shared by both themes.
pub mod accent {
    use super::Color32;

    /// Teal used for headings, the drop target and the slider handle.
    pub const TEAL: Color32 = Color32::from_rgb(20, 184, 166);
    /// Darker teal for emphasized text on light backgrounds.
    pub const TEAL_DARK: Color32 = Color32::from_rgb(13, 148, 136);
}

/// Inline error box.
pub mod error {
    use super::Color32;

    pub const FILL: Color32 = Color32::from_rgb(254, 226, 226);
    pub const TEXT: Color32 = Color32::from_rgb(185, 28, 28);
}

/// Comparison slider overlay.
pub mod slider {
    use super::Color32;

    /// Divider line and handle fill.
    pub const DIVIDER: Color32 = Color32::WHITE;
    /// Label pill background at full opacity.
    pub const LABEL_FILL: Color32 = Color32::from_black_alpha(128);
    pub const LABEL_TEXT: Color32 = Color32::WHITE;
}

/// Neutral border for the idle drop zone.
pub const DROP_ZONE_IDLE: Color32 = Color32::from_rgb(160, 160, 160);
