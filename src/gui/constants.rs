//! GUI-specific constants for layout and status colors

use egui;

/// Manager window dimensions
pub const WINDOW_WIDTH: f32 = 540.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const WINDOW_MIN_WIDTH: f32 = 440.0;
pub const WINDOW_MIN_HEIGHT: f32 = 520.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// Badge colors for the per-section visibility state
pub const BADGE_VISIBLE: egui::Color32 = egui::Color32::from_rgb(0, 160, 0);
pub const BADGE_HIDDEN: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
