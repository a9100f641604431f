use eframe::egui::Color32;

use crate::explorer::categories::{GENERAL_REGION, UNCLASSIFIED};
use crate::util::stable_hash;

pub const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub const GRID: Color32 = Color32::from_rgb(60, 70, 80);
pub const UNKNOWN: Color32 = Color32::from_rgb(128, 132, 140);
pub const SELECTED: Color32 = Color32::from_rgb(245, 206, 93);
pub const SEARCH_MATCH: Color32 = Color32::from_rgb(103, 196, 255);
pub const HOVERED: Color32 = Color32::from_rgb(255, 164, 101);
pub const CARD_FILL: Color32 = Color32::from_rgb(32, 37, 45);
pub const TEXT: Color32 = Color32::from_gray(238);
pub const TEXT_MUTED: Color32 = Color32::from_gray(165);
pub const OUTLINE: Color32 = Color32::from_rgba_premultiplied(15, 15, 15, 190);

const CATEGORY_COLORS: [Color32; 12] = [
    Color32::from_rgb(86, 156, 214),
    Color32::from_rgb(214, 132, 86),
    Color32::from_rgb(120, 190, 120),
    Color32::from_rgb(200, 110, 170),
    Color32::from_rgb(222, 192, 96),
    Color32::from_rgb(96, 196, 196),
    Color32::from_rgb(170, 140, 220),
    Color32::from_rgb(226, 112, 112),
    Color32::from_rgb(150, 176, 80),
    Color32::from_rgb(90, 120, 200),
    Color32::from_rgb(206, 160, 130),
    Color32::from_rgb(128, 200, 160),
];

/// Stable color for a category key; fallback buckets get the neutral gray.
pub fn category_color(key: &str) -> Color32 {
    if key.is_empty() || key == UNCLASSIFIED || key == GENERAL_REGION {
        return UNKNOWN;
    }
    CATEGORY_COLORS[(stable_hash(key) % CATEGORY_COLORS.len() as u64) as usize]
}

pub fn tint(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    base.lerp_to_gamma(overlay, amount.clamp(0.0, 1.0))
}

/// Pulls a record color toward the canvas background.
pub fn recede(color: Color32, amount: f32) -> Color32 {
    color.lerp_to_gamma(BACKGROUND, amount.clamp(0.0, 1.0))
}

pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}
