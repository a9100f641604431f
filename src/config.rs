use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub viewport: ViewportConfig,
    pub index: IndexConfig,
    pub layout: LayoutConfig,
    pub lod: LodConfig,
    pub render: RenderConfig,
    pub categories: CategoryConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_zoom: f32,
    /// Fraction of the remaining distance covered per frame.
    pub smoothing: f32,
    pub epsilon: f32,
    pub animation_ms: f64,
    pub key_pan_step_px: f32,
    pub key_zoom_step: f32,
    pub wheel_sensitivity: f32,
    pub scene_padding: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.02,
            max_zoom: 8.0,
            initial_zoom: 0.12,
            smoothing: 0.22,
            epsilon: 0.0005,
            animation_ms: 650.0,
            key_pan_step_px: 120.0,
            key_zoom_step: 1.25,
            wheel_sensitivity: 0.0018,
            scene_padding: 400.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub max_items_per_node: usize,
    pub max_depth: usize,
    pub bounds_padding: f32,
    pub min_extent: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_items_per_node: 12,
            max_depth: 10,
            bounds_padding: 50.0,
            min_extent: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineFill {
    #[default]
    Grid,
    Ring,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub seed: u64,
    pub base_radius: f32,
    pub ring_spacing: f32,
    pub jitter: f32,
    pub cell_spacing: f32,
    pub cluster_gap: f32,
    pub spiral_tightness: f32,
    pub spiral_scale: f32,
    pub timeline_fill: TimelineFill,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 0x4b4d_1912,
            base_radius: 60.0,
            ring_spacing: 48.0,
            jitter: 6.0,
            cell_spacing: 46.0,
            cluster_gap: 320.0,
            spiral_tightness: 0.35,
            spiral_scale: 7.5,
            timeline_fill: TimelineFill::Grid,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Lower zoom bounds of the chip, thumbnail, card and detail tiers.
    pub thresholds: [f32; 4],
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            thresholds: [0.35, 0.9, 1.8, 3.6],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub grid_min_zoom: f32,
    pub grid_fade_span: f32,
    pub grid_spacing: f32,
    pub hit_radius_px: f32,
    pub minimap_size: [f32; 2],
    pub minimap_margin: f32,
    pub drag_threshold_px: f32,
    pub double_click_secs: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grid_min_zoom: 0.5,
            grid_fade_span: 1.5,
            grid_spacing: 100.0,
            hit_radius_px: 10.0,
            minimap_size: [200.0, 150.0],
            minimap_margin: 12.0,
            drag_threshold_px: 4.0,
            double_click_secs: 0.35,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub min_crime_support: usize,
    pub historical_span: [i32; 2],
    pub estimate_missing_years: bool,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            min_crime_support: 5,
            historical_span: [1850, 1950],
            estimate_missing_years: true,
        }
    }
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Repairs values that would break the engine's invariants.
    pub fn sanitized(mut self) -> Self {
        let viewport = &mut self.viewport;
        if !(viewport.min_zoom.is_finite() && viewport.min_zoom > 0.0) {
            warn!(min_zoom = viewport.min_zoom, "min_zoom must be positive; using default");
            viewport.min_zoom = ViewportConfig::default().min_zoom;
        }
        if !(viewport.max_zoom.is_finite() && viewport.max_zoom > viewport.min_zoom) {
            warn!(max_zoom = viewport.max_zoom, "max_zoom must exceed min_zoom; adjusting");
            viewport.max_zoom = (viewport.min_zoom * 400.0).max(ViewportConfig::default().max_zoom);
        }
        viewport.initial_zoom = viewport.initial_zoom.clamp(viewport.min_zoom, viewport.max_zoom);
        if !(viewport.smoothing > 0.0 && viewport.smoothing <= 1.0) {
            warn!(smoothing = viewport.smoothing, "smoothing must lie in (0, 1]; using default");
            viewport.smoothing = ViewportConfig::default().smoothing;
        }
        viewport.epsilon = viewport.epsilon.abs().max(f32::EPSILON);
        if !(viewport.scene_padding.is_finite() && viewport.scene_padding >= 0.0) {
            warn!(
                scene_padding = viewport.scene_padding,
                "scene_padding must not be negative; using 0"
            );
            viewport.scene_padding = 0.0;
        }

        if self.index.max_items_per_node == 0 {
            warn!("max_items_per_node must be at least 1");
            self.index.max_items_per_node = 1;
        }
        self.index.min_extent = self.index.min_extent.max(1.0);

        let (min_zoom, max_zoom) = (self.viewport.min_zoom, self.viewport.max_zoom);
        let thresholds = &mut self.lod.thresholds;
        if !lod_thresholds_fit(thresholds, min_zoom, max_zoom) {
            let defaults = LodConfig::default().thresholds;
            let replacement = if lod_thresholds_fit(&defaults, min_zoom, max_zoom) {
                defaults
            } else {
                geometric_thresholds(min_zoom, max_zoom)
            };
            warn!(
                ?thresholds,
                ?replacement,
                "LOD thresholds must ascend strictly inside the zoom range; replacing"
            );
            *thresholds = replacement;
        }

        let [start, end] = self.categories.historical_span;
        if start >= end {
            warn!(start, end, "historical span is empty; using defaults");
            self.categories.historical_span = CategoryConfig::default().historical_span;
        }

        self
    }
}

/// Every tier gets a non-empty band of `[min_zoom, max_zoom]`.
fn lod_thresholds_fit(thresholds: &[f32; 4], min_zoom: f32, max_zoom: f32) -> bool {
    thresholds.windows(2).all(|pair| pair[0] < pair[1])
        && thresholds
            .iter()
            .all(|value| value.is_finite() && *value > min_zoom && *value < max_zoom)
}

/// Splits the zoom range into five bands of equal zoom ratio.
fn geometric_thresholds(min_zoom: f32, max_zoom: f32) -> [f32; 4] {
    let ratio = max_zoom / min_zoom;
    std::array::from_fn(|slot| min_zoom * ratio.powf((slot + 1) as f32 / 5.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::lod::{LodBands, LodTier};

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "index": { "max_depth": 5 } }"#).expect("valid json");
        assert_eq!(config.index.max_depth, 5);
        assert_eq!(config.index.max_items_per_node, 12);
        assert_eq!(config.categories.min_crime_support, 5);
    }

    #[test]
    fn sanitized_repairs_inverted_zoom_range() {
        let mut config = ExplorerConfig::default();
        config.viewport.min_zoom = 2.0;
        config.viewport.max_zoom = 1.0;
        let config = config.sanitized();
        assert!(config.viewport.max_zoom > config.viewport.min_zoom);
        assert!(config.viewport.initial_zoom >= config.viewport.min_zoom);
    }

    #[test]
    fn sanitized_rejects_unordered_lod_thresholds() {
        let mut config = ExplorerConfig::default();
        config.lod.thresholds = [1.0, 0.5, 2.0, 3.0];
        let config = config.sanitized();
        assert_eq!(config.lod.thresholds, LodConfig::default().thresholds);
    }

    #[test]
    fn sanitized_fits_lod_thresholds_into_a_narrow_zoom_range() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "viewport": { "max_zoom": 2.0 } }"#).expect("valid json");
        let config = config.sanitized();
        let (min_zoom, max_zoom) = (config.viewport.min_zoom, config.viewport.max_zoom);

        let thresholds = config.lod.thresholds;
        assert!(thresholds.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(thresholds.iter().all(|t| *t > min_zoom && *t < max_zoom));

        let bands = LodBands::new(&config.lod);
        assert_eq!(bands.tier_for(min_zoom), LodTier::Dot);
        assert_eq!(bands.tier_for(max_zoom), LodTier::Detail);
    }

    #[test]
    fn sanitized_clears_negative_scene_padding() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "viewport": { "scene_padding": -1000.0 } }"#)
                .expect("valid json");
        assert_eq!(config.sanitized().viewport.scene_padding, 0.0);
    }
}
