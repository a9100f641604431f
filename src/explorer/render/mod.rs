mod minimap;
mod palette;
mod surface;
mod tiers;

use std::time::Instant;

use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2};

pub use minimap::Minimap;
pub use palette::{category_color, recede, tint};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use tiers::footprint;

use palette::{BACKGROUND, GRID, HOVERED, TEXT, TEXT_MUTED, with_alpha};
use tiers::{RecordView, draw_record};

use crate::config::{LodConfig, RenderConfig};
use crate::explorer::categories::{Categories, Dimension};
use crate::explorer::layout::GroupLabel;
use crate::explorer::lod::{LodBands, LodTier};
use crate::explorer::quadtree::{QuadCell, SpatialIndex};
use crate::explorer::store::RecordStore;
use crate::explorer::viewport::Viewport;

/// Read-only view of everything a frame draws.
pub struct Scene<'a> {
    pub store: &'a RecordStore,
    pub categories: &'a Categories,
    pub index: &'a SpatialIndex,
    pub viewport: &'a Viewport,
    pub labels: &'a [GroupLabel],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub visible: usize,
    pub tier: LodTier,
    pub query_micros: u64,
    pub grid_opacity: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame: 0,
            visible: 0,
            tier: LodTier::Dot,
            query_micros: 0,
            grid_opacity: 0.0,
        }
    }
}

pub struct RenderPipeline {
    config: RenderConfig,
    bands: LodBands,
    dirty: bool,
    paused: bool,
    culled_revision: Option<u64>,
    visible: Vec<usize>,
    cells: Vec<QuadCell>,
    hovered: Option<usize>,
    color_dimension: Dimension,
    show_grid: bool,
    show_minimap: bool,
    show_index_overlay: bool,
    show_labels: bool,
    minimap: Minimap,
    surface_size: Vec2,
    pixels_per_point: f32,
    stats: FrameStats,
}

/// Opacity of the reference grid: zero up to `min_zoom`, then rising over
/// `fade_span` zoom units.
pub fn grid_opacity(zoom: f32, min_zoom: f32, fade_span: f32) -> f32 {
    if zoom <= min_zoom {
        return 0.0;
    }
    ((zoom - min_zoom) / fade_span.max(f32::EPSILON)).clamp(0.0, 1.0)
}

impl RenderPipeline {
    pub fn new(config: RenderConfig, lod: &LodConfig) -> Self {
        Self {
            minimap: Minimap::new(&config),
            config,
            bands: LodBands::new(lod),
            dirty: true,
            paused: false,
            culled_revision: None,
            visible: Vec::new(),
            cells: Vec::new(),
            hovered: None,
            color_dimension: Dimension::ObjectType,
            show_grid: true,
            show_minimap: true,
            show_index_overlay: false,
            show_labels: true,
            surface_size: Vec2::ZERO,
            pixels_per_point: 1.0,
            stats: FrameStats::default(),
        }
    }

    pub fn bands(&self) -> &LodBands {
        &self.bands
    }

    pub fn tier_for(&self, zoom: f32) -> LodTier {
        self.bands.tier_for(zoom)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.dirty = true;
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: Option<usize>) {
        self.hovered = hovered;
    }

    pub fn color_dimension(&self) -> Dimension {
        self.color_dimension
    }

    pub fn set_color_dimension(&mut self, dimension: Dimension) {
        self.color_dimension = dimension;
    }

    pub fn show_grid(&mut self) -> &mut bool {
        &mut self.show_grid
    }

    pub fn show_minimap(&mut self) -> &mut bool {
        &mut self.show_minimap
    }

    pub fn show_index_overlay(&mut self) -> &mut bool {
        &mut self.show_index_overlay
    }

    pub fn show_labels(&mut self) -> &mut bool {
        &mut self.show_labels
    }

    /// Records a surface size or pixel density change. Returns whether the
    /// frame became dirty.
    pub fn observe_surface(&mut self, size: Vec2, pixels_per_point: f32) -> bool {
        if size == self.surface_size && pixels_per_point == self.pixels_per_point {
            return false;
        }
        self.surface_size = size;
        self.pixels_per_point = pixels_per_point;
        self.dirty = true;
        true
    }

    /// Recomputes `visible` from the index when the view or layout changed.
    pub fn cull(&mut self, store: &mut RecordStore, index: &SpatialIndex, viewport: &Viewport) {
        if !self.dirty && self.culled_revision == Some(store.layout_revision()) {
            return;
        }

        let tier = self.bands.tier_for(viewport.zoom());
        let margin = footprint(tier).max_elem() * 0.5;
        let rect = viewport.visible_scene_rect().expand(margin);

        let started = Instant::now();
        index.query_into(rect, &mut self.visible);
        self.visible.sort_unstable();
        self.stats.query_micros = started.elapsed().as_micros() as u64;
        store.mark_visible(&self.visible);

        self.stats.visible = self.visible.len();
        self.stats.tier = tier;
        self.culled_revision = Some(store.layout_revision());
        self.dirty = false;
    }

    /// Draws one full frame. Call [`RenderPipeline::cull`] first.
    pub fn draw(&mut self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let viewport = scene.viewport;
        let zoom = viewport.zoom();
        self.stats.frame += 1;

        surface.fill_rect(surface.bounds(), 0.0, BACKGROUND);
        self.stats.grid_opacity = if self.show_grid {
            self.draw_grid(surface, viewport)
        } else {
            0.0
        };
        if self.show_index_overlay {
            self.draw_index_overlay(surface, scene);
        }
        if self.show_labels {
            draw_group_labels(surface, scene);
        }

        let tier = self.bands.tier_for(zoom);
        let selected = scene.store.selected();
        for &index in &self.visible {
            if Some(index) == selected || Some(index) == self.hovered {
                continue;
            }
            if let Some(view) = self.record_view(scene, index) {
                draw_record(surface, tier, &view);
            }
        }
        // Hovered, then selected, on top of the rest.
        let hovered = self.hovered.filter(|hovered| Some(*hovered) != selected);
        for index in [hovered, selected].into_iter().flatten() {
            if self.visible.binary_search(&index).is_ok()
                && let Some(view) = self.record_view(scene, index)
            {
                draw_record(surface, tier, &view);
            }
        }

        self.draw_hover_caption(surface, scene);

        match scene.index.bounds() {
            Some(bounds) if self.show_minimap && !scene.store.is_empty() => {
                self.minimap.draw(
                    surface,
                    scene.store,
                    scene.categories,
                    self.color_dimension,
                    bounds,
                    viewport.visible_scene_rect(),
                );
            }
            _ => self.minimap.forget(),
        }
    }

    fn record_view<'a>(&self, scene: &Scene<'a>, index: usize) -> Option<RecordView<'a>> {
        let record = scene.store.record(index)?;
        let state = scene.store.state(index)?;
        let highlight_active =
            scene.store.selected().is_some() || scene.store.search_match_count() > 0;
        Some(RecordView {
            record,
            keys: scene.categories.keys(index),
            center: scene.viewport.scene_to_screen(state.position),
            zoom: scene.viewport.zoom(),
            color: category_color(scene.categories.key(index, self.color_dimension)),
            selected: state.selected,
            search_match: state.search_match,
            hovered: self.hovered == Some(index),
            dimmed: highlight_active && !state.selected && !state.search_match,
        })
    }

    fn draw_grid(&self, surface: &mut dyn Surface, viewport: &Viewport) -> f32 {
        let opacity = grid_opacity(
            viewport.zoom(),
            self.config.grid_min_zoom,
            self.config.grid_fade_span,
        );
        if opacity <= 0.0 {
            return 0.0;
        }

        let step = self.config.grid_spacing * viewport.zoom();
        if step < 4.0 {
            return 0.0;
        }
        let bounds = surface.bounds();
        let origin = viewport.scene_to_screen(Pos2::ZERO);
        let stroke = Stroke::new(1.0, with_alpha(GRID, opacity * 0.45));

        let mut x = origin.x.rem_euclid(step);
        while x < bounds.right() {
            surface.line(Pos2::new(x, bounds.top()), Pos2::new(x, bounds.bottom()), stroke);
            x += step;
        }
        let mut y = origin.y.rem_euclid(step);
        while y < bounds.bottom() {
            surface.line(Pos2::new(bounds.left(), y), Pos2::new(bounds.right(), y), stroke);
            y += step;
        }
        opacity
    }

    fn draw_index_overlay(&mut self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let viewport = scene.viewport;
        let visible = viewport.visible_scene_rect();
        scene.index.cells(&mut self.cells);

        for cell in &self.cells {
            if !cell.bounds.intersects(visible) {
                continue;
            }
            let rect = Rect::from_min_max(
                viewport.scene_to_screen(cell.bounds.min),
                viewport.scene_to_screen(cell.bounds.max),
            );
            let alpha = if cell.is_leaf { 110 } else { 55 };
            let width = (1.4_f32 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
            surface.stroke_rect(
                rect,
                0.0,
                Stroke::new(width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha)),
            );
        }
    }

    fn draw_hover_caption(&self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let Some(index) = self.hovered else {
            return;
        };
        let Some(record) = scene.store.record(index) else {
            return;
        };
        let caption = format!(
            "{}  |  {}  |  {}",
            crate::util::truncate_label(record.display_title(), 60),
            record.kind.label(),
            scene.categories.key(index, Dimension::Decade),
        );
        surface.text(Pos2::new(10.0, 10.0), Align2::LEFT_TOP, &caption, 13.0, HOVERED);
    }
}

fn draw_group_labels(surface: &mut dyn Surface, scene: &Scene<'_>) {
    let viewport = scene.viewport;
    let bounds = surface.bounds();
    let size = (28.0 * viewport.zoom().sqrt()).clamp(11.0, 22.0);

    for label in scene.labels {
        let anchor = viewport.scene_to_screen(label.center - Vec2::new(0.0, label.extent));
        let position = anchor - Vec2::new(0.0, 8.0);
        if !bounds.expand(200.0).contains(position) {
            continue;
        }
        surface.text(position, Align2::CENTER_BOTTOM, &label.key, size, TEXT);
        surface.text(
            position + Vec2::new(0.0, 2.0),
            Align2::CENTER_TOP,
            &label.members.to_string(),
            size * 0.7,
            TEXT_MUTED,
        );
    }
}
