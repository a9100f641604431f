use std::collections::HashSet;

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2, vec2};

use super::palette::{BACKGROUND, SELECTED, category_color, with_alpha};
use super::surface::Surface;
use crate::config::RenderConfig;
use crate::explorer::categories::{Categories, Dimension};
use crate::explorer::store::RecordStore;

#[derive(Clone, Copy, PartialEq)]
struct CacheKey {
    revision: u64,
    dimension: Dimension,
    frame: Vec2,
    bounds: Rect,
}

#[derive(Clone, Copy)]
struct Mapping {
    scene: Rect,
    origin: Pos2,
    scale: f32,
}

impl Mapping {
    fn fit(scene: Rect, frame: Rect) -> Self {
        let inner = frame.shrink(6.0);
        let scale = (inner.width() / scene.width().max(1.0)).min(inner.height() / scene.height().max(1.0));
        let used = scene.size() * scale;
        Self {
            scene,
            origin: inner.center() - used * 0.5,
            scale,
        }
    }

    fn to_map(self, scene: Pos2) -> Pos2 {
        self.origin + (scene - self.scene.min) * self.scale
    }

    fn to_scene(self, map: Pos2) -> Pos2 {
        self.scene.min + (map - self.origin) / self.scale
    }
}

/// Overview of every record position, independent of culling.
pub struct Minimap {
    size: Vec2,
    margin: f32,
    key: Option<CacheKey>,
    /// Pixel offsets from the frame origin, one per occupied pixel.
    pixels: Vec<(Vec2, Color32)>,
    frame: Option<Rect>,
    mapping: Option<Mapping>,
}

impl Minimap {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            size: vec2(config.minimap_size[0], config.minimap_size[1]),
            margin: config.minimap_margin,
            key: None,
            pixels: Vec::new(),
            frame: None,
            mapping: None,
        }
    }

    pub fn frame_rect(&self, surface: Vec2) -> Rect {
        let size = vec2(
            self.size.x.min(surface.x * 0.35),
            self.size.y.min(surface.y * 0.35),
        );
        Rect::from_min_size(
            Pos2::new(surface.x - size.x - self.margin, surface.y - size.y - self.margin),
            size,
        )
    }

    /// Last drawn frame on screen.
    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }

    pub fn contains(&self, screen: Pos2) -> bool {
        self.frame.is_some_and(|frame| frame.contains(screen))
    }

    /// Scene point under a screen position inside the minimap.
    pub fn scene_at(&self, screen: Pos2) -> Option<Pos2> {
        let frame = self.frame?;
        let mapping = self.mapping?;
        frame.contains(screen).then(|| mapping.to_scene(screen))
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn forget(&mut self) {
        self.frame = None;
        self.mapping = None;
    }

    fn refresh(
        &mut self,
        store: &RecordStore,
        categories: &Categories,
        dimension: Dimension,
        scene: Rect,
        frame: Rect,
    ) -> Mapping {
        let mapping = Mapping::fit(scene, frame);
        let key = CacheKey {
            revision: store.layout_revision(),
            dimension,
            frame: frame.size(),
            bounds: scene,
        };
        if self.key == Some(key) {
            return mapping;
        }

        let mut seen = HashSet::new();
        self.pixels.clear();
        for (index, position) in store.positions().enumerate() {
            let offset = mapping.to_map(position) - frame.min;
            let pixel = (offset.x.floor() as i32, offset.y.floor() as i32);
            if seen.insert(pixel) {
                let color = category_color(categories.key(index, dimension));
                self.pixels
                    .push((vec2(pixel.0 as f32, pixel.1 as f32), color));
            }
        }
        self.key = Some(key);
        mapping
    }

    pub fn draw(
        &mut self,
        surface: &mut dyn Surface,
        store: &RecordStore,
        categories: &Categories,
        dimension: Dimension,
        scene: Rect,
        visible: Rect,
    ) {
        let frame = self.frame_rect(surface.size());
        let mapping = self.refresh(store, categories, dimension, scene, frame);
        self.frame = Some(frame);
        self.mapping = Some(mapping);

        surface.fill_rect(frame, 4.0, with_alpha(BACKGROUND, 0.88));
        surface.stroke_rect(frame, 4.0, Stroke::new(1.0, Color32::from_gray(70)));
        for (offset, color) in &self.pixels {
            surface.fill_rect(
                Rect::from_min_size(frame.min + *offset, Vec2::splat(1.0)),
                0.0,
                *color,
            );
        }

        let view = Rect::from_min_max(mapping.to_map(visible.min), mapping.to_map(visible.max))
            .intersect(frame);
        if view.is_positive() {
            surface.stroke_rect(view, 0.0, Stroke::new(1.2, SELECTED));
        }
    }
}
