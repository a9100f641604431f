pub mod categories;
pub mod interaction;
pub mod layout;
pub mod lod;
pub mod quadtree;
pub mod render;
pub mod search;
pub mod store;
pub mod viewport;

use eframe::egui::{Rect, Vec2};
use tracing::{debug, info};

use crate::archive::Record;
use crate::config::ExplorerConfig;

use categories::{Categories, CategoryExtractor, Dimension};
use interaction::{Effects, InputEvent, InteractionRouter, RouterContext};
use layout::{GroupLabel, LayoutEngine, LayoutStrategy};
use lod::LodTier;
use quadtree::SpatialIndex;
use render::{FrameStats, RenderPipeline, Scene, Surface};
use search::SearchIndex;
use store::RecordStore;
use viewport::Viewport;

const FIT_PADDING_PX: f32 = 40.0;
/// Scene margin around search matches so a single hit is not framed at max zoom.
const MATCH_MARGIN: f32 = 120.0;

pub type SelectCallback = Box<dyn FnMut(Option<&Record>)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub drawn: bool,
    /// The camera is still moving; the host should schedule another frame.
    pub needs_repaint: bool,
}

/// The spatial collection explorer: records, their categories and layout,
/// the camera, and the render and input plumbing around them.
pub struct Explorer {
    config: ExplorerConfig,
    store: RecordStore,
    categories: Categories,
    index: SpatialIndex,
    layout: LayoutEngine,
    strategy: LayoutStrategy,
    labels: Vec<GroupLabel>,
    viewport: Viewport,
    pipeline: RenderPipeline,
    router: InteractionRouter,
    search: SearchIndex,
    query: String,
    pending_fit: bool,
    on_select: Option<SelectCallback>,
}

impl Explorer {
    pub fn new(records: Vec<Record>, config: ExplorerConfig) -> Self {
        let categories = CategoryExtractor::new(config.categories.clone()).extract(&records);
        let search = SearchIndex::new(&records);
        let mut explorer = Self {
            store: RecordStore::new(records),
            categories,
            index: SpatialIndex::new(config.index.max_items_per_node, config.index.max_depth),
            layout: LayoutEngine::new(config.layout.clone(), config.index.clone()),
            strategy: LayoutStrategy::default(),
            labels: Vec::new(),
            viewport: Viewport::new(&config.viewport),
            pipeline: RenderPipeline::new(config.render.clone(), &config.lod),
            router: InteractionRouter::new(&config.viewport, &config.render),
            search,
            query: String::new(),
            pending_fit: false,
            on_select: None,
            config,
        };

        info!(
            records = explorer.store.len(),
            groupable = ?explorer.categories.groupable_dimensions(),
            "explorer ready"
        );
        explorer.apply_layout(LayoutStrategy::default());
        explorer
    }

    pub fn set_on_select(&mut self, callback: impl FnMut(Option<&Record>) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Display toggles and coloring. None of them affect culling.
    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline {
        &mut self.pipeline
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    pub fn labels(&self) -> &[GroupLabel] {
        &self.labels
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn stats(&self) -> FrameStats {
        self.pipeline.stats()
    }

    pub fn tier(&self) -> LodTier {
        self.pipeline.tier_for(self.viewport.zoom())
    }

    pub fn layout_seed(&self) -> u64 {
        self.layout.seed()
    }

    pub fn set_layout_seed(&mut self, seed: u64) {
        self.layout.set_seed(seed);
    }

    /// Replaces every position and rebuilds the index; the view refits on
    /// the next frame.
    pub fn apply_layout(&mut self, strategy: LayoutStrategy) {
        self.strategy = strategy;
        self.labels = self
            .layout
            .layout(&strategy, &mut self.store, &self.categories, &mut self.index);
        self.viewport.set_scene_bounds(self.index.bounds());
        self.pipeline
            .set_color_dimension(strategy.primary.unwrap_or(Dimension::ObjectType));
        self.pending_fit = !self.store.is_empty();
        self.pipeline.mark_dirty();
    }

    /// Sets `search_match` on every hit and returns them in relevance order.
    pub fn search(&mut self, query: &str) -> Vec<usize> {
        self.query = query.trim().to_owned();
        let matches = self.search.find(self.store.records(), &self.query);
        self.store.set_search_matches(&matches);
        self.pipeline.mark_dirty();
        debug!(query = %self.query, matches = matches.len(), "search");
        matches
    }

    pub fn clear_search(&mut self) {
        self.search("");
    }

    /// Animates to the padded bounding box of the current matches. Returns
    /// false when nothing matches.
    pub fn zoom_to_matches(&mut self) -> bool {
        let bounds = self
            .store
            .search_matches()
            .filter_map(|index| self.store.position(index))
            .fold(Rect::NOTHING, |bounds, position| bounds.union(Rect::from_min_max(position, position)));
        if !bounds.is_finite() || bounds.min.x > bounds.max.x {
            return false;
        }

        self.viewport.animate_to_rect(
            bounds.expand(MATCH_MARGIN),
            FIT_PADDING_PX,
            self.config.viewport.animation_ms,
        );
        true
    }

    /// Changes the selection and tells the detail collaborator. Out-of-range
    /// indices clear it.
    pub fn select(&mut self, index: Option<usize>) {
        if !self.store.select(index) {
            return;
        }
        self.pipeline.mark_dirty();
        let selected = self.store.selected_record();
        debug!(id = selected.map(|record| record.id.as_str()), "selection changed");
        if let Some(callback) = self.on_select.as_mut() {
            callback(selected);
        }
    }

    pub fn select_id(&mut self, id: &str) -> bool {
        let index = self.store.index_of(id);
        self.select(index);
        index.is_some()
    }

    /// Animates the camera onto a record at card zoom or closer.
    pub fn focus(&mut self, index: usize) {
        let Some(position) = self.store.position(index) else {
            return;
        };
        let zoom = self.focus_zoom().max(self.viewport.target_zoom());
        self.viewport
            .center_on(position, zoom, self.config.viewport.animation_ms);
    }

    pub fn reset_view(&mut self) {
        self.viewport
            .reset_view(FIT_PADDING_PX, self.config.viewport.animation_ms);
    }

    fn focus_zoom(&self) -> f32 {
        self.pipeline.bands().band(LodTier::Card).0
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.pipeline.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.pipeline.is_paused()
    }

    pub fn resize(&mut self, size: Vec2, pixels_per_point: f32) {
        let resized = self.viewport.set_size(size);
        if self.pipeline.observe_surface(size, pixels_per_point) || resized {
            debug!(width = size.x, height = size.y, pixels_per_point, "surface resized");
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Effects {
        let focus_zoom = self.focus_zoom();
        let tier = self.tier();
        let mut ctx = RouterContext {
            viewport: &mut self.viewport,
            store: &self.store,
            index: &self.index,
            minimap: self.pipeline.minimap(),
            tier,
            focus_zoom,
        };
        let effects = self.router.handle(event, &mut ctx);

        if let Some(hovered) = effects.hover {
            self.pipeline.set_hovered(hovered);
        }
        if let Some(selection) = effects.select {
            self.select(selection);
        }
        if effects.view_changed {
            self.pipeline.mark_dirty();
        }
        effects
    }

    /// One frame step: camera, culling, then a full repaint of `surface`.
    pub fn frame(&mut self, surface: &mut dyn Surface, now: f64) -> FrameOutcome {
        self.resize(surface.size(), surface.pixels_per_point());

        if self.pipeline.is_paused() {
            return FrameOutcome::default();
        }

        if self.pending_fit
            && let Some(bounds) = self.index.bounds()
        {
            self.viewport.snap_to_rect(bounds, FIT_PADDING_PX);
            self.pending_fit = false;
            self.pipeline.mark_dirty();
        }

        let moving = self.viewport.advance(now);
        if moving {
            self.pipeline.mark_dirty();
        }

        self.pipeline
            .cull(&mut self.store, &self.index, &self.viewport);
        let scene = Scene {
            store: &self.store,
            categories: &self.categories,
            index: &self.index,
            viewport: &self.viewport,
            labels: &self.labels,
        };
        self.pipeline.draw(surface, &scene);

        FrameOutcome {
            drawn: true,
            needs_repaint: moving || self.viewport.is_animating(),
        }
    }
}
