use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::config::{RenderConfig, ViewportConfig};
use crate::explorer::lod::LodTier;
use crate::explorer::quadtree::SpatialIndex;
use crate::explorer::render::{Minimap, footprint};
use crate::explorer::store::RecordStore;
use crate::explorer::viewport::Viewport;

const MINIMAP_JUMP_MS: f64 = 250.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleHelp,
    FocusSearch,
    ClearSelection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Host input in surface coordinates. Single touches are expected to arrive
/// as pointer events; touch events only drive pinch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Pos2, time: f64 },
    PointerMove { position: Pos2 },
    PointerUp { position: Pos2, time: f64 },
    PointerLeft,
    /// Scroll amount in points, positive to zoom in.
    Wheel { delta: f32, position: Pos2 },
    /// Multiplicative zoom from trackpad gestures or ctrl+scroll.
    Zoom { factor: f32, position: Pos2 },
    Touch { id: u64, phase: TouchPhase, position: Pos2 },
    Key(KeyCommand),
}

/// What the router asks its owner to do after an event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Effects {
    pub select: Option<Option<usize>>,
    pub hover: Option<Option<usize>>,
    pub toggle_help: bool,
    pub focus_search: bool,
    pub view_changed: bool,
}

pub struct RouterContext<'a> {
    pub viewport: &'a mut Viewport,
    pub store: &'a RecordStore,
    pub index: &'a SpatialIndex,
    pub minimap: &'a Minimap,
    pub tier: LodTier,
    /// Zoom a double click on a record settles at, at least.
    pub focus_zoom: f32,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Pos2,
    last: Pos2,
    dragging: bool,
    on_minimap: bool,
}

pub struct InteractionRouter {
    hit_radius_px: f32,
    drag_threshold_px: f32,
    double_click_secs: f64,
    key_pan_step_px: f32,
    key_zoom_step: f32,
    wheel_sensitivity: f32,
    animation_ms: f64,
    press: Option<Press>,
    last_click: Option<(f64, Pos2)>,
    touches: Vec<(u64, Pos2)>,
    pinch_distance: Option<f32>,
}

/// Closest visible record within `radius` of `point`, both in scene units.
pub fn hit_test(store: &RecordStore, index: &SpatialIndex, point: Pos2, radius: f32) -> Option<usize> {
    index
        .query(Rect::from_center_size(point, Vec2::splat(radius * 2.0)))
        .into_iter()
        .filter(|candidate| store.state(*candidate).is_some_and(|state| state.visible))
        .filter_map(|candidate| {
            let distance = store.position(candidate)?.distance(point);
            (distance <= radius).then_some((candidate, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(candidate, _)| candidate)
}

impl InteractionRouter {
    pub fn new(viewport: &ViewportConfig, render: &RenderConfig) -> Self {
        Self {
            hit_radius_px: render.hit_radius_px,
            drag_threshold_px: render.drag_threshold_px,
            double_click_secs: render.double_click_secs,
            key_pan_step_px: viewport.key_pan_step_px,
            key_zoom_step: viewport.key_zoom_step,
            wheel_sensitivity: viewport.wheel_sensitivity,
            animation_ms: viewport.animation_ms,
            press: None,
            last_click: None,
            touches: Vec::new(),
            pinch_distance: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    /// Scene-space hit radius at the current zoom.
    pub fn hit_radius(&self, zoom: f32, tier: LodTier) -> f32 {
        (self.hit_radius_px / zoom.max(f32::EPSILON)).max(footprint(tier).min_elem() * 0.5)
    }

    pub fn handle(&mut self, event: InputEvent, ctx: &mut RouterContext<'_>) -> Effects {
        let mut effects = Effects::default();
        match event {
            InputEvent::PointerDown { position, .. } => {
                self.press = Some(Press {
                    origin: position,
                    last: position,
                    dragging: false,
                    on_minimap: ctx.minimap.contains(position),
                });
            }
            InputEvent::PointerMove { position } => self.pointer_moved(position, ctx, &mut effects),
            InputEvent::PointerUp { position, time } => {
                if let Some(press) = self.press.take()
                    && !press.dragging
                {
                    if press.on_minimap {
                        if let Some(scene) = ctx.minimap.scene_at(position) {
                            let zoom = ctx.viewport.target_zoom();
                            ctx.viewport.center_on(scene, zoom, MINIMAP_JUMP_MS);
                            effects.view_changed = true;
                        }
                    } else {
                        self.click(position, time, ctx, &mut effects);
                    }
                }
            }
            InputEvent::PointerLeft => {
                self.press = None;
                effects.hover = Some(None);
            }
            InputEvent::Wheel { delta, position } => {
                if delta.abs() > f32::EPSILON {
                    let factor = (1.0 + delta * self.wheel_sensitivity).clamp(0.85, 1.15);
                    ctx.viewport.zoom_by(factor, Some(position));
                    effects.view_changed = true;
                }
            }
            InputEvent::Zoom { factor, position } => {
                if (factor - 1.0).abs() > f32::EPSILON {
                    ctx.viewport.zoom_by(factor, Some(position));
                    effects.view_changed = true;
                }
            }
            InputEvent::Touch {
                id,
                phase,
                position,
            } => self.touch(id, phase, position, ctx, &mut effects),
            InputEvent::Key(command) => self.key(command, ctx, &mut effects),
        }
        effects
    }

    fn pointer_moved(&mut self, position: Pos2, ctx: &mut RouterContext<'_>, effects: &mut Effects) {
        let Some(press) = self.press.as_mut() else {
            let radius = self.hit_radius(ctx.viewport.zoom(), ctx.tier);
            let scene = ctx.viewport.screen_to_scene(position);
            effects.hover = Some(hit_test(ctx.store, ctx.index, scene, radius));
            return;
        };

        if press.on_minimap {
            if let Some(scene) = ctx.minimap.scene_at(position) {
                press.dragging = true;
                ctx.viewport.set_pan(-scene.to_vec2());
                effects.view_changed = true;
            }
            return;
        }

        if !press.dragging && press.origin.distance(position) > self.drag_threshold_px {
            press.dragging = true;
            effects.hover = Some(None);
        }
        if press.dragging {
            ctx.viewport.pan_by_screen(position - press.last);
            press.last = position;
            effects.view_changed = true;
        }
    }

    fn click(&mut self, position: Pos2, time: f64, ctx: &mut RouterContext<'_>, effects: &mut Effects) {
        let radius = self.hit_radius(ctx.viewport.zoom(), ctx.tier);
        let scene = ctx.viewport.screen_to_scene(position);
        let hit = hit_test(ctx.store, ctx.index, scene, radius);

        let double = self.last_click.is_some_and(|(at, origin)| {
            time - at <= self.double_click_secs
                && origin.distance(position) <= self.drag_threshold_px * 2.0
        });

        if !double {
            self.last_click = Some((time, position));
            effects.select = Some(hit);
            return;
        }

        self.last_click = None;
        match hit.and_then(|record| ctx.store.position(record).map(|at| (record, at))) {
            Some((record, at)) => {
                let zoom = (ctx.viewport.target_zoom() * 2.0).max(ctx.focus_zoom);
                ctx.viewport.center_on(at, zoom, self.animation_ms);
                effects.select = Some(Some(record));
            }
            None => ctx.viewport.zoom_by(self.key_zoom_step, Some(position)),
        }
        effects.view_changed = true;
    }

    fn touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Pos2,
        ctx: &mut RouterContext<'_>,
        effects: &mut Effects,
    ) {
        match phase {
            TouchPhase::Start => {
                self.touches.retain(|(touch, _)| *touch != id);
                self.touches.push((id, position));
            }
            TouchPhase::Move => {
                if let Some(entry) = self.touches.iter_mut().find(|(touch, _)| *touch == id) {
                    entry.1 = position;
                }
            }
            TouchPhase::End => {
                self.touches.retain(|(touch, _)| *touch != id);
            }
        }

        let [(_, a), (_, b)] = self.touches.as_slice() else {
            self.pinch_distance = None;
            return;
        };
        let (a, b) = (*a, *b);
        // A second finger turns any pending press into a pinch.
        self.press = None;

        let distance = a.distance(b);
        if let Some(previous) = self.pinch_distance
            && previous > f32::EPSILON
            && distance > f32::EPSILON
        {
            let midpoint = a + (b - a) * 0.5;
            ctx.viewport.zoom_by(distance / previous, Some(midpoint));
            effects.view_changed = true;
        }
        self.pinch_distance = Some(distance);
    }

    fn key(&mut self, command: KeyCommand, ctx: &mut RouterContext<'_>, effects: &mut Effects) {
        let step = self.key_pan_step_px;
        match command {
            KeyCommand::PanLeft => ctx.viewport.pan_by_screen(vec2(step, 0.0)),
            KeyCommand::PanRight => ctx.viewport.pan_by_screen(vec2(-step, 0.0)),
            KeyCommand::PanUp => ctx.viewport.pan_by_screen(vec2(0.0, step)),
            KeyCommand::PanDown => ctx.viewport.pan_by_screen(vec2(0.0, -step)),
            KeyCommand::ZoomIn => ctx.viewport.zoom_by(self.key_zoom_step, None),
            KeyCommand::ZoomOut => ctx.viewport.zoom_by(1.0 / self.key_zoom_step, None),
            KeyCommand::ResetView => ctx.viewport.reset_view(40.0, self.animation_ms),
            KeyCommand::ToggleHelp => {
                effects.toggle_help = true;
                return;
            }
            KeyCommand::FocusSearch => {
                effects.focus_search = true;
                return;
            }
            KeyCommand::ClearSelection => {
                effects.select = Some(None);
                return;
            }
        }
        effects.view_changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{Record, RecordKind};
    use crate::explorer::quadtree::QuadItem;

    struct Fixture {
        viewport: Viewport,
        store: RecordStore,
        index: SpatialIndex,
        minimap: Minimap,
        router: InteractionRouter,
    }

    impl Fixture {
        fn new(points: &[Pos2]) -> Self {
            let mut store = RecordStore::new(
                (0..points.len())
                    .map(|i| Record::new(format!("r{i}"), RecordKind::Object))
                    .collect(),
            );
            for (i, point) in points.iter().enumerate() {
                store.place(i, *point);
            }
            store.mark_visible(&(0..points.len()).collect::<Vec<_>>());

            let mut index = SpatialIndex::new(4, 6);
            index.build(
                Rect::from_min_max(Pos2::new(-1000.0, -1000.0), Pos2::new(1000.0, 1000.0)),
                points.iter().enumerate().map(|(i, p)| QuadItem::point(*p, i)),
            );

            let mut viewport = Viewport::new(&ViewportConfig {
                initial_zoom: 1.0,
                ..ViewportConfig::default()
            });
            viewport.set_size(vec2(800.0, 600.0));

            Self {
                viewport,
                store,
                index,
                minimap: Minimap::new(&RenderConfig::default()),
                router: InteractionRouter::new(&ViewportConfig::default(), &RenderConfig::default()),
            }
        }

        fn send(&mut self, event: InputEvent) -> Effects {
            let mut ctx = RouterContext {
                viewport: &mut self.viewport,
                store: &self.store,
                index: &self.index,
                minimap: &self.minimap,
                tier: LodTier::Thumbnail,
                focus_zoom: 1.8,
            };
            self.router.handle(event, &mut ctx)
        }
    }

    #[test]
    fn click_selects_closest_record() {
        let mut fixture = Fixture::new(&[Pos2::new(0.0, 0.0), Pos2::new(30.0, 0.0)]);
        let screen = fixture.viewport.scene_to_screen(Pos2::new(24.0, 2.0));
        fixture.send(InputEvent::PointerDown { position: screen, time: 0.0 });
        let effects = fixture.send(InputEvent::PointerUp { position: screen, time: 0.05 });
        assert_eq!(effects.select, Some(Some(1)));
    }

    #[test]
    fn click_on_empty_space_clears_selection() {
        let mut fixture = Fixture::new(&[Pos2::new(0.0, 0.0)]);
        let screen = fixture.viewport.scene_to_screen(Pos2::new(300.0, 300.0));
        fixture.send(InputEvent::PointerDown { position: screen, time: 0.0 });
        let effects = fixture.send(InputEvent::PointerUp { position: screen, time: 0.05 });
        assert_eq!(effects.select, Some(None));
    }

    #[test]
    fn drag_pans_and_never_clicks() {
        let mut fixture = Fixture::new(&[Pos2::new(0.0, 0.0)]);
        let start = fixture.viewport.scene_to_screen(Pos2::ZERO);
        fixture.send(InputEvent::PointerDown { position: start, time: 0.0 });
        fixture.send(InputEvent::PointerMove { position: start + vec2(50.0, 0.0) });
        assert!(fixture.router.is_dragging());
        let effects = fixture.send(InputEvent::PointerUp {
            position: start + vec2(50.0, 0.0),
            time: 0.2,
        });
        assert_eq!(effects.select, None);
        assert!((fixture.viewport.target_pan().x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn small_jitter_stays_a_click() {
        let mut fixture = Fixture::new(&[Pos2::new(0.0, 0.0)]);
        let start = fixture.viewport.scene_to_screen(Pos2::ZERO);
        fixture.send(InputEvent::PointerDown { position: start, time: 0.0 });
        fixture.send(InputEvent::PointerMove { position: start + vec2(1.0, 1.0) });
        let effects = fixture.send(InputEvent::PointerUp { position: start, time: 0.05 });
        assert_eq!(effects.select, Some(Some(0)));
        assert_eq!(fixture.viewport.target_pan(), Vec2::ZERO);
    }

    #[test]
    fn double_click_on_record_animates_in() {
        let mut fixture = Fixture::new(&[Pos2::new(100.0, 50.0)]);
        let screen = fixture.viewport.scene_to_screen(Pos2::new(100.0, 50.0));
        for time in [0.0, 0.2] {
            fixture.send(InputEvent::PointerDown { position: screen, time });
            fixture.send(InputEvent::PointerUp { position: screen, time: time + 0.01 });
        }
        assert!(fixture.viewport.is_animating());
        assert_eq!(fixture.viewport.target_pan(), vec2(-100.0, -50.0));
        assert_eq!(fixture.viewport.target_zoom(), 2.0);
    }

    #[test]
    fn double_click_on_empty_space_zooms_one_step() {
        let mut fixture = Fixture::new(&[]);
        let screen = Pos2::new(100.0, 100.0);
        for time in [0.0, 0.2] {
            fixture.send(InputEvent::PointerDown { position: screen, time });
            fixture.send(InputEvent::PointerUp { position: screen, time: time + 0.01 });
        }
        assert!((fixture.viewport.target_zoom() - 1.25).abs() < 1e-5);
    }

    #[test]
    fn pinch_zooms_by_distance_ratio() {
        let mut fixture = Fixture::new(&[]);
        let touch = |id, phase, x| InputEvent::Touch {
            id,
            phase,
            position: Pos2::new(x, 300.0),
        };
        fixture.send(touch(1, TouchPhase::Start, 300.0));
        fixture.send(touch(2, TouchPhase::Start, 500.0));
        fixture.send(touch(2, TouchPhase::Move, 700.0));
        assert!((fixture.viewport.target_zoom() - 2.0).abs() < 1e-4);
        fixture.send(touch(2, TouchPhase::End, 700.0));
        fixture.send(touch(1, TouchPhase::Move, 100.0));
        assert!((fixture.viewport.target_zoom() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn keys_map_to_view_steps_and_effects() {
        let mut fixture = Fixture::new(&[]);
        fixture.send(InputEvent::Key(KeyCommand::PanLeft));
        assert!((fixture.viewport.target_pan().x - 120.0).abs() < 1e-3);
        fixture.send(InputEvent::Key(KeyCommand::ZoomIn));
        assert!((fixture.viewport.target_zoom() - 1.25).abs() < 1e-5);

        assert!(fixture.send(InputEvent::Key(KeyCommand::ToggleHelp)).toggle_help);
        assert!(fixture.send(InputEvent::Key(KeyCommand::FocusSearch)).focus_search);
        assert_eq!(
            fixture.send(InputEvent::Key(KeyCommand::ClearSelection)).select,
            Some(None)
        );
    }
}
