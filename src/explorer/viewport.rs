use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::config::ViewportConfig;

const PAN_EPSILON_PX: f32 = 0.05;

#[derive(Clone, Copy, Debug)]
struct Animation {
    from_zoom: f32,
    from_pan: Vec2,
    to_zoom: f32,
    to_pan: Vec2,
    /// Set on the first frame after the request.
    start: Option<f64>,
    duration_secs: f64,
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

/// Camera over scene space.
///
/// `scene_to_screen(p) = center + (p + pan) * zoom`, where `center` is the
/// middle of the drawing surface. Targets are where the camera is heading;
/// the current values chase them each frame. Setting any target or starting
/// an animation supersedes whatever was in flight.
#[derive(Clone, Debug)]
pub struct Viewport {
    zoom: f32,
    pan: Vec2,
    target_zoom: f32,
    target_pan: Vec2,
    initial_zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    smoothing: f32,
    epsilon: f32,
    size: Vec2,
    scene_bounds: Option<Rect>,
    scene_padding: f32,
    animation: Option<Animation>,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        let zoom = config.initial_zoom.clamp(config.min_zoom, config.max_zoom);
        Self {
            zoom,
            pan: Vec2::ZERO,
            target_zoom: zoom,
            target_pan: Vec2::ZERO,
            initial_zoom: zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            smoothing: config.smoothing.clamp(f32::EPSILON, 1.0),
            epsilon: config.epsilon,
            size: vec2(1.0, 1.0),
            scene_bounds: None,
            scene_padding: config.scene_padding,
            animation: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    pub fn target_pan(&self) -> Vec2 {
        self.target_pan
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Returns whether the size changed.
    pub fn set_size(&mut self, size: Vec2) -> bool {
        let size = vec2(size.x.max(1.0), size.y.max(1.0));
        if size == self.size {
            return false;
        }
        self.size = size;
        true
    }

    pub fn set_scene_bounds(&mut self, bounds: Option<Rect>) {
        self.scene_bounds = bounds;
        self.target_pan = self.clamp_pan(self.target_pan);
    }

    pub fn scene_bounds(&self) -> Option<Rect> {
        self.scene_bounds
    }

    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    fn clamp_pan(&self, pan: Vec2) -> Vec2 {
        let Some(bounds) = self.scene_bounds else {
            return pan;
        };
        let allowed = bounds.expand(self.scene_padding);
        if !(allowed.min.x <= allowed.max.x && allowed.min.y <= allowed.max.y) {
            return pan;
        }
        let center = -pan;
        -vec2(
            center.x.clamp(allowed.min.x, allowed.max.x),
            center.y.clamp(allowed.min.y, allowed.max.y),
        )
    }

    fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn screen_to_scene(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.center()) / self.zoom - self.pan).to_pos2()
    }

    pub fn scene_to_screen(&self, scene: Pos2) -> Pos2 {
        (self.center() + (scene.to_vec2() + self.pan) * self.zoom).to_pos2()
    }

    pub fn visible_scene_rect(&self) -> Rect {
        Rect::from_min_max(
            self.screen_to_scene(Pos2::ZERO),
            self.screen_to_scene(self.size.to_pos2()),
        )
    }

    /// Clamps `value` and, with a focal point, keeps the scene point under it fixed.
    pub fn set_zoom(&mut self, value: f32, focal: Option<Pos2>) {
        if value.is_nan() {
            return;
        }

        let zoom = self.clamp_zoom(value);
        if let Some(focal) = focal {
            let anchored = self.screen_to_scene(focal);
            self.target_pan = (focal.to_vec2() - self.center()) / zoom - anchored.to_vec2();
        }
        self.target_zoom = zoom;
        self.target_pan = self.clamp_pan(self.target_pan);
        self.animation = None;
    }

    /// Multiplies the target zoom, anchored at `focal`.
    pub fn zoom_by(&mut self, factor: f32, focal: Option<Pos2>) {
        if factor.is_finite() && factor > 0.0 {
            self.set_zoom(self.target_zoom * factor, focal);
        }
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        if !pan.x.is_finite() || !pan.y.is_finite() {
            return;
        }
        self.target_pan = self.clamp_pan(pan);
        self.animation = None;
    }

    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.set_pan(self.target_pan + delta / self.zoom);
    }

    pub fn animate_to(&mut self, zoom: f32, pan: Vec2, duration_ms: f64) {
        let to_zoom = self.clamp_zoom(zoom);
        let to_pan = self.clamp_pan(pan);
        self.target_zoom = to_zoom;
        self.target_pan = to_pan;
        self.animation = Some(Animation {
            from_zoom: self.zoom,
            from_pan: self.pan,
            to_zoom,
            to_pan,
            start: None,
            duration_secs: (duration_ms / 1000.0).max(0.0),
        });
    }

    pub fn center_on(&mut self, scene: Pos2, zoom: f32, duration_ms: f64) {
        self.animate_to(zoom, -scene.to_vec2(), duration_ms);
    }

    /// Zoom and pan that frame `rect` with `padding_px` on every side.
    pub fn fit_rect(&self, rect: Rect, padding_px: f32) -> (f32, Vec2) {
        let available = vec2(
            (self.size.x - padding_px * 2.0).max(1.0),
            (self.size.y - padding_px * 2.0).max(1.0),
        );
        let zoom = (available.x / rect.width().max(1.0)).min(available.y / rect.height().max(1.0));
        (self.clamp_zoom(zoom), -rect.center().to_vec2())
    }

    pub fn animate_to_rect(&mut self, rect: Rect, padding_px: f32, duration_ms: f64) {
        let (zoom, pan) = self.fit_rect(rect, padding_px);
        self.animate_to(zoom, pan, duration_ms);
    }

    /// Animates to frame the whole scene, or back to the initial zoom when
    /// there is no scene yet.
    pub fn reset_view(&mut self, padding_px: f32, duration_ms: f64) {
        match self.scene_bounds {
            Some(bounds) => self.animate_to_rect(bounds, padding_px, duration_ms),
            None => self.animate_to(self.initial_zoom, Vec2::ZERO, duration_ms),
        }
    }

    /// Jumps without easing; used when a fresh layout replaces the scene.
    pub fn snap_to_rect(&mut self, rect: Rect, padding_px: f32) {
        let (zoom, pan) = self.fit_rect(rect, padding_px);
        self.animation = None;
        self.zoom = zoom;
        self.target_zoom = zoom;
        self.pan = self.clamp_pan(pan);
        self.target_pan = self.pan;
    }

    /// Steps toward the targets. Returns whether the camera moved.
    pub fn advance(&mut self, now: f64) -> bool {
        if let Some(animation) = self.animation.as_mut() {
            let start = *animation.start.get_or_insert(now);
            let progress = if animation.duration_secs <= 0.0 {
                1.0
            } else {
                ((now - start) / animation.duration_secs).clamp(0.0, 1.0)
            };
            let eased = ease_out_cubic(progress) as f32;
            let animation = *animation;

            self.zoom = animation.from_zoom + (animation.to_zoom - animation.from_zoom) * eased;
            self.pan = animation.from_pan + (animation.to_pan - animation.from_pan) * eased;
            if progress >= 1.0 {
                self.zoom = animation.to_zoom;
                self.pan = animation.to_pan;
                self.animation = None;
            }
            return true;
        }

        let zoom_residual = self.target_zoom - self.zoom;
        let pan_residual = self.target_pan - self.pan;
        let zoom_settled = zoom_residual.abs() <= self.epsilon * self.target_zoom;
        let pan_settled = pan_residual.length() * self.zoom <= PAN_EPSILON_PX;
        if zoom_settled && pan_settled {
            self.zoom = self.target_zoom;
            self.pan = self.target_pan;
            return false;
        }

        self.zoom += zoom_residual * self.smoothing;
        self.pan += pan_residual * self.smoothing;
        true
    }
}
