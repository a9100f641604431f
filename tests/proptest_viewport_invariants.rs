//! Property tests for the camera transform.
//!
//! 1. screen -> scene -> screen is the identity within float tolerance.
//! 2. Every requested zoom lands inside the configured range.
//! 3. Focal zoom keeps the scene point under the pointer fixed.

use eframe::egui::{Pos2, Vec2, vec2};
use km_explorer::config::ViewportConfig;
use km_explorer::explorer::viewport::Viewport;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const TOLERANCE_PX: f32 = 0.05;

fn viewport() -> Viewport {
    let mut viewport = Viewport::new(&ViewportConfig::default());
    viewport.set_size(vec2(1280.0, 800.0));
    viewport
}

/// Applies `zoom` and `pan` immediately.
fn place(viewport: &mut Viewport, zoom: f32, pan: Vec2) {
    viewport.animate_to(zoom, pan, 0.0);
    viewport.advance(0.0);
}

fn screen_point() -> impl Strategy<Value = Pos2> {
    (0.0f32..=1280.0, 0.0f32..=800.0).prop_map(|(x, y)| Pos2::new(x, y))
}

fn valid_zoom() -> impl Strategy<Value = f32> {
    let config = ViewportConfig::default();
    config.min_zoom..=config.max_zoom
}

fn pan() -> impl Strategy<Value = Vec2> {
    (-5000.0f32..5000.0, -5000.0f32..5000.0).prop_map(|(x, y)| vec2(x, y))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. coordinate round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn screen_scene_round_trip(zoom in valid_zoom(), pan in pan(), point in screen_point()) {
        let mut viewport = viewport();
        place(&mut viewport, zoom, pan);

        let back = viewport.scene_to_screen(viewport.screen_to_scene(point));
        prop_assert!(
            back.distance(point) <= TOLERANCE_PX,
            "{:?} came back as {:?} at zoom {} pan {:?}", point, back, zoom, pan
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. zoom clamp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn requested_zoom_is_clamped(requested in prop_oneof![
        -100.0f32..100.0,
        Just(0.0f32),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
        1e-9f32..1e9,
    ]) {
        let mut viewport = viewport();
        let (min, max) = viewport.zoom_range();
        viewport.set_zoom(requested, None);

        prop_assert!(viewport.target_zoom() >= min && viewport.target_zoom() <= max);
        for _ in 0..400 {
            viewport.advance(0.0);
        }
        prop_assert!(viewport.zoom() >= min && viewport.zoom() <= max);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. focal zoom keeps the anchor
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn focal_zoom_keeps_the_anchor(
        start in 0.1f32..4.0,
        factor in 0.5f32..2.0,
        focal in screen_point(),
    ) {
        let mut viewport = viewport();
        place(&mut viewport, start, Vec2::ZERO);
        let anchored = viewport.screen_to_scene(focal);

        viewport.zoom_by(factor, Some(focal));
        let (zoom, pan) = (viewport.target_zoom(), viewport.target_pan());
        place(&mut viewport, zoom, pan);

        let back = viewport.scene_to_screen(anchored);
        prop_assert!(back.distance(focal) <= TOLERANCE_PX, "{:?} drifted to {:?}", focal, back);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn ten_times_max_zoom_clamps_and_round_trip_holds() {
    let mut viewport = viewport();
    let (_, max) = viewport.zoom_range();

    viewport.set_zoom(max * 10.0, None);
    assert_eq!(viewport.target_zoom(), max);
    while viewport.advance(0.0) {}
    assert_eq!(viewport.zoom(), max);

    for point in [Pos2::ZERO, Pos2::new(640.0, 400.0), Pos2::new(1280.0, 800.0), Pos2::new(13.5, 777.25)] {
        let back = viewport.scene_to_screen(viewport.screen_to_scene(point));
        assert!(back.distance(point) <= TOLERANCE_PX);
    }
}

#[test]
fn nan_zoom_is_ignored() {
    let mut viewport = viewport();
    let before = viewport.target_zoom();
    viewport.set_zoom(f32::NAN, Some(Pos2::new(10.0, 10.0)));
    assert_eq!(viewport.target_zoom(), before);
}
