//! Frame-level scenarios for the explorer facade, drawn on a recording surface.

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui::vec2;
use km_explorer::archive::{Record, RecordKind, parse_collection_str};
use km_explorer::config::ExplorerConfig;
use km_explorer::explorer::Explorer;
use km_explorer::explorer::interaction::{InputEvent, KeyCommand};
use km_explorer::explorer::layout::{LayoutKind, LayoutStrategy};
use km_explorer::explorer::render::{RecordingSurface, Surface};

fn collection() -> Vec<Record> {
    let titles = [
        "Revolver mit Trommel",
        "Karteikarte Diebstahl",
        "Wildererstutzen",
        "Revolver, beschlagnahmt in Graz",
        "Karteikarte Betrug Wien",
        "Schlüsselbund",
        "Falschgeld",
        "Karteikarte Mord",
        "Dietrich",
        "Brief",
        "Messer",
        "Photographie",
    ];
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let kind = if title.starts_with("Karteikarte") {
                RecordKind::IndexCard
            } else {
                RecordKind::Object
            };
            Record::new(format!("o:km.{i}"), kind).with_title(*title)
        })
        .collect()
}

fn surface() -> RecordingSurface {
    RecordingSurface::new(vec2(800.0, 600.0))
}

/// Runs frames 1/60 s apart until the camera settles.
fn settle(explorer: &mut Explorer, surface: &mut RecordingSurface, mut now: f64) -> f64 {
    for _ in 0..600 {
        surface.clear();
        let outcome = explorer.frame(surface, now);
        now += 1.0 / 60.0;
        if !outcome.needs_repaint {
            break;
        }
    }
    now
}

#[test]
fn first_frame_fits_the_whole_collection() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();

    let outcome = explorer.frame(&mut surface, 0.0);

    assert!(outcome.drawn);
    assert!(!surface.commands.is_empty());
    assert_eq!(explorer.stats().visible, 12);
    assert!(explorer.store().states().iter().all(|state| state.visible));
    assert!(surface.texts().any(|text| text == "Objekt"));
    assert!(surface.texts().any(|text| text == "Karteikarte"));
}

#[test]
fn paused_explorer_draws_nothing_until_resumed() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();
    explorer.frame(&mut surface, 0.0);

    explorer.set_paused(true);
    surface.clear();
    let outcome = explorer.frame(&mut surface, 0.1);
    assert!(!outcome.drawn);
    assert!(surface.commands.is_empty());

    explorer.set_paused(false);
    let outcome = explorer.frame(&mut surface, 0.2);
    assert!(outcome.drawn);
    assert!(!surface.commands.is_empty());
}

#[test]
fn shrinking_the_surface_recomputes_the_visible_set() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();
    settle(&mut explorer, &mut surface, 0.0);
    assert_eq!(explorer.stats().visible, 12);
    assert!(!explorer.pipeline().is_dirty());

    surface.resize(vec2(120.0, 90.0));
    surface.clear();
    explorer.frame(&mut surface, 20.0);

    assert!(explorer.stats().visible < 12);
    assert!(!explorer.pipeline().is_dirty());
}

#[test]
fn pixel_density_change_marks_the_frame_dirty() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();
    settle(&mut explorer, &mut surface, 0.0);
    let frames = explorer.stats().frame;

    let mut hidpi = RecordingSurface::new(surface.size()).with_pixels_per_point(2.0);
    explorer.resize(hidpi.size(), hidpi.pixels_per_point());
    assert!(explorer.pipeline().is_dirty());

    let outcome = explorer.frame(&mut hidpi, 20.0);
    assert!(outcome.drawn);
    assert!(!explorer.pipeline().is_dirty());
    assert_eq!(explorer.stats().frame, frames + 1);
    assert_eq!(explorer.stats().visible, 12);
}

#[test]
fn negative_scene_padding_does_not_break_startup() {
    let config: ExplorerConfig =
        serde_json::from_str(r#"{ "viewport": { "scene_padding": -1000.0 } }"#).expect("valid json");

    for config in [config.clone(), config.sanitized()] {
        let mut explorer = Explorer::new(collection(), config);
        let mut surface = surface();
        explorer.frame(&mut surface, 0.0);
        explorer.handle_input(InputEvent::Key(KeyCommand::PanLeft));
        settle(&mut explorer, &mut surface, 0.1);
        assert_eq!(explorer.store().len(), 12);
    }
}

#[test]
fn selection_callback_fires_on_change_only() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    explorer.set_on_select(move |record: Option<&Record>| {
        sink.borrow_mut().push(record.map(|record| record.id.clone()));
    });

    explorer.select(Some(1));
    explorer.select(Some(1));
    assert!(explorer.select_id("o:km.5"));
    let details = explorer.store().selected().and_then(|index| explorer.store().record(index));
    assert_eq!(
        details.map(|record| record.id.clone()),
        seen.borrow().last().cloned().flatten()
    );
    explorer.select(Some(999));

    assert_eq!(
        *seen.borrow(),
        vec![Some("o:km.1".to_owned()), Some("o:km.5".to_owned()), None]
    );
    assert_eq!(explorer.store().selected(), None);
}

#[test]
fn clicking_a_record_selects_it() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();
    let now = settle(&mut explorer, &mut surface, 0.0);

    let Some(position) = explorer.store().position(1) else {
        panic!("record 1 has a position");
    };
    let screen = explorer.viewport().scene_to_screen(position);
    explorer.handle_input(InputEvent::PointerDown { position: screen, time: now });
    let effects = explorer.handle_input(InputEvent::PointerUp {
        position: screen,
        time: now + 0.05,
    });

    assert_eq!(effects.select, Some(Some(1)));
    assert_eq!(explorer.store().selected(), Some(1));
    assert_eq!(explorer.store().selected_record().map(|record| record.id.as_str()), Some("o:km.1"));

    explorer.handle_input(InputEvent::Key(KeyCommand::ClearSelection));
    assert_eq!(explorer.store().selected(), None);
}

#[test]
fn zoom_to_matches_frames_every_match() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();
    let now = settle(&mut explorer, &mut surface, 0.0);

    let matches = explorer.search("revolver");
    assert_eq!(matches.len(), 2);
    assert!(explorer.zoom_to_matches());
    assert!(explorer.viewport().is_animating());

    settle(&mut explorer, &mut surface, now);
    assert!(!explorer.viewport().is_animating());

    let visible = explorer.viewport().visible_scene_rect();
    for index in matches {
        let position = explorer.store().position(index);
        assert!(position.is_some_and(|position| visible.contains(position)));
        assert!(explorer.store().state(index).is_some_and(|state| state.search_match));
    }
}

#[test]
fn switching_layout_refits_on_the_next_frame() {
    let mut explorer = Explorer::new(collection(), ExplorerConfig::default());
    let mut surface = surface();
    explorer.frame(&mut surface, 0.0);
    let revision = explorer.store().layout_revision();

    explorer.apply_layout(LayoutStrategy::new(LayoutKind::Radial));
    explorer.frame(&mut surface, 0.1);

    assert!(explorer.store().layout_revision() > revision);
    assert_eq!(explorer.stats().visible, 12);
    assert!(explorer.labels().is_empty());
}

#[test]
fn parsed_collection_feeds_the_explorer() {
    let raw = r#"[
        {"id": "o:km.1", "type": "Objekt", "title": "Revolver", "createdDate": "1911-03-02"},
        {"identifier": "o:km.2", "container": "Karteikarte", "title": "Diebstahl in Graz"},
        "not a record",
        {"id": "o:km.3", "type": "Plakat"}
    ]"#;
    let records = match parse_collection_str(raw) {
        Ok(records) => records,
        Err(err) => panic!("collection parses: {err:#}"),
    };
    assert_eq!(records.len(), 3);

    let mut explorer = Explorer::new(records, ExplorerConfig::default());
    let mut surface = surface();
    assert!(explorer.frame(&mut surface, 0.0).drawn);
    assert_eq!(explorer.search("graz"), vec![1]);
}
