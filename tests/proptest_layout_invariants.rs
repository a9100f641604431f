//! Property tests for layout and category extraction.
//!
//! 1. Every layout leaves every record at a finite position, and a query over
//!    the index bounds returns all of them.
//! 2. Every record lands in exactly one category per dimension.

use std::collections::BTreeSet;

use eframe::egui::{Pos2, Vec2, vec2};
use km_explorer::archive::{Record, RecordKind};
use km_explorer::config::{CategoryConfig, ExplorerConfig, IndexConfig, LayoutConfig, ViewportConfig};
use km_explorer::explorer::Explorer;
use km_explorer::explorer::categories::{CategoryExtractor, DateSource, Dimension};
use km_explorer::explorer::layout::{LayoutEngine, LayoutKind, LayoutStrategy, SecondaryKey};
use km_explorer::explorer::quadtree::SpatialIndex;
use km_explorer::explorer::store::RecordStore;
use km_explorer::explorer::viewport::Viewport;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const TITLES: [&str; 8] = [
    "",
    "Revolver",
    "Karteikarte Diebstahl in Graz",
    "Wildererstutzen, beschlagnahmt 1911",
    "Brief zu einem Betrug in Wien",
    "Schlüsselbund aus Leoben",
    "Falschgeld § 197",
    "Mordwaffe (Messer)",
];

const KINDS: [RecordKind; 3] = [RecordKind::Object, RecordKind::IndexCard, RecordKind::Unknown];

fn records(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(
        (0..KINDS.len(), 0..TITLES.len(), proptest::option::of(1840i32..1960)),
        0..=max_len,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (kind, title, year))| {
                let record = Record::new(format!("o:km.{i}"), KINDS[kind]).with_title(TITLES[title]);
                match year {
                    Some(year) => record.with_created_date(format!("{year}-01-01")),
                    None => record,
                }
            })
            .collect()
    })
}

fn strategy() -> impl Strategy<Value = LayoutStrategy> {
    (
        prop::sample::select(LayoutKind::ALL.to_vec()),
        proptest::option::of(prop::sample::select(Dimension::ALL.to_vec())),
        prop::sample::select(SecondaryKey::ALL.to_vec()),
    )
        .prop_map(|(kind, primary, secondary)| {
            LayoutStrategy::new(kind).with_primary(primary).with_secondary(secondary)
        })
}

struct Laid {
    store: RecordStore,
    index: SpatialIndex,
}

fn lay_out(records: Vec<Record>, strategy: LayoutStrategy, seed: u64) -> Laid {
    let categories = CategoryExtractor::new(CategoryConfig::default()).extract(&records);
    let mut store = RecordStore::new(records);
    let index_config = IndexConfig::default();
    let mut index = SpatialIndex::new(index_config.max_items_per_node, index_config.max_depth);
    let layout = LayoutConfig {
        seed,
        ..LayoutConfig::default()
    };
    LayoutEngine::new(layout, index_config).layout(&strategy, &mut store, &categories, &mut index);
    Laid { store, index }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. layout coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_record_is_placed_and_indexed(
        records in records(120),
        strategy in strategy(),
        seed in any::<u64>(),
    ) {
        let count = records.len();
        let Laid { store, index } = lay_out(records, strategy, seed);

        for (record, position) in store.positions().enumerate() {
            prop_assert!(
                position.x.is_finite() && position.y.is_finite(),
                "record {} at {:?} under {:?}", record, position, strategy
            );
        }

        let found = index
            .bounds()
            .map(|bounds| index.query(bounds))
            .unwrap_or_default()
            .into_iter()
            .collect::<BTreeSet<_>>();
        prop_assert_eq!(found, (0..count).collect::<BTreeSet<_>>());
    }
}

proptest! {
    #[test]
    fn same_seed_same_positions(records in records(60), strategy in strategy(), seed in any::<u64>()) {
        let first = lay_out(records.clone(), strategy, seed);
        let second = lay_out(records, strategy, seed);
        prop_assert!(first.store.positions().eq(second.store.positions()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. category completeness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_record_has_one_key_per_dimension(records in records(150)) {
        let categories = CategoryExtractor::new(CategoryConfig::default()).extract(&records);
        prop_assert_eq!(categories.len(), records.len());

        for dimension in Dimension::ALL {
            let mut seen = vec![0usize; records.len()];
            for (key, members) in categories.groups(dimension).into_iter().flatten() {
                for &member in members {
                    seen[member] += 1;
                    prop_assert_eq!(categories.key(member, dimension), key.as_str());
                }
            }
            prop_assert!(
                seen.iter().all(|count| *count == 1),
                "{:?} membership counts {:?}", dimension, seen
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn empty_collection_lays_out_to_nothing() {
    for kind in LayoutKind::ALL {
        let Laid { store, index } = lay_out(Vec::new(), LayoutStrategy::new(kind), 7);
        assert!(store.is_empty());
        assert!(index.is_empty());
        assert_eq!(index.bounds(), None);
    }

    let mut explorer = Explorer::new(Vec::new(), ExplorerConfig::default());
    assert!(explorer.search("revolver").is_empty());
    assert!(!explorer.zoom_to_matches());
}

#[test]
fn single_clustered_record_sits_at_the_origin() {
    let records = vec![Record::new("o:km.1", RecordKind::Object).with_title("Revolver")];
    let Laid { store, index } = lay_out(records, LayoutStrategy::new(LayoutKind::Clustered), 42);

    let jitter = LayoutConfig::default().jitter;
    let position = store.position(0).unwrap_or(Pos2::new(f32::NAN, f32::NAN));
    assert!(position.x.abs() <= jitter && position.y.abs() <= jitter, "{position:?}");

    let config = ViewportConfig::default();
    for zoom in [config.min_zoom, 0.5, 1.0, 4.0, config.max_zoom] {
        let mut viewport = Viewport::new(&config);
        viewport.set_size(vec2(800.0, 600.0));
        viewport.animate_to(zoom, Vec2::ZERO, 0.0);
        viewport.advance(0.0);

        let visible = viewport.visible_scene_rect();
        assert!(visible.contains(position), "zoom {zoom}");
        assert_eq!(index.query(visible), vec![0]);
    }
}

#[test]
fn created_date_1923_falls_in_the_1920s() {
    let records = vec![Record::new("o:km.1923", RecordKind::IndexCard).with_created_date("1923")];
    let categories = CategoryExtractor::new(CategoryConfig::default()).extract(&records);
    let keys = categories.keys(0).cloned();

    assert_eq!(categories.key(0, Dimension::Decade), "1920s");
    assert_eq!(keys.map(|keys| (keys.year, keys.date_source)), Some((Some(1923), DateSource::Explicit)));
}

#[test]
fn nothing_matched_falls_back_to_sane_buckets() {
    let config = CategoryConfig {
        estimate_missing_years: false,
        ..CategoryConfig::default()
    };
    let records = vec![Record::new("o:km.x", RecordKind::Unknown)];
    let categories = CategoryExtractor::new(config).extract(&records);

    assert_eq!(categories.key(0, Dimension::Decade), "unclassified");
    assert_eq!(categories.key(0, Dimension::CrimeType), "unclassified");
    assert_eq!(categories.key(0, Dimension::Region), "general region");
}
