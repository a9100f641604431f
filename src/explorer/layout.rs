use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};

use eframe::egui::{Pos2, Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::{IndexConfig, LayoutConfig, TimelineFill};
use crate::explorer::categories::{Categories, Dimension};
use crate::explorer::quadtree::{QuadItem, SpatialIndex, padded_bounds};
use crate::explorer::store::RecordStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutKind {
    #[default]
    Clustered,
    Grid,
    Timeline,
    Radial,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [Self::Clustered, Self::Grid, Self::Timeline, Self::Radial];

    pub fn label(self) -> &'static str {
        match self {
            Self::Clustered => "Clustered",
            Self::Grid => "Grid",
            Self::Timeline => "Timeline",
            Self::Radial => "Radial",
        }
    }
}

/// Order of records inside a group (or along the spiral).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SecondaryKey {
    #[default]
    Identifier,
    Title,
    Year,
}

impl SecondaryKey {
    pub const ALL: [SecondaryKey; 3] = [Self::Identifier, Self::Title, Self::Year];

    pub fn label(self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::Title => "Title",
            Self::Year => "Year",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutStrategy {
    pub kind: LayoutKind,
    /// Grouping dimension. Timeline always groups by decade.
    pub primary: Option<Dimension>,
    pub secondary: SecondaryKey,
}

impl LayoutStrategy {
    pub fn new(kind: LayoutKind) -> Self {
        let primary = match kind {
            LayoutKind::Clustered => Some(Dimension::ObjectType),
            LayoutKind::Timeline => Some(Dimension::Decade),
            LayoutKind::Grid | LayoutKind::Radial => None,
        };
        Self {
            kind,
            primary,
            secondary: SecondaryKey::default(),
        }
    }

    pub fn with_primary(mut self, primary: Option<Dimension>) -> Self {
        self.primary = primary;
        self
    }

    pub fn with_secondary(mut self, secondary: SecondaryKey) -> Self {
        self.secondary = secondary;
        self
    }

    fn grouping(&self) -> Option<Dimension> {
        match self.kind {
            LayoutKind::Clustered => Some(self.primary.unwrap_or(Dimension::ObjectType)),
            LayoutKind::Timeline => Some(Dimension::Decade),
            LayoutKind::Grid => self.primary,
            LayoutKind::Radial => None,
        }
    }
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::new(LayoutKind::default())
    }
}

/// Caption drawn over a placed group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupLabel {
    pub key: String,
    pub center: Pos2,
    /// Half size of the group's footprint.
    pub extent: f32,
    pub members: usize,
}

#[derive(Clone, Copy)]
enum Arrangement {
    Rings,
    Grid,
}

struct Group {
    key: String,
    members: Vec<usize>,
}

pub struct LayoutEngine {
    config: LayoutConfig,
    index: IndexConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, index: IndexConfig) -> Self {
        Self { config, index }
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
    }

    /// Moves every record, then rebuilds `index` from the new positions.
    pub fn layout(
        &self,
        strategy: &LayoutStrategy,
        store: &mut RecordStore,
        categories: &Categories,
        index: &mut SpatialIndex,
    ) -> Vec<GroupLabel> {
        if store.is_empty() {
            index.clear();
            return Vec::new();
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut groups = self.groups(strategy, store, categories);
        for group in &mut groups {
            order_members(&mut group.members, strategy.secondary, store, categories);
        }

        let mut labels = Vec::new();
        match strategy.kind {
            LayoutKind::Clustered => {
                labels = self.place_clusters(&groups, Arrangement::Rings, store, &mut rng);
            }
            LayoutKind::Grid => {
                let placed = self.place_clusters(&groups, Arrangement::Grid, store, &mut rng);
                if strategy.primary.is_some() {
                    labels = placed;
                }
            }
            LayoutKind::Timeline => {
                let arrangement = match self.config.timeline_fill {
                    TimelineFill::Grid => Arrangement::Grid,
                    TimelineFill::Ring => Arrangement::Rings,
                };
                labels = self.place_timeline(&groups, arrangement, store, &mut rng);
            }
            LayoutKind::Radial => {
                for group in &groups {
                    self.place_spiral(&group.members, store);
                }
            }
        }
        store.finish_layout();

        let bounds = padded_bounds(
            store.positions(),
            self.index.bounds_padding,
            self.index.min_extent,
        );
        index.build(
            bounds,
            store
                .positions()
                .enumerate()
                .map(|(record, position)| QuadItem::point(position, record)),
        );

        info!(
            kind = strategy.kind.label(),
            primary = strategy.primary.map(Dimension::label),
            records = store.len(),
            groups = groups.len(),
            depth = index.depth(),
            "layout applied"
        );
        labels
    }

    fn groups(
        &self,
        strategy: &LayoutStrategy,
        store: &RecordStore,
        categories: &Categories,
    ) -> Vec<Group> {
        let Some(dimension) = strategy.grouping() else {
            return vec![Group {
                key: String::new(),
                members: (0..store.len()).collect(),
            }];
        };

        let mut by_key: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for record in 0..store.len() {
            by_key
                .entry(categories.key(record, dimension))
                .or_default()
                .push(record);
        }
        let mut groups = by_key
            .into_iter()
            .map(|(key, members)| Group {
                key: key.to_owned(),
                members,
            })
            .collect::<Vec<_>>();

        // Decade labels do not sort as text once years drop below 1000.
        if dimension == Dimension::Decade {
            groups.sort_by_key(|group| {
                let decade = group
                    .members
                    .first()
                    .and_then(|record| categories.keys(*record))
                    .and_then(|keys| keys.year)
                    .map(|year| year.div_euclid(10));
                (decade.is_none(), decade)
            });
        }
        groups
    }

    fn place_clusters(
        &self,
        groups: &[Group],
        arrangement: Arrangement,
        store: &mut RecordStore,
        rng: &mut StdRng,
    ) -> Vec<GroupLabel> {
        let extent = groups
            .iter()
            .map(|group| self.extent(arrangement, group.members.len()))
            .fold(0.0_f32, f32::max);
        let pitch = extent * 2.0 + self.config.cluster_gap;
        let columns = (groups.len() as f32).sqrt().ceil().max(1.0) as usize;
        let rows = groups.len().div_ceil(columns);

        let mut labels = Vec::with_capacity(groups.len());
        for (slot, group) in groups.iter().enumerate() {
            let column = (slot % columns) as f32 - (columns - 1) as f32 * 0.5;
            let row = (slot / columns) as f32 - (rows - 1) as f32 * 0.5;
            let center = Pos2::new(column * pitch, row * pitch);
            self.place_group(&group.members, center, arrangement, store, rng);
            labels.push(GroupLabel {
                key: group.key.clone(),
                center,
                extent: self.extent(arrangement, group.members.len()),
                members: group.members.len(),
            });
        }
        labels
    }

    fn place_timeline(
        &self,
        groups: &[Group],
        arrangement: Arrangement,
        store: &mut RecordStore,
        rng: &mut StdRng,
    ) -> Vec<GroupLabel> {
        let extents = groups
            .iter()
            .map(|group| self.extent(arrangement, group.members.len()))
            .collect::<Vec<_>>();
        let total = extents.iter().map(|extent| extent * 2.0).sum::<f32>()
            + self.config.cluster_gap * groups.len().saturating_sub(1) as f32;

        let mut cursor = -total * 0.5;
        let mut labels = Vec::with_capacity(groups.len());
        for (group, extent) in groups.iter().zip(extents) {
            let center = Pos2::new(cursor + extent, 0.0);
            self.place_group(&group.members, center, arrangement, store, rng);
            labels.push(GroupLabel {
                key: group.key.clone(),
                center,
                extent,
                members: group.members.len(),
            });
            cursor += extent * 2.0 + self.config.cluster_gap;
        }
        labels
    }

    fn place_group(
        &self,
        members: &[usize],
        center: Pos2,
        arrangement: Arrangement,
        store: &mut RecordStore,
        rng: &mut StdRng,
    ) {
        let offsets = match arrangement {
            Arrangement::Rings => self.ring_offsets(members.len(), rng),
            Arrangement::Grid => self.grid_offsets(members.len()),
        };
        for (&record, offset) in members.iter().zip(offsets) {
            store.place(record, center + offset);
        }
    }

    fn place_spiral(&self, members: &[usize], store: &mut RecordStore) {
        for (rank, &record) in members.iter().enumerate() {
            let angle = rank as f32 * self.config.spiral_tightness;
            let radius = angle * self.config.spiral_scale;
            store.place(record, (vec2(angle.cos(), angle.sin()) * radius).to_pos2());
        }
    }

    fn ring_count(count: usize) -> usize {
        ((count as f32 / PI).sqrt().ceil() as usize).max(1)
    }

    fn extent(&self, arrangement: Arrangement, count: usize) -> f32 {
        match arrangement {
            Arrangement::Rings if count <= 1 => self.config.jitter,
            Arrangement::Rings => {
                let outer = Self::ring_count(count) - 1;
                self.config.base_radius + outer as f32 * self.config.ring_spacing + self.config.jitter
            }
            Arrangement::Grid => {
                let columns = grid_columns(count);
                let rows = count.div_ceil(columns.max(1));
                columns.max(rows).saturating_sub(1) as f32 * self.config.cell_spacing * 0.5
            }
        }
    }

    fn ring_offsets(&self, count: usize, rng: &mut StdRng) -> Vec<Vec2> {
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![self.jitter(rng)];
        }

        let rings = Self::ring_count(count);
        let per_ring = count.div_ceil(rings);
        let mut offsets = Vec::with_capacity(count);
        for ring in 0..rings {
            let first = ring * per_ring;
            if first >= count {
                break;
            }
            let in_ring = per_ring.min(count - first);
            let radius = self.config.base_radius + ring as f32 * self.config.ring_spacing;
            for slot in 0..in_ring {
                let angle = TAU * slot as f32 / in_ring as f32;
                offsets.push(vec2(angle.cos(), angle.sin()) * radius + self.jitter(rng));
            }
        }
        offsets
    }

    fn grid_offsets(&self, count: usize) -> Vec<Vec2> {
        let columns = grid_columns(count);
        let rows = count.div_ceil(columns.max(1));
        let spacing = self.config.cell_spacing;
        (0..count)
            .map(|slot| {
                let column = (slot % columns) as f32 - (columns - 1) as f32 * 0.5;
                let row = (slot / columns) as f32 - rows.saturating_sub(1) as f32 * 0.5;
                vec2(column * spacing, row * spacing)
            })
            .collect()
    }

    fn jitter(&self, rng: &mut StdRng) -> Vec2 {
        let bound = self.config.jitter;
        if bound <= 0.0 {
            return Vec2::ZERO;
        }
        vec2(
            rng.random_range(-bound..=bound),
            rng.random_range(-bound..=bound),
        )
    }
}

fn grid_columns(count: usize) -> usize {
    ((count as f32).sqrt().ceil() as usize).max(1)
}

fn order_members(
    members: &mut [usize],
    secondary: SecondaryKey,
    store: &RecordStore,
    categories: &Categories,
) {
    let records = store.records();
    match secondary {
        SecondaryKey::Identifier => {
            members.sort_by(|a, b| records[*a].id.cmp(&records[*b].id).then(a.cmp(b)));
        }
        SecondaryKey::Title => {
            members.sort_by_cached_key(|record| {
                (records[*record].display_title().to_lowercase(), *record)
            });
        }
        SecondaryKey::Year => {
            members.sort_by_cached_key(|record| {
                let year = categories
                    .keys(*record)
                    .and_then(|keys| keys.year)
                    .unwrap_or(i32::MAX);
                (year, records[*record].id.clone())
            });
        }
    }
}
