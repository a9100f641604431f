use eframe::egui::{Pos2, Rect, Vec2, vec2};

const FALLBACK_EXTENT: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadItem {
    pub bounds: Rect,
    pub index: usize,
}

impl QuadItem {
    pub fn point(position: Pos2, index: usize) -> Self {
        Self {
            bounds: Rect::from_min_max(position, position),
            index,
        }
    }
}

/// One node rectangle, exported for the debug overlay.
#[derive(Clone, Copy, Debug)]
pub struct QuadCell {
    pub bounds: Rect,
    pub depth: usize,
    pub is_leaf: bool,
    pub items: usize,
}

struct QuadNode {
    bounds: Rect,
    depth: usize,
    items: Vec<QuadItem>,
    children: Option<Box<[QuadNode; 4]>>,
}

/// Region quad-tree over record bounding boxes.
///
/// Quadrant membership is half-open: an item belongs to the west half when
/// `max.x < center.x` and to the east half when `min.x >= center.x` (same for
/// north/south). Anything else straddles the split and stays at the parent.
pub struct SpatialIndex {
    root: Option<QuadNode>,
    max_items_per_node: usize,
    max_depth: usize,
    len: usize,
}

fn touches(a: Rect, b: Rect) -> bool {
    a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
}

fn quadrant_for(region: Rect, item: Rect) -> Option<usize> {
    let center = region.center();
    let west = item.max.x < center.x;
    let east = item.min.x >= center.x;
    let north = item.max.y < center.y;
    let south = item.min.y >= center.y;

    match (west, east, north, south) {
        (true, _, true, _) => Some(0),
        (_, true, true, _) => Some(1),
        (true, _, _, true) => Some(2),
        (_, true, _, true) => Some(3),
        _ => None,
    }
}

fn child_bounds(region: Rect, quadrant: usize) -> Rect {
    let center = region.center();
    match quadrant {
        0 => Rect::from_min_max(region.min, center),
        1 => Rect::from_min_max(Pos2::new(center.x, region.min.y), Pos2::new(region.max.x, center.y)),
        2 => Rect::from_min_max(Pos2::new(region.min.x, center.y), Pos2::new(center.x, region.max.y)),
        _ => Rect::from_min_max(center, region.max),
    }
}

impl QuadNode {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, item: QuadItem, max_items: usize, max_depth: usize) {
        if let Some(children) = self.children.as_mut() {
            match quadrant_for(self.bounds, item.bounds) {
                Some(quadrant) => children[quadrant].insert(item, max_items, max_depth),
                None => self.items.push(item),
            }
            return;
        }

        self.items.push(item);
        if self.items.len() > max_items && self.depth < max_depth {
            self.split(max_items, max_depth);
        }
    }

    fn split(&mut self, max_items: usize, max_depth: usize) {
        let bounds = self.bounds;
        let depth = self.depth + 1;
        let mut children = Box::new(std::array::from_fn::<_, 4, _>(|quadrant| {
            QuadNode::new(child_bounds(bounds, quadrant), depth)
        }));

        let items = std::mem::take(&mut self.items);
        for item in items {
            match quadrant_for(bounds, item.bounds) {
                Some(quadrant) => children[quadrant].insert(item, max_items, max_depth),
                None => self.items.push(item),
            }
        }
        self.children = Some(children);
    }

    fn query(&self, rect: Rect, out: &mut Vec<usize>) {
        out.extend(
            self.items
                .iter()
                .filter(|item| touches(item.bounds, rect))
                .map(|item| item.index),
        );

        let Some(children) = self.children.as_ref() else {
            return;
        };

        // A rect on one side of a split line can only meet that side's children.
        let center = self.bounds.center();
        let west = rect.min.x < center.x;
        let east = rect.max.x >= center.x;
        let north = rect.min.y < center.y;
        let south = rect.max.y >= center.y;

        for (quadrant, child) in children.iter().enumerate() {
            let horizontal = if quadrant % 2 == 0 { west } else { east };
            let vertical = if quadrant < 2 { north } else { south };
            if horizontal && vertical {
                child.query(rect, out);
            }
        }
    }

    fn collect_cells(&self, cells: &mut Vec<QuadCell>) {
        cells.push(QuadCell {
            bounds: self.bounds,
            depth: self.depth,
            is_leaf: self.children.is_none(),
            items: self.items.len(),
        });

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_cells(cells);
            }
        }
    }

    fn max_depth_reached(&self) -> usize {
        self.children.as_ref().map_or(self.depth, |children| {
            children
                .iter()
                .map(QuadNode::max_depth_reached)
                .max()
                .unwrap_or(self.depth)
        })
    }
}

impl SpatialIndex {
    pub fn new(max_items_per_node: usize, max_depth: usize) -> Self {
        Self {
            root: None,
            max_items_per_node: max_items_per_node.max(1),
            max_depth,
            len: 0,
        }
    }

    /// Replaces all prior contents.
    pub fn build(&mut self, bounds: Rect, items: impl IntoIterator<Item = QuadItem>) {
        self.root = Some(QuadNode::new(bounds, 0));
        self.len = 0;
        for item in items {
            self.insert(item);
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub fn insert(&mut self, item: QuadItem) {
        let max_items = self.max_items_per_node;
        let max_depth = self.max_depth;
        let root = self
            .root
            .get_or_insert_with(|| QuadNode::new(item.bounds.expand(FALLBACK_EXTENT * 0.5), 0));
        root.insert(item, max_items, max_depth);
        self.len += 1;
    }

    pub fn query(&self, rect: Rect) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(rect, &mut out);
        out
    }

    pub fn query_into(&self, rect: Rect, out: &mut Vec<usize>) {
        out.clear();
        if let Some(root) = self.root.as_ref() {
            root.query(rect, out);
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.root.as_ref().map(|root| root.bounds)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, QuadNode::max_depth_reached)
    }

    pub fn cells(&self, cells: &mut Vec<QuadCell>) {
        cells.clear();
        if let Some(root) = self.root.as_ref() {
            root.collect_cells(cells);
        }
    }
}

/// Padded bounding box of `points`, never thinner than `min_extent`.
/// An empty input yields a fixed box of `min_extent` around the origin.
pub fn padded_bounds(points: impl IntoIterator<Item = Pos2>, padding: f32, min_extent: f32) -> Rect {
    let mut min = Pos2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);

    for point in points {
        if !point.x.is_finite() || !point.y.is_finite() {
            continue;
        }
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
    }

    if !min.x.is_finite() || !max.x.is_finite() {
        return Rect::from_center_size(Pos2::ZERO, Vec2::splat(min_extent));
    }

    let bounds = Rect::from_min_max(min, max).expand(padding.max(0.0));
    let size = vec2(bounds.width().max(min_extent), bounds.height().max(min_extent));
    Rect::from_center_size(bounds.center(), size)
}
