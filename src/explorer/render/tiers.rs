//! Per-tier record drawing. Every routine reads the record and its flags and
//! draws; none of them touch record state.

use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2, vec2};

use super::palette::{
    CARD_FILL, OUTLINE, SEARCH_MATCH, SELECTED, TEXT, TEXT_MUTED, recede, tint, with_alpha,
};
use super::surface::Surface;
use crate::archive::Record;
use crate::explorer::categories::CategoryKeys;
use crate::explorer::lod::LodTier;
use crate::util::{truncate_label, wrap_words};

/// Scene-space size of a record drawn at `tier`.
pub fn footprint(tier: LodTier) -> Vec2 {
    match tier {
        LodTier::Dot => Vec2::splat(10.0),
        LodTier::Chip => vec2(38.0, 12.0),
        LodTier::Thumbnail => vec2(36.0, 46.0),
        LodTier::Card => vec2(40.0, 30.0),
        LodTier::Detail => vec2(42.0, 38.0),
    }
}

pub struct RecordView<'a> {
    pub record: &'a Record,
    pub keys: Option<&'a CategoryKeys>,
    /// Screen position of the record's scene position.
    pub center: Pos2,
    pub zoom: f32,
    pub color: Color32,
    pub selected: bool,
    pub search_match: bool,
    pub hovered: bool,
    /// Another record set is highlighted and this one is not part of it.
    pub dimmed: bool,
}

impl RecordView<'_> {
    fn fill(&self) -> Color32 {
        if self.dimmed {
            recede(self.color, 0.62)
        } else {
            self.color
        }
    }

    fn screen_rect(&self, tier: LodTier) -> Rect {
        Rect::from_center_size(self.center, footprint(tier) * self.zoom)
    }

    fn font(&self, scene_size: f32, min: f32, max: f32) -> f32 {
        (scene_size * self.zoom).clamp(min, max)
    }

    fn year_line(&self) -> String {
        let kind = self.record.kind.label();
        match self.keys.and_then(|keys| keys.year.map(|year| (year, keys.date_source))) {
            Some((year, source)) => format!("{kind} · {year} ({})", source.label()),
            None => kind.to_owned(),
        }
    }
}

pub fn draw_record(surface: &mut dyn Surface, tier: LodTier, view: &RecordView<'_>) {
    match tier {
        LodTier::Dot => draw_dot(surface, view),
        LodTier::Chip => draw_chip(surface, view),
        LodTier::Thumbnail => draw_thumbnail(surface, view),
        LodTier::Card => draw_card(surface, view),
        LodTier::Detail => draw_detail(surface, view),
    }
}

fn chars_for(width: f32, font: f32) -> usize {
    (width / (font * 0.56)).floor().max(0.0) as usize
}

fn highlight_rect(surface: &mut dyn Surface, rect: Rect, rounding: f32, view: &RecordView<'_>) {
    if view.search_match {
        surface.stroke_rect(rect.expand(2.0), rounding + 2.0, Stroke::new(1.6, SEARCH_MATCH));
    }
    if view.selected {
        surface.stroke_rect(rect.expand(4.0), rounding + 4.0, Stroke::new(2.0, SELECTED));
        surface.stroke_rect(
            rect.expand(7.0),
            rounding + 7.0,
            Stroke::new(3.0, with_alpha(SELECTED, 0.25)),
        );
    } else if view.hovered {
        surface.stroke_rect(rect.expand(2.0), rounding + 2.0, Stroke::new(1.2, TEXT_MUTED));
    }
}

fn draw_dot(surface: &mut dyn Surface, view: &RecordView<'_>) {
    let radius = (footprint(LodTier::Dot).x * 0.5 * view.zoom).clamp(1.5, 4.5);
    surface.fill_circle(view.center, radius, view.fill());

    if view.search_match {
        surface.stroke_circle(view.center, radius + 2.0, Stroke::new(1.2, SEARCH_MATCH));
    }
    if view.selected {
        surface.stroke_circle(view.center, radius + 4.0, Stroke::new(2.0, SELECTED));
        surface.stroke_circle(
            view.center,
            radius + 7.0,
            Stroke::new(3.0, with_alpha(SELECTED, 0.25)),
        );
    }
}

fn draw_chip(surface: &mut dyn Surface, view: &RecordView<'_>) {
    let rect = view.screen_rect(LodTier::Chip);
    let rounding = rect.height() * 0.5;
    surface.fill_rect(rect, rounding, tint(CARD_FILL, view.fill(), 0.35));
    surface.fill_circle(
        Pos2::new(rect.left() + rounding, rect.center().y),
        rounding * 0.55,
        view.fill(),
    );

    let font = view.font(6.0, 8.0, 12.0);
    let room = chars_for(rect.width() - rounding * 2.0, font);
    if room >= 3 {
        surface.text(
            Pos2::new(rect.left() + rounding * 2.0, rect.center().y),
            Align2::LEFT_CENTER,
            &truncate_label(view.record.display_title(), room),
            font,
            TEXT,
        );
    }
    highlight_rect(surface, rect, rounding, view);
}

fn draw_thumbnail(surface: &mut dyn Surface, view: &RecordView<'_>) {
    let rect = view.screen_rect(LodTier::Thumbnail);
    let image = Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.min.y + rect.width()));
    surface.fill_rect(rect, 3.0, CARD_FILL);

    if view.record.has_image {
        surface.fill_rect(image.shrink(2.0), 2.0, tint(CARD_FILL, view.fill(), 0.55));
        let frame = image.shrink(image.width() * 0.28);
        surface.stroke_rect(frame, 1.0, Stroke::new(1.0, with_alpha(TEXT, 0.5)));
        surface.fill_circle(
            frame.center() + vec2(frame.width() * 0.18, -frame.height() * 0.18),
            (frame.width() * 0.08).max(1.0),
            with_alpha(TEXT, 0.5),
        );
    } else {
        let inner = image.shrink(2.0);
        let stroke = Stroke::new(1.0, with_alpha(view.fill(), 0.6));
        surface.stroke_rect(inner, 2.0, stroke);
        surface.line(inner.left_top(), inner.right_bottom(), stroke);
        surface.line(inner.right_top(), inner.left_bottom(), stroke);
    }

    let font = view.font(4.5, 8.0, 12.0);
    let room = chars_for(rect.width() - 4.0, font);
    if room >= 3 {
        surface.text(
            Pos2::new(rect.center().x, image.max.y + (rect.max.y - image.max.y) * 0.5),
            Align2::CENTER_CENTER,
            &truncate_label(view.record.display_title(), room),
            font,
            TEXT,
        );
    }
    highlight_rect(surface, rect, 3.0, view);
}

fn draw_card(surface: &mut dyn Surface, view: &RecordView<'_>) {
    let rect = view.screen_rect(LodTier::Card);
    surface.fill_rect(rect, 4.0, CARD_FILL);
    let header = Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.min.y + rect.height() * 0.12));
    surface.fill_rect(header, 4.0, view.fill());

    let font = view.font(3.2, 9.0, 13.0);
    let room = chars_for(rect.width() - 12.0, font);
    let mut cursor = Pos2::new(rect.left() + 6.0, header.max.y + 5.0);
    for line in wrap_words(view.record.display_title(), room, 2) {
        surface.text(cursor, Align2::LEFT_TOP, &line, font, TEXT);
        cursor.y += font * 1.3;
    }

    let small = font * 0.85;
    surface.text(
        Pos2::new(rect.left() + 6.0, rect.max.y - 5.0),
        Align2::LEFT_BOTTOM,
        &truncate_label(&view.year_line(), chars_for(rect.width() - 12.0, small)),
        small,
        TEXT_MUTED,
    );
    surface.stroke_rect(rect, 4.0, Stroke::new(1.0, OUTLINE));
    highlight_rect(surface, rect, 4.0, view);
}

fn draw_detail(surface: &mut dyn Surface, view: &RecordView<'_>) {
    let rect = view.screen_rect(LodTier::Detail);
    surface.fill_rect(rect, 5.0, CARD_FILL);
    let header = Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.min.y + rect.height() * 0.08));
    surface.fill_rect(header, 5.0, view.fill());

    let font = view.font(2.6, 10.0, 15.0);
    let small = font * 0.8;
    let left = rect.left() + 8.0;
    let room = chars_for(rect.width() - 16.0, font);
    let small_room = chars_for(rect.width() - 16.0, small);
    let mut cursor = Pos2::new(left, header.max.y + 6.0);

    for line in wrap_words(view.record.display_title(), room, 2) {
        surface.text(cursor, Align2::LEFT_TOP, &line, font, TEXT);
        cursor.y += font * 1.3;
    }
    cursor.y += small * 0.4;

    let mut facts = vec![view.year_line(), view.record.id.clone()];
    if let Some(keys) = view.keys {
        if !keys.crime_matches.is_empty() {
            facts.push(keys.crime_matches.join(", "));
        }
        facts.push(format!("{} · {}", keys.region, keys.object_class));
    }
    for fact in facts {
        surface.text(cursor, Align2::LEFT_TOP, &truncate_label(&fact, small_room), small, TEXT_MUTED);
        cursor.y += small * 1.3;
    }

    cursor.y += small * 0.4;
    let lines_left = ((rect.max.y - 8.0 - cursor.y - small * 1.4) / (small * 1.3)).floor().max(0.0) as usize;
    for line in wrap_words(&view.record.description, small_room, lines_left) {
        surface.text(cursor, Align2::LEFT_TOP, &line, small, TEXT);
        cursor.y += small * 1.3;
    }

    let badges = [
        ("IMG", view.record.has_image),
        ("SRC", view.record.has_primary_source),
        ("RDF", view.record.has_rdf),
    ];
    let mut badge = Pos2::new(left, rect.max.y - 6.0);
    for (label, present) in badges {
        let color = if present { view.fill() } else { with_alpha(TEXT_MUTED, 0.35) };
        surface.text(badge, Align2::LEFT_BOTTOM, label, small, color);
        badge.x += small * 2.6;
    }

    surface.stroke_rect(rect, 5.0, Stroke::new(1.0, OUTLINE));
    highlight_rect(surface, rect, 5.0, view);
}
