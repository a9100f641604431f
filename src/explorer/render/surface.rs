use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2};

/// Immediate-mode drawing target. Coordinates are in points relative to the
/// surface's top-left corner; the engine repaints everything each frame.
pub trait Surface {
    fn size(&self) -> Vec2;

    fn pixels_per_point(&self) -> f32;

    fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color32);

    fn stroke_rect(&mut self, rect: Rect, rounding: f32, stroke: Stroke);

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke);

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    fn text(&mut self, position: Pos2, anchor: Align2, text: &str, size: f32, color: Color32);

    fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color32 },
    StrokeRect { rect: Rect, stroke: Stroke },
    FillCircle { center: Pos2, radius: f32, color: Color32 },
    StrokeCircle { center: Pos2, radius: f32, stroke: Stroke },
    Line { from: Pos2, to: Pos2, stroke: Stroke },
    Text { position: Pos2, text: String, size: f32, color: Color32 },
}

/// Surface that only remembers what was drawn.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Vec2,
    pixels_per_point: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            pixels_per_point: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn with_pixels_per_point(mut self, pixels_per_point: f32) -> Self {
        self.pixels_per_point = pixels_per_point;
        self
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn strokes_with(&self, color: Color32) -> usize {
        self.commands
            .iter()
            .filter(|command| match command {
                DrawCommand::StrokeRect { stroke, .. }
                | DrawCommand::StrokeCircle { stroke, .. }
                | DrawCommand::Line { stroke, .. } => stroke.color == color,
                _ => false,
            })
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    fn fill_rect(&mut self, rect: Rect, _rounding: f32, color: Color32) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, _rounding: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeRect { rect, stroke });
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke,
        });
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn text(&mut self, position: Pos2, _anchor: Align2, text: &str, size: f32, color: Color32) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            size,
            color,
        });
    }
}
