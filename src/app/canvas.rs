use eframe::egui::{
    self, Align2, Color32, Event, FontId, InputState, Key, Painter, Pos2, Rect, Response, Sense, Stroke,
    StrokeKind, Ui, Vec2,
};
use km_explorer::explorer::interaction::{Effects, InputEvent, KeyCommand, TouchPhase};
use km_explorer::explorer::render::Surface;

use super::ViewModel;

const KEY_BINDINGS: [(Key, KeyCommand); 14] = [
    (Key::ArrowLeft, KeyCommand::PanLeft),
    (Key::ArrowRight, KeyCommand::PanRight),
    (Key::ArrowUp, KeyCommand::PanUp),
    (Key::ArrowDown, KeyCommand::PanDown),
    (Key::Plus, KeyCommand::ZoomIn),
    (Key::Equals, KeyCommand::ZoomIn),
    (Key::Minus, KeyCommand::ZoomOut),
    (Key::Num0, KeyCommand::ResetView),
    (Key::Home, KeyCommand::ResetView),
    (Key::H, KeyCommand::ToggleHelp),
    (Key::Questionmark, KeyCommand::ToggleHelp),
    (Key::Slash, KeyCommand::FocusSearch),
    (Key::F, KeyCommand::FocusSearch),
    (Key::Escape, KeyCommand::ClearSelection),
];

/// egui painter clipped to the canvas, with surface-local coordinates.
pub(super) struct EguiSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    pixels_per_point: f32,
}

impl<'a> EguiSurface<'a> {
    pub(super) fn new(painter: &'a Painter, rect: Rect, pixels_per_point: f32) -> Self {
        Self {
            painter,
            rect,
            pixels_per_point,
        }
    }

    fn offset(&self) -> Vec2 {
        self.rect.min.to_vec2()
    }
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.painter
            .rect_filled(rect.translate(self.offset()), rounding, color);
    }

    fn stroke_rect(&mut self, rect: Rect, rounding: f32, stroke: Stroke) {
        self.painter.rect_stroke(
            rect.translate(self.offset()),
            rounding,
            stroke,
            StrokeKind::Inside,
        );
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter
            .circle_filled(center + self.offset(), radius, color);
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.painter
            .circle_stroke(center + self.offset(), radius, stroke);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        let offset = self.offset();
        self.painter.line_segment([from + offset, to + offset], stroke);
    }

    fn text(&mut self, position: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            position + self.offset(),
            anchor,
            text,
            FontId::proportional(size),
            color,
        );
    }
}

/// Pointer bookkeeping between frames.
#[derive(Default)]
pub(super) struct CanvasInput {
    hovering: bool,
    pressed: bool,
    last_pointer: Option<Pos2>,
}

impl CanvasInput {
    fn collect(&mut self, input: &InputState, rect: Rect, response: &Response, keyboard_free: bool) -> Vec<InputEvent> {
        let origin = rect.min.to_vec2();
        let local = |pos: Pos2| pos - origin;
        let time = input.time;
        let mut events = Vec::new();

        let mut touching = 0;
        for event in &input.events {
            let Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            let phase = match phase {
                egui::TouchPhase::Start if !rect.contains(*pos) => continue,
                egui::TouchPhase::Start => TouchPhase::Start,
                egui::TouchPhase::Move => TouchPhase::Move,
                egui::TouchPhase::End | egui::TouchPhase::Cancel => TouchPhase::End,
            };
            touching += 1;
            events.push(InputEvent::Touch {
                id: id.0,
                phase,
                position: local(*pos),
            });
        }
        let pinching = touching > 0 || input.multi_touch().is_some();

        let inside = response.contains_pointer();
        let pointer = input.pointer.latest_pos();

        if input.pointer.primary_pressed()
            && inside
            && let Some(pos) = pointer
        {
            self.pressed = true;
            events.push(InputEvent::PointerDown {
                position: local(pos),
                time,
            });
        }

        if let Some(pos) = pointer
            && (inside || self.pressed)
            && self.last_pointer != Some(pos)
        {
            events.push(InputEvent::PointerMove {
                position: local(pos),
            });
        }
        self.last_pointer = pointer;

        if self.pressed && input.pointer.primary_released() {
            self.pressed = false;
            let position = pointer.map_or(Pos2::ZERO, local);
            events.push(InputEvent::PointerUp { position, time });
        }

        if self.hovering && !inside && !self.pressed {
            events.push(InputEvent::PointerLeft);
        }
        self.hovering = inside;

        if inside && let Some(pos) = pointer {
            let zoom = input.zoom_delta();
            if !pinching && (zoom - 1.0).abs() > f32::EPSILON {
                events.push(InputEvent::Zoom {
                    factor: zoom,
                    position: local(pos),
                });
            } else if input.raw_scroll_delta.y.abs() > f32::EPSILON {
                events.push(InputEvent::Wheel {
                    delta: input.raw_scroll_delta.y,
                    position: local(pos),
                });
            }
        }

        if keyboard_free {
            for (key, command) in KEY_BINDINGS {
                if input.key_pressed(key) {
                    events.push(InputEvent::Key(command));
                }
            }
        }

        events
    }

    pub(super) fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let keyboard_free = !ui.ctx().wants_keyboard_input();

        let events = ui.input(|input| self.canvas.collect(input, rect, &response, keyboard_free));
        for event in events {
            let effects = self.explorer.handle_input(event);
            self.apply_effects(effects, ui);
        }

        let minimized = ui
            .ctx()
            .input(|input| input.viewport().minimized)
            .unwrap_or(false);
        self.explorer.set_paused(minimized);

        let now = ui.input(|input| input.time);
        let painter = ui.painter_at(rect);
        let mut surface = EguiSurface::new(&painter, rect, ui.ctx().pixels_per_point());
        let outcome = self.explorer.frame(&mut surface, now);

        if outcome.needs_repaint || self.canvas.is_pressed() {
            ui.ctx().request_repaint();
        }
    }

    fn apply_effects(&mut self, effects: Effects, ui: &Ui) {
        if effects.toggle_help {
            self.show_help = !self.show_help;
        }
        if effects.focus_search {
            self.focus_search = true;
            ui.ctx().request_repaint();
        }
    }
}
