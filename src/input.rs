use egui::{Context, Pos2, Rect};

/// Mouse buttons the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// Pointer input in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64, button: PointerButton },
    PointerUp { x: f64, y: f64, button: PointerButton },
    PointerMove { x: f64, y: f64 },
}

const BUTTONS: [(egui::PointerButton, PointerButton); 2] = [
    (egui::PointerButton::Primary, PointerButton::Left),
    (egui::PointerButton::Secondary, PointerButton::Right),
];

/// Pointer state sampled from one egui frame, indexed like `BUTTONS`.
#[derive(Debug, Clone, Copy, Default)]
struct PointerFrame {
    pos: Option<Pos2>,
    pressed: [bool; 2],
    released: [bool; 2],
}

/// Turns raw egui pointer input over the canvas into [`InputEvent`]s.
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Screen position to document coordinates, relative to the canvas corner.
    pub fn to_document(&self, pos: Pos2) -> (f64, f64) {
        let local = pos - self.canvas_rect.min;
        (f64::from(local.x), f64::from(local.y))
    }

    /// Pointer events of this frame. Presses and moves count only over the
    /// canvas; a release anywhere is forwarded, clamped to the canvas.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let frame = ctx.input(|input| PointerFrame {
            pos: input.pointer.latest_pos(),
            pressed: BUTTONS.map(|(button, _)| input.pointer.button_pressed(button)),
            released: BUTTONS.map(|(button, _)| input.pointer.button_released(button)),
        });
        self.translate(frame)
    }

    fn translate(&mut self, frame: PointerFrame) -> Vec<InputEvent> {
        let mut events = Vec::new();
        match frame.pos.filter(|pos| self.canvas_rect.contains(*pos)) {
            Some(pos) => {
                let (x, y) = self.to_document(pos);
                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove { x, y });
                    self.last_pointer_pos = Some(pos);
                }
                for (index, (_, button)) in BUTTONS.iter().enumerate() {
                    if frame.pressed[index] {
                        events.push(InputEvent::PointerDown { x, y, button: *button });
                    }
                    if frame.released[index] {
                        events.push(InputEvent::PointerUp { x, y, button: *button });
                    }
                }
            }
            None => {
                let pos = frame
                    .pos
                    .or(self.last_pointer_pos)
                    .map_or(self.canvas_rect.min, |pos| self.canvas_rect.clamp(pos));
                self.last_pointer_pos = None;
                let (x, y) = self.to_document(pos);
                for (index, (_, button)) in BUTTONS.iter().enumerate() {
                    if frame.released[index] {
                        events.push(InputEvent::PointerUp { x, y, button: *button });
                    }
                }
            }
        }
        events
    }
}
