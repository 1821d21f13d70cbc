use egui::{Context, Key, Modifiers, Pos2, Rect, Vec2};

/// Input the session controller cares about, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// Primary button pressed over the canvas
    PointerDown(Pos2),
    /// Pointer moved while a stroke is open; may be outside the canvas
    PointerMove(Pos2),
    /// Primary button released
    PointerUp,
    Undo,
    Redo,
}

/// Primary pointer state for one frame, in screen coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSample {
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
}

/// Handles converting raw egui input into canvas events
#[derive(Debug, Default)]
pub struct CanvasInput {
    drawing: bool,
    last_canvas_pos: Option<Pos2>,
}

impl CanvasInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process raw egui input for a canvas shown at `canvas_rect`
    pub fn process_input(
        &mut self,
        ctx: &Context,
        canvas_rect: Rect,
        canvas_size: Vec2,
    ) -> Vec<CanvasEvent> {
        let sample = ctx.input(|input| PointerSample {
            pos: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
        });
        let mut events = self.translate(sample, canvas_rect, canvas_size);

        // Shortcuts are ignored mid-stroke
        if !self.drawing {
            let (undo, redo) = ctx.input_mut(|input| {
                let redo = input.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z)
                    || input.consume_key(Modifiers::COMMAND, Key::Y);
                let undo = input.consume_key(Modifiers::COMMAND, Key::Z);
                (undo, redo)
            });
            if undo {
                events.push(CanvasEvent::Undo);
            }
            if redo {
                events.push(CanvasEvent::Redo);
            }
        }

        events
    }

    /// Turn one frame of pointer state into events.
    ///
    /// A stroke only starts inside the canvas but keeps tracking the pointer
    /// outside of it until release.
    pub fn translate(
        &mut self,
        sample: PointerSample,
        canvas_rect: Rect,
        canvas_size: Vec2,
    ) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        let local = sample.pos.map(|pos| to_canvas(pos, canvas_rect, canvas_size));

        if sample.pressed && !self.drawing {
            if let (Some(screen), Some(local)) = (sample.pos, local) {
                if canvas_rect.contains(screen) {
                    events.push(CanvasEvent::PointerDown(local));
                    self.drawing = true;
                    self.last_canvas_pos = Some(local);
                }
            }
        } else if self.drawing {
            if let Some(local) = local {
                if self.last_canvas_pos != Some(local) {
                    events.push(CanvasEvent::PointerMove(local));
                    self.last_canvas_pos = Some(local);
                }
            }
        }

        if sample.released && self.drawing {
            events.push(CanvasEvent::PointerUp);
            self.drawing = false;
            self.last_canvas_pos = None;
        }

        events
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }
}

/// Map a screen position into canvas pixels
pub fn to_canvas(pos: Pos2, canvas_rect: Rect, canvas_size: Vec2) -> Pos2 {
    let relative = (pos - canvas_rect.min) / canvas_rect.size();
    (relative * canvas_size).to_pos2()
}

/// Map canvas pixels back onto the screen
pub fn to_screen(pos: Pos2, canvas_rect: Rect, canvas_size: Vec2) -> Pos2 {
    canvas_rect.min + pos.to_vec2() / canvas_size * canvas_rect.size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn rect() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(512.0, 512.0))
    }

    const SIZE: Vec2 = vec2(512.0, 512.0);

    fn sample(x: f32, y: f32, pressed: bool, released: bool) -> PointerSample {
        PointerSample {
            pos: Some(pos2(x, y)),
            pressed,
            released,
        }
    }

    #[test]
    fn test_coordinate_mapping() {
        let half = Rect::from_min_size(pos2(100.0, 50.0), vec2(256.0, 256.0));
        assert_eq!(to_canvas(pos2(228.0, 178.0), half, SIZE), pos2(256.0, 256.0));
        assert_eq!(to_screen(pos2(256.0, 256.0), half, SIZE), pos2(228.0, 178.0));
    }

    #[test]
    fn test_press_drag_release() {
        let mut input = CanvasInput::new();
        let down = input.translate(sample(100.0, 50.0, true, false), rect(), SIZE);
        assert_eq!(down, vec![CanvasEvent::PointerDown(pos2(0.0, 0.0))]);

        let drag = input.translate(sample(105.0, 55.0, false, false), rect(), SIZE);
        assert_eq!(drag, vec![CanvasEvent::PointerMove(pos2(5.0, 5.0))]);

        // Unchanged position produces nothing
        assert!(input.translate(sample(105.0, 55.0, false, false), rect(), SIZE).is_empty());

        let up = input.translate(sample(105.0, 55.0, false, true), rect(), SIZE);
        assert_eq!(up, vec![CanvasEvent::PointerUp]);
        assert!(!input.is_drawing());
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut input = CanvasInput::new();
        assert!(input.translate(sample(10.0, 10.0, true, false), rect(), SIZE).is_empty());
        assert!(input.translate(sample(200.0, 200.0, false, false), rect(), SIZE).is_empty());
        assert!(input.translate(sample(200.0, 200.0, false, true), rect(), SIZE).is_empty());
    }

    #[test]
    fn test_drag_leaving_canvas_keeps_tracking() {
        let mut input = CanvasInput::new();
        input.translate(sample(200.0, 200.0, true, false), rect(), SIZE);
        let moved = input.translate(sample(700.0, 200.0, false, false), rect(), SIZE);
        assert_eq!(moved, vec![CanvasEvent::PointerMove(pos2(600.0, 150.0))]);
    }

    #[test]
    fn test_click_in_one_frame() {
        let mut input = CanvasInput::new();
        let events = input.translate(sample(200.0, 200.0, true, true), rect(), SIZE);
        assert_eq!(
            events,
            vec![CanvasEvent::PointerDown(pos2(100.0, 150.0)), CanvasEvent::PointerUp]
        );
    }
}
