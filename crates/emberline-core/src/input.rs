//! Pointer input tracking.

use kurbo::Point;
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in surface coordinates (top-left origin, y increases
/// downward).
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Tracks pointer state across the host's split position/button events.
///
/// winit reports button changes without a position; the tracked cursor
/// position turns them back into positioned pointer events for the surface.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in surface coordinates.
    pub position: Point,
    pressed: HashSet<MouseButton>,
    /// Start of the current left-button drag, if one is in progress.
    pub drag_start: Option<Point>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a button press at the tracked position and return the event.
    pub fn press(&mut self, button: MouseButton) -> PointerEvent {
        self.pressed.insert(button);
        if button == MouseButton::Left && self.drag_start.is_none() {
            self.drag_start = Some(self.position);
        }
        PointerEvent::Down {
            position: self.position,
            button,
        }
    }

    /// Record a button release at the tracked position and return the event.
    pub fn release(&mut self, button: MouseButton) -> PointerEvent {
        self.pressed.remove(&button);
        if button == MouseButton::Left {
            self.drag_start = None;
        }
        PointerEvent::Up {
            position: self.position,
            button,
        }
    }

    /// Record a cursor move and return the event.
    pub fn moved(&mut self, position: Point) -> PointerEvent {
        self.position = position;
        PointerEvent::Move { position }
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Whether a left-button drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_uses_tracked_position() {
        let mut input = InputState::new();
        input.moved(Point::new(100.0, 50.0));

        let event = input.press(MouseButton::Left);
        match event {
            PointerEvent::Down { position, button } => {
                assert_eq!(position, Point::new(100.0, 50.0));
                assert_eq!(button, MouseButton::Left);
            }
            _ => panic!("expected a down event"),
        }
        assert!(input.is_pressed(MouseButton::Left));
        assert!(input.is_dragging());
    }

    #[test]
    fn test_release_ends_drag() {
        let mut input = InputState::new();
        input.moved(Point::new(10.0, 10.0));
        input.press(MouseButton::Left);
        input.moved(Point::new(40.0, 40.0));
        input.release(MouseButton::Left);

        assert!(!input.is_pressed(MouseButton::Left));
        assert!(!input.is_dragging());
    }

    #[test]
    fn test_drag_start_keeps_press_position() {
        let mut input = InputState::new();
        input.moved(Point::new(5.0, 6.0));
        input.press(MouseButton::Left);
        input.moved(Point::new(50.0, 60.0));

        assert_eq!(input.drag_start, Some(Point::new(5.0, 6.0)));
        assert_eq!(input.position, Point::new(50.0, 60.0));
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let mut input = InputState::new();
        input.press(MouseButton::Right);
        assert!(!input.is_dragging());
    }
}
