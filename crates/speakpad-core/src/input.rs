//! Pointer tracking for mouse/touch drags on the marker.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Raw pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Primary button pressed / finger down.
    Down { position: Point },
    /// Pointer moved.
    Move { position: Point },
    /// Primary button released / finger up.
    Up { position: Point },
    /// The platform took the pointer away (focus loss, touch cancel).
    Cancel,
}

/// Gesture events derived from pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// A drag started on the target.
    Start,
    /// Total displacement since the drag started.
    Move(Vec2),
    /// The drag finished.
    End,
}

/// Tracks a single drag gesture on a hit-tested target.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    /// Press position of the current drag.
    drag_start: Option<Point>,
}

impl PointerTracker {
    /// Create a tracker with no drag in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Press position of the current drag, if any.
    pub fn drag_start(&self) -> Option<Point> {
        self.drag_start
    }

    /// Process a pointer event against the target's current bounds.
    ///
    /// Only a press inside `target` starts a drag. Moves report the
    /// displacement from the press point, not from the previous move.
    pub fn handle(&mut self, event: PointerEvent, target: Rect) -> Option<GestureEvent> {
        match event {
            PointerEvent::Down { position } => {
                if self.drag_start.is_some() || !target.contains(position) {
                    return None;
                }
                self.drag_start = Some(position);
                Some(GestureEvent::Start)
            }
            PointerEvent::Move { position } => {
                let start = self.drag_start?;
                Some(GestureEvent::Move(position - start))
            }
            PointerEvent::Up { .. } | PointerEvent::Cancel => {
                self.drag_start.take().map(|_| GestureEvent::End)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 200.0)
    }

    #[test]
    fn test_press_inside_starts_drag() {
        let mut tracker = PointerTracker::new();
        let event = tracker.handle(
            PointerEvent::Down { position: Point::new(150.0, 150.0) },
            target(),
        );

        assert_eq!(event, Some(GestureEvent::Start));
        assert!(tracker.is_dragging());
        assert_eq!(tracker.drag_start(), Some(Point::new(150.0, 150.0)));
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut tracker = PointerTracker::new();
        let event = tracker.handle(
            PointerEvent::Down { position: Point::new(10.0, 10.0) },
            target(),
        );

        assert_eq!(event, None);
        assert!(!tracker.is_dragging());

        let moved = tracker.handle(
            PointerEvent::Move { position: Point::new(150.0, 150.0) },
            target(),
        );
        assert_eq!(moved, None);
    }

    #[test]
    fn test_move_reports_displacement_from_press() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Down { position: Point::new(150.0, 150.0) }, target());

        let first = tracker.handle(PointerEvent::Move { position: Point::new(155.0, 155.0) }, target());
        let second = tracker.handle(PointerEvent::Move { position: Point::new(162.0, 147.0) }, target());

        assert_eq!(first, Some(GestureEvent::Move(Vec2::new(5.0, 5.0))));
        assert_eq!(second, Some(GestureEvent::Move(Vec2::new(12.0, -3.0))));
    }

    #[test]
    fn test_release_ends_drag() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Down { position: Point::new(150.0, 150.0) }, target());

        let end = tracker.handle(PointerEvent::Up { position: Point::new(300.0, 300.0) }, target());
        assert_eq!(end, Some(GestureEvent::End));
        assert!(!tracker.is_dragging());

        // A second release has nothing to end
        let again = tracker.handle(PointerEvent::Up { position: Point::new(300.0, 300.0) }, target());
        assert_eq!(again, None);
    }

    #[test]
    fn test_cancel_ends_drag() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Down { position: Point::new(150.0, 150.0) }, target());

        assert_eq!(tracker.handle(PointerEvent::Cancel, target()), Some(GestureEvent::End));
        assert_eq!(tracker.handle(PointerEvent::Cancel, target()), None);
    }

    #[test]
    fn test_drag_continues_outside_target() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Down { position: Point::new(150.0, 150.0) }, target());

        let moved = tracker.handle(PointerEvent::Move { position: Point::new(500.0, 20.0) }, target());
        assert_eq!(moved, Some(GestureEvent::Move(Vec2::new(350.0, -130.0))));
    }
}
