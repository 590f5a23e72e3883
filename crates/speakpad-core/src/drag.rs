//! Position model for the draggable marker.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Offset of the draggable marker from its layout position.
///
/// The offset is split in two: `committed` holds everything baked in by
/// finished gestures, `live` holds the displacement of the gesture in
/// progress. Move events report the total displacement since the gesture
/// started, so `live` is replaced on every move and only folded into
/// `committed` on release. Re-grabbing the marker therefore continues from
/// where it was dropped instead of snapping back to the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragOffset {
    /// Offset accumulated by completed gestures.
    committed: Vec2,
    /// Displacement of the active gesture. Zero while idle.
    live: Vec2,
    /// Whether a gesture is in progress.
    active: bool,
}

impl DragOffset {
    /// Create an offset at the origin with no gesture in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a gesture as active so that move events are accepted.
    pub fn begin(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.live = Vec2::ZERO;
    }

    /// Replace the live displacement with the total delta since the gesture
    /// started. Ignored when no gesture is active.
    pub fn update(&mut self, delta: Vec2) {
        if !self.active {
            return;
        }
        self.live = delta;
    }

    /// Fold the live displacement into the committed offset and go idle.
    ///
    /// Calling this without an active gesture does nothing.
    pub fn end(&mut self) {
        if !self.active {
            return;
        }
        self.committed += self.live;
        self.live = Vec2::ZERO;
        self.active = false;
    }

    /// Position to render at: committed plus live offset.
    pub fn rendered_position(&self) -> Vec2 {
        self.committed + self.live
    }

    /// Offset baked in by completed gestures.
    pub fn committed(&self) -> Vec2 {
        self.committed
    }

    /// Displacement of the gesture in progress.
    pub fn live(&self) -> Vec2 {
        self.live
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(actual: Vec2, x: f64, y: f64) {
        assert!((actual.x - x).abs() < f64::EPSILON, "x: {} != {}", actual.x, x);
        assert!((actual.y - y).abs() < f64::EPSILON, "y: {} != {}", actual.y, y);
    }

    #[test]
    fn test_starts_at_origin() {
        let offset = DragOffset::new();
        assert_eq!(offset.rendered_position(), Vec2::ZERO);
        assert!(!offset.is_dragging());
    }

    #[test]
    fn test_moves_are_absolute_since_start() {
        let mut offset = DragOffset::new();
        offset.begin();
        offset.update(Vec2::new(5.0, 5.0));
        assert_vec_eq(offset.rendered_position(), 5.0, 5.0);

        offset.update(Vec2::new(12.0, -3.0));
        assert_vec_eq(offset.rendered_position(), 12.0, -3.0);
    }

    #[test]
    fn test_final_delta_wins_on_release() {
        let mut offset = DragOffset::new();
        offset.begin();
        offset.update(Vec2::new(5.0, 5.0));
        offset.update(Vec2::new(12.0, -3.0));
        offset.end();

        assert_vec_eq(offset.committed(), 12.0, -3.0);
        assert_eq!(offset.live(), Vec2::ZERO);
        assert!(!offset.is_dragging());
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut offset = DragOffset::new();
        offset.begin();
        offset.update(Vec2::new(10.0, 20.0));
        offset.end();
        let after_first = offset.rendered_position();

        offset.end();
        assert_eq!(offset.rendered_position(), after_first);
        assert_vec_eq(after_first, 10.0, 20.0);
    }

    #[test]
    fn test_move_ignored_while_idle() {
        let mut offset = DragOffset::new();
        offset.update(Vec2::new(50.0, 50.0));
        assert_eq!(offset.rendered_position(), Vec2::ZERO);
        assert_eq!(offset.live(), Vec2::ZERO);
    }

    #[test]
    fn test_second_gesture_continues_from_committed() {
        let mut offset = DragOffset::new();
        offset.begin();
        offset.update(Vec2::new(30.0, 40.0));
        offset.end();

        // Grabbing again must not jump back to the origin
        offset.begin();
        assert_vec_eq(offset.rendered_position(), 30.0, 40.0);

        offset.update(Vec2::new(-10.0, 5.0));
        assert_vec_eq(offset.rendered_position(), 20.0, 45.0);

        offset.end();
        assert_vec_eq(offset.committed(), 20.0, 45.0);
    }

    #[test]
    fn test_begin_twice_keeps_live_delta() {
        let mut offset = DragOffset::new();
        offset.begin();
        offset.update(Vec2::new(7.0, 7.0));
        offset.begin();
        assert_vec_eq(offset.live(), 7.0, 7.0);
    }
}
