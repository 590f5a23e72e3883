//! Scene building for the draggable marker.

use kurbo::{Affine, Rect, RoundedRect};
use peniko::{Color, Fill};
use vello::Scene;

/// Corner radius of the marker in logical pixels.
pub const MARKER_RADIUS: f64 = 10.0;

/// Paint the marker into `scene`.
///
/// `bounds` is in logical pixels; `scale` is the window's scale factor.
pub fn paint_marker(scene: &mut Scene, bounds: Rect, scale: f64, color: Color) {
    let shape = RoundedRect::from_rect(bounds, MARKER_RADIUS);
    scene.fill(Fill::NonZero, Affine::scale(scale), color, None, &shape);
}
