//! Axis-aligned rectangle collision tests
//!
//! The only non-trivial check is the paddle-top graze: the ball should bounce
//! off the top face of the paddle and nowhere else, without a swept test.

use glam::Vec2;

/// Maximum vertical penetration past the paddle's top edge that still counts
/// as a top-face hit. Deeper overlap means the ball came in from the side or
/// below and must not bounce. Tunable; the value is inherited, not derived.
pub const GRAZE_TOLERANCE: f32 = 5.0;

/// Shallow-penetration test between the ball rectangle `a` and the paddle
/// rectangle `b` (both top-left anchored):
/// - horizontal spans overlap
/// - the ball's bottom edge is past the paddle's top edge
/// - but only by at most [`GRAZE_TOLERANCE`]
pub fn paddle_top_graze(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y + a_size.y > b_pos.y
        && a_pos.y + a_size.y - b_pos.y <= GRAZE_TOLERANCE
}
