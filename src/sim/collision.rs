//! Collision detection and response
//!
//! Detection returns a [`Contact`] tag and never mutates anything; each
//! entity's policy in `tick` decides what a contact means for it.

use glam::Vec2;
use rand::Rng;

use super::state::Paddle;
use crate::Arena;

/// Outcome of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    NoHit,
    /// Crossed the bottom edge; no other border checks apply
    BottomOut,
    /// Touching the left or right edge
    SideBounce,
    /// Touching the ceiling while moving up
    CeilingBounce,
    /// Side and ceiling in the same step
    CornerBounce,
    /// Landed on the paddle's top face
    PaddleHit,
}

impl Contact {
    /// Velocity after a border bounce; other contacts leave it alone
    pub fn reflect(self, vel: Vec2) -> Vec2 {
        match self {
            Contact::SideBounce => Vec2::new(-vel.x, vel.y),
            Contact::CeilingBounce => Vec2::new(vel.x, -vel.y),
            Contact::CornerBounce => -vel,
            _ => vel,
        }
    }
}

/// Shrunk radius used for border checks
#[inline]
pub fn diving_radius(radius: f32, diving_factor: f32) -> f32 {
    radius * diving_factor
}

/// Check a projectile against the screen borders
pub fn border_contact(pos: Vec2, vel: Vec2, diving_radius: f32, arena: &Arena) -> Contact {
    if pos.y + diving_radius > arena.height {
        return Contact::BottomOut;
    }

    let side = pos.x - diving_radius <= 0.0 || pos.x + diving_radius > arena.width;
    // Only bounce off the ceiling while still climbing into it
    let ceiling = pos.y - diving_radius <= 0.0 && vel.y < 0.0;

    match (side, ceiling) {
        (true, true) => Contact::CornerBounce,
        (true, false) => Contact::SideBounce,
        (false, true) => Contact::CeilingBounce,
        (false, false) => Contact::NoHit,
    }
}

/// Check a projectile against the paddle's top face
///
/// The lower edge (using `diving_radius`) must reach the paddle top, and
/// either horizontal edge (using the true `radius`) must sit strictly inside
/// the paddle's span.
pub fn paddle_contact(pos: Vec2, radius: f32, diving_radius: f32, paddle: &Paddle) -> Contact {
    if pos.y + diving_radius < paddle.top() {
        return Contact::NoHit;
    }

    let left = paddle.pos.x - paddle.half_width();
    let right = paddle.pos.x + paddle.half_width();
    let within = |x: f32| x > left && x < right;

    if within(pos.x + radius) || within(pos.x - radius) {
        Contact::PaddleHit
    } else {
        Contact::NoHit
    }
}

/// Ball velocity after a paddle hit
///
/// The horizontal component takes the vertical speed, signed by the current
/// horizontal direction (random when the ball is falling straight), then the
/// vertical component flips.
pub fn paddle_bounce<R: Rng + ?Sized>(vel: Vec2, rng: &mut R) -> Vec2 {
    let dir = if vel.x > 0.0 {
        1.0
    } else if vel.x < 0.0 {
        -1.0
    } else if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    };
    Vec2::new(dir * vel.y.abs(), -vel.y)
}
