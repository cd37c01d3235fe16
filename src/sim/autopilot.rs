//! Demo-mode pointer
//!
//! Stands in for a human player: tracks the ball, and goes after a live
//! bonus while the ball is climbing away from the paddle.

use super::state::{GameState, Pointer};

/// How many ticks ahead to lead the ball
const LEAD_TICKS: f32 = 8.0;

/// Pointer position the autopilot would hold this tick
pub fn target(state: &GameState) -> Pointer {
    let ball = &state.ball;
    let climbing = ball.vel.y < 0.0;

    let x = match &state.bonus {
        Some(bonus) if climbing => bonus.pos.x + bonus.vel.x * LEAD_TICKS,
        _ => ball.pos.x + ball.vel.x * LEAD_TICKS,
    };

    Pointer::new(x.clamp(0.0, state.arena.width), state.paddle.pos.y)
}
