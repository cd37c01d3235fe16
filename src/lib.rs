//! Paddle Catch - a paddle-and-ball arcade game on a fixed timestep
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, entities, collisions, scoring)
//! - `driver`: Frame loop that turns display refreshes into fixed ticks
//! - `config`: Data-driven tuning, loadable from JSON
//! - `platform`: Browser collaborators (frame scheduling, pointer, canvas)

pub mod config;
pub mod driver;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use driver::{
    DriverPhase, FrameHandle, FrameOutcome, FrameScheduler, LoopDriver, PointerSource, Renderer,
    Snapshot,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default tuning values (time in milliseconds, distances in pixels)
pub mod consts {
    /// Fixed simulation step length
    pub const TICK_LENGTH: f64 = 15.0;
    /// Maximum ticks per frame before backlog is dropped
    pub const MAX_TICKS_PER_FRAME: u32 = 240;

    /// Paddle defaults (center-anchored box resting on the bottom edge)
    pub const PADDLE_WIDTH: f32 = 400.0;
    pub const PADDLE_HEIGHT: f32 = 50.0;
    pub const PADDLE_START_X: f32 = 100.0;
    /// Paddle closes 1/N of the gap to the pointer each tick
    pub const PADDLE_SMOOTHING: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 25.0;
    pub const BALL_START_Y: f32 = 30.0;
    pub const BALL_START_VX: f32 = 0.0;
    pub const BALL_START_VY: f32 = 5.0;
    /// Shrinks the ball's collision radius against the screen borders
    pub const DIVING_FACTOR: f32 = 0.9;

    /// Scoring
    pub const SCORE_INTERVAL: f64 = 1000.0;
    pub const BONUS_SCORE: u64 = 15;

    /// Bonus projectile
    pub const BONUS_COOLDOWN: f64 = 5000.0;
    pub const BONUS_MARGIN: f32 = 30.0;
    /// Fraction of the screen (from the top) where bonuses appear
    pub const BONUS_BAND: f32 = 0.3;
    pub const BONUS_RADIUS_MIN: f32 = 20.0;
    pub const BONUS_RADIUS_MAX: f32 = 30.0;
    pub const BONUS_VX_MIN: f32 = -6.0;
    pub const BONUS_VX_MAX: f32 = 7.0;
    pub const BONUS_VY_MIN: f32 = 1.0;
    pub const BONUS_VY_MAX: f32 = 4.0;

    /// Ball speed ramp
    pub const SPEED_RAMP_INTERVAL: f64 = 5000.0;
    pub const SPEED_RAMP_FACTOR: f32 = 1.1;
}

/// Size of the playing surface in screen pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the top edge
    #[inline]
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, 0.0)
    }
}
