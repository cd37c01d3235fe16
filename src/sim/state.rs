//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there is no
//! ambient global state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::SimClock;
use crate::Arena;
use crate::config::SimConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball in flight
    Playing,
    /// Ball fell past the bottom edge
    GameOver,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the paddle
    PaddleBounce { vel: Vec2 },
    /// Ball crossed the bottom edge
    BallLost { at: f64 },
    BonusSpawned { pos: Vec2, radius: f32 },
    BonusCaught { score: u64 },
    BonusMissed,
    /// Passive score accrual
    ScoreTick { score: u64 },
    /// Ball velocity multiplied by the ramp factor
    SpeedRamp { speed: f32 },
}

/// The player's paddle (center-anchored box)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    /// Paddle resting on the bottom edge of the arena
    pub fn new(x: f32, size: Vec2, arena: &Arena) -> Self {
        Self {
            pos: Vec2::new(x, arena.height - size.y / 2.0),
            size,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }

    /// Close `1/smoothing` of the horizontal gap to `target_x`
    pub fn follow(&mut self, target_x: f32, smoothing: f32) {
        self.pos.x += (target_x - self.pos.x) / smoothing;
    }
}

/// The main ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A transient collectible; at most one exists at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Bonus {
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// Score counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub value: u64,
}

impl Score {
    pub fn add(&mut self, points: u64) -> u64 {
        self.value += points;
        self.value
    }
}

/// Last-known pointer position, written by the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub pos: Vec2,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// Gameplay timer anchors, all on the simulated `last_tick` timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    /// Last passive score award
    pub score_at: f64,
    /// Last speed ramp
    pub ramp_at: f64,
    /// Last bonus resolution (catch or miss), or session start
    pub bonus_resolved_at: f64,
}

impl Timers {
    pub fn new(start: f64) -> Self {
        Self {
            score_at: start,
            ramp_at: start,
            bonus_resolved_at: start,
        }
    }

    /// Move every anchor forward, so skipped time counts for nothing
    pub fn shift(&mut self, delta: f64) {
        self.score_at += delta;
        self.ramp_at += delta;
        self.bonus_resolved_at += delta;
    }
}

/// Complete simulation state (deterministic given the RNG)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub arena: Arena,
    pub phase: GamePhase,
    pub clock: SimClock,
    pub timers: Timers,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bonus: Option<Bonus>,
    pub score: Score,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session starting at simulated time `start`
    pub fn new(config: &SimConfig, arena: Arena, start: f64) -> Self {
        let size = Vec2::new(config.paddle_width, config.paddle_height);
        let ball = Ball {
            pos: Vec2::new(arena.top_center().x, config.ball_start_y),
            vel: config.ball_start_velocity,
            radius: config.ball_radius,
        };

        Self {
            arena,
            phase: GamePhase::Playing,
            clock: SimClock::new(start, config.tick_length),
            timers: Timers::new(start),
            paddle: Paddle::new(config.paddle_start_x, size, &arena),
            ball,
            bonus: None,
            score: Score::default(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Simulated time cursor
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.last_tick
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
