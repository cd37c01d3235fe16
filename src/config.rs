//! Simulation tuning
//!
//! Every constant the game plays by lives here so a session can be reshaped
//! from a JSON document. Missing keys fall back to the defaults in
//! [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Half-open `[min, max)` range used for randomized spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                field,
                reason: format!("empty range [{}, {})", self.min, self.max),
            })
        }
    }
}

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Clock ===
    /// Simulated time per fixed step
    pub tick_length: f64,
    /// Catch-up cap per frame (`None` runs every owed tick)
    pub max_ticks_per_frame: Option<u32>,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_start_x: f32,
    pub paddle_smoothing: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start_y: f32,
    pub ball_start_velocity: Vec2,
    /// Fraction of the ball radius used against the screen borders
    pub diving_factor: f32,

    // === Scoring ===
    pub score_interval: f64,
    pub bonus_score: u64,

    // === Bonus projectile ===
    pub bonus_cooldown: f64,
    pub bonus_margin: f32,
    pub bonus_band: f32,
    pub bonus_radius: SpawnRange,
    pub bonus_vx: SpawnRange,
    pub bonus_vy: SpawnRange,

    // === Speed ramp ===
    pub speed_ramp_interval: f64,
    pub speed_ramp_factor: f32,
    /// Upper bound on ball speed (`None` lets the ramp grow forever)
    pub max_ball_speed: Option<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_length: TICK_LENGTH,
            max_ticks_per_frame: Some(MAX_TICKS_PER_FRAME),

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_start_x: PADDLE_START_X,
            paddle_smoothing: PADDLE_SMOOTHING,

            ball_radius: BALL_RADIUS,
            ball_start_y: BALL_START_Y,
            ball_start_velocity: Vec2::new(BALL_START_VX, BALL_START_VY),
            diving_factor: DIVING_FACTOR,

            score_interval: SCORE_INTERVAL,
            bonus_score: BONUS_SCORE,

            bonus_cooldown: BONUS_COOLDOWN,
            bonus_margin: BONUS_MARGIN,
            bonus_band: BONUS_BAND,
            bonus_radius: SpawnRange::new(BONUS_RADIUS_MIN, BONUS_RADIUS_MAX),
            bonus_vx: SpawnRange::new(BONUS_VX_MIN, BONUS_VX_MAX),
            bonus_vy: SpawnRange::new(BONUS_VY_MIN, BONUS_VY_MAX),

            speed_ramp_interval: SPEED_RAMP_INTERVAL,
            speed_ramp_factor: SPEED_RAMP_FACTOR,
            max_ball_speed: None,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_length", self.tick_length)?;
        positive("score_interval", self.score_interval)?;
        positive("bonus_cooldown", self.bonus_cooldown)?;
        positive("speed_ramp_interval", self.speed_ramp_interval)?;
        positive("paddle_width", self.paddle_width as f64)?;
        positive("paddle_height", self.paddle_height as f64)?;
        positive("paddle_smoothing", self.paddle_smoothing as f64)?;
        positive("ball_radius", self.ball_radius as f64)?;

        if !(self.diving_factor > 0.0 && self.diving_factor <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "diving_factor",
                reason: format!("must be in (0, 1], got {}", self.diving_factor),
            });
        }
        if !(0.0..=1.0).contains(&self.bonus_band) {
            return Err(ConfigError::Invalid {
                field: "bonus_band",
                reason: format!("must be in [0, 1], got {}", self.bonus_band),
            });
        }
        if self.speed_ramp_factor < 1.0 {
            return Err(ConfigError::Invalid {
                field: "speed_ramp_factor",
                reason: format!("must be >= 1, got {}", self.speed_ramp_factor),
            });
        }
        if self.max_ticks_per_frame == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_ticks_per_frame",
                reason: "a zero cap would never advance the simulation".to_string(),
            });
        }
        if let Some(max) = self.max_ball_speed {
            positive("max_ball_speed", max as f64)?;
        }

        self.bonus_radius.check("bonus_radius")?;
        self.bonus_vx.check("bonus_vx")?;
        self.bonus_vy.check("bonus_vy")?;

        // A bonus must spawn fully on screen
        if !(self.bonus_margin >= 0.0 && self.bonus_margin >= self.bonus_radius.max) {
            return Err(ConfigError::Invalid {
                field: "bonus_margin",
                reason: format!(
                    "must be >= 0 and >= the largest bonus radius ({}), got {}",
                    self.bonus_radius.max, self.bonus_margin
                ),
            });
        }
        Ok(())
    }
}
