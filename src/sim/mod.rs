//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, driven by the simulated clock
//! - Injected RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{SimClock, TickBudget};
pub use collision::{Contact, border_contact, diving_radius, paddle_bounce, paddle_contact};
pub use spawner::{BonusPhase, BonusResolution, bonus_phase};
pub use state::{
    Ball, Bonus, GameEvent, GamePhase, GameState, Paddle, Pointer, Score, Timers,
};
pub use tick::tick;
