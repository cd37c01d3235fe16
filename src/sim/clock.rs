//! Fixed-step clock
//!
//! Converts irregular frame timestamps into a whole number of fixed ticks.
//! The simulated cursor `last_tick` only ever moves in `tick_length` steps,
//! so slow frames become several small steps instead of one big one.

use serde::{Deserialize, Serialize};

/// Simulated time cursor plus render bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Simulated time of the last completed tick
    pub last_tick: f64,
    /// Timestamp of the last render pass
    pub last_render: f64,
    /// Fixed step length
    pub tick_length: f64,
}

/// How many ticks a frame owes and how many it may actually run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickBudget {
    /// Ticks owed to catch up with the frame timestamp
    pub due: u64,
    /// Ticks to run this frame (`due` clamped to the cap)
    pub run: u32,
}

impl TickBudget {
    /// Ticks owed beyond the cap
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.due - self.run as u64
    }
}

impl SimClock {
    pub fn new(start: f64, tick_length: f64) -> Self {
        Self {
            last_tick: start,
            last_render: start,
            tick_length,
        }
    }

    /// Ticks owed at `t_frame`; zero unless the frame is past the next tick
    pub fn ticks_due(&self, t_frame: f64) -> u64 {
        let next_tick = self.last_tick + self.tick_length;
        if t_frame > next_tick {
            ((t_frame - self.last_tick) / self.tick_length).floor() as u64
        } else {
            0
        }
    }

    /// [`Self::ticks_due`] clamped to an optional per-frame cap
    pub fn budget(&self, t_frame: f64, cap: Option<u32>) -> TickBudget {
        let due = self.ticks_due(t_frame);
        let run = match cap {
            Some(cap) => due.min(cap as u64) as u32,
            None => due.min(u32::MAX as u64) as u32,
        };
        TickBudget { due, run }
    }

    /// Move the cursor forward by one tick and return the new tick time
    #[inline]
    pub fn advance(&mut self) -> f64 {
        self.last_tick += self.tick_length;
        self.last_tick
    }

    /// Skip `ticks` without simulating them; returns the time skipped
    pub fn skip(&mut self, ticks: u64) -> f64 {
        let skipped = ticks as f64 * self.tick_length;
        self.last_tick += skipped;
        skipped
    }
}
