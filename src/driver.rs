//! Frame loop
//!
//! The platform calls [`LoopDriver::on_frame`] once per display refresh. Each
//! call turns the frame timestamp into whole fixed ticks, runs them, then
//! renders once. Rendering, input and frame scheduling are collaborators
//! behind the traits below.

use std::cell::Cell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::Arena;
use crate::config::SimConfig;
use crate::sim::{Ball, Bonus, GameEvent, GamePhase, GameState, Paddle, Pointer, tick};

/// Opaque id of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i64);

/// Schedules the next display refresh
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Last-known pointer position
pub trait PointerSource {
    fn pointer(&self) -> Pointer;
}

impl PointerSource for Pointer {
    fn pointer(&self) -> Pointer {
        *self
    }
}

impl PointerSource for Cell<Pointer> {
    fn pointer(&self) -> Pointer {
        self.get()
    }
}

impl<T: PointerSource + ?Sized> PointerSource for Rc<T> {
    fn pointer(&self) -> Pointer {
        (**self).pointer()
    }
}

/// Draws one frame from a read-only view of the state
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub arena: Arena,
    pub phase: GamePhase,
    pub sim_time: f64,
    pub paddle: &'a Paddle,
    pub ball: &'a Ball,
    pub bonus: Option<&'a Bonus>,
    pub score: u64,
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            arena: state.arena,
            phase: state.phase,
            sim_time: state.now(),
            paddle: &state.paddle,
            ball: &state.ball,
            bonus: state.bonus.as_ref(),
            score: state.score.value,
        }
    }
}

/// Driver lifecycle; `Stopped` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    NotStarted,
    Running,
    Stopped,
}

/// What a single frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Fixed ticks simulated
    pub ticks: u32,
    /// Owed ticks dropped by the catch-up cap
    pub dropped: u64,
    pub rendered: bool,
    pub events: Vec<GameEvent>,
}

/// Owns a session and runs it one frame at a time
pub struct LoopDriver<R = Pcg32> {
    config: SimConfig,
    state: GameState,
    rng: R,
    phase: DriverPhase,
    pending: Option<FrameHandle>,
}

impl LoopDriver<Pcg32> {
    /// Session with a seeded PCG generator
    pub fn seeded(config: SimConfig, arena: Arena, seed: u64) -> Self {
        Self::new(config, arena, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> LoopDriver<R> {
    pub fn new(config: SimConfig, arena: Arena, rng: R) -> Self {
        let state = GameState::new(&config, arena, 0.0);
        Self {
            config,
            state,
            rng,
            phase: DriverPhase::NotStarted,
            pending: None,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tooling and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(&self.state)
    }

    /// Anchor the session at `t0` and request the first frame
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, t0: f64, scheduler: &mut S) {
        if self.phase != DriverPhase::NotStarted {
            log::warn!("start() ignored, driver is {:?}", self.phase);
            return;
        }
        self.state = GameState::new(&self.config, self.state.arena, t0);
        self.phase = DriverPhase::Running;
        self.pending = Some(scheduler.request_frame());
        log::info!(
            "Session started at t={t0:.0} on {}x{} (tick {} ms)",
            self.state.arena.width,
            self.state.arena.height,
            self.config.tick_length
        );
    }

    /// Handle one display refresh at `t_frame`
    pub fn on_frame<S, P, D>(
        &mut self,
        t_frame: f64,
        scheduler: &mut S,
        pointer: &P,
        renderer: &mut D,
    ) -> FrameOutcome
    where
        S: FrameScheduler + ?Sized,
        P: PointerSource + ?Sized,
        D: Renderer + ?Sized,
    {
        if self.phase != DriverPhase::Running {
            return FrameOutcome::default();
        }
        self.pending = Some(scheduler.request_frame());

        let budget = self
            .state
            .clock
            .budget(t_frame, self.config.max_ticks_per_frame);

        let mut outcome = FrameOutcome::default();
        for _ in 0..budget.run {
            self.state.clock.advance();
            tick(&mut self.state, &self.config, &pointer.pointer(), &mut self.rng);
            outcome.ticks += 1;
            if self.state.is_over() {
                break;
            }
        }

        if self.state.is_over() {
            outcome.events = self.state.drain_events();
            self.stop(scheduler);
            return outcome;
        }

        if budget.dropped() > 0 {
            let skipped = self.state.clock.skip(budget.dropped());
            self.state.timers.shift(skipped);
            outcome.dropped = budget.dropped();
            log::warn!(
                "Frame at t={t_frame:.0} owed {} ticks, dropped {} ({skipped:.0} ms)",
                budget.due,
                budget.dropped()
            );
        }

        renderer.render(&Snapshot::of(&self.state));
        self.state.clock.last_render = t_frame;
        outcome.rendered = true;
        outcome.events = self.state.drain_events();
        outcome
    }

    /// Cancel the pending frame and stop for good
    fn stop<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.phase = DriverPhase::Stopped;
        log::info!(
            "Session stopped after {} ticks with score {}",
            self.state.time_ticks,
            self.state.score.value
        );
    }
}
