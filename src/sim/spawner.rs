//! Bonus spawning, score accrual and the ball speed ramp
//!
//! All three run off anchors on the simulated timeline ([`Timers`]), never
//! off wall-clock time.
//!
//! [`Timers`]: super::state::Timers

use glam::Vec2;
use rand::Rng;

use super::state::{Bonus, GameEvent, GameState};
use crate::Arena;
use crate::config::{SimConfig, SpawnRange};

/// Bonus lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusPhase {
    /// Nothing on screen; cooldown running
    Inactive,
    /// A bonus is moving
    Active,
}

/// How a live bonus left the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusResolution {
    Caught,
    Missed,
}

pub fn bonus_phase(state: &GameState) -> BonusPhase {
    if state.bonus.is_some() {
        BonusPhase::Active
    } else {
        BonusPhase::Inactive
    }
}

/// Uniform sample in `[min, max)`, or `min` when the range is empty
fn sample<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, range: SpawnRange) -> f32 {
    sample(rng, range.min, range.max)
}

/// Roll a new bonus somewhere in the top band of the screen
pub fn roll_bonus<R: Rng + ?Sized>(arena: &Arena, config: &SimConfig, rng: &mut R) -> Bonus {
    let margin = config.bonus_margin;
    let x = if arena.width > 2.0 * margin {
        sample(rng, margin, arena.width - margin)
    } else {
        arena.width / 2.0
    };
    let band = arena.height * config.bonus_band;
    let y = sample(rng, margin.min(band), band);

    Bonus {
        pos: Vec2::new(x, y),
        vel: Vec2::new(sample_range(rng, config.bonus_vx), sample_range(rng, config.bonus_vy)),
        radius: sample_range(rng, config.bonus_radius),
    }
}

/// Spawn a bonus once the cooldown since the last resolution has elapsed
pub fn maybe_spawn_bonus<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &SimConfig,
    rng: &mut R,
) -> bool {
    if bonus_phase(state) == BonusPhase::Active {
        return false;
    }
    if state.now() - state.timers.bonus_resolved_at < config.bonus_cooldown {
        return false;
    }

    let bonus = roll_bonus(&state.arena, config, rng);
    log::debug!(
        "Bonus spawned at ({:.0}, {:.0}) r={:.1} v=({:.2}, {:.2})",
        bonus.pos.x,
        bonus.pos.y,
        bonus.radius,
        bonus.vel.x,
        bonus.vel.y
    );
    state.events.push(GameEvent::BonusSpawned {
        pos: bonus.pos,
        radius: bonus.radius,
    });
    state.bonus = Some(bonus);
    true
}

/// Despawn the live bonus and restart the cooldown; a catch pays out
pub fn resolve_bonus(state: &mut GameState, config: &SimConfig, how: BonusResolution) {
    if state.bonus.take().is_none() {
        return;
    }
    state.timers.bonus_resolved_at = state.now();

    match how {
        BonusResolution::Caught => {
            let score = state.score.add(config.bonus_score);
            log::debug!("Bonus caught, score {score}");
            state.events.push(GameEvent::BonusCaught { score });
        }
        BonusResolution::Missed => {
            log::debug!("Bonus missed");
            state.events.push(GameEvent::BonusMissed);
        }
    }
}

/// One point per elapsed score interval
pub fn accrue_score(state: &mut GameState, config: &SimConfig) {
    while state.now() - state.timers.score_at >= config.score_interval {
        state.timers.score_at += config.score_interval;
        let score = state.score.add(1);
        state.events.push(GameEvent::ScoreTick { score });
    }
}

/// Multiply the ball velocity by the ramp factor every ramp interval
pub fn ramp_speed(state: &mut GameState, config: &SimConfig) {
    while state.now() - state.timers.ramp_at >= config.speed_ramp_interval {
        state.timers.ramp_at += config.speed_ramp_interval;

        let ball = &mut state.ball;
        ball.vel *= config.speed_ramp_factor;
        if let Some(max) = config.max_ball_speed {
            ball.vel = ball.vel.clamp_length_max(max);
        }

        let speed = ball.speed();
        log::debug!("Speed ramp: ball speed now {speed:.2}");
        state.events.push(GameEvent::SpeedRamp { speed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(&SimConfig::default(), Arena::new(1000.0, 800.0), 0.0)
    }

    #[test]
    fn test_roll_bonus_stays_in_ranges() {
        let config = SimConfig::default();
        let arena = Arena::new(1000.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..500 {
            let bonus = roll_bonus(&arena, &config, &mut rng);
            assert!(bonus.pos.x >= 30.0 && bonus.pos.x < 970.0);
            assert!(bonus.pos.y >= 30.0 && bonus.pos.y < 240.0);
            assert!(bonus.radius >= 20.0 && bonus.radius < 30.0);
            assert!(bonus.vel.x >= -6.0 && bonus.vel.x < 7.0);
            assert!(bonus.vel.y >= 1.0 && bonus.vel.y < 4.0);
        }
    }

    #[test]
    fn test_roll_bonus_tiny_arena() {
        let config = SimConfig::default();
        let arena = Arena::new(40.0, 50.0);
        let bonus = roll_bonus(&arena, &config, &mut Pcg32::seed_from_u64(1));
        assert_eq!(bonus.pos.x, 20.0);
        assert_eq!(bonus.pos.y, arena.height * config.bonus_band);
    }

    #[test]
    fn test_spawn_waits_for_cooldown() {
        let config = SimConfig::default();
        let mut state = state();
        let mut rng = Pcg32::seed_from_u64(3);

        state.clock.last_tick = 4999.0;
        assert!(!maybe_spawn_bonus(&mut state, &config, &mut rng));
        assert_eq!(bonus_phase(&state), BonusPhase::Inactive);

        state.clock.last_tick = 5000.0;
        assert!(maybe_spawn_bonus(&mut state, &config, &mut rng));
        assert_eq!(bonus_phase(&state), BonusPhase::Active);

        // Never a second one while active
        state.clock.last_tick = 20000.0;
        assert!(!maybe_spawn_bonus(&mut state, &config, &mut rng));
        assert_eq!(
            state.events.iter().filter(|e| matches!(e, GameEvent::BonusSpawned { .. })).count(),
            1
        );
    }

    #[test]
    fn test_resolution_restarts_cooldown() {
        let config = SimConfig::default();
        let mut state = state();
        let mut rng = Pcg32::seed_from_u64(3);

        state.clock.last_tick = 5000.0;
        maybe_spawn_bonus(&mut state, &config, &mut rng);
        state.clock.last_tick = 6000.0;
        resolve_bonus(&mut state, &config, BonusResolution::Missed);
        assert_eq!(state.timers.bonus_resolved_at, 6000.0);
        assert_eq!(state.score.value, 0);

        state.clock.last_tick = 10999.0;
        assert!(!maybe_spawn_bonus(&mut state, &config, &mut rng));
        state.clock.last_tick = 11000.0;
        assert!(maybe_spawn_bonus(&mut state, &config, &mut rng));
    }

    #[test]
    fn test_catch_pays_bonus() {
        let config = SimConfig::default();
        let mut state = state();
        state.clock.last_tick = 5000.0;
        maybe_spawn_bonus(&mut state, &config, &mut Pcg32::seed_from_u64(9));
        resolve_bonus(&mut state, &config, BonusResolution::Caught);
        assert_eq!(state.score.value, 15);
        assert!(state.bonus.is_none());
        assert_eq!(state.events.last(), Some(&GameEvent::BonusCaught { score: 15 }));

        // Resolving with nothing live is a no-op
        resolve_bonus(&mut state, &config, BonusResolution::Caught);
        assert_eq!(state.score.value, 15);
    }

    #[test]
    fn test_score_accrues_per_interval() {
        let config = SimConfig::default();
        let mut state = state();

        state.clock.last_tick = 999.0;
        accrue_score(&mut state, &config);
        assert_eq!(state.score.value, 0);

        state.clock.last_tick = 1005.0;
        accrue_score(&mut state, &config);
        assert_eq!(state.score.value, 1);
        // Anchor stays on the interval grid, not the tick time
        assert_eq!(state.timers.score_at, 1000.0);

        state.clock.last_tick = 3000.0;
        accrue_score(&mut state, &config);
        assert_eq!(state.score.value, 3);
    }

    #[test]
    fn test_speed_ramp() {
        let config = SimConfig::default();
        let mut state = state();
        state.ball.vel = Vec2::new(5.0, -5.0);

        state.clock.last_tick = 4995.0;
        ramp_speed(&mut state, &config);
        assert_eq!(state.ball.vel, Vec2::new(5.0, -5.0));

        state.clock.last_tick = 5010.0;
        ramp_speed(&mut state, &config);
        assert!((state.ball.vel.x - 5.5).abs() < 1e-5);
        assert!((state.ball.vel.y + 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_speed_ramp_cap() {
        let config = SimConfig {
            max_ball_speed: Some(10.0),
            ..SimConfig::default()
        };
        let mut state = state();
        state.ball.vel = Vec2::new(8.0, 8.0);
        state.clock.last_tick = 5000.0;
        ramp_speed(&mut state, &config);
        assert!((state.ball.speed() - 10.0).abs() < 1e-4);
        // Direction preserved
        assert!((state.ball.vel.x - state.ball.vel.y).abs() < 1e-5);
    }
}
