//! Fixed timestep simulation tick
//!
//! One call advances entities by exactly one step. The caller moves the
//! clock forward first (see [`SimClock::advance`]).
//!
//! [`SimClock::advance`]: super::clock::SimClock::advance

use rand::Rng;

use super::collision::{Contact, border_contact, diving_radius, paddle_bounce, paddle_contact};
use super::spawner::{BonusResolution, accrue_score, maybe_spawn_bonus, ramp_speed, resolve_bonus};
use super::state::{GameEvent, GamePhase, GameState, Pointer};
use crate::config::SimConfig;

/// Advance the game state by one fixed step
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &SimConfig,
    pointer: &Pointer,
    rng: &mut R,
) {
    if state.is_over() {
        return;
    }
    state.time_ticks += 1;

    state
        .paddle
        .follow(pointer.pos.x, config.paddle_smoothing);

    // --- BALL ---
    // Border first: a bottom-out ends the session before any paddle save
    let ball = &mut state.ball;
    ball.integrate();
    let ball_diving = diving_radius(ball.radius, config.diving_factor);
    match border_contact(ball.pos, ball.vel, ball_diving, &state.arena) {
        Contact::BottomOut => {
            let at = state.clock.last_tick;
            log::info!(
                "Ball lost at t={at:.0} after {} ticks, score {}",
                state.time_ticks,
                state.score.value
            );
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::BallLost { at });
            return;
        }
        contact => ball.vel = contact.reflect(ball.vel),
    }
    // Only a falling ball can land on the paddle
    if ball.vel.y > 0.0
        && paddle_contact(ball.pos, ball.radius, ball_diving, &state.paddle) == Contact::PaddleHit
    {
        ball.vel = paddle_bounce(ball.vel, rng);
        state.events.push(GameEvent::PaddleBounce { vel: ball.vel });
    }

    // --- BONUS ---
    // Uses its true radius everywhere
    let mut resolution = None;
    if let Some(bonus) = state.bonus.as_mut() {
        bonus.integrate();
        match border_contact(bonus.pos, bonus.vel, bonus.radius, &state.arena) {
            Contact::BottomOut => resolution = Some(BonusResolution::Missed),
            contact => {
                bonus.vel = contact.reflect(bonus.vel);
                if paddle_contact(bonus.pos, bonus.radius, bonus.radius, &state.paddle)
                    == Contact::PaddleHit
                {
                    resolution = Some(BonusResolution::Caught);
                }
            }
        }
    }
    if let Some(how) = resolution {
        resolve_bonus(state, config, how);
    }

    // --- TIMERS ---
    accrue_score(state, config);
    ramp_speed(state, config);
    maybe_spawn_bonus(state, config, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arena;
    use crate::sim::collision::tests::FixedRng;
    use crate::sim::spawner::{BonusPhase, bonus_phase};
    use crate::sim::state::Bonus;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (GameState, SimConfig) {
        let config = SimConfig::default();
        let state = GameState::new(&config, Arena::new(1280.0, 720.0), 0.0);
        (state, config)
    }

    /// Advance the clock and tick, the way the loop driver does
    fn step(state: &mut GameState, config: &SimConfig, pointer: &Pointer, rng: &mut FixedRng) {
        state.clock.advance();
        tick(state, config, pointer, rng);
    }

    #[test]
    fn test_paddle_eases_toward_pointer() {
        let (mut state, config) = setup();
        let pointer = Pointer::new(600.0, 0.0);
        step(&mut state, &config, &pointer, &mut FixedRng(0));
        assert!((state.paddle.pos.x - 150.0).abs() < 1e-4);
        // Paddle never moves vertically
        assert_eq!(state.paddle.pos.y, 695.0);
    }

    #[test]
    fn test_ball_integrates_velocity() {
        let (mut state, config) = setup();
        state.ball.vel = Vec2::new(2.0, 5.0);
        step(&mut state, &config, &Pointer::default(), &mut FixedRng(0));
        assert_eq!(state.ball.pos, Vec2::new(642.0, 35.0));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_side_bounce_happens_once() {
        let (mut state, config) = setup();
        state.ball.pos = Vec2::new(30.0, 300.0);
        state.ball.vel = Vec2::new(-5.0, 5.0);

        let mut flips = 0;
        let mut last_vx = state.ball.vel.x;
        for _ in 0..6 {
            step(&mut state, &config, &Pointer::default(), &mut FixedRng(0));
            if state.ball.vel.x != last_vx {
                flips += 1;
                last_vx = state.ball.vel.x;
            }
        }
        assert_eq!(flips, 1);
        assert_eq!(state.ball.vel.x, 5.0);
    }

    #[test]
    fn test_ceiling_bounce_only_when_climbing() {
        let (mut state, config) = setup();
        state.ball.pos = Vec2::new(640.0, 26.0);
        state.ball.vel = Vec2::new(0.0, -5.0);
        step(&mut state, &config, &Pointer::default(), &mut FixedRng(0));
        assert_eq!(state.ball.vel.y, 5.0);

        // Already inside the ceiling band but heading down: no re-bounce
        state.ball.pos = Vec2::new(640.0, 10.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
        step(&mut state, &config, &Pointer::default(), &mut FixedRng(0));
        assert_eq!(state.ball.vel.y, 5.0);
    }

    #[test]
    fn test_first_paddle_bounce_picks_either_side() {
        for (word, expected_vx) in [(0, 5.0), (u64::MAX, -5.0)] {
            let (mut state, config) = setup();
            state.paddle.pos.x = 640.0;
            state.ball.pos = Vec2::new(640.0, 645.5);
            let pointer = Pointer::new(640.0, 0.0);

            step(&mut state, &config, &pointer, &mut FixedRng(word));
            assert_eq!(state.ball.vel, Vec2::new(expected_vx, -5.0));
            assert!(matches!(state.events.last(), Some(GameEvent::PaddleBounce { .. })));
        }
    }

    #[test]
    fn test_paddle_sliding_under_low_ball_bounces_once() {
        let (mut state, config) = setup();
        // Ball already below the paddle top, paddle approaching from the right
        state.paddle.pos.x = 640.0;
        state.ball.pos = Vec2::new(412.0, 690.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
        let pointer = Pointer::new(0.0, 0.0);

        let mut bounces = 0;
        for _ in 0..40 {
            step(&mut state, &config, &pointer, &mut FixedRng(0));
            bounces += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::PaddleBounce { .. }))
                .count();
        }
        assert_eq!(bounces, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ball.vel, Vec2::new(5.0, -5.0));
        assert!(state.ball.pos.y < 690.0);
    }

    #[test]
    fn test_bottom_out_ends_session() {
        let (mut state, config) = setup();
        // Nowhere near the paddle
        state.paddle.pos.x = 1100.0;
        state.ball.pos = Vec2::new(300.0, 700.0);
        let pointer = Pointer::new(1100.0, 0.0);

        step(&mut state, &config, &pointer, &mut FixedRng(0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(matches!(state.events.last(), Some(GameEvent::BallLost { at }) if *at == 15.0));

        // Further ticks are no-ops
        let ticks = state.time_ticks;
        let pos = state.ball.pos;
        step(&mut state, &config, &pointer, &mut FixedRng(0));
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.ball.pos, pos);
    }

    #[test]
    fn test_bonus_catch_scores_and_despawns() {
        let (mut state, config) = setup();
        state.paddle.pos.x = 640.0;
        state.clock.last_tick = 100.0;
        state.bonus = Some(Bonus {
            pos: Vec2::new(640.0, 645.0),
            vel: Vec2::new(0.0, 3.0),
            radius: 25.0,
        });

        step(&mut state, &config, &Pointer::new(640.0, 0.0), &mut FixedRng(0));
        assert_eq!(state.score.value, 15);
        assert_eq!(bonus_phase(&state), BonusPhase::Inactive);
        assert_eq!(state.timers.bonus_resolved_at, 115.0);
        assert!(state.events.contains(&GameEvent::BonusCaught { score: 15 }));
    }

    #[test]
    fn test_bonus_miss_restarts_cooldown() {
        let (mut state, config) = setup();
        state.paddle.pos.x = 640.0;
        state.bonus = Some(Bonus {
            pos: Vec2::new(1200.0, 700.0),
            vel: Vec2::new(0.0, 3.0),
            radius: 25.0,
        });

        step(&mut state, &config, &Pointer::new(640.0, 0.0), &mut FixedRng(0));
        assert_eq!(state.score.value, 0);
        assert!(state.bonus.is_none());
        assert_eq!(state.timers.bonus_resolved_at, 15.0);
        assert!(state.events.contains(&GameEvent::BonusMissed));
    }

    #[test]
    fn test_bonus_bounces_off_walls() {
        let (mut state, config) = setup();
        state.bonus = Some(Bonus {
            pos: Vec2::new(1255.0, 200.0),
            vel: Vec2::new(4.0, 2.0),
            radius: 25.0,
        });
        step(&mut state, &config, &Pointer::default(), &mut FixedRng(0));
        let bonus = state.bonus.as_ref().unwrap();
        assert_eq!(bonus.vel, Vec2::new(-4.0, 2.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and pointer trace stay identical
        let config = SimConfig::default();
        let arena = Arena::new(1280.0, 720.0);
        let mut state1 = GameState::new(&config, arena, 0.0);
        let mut state2 = GameState::new(&config, arena, 0.0);
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);

        for i in 0..2000 {
            let pointer = Pointer::new(640.0 + (i % 300) as f32, 0.0);
            state1.clock.advance();
            tick(&mut state1, &config, &pointer, &mut rng1);
            state2.clock.advance();
            tick(&mut state2, &config, &pointer, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.bonus, state2.bonus);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.events, state2.events);
    }
}
