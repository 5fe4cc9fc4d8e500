//! Per-frame simulation advance
//!
//! One tick per animation frame. The ball and paddle never reach into shared
//! game state: the ball reports what happened as [`BallEvents`] and the tick
//! applies the consequences (score, lives, phase change, scheduled effects).
//! Ball updates before paddle, so paddle collisions always see the previous
//! tick's paddle position.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::paddle_top_graze;
use super::schedule::{Scheduler, Task};
use super::state::{Ball, GamePhase, GameState, InputState, Paddle};
use crate::consts::*;

/// Fire-and-forget audio trigger, consumed by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    GameStart,
    WallHit,
    /// Three timbre variants, picked per hit
    PaddleHit(u8),
    PointScored,
    Shatter,
    RespawnCue,
    GameOver,
}

/// What the ball did this tick, applied by [`tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallEvents {
    pub wall_hit: bool,
    pub scored: bool,
    pub paddle_hit: Option<u8>,
    pub missed: bool,
}

impl Ball {
    /// Advance one tick against a snapshot of the paddle and report events.
    /// Bounce order: walls, ceiling, paddle top, then the floor miss.
    pub fn update(&mut self, paddle: &Paddle, field: Vec2, rng: &mut Pcg32) -> BallEvents {
        let mut events = BallEvents::default();
        self.pos += self.vel;

        // Side walls
        if self.pos.x < 0.0 || self.pos.x > field.x - self.size.x {
            self.vel.x = -self.vel.x;
            if self.in_play {
                events.wall_hit = true;
            }
        }

        // Ceiling: bounce and score
        if self.pos.y < 0.0 {
            self.vel.y = -self.vel.y;
            events.scored = true;
        }

        // Paddle top, guarded so a ball already below the paddle zone
        // cannot register a bounce
        if paddle_top_graze(self.pos, self.size, paddle.pos, paddle.size)
            && self.pos.y < field.y - paddle.size.y - PADDLE_ZONE_GUARD
        {
            self.vel.y = -self.vel.y;
            events.paddle_hit = Some(paddle_hit_variant(rng));
        }

        // Past the floor
        if self.pos.y > field.y && self.in_play {
            events.missed = true;
        }

        events
    }
}

/// Uniform pick among the three paddle-hit timbres
fn paddle_hit_variant(rng: &mut Pcg32) -> u8 {
    let roll: f32 = rng.random();
    if roll < 0.33 {
        0
    } else if roll < 0.66 {
        1
    } else {
        2
    }
}

/// Advance the game by one tick. Only the Playing phase simulates; every
/// other phase is frozen. Returns the audio cues to fire this frame.
pub fn tick(state: &mut GameState, input: &InputState, sched: &mut Scheduler, now_ms: f64) -> Vec<Cue> {
    let mut cues = Vec::new();
    if state.phase != GamePhase::Playing {
        return cues;
    }
    state.time_ticks += 1;

    // Previous tick's paddle: the ball moves first by contract
    let paddle_snapshot = state.paddle.clone();
    let field = state.field;
    let events = state.ball.update(&paddle_snapshot, field, &mut state.rng);

    if events.wall_hit {
        cues.push(Cue::WallHit);
    }
    if events.scored {
        state.score += 1;
        cues.push(Cue::PointScored);
    }
    if let Some(variant) = events.paddle_hit {
        cues.push(Cue::PaddleHit(variant));
    }
    if events.missed {
        state.paddle.subtract_life();
        cues.push(Cue::Shatter);
        if state.paddle.lives == 0 {
            // Terminal: no respawn, just the delayed sting
            state.end_game();
            sched.schedule_after(now_ms, GAME_OVER_CUE_DELAY_MS, Task::GameOverCue);
            return cues;
        }
        state.ball.in_play = false;
        sched.schedule_after(now_ms, RESPAWN_CUE_DELAY_MS, Task::RespawnCue);
        sched.schedule_after(now_ms, RESPAWN_DELAY_MS, Task::Respawn);
    }

    state.paddle.update(input, field);
    cues
}

/// Apply one due delayed effect. Returns the cue to fire, if any.
pub fn run_task(
    state: &mut GameState,
    sched: &mut Scheduler,
    now_ms: f64,
    task: Task,
) -> Option<Cue> {
    match task {
        Task::RespawnCue => Some(Cue::RespawnCue),
        Task::Respawn => {
            let field = state.field;
            state.ball.respawn(field, &mut state.rng);
            sched.schedule_after(now_ms, RELAUNCH_DELAY_MS, Task::Relaunch);
            None
        }
        Task::Relaunch => {
            state.ball.relaunch(&mut state.rng);
            None
        }
        Task::GameOverCue => Some(Cue::GameOver),
        Task::BeginPlay => {
            state.begin_play();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A state in the Playing phase with an empty scheduler
    fn playing_state(seed: u64) -> (GameState, Scheduler) {
        let mut state = GameState::new(seed);
        state.begin_round();
        state.begin_play();
        (state, Scheduler::new())
    }

    #[test]
    fn test_non_playing_phases_are_frozen() {
        let mut state = GameState::new(5);
        let mut sched = Scheduler::new();
        let input = InputState::default();

        for _ in 0..3 {
            let before = state.ball.pos;
            let cues = tick(&mut state, &input, &mut sched, 0.0);
            assert!(cues.is_empty());
            assert_eq!(state.ball.pos, before);
            assert_eq!(state.time_ticks, 0);
            state.begin_round();
        }
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let (mut state, mut sched) = playing_state(8);
        let input = InputState {
            right: true,
            ..Default::default()
        };

        // Park the ball mid-air so nothing else interferes
        state.ball.pos = Vec2::new(600.0, 100.0);
        state.ball.vel = Vec2::ZERO;

        let max_x = state.field.x - state.paddle.size.x;
        for _ in 0..200 {
            tick(&mut state, &input, &mut sched, 0.0);
            assert!(state.paddle.pos.x >= 0.0 && state.paddle.pos.x <= max_x);
        }
        assert_eq!(state.paddle.pos.x, max_x);
    }

    #[test]
    fn test_left_wins_when_both_held() {
        let (mut state, mut sched) = playing_state(8);
        state.ball.pos = Vec2::new(600.0, 100.0);
        state.ball.vel = Vec2::ZERO;
        let input = InputState {
            left: true,
            right: true,
        };

        let before = state.paddle.pos.x;
        tick(&mut state, &input, &mut sched, 0.0);
        assert_eq!(state.paddle.pos.x, before - PADDLE_MAX_SPEED);
    }

    #[test]
    fn test_wall_bounce_flips_x_once() {
        let (mut state, mut sched) = playing_state(2);
        let input = InputState::default();
        state.ball.pos = Vec2::new(state.field.x - state.ball.size.x - 4.0, 300.0);
        state.ball.vel = Vec2::new(BALL_SPEED_X, 0.0);

        let cues = tick(&mut state, &input, &mut sched, 0.0);
        assert!(state.ball.vel.x < 0.0);
        assert!(cues.contains(&Cue::WallHit));

        // The next tick moves back inside without flipping again
        let cues = tick(&mut state, &input, &mut sched, 0.0);
        assert!(state.ball.vel.x < 0.0);
        assert!(!cues.contains(&Cue::WallHit));
    }

    #[test]
    fn test_wall_bounce_silent_while_out_of_play() {
        let (mut state, _) = playing_state(2);
        state.ball.in_play = false;
        state.ball.pos = Vec2::new(-3.0, 300.0);
        state.ball.vel = Vec2::new(-BALL_SPEED_X, 0.0);

        let paddle = state.paddle.clone();
        let field = state.field;
        let events = state.ball.update(&paddle, field, &mut state.rng);
        assert!(!events.wall_hit);
        assert!(state.ball.vel.x > 0.0);
    }

    #[test]
    fn test_ceiling_bounce_scores_exactly_one() {
        let (mut state, mut sched) = playing_state(4);
        let input = InputState::default();
        state.ball.pos = Vec2::new(400.0, 5.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED_Y);

        let cues = tick(&mut state, &input, &mut sched, 0.0);
        assert_eq!(state.score, 1);
        assert!(state.ball.vel.y > 0.0);
        assert_eq!(cues.iter().filter(|c| **c == Cue::PointScored).count(), 1);

        // Falling away from the ceiling scores nothing further
        tick(&mut state, &input, &mut sched, 0.0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_paddle_bounce_reflects_ball() {
        // Field 1280, paddle 160 wide at x=560 (its default), ball dropping
        // onto the paddle top with a shallow graze
        let (mut state, mut sched) = playing_state(6);
        let input = InputState::default();
        assert_eq!(state.paddle.pos, Vec2::new(560.0, 660.0));

        state.ball.pos = Vec2::new(600.0, 625.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_Y);

        let cues = tick(&mut state, &input, &mut sched, 0.0);
        assert!(state.ball.vel.y < 0.0, "ball must not pass through the paddle");
        assert!(matches!(cues.as_slice(), [Cue::PaddleHit(v)] if *v <= 2));
    }

    #[test]
    fn test_no_bounce_below_paddle_zone() {
        // Overlapping x but already below the guard line: the ball is lost,
        // it must not bounce off the paddle's side
        let (mut state, mut sched) = playing_state(6);
        let input = InputState::default();

        state.ball.pos = Vec2::new(600.0, 690.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_Y);

        tick(&mut state, &input, &mut sched, 0.0);
        assert!(state.ball.vel.y > 0.0);
    }

    #[test]
    fn test_miss_costs_life_and_schedules_respawn() {
        let (mut state, mut sched) = playing_state(9);
        let input = InputState::default();
        assert_eq!(state.paddle.lives, 3);

        state.ball.pos = Vec2::new(400.0, state.field.y - 2.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_Y);

        let cues = tick(&mut state, &input, &mut sched, 1000.0);
        assert_eq!(state.paddle.lives, 2);
        assert!(!state.ball.in_play);
        assert!(cues.contains(&Cue::Shatter));
        assert_eq!(sched.pending(), 2);

        // Cue at +1000, respawn at +2000, in that order
        assert_eq!(sched.drain_due(2000.0), vec![Task::RespawnCue]);
        assert_eq!(sched.drain_due(3000.0), vec![Task::Respawn]);
    }

    #[test]
    fn test_frozen_ball_stays_put_until_relaunch() {
        let (mut state, mut sched) = playing_state(9);
        let input = InputState::default();
        state.ball.pos = Vec2::new(400.0, state.field.y - 2.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_Y);
        tick(&mut state, &input, &mut sched, 0.0);
        assert!(!state.ball.in_play);

        // Respawn fires: back in play, frozen at the spawn row
        for task in sched.drain_due(2500.0) {
            run_task(&mut state, &mut sched, 2500.0, task);
        }
        assert!(state.ball.in_play);
        let spawn = state.ball.pos;
        for _ in 0..5 {
            tick(&mut state, &input, &mut sched, 2600.0);
        }
        assert_eq!(state.ball.pos, spawn);

        // Relaunch at +1000 restores the original magnitudes
        for task in sched.drain_due(4000.0) {
            run_task(&mut state, &mut sched, 4000.0, task);
        }
        assert_eq!(state.ball.vel.x.abs(), BALL_SPEED_X);
        assert_eq!(state.ball.vel.y, BALL_SPEED_Y);
    }

    #[test]
    fn test_last_life_ends_game_without_respawn() {
        let (mut state, mut sched) = playing_state(10);
        let input = InputState::default();
        state.paddle.lives = 1;
        state.ball.pos = Vec2::new(400.0, state.field.y - 2.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_Y);

        tick(&mut state, &input, &mut sched, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.paddle.lives, 0);

        // Only the delayed game-over sting is pending, no respawn
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.drain_due(GAME_OVER_CUE_DELAY_MS), vec![Task::GameOverCue]);
    }

    #[test]
    fn test_restart_cancels_stale_respawn() {
        let (mut state, mut sched) = playing_state(12);
        let input = InputState::default();
        state.ball.pos = Vec2::new(400.0, state.field.y - 2.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_Y);
        tick(&mut state, &input, &mut sched, 0.0);
        assert_eq!(sched.pending(), 2);

        // Restart before the +2000ms respawn fires
        sched.cancel_all();
        let mut state = GameState::new(99);
        state.begin_round();
        let ball_before = state.ball.clone();

        // Well past the old due times: nothing fires, nothing mutates
        assert!(sched.drain_due(10_000.0).is_empty());
        assert_eq!(state.ball.pos, ball_before.pos);
        assert!(state.ball.in_play);
    }

    #[test]
    fn test_begin_play_task_starts_ticking() {
        let mut state = GameState::new(1);
        state.begin_round();
        let mut sched = Scheduler::new();
        sched.schedule_after(0.0, PRE_ROLL_DELAY_MS, Task::BeginPlay);

        assert!(sched.drain_due(1999.0).is_empty());
        for task in sched.drain_due(2000.0) {
            run_task(&mut state, &mut sched, 2000.0, task);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(424242);
        let mut b = GameState::new(424242);
        for s in [&mut a, &mut b] {
            s.begin_round();
            s.begin_play();
        }
        let mut sched_a = Scheduler::new();
        let mut sched_b = Scheduler::new();

        let inputs = [
            InputState { left: true, right: false },
            InputState::default(),
            InputState { left: false, right: true },
        ];
        for i in 0..300 {
            let input = inputs[i % inputs.len()];
            let ca = tick(&mut a, &input, &mut sched_a, i as f64 * 16.0);
            let cb = tick(&mut b, &input, &mut sched_b, i as f64 * 16.0);
            assert_eq!(ca, cb);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.paddle.pos, b.paddle.pos);
    }

    proptest! {
        #[test]
        fn prop_paddle_never_leaves_field(seed: u64, moves in prop::collection::vec(0u8..3, 1..400)) {
            let (mut state, mut sched) = playing_state(seed);
            let max_x = state.field.x - state.paddle.size.x;
            for (i, m) in moves.iter().enumerate() {
                let input = InputState {
                    left: *m == 1,
                    right: *m == 2,
                };
                tick(&mut state, &input, &mut sched, i as f64 * 16.0);
                prop_assert!(state.paddle.pos.x >= 0.0);
                prop_assert!(state.paddle.pos.x <= max_x);
            }
        }

        #[test]
        fn prop_respawn_stays_inside_margins(seed: u64) {
            let mut state = GameState::new(seed);
            let field = state.field;
            let ball_w = state.ball.size.x;
            for _ in 0..50 {
                state.ball.respawn(field, &mut state.rng);
                prop_assert!(state.ball.pos.x >= SPAWN_MARGIN);
                prop_assert!(state.ball.pos.x <= field.x - ball_w - SPAWN_MARGIN);
                prop_assert_eq!(state.ball.pos.y, SPAWN_Y);
            }
        }

        #[test]
        fn prop_score_is_monotone(seed: u64, ticks in 1usize..600) {
            let (mut state, mut sched) = playing_state(seed);
            let input = InputState::default();
            let mut last = state.score;
            for i in 0..ticks {
                tick(&mut state, &input, &mut sched, i as f64 * 16.0);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
