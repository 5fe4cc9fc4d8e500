//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, before the first New Game
    Splash,
    /// Round reset done, pre-roll delay running; drawn but frozen
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Currently-held movement keys
///
/// Mutated by key-down/key-up handlers, read by the paddle each tick.
/// Repeated key-down for an already-held key is naturally a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn set_left(&mut self, held: bool) {
        self.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.right = held;
    }
}

/// The ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick, signed
    pub vel: Vec2,
    /// Speed magnitudes restored after a respawn relaunch
    pub original_vel: Vec2,
    /// False during the respawn-delay window; velocity is zero and the
    /// position stays frozen at the spawn spot until relaunch
    pub in_play: bool,
}

impl Ball {
    /// Spawn a ball at a randomized column on the spawn row, already moving
    pub fn new(field: Vec2, rng: &mut Pcg32) -> Self {
        let size = Vec2::new(BALL_WIDTH, BALL_HEIGHT);
        let original_vel = Vec2::new(BALL_SPEED_X, BALL_SPEED_Y);
        let mut ball = Self {
            pos: Vec2::new(0.0, SPAWN_Y),
            size,
            vel: original_vel,
            original_vel,
            in_play: true,
        };
        ball.pos.x = ball.spawn_x(field, rng);
        ball.vel.x *= random_direction(rng);
        ball
    }

    /// Randomized spawn column, inset from both walls
    fn spawn_x(&self, field: Vec2, rng: &mut Pcg32) -> f32 {
        rng.random::<f32>() * (field.x - self.size.x - 2.0 * SPAWN_MARGIN) + SPAWN_MARGIN
    }

    /// Reposition at a fresh spawn spot with zero velocity, back in play.
    /// The relaunch that restores velocity is scheduled by the caller.
    pub fn respawn(&mut self, field: Vec2, rng: &mut Pcg32) {
        self.pos = Vec2::new(self.spawn_x(field, rng), SPAWN_Y);
        self.vel = Vec2::ZERO;
        self.in_play = true;
    }

    /// Restore launch velocity with a freshly randomized horizontal sign
    pub fn relaunch(&mut self, rng: &mut Pcg32) {
        self.vel = Vec2::new(
            self.original_vel.x * random_direction(rng),
            self.original_vel.y,
        );
    }
}

/// Equal-probability +1/-1
fn random_direction(rng: &mut Pcg32) -> f32 {
    if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity derived from input this tick (pixels per tick)
    pub vel_x: f32,
    pub lives: u8,
}

impl Paddle {
    /// Centered horizontally, floating just above the field floor
    pub fn new(field: Vec2) -> Self {
        let size = Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT);
        Self {
            pos: Vec2::new(
                field.x / 2.0 - size.x / 2.0,
                field.y - size.y - PADDLE_FLOOR_GAP,
            ),
            size,
            vel_x: 0.0,
            lives: START_LIVES,
        }
    }

    /// Move from held keys and clamp to the field. Left wins when both held.
    pub fn update(&mut self, input: &InputState, field: Vec2) {
        self.vel_x = if input.left {
            -PADDLE_MAX_SPEED
        } else if input.right {
            PADDLE_MAX_SPEED
        } else {
            0.0
        };
        self.pos.x = (self.pos.x + self.vel_x).clamp(0.0, field.x - self.size.x);
    }

    /// No floor here; the tick checks for zero after calling
    pub fn subtract_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub field: Vec2,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub ball: Ball,
    pub paddle: Paddle,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a fresh session showing the splash screen
    pub fn new(seed: u64) -> Self {
        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::new(field, &mut rng);
        Self {
            seed,
            field,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Splash,
            ball,
            paddle: Paddle::new(field),
            rng,
        }
    }

    /// Splash/GameOver -> Ready: the round is set up and drawn, waiting out
    /// the pre-roll delay before the first simulated frame
    pub fn begin_round(&mut self) {
        if matches!(self.phase, GamePhase::Splash | GamePhase::GameOver) {
            self.phase = GamePhase::Ready;
        }
    }

    /// Ready -> Playing: pre-roll elapsed, the loop starts ticking
    pub fn begin_play(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Playing;
        }
    }

    /// Playing -> GameOver: terminal, the loop stops after the final frame
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::GameOver;
            log::info!("game over with score {}", self.score);
        }
    }
}
