//! Pong Marathon - a single-paddle survival Pong
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball/paddle physics, scoring, phases)
//! - `render`: Canvas 2D drawing (wasm only)
//! - `audio`: Web Audio sound cues (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (matches the 1280x720 canvas)
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 720.0;

    /// Ball defaults
    pub const BALL_WIDTH: f32 = 30.0;
    pub const BALL_HEIGHT: f32 = 30.0;
    /// Launch velocity components (pixels per frame)
    pub const BALL_SPEED_X: f32 = 10.0;
    pub const BALL_SPEED_Y: f32 = 8.0;
    /// Spawn row and the horizontal inset kept clear of both walls
    pub const SPAWN_Y: f32 = 10.0;
    pub const SPAWN_MARGIN: f32 = 10.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 160.0;
    pub const PADDLE_HEIGHT: f32 = 30.0;
    pub const PADDLE_MAX_SPEED: f32 = 15.0;
    /// Gap between the paddle's bottom edge and the field floor
    pub const PADDLE_FLOOR_GAP: f32 = 30.0;
    /// A paddle bounce only registers while the ball's top edge is above
    /// `FIELD_HEIGHT - PADDLE_HEIGHT - PADDLE_ZONE_GUARD`
    pub const PADDLE_ZONE_GUARD: f32 = 30.0;

    pub const START_LIVES: u8 = 3;

    /// Delayed-effect offsets (milliseconds)
    pub const RESPAWN_CUE_DELAY_MS: f64 = 1000.0;
    pub const RESPAWN_DELAY_MS: f64 = 2000.0;
    pub const RELAUNCH_DELAY_MS: f64 = 1000.0;
    pub const GAME_OVER_CUE_DELAY_MS: f64 = 800.0;
    /// Pre-roll after New Game before the first simulated frame
    pub const PRE_ROLL_DELAY_MS: f64 = 2000.0;
}
