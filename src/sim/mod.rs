//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per animation frame, constant per-tick velocities
//! - Seeded RNG only
//! - Delayed effects go through the generation-tagged [`Scheduler`]
//! - No rendering or platform dependencies

pub mod collision;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{GRAZE_TOLERANCE, paddle_top_graze};
pub use schedule::{Scheduler, Task};
pub use state::{Ball, GamePhase, GameState, InputState, Paddle};
pub use tick::{BallEvents, Cue, run_task, tick};
