//! Neon Snake - A grid snake game with a fixed-timestep core
//!
//! Core modules:
//! - `sim`: Simulation (grid, state machine, input queue, tick, scheduler)
//! - `config`: Construction-time simulation constants
//! - `highscores`: High score persistence collaborator
//! - `settings`: Player preferences
//! - `audio`: Web Audio cue for eating (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration defaults
pub mod consts {
    /// Cells per side of the square board
    pub const GRID_SIZE: i32 = 24;
    /// Largest accepted board side
    pub const MAX_GRID_SIZE: i32 = 1024;
    /// Snake length at the start of a session
    pub const START_LENGTH: usize = 3;
    /// Steps per second at session start
    pub const BASE_SPEED: f64 = 6.0;
    /// Speed gained per food eaten (steps per second)
    pub const SPEED_STEP: f64 = 0.45;
    /// Speed cap (steps per second)
    pub const MAX_SPEED: f64 = 16.0;
    /// Points per food eaten
    pub const FOOD_SCORE: u64 = 10;

    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f64 = 1.0;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Commands buffered between frames
    pub const INPUT_CAPACITY: usize = 16;
    /// Largest accepted input queue
    pub const MAX_INPUT_CAPACITY: usize = 4096;

    /// Slack when comparing the accumulator against a step (float drift)
    pub const STEP_EPSILON: f64 = 1e-9;
}
