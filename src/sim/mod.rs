//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Fixed-size steps only, driven by an injected frame clock
//! - Seeded RNG only
//! - Input arrives through one bounded channel

pub mod grid;
pub mod input;
pub mod lifecycle;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tick;

pub use grid::{Cell, Direction, cells_equal, center, in_bounds};
pub use input::{Command, InputHandle, InputQueue};
pub use lifecycle::{Transition, Trigger, next_phase};
pub use scheduler::{EventSink, FixedTimestep, FrameRequester, GameLoop, Renderer};
pub use session::Session;
pub use state::{EndReason, GameEvent, GamePhase, GameState, OverlayPrompt, Snapshot};
pub use tick::tick;
