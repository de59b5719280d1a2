//! Session lifecycle transitions
//!
//! ```text
//! NotStarted --direction/start--> Running <--toggle/direction/start--> Paused
//!                                    |  (pause: Running -> Paused only)
//!                                    |
//!                                collision
//!                                    v
//! NotStarted <-------reset------- GameOver
//! ```
//!
//! Triggers with no edge from the current phase are defined no-ops.

use super::state::GamePhase;

/// Something that may move a session between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any directional input
    DirectionInput,
    /// Overlay start/resume/restart button
    StartAction,
    /// Pause key
    PauseToggle,
    /// Pause that never resumes (focus loss, tab hidden)
    Pause,
    /// Wall, self or board-filled end from a tick
    Collision,
}

/// What the session should do in response to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move to a new phase
    Enter(GamePhase),
    /// Replace the session with a fresh one in `NotStarted`
    Reset,
    /// Ignore the trigger
    Stay,
}

/// Transition table
pub fn next_phase(phase: GamePhase, trigger: Trigger) -> Transition {
    use GamePhase::*;
    use Trigger::*;

    match (phase, trigger) {
        (NotStarted, DirectionInput | StartAction) => Transition::Enter(Running),
        (NotStarted, PauseToggle | Pause | Collision) => Transition::Stay,

        (Running, PauseToggle | Pause) => Transition::Enter(Paused),
        (Running, Collision) => Transition::Enter(GameOver),
        (Running, DirectionInput) => Transition::Stay,
        // Overlay button is hidden while running; a stray press restarts
        (Running, StartAction) => Transition::Reset,

        (Paused, PauseToggle | DirectionInput | StartAction) => Transition::Enter(Running),
        (Paused, Pause | Collision) => Transition::Stay,

        (GameOver, StartAction) => Transition::Reset,
        (GameOver, DirectionInput | PauseToggle | Pause | Collision) => Transition::Stay,
    }
}

/// True for phases in which the scheduler may run steps
#[inline]
pub fn is_ticking(phase: GamePhase) -> bool {
    phase == GamePhase::Running
}
