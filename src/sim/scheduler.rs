//! Fixed-timestep scheduling
//!
//! The rendering clock fires at whatever rate the display runs. Each frame,
//! elapsed time is fed into an accumulator which is drained in quanta of
//! `1 / speed` seconds, one tick per quantum, so the snake covers the same
//! number of cells per second on a 30 Hz panel as on a 144 Hz one.
//!
//! The accumulator is zeroed on every phase change. Without that, time
//! banked before a pause would replay as a burst of catch-up ticks on
//! resume.

use super::session::Session;
use super::state::{GameEvent, Snapshot};
use crate::consts::STEP_EPSILON;

/// Capability to schedule the next clock callback (e.g. `requestAnimationFrame`)
pub trait FrameRequester {
    fn request_frame(&mut self);
    /// Drop any pending callback
    fn cancel_frame(&mut self);
}

/// Draws the current state; called every frame whether or not a step ran
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

/// Fire-and-forget consumer of simulation events (audio, persistence)
pub trait EventSink {
    fn handle(&mut self, event: &GameEvent);
}

/// Time accumulator that converts frame deltas into whole steps
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f64,
    last_time: Option<f64>,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `[0, max_delta]`
    ///
    /// The first frame after construction or [`Self::restart_clock`]
    /// reports zero.
    pub fn frame_delta(&mut self, now: f64, max_delta: f64) -> f64 {
        let delta = match self.last_time {
            Some(last) if (now - last).is_finite() => (now - last).clamp(0.0, max_delta),
            _ => 0.0,
        };
        self.last_time = Some(now);
        delta
    }

    pub fn accumulate(&mut self, delta: f64) {
        self.accumulator += delta;
    }

    /// Take one step's worth of time if available
    pub fn consume(&mut self, step: f64) -> bool {
        if self.accumulator + STEP_EPSILON >= step {
            self.accumulator = (self.accumulator - step).max(0.0);
            true
        } else {
            false
        }
    }

    pub fn reset_accumulator(&mut self) {
        self.accumulator = 0.0;
    }

    /// Forget the last frame time (next delta is zero)
    pub fn restart_clock(&mut self) {
        self.last_time = None;
    }

    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

/// Drives a session from a frame clock
///
/// Owns the session exclusively; input reaches it only through the
/// session's command channel.
pub struct GameLoop<F: FrameRequester, R: Renderer> {
    session: Session,
    frames: F,
    renderer: R,
    sinks: Vec<Box<dyn EventSink>>,
    running: bool,
}

impl<F: FrameRequester, R: Renderer> GameLoop<F, R> {
    pub fn new(session: Session, frames: F, renderer: R) -> Self {
        Self {
            session,
            frames,
            renderer,
            sinks: Vec::new(),
            running: false,
        }
    }

    /// Register a collaborator for simulation events
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Request the first frame
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.session.restart_clock();
        self.frames.request_frame();
    }

    /// Clock callback: advance, publish, render, then ask for the next frame
    ///
    /// Returns the number of steps that ran.
    pub fn on_frame(&mut self, now: f64) -> u32 {
        if !self.running {
            return 0;
        }

        let steps = self.session.advance(now);

        for event in self.session.take_events() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }

        self.renderer.render(&self.session.snapshot());
        self.frames.request_frame();
        steps
    }

    /// Cancel the pending frame and close the input channel
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.frames.cancel_frame();
        self.session.close_input();
        log::info!("Game loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
