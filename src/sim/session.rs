//! Simulation context for one player
//!
//! A `Session` owns the game state, the RNG, the step accumulator and the
//! consumer end of the input channel. Everything that mutates the game goes
//! through it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::grid::Direction;
use super::input::{Command, InputHandle, InputQueue};
use super::lifecycle::{Transition, Trigger, is_ticking, next_phase};
use super::scheduler::FixedTimestep;
use super::state::{GameEvent, GamePhase, GameState, Snapshot};
use super::tick::tick;
use crate::config::SimConfig;

pub struct Session {
    config: SimConfig,
    state: GameState,
    rng: Pcg32,
    clock: FixedTimestep,
    input: InputQueue,
    /// Best score known so far (persisted value at start, then raised in play)
    high_score: u64,
    events: Vec<GameEvent>,
}

impl Session {
    /// New session seeded from the config, or the wall clock if unset
    pub fn new(config: SimConfig, high_score: u64) -> Self {
        let seed = config.seed.unwrap_or_else(clock_seed);
        Self::with_seed(config, high_score, seed)
    }

    pub fn with_seed(config: SimConfig, high_score: u64, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(&config, &mut rng);
        let input = InputQueue::new(config.input_capacity);
        log::info!(
            "Session created: {}x{} grid, seed {}, high score {}",
            config.grid_size,
            config.grid_size,
            seed,
            high_score
        );
        Self {
            config,
            state,
            rng,
            clock: FixedTimestep::new(),
            input,
            high_score,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Residual time not yet converted into a step
    pub fn accumulator(&self) -> f64 {
        self.clock.accumulator()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot(self.high_score)
    }

    /// Producer handle for an input adapter
    pub fn input_handle(&self) -> InputHandle {
        self.input.handle()
    }

    /// Events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input surface ===

    /// Queue a heading for the next step
    ///
    /// Starts a fresh session and resumes a paused one. Reversing into the
    /// neck is ignored, as is anything after game over.
    pub fn request_direction(&mut self, direction: Direction) {
        match self.state.phase {
            GamePhase::GameOver => return,
            GamePhase::NotStarted | GamePhase::Paused => {
                self.trigger(Trigger::DirectionInput);
            }
            GamePhase::Running => {}
        }

        if direction == self.state.direction.opposite() {
            return;
        }
        self.state.pending_direction = direction;
    }

    pub fn toggle_pause(&mut self) {
        self.trigger(Trigger::PauseToggle);
    }

    /// Pause a running game; a no-op in every other phase
    pub fn pause(&mut self) {
        self.trigger(Trigger::Pause);
    }

    /// Overlay button: start, resume, or restart after game over
    pub fn start_or_restart(&mut self) {
        self.trigger(Trigger::StartAction);
    }

    /// Apply one command from an adapter
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Direction(dir) => self.request_direction(dir),
            Command::TogglePause => self.toggle_pause(),
            Command::Pause => self.pause(),
            Command::StartOrRestart => self.start_or_restart(),
        }
    }

    /// Apply every queued command in arrival order
    pub fn drain_input(&mut self) -> usize {
        let mut applied = 0;
        while let Some(command) = self.input.poll() {
            self.apply(command);
            applied += 1;
        }
        applied
    }

    /// Stop accepting input (session is being discarded)
    pub fn close_input(&mut self) {
        self.input.close();
    }

    // === Lifecycle ===

    fn trigger(&mut self, trigger: Trigger) {
        match next_phase(self.state.phase, trigger) {
            Transition::Enter(to) => self.enter(to),
            Transition::Reset => self.reset(),
            Transition::Stay => {
                log::debug!("{:?} ignored in {:?}", trigger, self.state.phase);
            }
        }
    }

    fn enter(&mut self, to: GamePhase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        self.clock.reset_accumulator();
        log::debug!("Phase {:?} -> {:?}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Replace the game state with a fresh one in `NotStarted`
    pub fn reset(&mut self) {
        let from = self.state.phase;
        self.state = GameState::new(&self.config, &mut self.rng);
        self.clock.reset_accumulator();
        log::info!("Session reset (high score {})", self.high_score);

        if from != GamePhase::NotStarted {
            self.events.push(GameEvent::PhaseChanged {
                from,
                to: GamePhase::NotStarted,
            });
        }
        self.events.push(GameEvent::ScoreChanged(0));
    }

    // === Simulation ===

    /// Run exactly one step, ignoring the clock
    pub fn step(&mut self) {
        let before = self.state.phase;
        for event in tick(&mut self.state, &self.config, &mut self.rng) {
            let candidate = match &event {
                GameEvent::ScoreChanged(score) if *score > self.high_score => Some(*score),
                _ => None,
            };
            self.events.push(event);
            if let Some(score) = candidate {
                self.high_score = score;
                self.events.push(GameEvent::HighScoreCandidate(score));
            }
        }
        if self.state.phase != before {
            self.clock.reset_accumulator();
        }
    }

    /// Frame callback: feed the clock and run as many whole steps as fit
    ///
    /// `now` is a monotonic timestamp in seconds. Returns the steps run.
    pub fn advance(&mut self, now: f64) -> u32 {
        let delta = self.clock.frame_delta(now, self.config.max_frame_delta);
        self.drain_input();

        if !is_ticking(self.state.phase) {
            return 0;
        }

        self.clock.accumulate(delta);
        let step = 1.0 / self.state.speed;
        let mut steps = 0;

        while steps < self.config.max_substeps
            && is_ticking(self.state.phase)
            && self.clock.consume(step)
        {
            self.drain_input();
            if !is_ticking(self.state.phase) {
                break;
            }
            self.step();
            steps += 1;
            if self.state.phase == GamePhase::GameOver {
                break;
            }
        }

        if steps == self.config.max_substeps && self.clock.accumulator() >= step {
            log::debug!(
                "Dropping {:.3}s of backlog after {} steps",
                self.clock.accumulator(),
                steps
            );
            self.clock.reset_accumulator();
        }

        steps
    }

    /// Next frame reports a zero delta (after the loop was idle)
    pub fn restart_clock(&mut self) {
        self.clock.restart_clock();
    }
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
