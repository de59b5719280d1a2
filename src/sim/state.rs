//! Game state and core simulation types
//!
//! `GameState` is the authoritative model for one session. It is replaced
//! wholesale on reset, never torn down piecemeal.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, center};
use crate::config::SimConfig;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh session, waiting for the first input
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended, waiting for reset
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// No free cell left for food
    BoardFilled,
}

/// Events emitted for collaborators (audio, persistence, HUD)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Head landed on food
    Ate { at: Cell, score: u64 },
    /// Score changed (eating or reset)
    ScoreChanged(u64),
    /// Score went above the best known score
    HighScoreCandidate(u64),
    PhaseChanged { from: GamePhase, to: GamePhase },
    GameOver { reason: EndReason, score: u64 },
}

/// Complete game state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Board side length
    pub grid_size: i32,
    /// Body cells, head first
    pub snake: VecDeque<Cell>,
    /// Committed heading
    pub direction: Direction,
    /// Heading applied at the next step
    pub pending_direction: Direction,
    pub food: Cell,
    /// Steps per second
    pub speed: f64,
    pub score: u64,
    pub phase: GamePhase,
    /// Steps executed this session
    pub ticks: u64,
    /// Set when the phase becomes `GameOver`
    pub end_reason: Option<EndReason>,
}

impl GameState {
    /// Canonical initial state: centered snake heading right, fresh food
    pub fn new<R: Rng>(config: &SimConfig, rng: &mut R) -> Self {
        let head = center(config.grid_size);
        let snake = (0..config.start_length as i32)
            .map(|i| Cell::new(head.x - i, head.y))
            .collect();

        let mut state = Self {
            grid_size: config.grid_size,
            snake,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food: head,
            speed: config.base_speed,
            score: 0,
            phase: GamePhase::NotStarted,
            ticks: 0,
            end_reason: None,
        };
        // A validated config always leaves room for the first food
        state.respawn_food(rng);
        state
    }

    #[inline]
    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    /// True if any body cell occupies `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.iter().any(|&segment| segment == cell)
    }

    /// Place food uniformly on a cell not covered by the snake
    ///
    /// Rejection sampling while the board is mostly empty; once the snake
    /// covers half the board, samples from the list of free cells instead.
    /// Returns false (food untouched) when no free cell exists.
    pub fn respawn_food<R: Rng>(&mut self, rng: &mut R) -> bool {
        let side = self.grid_size.max(0) as usize;
        let total = side * side;
        if self.snake.len() >= total {
            return false;
        }

        if self.snake.len() * 2 < total {
            loop {
                let cell = Cell::new(
                    rng.random_range(0..self.grid_size),
                    rng.random_range(0..self.grid_size),
                );
                if !self.occupies(cell) {
                    self.food = cell;
                    return true;
                }
            }
        }

        let free: Vec<Cell> = (0..self.grid_size)
            .flat_map(|y| (0..self.grid_size).map(move |x| Cell::new(x, y)))
            .filter(|&cell| !self.occupies(cell))
            .collect();
        if free.is_empty() {
            return false;
        }
        self.food = free[rng.random_range(0..free.len())];
        true
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self, high_score: u64) -> Snapshot<'_> {
        Snapshot {
            grid_size: self.grid_size,
            snake: &self.snake,
            food: self.food,
            score: self.score,
            high_score,
            speed: self.speed,
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }
}

/// Read-only view of a session, handed to the renderer every frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid_size: i32,
    pub snake: &'a VecDeque<Cell>,
    pub food: Cell,
    pub score: u64,
    pub high_score: u64,
    pub speed: f64,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
}

/// Overlay dialog contents for the current phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayPrompt {
    pub title: &'static str,
    pub message: String,
    /// Label of the start/resume/restart button
    pub action: &'static str,
}

impl Snapshot<'_> {
    /// Dialog to show over the board, if any
    pub fn overlay(&self) -> Option<OverlayPrompt> {
        match self.phase {
            GamePhase::NotStarted => Some(OverlayPrompt {
                title: "Neon Snake",
                message: "Press an arrow key to start.".to_string(),
                action: "Start",
            }),
            GamePhase::Paused => Some(OverlayPrompt {
                title: "Pause",
                message: "Press SPACE to resume.".to_string(),
                action: "Resume",
            }),
            GamePhase::GameOver => Some(OverlayPrompt {
                title: "Game Over",
                message: format!("Score: {}", self.score),
                action: "Restart",
            }),
            GamePhase::Running => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_state() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = GameState::new(&SimConfig::default(), &mut rng);

        let body: Vec<Cell> = state.snake.iter().copied().collect();
        assert_eq!(
            body,
            vec![Cell::new(12, 12), Cell::new(11, 12), Cell::new(10, 12)]
        );
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.pending_direction, Direction::Right);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.score, 0);
        assert!(!state.occupies(state.food));
    }

    #[test]
    fn test_respawn_uses_free_cells_when_crowded() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = SimConfig {
            grid_size: 3,
            start_length: 1,
            ..Default::default()
        };
        let mut state = GameState::new(&config, &mut rng);

        // Fill all but (2, 2)
        state.snake = (0..3)
            .flat_map(|y| (0..3).map(move |x| Cell::new(x, y)))
            .filter(|&c| c != Cell::new(2, 2))
            .collect();
        assert!(state.respawn_food(&mut rng));
        assert_eq!(state.food, Cell::new(2, 2));

        state.snake.push_back(Cell::new(2, 2));
        let before = state.food;
        assert!(!state.respawn_food(&mut rng));
        assert_eq!(state.food, before);
    }

    #[test]
    fn test_overlay_per_phase() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::new(&SimConfig::default(), &mut rng);
        assert_eq!(state.snapshot(0).overlay().unwrap().action, "Start");

        state.phase = GamePhase::Running;
        assert!(state.snapshot(0).overlay().is_none());

        state.phase = GamePhase::GameOver;
        state.score = 40;
        let prompt = state.snapshot(0).overlay().unwrap();
        assert_eq!(prompt.title, "Game Over");
        assert_eq!(prompt.message, "Score: 40");
    }
}
