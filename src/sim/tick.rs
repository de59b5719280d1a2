//! Fixed timestep simulation tick
//!
//! Advances the snake by exactly one cell.

use rand::Rng;

use super::grid::in_bounds;
use super::lifecycle::{Transition, Trigger, next_phase};
use super::state::{EndReason, GameEvent, GamePhase, GameState};
use crate::config::SimConfig;

/// Advance the game state by one step
///
/// Processing order:
///   1. Commit the pending heading
///   2. Wall check, then self check (body untouched on either)
///   3. Push the new head
///   4. Eat (score, speed, respawn) or drop the tail
///
/// No-op outside `Running`.
pub fn tick<R: Rng>(
    state: &mut GameState,
    config: &SimConfig,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.direction = state.pending_direction;
    let new_head = state.head() + state.direction.delta();

    // The tail still counts: it only moves after the head is placed
    let collision = if !in_bounds(new_head, state.grid_size) {
        Some(EndReason::Wall)
    } else if state.occupies(new_head) {
        Some(EndReason::SelfCollision)
    } else {
        None
    };
    if let Some(reason) = collision {
        end_run(state, reason, &mut events);
        return events;
    }

    state.ticks += 1;
    state.snake.push_front(new_head);

    if new_head == state.food {
        state.score = state.score.saturating_add(config.food_score);
        state.speed = (state.speed + config.speed_step).min(config.max_speed);
        events.push(GameEvent::Ate {
            at: new_head,
            score: state.score,
        });
        events.push(GameEvent::ScoreChanged(state.score));

        if !state.respawn_food(rng) {
            end_run(state, EndReason::BoardFilled, &mut events);
        }
    } else {
        state.snake.pop_back();
    }

    events
}

fn end_run(state: &mut GameState, reason: EndReason, events: &mut Vec<GameEvent>) {
    if let Transition::Enter(to) = next_phase(state.phase, Trigger::Collision) {
        let from = state.phase;
        state.phase = to;
        state.end_reason = Some(reason);
        log::info!(
            "Game over ({:?}) - score {}, length {}",
            reason,
            state.score,
            state.snake.len()
        );
        events.push(GameEvent::PhaseChanged { from, to });
        events.push(GameEvent::GameOver {
            reason,
            score: state.score,
        });
    }
}
