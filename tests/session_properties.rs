//! Invariants that must hold for every reachable session state

use std::collections::HashSet;

use neon_snake::SimConfig;
use neon_snake::sim::{Direction, GameEvent, GamePhase, Session, in_bounds};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Steer(Direction),
    TogglePause,
    Pause,
    StartOrRestart,
    /// Frame after this many seconds
    Frame(f64),
    Step,
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => direction().prop_map(Action::Steer),
        1 => Just(Action::TogglePause),
        1 => Just(Action::Pause),
        1 => Just(Action::StartOrRestart),
        4 => (0.0..0.4f64).prop_map(Action::Frame),
        2 => Just(Action::Step),
    ]
}

fn small_config() -> SimConfig {
    SimConfig {
        grid_size: 8,
        ..Default::default()
    }
}

fn apply(session: &mut Session, action: &Action, now: &mut f64) {
    match *action {
        Action::Steer(dir) => session.request_direction(dir),
        Action::TogglePause => session.toggle_pause(),
        Action::Pause => session.pause(),
        Action::StartOrRestart => session.start_or_restart(),
        Action::Frame(delta) => {
            *now += delta;
            session.advance(*now);
        }
        Action::Step => session.step(),
    }
}

proptest! {
    #[test]
    fn prop_session_invariants(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..300)) {
        let config = small_config();
        let mut session = Session::with_seed(config.clone(), 0, seed);
        let mut now = 0.0;

        let mut prev_score = 0;
        let mut prev_speed = config.base_speed;
        let mut prev_len = config.start_length;

        for action in &actions {
            apply(&mut session, action, &mut now);
            let events = session.take_events();
            let reset = events
                .iter()
                .any(|e| matches!(e, GameEvent::PhaseChanged { to: GamePhase::NotStarted, .. }));

            let state = session.state();

            for cell in &state.snake {
                prop_assert!(in_bounds(*cell, state.grid_size), "{:?} out of bounds", cell);
            }
            let distinct: HashSet<_> = state.snake.iter().map(|c| (c.x, c.y)).collect();
            prop_assert_eq!(distinct.len(), state.snake.len());
            prop_assert!(!state.snake.contains(&state.food) || state.phase == GamePhase::GameOver);

            prop_assert!(state.speed <= config.max_speed);
            prop_assert!(state.speed >= config.base_speed);
            prop_assert_eq!(
                state.score,
                config.food_score * (state.snake.len() - config.start_length) as u64
            );

            if !reset {
                prop_assert!(state.score >= prev_score);
                prop_assert!(state.speed >= prev_speed);
                prop_assert!(state.snake.len() >= prev_len);
            }

            if state.phase != GamePhase::Running {
                prop_assert_eq!(session.accumulator(), 0.0);
            }

            prev_score = state.score;
            prev_speed = state.speed;
            prev_len = state.snake.len();
        }
    }

    #[test]
    fn prop_reversal_leaves_pending(seed in any::<u64>(), steer in direction()) {
        let mut session = Session::with_seed(SimConfig::default(), 0, seed);
        session.start_or_restart();
        session.request_direction(steer);
        let committed = session.state().direction;
        let pending = session.state().pending_direction;

        session.request_direction(committed.opposite());
        prop_assert_eq!(session.state().pending_direction, pending);
    }

    #[test]
    fn prop_toggle_pause_twice_is_identity(seed in any::<u64>(), frames in 0usize..20) {
        let mut session = Session::with_seed(SimConfig::default(), 0, seed);
        session.start_or_restart();
        let mut now = 0.0;
        for _ in 0..frames {
            now += 1.0 / 60.0;
            session.advance(now);
        }
        if session.phase() != GamePhase::Running {
            return Ok(());
        }

        let ticks = session.state().ticks;
        let snake = session.state().snake.clone();
        session.toggle_pause();
        session.toggle_pause();
        prop_assert_eq!(session.phase(), GamePhase::Running);
        prop_assert_eq!(session.state().ticks, ticks);
        prop_assert_eq!(&session.state().snake, &snake);
    }
}
