//! Input queue
//!
//! Keyboard, pointer and overlay adapters hold an [`InputHandle`] and push
//! [`Command`]s into a bounded channel. The session owns the single
//! [`InputQueue`] consumer and drains it between steps, so input never
//! interleaves with a tick in progress.

use tokio::sync::mpsc::{self, Receiver, Sender, error::TryRecvError, error::TrySendError};

use super::grid::Direction;

/// The whole external input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Direction(Direction),
    TogglePause,
    /// Pause if running, otherwise nothing; safe to send repeatedly
    Pause,
    StartOrRestart,
}

impl Command {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Command::Direction(Direction::Up)),
            "ArrowDown" => Some(Command::Direction(Direction::Down)),
            "ArrowLeft" => Some(Command::Direction(Direction::Left)),
            "ArrowRight" => Some(Command::Direction(Direction::Right)),
            " " | "Space" | "Spacebar" => Some(Command::TogglePause),
            _ => None,
        }
    }
}

/// Producer side, cloned into each input adapter
#[derive(Debug, Clone)]
pub struct InputHandle {
    tx: Sender<Command>,
}

impl InputHandle {
    /// Queue a command; returns false if it was dropped
    ///
    /// A full queue means the loop is stalled, and a closed one means the
    /// session is gone. Either way the command is discarded.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(cmd)) => {
                log::debug!("Input queue full, dropping {:?}", cmd);
                false
            }
            Err(TrySendError::Closed(cmd)) => {
                log::debug!("Input queue closed, dropping {:?}", cmd);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the session
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self { tx, rx }
    }

    /// New producer handle for an adapter
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            tx: self.tx.clone(),
        }
    }

    /// Next queued command, if any
    pub fn poll(&mut self) -> Option<Command> {
        match self.rx.try_recv() {
            Ok(cmd) => Some(cmd),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Stop accepting commands; anything already queued is discarded
    pub fn close(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}
