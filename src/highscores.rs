//! High score persistence
//!
//! The simulation never touches storage. At startup it is handed the stored
//! best as a plain integer; afterwards this collaborator listens for
//! high-score events and writes through only on improvement. Storage faults
//! are logged and swallowed so they can never stall the game loop.

use thiserror::Error;

use crate::sim::{EventSink, GameEvent};

/// Storage failures (always absorbed by [`HighScore`])
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Rejected(String),
    #[error("stored value is not a score: {0:?}")]
    Corrupt(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Backing storage for a single best score
pub trait ScoreStore {
    fn read(&self) -> Result<Option<u64>, StoreError>;
    fn write(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn write(&mut self, score: u64) -> Result<(), StoreError> {
        self.value = Some(score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ScoreFile {
    best: u64,
}

/// JSON file store for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn read(&self) -> Result<Option<u64>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str::<ScoreFile>(&json)?.best)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&ScoreFile { best: score })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// LocalStorage store (WASM only)
///
/// Stored as a bare integer string.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "neon-snake-high-score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn read(&self) -> Result<Option<u64>, StoreError> {
        let raw = Self::storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)?;
        match raw {
            Some(text) => text
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| StoreError::Corrupt(text)),
            None => Ok(None),
        }
    }

    fn write(&mut self, score: u64) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|e| StoreError::Rejected(format!("{:?}", e)))
    }
}

/// Best score tracker with write-through on improvement
pub struct HighScore {
    best: u64,
    store: Box<dyn ScoreStore>,
}

impl HighScore {
    /// Read the stored best; unreadable storage counts as zero
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.read() {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                best
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Could not read high score: {}", e);
                0
            }
        };
        Self { best, store }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a score; returns true if it beat the best
    ///
    /// The in-memory best is raised even if the write fails.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match self.store.write(score) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("Could not save high score {}: {}", score, e),
        }
        true
    }
}

impl EventSink for HighScore {
    fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::HighScoreCandidate(score) | GameEvent::GameOver { score, .. } => {
                self.submit(score);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EndReason;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shares its value with the test so writes can be observed
    struct SharedStore(Rc<RefCell<Option<u64>>>);

    impl ScoreStore for SharedStore {
        fn read(&self) -> Result<Option<u64>, StoreError> {
            Ok(*self.0.borrow())
        }

        fn write(&mut self, score: u64) -> Result<(), StoreError> {
            *self.0.borrow_mut() = Some(score);
            Ok(())
        }
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn read(&self) -> Result<Option<u64>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn write(&mut self, _score: u64) -> Result<(), StoreError> {
            Err(StoreError::Rejected("quota exceeded".into()))
        }
    }

    #[test]
    fn test_writes_only_on_improvement() {
        let cell = Rc::new(RefCell::new(Some(50)));
        let mut hs = HighScore::load(Box::new(SharedStore(cell.clone())));
        assert_eq!(hs.best(), 50);

        assert!(!hs.submit(40));
        assert!(!hs.submit(50));
        assert_eq!(*cell.borrow(), Some(50));

        assert!(hs.submit(60));
        assert_eq!(*cell.borrow(), Some(60));
    }

    #[test]
    fn test_storage_faults_are_absorbed() {
        let mut hs = HighScore::load(Box::new(BrokenStore));
        assert_eq!(hs.best(), 0);
        assert!(hs.submit(30));
        assert_eq!(hs.best(), 30);
    }

    #[test]
    fn test_handles_events() {
        let mut hs = HighScore::load(Box::new(MemoryStore::default()));
        hs.handle(&GameEvent::ScoreChanged(100));
        assert_eq!(hs.best(), 0);
        hs.handle(&GameEvent::HighScoreCandidate(20));
        assert_eq!(hs.best(), 20);
        hs.handle(&GameEvent::GameOver {
            reason: EndReason::Wall,
            score: 30,
        });
        assert_eq!(hs.best(), 30);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "neon-snake-highscore-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.read().unwrap(), None);
        store.write(120).unwrap();
        assert_eq!(store.read().unwrap(), Some(120));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(store.read(), Err(StoreError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}
