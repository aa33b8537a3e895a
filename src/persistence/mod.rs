//! Score persistence
//!
//! The simulation never touches storage. The host loads the leaderboard at
//! startup and saves it once per game over through a `ScoreStore`.
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and headless demos
//! - `JsonFileStore`: JSON document on disk, written via a temp file

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::highscores::HighScores;

/// Storage failure. Never fatal for gameplay.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("score data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the leaderboard lives between sessions
pub trait ScoreStore {
    /// Load the leaderboard; a missing store is an empty board, not an error
    fn load(&self) -> Result<HighScores, StoreError>;

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError>;

    /// Best wave ever recorded (0 if unknown or unreadable)
    fn best_wave(&self) -> u32 {
        self.load().map(|s| s.best_wave()).unwrap_or(0)
    }
}
