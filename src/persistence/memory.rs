//! In-memory score store

use super::{ScoreStore, StoreError};
use crate::highscores::HighScores;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
    /// Successful saves so far
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.scores = scores.clone();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_counts_saves() {
        let mut store = MemoryStore::new();
        assert_eq!(store.best_wave(), 0);
        let mut board = HighScores::new();
        board.record(9, 120, 0.0);
        store.save(&board).expect("memory save");
        assert_eq!(store.best_wave(), 9);
        assert_eq!(store.saves, 1);
    }
}
