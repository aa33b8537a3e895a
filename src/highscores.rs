//! High score leaderboard
//!
//! Ranks finished runs by wave reached (gold breaks ties). Persisted through
//! a `ScoreStore`, keeps the top 10.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Wave the run ended on
    pub wave: u32,
    /// Gold held at the end
    pub gold: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl RunRecord {
    fn beats(&self, other: &RunRecord) -> bool {
        (self.wave, self.gold) > (other.wave, other.gold)
    }
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Highest wave ever reached (0 if none)
    pub fn best_wave(&self) -> u32 {
        self.entries.first().map(|e| e.wave).unwrap_or(0)
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, run: &RunRecord) -> bool {
        if run.wave == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| run.beats(e)).unwrap_or(true)
    }

    /// Add a run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_run(&mut self, run: RunRecord) -> Option<usize> {
        if !self.qualifies(&run) {
            return None;
        }

        let pos = self.entries.iter().position(|e| run.beats(e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, run);
                i + 1
            }
            None => {
                self.entries.push(run);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record a finished run. Returns true if it set a new best wave.
    pub fn record(&mut self, wave: u32, gold: u32, timestamp: f64) -> bool {
        let previous = self.best_wave();
        self.add_run(RunRecord {
            wave,
            gold,
            timestamp,
        });
        wave > previous
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(wave: u32, gold: u32) -> RunRecord {
        RunRecord {
            wave,
            gold,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_empty_board() {
        let board = HighScores::new();
        assert!(board.is_empty());
        assert_eq!(board.best_wave(), 0);
    }

    #[test]
    fn test_sorted_by_wave_then_gold() {
        let mut board = HighScores::new();
        assert_eq!(board.add_run(run(3, 100)), Some(1));
        assert_eq!(board.add_run(run(7, 10)), Some(1));
        assert_eq!(board.add_run(run(3, 500)), Some(2));
        let waves: Vec<_> = board.entries.iter().map(|e| (e.wave, e.gold)).collect();
        assert_eq!(waves, vec![(7, 10), (3, 500), (3, 100)]);
        assert_eq!(board.best_wave(), 7);
    }

    #[test]
    fn test_board_is_capped() {
        let mut board = HighScores::new();
        for wave in 1..=15 {
            board.add_run(run(wave, 0));
        }
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.best_wave(), 15);
        assert!(!board.qualifies(&run(2, 0)));
    }

    #[test]
    fn test_record_reports_new_best() {
        let mut board = HighScores::new();
        assert!(board.record(4, 0, 1.0));
        assert!(!board.record(3, 0, 2.0));
        assert!(!board.record(4, 0, 3.0));
        assert!(board.record(5, 0, 4.0));
        assert_eq!(board.best_wave(), 5);
    }
}
