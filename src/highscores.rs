//! High score leaderboard
//!
//! Fed from `DrillEvent::SessionOver`. Keeps the top 5 sessions; the host
//! decides where the JSON lives.

use serde::{Deserialize, Serialize};

use crate::sim::Session;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Host timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies; returns the rank achieved (1-indexed).
    /// Ties rank below the existing entry.
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record a finished session
    pub fn record_session(&mut self, session: &Session, timestamp: f64) -> Option<usize> {
        let rank = self.add_score(session.score, session.level, timestamp);
        match rank {
            Some(rank) => log::info!("New high score #{}: {}", rank, session.score),
            None => log::debug!("Score {} did not make the leaderboard", session.score),
        }
        rank
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse stored scores, restoring order and the size cap
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: Self = serde_json::from_str(json)?;
        scores.entries.retain(|e| e.score > 0);
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_keeps_top_five_sorted() {
        let mut scores = HighScores::new();
        for (i, score) in [12, 40, 7, 25, 3, 18].into_iter().enumerate() {
            scores.add_score(score, 1, i as f64);
        }
        let kept: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(kept, vec![40, 25, 18, 12, 7]);
        assert_eq!(scores.top_score(), Some(40));

        assert!(!scores.qualifies(7));
        assert_eq!(scores.potential_rank(8), Some(5));
        assert_eq!(scores.add_score(30, 4, 9.0), Some(2));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_ties_rank_below() {
        let mut scores = HighScores::new();
        scores.add_score(10, 2, 0.0);
        assert_eq!(scores.add_score(10, 2, 1.0), Some(2));
        assert_eq!(scores.entries[0].timestamp, 0.0);
    }

    #[test]
    fn test_record_session() {
        let mut scores = HighScores::new();
        let session = Session {
            score: 23,
            lives: 0,
            level: 3,
            speed: 78.125,
        };
        assert_eq!(scores.record_session(&session, 100.0), Some(1));
        assert_eq!(scores.entries[0].level, 3);
    }

    #[test]
    fn test_from_json_restores_order() {
        let json = r#"{"entries":[
            {"score":5,"level":1,"timestamp":0.0},
            {"score":0,"level":1,"timestamp":0.0},
            {"score":50,"level":6,"timestamp":0.0},
            {"score":9,"level":1,"timestamp":0.0},
            {"score":12,"level":2,"timestamp":0.0},
            {"score":30,"level":4,"timestamp":0.0},
            {"score":1,"level":1,"timestamp":0.0}
        ]}"#;
        let scores = HighScores::from_json(json).expect("valid json");
        let kept: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(kept, vec![50, 30, 12, 9, 5]);

        let again = HighScores::from_json(&scores.to_json().expect("serializes")).expect("parses");
        assert_eq!(again, scores);
        assert!(HighScores::from_json("[").is_err());
    }
}
