//! Local high-score table (top 10, best first). The frontend persists it as
//! JSON in `localStorage`.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const STORAGE_KEY: &str = "grannyHighScores";
pub const MAX_ENTRIES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: i64,
    pub level: u32,
    /// ISO-8601 timestamp.
    pub date: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    entries: Vec<HighScore>,
}

impl HighScoreTable {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let mut table: HighScoreTable = serde_json::from_str(json).map_err(GameError::HighScores)?;
        table.normalize();
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string(self).map_err(GameError::HighScores)
    }

    /// Insert and keep the best `MAX_ENTRIES`. Returns the 0-based rank, or
    /// `None` if the score did not make the cut.
    pub fn record(&mut self, entry: HighScore) -> Option<usize> {
        // Stable ordering: a new score ties behind existing equal scores.
        let rank = self.entries.partition_point(|e| e.score >= entry.score);
        if rank >= MAX_ENTRIES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn best(&self) -> Option<&HighScore> {
        self.entries.first()
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}
