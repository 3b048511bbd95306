//! Current and best score
//!
//! The host persists the board however it likes (the browser build keeps it
//! in LocalStorage); the simulation only needs the numbers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Scoreboard {
    /// Points in the current round
    #[serde(skip)]
    score: u32,
    /// Highest score ever reached
    best: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board restored with a previously saved best score
    pub fn with_best(best: u32) -> Self {
        Self { score: 0, best }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Add a point; returns the new score
    pub fn increment(&mut self) -> u32 {
        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
        }
        self.score
    }

    /// Start a new round at zero, keeping the best score
    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// True when the current round set (or tied) the best score
    pub fn is_best(&self) -> bool {
        self.score > 0 && self.score == self.best
    }

    /// Parse a saved board
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let board: Self = serde_json::from_str(json)?;
        log::info!("Loaded best score {}", board.best);
        Ok(board)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
