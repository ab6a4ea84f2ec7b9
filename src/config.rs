//! Engine configuration
//!
//! All inputs are plain data supplied at construction time. With the `serde`
//! feature enabled both structs can be loaded by a harness (for example from
//! JSON); the engine itself never touches the filesystem.

use std::time::Duration;

use crate::board::Board;
use crate::error::GameError;

/// Proximity offset as (dx, dy): column step, then row step.
pub type Offset = (isize, isize);

/// Parameters of one move search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchParams {
    /// Plies searched below the root (at least 1)
    pub depth: u8,
    /// Maximum number of ordered candidates expanded per node
    pub branch_limit: usize,
    /// Scoring weights, one per run length `0..K` (index 0 is ignored)
    pub weights: Vec<f64>,
    /// Cells at these offsets from a candidate must hold a mark for the
    /// candidate to be considered (bypassed on an empty board)
    pub proximity: Vec<Offset>,
    /// Wall-clock budget for expanding root candidates
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_budget_ms: Option<u64>,
}

impl SearchParams {
    /// Reject parameters that cannot drive a search on a board with run
    /// length `win_length`.
    pub fn validate(&self, win_length: usize) -> Result<(), GameError> {
        if self.depth == 0 {
            return Err(GameError::config("search depth must be at least 1"));
        }
        if self.branch_limit == 0 {
            return Err(GameError::config("branch limit must be > 0"));
        }
        if self.weights.is_empty() {
            return Err(GameError::config("weight vector is empty"));
        }
        if self.weights.len() != win_length {
            return Err(GameError::config(format!(
                "expected {win_length} weights, got {}",
                self.weights.len()
            )));
        }
        if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(GameError::config(format!(
                "weights must be finite and non-negative, got {w}"
            )));
        }
        if self.proximity.is_empty() {
            return Err(GameError::config("proximity offset set is empty"));
        }
        Ok(())
    }

    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Board geometry plus search parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    /// Marks in a row needed to win (K)
    pub win_length: usize,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub search: SearchParams,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        // Geometry rules live with the board
        Board::new(self.width, self.height, self.win_length)?;
        self.search.validate(self.win_length)
    }

    /// Fresh empty board with this geometry
    pub fn new_board(&self) -> Result<Board, GameError> {
        Board::new(self.width, self.height, self.win_length)
    }
}

impl Default for EngineConfig {
    /// Classic tic-tac-toe searched five plies deep.
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
            win_length: 3,
            search: SearchParams {
                depth: 5,
                branch_limit: 9,
                weights: geometric_weights(3, 10.0),
                proximity: square(2),
                time_budget_ms: None,
            },
        }
    }
}

/// Weights `[0, 1, base, base^2, ...]` of length `win_length`.
pub fn geometric_weights(win_length: usize, base: f64) -> Vec<f64> {
    let mut weights = Vec::with_capacity(win_length);
    let mut w = 1.0;
    for i in 0..win_length {
        if i == 0 {
            weights.push(0.0);
        } else {
            weights.push(w);
            w *= base;
        }
    }
    weights
}

/// Every offset in the (2r+1)x(2r+1) square around a cell, origin excluded.
pub fn square(radius: isize) -> Vec<Offset> {
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if (dx, dy) != (0, 0) {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Every offset with `dx^2 + dy^2 <= r^2`, origin excluded.
pub fn disc(radius: isize) -> Vec<Offset> {
    square(radius)
        .into_iter()
        .filter(|(dx, dy)| dx * dx + dy * dy <= radius * radius)
        .collect()
}
