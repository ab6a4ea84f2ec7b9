//! Evaluation module for m,n,k positions
//!
//! This module turns a board into a score in two steps:
//! - [`sequences`]: live K-window histograms for both players
//! - [`heuristic`]: weighted histogram difference with win sentinels

pub mod heuristic;
pub mod sequences;

pub use heuristic::{evaluate, is_decisive, Score, DRAW, LOSS, WIN};
pub use sequences::SequenceCounts;
