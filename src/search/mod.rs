//! Search module for m,n,k positions
//!
//! Contains:
//! - Candidate generation with proximity filtering and ordering
//! - Fixed-depth alpha-beta over those candidates

pub mod alphabeta;
pub mod movegen;

pub use alphabeta::{SearchResult, SearchStats, Searcher};
pub use movegen::{MoveCandidate, MoveGenerator};
