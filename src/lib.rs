//! m,n,k game engine
//!
//! Plays generalized tic-tac-toe: an M x N board where K marks in a row
//! (horizontally, vertically or diagonally) win.
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Flat cell grid and geometry queries
//! - [`eval`]: Live K-window counting and the weighted heuristic
//! - [`search`]: Candidate generation and alpha-beta search
//! - [`game`]: Turn controller with win/draw detection
//! - [`engine`]: Engine facade with position memory and opening policy
//! - [`config`]: Validated geometry and search parameters
//!
//! # Quick Start
//!
//! ```
//! use mnk::{Engine, EngineConfig, GameState, Outcome};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let mut game = GameState::new(3, 3, 3).unwrap();
//!
//! // Engine plays both sides
//! while game.outcome() == Outcome::InProgress {
//!     let result = engine.choose_move(&game).unwrap();
//!     game.apply_move(result.index).unwrap();
//! }
//! println!("{}", game.board());
//! ```
//!
//! # Evaluation
//!
//! A K-long window holding marks of only one player is live for that
//! player. The score of a position is the weighted difference between the
//! two players' live window histograms, or an infinite sentinel once either
//! side owns a complete window.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Player};
pub use config::{EngineConfig, SearchParams};
pub use engine::{Engine, MoveResult, MoveSource, NoOpening, OpeningPolicy, RandomOpening};
pub use error::GameError;
pub use game::{GameState, Outcome};
