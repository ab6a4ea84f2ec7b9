//! Error types for the m,n,k engine

/// Errors reported by the board, the turn controller and the engine.
///
/// Every variant is recoverable: callers get the failure back as a value
/// and the board or game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A mark was placed on a cell that already holds one.
    #[error("cell {index} is already occupied")]
    OccupiedCell { index: usize },

    /// A linear index outside `0..width*height`.
    #[error("cell index {index} is out of range (board has {cells} cells)")]
    OutOfRange { index: usize, cells: usize },

    /// The engine was asked for a move on a board that has none.
    #[error("no legal move is available")]
    NoLegalMove,

    /// A move was applied after the game had already been decided.
    #[error("the game is already finished")]
    GameFinished,

    /// Board geometry or search parameters were rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl GameError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        GameError::InvalidConfiguration(reason.into())
    }
}
