//! Turn controller
//!
//! [`GameState`] holds the authoritative board, whose turn it is and the
//! outcome so far. It keeps live window counts up to date with each move so
//! win detection never needs a full recount.

use crate::board::{Board, Player};
use crate::error::GameError;
use crate::eval::SequenceCounts;

/// Status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    InProgress,
    Won(Player),
    Draw,
}

impl Outcome {
    #[inline]
    pub fn is_finished(self) -> bool {
        self != Outcome::InProgress
    }

    /// Winning side, if any
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Won(p) => Some(p),
            _ => None,
        }
    }
}

/// Board plus turn and outcome bookkeeping.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    counts: SequenceCounts,
    current: Player,
    outcome: Outcome,
    moves: Vec<usize>,
}

impl GameState {
    /// Start a game on an empty board. X moves first.
    pub fn new(width: usize, height: usize, win_length: usize) -> Result<Self, GameError> {
        let board = Board::new(width, height, win_length)?;
        Ok(Self::from_position(board, Player::X))
    }

    /// Resume from an arbitrary position with `to_move` on turn.
    ///
    /// The outcome is derived from the position; the move history starts
    /// empty.
    #[must_use]
    pub fn from_position(board: Board, to_move: Player) -> Self {
        let counts = SequenceCounts::count(&board);
        let outcome = Self::outcome_of(&board, &counts);
        Self {
            board,
            counts,
            current: to_move,
            outcome,
            moves: Vec::new(),
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Live window counts of the current board
    #[inline]
    pub fn counts(&self) -> &SequenceCounts {
        &self.counts
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.current
    }

    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    /// Cells played since the game started or was resumed, in order
    #[inline]
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    #[inline]
    pub fn last_move(&self) -> Option<usize> {
        self.moves.last().copied()
    }

    /// Place the current player's mark at `index`.
    ///
    /// The turn passes to the opponent only while the game continues.
    pub fn apply_move(&mut self, index: usize) -> Result<Outcome, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        match self.board.get(index) {
            None => {
                return Err(GameError::OutOfRange {
                    index,
                    cells: self.board.size(),
                })
            }
            Some(cell) if !cell.is_empty() => return Err(GameError::OccupiedCell { index }),
            Some(_) => {}
        }

        let player = self.current;
        self.counts.place(&self.board, index, player);
        self.board.set(index, player)?;
        self.moves.push(index);

        self.outcome = Self::outcome_of(&self.board, &self.counts);
        match self.outcome {
            Outcome::InProgress => self.current = player.opponent(),
            Outcome::Won(winner) => {
                log::debug!("{winner:?} wins after {} moves\n{}", self.moves.len(), self.board);
            }
            Outcome::Draw => {
                log::debug!("draw after {} moves\n{}", self.moves.len(), self.board);
            }
        }
        Ok(self.outcome)
    }

    /// Clear the board for a new game with the same geometry. X starts.
    pub fn reset(&mut self) {
        self.board.reset();
        self.counts.count_into(&self.board);
        self.current = Player::X;
        self.outcome = Outcome::InProgress;
        self.moves.clear();
    }

    fn outcome_of(board: &Board, counts: &SequenceCounts) -> Outcome {
        match counts.winner() {
            Some(p) => Outcome::Won(p),
            None if board.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell::{Empty as E, O, X};

    fn play(game: &mut GameState, moves: &[usize]) {
        for &m in moves {
            game.apply_move(m).unwrap();
        }
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new(3, 3, 3).unwrap();
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert!(game.moves().is_empty());
        assert_eq!(game.last_move(), None);
        assert_eq!(game.counts().empty(), 9);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(matches!(
            GameState::new(2, 2, 3),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = GameState::new(3, 3, 3).unwrap();
        assert_eq!(game.apply_move(4), Ok(Outcome::InProgress));
        assert_eq!(game.current_player(), Player::O);
        game.apply_move(0).unwrap();
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.moves(), &[4, 0]);
        assert_eq!(game.last_move(), Some(0));
    }

    #[test]
    fn test_rejected_moves_change_nothing() {
        let mut game = GameState::new(3, 3, 3).unwrap();
        game.apply_move(4).unwrap();
        assert_eq!(game.apply_move(4), Err(GameError::OccupiedCell { index: 4 }));
        assert_eq!(
            game.apply_move(9),
            Err(GameError::OutOfRange { index: 9, cells: 9 })
        );
        assert_eq!(game.current_player(), Player::O);
        assert_eq!(game.moves(), &[4]);
    }

    #[test]
    fn test_win_keeps_winner_on_turn() {
        let mut game = GameState::new(3, 3, 3).unwrap();
        play(&mut game, &[0, 3, 1, 4]);
        assert_eq!(game.apply_move(2), Ok(Outcome::Won(Player::X)));
        assert_eq!(game.current_player(), Player::X);
        assert!(game.is_finished());
        assert_eq!(game.outcome().winner(), Some(Player::X));
        assert_eq!(game.apply_move(5), Err(GameError::GameFinished));
    }

    #[test]
    fn test_draw() {
        let mut game = GameState::new(3, 3, 3).unwrap();
        // X O X / X O O / O X X
        play(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6]);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert_eq!(game.apply_move(8), Ok(Outcome::Draw));
        assert_eq!(game.outcome().winner(), None);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        let mut game = GameState::new(3, 3, 3).unwrap();
        // X O X / O X O / O X X: X completes the diagonal on the last cell
        play(&mut game, &[0, 1, 2, 3, 4, 5, 7, 6]);
        assert_eq!(game.apply_move(8), Ok(Outcome::Won(Player::X)));
    }

    #[test]
    fn test_counts_track_board() {
        let mut game = GameState::new(4, 4, 3).unwrap();
        play(&mut game, &[5, 6, 10, 0, 15]);
        assert_eq!(game.counts(), &SequenceCounts::count(game.board()));
    }

    #[test]
    fn test_reset_keeps_geometry() {
        let mut game = GameState::new(4, 3, 3).unwrap();
        play(&mut game, &[0, 1, 2]);
        game.reset();
        assert_eq!(game.board().width(), 4);
        assert_eq!(game.board().height(), 3);
        assert!(game.board().is_empty());
        assert_eq!(game.current_player(), Player::X);
        assert_eq!(game.outcome(), Outcome::InProgress);
        assert!(game.moves().is_empty());
        assert_eq!(game.counts(), &SequenceCounts::count(game.board()));
    }

    #[test]
    fn test_from_position() {
        let board = Board::from_cells(3, 3, 3, &[X, X, X, O, O, E, E, E, E]).unwrap();
        let game = GameState::from_position(board, Player::O);
        assert_eq!(game.outcome(), Outcome::Won(Player::X));

        let board = Board::from_cells(3, 3, 3, &[X, E, E, E, O, E, E, E, E]).unwrap();
        let mut game = GameState::from_position(board, Player::X);
        assert_eq!(game.outcome(), Outcome::InProgress);
        game.apply_move(8).unwrap();
        assert_eq!(game.current_player(), Player::O);
    }
}
