//! Engine facade tying configuration, memory and search together
//!
//! The engine answers move requests for whichever side is on turn:
//!
//! 1. **Opening**: on an empty board an [`OpeningPolicy`] may pick the move
//! 2. **Search**: otherwise a fixed-depth alpha-beta search decides
//!
//! Between requests the engine remembers the last board it saw together with
//! its live window counts, so a request after a single new mark only
//! re-tallies the windows around that mark.
//!
//! # Example
//!
//! ```
//! use mnk::{Engine, EngineConfig, GameState};
//!
//! let config = EngineConfig::default();
//! let mut engine = Engine::new(config).unwrap();
//! let mut game = GameState::new(3, 3, 3).unwrap();
//!
//! game.apply_move(4).unwrap();
//! let reply = engine.choose_move(&game).unwrap();
//! game.apply_move(reply.index).unwrap();
//! println!("O played {} in {}ms", reply.index, reply.time_ms);
//! ```

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Player};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::eval::{Score, SequenceCounts, LOSS, WIN};
use crate::game::GameState;
use crate::search::{SearchStats, Searcher};

/// Picks a move without searching.
///
/// The engine only consults its policy on an empty board.
pub trait OpeningPolicy {
    /// Cell to play, or `None` to fall through to search
    fn choose(&mut self, board: &Board) -> Option<usize>;
}

/// Always defer to search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpening;

impl OpeningPolicy for NoOpening {
    fn choose(&mut self, _board: &Board) -> Option<usize> {
        None
    }
}

/// Uniformly random empty cell from a seedable generator.
#[derive(Debug, Clone)]
pub struct RandomOpening {
    rng: StdRng,
}

impl RandomOpening {
    /// Deterministic sequence for a given seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl OpeningPolicy for RandomOpening {
    fn choose(&mut self, board: &Board) -> Option<usize> {
        let free: Vec<usize> = board.empty_indices().collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }
}

/// How a move was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Supplied by the opening policy
    Opening,
    /// Alpha-beta search result
    Search,
}

/// A chosen move with diagnostics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Cell to play
    pub index: usize,
    /// Search value from the mover's perspective (0 for openings)
    pub value: Score,
    pub source: MoveSource,
    /// Counters of the search, all zero for openings
    pub stats: SearchStats,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

/// Last position the engine saw.
#[derive(Debug, Clone)]
struct Memory {
    board: Board,
    counts: SequenceCounts,
    last_move: Option<usize>,
}

impl Memory {
    fn new(board: Board) -> Self {
        let counts = SequenceCounts::count(&board);
        Self {
            board,
            counts,
            last_move: None,
        }
    }
}

/// Move-choosing engine for one board geometry.
pub struct Engine {
    config: EngineConfig,
    opening: Box<dyn OpeningPolicy>,
    memory: Memory,
}

impl Engine {
    /// Create an engine after validating `config`. Openings are searched.
    pub fn new(config: EngineConfig) -> Result<Self, GameError> {
        config.validate()?;
        let board = config.new_board()?;
        Ok(Self {
            config,
            opening: Box::new(NoOpening),
            memory: Memory::new(board),
        })
    }

    /// Replace the opening policy.
    #[must_use]
    pub fn with_opening(mut self, policy: impl OpeningPolicy + 'static) -> Self {
        self.opening = Box::new(policy);
        self
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Most recent mark found by [`observe`](Self::observe)
    #[inline]
    pub fn last_move(&self) -> Option<usize> {
        self.memory.last_move
    }

    /// Last board seen
    #[inline]
    pub fn last_board(&self) -> &Board {
        &self.memory.board
    }

    /// Record `board` as the current position.
    ///
    /// Observing the same board twice changes nothing. A board with exactly
    /// one new mark is folded in incrementally; anything else is recounted.
    pub fn observe(&mut self, board: &Board) -> Result<(), GameError> {
        self.check_geometry(board)?;
        if *board == self.memory.board {
            return Ok(());
        }

        let mut changed = board
            .cells()
            .iter()
            .zip(self.memory.board.cells())
            .enumerate()
            .filter(|(_, (new, old))| new != old)
            .map(|(i, _)| i);
        let first = changed.next();
        let single = changed.next().is_none();

        let placed = first.and_then(|i| {
            let old = self.memory.board.get(i)?;
            let new = board.get(i)?.owner()?;
            old.is_empty().then_some((i, new))
        });

        match placed {
            Some((index, player)) if single => {
                self.memory.counts.place(&self.memory.board, index, player);
            }
            _ => self.memory.counts.count_into(board),
        }
        self.memory.board = board.clone();
        self.memory.last_move = placed.map(|(i, _)| i);
        Ok(())
    }

    /// Drop the remembered position.
    pub fn forget(&mut self) {
        self.memory.board.reset();
        self.memory.counts.count_into(&self.memory.board);
        self.memory.last_move = None;
    }

    /// Choose a move for the side on turn in `game`.
    pub fn choose_move(&mut self, game: &GameState) -> Result<MoveResult, GameError> {
        if game.is_finished() {
            return Err(GameError::NoLegalMove);
        }
        self.choose_move_on(game.board(), game.current_player())
    }

    /// Choose a move for `to_move` on an arbitrary position.
    ///
    /// Fails with `NoLegalMove` when the board is full or already won.
    pub fn choose_move_on(&mut self, board: &Board, to_move: Player) -> Result<MoveResult, GameError> {
        let start = Instant::now();
        self.observe(board)?;

        if board.is_full() || self.memory.counts.winner().is_some() {
            return Err(GameError::NoLegalMove);
        }

        if board.is_empty() {
            match self.opening.choose(board) {
                Some(index) if board.get(index).is_some_and(|c| c.is_empty()) => {
                    log::debug!("{to_move:?} opens at {index}");
                    return Ok(MoveResult {
                        index,
                        value: 0.0,
                        source: MoveSource::Opening,
                        stats: SearchStats::default(),
                        time_ms: start.elapsed().as_millis() as u64,
                    });
                }
                Some(index) => log::warn!("opening policy chose unplayable cell {index}"),
                None => {}
            }
        }

        let params = &self.config.search;
        let mut searcher = Searcher::new(params, to_move);
        let result = searcher.search_counted(
            board,
            &self.memory.counts,
            params.depth,
            LOSS,
            WIN,
            true,
        );
        // A non-full, undecided root always yields a candidate
        let index = result.best_move.ok_or(GameError::NoLegalMove)?;
        let time_ms = start.elapsed().as_millis() as u64;
        let stats = searcher.stats().clone();

        log::debug!(
            "{to_move:?} plays {index} (value {}, {} nodes, {} cutoffs, {time_ms}ms)",
            result.value,
            stats.nodes,
            stats.cutoffs
        );

        Ok(MoveResult {
            index,
            value: result.value,
            source: MoveSource::Search,
            stats,
            time_ms,
        })
    }

    fn check_geometry(&self, board: &Board) -> Result<(), GameError> {
        let c = &self.config;
        if (board.width(), board.height(), board.win_length()) != (c.width, c.height, c.win_length) {
            return Err(GameError::config(format!(
                "board is {}x{} (K={}) but the engine is configured for {}x{} (K={})",
                board.width(),
                board.height(),
                board.win_length(),
                c.width,
                c.height,
                c.win_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell::{self, Empty as E, O, X};
    use crate::config::{geometric_weights, SearchParams};
    use crate::game::Outcome;

    fn config_with_depth(depth: u8) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.search.depth = depth;
        config
    }

    fn position(cells: &[Cell], to_move: Player) -> GameState {
        GameState::from_position(Board::from_cells(3, 3, 3, cells).unwrap(), to_move)
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.search.weights = vec![0.0, 1.0];
        assert!(matches!(Engine::new(config), Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let game = position(&[X, X, E, O, O, E, E, E, E], Player::X);
        for depth in 1..=5 {
            let mut engine = Engine::new(config_with_depth(depth)).unwrap();
            let result = engine.choose_move(&game).unwrap();
            assert_eq!(result.index, 2, "depth {depth}");
            assert_eq!(result.value, WIN);
            assert_eq!(result.source, MoveSource::Search);
        }
    }

    #[test]
    fn test_engine_blocks_opponent_win() {
        let game = position(&[O, O, E, X, E, E, X, E, E], Player::X);
        for depth in 2..=3 {
            let mut engine = Engine::new(config_with_depth(depth)).unwrap();
            assert_eq!(engine.choose_move(&game).unwrap().index, 2, "depth {depth}");
        }
    }

    #[test]
    fn test_engine_plays_for_o() {
        let game = position(&[X, X, E, O, O, E, X, E, E], Player::O);
        let mut engine = Engine::new(config_with_depth(3)).unwrap();
        assert_eq!(engine.choose_move(&game).unwrap().index, 5);
    }

    #[test]
    fn test_no_legal_move() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();

        let full = position(&[X, O, X, X, O, O, O, X, X], Player::X);
        assert_eq!(engine.choose_move(&full).unwrap_err(), GameError::NoLegalMove);

        let won = position(&[X, X, X, O, O, E, E, E, E], Player::O);
        assert_eq!(engine.choose_move(&won).unwrap_err(), GameError::NoLegalMove);

        let board = Board::from_cells(3, 3, 3, &[X, X, X, O, O, E, E, E, E]).unwrap();
        assert_eq!(
            engine.choose_move_on(&board, Player::O).unwrap_err(),
            GameError::NoLegalMove
        );
    }

    #[test]
    fn test_geometry_mismatch() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let game = GameState::new(4, 4, 3).unwrap();
        assert!(matches!(
            engine.choose_move(&game),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_random_opening_is_seeded() {
        let board = Board::new(3, 3, 3).unwrap();
        let pick = |seed| {
            let mut engine = Engine::new(EngineConfig::default())
                .unwrap()
                .with_opening(RandomOpening::new(seed));
            engine.choose_move_on(&board, Player::X).unwrap()
        };
        let a = pick(42);
        let b = pick(42);
        assert_eq!(a.index, b.index);
        assert_eq!(a.source, MoveSource::Opening);
        assert!(a.index < 9);
        assert_eq!(a.stats, SearchStats::default());
    }

    #[test]
    fn test_opening_only_on_empty_board() {
        let mut engine = Engine::new(config_with_depth(2))
            .unwrap()
            .with_opening(RandomOpening::new(1));
        let game = position(&[E, E, E, E, X, E, E, E, E], Player::O);
        assert_eq!(engine.choose_move(&game).unwrap().source, MoveSource::Search);
    }

    #[test]
    fn test_random_opening_skips_occupied() {
        let board = Board::from_cells(3, 1, 1, &[X, E, O]).unwrap();
        let mut policy = RandomOpening::new(3);
        for _ in 0..20 {
            assert_eq!(policy.choose(&board), Some(1));
        }
        let full = Board::from_cells(1, 1, 1, &[X]).unwrap();
        assert_eq!(policy.choose(&full), None);
    }

    #[test]
    fn test_entropy_opening_picks_free_cell() {
        let board = Board::from_cells(3, 3, 3, &[X, O, E, X, O, E, E, E, E]).unwrap();
        let mut policy = RandomOpening::from_entropy();
        for _ in 0..20 {
            let index = policy.choose(&board).unwrap();
            assert_eq!(board.get(index), Some(Cell::Empty));
        }

        let mut engine = Engine::new(EngineConfig::default())
            .unwrap()
            .with_opening(RandomOpening::from_entropy());
        let result = engine.choose_move_on(&Board::new(3, 3, 3).unwrap(), Player::X).unwrap();
        assert_eq!(result.source, MoveSource::Opening);
        assert!(result.index < 9);
    }

    #[test]
    fn test_no_opening_searches_empty_board() {
        let mut engine = Engine::new(config_with_depth(2)).unwrap();
        let board = Board::new(3, 3, 3).unwrap();
        let result = engine.choose_move_on(&board, Player::X).unwrap();
        assert_eq!(result.source, MoveSource::Search);
        assert!(result.stats.nodes > 1);
    }

    #[test]
    fn test_observe_is_idempotent() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let board = Board::from_cells(3, 3, 3, &[E, E, E, E, X, E, E, E, E]).unwrap();
        engine.observe(&board).unwrap();
        let counts = engine.memory.counts.clone();
        engine.observe(&board).unwrap();
        assert_eq!(engine.memory.counts, counts);
        assert_eq!(engine.last_move(), Some(4));
        assert_eq!(engine.last_board(), &board);
    }

    #[test]
    fn test_observe_tracks_counts() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut board = Board::new(3, 3, 3).unwrap();
        for (i, &m) in [4, 0, 8, 2].iter().enumerate() {
            let player = if i % 2 == 0 { Player::X } else { Player::O };
            board.set(m, player).unwrap();
            engine.observe(&board).unwrap();
            assert_eq!(engine.last_move(), Some(m));
            assert_eq!(engine.memory.counts, SequenceCounts::count(&board));
        }

        // Two new marks at once force a recount
        board.set(1, Player::X).unwrap();
        board.set(7, Player::O).unwrap();
        engine.observe(&board).unwrap();
        assert_eq!(engine.memory.counts, SequenceCounts::count(&board));

        engine.forget();
        assert_eq!(engine.last_move(), None);
        assert!(engine.last_board().is_empty());
    }

    #[test]
    fn test_zero_time_budget() {
        let mut config = EngineConfig::default();
        config.search.time_budget_ms = Some(0);
        let mut engine = Engine::new(config).unwrap();
        let game = position(&[E, E, E, E, X, E, E, E, E], Player::O);
        let result = engine.choose_move(&game).unwrap();
        assert!(result.stats.timed_out);
        assert_eq!(result.stats.root_moves, 0);
        // Corners keep the most of O's windows alive
        assert_eq!(result.index, 0);
    }

    #[test]
    fn test_self_play_finishes() {
        let config = EngineConfig {
            width: 4,
            height: 4,
            win_length: 3,
            search: SearchParams {
                depth: 3,
                branch_limit: 6,
                weights: geometric_weights(3, 10.0),
                ..EngineConfig::default().search
            },
        };
        let mut engine = Engine::new(config).unwrap();
        let mut game = GameState::new(4, 4, 3).unwrap();
        let mut plies = 0;
        while !game.is_finished() {
            let result = engine.choose_move(&game).unwrap();
            game.apply_move(result.index).unwrap();
            plies += 1;
        }
        assert!(plies <= 16);
        assert_ne!(game.outcome(), Outcome::InProgress);
        assert_eq!(engine.choose_move(&game).unwrap_err(), GameError::NoLegalMove);
    }
}
