//! Fixed-depth minimax with alpha-beta pruning
//!
//! This module implements the core search of the engine. Values are always
//! taken from one fixed perspective: the maximizing side is the searching
//! player and the minimizing side is its opponent.
//!
//! # Features
//!
//! - Candidate ordering and truncation by [`MoveGenerator`]
//! - Win detection at every node via the live window counts
//! - Optional wall-clock budget that truncates root breadth
//! - A non-pruning mode for checking that pruning never changes the value
//!
//! # Example
//!
//! ```
//! use mnk::board::{Board, Player};
//! use mnk::config::EngineConfig;
//! use mnk::eval::{LOSS, WIN};
//! use mnk::search::Searcher;
//!
//! let config = EngineConfig::default();
//! let board = Board::new(3, 3, 3).unwrap();
//!
//! let mut searcher = Searcher::new(&config.search, Player::X);
//! let result = searcher.search(&board, 2, LOSS, WIN, true);
//! assert!(result.best_move.is_some());
//! ```

use std::time::{Duration, Instant};

use crate::board::{Board, Player};
use crate::config::SearchParams;
use crate::eval::{evaluate, Score, SequenceCounts, DRAW, LOSS, WIN};

use super::MoveGenerator;

/// Best move and value of one search node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Move leading to `value`; `None` at terminal and leaf nodes
    pub best_move: Option<usize>,
    /// Node value from the search perspective
    pub value: Score,
}

/// Search counters for diagnostics. They never influence the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited, root included
    pub nodes: u64,
    /// Nodes scored statically because depth ran out
    pub leaves: u64,
    /// Nodes that stopped early on `alpha >= beta`
    pub cutoffs: u64,
    /// Deepest ply reached below the root
    pub max_ply: u8,
    /// Root candidates fully searched
    pub root_moves: usize,
    /// The time budget cut the root short
    pub timed_out: bool,
}

/// Alpha-beta searcher for one move decision.
///
/// Every call explores cloned boards only; the caller's board is never
/// touched. Counters accumulate across calls until [`Searcher::reset_stats`].
pub struct Searcher<'a> {
    params: &'a SearchParams,
    perspective: Player,
    prune: bool,
    time_budget: Option<Duration>,
    start_time: Instant,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    /// Searcher maximizing for `perspective`
    #[must_use]
    pub fn new(params: &'a SearchParams, perspective: Player) -> Self {
        Self {
            params,
            perspective,
            prune: true,
            time_budget: params.time_budget(),
            start_time: Instant::now(),
            stats: SearchStats::default(),
        }
    }

    /// Disable pruning: every node is searched with the full window.
    #[must_use]
    pub fn without_pruning(mut self) -> Self {
        self.prune = false;
        self
    }

    /// Override the root time budget from the parameters.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    #[inline]
    pub fn perspective(&self) -> Player {
        self.perspective
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Search `board` to `depth` plies.
    ///
    /// `maximizing` says whether the side to move is the searching player.
    /// Counts are computed once for the root; children reuse the counts
    /// and scores produced by the move generator.
    pub fn search(
        &mut self,
        board: &Board,
        depth: u8,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> SearchResult {
        let counts = SequenceCounts::count(board);
        self.search_counted(board, &counts, depth, alpha, beta, maximizing)
    }

    /// [`search`](Self::search) with the root's counts supplied by the caller.
    pub fn search_counted(
        &mut self,
        board: &Board,
        counts: &SequenceCounts,
        depth: u8,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> SearchResult {
        self.start_time = Instant::now();
        let score = evaluate(counts, self.perspective, &self.params.weights);
        self.alpha_beta(board, counts, score, depth, alpha, beta, maximizing, 0)
    }

    /// Check the root budget. Zero budgets expire immediately.
    #[inline]
    fn out_of_time(&self) -> bool {
        self.time_budget
            .is_some_and(|limit| self.start_time.elapsed() >= limit)
    }

    /// Recursive alpha-beta over generator output.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &Board,
        counts: &SequenceCounts,
        score: Score,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
        ply: u8,
    ) -> SearchResult {
        self.stats.nodes += 1;
        self.stats.max_ply = self.stats.max_ply.max(ply);

        // A finished game scores as its sentinel, whatever depth is left
        if counts.winner().is_some() {
            return SearchResult { best_move: None, value: score };
        }

        if depth == 0 {
            self.stats.leaves += 1;
            return SearchResult { best_move: None, value: score };
        }

        let mover = if maximizing {
            self.perspective
        } else {
            self.perspective.opponent()
        };
        let generator = MoveGenerator::new(self.params, self.perspective);
        let mut moves = generator.generate(board, counts, mover);

        // The root must offer a move whenever a cell is free, even if the
        // proximity filter rejected them all
        if moves.is_empty() && ply == 0 && !board.is_full() {
            moves = generator.generate_unfiltered(board, counts, mover);
        }

        if moves.is_empty() {
            return SearchResult { best_move: None, value: DRAW };
        }

        let mut best_move = None;
        let mut best = if maximizing { LOSS } else { WIN };

        for child in &moves {
            if ply == 0 && self.out_of_time() {
                self.stats.timed_out = true;
                log::warn!(
                    "time budget exhausted after {} of {} root moves",
                    self.stats.root_moves,
                    moves.len()
                );
                break;
            }

            let (a, b) = if self.prune { (alpha, beta) } else { (LOSS, WIN) };
            let result = self.alpha_beta(
                &child.board,
                &child.counts,
                child.score,
                depth - 1,
                a,
                b,
                !maximizing,
                ply + 1,
            );

            if ply == 0 {
                self.stats.root_moves += 1;
                log::trace!("root move {} -> {}", child.index, result.value);
            }

            // Ties go to the later move
            if maximizing {
                if result.value >= best {
                    best = result.value;
                    best_move = Some(child.index);
                }
                alpha = alpha.max(best);
            } else {
                if result.value <= best {
                    best = result.value;
                    best_move = Some(child.index);
                }
                beta = beta.min(best);
            }

            if self.prune && alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        match best_move {
            Some(_) => SearchResult { best_move, value: best },
            // Budget ran out before any root move was searched
            None => SearchResult {
                best_move: Some(moves[0].index),
                value: moves[0].score,
            },
        }
    }
}
