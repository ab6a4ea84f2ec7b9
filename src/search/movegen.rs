//! Candidate move generation with proximity filtering and ordering

use crate::board::{Board, Player};
use crate::config::{Offset, SearchParams};
use crate::eval::{evaluate, Score, SequenceCounts};

/// One child position produced by the generator.
///
/// Lives for a single expansion: the searcher recurses into it and drops it.
#[derive(Debug, Clone)]
pub struct MoveCandidate {
    /// Cell the mark was placed on
    pub index: usize,
    /// Board after the placement
    pub board: Board,
    /// Live window counts of `board`
    pub counts: SequenceCounts,
    /// Static score of `board` from the search perspective
    pub score: Score,
    /// Side to move at this child
    pub to_move: Player,
}

impl MoveCandidate {
    /// True when the placement completed a K-long run
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.counts.winner().is_some()
    }
}

/// Generates ordered, truncated candidate lists.
///
/// All scores are taken from one fixed `perspective` (the searching side),
/// so the maximizer wants them descending and the minimizer ascending.
#[derive(Debug, Clone, Copy)]
pub struct MoveGenerator<'a> {
    weights: &'a [f64],
    proximity: &'a [Offset],
    branch_limit: usize,
    perspective: Player,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(params: &'a SearchParams, perspective: Player) -> Self {
        Self {
            weights: &params.weights,
            proximity: &params.proximity,
            branch_limit: params.branch_limit,
            perspective,
        }
    }

    /// Candidates for `mover` on `board`, best first for `mover`, at most
    /// `branch_limit` long. `counts` must be the counts of `board`.
    pub fn generate(&self, board: &Board, counts: &SequenceCounts, mover: Player) -> Vec<MoveCandidate> {
        let open_board = board.is_empty();
        let cells = board
            .empty_indices()
            .filter(|&index| open_board || self.near_action(board, index));
        self.expand(board, counts, mover, cells)
    }

    /// Like [`generate`](Self::generate) but with the proximity filter off.
    pub fn generate_unfiltered(
        &self,
        board: &Board,
        counts: &SequenceCounts,
        mover: Player,
    ) -> Vec<MoveCandidate> {
        self.expand(board, counts, mover, board.empty_indices())
    }

    /// True when a mark sits at one of the proximity offsets from `index`
    pub fn near_action(&self, board: &Board, index: usize) -> bool {
        let (row, col) = board.coords(index);
        self.proximity.iter().any(|&(dx, dy)| {
            board
                .offset(row, col, dy, dx)
                .is_some_and(|(r, c)| !board.at(r, c).is_empty())
        })
    }

    fn expand(
        &self,
        board: &Board,
        counts: &SequenceCounts,
        mover: Player,
        cells: impl Iterator<Item = usize>,
    ) -> Vec<MoveCandidate> {
        // Score every survivor in one scratch buffer; only the kept ones
        // get their own counts and board
        let mut scratch = counts.clone();
        let mut scored: Vec<(usize, Score)> = cells
            .map(|index| {
                scratch.copy_from(counts);
                scratch.place(board, index, mover);
                (index, evaluate(&scratch, self.perspective, self.weights))
            })
            .collect();

        // Stable sort: equal scores keep board order
        if mover == self.perspective {
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        } else {
            scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        scored.truncate(self.branch_limit);

        scored
            .into_iter()
            .map(|(index, score)| {
                let mut child_counts = counts.clone();
                child_counts.place(board, index, mover);
                let mut child = board.clone();
                child.place_unchecked(index, mover);
                MoveCandidate {
                    index,
                    board: child,
                    counts: child_counts,
                    score,
                    to_move: mover.opponent(),
                }
            })
            .collect()
    }
}
