//! Live sequence counting over K-long windows
//!
//! Every K-long window in the four line directions is inspected. A window
//! holding marks of only one player is "live" for that player and is
//! tallied under the number of marks it holds. Windows holding both
//! players' marks are dead and count for nothing.
//!
//! Counts overlap on purpose: a lone mark in the middle of a 3x3 board
//! with K=3 sits in four live windows and contributes 4 to slot 1.

use crate::board::{Board, Cell, Player, DIRECTIONS};

/// Per-player live window histograms.
///
/// Slot 0 of each histogram holds the number of empty cells (the same value
/// for both players). Slot `i` in `1..=K` holds the number of live windows
/// containing exactly `i` of that player's marks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceCounts {
    x: Vec<u32>,
    o: Vec<u32>,
}

impl SequenceCounts {
    /// Count all live windows on `board` from scratch.
    #[must_use]
    pub fn count(board: &Board) -> Self {
        let mut counts = Self {
            x: Vec::with_capacity(board.win_length() + 1),
            o: Vec::with_capacity(board.win_length() + 1),
        };
        counts.count_into(board);
        counts
    }

    /// Recount `board` into this value, reusing its buffers.
    pub fn count_into(&mut self, board: &Board) {
        let k = board.win_length();
        self.x.clear();
        self.x.resize(k + 1, 0);
        self.o.clear();
        self.o.resize(k + 1, 0);

        let empty = board.empty_count() as u32;
        self.x[0] = empty;
        self.o[0] = empty;

        for &(dr, dc) in &DIRECTIONS {
            for row in 0..board.height() {
                for col in 0..board.width() {
                    if !board.window_fits(row, col, dr, dc) {
                        continue;
                    }
                    let (x, o) = tally(board, row, col, dr, dc);
                    self.add(x, o);
                }
            }
        }
    }

    /// Update the counts for `player` placing a mark at `index` on `before`.
    ///
    /// Only the (at most `4 * K`) windows covering `index` are re-tallied.
    /// `before` is the board *prior* to the placement and the target cell
    /// must be empty on it. The result equals a full recount of the board
    /// after the placement.
    pub fn place(&mut self, before: &Board, index: usize, player: Player) {
        debug_assert_eq!(before.get(index), Some(Cell::Empty));
        let k = before.win_length();
        let (row, col) = before.coords(index);

        for &(dr, dc) in &DIRECTIONS {
            for back in 0..k as isize {
                // Walking backwards only moves further off the board once it leaves it
                let Some((sr, sc)) = before.offset(row, col, -dr * back, -dc * back) else {
                    break;
                };
                if !before.window_fits(sr, sc, dr, dc) {
                    continue;
                }
                let (x, o) = tally(before, sr, sc, dr, dc);
                self.remove(x, o);
                match player {
                    Player::X => self.add(x + 1, o),
                    Player::O => self.add(x, o + 1),
                }
            }
        }

        self.x[0] -= 1;
        self.o[0] -= 1;
    }

    /// Histogram for one player, indexed `0..=K`
    #[inline]
    pub fn histogram(&self, player: Player) -> &[u32] {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    /// Empty cells on the counted board
    #[inline]
    pub fn empty(&self) -> u32 {
        self.x[0]
    }

    /// Run length these counts were taken for
    #[inline]
    pub fn win_length(&self) -> usize {
        self.x.len() - 1
    }

    /// True when `player` owns at least one complete window
    #[inline]
    pub fn has_won(&self, player: Player) -> bool {
        self.histogram(player)[self.win_length()] > 0
    }

    /// The winner, checking X before O.
    ///
    /// A board where both players own a full window is only reachable by
    /// external mutation; X is reported in that case.
    #[inline]
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Overwrite these counts with `other`, reusing the existing buffers.
    #[inline]
    pub fn copy_from(&mut self, other: &SequenceCounts) {
        self.x.clone_from(&other.x);
        self.o.clone_from(&other.o);
    }

    /// The same counts with the players' histograms exchanged
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            x: self.o.clone(),
            o: self.x.clone(),
        }
    }

    #[inline]
    fn add(&mut self, x: usize, o: usize) {
        if o == 0 && x > 0 {
            self.x[x] += 1;
        } else if x == 0 && o > 0 {
            self.o[o] += 1;
        }
    }

    #[inline]
    fn remove(&mut self, x: usize, o: usize) {
        if o == 0 && x > 0 {
            self.x[x] -= 1;
        } else if x == 0 && o > 0 {
            self.o[o] -= 1;
        }
    }
}

/// Count X and O marks in the window starting at (row, col).
/// The caller has checked that the window fits.
#[inline]
fn tally(board: &Board, row: usize, col: usize, dr: isize, dc: isize) -> (usize, usize) {
    let (mut x, mut o) = (0, 0);
    let (mut r, mut c) = (row as isize, col as isize);
    for _ in 0..board.win_length() {
        match board.at(r as usize, c as usize) {
            Cell::X => x += 1,
            Cell::O => o += 1,
            Cell::Empty => {}
        }
        r += dr;
        c += dc;
    }
    (x, o)
}
