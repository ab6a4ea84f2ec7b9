//! Flat cell grid with m,n,k geometry

use std::fmt;

use super::{Cell, Player};
use crate::error::GameError;

/// Game board: `width * height` cells stored row-major, plus the run
/// length `win_length` (K) needed to win.
///
/// Marks are only ever added to empty cells; the only way to remove one
/// is [`Board::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    win_length: usize,
    cells: Vec<Cell>,
    /// Number of non-empty cells, kept so emptiness checks are O(1)
    marks: usize,
}

impl Board {
    /// Create an empty board.
    ///
    /// Fails with `InvalidConfiguration` for a zero-sized board, `K == 0`,
    /// or a `K` larger than both dimensions (no window could ever fit).
    pub fn new(width: usize, height: usize, win_length: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::config(format!(
                "board must have at least one cell, got {width}x{height}"
            )));
        }
        if win_length == 0 {
            return Err(GameError::config("win length must be at least 1"));
        }
        if win_length > width && win_length > height {
            return Err(GameError::config(format!(
                "win length {win_length} does not fit a {width}x{height} board"
            )));
        }
        Ok(Self {
            width,
            height,
            win_length,
            cells: vec![Cell::Empty; width * height],
            marks: 0,
        })
    }

    /// Build a board from explicit cell contents (row-major).
    pub fn from_cells(
        width: usize,
        height: usize,
        win_length: usize,
        cells: &[Cell],
    ) -> Result<Self, GameError> {
        let mut board = Self::new(width, height, win_length)?;
        if cells.len() != board.cells.len() {
            return Err(GameError::config(format!(
                "expected {} cells, got {}",
                board.cells.len(),
                cells.len()
            )));
        }
        board.cells.copy_from_slice(cells);
        board.marks = cells.iter().filter(|c| !c.is_empty()).count();
        Ok(board)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Marks in a row needed to win (K)
    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Total number of cells
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the cell at a linear index, `None` when out of range
    #[inline]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Get the cell at (row, col). Caller guarantees bounds.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> Cell {
        debug_assert!(row < self.height && col < self.width);
        self.cells[row * self.width + col]
    }

    /// Place a mark. Fails on an occupied or out-of-range cell.
    pub fn set(&mut self, index: usize, player: Player) -> Result<(), GameError> {
        let cells = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GameError::OutOfRange { index, cells })?;
        if !cell.is_empty() {
            return Err(GameError::OccupiedCell { index });
        }
        *cell = player.mark();
        self.marks += 1;
        Ok(())
    }

    /// Place a mark on a cell the caller knows to be empty and in range
    #[inline]
    pub(crate) fn place_unchecked(&mut self, index: usize, player: Player) {
        debug_assert_eq!(self.cells[index], Cell::Empty);
        self.cells[index] = player.mark();
        self.marks += 1;
    }

    /// Clear every cell, keeping the geometry
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
        self.marks = 0;
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.marks == self.cells.len()
    }

    /// True when no mark has been placed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.marks == 0
    }

    #[inline]
    pub fn mark_count(&self) -> usize {
        self.marks
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.marks
    }

    /// Indices of all empty cells in ascending order
    pub fn empty_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
    }

    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// (row, col) of a linear index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Offset (row, col) by a signed step, `None` if it leaves the board
    #[inline]
    pub fn offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < self.height && c < self.width).then_some((r, c))
    }

    /// True when a K-long window starting at (row, col) and stepping by
    /// (dr, dc) stays entirely on the board
    #[inline]
    pub fn window_fits(&self, row: usize, col: usize, dr: isize, dc: isize) -> bool {
        let span = (self.win_length - 1) as isize;
        self.offset(row, col, dr * span, dc * span).is_some()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
