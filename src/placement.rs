//! Candidate positions for a single piece.
//!
//! Candidates are linear cell indices scanned in row-major order. The scan
//! can restart from any index, which is how the solver resumes a step after
//! backtracking into it.

use crate::grid::{idx_to_cell, Grid};
use crate::pieces::Piece;

/// A top-left placement position on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    /// Linear row-major cell index.
    pub index: usize,
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn from_index(index: usize, cols: usize) -> Self {
        let (row, col) = idx_to_cell(cols, index);
        Self { index, row, col }
    }
}

/// Lazily yields every candidate position from `start` to the last cell.
pub fn candidates(grid: &Grid, start: usize) -> impl Iterator<Item = Position> {
    let cols = grid.cols();
    (start..grid.len()).map(move |index| Position::from_index(index, cols))
}

/// Finds the first candidate at or after `start` where `piece` fits.
#[inline]
pub fn next_fit(grid: &Grid, piece: &Piece, start: usize) -> Option<Position> {
    candidates(grid, start).find(|position| grid.fits(piece, position.row, position.col))
}
