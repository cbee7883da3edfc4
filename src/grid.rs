//! Board occupancy and report formatting.
//!
//! The grid is a flat row-major vector where each cell is `true` when
//! occupied. Linear cell indices are `row * cols + col`, the same order the
//! placement search scans candidates in.

use std::fmt;

use crate::best::Solution;
use crate::pieces::Piece;

/// Converts a (row, col) pair to a linear cell index.
#[inline(always)]
pub const fn cell_to_idx(cols: usize, row: usize, col: usize) -> usize {
    row * cols + col
}

/// Converts a linear cell index to a (row, col) pair.
#[inline(always)]
pub const fn idx_to_cell(cols: usize, cell_index: usize) -> (usize, usize) {
    (cell_index / cols, cell_index % cols)
}

/// Dense occupancy of a rectangular board.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Builds a grid from layout lines.
    ///
    /// `.` is an empty cell and any other character a filled one. Lines
    /// shorter than `cols` leave the remaining cells empty, longer lines are
    /// truncated, and missing lines are empty rows.
    pub fn from_layout<S: AsRef<str>>(rows: usize, cols: usize, lines: &[S]) -> Self {
        let mut grid = Self::new(rows, cols);
        for (row, line) in lines.iter().take(rows).enumerate() {
            for (col, ch) in line.as_ref().chars().take(cols).enumerate() {
                grid.cells[cell_to_idx(cols, row, col)] = ch != '.';
            }
        }
        grid
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells on the board.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major occupancy.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[cell_to_idx(self.cols, row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        self.cells[cell_to_idx(self.cols, row, col)] = occupied;
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }

    /// Checks whether `piece` can be placed with its top-left corner at
    /// `(row, col)`: every filled cell must be on the board and empty.
    #[inline]
    pub fn fits(&self, piece: &Piece, row: usize, col: usize) -> bool {
        let (span_rows, span_cols) = piece.span();
        if row + span_rows > self.rows || col + span_cols > self.cols {
            return false;
        }

        piece
            .filled()
            .iter()
            .all(|&(dr, dc)| !self.cells[cell_to_idx(self.cols, row + dr, col + dc)])
    }

    /// Returns a copy of this grid with `piece` placed at `(row, col)`.
    ///
    /// Only meaningful after [`Grid::fits`] returned true for the same spot.
    pub fn apply(&self, piece: &Piece, row: usize, col: usize) -> Grid {
        let mut next = Grid::new(self.rows, self.cols);
        self.apply_into(piece, row, col, &mut next);
        next
    }

    /// Writes this grid with `piece` placed at `(row, col)` into `next`,
    /// reusing its allocation.
    #[inline]
    pub fn apply_into(&self, piece: &Piece, row: usize, col: usize, next: &mut Grid) {
        debug_assert_eq!((self.rows, self.cols), (next.rows, next.cols));
        next.cells.copy_from_slice(&self.cells);
        for &(dr, dc) in piece.filled() {
            next.cells[cell_to_idx(self.cols, row + dr, col + dc)] = true;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            for &occupied in row {
                f.write_str(if occupied { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Formats the outcome of a search as a human-readable report.
///
/// A solution lists the initial grid followed by every placement in order,
/// with the grid after that placement's clears. Without a solution only the
/// input grid is shown.
pub fn format_report(board: &Grid, solution: Option<&Solution>) -> String {
    let mut output = String::new();

    let Some(solution) = solution else {
        output.push_str("Unsolvable!\nGrid:\n");
        output.push_str(&board.to_string());
        return output;
    };

    output.push_str(&format!(
        "Solution found ({} lines cleared):\n",
        solution.total
    ));
    output.push_str("Initial grid:\n");
    output.push_str(&board.to_string());

    let steps = solution
        .order
        .iter()
        .zip(&solution.positions)
        .zip(solution.snapshots.iter().skip(1).zip(&solution.cleared));
    for ((&piece_index, position), (grid, &cleared)) in steps {
        output.push_str(&format!(
            "Piece {}: {} {}\n",
            piece_index + 1,
            position.row,
            position.col
        ));
        output.push_str(&grid.to_string());
        if cleared > 0 {
            output.push_str(&format!("({} lines cleared)\n", cleared));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        for idx in 0..12 {
            let (row, col) = idx_to_cell(4, idx);
            assert!(row < 3 && col < 4, "idx_to_cell(4, {idx}) out of range");
            assert_eq!(cell_to_idx(4, row, col), idx, "Roundtrip failed for index {idx}");
        }
    }

    #[test]
    fn test_layout_pads_and_truncates() {
        let grid = Grid::from_layout(3, 3, &["#", "####", "x.y"]);
        assert_eq!(grid.to_string(), "#..\n###\n#.#\n");
        assert_eq!(grid.occupied_count(), 6);
    }

    #[test]
    fn test_fits_rejects_out_of_bounds() {
        let grid = Grid::new(2, 2);
        let piece = Piece::from_layout(3, 3, &["###", "###", "###"]);
        assert!(!grid.fits(&piece, 0, 0));

        let bar = Piece::from_layout(1, 2, &["##"]);
        assert!(grid.fits(&bar, 1, 0));
        assert!(!grid.fits(&bar, 1, 1));
    }

    #[test]
    fn test_fits_rejects_overlap_only_on_filled_cells() {
        let grid = Grid::from_layout(2, 2, &["#.", ".."]);
        let hook = Piece::from_layout(2, 2, &[".#", "##"]);
        assert!(grid.fits(&hook, 0, 0), "Empty shape cell may cover an occupied cell");

        let block = Piece::from_layout(2, 2, &["##", "##"]);
        assert!(!grid.fits(&block, 0, 0));
    }

    #[test]
    fn test_fits_uses_filled_span_for_bounds() {
        let grid = Grid::new(2, 2);
        let padded = Piece::from_layout(2, 3, &["#..", "..."]);
        assert!(grid.fits(&padded, 1, 1));
    }

    #[test]
    fn test_apply_marks_filled_cells() {
        let grid = Grid::from_layout(3, 3, &["...", ".#.", "..."]);
        let hook = Piece::from_layout(2, 2, &["#.", "##"]);
        assert!(!grid.fits(&hook, 0, 0));
        assert!(grid.fits(&hook, 1, 0));

        let next = grid.apply(&hook, 1, 0);
        assert_eq!(next.to_string(), "...\n##.\n##.\n");
        assert_eq!(grid.occupied_count(), 1, "Source grid must be untouched");
    }
}
