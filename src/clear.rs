//! Line-clear evaluation.
//!
//! After every placement, rows and columns that are completely occupied are
//! emptied. Each full row and each full column scores one clear, even when
//! they share cells. Optionally the board is also divided into equal chunks,
//! and every fully occupied chunk scores one clear and is emptied too.

use std::str::FromStr;

use thiserror::Error;

use crate::grid::{cell_to_idx, Grid};

/// Errors for chunk sizes that cannot tile a board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk dimensions must be positive, got {rows}x{cols}")]
    Empty { rows: usize, cols: usize },
    #[error("{chunk_rows}x{chunk_cols} chunks do not distribute over a {rows}x{cols} grid evenly")]
    Uneven {
        chunk_rows: usize,
        chunk_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("expected a chunk size like '3x3', got '{0}'")]
    Format(String),
}

/// Size of a clearable sub-grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Chunk {
    rows: usize,
    cols: usize,
}

impl Chunk {
    pub fn new(rows: usize, cols: usize) -> Result<Self, ChunkError> {
        if rows == 0 || cols == 0 {
            return Err(ChunkError::Empty { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Checks that chunks of this size tile `grid` exactly.
    pub fn validate_for(&self, grid: &Grid) -> Result<(), ChunkError> {
        if grid.rows() % self.rows != 0 || grid.cols() % self.cols != 0 {
            return Err(ChunkError::Uneven {
                chunk_rows: self.rows,
                chunk_cols: self.cols,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        Ok(())
    }
}

impl FromStr for Chunk {
    type Err = ChunkError;

    /// Parses `<rows>x<cols>`, e.g. `3x3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || ChunkError::Format(s.to_string());
        let (rows, cols) = s
            .split_once(|c: char| c.eq_ignore_ascii_case(&'x'))
            .ok_or_else(format_error)?;
        let rows = rows.trim().parse().map_err(|_| format_error())?;
        let cols = cols.trim().parse().map_err(|_| format_error())?;
        Chunk::new(rows, cols)
    }
}

/// Detects and empties full lines, keeping scratch buffers between calls.
#[derive(Clone, Debug)]
pub struct LineClearer {
    row_full: Vec<bool>,
    col_full: Vec<bool>,
    chunk: Option<Chunk>,
}

impl LineClearer {
    pub fn new(rows: usize, cols: usize, chunk: Option<Chunk>) -> Self {
        Self {
            row_full: vec![false; rows],
            col_full: vec![false; cols],
            chunk,
        }
    }

    /// Clears every full row, full column and (if configured) full chunk of
    /// a post-placement grid, returning the number of clears scored.
    ///
    /// Row and column fullness is decided before anything is emptied.
    pub fn clear(&mut self, grid: &mut Grid) -> usize {
        let (rows, cols) = (grid.rows(), grid.cols());
        debug_assert_eq!((rows, cols), (self.row_full.len(), self.col_full.len()));

        let cells = grid.cells();
        for (row, full) in self.row_full.iter_mut().enumerate() {
            *full = cells[row * cols..(row + 1) * cols].iter().all(|&c| c);
        }
        for (col, full) in self.col_full.iter_mut().enumerate() {
            *full = (0..rows).all(|row| cells[cell_to_idx(cols, row, col)]);
        }

        let mut cleared = match self.chunk {
            Some(chunk) => clear_chunks(grid, chunk),
            None => 0,
        };

        let full_rows = self.row_full.iter().filter(|&&full| full).count();
        let full_cols = self.col_full.iter().filter(|&&full| full).count();
        if full_rows + full_cols == 0 {
            return cleared;
        }
        cleared += full_rows + full_cols;

        let cells = grid.cells_mut();
        for (row, &row_full) in self.row_full.iter().enumerate() {
            for (col, &col_full) in self.col_full.iter().enumerate() {
                if row_full || col_full {
                    cells[cell_to_idx(cols, row, col)] = false;
                }
            }
        }

        cleared
    }
}

/// Empties every fully occupied chunk, returning how many there were.
fn clear_chunks(grid: &mut Grid, chunk: Chunk) -> usize {
    let cols = grid.cols();
    let mut cleared = 0;

    for top in (0..grid.rows() / chunk.rows).map(|i| i * chunk.rows) {
        for left in (0..cols / chunk.cols).map(|j| j * chunk.cols) {
            let tile = || {
                (top..top + chunk.rows)
                    .flat_map(move |row| (left..left + chunk.cols).map(move |col| (row, col)))
            };
            if tile().all(|(row, col)| grid.is_occupied(row, col)) {
                cleared += 1;
                for (row, col) in tile() {
                    grid.set(row, col, false);
                }
            }
        }
    }

    cleared
}

/// Clears full rows and columns of `grid`, returning the number cleared.
pub fn clear_lines(grid: &mut Grid) -> usize {
    LineClearer::new(grid.rows(), grid.cols(), None).clear(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_full_lines_leaves_grid_untouched() {
        let mut grid = Grid::from_layout(3, 3, &["##.", "#..", "..."]);
        let before = grid.clone();
        assert_eq!(clear_lines(&mut grid), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_full_row_and_column_both_score() {
        let mut grid = Grid::from_layout(3, 3, &["###", "#..", "#.#"]);
        assert_eq!(clear_lines(&mut grid), 2);
        assert_eq!(grid.to_string(), "...\n...\n..#\n");
    }

    #[test]
    fn test_full_board_scores_every_line() {
        let mut grid = Grid::from_layout(2, 3, &["###", "###"]);
        assert_eq!(clear_lines(&mut grid), 5);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_single_row_board_counts_columns() {
        let mut grid = Grid::from_layout(1, 3, &["###"]);
        assert_eq!(clear_lines(&mut grid), 4);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_chunks_clear_and_score() {
        let mut clearer = LineClearer::new(4, 4, Some(Chunk::new(2, 2).unwrap()));
        let mut grid = Grid::from_layout(4, 4, &["##..", "##..", "..##", "...#"]);
        assert_eq!(clearer.clear(&mut grid), 1);
        assert_eq!(grid.to_string(), "....\n....\n..##\n...#\n");
    }

    #[test]
    fn test_lines_are_judged_before_chunks_are_emptied() {
        let mut clearer = LineClearer::new(2, 4, Some(Chunk::new(2, 2).unwrap()));
        let mut grid = Grid::from_layout(2, 4, &["####", "##.."]);
        // chunk (0,0) and row 0 and columns 0 and 1
        assert_eq!(clearer.clear(&mut grid), 4);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_parse_chunk() {
        assert_eq!("3x3".parse::<Chunk>(), Chunk::new(3, 3));
        assert_eq!("2X4".parse::<Chunk>(), Chunk::new(2, 4));
        assert_eq!(
            "0x3".parse::<Chunk>(),
            Err(ChunkError::Empty { rows: 0, cols: 3 })
        );
        assert!(matches!("3".parse::<Chunk>(), Err(ChunkError::Format(_))));
        assert!(matches!("ax3".parse::<Chunk>(), Err(ChunkError::Format(_))));
    }

    #[test]
    fn test_chunk_must_tile_grid() {
        let chunk = Chunk::new(3, 3).unwrap();
        assert!(chunk.validate_for(&Grid::new(9, 9)).is_ok());
        assert!(matches!(
            chunk.validate_for(&Grid::new(8, 9)),
            Err(ChunkError::Uneven { .. })
        ));
    }
}
