//! Piece shapes.
//!
//! A piece is a rectangular boolean shape placed by its top-left corner,
//! never rotated or reflected. The filled cells are cached as offsets from
//! the top-left corner so the solver's hot loop only touches filled cells.

use std::fmt;

use crate::grid::Grid;

/// Offset of a filled shape cell from the piece's top-left corner.
pub type Offset = (usize, usize);

/// An immutable piece shape.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    shape: Grid,
    /// Offsets of every filled cell, row-major.
    filled: Vec<Offset>,
    /// One past the last filled row and column.
    span: (usize, usize),
}

impl Piece {
    /// Builds a piece from its shape matrix.
    pub fn new(shape: Grid) -> Self {
        let cols = shape.cols();
        let filled: Vec<Offset> = shape
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &occupied)| occupied)
            .map(|(idx, _)| (idx / cols, idx % cols))
            .collect();

        let span = filled
            .iter()
            .fold((0, 0), |(rows, cols), &(r, c)| (rows.max(r + 1), cols.max(c + 1)));

        Self {
            shape,
            filled,
            span,
        }
    }

    /// Builds a piece from layout lines, see [`Grid::from_layout`].
    pub fn from_layout<S: AsRef<str>>(rows: usize, cols: usize, lines: &[S]) -> Self {
        Self::new(Grid::from_layout(rows, cols, lines))
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    /// The boolean shape matrix.
    pub fn shape(&self) -> &Grid {
        &self.shape
    }

    /// Offsets of the filled cells.
    #[inline]
    pub fn filled(&self) -> &[Offset] {
        &self.filled
    }

    /// Rows and columns actually covered by filled cells.
    ///
    /// Trailing empty rows or columns of the shape are not part of the span,
    /// so they never push a placement out of bounds.
    #[inline]
    pub fn span(&self) -> (usize, usize) {
        self.span
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.shape, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_offsets_are_row_major() {
        let piece = Piece::from_layout(2, 3, &["#.#", ".#."]);
        assert_eq!(piece.filled(), &[(0, 0), (0, 2), (1, 1)]);
        assert_eq!(piece.span(), (2, 3));
    }

    #[test]
    fn test_span_ignores_trailing_empty_cells() {
        let piece = Piece::from_layout(3, 3, &["##", "#"]);
        assert_eq!((piece.rows(), piece.cols()), (3, 3));
        assert_eq!(piece.span(), (2, 2));
    }

    #[test]
    fn test_display_matches_shape() {
        let piece = Piece::from_layout(2, 2, &["#.", "##"]);
        assert_eq!(piece.to_string(), "#.\n##\n");
    }
}
