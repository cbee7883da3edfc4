//! Text input for puzzles.
//!
//! The input is a stream of whitespace-separated tokens:
//!
//! ```text
//! <rows> <cols> <piece count>
//! <board row> x rows
//! <piece rows> <piece cols>      repeated per piece,
//! <piece row> x piece rows       followed by its layout
//! ```
//!
//! In layout rows `.` is an empty cell and any other character a filled
//! one. Short rows leave the remaining cells empty, long rows are truncated.

use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::pieces::Piece;

/// Errors from reading a puzzle description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEnd(String),
    #[error("expected a number for {what}, got '{token}'")]
    InvalidNumber { what: String, token: String },
    #[error("grid dimensions and piece count must be positive, got {rows}x{cols} with {pieces} pieces")]
    EmptyPuzzle {
        rows: usize,
        cols: usize,
        pieces: usize,
    },
    #[error("piece {piece} has invalid dimensions {rows}x{cols}")]
    EmptyPiece {
        piece: usize,
        rows: usize,
        cols: usize,
    },
}

/// A board and the pieces to place on it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Puzzle {
    pub board: Grid,
    pub pieces: Vec<Piece>,
}

impl Puzzle {
    /// The piece indices in input order.
    pub fn identity_order(&self) -> Vec<usize> {
        (0..self.pieces.len()).collect()
    }
}

/// Token cursor that names what it was reading when input runs out.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_whitespace(),
        }
    }

    fn next(&mut self, what: impl FnOnce() -> String) -> Result<&'a str, ParseError> {
        self.inner
            .next()
            .ok_or_else(|| ParseError::UnexpectedEnd(what()))
    }

    fn number(&mut self, what: impl Fn() -> String) -> Result<usize, ParseError> {
        let token = self.next(&what)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            what: what(),
            token: token.to_string(),
        })
    }

    fn layout(
        &mut self,
        rows: usize,
        what: impl Fn(usize) -> String,
    ) -> Result<Vec<&'a str>, ParseError> {
        (0..rows).map(|row| self.next(|| what(row + 1))).collect()
    }
}

impl FromStr for Puzzle {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(input);

        let rows = tokens.number(|| "grid rows".to_string())?;
        let cols = tokens.number(|| "grid columns".to_string())?;
        let count = tokens.number(|| "piece count".to_string())?;
        if rows == 0 || cols == 0 || count == 0 {
            return Err(ParseError::EmptyPuzzle {
                rows,
                cols,
                pieces: count,
            });
        }
        debug!(rows, cols, pieces = count, "parsed header");

        let lines = tokens.layout(rows, |row| format!("grid row {row}"))?;
        let board = Grid::from_layout(rows, cols, &lines);

        let mut pieces = Vec::with_capacity(count);
        for piece in 1..=count {
            let piece_rows = tokens.number(|| format!("piece {piece} rows"))?;
            let piece_cols = tokens.number(|| format!("piece {piece} columns"))?;
            if piece_rows == 0 || piece_cols == 0 {
                return Err(ParseError::EmptyPiece {
                    piece,
                    rows: piece_rows,
                    cols: piece_cols,
                });
            }
            if piece_rows > rows || piece_cols > cols {
                warn!(piece, piece_rows, piece_cols, "piece is larger than the grid");
            }

            let lines = tokens.layout(piece_rows, |row| format!("piece {piece} row {row}"))?;
            pieces.push(Piece::from_layout(piece_rows, piece_cols, &lines));
        }

        Ok(Puzzle { board, pieces })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
3 4 2
.#..
....
#..#
3 1
#
#
#
2 2
##
#.
";

    #[test]
    fn test_parse_sample() {
        let puzzle: Puzzle = SAMPLE.parse().unwrap();
        assert_eq!(puzzle.board.to_string(), ".#..\n....\n#..#\n");
        assert_eq!(puzzle.pieces.len(), 2);
        assert_eq!(puzzle.pieces[0].to_string(), "#\n#\n#\n");
        assert_eq!(puzzle.pieces[1].to_string(), "##\n#.\n");
        assert_eq!(puzzle.identity_order(), vec![0, 1]);
    }

    #[test]
    fn test_tokens_may_share_lines() {
        let puzzle: Puzzle = "1 3 1 #.# 1 1 x".parse().unwrap();
        assert_eq!(puzzle.board.to_string(), "#.#\n");
        assert_eq!(puzzle.pieces[0].to_string(), "#\n");
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        assert_eq!(
            "0 3 1".parse::<Puzzle>(),
            Err(ParseError::EmptyPuzzle {
                rows: 0,
                cols: 3,
                pieces: 1
            })
        );
        assert_eq!(
            "1 1 1 . 0 2".parse::<Puzzle>(),
            Err(ParseError::EmptyPiece {
                piece: 1,
                rows: 0,
                cols: 2
            })
        );
    }

    #[test]
    fn test_non_numeric_dimension() {
        assert_eq!(
            "2 x 1".parse::<Puzzle>(),
            Err(ParseError::InvalidNumber {
                what: "grid columns".to_string(),
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn test_truncated_input_names_missing_part() {
        assert_eq!(
            "2 2 1 .. ..  1 1".parse::<Puzzle>(),
            Err(ParseError::UnexpectedEnd("piece 1 row 1".to_string()))
        );
        assert_eq!(
            "2 2 1 ..".parse::<Puzzle>(),
            Err(ParseError::UnexpectedEnd("grid row 2".to_string()))
        );
    }

    #[test]
    fn test_oversized_piece_is_accepted() {
        let puzzle: Puzzle = "1 1 1 . 2 2 ## ##".parse().unwrap();
        assert_eq!(puzzle.pieces[0].span(), (2, 2));
    }
}
