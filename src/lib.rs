//! Block Blast Solver Library
//!
//! Places a set of fixed-shape pieces on a partially filled board, trying
//! every piece order and every position, and keeps the complete placement
//! that clears the most rows and columns.

pub mod best;
pub mod clear;
pub mod grid;
pub mod parse;
pub mod permutation;
pub mod pieces;
pub mod placement;
pub mod solver;

pub use best::Solution;
pub use solver::{solve, Search, SearchOptions, SearchReport, SearchStats};
