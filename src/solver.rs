//! Exhaustive placement search over every piece order.
//!
//! For one fixed order, the search places pieces depth by depth, scanning
//! candidate positions row-major and backtracking when a piece has nowhere
//! left to go. Every complete placement is offered to a [`BestTracker`], and
//! the search keeps going to look for one that clears more lines. The outer
//! driver repeats this pass once for each of the `n!` orders.
//!
//! Key points:
//! - Explicit frame array indexed by depth instead of recursion
//! - One preallocated snapshot per depth, so undo is a depth decrement
//! - Snapshot buffers and the best result persist across passes

use tracing::{debug, info, instrument, trace};

use crate::best::{BestTracker, Solution};
use crate::clear::{Chunk, ChunkError, LineClearer};
use crate::grid::Grid;
use crate::permutation::PermutationAlgorithm;
use crate::pieces::Piece;
use crate::placement::{next_fit, Position};

/// Search configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SearchOptions {
    /// Also clear fully occupied chunks of this size.
    pub chunk: Option<Chunk>,
    /// Generator used to enumerate piece orders.
    pub permutations: PermutationAlgorithm,
}

/// Counters collected over one search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SearchStats {
    /// Backtracking passes run, one per piece order.
    pub passes: u64,
    /// Successful piece placements.
    pub placements: u64,
    /// Complete placements of every piece.
    pub complete: u64,
    /// Times the best solution was replaced.
    pub improvements: u64,
}

/// Outcome of a search.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SearchReport {
    /// The best complete placement, absent when no order fits every piece.
    pub solution: Option<Solution>,
    pub stats: SearchStats,
}

/// One frame of the placement search.
#[derive(Clone, Copy, Default, Debug)]
struct Step {
    /// Piece placed at this depth.
    piece: usize,
    /// Last candidate cell tried, row-major.
    cursor: usize,
    /// Clears scored by the current placement at this depth.
    cleared: usize,
}

#[derive(Clone, Copy, Debug)]
enum State {
    /// Looking for a position for the piece at this depth.
    Advancing(usize),
    /// Undoing the placement below this depth.
    Retreating(usize),
}

/// Search engine for one board and piece set.
pub struct Search<'a> {
    pieces: &'a [Piece],
    /// `history[k]` is the board after the first `k` placements.
    history: Vec<Grid>,
    steps: Vec<Step>,
    clearer: LineClearer,
    options: SearchOptions,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    /// Creates a search with default options.
    pub fn new(board: &Grid, pieces: &'a [Piece]) -> Self {
        Self::build(board, pieces, SearchOptions::default())
    }

    /// Creates a search with the given options.
    ///
    /// Fails when the chunk size does not tile the board.
    pub fn with_options(
        board: &Grid,
        pieces: &'a [Piece],
        options: SearchOptions,
    ) -> Result<Self, ChunkError> {
        if let Some(chunk) = options.chunk {
            chunk.validate_for(board)?;
        }
        Ok(Self::build(board, pieces, options))
    }

    fn build(board: &Grid, pieces: &'a [Piece], options: SearchOptions) -> Self {
        Self {
            pieces,
            history: vec![board.clone(); pieces.len() + 1],
            steps: vec![Step::default(); pieces.len()],
            clearer: LineClearer::new(board.rows(), board.cols(), options.chunk),
            options,
            stats: SearchStats::default(),
        }
    }

    /// Searches every ordering of `order` and returns the best complete
    /// placement found.
    ///
    /// `order` must be a permutation of the piece indices. It is used as
    /// scratch space and ends up in an unspecified ordering.
    #[instrument(skip_all, fields(pieces = self.pieces.len()))]
    pub fn run(&mut self, order: &mut [usize]) -> SearchReport {
        debug_assert_eq!(order.len(), self.pieces.len());

        self.stats = SearchStats::default();
        let mut best = BestTracker::new();
        let mut permutations = self.options.permutations.generator(order.len());
        debug!(
            algorithm = ?self.options.permutations,
            chunk = ?self.options.chunk,
            "starting search"
        );

        loop {
            self.stats.passes += 1;
            trace!(?order, "pass");
            self.run_pass(order, &mut best);
            if !permutations.advance(order) {
                break;
            }
        }

        info!(
            passes = self.stats.passes,
            placements = self.stats.placements,
            complete = self.stats.complete,
            best = ?best.best_total(),
            "search finished"
        );

        SearchReport {
            solution: best.into_result(),
            stats: self.stats,
        }
    }

    /// Runs a single pass under `order` only.
    pub fn best_for_order(&mut self, order: &[usize]) -> Option<Solution> {
        debug_assert_eq!(order.len(), self.pieces.len());

        let mut best = BestTracker::new();
        self.stats.passes += 1;
        self.run_pass(order, &mut best);
        best.into_result()
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Explores every placement under one fixed order.
    fn run_pass(&mut self, order: &[usize], best: &mut BestTracker) {
        let n = order.len();
        let cols = self.history[0].cols();

        for (step, &piece) in self.steps.iter_mut().zip(order) {
            *step = Step {
                piece,
                cursor: 0,
                cleared: 0,
            };
        }

        let mut total = 0;
        let mut state = State::Advancing(0);

        loop {
            state = match state {
                State::Advancing(depth) if depth == n => {
                    // every piece placed
                    self.stats.complete += 1;
                    if best.improves(total) {
                        let positions: Vec<Position> = self
                            .steps
                            .iter()
                            .map(|step| Position::from_index(step.cursor, cols))
                            .collect();
                        let cleared: Vec<usize> =
                            self.steps.iter().map(|step| step.cleared).collect();
                        if best.consider(order, &positions, &self.history, &cleared, total) {
                            self.stats.improvements += 1;
                            debug!(total, ?order, "new best");
                        }
                    }
                    State::Retreating(depth)
                }
                State::Advancing(depth) => {
                    let step = &mut self.steps[depth];
                    let piece = &self.pieces[step.piece];
                    let (placed, rest) = self.history.split_at_mut(depth + 1);
                    let current = &placed[depth];

                    match next_fit(current, piece, step.cursor) {
                        Some(position) => {
                            let next = &mut rest[0];
                            current.apply_into(piece, position.row, position.col, next);
                            step.cursor = position.index;
                            step.cleared = self.clearer.clear(next);
                            total += step.cleared;
                            self.stats.placements += 1;
                            State::Advancing(depth + 1)
                        }
                        None => {
                            step.cursor = 0;
                            State::Retreating(depth)
                        }
                    }
                }
                State::Retreating(0) => break,
                State::Retreating(depth) => {
                    let step = &mut self.steps[depth - 1];
                    total -= step.cleared;
                    step.cleared = 0;
                    step.cursor += 1;
                    State::Advancing(depth - 1)
                }
            };
        }
    }
}

/// Finds the complete placement of `pieces` on `board` that clears the most
/// lines, over every ordering of `order`.
///
/// Returns `None` when no ordering places every piece.
pub fn solve(board: &Grid, pieces: &[Piece], order: &mut [usize]) -> Option<Solution> {
    Search::new(board, pieces).run(order).solution
}
