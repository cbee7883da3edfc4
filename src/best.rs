//! Best-result tracking across every pass of a search.

use crate::grid::Grid;
use crate::placement::Position;

/// A complete placement of every piece.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Solution {
    /// Piece indices in the order they were placed.
    pub order: Vec<usize>,
    /// Top-left position of each placed piece, aligned with `order`.
    pub positions: Vec<Position>,
    /// Board snapshots: index 0 is the input board, index `k` the board
    /// after the first `k` placements and their clears.
    pub snapshots: Vec<Grid>,
    /// Clears scored by each placement, aligned with `order`.
    pub cleared: Vec<usize>,
    /// Sum of `cleared`.
    pub total: usize,
}

impl Solution {
    /// Number of placed pieces.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The board after every placement.
    pub fn final_grid(&self) -> Option<&Grid> {
        self.snapshots.last()
    }
}

/// Keeps the highest-scoring complete solution seen so far.
///
/// Ties keep the solution found first.
#[derive(Debug, Default)]
pub struct BestTracker {
    best: Option<Solution>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score of the stored solution, if any.
    #[inline]
    pub fn best_total(&self) -> Option<usize> {
        self.best.as_ref().map(|solution| solution.total)
    }

    /// Whether a solution scoring `total` would replace the stored one.
    #[inline]
    pub fn improves(&self, total: usize) -> bool {
        self.best_total().map_or(true, |best| total > best)
    }

    /// Stores the given solution if it improves on the current one.
    ///
    /// Returns true when the record was replaced.
    pub fn consider(
        &mut self,
        order: &[usize],
        positions: &[Position],
        history: &[Grid],
        cleared: &[usize],
        total: usize,
    ) -> bool {
        if !self.improves(total) {
            return false;
        }

        let solution = self.best.get_or_insert_with(Solution::default);
        solution.order.clear();
        solution.order.extend_from_slice(order);
        solution.positions.clear();
        solution.positions.extend_from_slice(positions);
        solution.cleared.clear();
        solution.cleared.extend_from_slice(cleared);
        // reuse the snapshot allocations when the shape matches
        if solution.snapshots.len() == history.len() {
            solution.snapshots.clone_from_slice(history);
        } else {
            solution.snapshots = history.to_vec();
        }
        solution.total = total;

        true
    }

    /// The stored solution, if any complete placement was seen.
    pub fn result(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    pub fn into_result(self) -> Option<Solution> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(tracker: &mut BestTracker, marker: usize, total: usize) -> bool {
        let history = [Grid::new(1, 1), Grid::new(1, 1)];
        let position = Position::from_index(0, 1);
        tracker.consider(&[marker], &[position], &history, &[total], total)
    }

    #[test]
    fn test_empty_tracker_has_no_result() {
        let tracker = BestTracker::new();
        assert_eq!(tracker.best_total(), None);
        assert!(tracker.result().is_none());
    }

    #[test]
    fn test_first_solution_is_kept_even_with_zero_clears() {
        let mut tracker = BestTracker::new();
        assert!(offer(&mut tracker, 7, 0));
        assert_eq!(tracker.best_total(), Some(0));
        assert_eq!(tracker.result().map(|s| s.order.clone()), Some(vec![7]));
    }

    #[test]
    fn test_only_strictly_better_replaces() {
        let mut tracker = BestTracker::new();
        assert!(offer(&mut tracker, 0, 2));
        assert!(!offer(&mut tracker, 1, 2), "Ties keep the earlier solution");
        assert!(!offer(&mut tracker, 2, 1));
        assert!(offer(&mut tracker, 3, 5));

        let solution = tracker.into_result().unwrap();
        assert_eq!(solution.order, vec![3]);
        assert_eq!(solution.total, 5);
        assert_eq!(solution.cleared, vec![5]);
        assert_eq!(solution.snapshots.len(), 2);
    }
}
