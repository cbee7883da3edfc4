//! In-place permutation generators for the piece order.
//!
//! A generator never owns the order. Each call to [`Permutations::advance`]
//! applies one transposition to the caller's buffer, so the caller sees the
//! initial order first and then `n! - 1` further orders. Generators are not
//! restartable.

use tracing::trace;

/// Produces every ordering of a buffer by successive transpositions.
pub trait Permutations {
    /// Moves `order` to the next ordering.
    ///
    /// Returns false, leaving `order` unchanged, once every ordering has
    /// been produced.
    fn advance(&mut self, order: &mut [usize]) -> bool;
}

/// Which generator drives the search over piece orders.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum PermutationAlgorithm {
    /// Heap's algorithm, non-recursive form.
    #[default]
    Heap,
    /// Steinhaus-Johnson-Trotter with Even's speedup (adjacent swaps only).
    SteinhausJohnsonTrotter,
}

impl PermutationAlgorithm {
    /// Creates a generator for orders of length `n`.
    pub fn generator(self, n: usize) -> Box<dyn Permutations> {
        match self {
            PermutationAlgorithm::Heap => Box::new(HeapPermutations::new(n)),
            PermutationAlgorithm::SteinhausJohnsonTrotter => Box::new(SjtPermutations::new(n)),
        }
    }
}

/// Heap's algorithm.
///
/// `counters[i]` counts the swaps done at level `i` since that level last
/// reset. Odd levels swap slot `i` with slot `counters[i]`, even levels with
/// slot 0.
#[derive(Clone, Debug)]
pub struct HeapPermutations {
    counters: Vec<usize>,
    level: usize,
}

impl HeapPermutations {
    pub fn new(n: usize) -> Self {
        Self {
            counters: vec![0; n],
            level: 1,
        }
    }
}

impl Permutations for HeapPermutations {
    fn advance(&mut self, order: &mut [usize]) -> bool {
        debug_assert_eq!(order.len(), self.counters.len());

        while self.level < self.counters.len() {
            let i = self.level;
            if self.counters[i] < i {
                let left = if i % 2 == 1 { self.counters[i] } else { 0 };
                order.swap(left, i);
                self.counters[i] += 1;
                self.level = 1;
                trace!(left, right = i, ?order, "heap swap");
                return true;
            }
            self.counters[i] = 0;
            self.level += 1;
        }

        false
    }
}

/// Steinhaus-Johnson-Trotter with Even's speedup.
///
/// Tracks labels `0..n` standing for the slots of the initial order, so any
/// starting permutation works. Every step swaps two adjacent slots.
#[derive(Clone, Debug)]
pub struct SjtPermutations {
    /// `labels[slot]` is the label currently in `slot`.
    labels: Vec<usize>,
    /// `slots[label]` is the slot currently holding `label`.
    slots: Vec<usize>,
    /// Direction of travel per label, true when moving right.
    rightward: Vec<bool>,
}

impl SjtPermutations {
    pub fn new(n: usize) -> Self {
        Self {
            labels: (0..n).collect(),
            slots: (0..n).collect(),
            rightward: vec![false; n],
        }
    }
}

impl Permutations for SjtPermutations {
    fn advance(&mut self, order: &mut [usize]) -> bool {
        let n = self.labels.len();
        debug_assert_eq!(order.len(), n);

        // the largest label that can move swaps with a smaller neighbour;
        // labels that cannot move turn around
        for label in (1..n).rev() {
            let from = self.slots[label];
            let to = if self.rightward[label] {
                Some(from + 1).filter(|&slot| slot < n)
            } else {
                from.checked_sub(1)
            };

            if let Some(to) = to.filter(|&slot| self.labels[slot] < label) {
                let neighbour = self.labels[to];
                self.labels.swap(from, to);
                order.swap(from, to);
                self.slots[label] = to;
                self.slots[neighbour] = from;
                trace!(left = from, right = to, ?order, "sjt swap");
                return true;
            }

            self.rightward[label] = !self.rightward[label];
        }

        false
    }
}
