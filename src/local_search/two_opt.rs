//! 2-Opt neighborhood: candidate enumeration, move evaluation and application.

use log::debug;

use crate::config::ImprovementPolicy;
use crate::problem::DistanceMatrix;

use super::{SwapEvent, TwoOptEngine};

/// A candidate exchange of edges `(i, i + 1)` and `(j, j + 1)`, positions in
/// tour order with `j + 1` taken modulo the tour length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub i: usize,
    pub j: usize,
    pub delta: f64,
}

/// Position pairs `(i, j)` scanned by one pass, in scan order.
///
/// Pairs of adjacent edges are skipped, as is `(0, n - 1)` whose edges share
/// the city `tour[0]`. Tours of fewer than four cities have no pairs.
pub fn candidate_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n.saturating_sub(2)).flat_map(move |i| {
        (i + 2..n)
            .filter(move |&j| !(i == 0 && j == n - 1))
            .map(move |j| (i, j))
    })
}

/// Change in length from replacing edges `(i, i + 1)` and `(j, j + 1)` with
/// `(i, j)` and `(i + 1, j + 1)`.
pub fn evaluate_two_opt(matrix: &DistanceMatrix, tour: &[usize], i: usize, j: usize) -> f64 {
    let n = tour.len();
    let a = tour[i];
    let b = tour[i + 1];
    let c = tour[j];
    let d = tour[(j + 1) % n];

    let old_cost = matrix.get(a, b) + matrix.get(c, d);
    let new_cost = matrix.get(a, c) + matrix.get(b, d);

    new_cost - old_cost
}

impl TwoOptEngine {
    /// Find the move this pass applies, if any.
    pub(super) fn find_move(&self) -> Option<Move> {
        let tour = self.tour.as_slice();
        let threshold = -self.epsilon;
        let mut pairs = candidate_pairs(tour.len())
            .map(|(i, j)| Move {
                i,
                j,
                delta: evaluate_two_opt(&self.matrix, tour, i, j),
            })
            .filter(|mv| mv.delta < threshold);

        match self.policy {
            ImprovementPolicy::FirstImprovement => pairs.next(),
            ImprovementPolicy::BestImprovement => pairs.fold(None, |best: Option<Move>, mv| {
                match best {
                    Some(b) if b.delta <= mv.delta => Some(b),
                    _ => Some(mv),
                }
            }),
        }
    }

    /// Apply a move by reversing `tour[i + 1..=j]`.
    pub(super) fn apply_move(&mut self, mv: Move) -> SwapEvent {
        let n = self.tour.len();
        let (a, b, c, d) = {
            let tour = self.tour.as_slice();
            (tour[mv.i], tour[mv.i + 1], tour[mv.j], tour[(mv.j + 1) % n])
        };

        self.tour.reverse_segment(mv.i + 1, mv.j);
        self.current_length += mv.delta;
        self.statistics.swaps += 1;
        self.statistics.length_history.push(self.current_length);

        debug!(
            "swap #{}: positions ({}, {}), removed ({a},{b}) ({c},{d}), delta {:.4}, length {:.2}",
            self.statistics.swaps, mv.i, mv.j, mv.delta, self.current_length
        );

        SwapEvent {
            edge_removed_1: (a, b),
            edge_removed_2: (c, d),
            edge_added_1: (a, c),
            edge_added_2: (b, d),
            positions: (mv.i, mv.j),
            delta: mv.delta,
            length: self.current_length,
            tour_snapshot: self.tour.clone(),
        }
    }
}
