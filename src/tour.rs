//! Tour representation and evaluation.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::problem::DistanceMatrix;

/// A closed tour: a permutation of city indices where the last city connects
/// back to the first.
///
/// A `Tour` can only be built through validating constructors, so every value
/// holds each index of `0..len` exactly once.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Validate `order` as a permutation of `0..city_count`.
    pub fn new(order: Vec<usize>, city_count: usize) -> Result<Self> {
        check_permutation(&order, city_count)?;
        Ok(Tour { order })
    }

    /// The tour `0, 1, ..., n - 1`.
    pub fn identity(city_count: usize) -> Self {
        Tour {
            order: (0..city_count).collect(),
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.order
    }

    /// Edges of the tour in visiting order, including the closing edge.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        if self.order.len() < 2 {
            return Vec::new();
        }
        self.order
            .iter()
            .copied()
            .circular_tuple_windows::<(usize, usize)>()
            .collect()
    }

    /// Total length of this tour.
    ///
    /// The matrix must cover exactly the cities of the tour.
    pub fn length(&self, matrix: &DistanceMatrix) -> f64 {
        closed_length(matrix, &self.order)
    }

    /// Reverse the segment `start..=end` in place. Any reversal of a
    /// contiguous segment keeps the tour a permutation.
    pub(crate) fn reverse_segment(&mut self, start: usize, end: usize) {
        self.order[start..=end].reverse();
    }
}

impl fmt::Debug for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tour{:?}", self.order)
    }
}

impl<'de> Deserialize<'de> for Tour {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let order = Vec::<usize>::deserialize(deserializer)?;
        let n = order.len();
        Tour::new(order, n).map_err(serde::de::Error::custom)
    }
}

/// Total length of a closed tour, including the wrap-around edge.
///
/// Fails with [`Error::InvalidInput`] if `tour` is not a permutation of the
/// matrix index range.
pub fn tour_length(matrix: &DistanceMatrix, tour: &[usize]) -> Result<f64> {
    check_permutation(tour, matrix.size())?;
    Ok(closed_length(matrix, tour))
}

/// Check that `order` holds every index of `0..city_count` exactly once.
pub fn check_permutation(order: &[usize], city_count: usize) -> Result<()> {
    if order.len() != city_count {
        return Err(Error::invalid_input(format!(
            "tour visits {} cities, expected {city_count}",
            order.len()
        )));
    }

    let mut seen = vec![false; city_count];
    for &city in order {
        if city >= city_count {
            return Err(Error::invalid_input(format!(
                "tour references city {city} outside 0..{city_count}"
            )));
        }
        if seen[city] {
            return Err(Error::invalid_input(format!(
                "tour visits city {city} more than once"
            )));
        }
        seen[city] = true;
    }

    Ok(())
}

fn closed_length(matrix: &DistanceMatrix, order: &[usize]) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }
    order
        .iter()
        .copied()
        .circular_tuple_windows::<(usize, usize)>()
        .map(|(from, to)| matrix.get(from, to))
        .sum()
}
