//! Initial tour construction strategies.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::problem::DistanceMatrix;
use crate::tour::Tour;

/// Builds the starting permutation handed to the 2-Opt engine.
pub trait TourBuilder {
    fn build_initial_tour(&self, matrix: &DistanceMatrix) -> Result<Tour>;

    fn name(&self) -> &'static str;
}

/// Greedy construction: always travel to the closest unvisited city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestNeighbor {
    pub start: usize,
}

impl NearestNeighbor {
    pub fn new(start: usize) -> Self {
        NearestNeighbor { start }
    }
}

impl TourBuilder for NearestNeighbor {
    /// Ties are broken by the lowest city index.
    fn build_initial_tour(&self, matrix: &DistanceMatrix) -> Result<Tour> {
        let n = matrix.size();
        if self.start >= n {
            return Err(Error::invalid_input(format!(
                "start city {} is outside 0..{n}",
                self.start
            )));
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current = self.start;
        visited[current] = true;
        order.push(current);

        while order.len() < n {
            let mut nearest = None;
            let mut nearest_distance = f64::INFINITY;

            for (city, &d) in matrix.row(current).iter().enumerate() {
                if !visited[city] && (nearest.is_none() || d < nearest_distance) {
                    nearest = Some(city);
                    nearest_distance = d;
                }
            }

            // At least one city is unvisited while order.len() < n.
            let Some(next) = nearest else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }

        Tour::new(order, n)
    }

    fn name(&self) -> &'static str {
        "nearest_neighbor"
    }
}

/// Uniformly random permutation.
///
/// With a seed the result is reproducible; without one the generator is seeded
/// from system entropy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomTour {
    pub seed: Option<u64>,
}

impl RandomTour {
    pub fn new(seed: Option<u64>) -> Self {
        RandomTour { seed }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomTour { seed: Some(seed) }
    }

    /// Shuffle with a caller-supplied random source.
    pub fn build_with_rng<R: Rng + ?Sized>(matrix: &DistanceMatrix, rng: &mut R) -> Result<Tour> {
        let n = matrix.size();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Tour::new(order, n)
    }
}

impl TourBuilder for RandomTour {
    fn build_initial_tour(&self, matrix: &DistanceMatrix) -> Result<Tour> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::build_with_rng(matrix, &mut rng)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Selects the construction strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BuilderMethod {
    NearestNeighbor {
        #[serde(default)]
        start: usize,
    },
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for BuilderMethod {
    fn default() -> Self {
        BuilderMethod::NearestNeighbor { start: 0 }
    }
}

impl TourBuilder for BuilderMethod {
    fn build_initial_tour(&self, matrix: &DistanceMatrix) -> Result<Tour> {
        match *self {
            BuilderMethod::NearestNeighbor { start } => {
                NearestNeighbor::new(start).build_initial_tour(matrix)
            }
            BuilderMethod::Random { seed } => RandomTour::new(seed).build_initial_tour(matrix),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BuilderMethod::NearestNeighbor { .. } => "nearest_neighbor",
            BuilderMethod::Random { .. } => "random",
        }
    }
}
