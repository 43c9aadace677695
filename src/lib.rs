//! # two-opt-tsp
//!
//! Improves closed tours over points in the plane with the 2-Opt local search
//! heuristic.
//!
//! An initial tour is built by nearest-neighbor or random construction, then
//! the [`TwoOptEngine`](local_search::TwoOptEngine) repeatedly reverses tour
//! segments whose endpoints can be reconnected more cheaply, until no such
//! move remains. Every accepted move is reported as an
//! [`EngineEvent`](local_search::EngineEvent), and the engine can be driven one
//! pass at a time so that a caller can render progress between swaps.
//!
//! ```
//! use two_opt_tsp::config::Config;
//! use two_opt_tsp::problem::CitySet;
//!
//! let outcome = two_opt_tsp::solve(&CitySet::sample(), &Config::new()).unwrap();
//! assert_eq!(outcome.tour.len(), 8);
//! assert!(outcome.statistics.final_length <= outcome.statistics.initial_length);
//! ```

pub mod config;
pub mod construction;
pub mod error;
pub mod local_search;
pub mod problem;
pub mod session;
pub mod tour;
pub mod utils;

pub use crate::error::{Error, Result};

use crate::config::Config;
use crate::construction::TourBuilder;
use crate::local_search::{RunOutcome, TwoOptEngine};
use crate::problem::{CitySet, DistanceMatrix};

/// Build the configured initial tour over `cities` and improve it to
/// convergence.
///
/// Fails with [`Error::InvalidInput`] for fewer than two cities.
pub fn solve(cities: &CitySet, config: &Config) -> Result<RunOutcome> {
    if cities.len() < 2 {
        return Err(Error::invalid_input(format!(
            "a tour needs at least 2 cities, have {}",
            cities.len()
        )));
    }

    let matrix = DistanceMatrix::from_city_set(cities)?;
    let tour = config.builder.build_initial_tour(&matrix)?;
    TwoOptEngine::new(matrix, tour, config)?.run()
}
