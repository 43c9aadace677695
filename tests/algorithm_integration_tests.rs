//! Integration tests for complete 2-Opt runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use two_opt_tsp::config::{Config, ImprovementPolicy};
use two_opt_tsp::construction::BuilderMethod;
use two_opt_tsp::local_search::two_opt::{candidate_pairs, evaluate_two_opt};
use two_opt_tsp::local_search::EngineState;
use two_opt_tsp::problem::{CitySet, DistanceMatrix};
use two_opt_tsp::tour::{check_permutation, tour_length};
use two_opt_tsp::{solve, Error};

/// Creates a moderate size instance with cities scattered over a square.
fn create_moderate_cities(n: usize, seed: u64) -> CitySet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cities = CitySet::new();
    for i in 0..n {
        cities.add_city(
            format!("City{i}"),
            rng.gen_range(0.0..500.0),
            rng.gen_range(0.0..500.0),
        );
    }
    cities
}

/// Creates cities on a grid with a 10 unit spacing.
fn create_grid_cities(rows: usize, cols: usize) -> CitySet {
    let mut cities = CitySet::new();
    for r in 0..rows {
        for c in 0..cols {
            cities.add_city(format!("G{r}_{c}"), c as f64 * 10.0, r as f64 * 10.0);
        }
    }
    cities
}

#[test]
fn test_solve_sample_set() {
    let cities = CitySet::sample();
    let outcome = solve(&cities, &Config::new()).unwrap();

    assert_eq!(outcome.state, EngineState::Converged);
    assert!(!outcome.statistics.capped);
    assert!(check_permutation(outcome.tour.as_slice(), 8).is_ok());
    assert!(outcome.statistics.final_length <= outcome.statistics.initial_length);

    // Nearest neighbor from A gives A F C H B D E G, two swaps repair it
    assert_eq!(outcome.tour.as_slice(), &[0, 5, 2, 6, 4, 1, 3, 7]);
    assert_eq!(outcome.statistics.swaps, 2);
    assert_eq!(outcome.statistics.iterations, 3);

    let matrix = DistanceMatrix::from_city_set(&cities).unwrap();
    let exact = tour_length(&matrix, outcome.tour.as_slice()).unwrap();
    assert!((exact - outcome.length).abs() < 1e-9);
    assert!(candidate_pairs(8)
        .all(|(i, j)| evaluate_two_opt(&matrix, outcome.tour.as_slice(), i, j) >= -1e-9));
}

#[test]
fn test_seeded_random_run_is_deterministic() {
    let cities = create_moderate_cities(50, 2024);
    let config = Config::new().with_builder(BuilderMethod::Random { seed: Some(7) });

    let first = solve(&cities, &config).unwrap();
    let second = solve(&cities, &config).unwrap();

    assert_eq!(first.tour, second.tour);
    assert_eq!(first.length, second.length);
    assert_eq!(first.statistics.swaps, second.statistics.swaps);
    assert_eq!(first.statistics.iterations, second.statistics.iterations);
    assert_eq!(
        first.statistics.length_history,
        second.statistics.length_history
    );
}

#[test]
fn test_random_start_improves_substantially() {
    let cities = create_moderate_cities(60, 99);
    let config = Config::new().with_builder(BuilderMethod::Random { seed: Some(1) });

    let outcome = solve(&cities, &config).unwrap();

    assert!(outcome.statistics.swaps > 0);
    assert_eq!(outcome.statistics.iterations, outcome.statistics.swaps + 1);
    assert!(outcome.statistics.improvement_percent > 20.0);
    assert_eq!(
        outcome.statistics.length_history.len(),
        outcome.statistics.swaps + 1
    );

    // History is strictly decreasing
    for pair in outcome.statistics.length_history.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn test_both_policies_reach_a_local_optimum() {
    let cities = create_moderate_cities(40, 5);
    let matrix = DistanceMatrix::from_city_set(&cities).unwrap();

    for policy in [
        ImprovementPolicy::FirstImprovement,
        ImprovementPolicy::BestImprovement,
    ] {
        let config = Config::new()
            .with_builder(BuilderMethod::Random { seed: Some(3) })
            .with_policy(policy);
        let outcome = solve(&cities, &config).unwrap();

        assert_eq!(outcome.state, EngineState::Converged);
        assert!(candidate_pairs(40)
            .all(|(i, j)| evaluate_two_opt(&matrix, outcome.tour.as_slice(), i, j) >= -1e-9));
    }
}

#[test]
fn test_grid_tour_is_near_optimal() {
    // A 4 x 5 grid with 10 unit spacing has an optimal tour of length 200
    let cities = create_grid_cities(4, 5);
    let outcome = solve(&cities, &Config::new()).unwrap();

    assert!(outcome.length >= 200.0 - 1e-9);
    assert!(outcome.length < 200.0 * 1.25);
}

#[test]
fn test_solve_rejects_tiny_instances() {
    let mut cities = CitySet::new();
    assert!(matches!(
        solve(&cities, &Config::new()),
        Err(Error::InvalidInput(_))
    ));

    cities.add_city("A", 0.0, 0.0);
    assert!(matches!(
        solve(&cities, &Config::new()),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_three_cities_are_returned_unchanged() {
    let mut cities = CitySet::new();
    cities.add_city("A", 0.0, 0.0);
    cities.add_city("B", 3.0, 0.0);
    cities.add_city("C", 0.0, 4.0);

    let outcome = solve(&cities, &Config::new()).unwrap();
    assert_eq!(outcome.tour.as_slice(), &[0, 1, 2]);
    assert_eq!(outcome.statistics.swaps, 0);
    assert!((outcome.length - 12.0).abs() < 1e-9);
}

#[test]
fn test_pass_cap_flags_statistics() {
    let cities = create_moderate_cities(50, 8);
    let config = Config::new()
        .with_builder(BuilderMethod::Random { seed: Some(8) })
        .with_max_passes(3);

    let outcome = solve(&cities, &config).unwrap();
    assert_eq!(outcome.state, EngineState::Converged);
    assert!(outcome.statistics.capped);
    assert_eq!(outcome.statistics.iterations, 3);
    assert_eq!(outcome.statistics.swaps, 3);
}
