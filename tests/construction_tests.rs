//! Unit tests for the initial tour builders.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use two_opt_tsp::construction::{BuilderMethod, NearestNeighbor, RandomTour, TourBuilder};
use two_opt_tsp::problem::{City, DistanceMatrix};
use two_opt_tsp::tour::check_permutation;
use two_opt_tsp::Error;

fn create_random_matrix(n: usize, seed: u64) -> DistanceMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cities: Vec<City> = (0..n)
        .map(|i| {
            City::new(
                format!("C{i}"),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect();
    DistanceMatrix::build(&cities).unwrap()
}

#[test]
fn test_builders_return_permutations() {
    for n in 2..=25 {
        let matrix = create_random_matrix(n, n as u64);

        let nn = NearestNeighbor::default().build_initial_tour(&matrix).unwrap();
        assert!(check_permutation(nn.as_slice(), n).is_ok());

        let random = RandomTour::seeded(n as u64).build_initial_tour(&matrix).unwrap();
        assert!(check_permutation(random.as_slice(), n).is_ok());

        let unseeded = RandomTour::new(None).build_initial_tour(&matrix).unwrap();
        assert!(check_permutation(unseeded.as_slice(), n).is_ok());
    }
}

#[test]
fn test_nearest_neighbor_on_a_line() {
    // Cities along the x axis, inserted out of order
    let matrix = DistanceMatrix::build(&[
        City::new("x0", 0.0, 0.0),
        City::new("x3", 3.0, 0.0),
        City::new("x1", 1.0, 0.0),
        City::new("x2", 2.0, 0.0),
    ])
    .unwrap();

    let tour = NearestNeighbor::new(0).build_initial_tour(&matrix).unwrap();
    assert_eq!(tour.as_slice(), &[0, 2, 3, 1]);
}

#[test]
fn test_nearest_neighbor_breaks_ties_by_lowest_index() {
    // From city 0, cities 1, 2 and 3 are equidistant
    let matrix = DistanceMatrix::from_rows(vec![
        vec![0.0, 5.0, 5.0, 5.0],
        vec![5.0, 0.0, 9.0, 1.0],
        vec![5.0, 9.0, 0.0, 9.0],
        vec![5.0, 1.0, 9.0, 0.0],
    ])
    .unwrap();

    let tour = NearestNeighbor::new(0).build_initial_tour(&matrix).unwrap();
    assert_eq!(tour.as_slice(), &[0, 1, 3, 2]);
}

#[test]
fn test_nearest_neighbor_start_index() {
    let matrix = create_random_matrix(10, 3);

    let tour = NearestNeighbor::new(6).build_initial_tour(&matrix).unwrap();
    assert_eq!(tour.as_slice()[0], 6);

    // Deterministic for the same matrix and start
    let again = NearestNeighbor::new(6).build_initial_tour(&matrix).unwrap();
    assert_eq!(tour, again);
}

#[test]
fn test_nearest_neighbor_rejects_out_of_range_start() {
    let matrix = create_random_matrix(5, 1);
    let result = NearestNeighbor::new(5).build_initial_tour(&matrix);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_random_tour_is_reproducible_with_seed() {
    let matrix = create_random_matrix(20, 11);

    let first = RandomTour::seeded(1234).build_initial_tour(&matrix).unwrap();
    let second = RandomTour::seeded(1234).build_initial_tour(&matrix).unwrap();
    assert_eq!(first, second);

    let other = RandomTour::seeded(4321).build_initial_tour(&matrix).unwrap();
    assert_ne!(first, other);
}

#[test]
fn test_random_tour_with_supplied_rng() {
    let matrix = create_random_matrix(15, 5);

    let mut rng_a = ChaCha8Rng::seed_from_u64(99);
    let mut rng_b = ChaCha8Rng::seed_from_u64(99);

    let a = RandomTour::build_with_rng(&matrix, &mut rng_a).unwrap();
    let b = RandomTour::build_with_rng(&matrix, &mut rng_b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_builder_method_dispatch() {
    let matrix = create_random_matrix(12, 8);

    let nn = BuilderMethod::NearestNeighbor { start: 2 };
    assert_eq!(nn.name(), "nearest_neighbor");
    assert_eq!(
        nn.build_initial_tour(&matrix).unwrap(),
        NearestNeighbor::new(2).build_initial_tour(&matrix).unwrap()
    );

    let random = BuilderMethod::Random { seed: Some(17) };
    assert_eq!(random.name(), "random");
    assert_eq!(
        random.build_initial_tour(&matrix).unwrap(),
        RandomTour::seeded(17).build_initial_tour(&matrix).unwrap()
    );

    assert_eq!(
        BuilderMethod::default(),
        BuilderMethod::NearestNeighbor { start: 0 }
    );
}

#[test]
fn test_builder_method_from_json() {
    let method: BuilderMethod =
        serde_json::from_str(r#"{"method": "random", "seed": 5}"#).unwrap();
    assert_eq!(method, BuilderMethod::Random { seed: Some(5) });

    let method: BuilderMethod = serde_json::from_str(r#"{"method": "nearest_neighbor"}"#).unwrap();
    assert_eq!(method, BuilderMethod::NearestNeighbor { start: 0 });
}
