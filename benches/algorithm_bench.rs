//! Benchmarks for tour construction and 2-Opt improvement.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use two_opt_tsp::config::{Config, ImprovementPolicy};
use two_opt_tsp::construction::{NearestNeighbor, RandomTour, TourBuilder};
use two_opt_tsp::local_search::TwoOptEngine;
use two_opt_tsp::problem::{CitySet, DistanceMatrix};

/// Create a benchmark instance of the given size on a jittered grid.
fn create_benchmark_cities(size: usize) -> CitySet {
    let mut cities = CitySet::new();

    let grid_size = (size as f64).sqrt().ceil() as usize;
    for i in 0..size {
        let row = i / grid_size;
        let col = i % grid_size;
        // Deterministic jitter so the instance has no exact ties
        let jitter = ((i * 7919) % 97) as f64 / 97.0;
        cities.add_city(
            format!("City{}", i),
            col as f64 * 10.0 + jitter,
            row as f64 * 10.0 + jitter * 0.5,
        );
    }

    cities
}

#[cfg(feature = "bench")]
fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [100, 200, 500].iter() {
        let matrix = DistanceMatrix::from_city_set(&create_benchmark_cities(*size)).unwrap();

        group.bench_with_input(BenchmarkId::new("nearest_neighbor", size), size, |b, _| {
            b.iter(|| NearestNeighbor::new(0).build_initial_tour(&matrix).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("random", size), size, |b, _| {
            b.iter(|| RandomTour::seeded(1).build_initial_tour(&matrix).unwrap());
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt");

    for size in [50, 100, 200].iter() {
        let matrix = DistanceMatrix::from_city_set(&create_benchmark_cities(*size)).unwrap();
        let tour = RandomTour::seeded(7).build_initial_tour(&matrix).unwrap();

        for (name, policy) in [
            ("first", ImprovementPolicy::FirstImprovement),
            ("best", ImprovementPolicy::BestImprovement),
        ] {
            let config = Config::new().with_policy(policy);
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| {
                    let mut engine =
                        TwoOptEngine::new(matrix.clone(), tour.clone(), &config).unwrap();
                    engine.run().unwrap()
                });
            });
        }
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(benches, benchmark_construction, benchmark_two_opt);

#[cfg(feature = "bench")]
criterion_main!(benches);
