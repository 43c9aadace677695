//! Problem definition: cities, city sets and the distance matrix.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A location in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// A named city. Names are for display only; cities are addressed by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl City {
    /// Create a new city.
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        City {
            name: name.into(),
            x,
            y,
        }
    }

    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Calculate the Euclidean distance between two cities.
    pub fn distance(&self, other: &City) -> f64 {
        distance(self.location(), other.location())
    }
}

/// The reference set loaded by [`CitySet::sample`].
const SAMPLE_CITIES: [(&str, f64, f64); 8] = [
    ("A", 50.0, 200.0),
    ("B", 300.0, 350.0),
    ("C", 150.0, 100.0),
    ("D", 250.0, 400.0),
    ("E", 400.0, 300.0),
    ("F", 100.0, 150.0),
    ("G", 350.0, 150.0),
    ("H", 200.0, 250.0),
];

/// An ordered, index-addressed collection of cities.
///
/// Insertion order is preserved and removing a city shifts every later index
/// down by one. Each mutation bumps [`CitySet::revision`], so anything derived
/// from an older revision (a distance matrix, a tour) can be detected as stale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitySet {
    cities: Vec<City>,
    #[serde(skip)]
    revision: u64,
}

impl CitySet {
    /// Create an empty city set.
    pub fn new() -> Self {
        CitySet::default()
    }

    /// The fixed eight-city reference set.
    pub fn sample() -> Self {
        SAMPLE_CITIES
            .iter()
            .map(|&(name, x, y)| City::new(name, x, y))
            .collect()
    }

    /// Append a city and return its index.
    pub fn add_city(&mut self, name: impl Into<String>, x: f64, y: f64) -> usize {
        self.push(City::new(name, x, y))
    }

    /// Append an existing city value and return its index.
    pub fn push(&mut self, city: City) -> usize {
        self.cities.push(city);
        self.revision += 1;
        self.cities.len() - 1
    }

    /// Remove the city at `index`.
    pub fn remove_city(&mut self, index: usize) -> Result<City> {
        if index >= self.cities.len() {
            return Err(Error::NotFound(index));
        }
        self.revision += 1;
        Ok(self.cities.remove(index))
    }

    /// Replace the whole set, keeping the revision counter monotonic.
    pub fn replace(&mut self, other: CitySet) {
        self.cities = other.cities;
        self.revision += 1;
    }

    pub fn get(&self, index: usize) -> Option<&City> {
        self.cities.get(index)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, City> {
        self.cities.iter()
    }

    pub fn as_slice(&self) -> &[City] {
        &self.cities
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl FromIterator<City> for CitySet {
    fn from_iter<I: IntoIterator<Item = City>>(iter: I) -> Self {
        let cities: Vec<City> = iter.into_iter().collect();
        CitySet {
            revision: cities.len() as u64,
            cities,
        }
    }
}

impl From<Vec<City>> for CitySet {
    fn from(cities: Vec<City>) -> Self {
        cities.into_iter().collect()
    }
}

/// Tolerance used when validating symmetry of explicit matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A dense, symmetric `n × n` distance matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Build the Euclidean distance matrix for the given cities.
    ///
    /// Fails with [`Error::InvalidInput`] when `cities` is empty, since no
    /// tour exists over zero cities.
    pub fn build(cities: &[City]) -> Result<Self> {
        if cities.is_empty() {
            return Err(Error::invalid_input(
                "cannot build a distance matrix for zero cities",
            ));
        }

        let n = cities.len();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance(&cities[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(DistanceMatrix { data, size: n })
    }

    /// Snapshot the distance matrix of a city set.
    pub fn from_city_set(cities: &CitySet) -> Result<Self> {
        Self::build(cities.as_slice())
    }

    /// Create a matrix from explicit rows.
    ///
    /// The rows must form a non-empty square matrix of finite, non-negative
    /// values with a zero diagonal that is symmetric within `1e-9`.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::invalid_input("distance matrix has no rows"));
        }

        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::invalid_input(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        for i in 0..n {
            if data[i * n + i] != 0.0 {
                return Err(Error::invalid_input(format!(
                    "diagonal entry ({i}, {i}) is not zero"
                )));
            }
            for j in 0..n {
                let d = data[i * n + j];
                if !d.is_finite() || d < 0.0 {
                    return Err(Error::invalid_input(format!(
                        "entry ({i}, {j}) = {d} is not a finite non-negative distance"
                    )));
                }
                if (d - data[j * n + i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(Error::invalid_input(format!(
                        "matrix is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }

        Ok(DistanceMatrix { data, size: n })
    }

    /// Distance between two city indices.
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of cities covered by the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// One row of the matrix.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }
}
