//! Cost and horizon providers.
//!
//! - [`DistanceMatrix`]: pairwise Euclidean arc costs between cities
//! - [`big_m`]: the disjunctive-scheduling constant, derived from the
//!   instance horizon

use serde::{Deserialize, Serialize};

use crate::models::{City, Job, Machine};

/// Dense, row-major matrix of pairwise distances.
///
/// # Examples
///
/// ```
/// use u_milp::costs::DistanceMatrix;
/// use u_milp::models::City;
///
/// let cities = vec![City::new("A", 0.0, 0.0), City::new("B", 3.0, 4.0)];
/// let d = DistanceMatrix::euclidean(&cities);
/// assert_eq!(d.len(), 2);
/// assert!((d.get(0, 1) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Euclidean distances between all city pairs.
    pub fn euclidean(cities: &[City]) -> Self {
        let n = cities.len();
        let mut data = vec![0.0; n * n];
        for (i, a) in cities.iter().enumerate() {
            for (j, b) in cities.iter().enumerate().skip(i + 1) {
                let d = a.distance_to(b);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// Returns `None` if the rows do not form a square matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return None;
        }
        Some(Self {
            n,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Cost of the arc `from -> to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Length of the closed tour visiting `order` (by index) and returning
    /// to its first city.
    pub fn tour_length(&self, order: &[usize]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        order
            .iter()
            .zip(order.iter().cycle().skip(1))
            .map(|(&a, &b)| self.get(a, b))
            .sum()
    }
}

/// Big-M for the disjunctive no-overlap and availability constraints.
///
/// Equals the latest finish time of any schedule without unforced idle time:
/// the sum of all durations plus the largest release or machine-availability
/// time. Deactivated constraints then never cut off such a schedule.
/// Computed per instance; never reuse the value for another instance.
pub fn big_m(jobs: &[Job], machines: &[Machine]) -> f64 {
    let total_duration: f64 = jobs.iter().map(|j| j.duration).sum();
    let latest_release = jobs.iter().map(|j| j.release).fold(0.0, f64::max);
    let latest_available = machines.iter().map(|m| m.available_at).fold(0.0, f64::max);
    total_duration + latest_release.max(latest_available)
}
