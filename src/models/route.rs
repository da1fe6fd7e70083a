//! Route (tour) model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A closed tour: cities in visiting order, the last one connecting back to
/// the first.
///
/// # Examples
///
/// ```
/// use u_milp::models::Route;
///
/// let route = Route::new(vec!["A".into(), "C".into(), "B".into()], 12.0);
/// assert_eq!(route.successor_of("B"), Some("A"));
/// assert_eq!(route.arcs().count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    cities: Vec<String>,
    length: f64,
}

impl Route {
    /// Creates a route.
    pub fn new(cities: Vec<String>, length: f64) -> Self {
        Self { cities, length }
    }

    /// City IDs in visiting order, starting at the canonical first city.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Total tour length, including the closing arc.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Successor of `city_id` on the tour.
    pub fn successor_of(&self, city_id: &str) -> Option<&str> {
        let pos = self.cities.iter().position(|c| c == city_id)?;
        let next = (pos + 1) % self.cities.len();
        Some(self.cities[next].as_str())
    }

    /// Consecutive `(from, to)` pairs, including the closing arc.
    ///
    /// A single-city route yields no arcs.
    pub fn arcs(&self) -> impl Iterator<Item = (&str, &str)> {
        let n = self.cities.len();
        let count = if n > 1 { n } else { 0 };
        (0..count).map(move |i| (self.cities[i].as_str(), self.cities[(i + 1) % n].as_str()))
    }

    /// Whether no city appears twice.
    pub fn visits_each_once(&self) -> bool {
        let mut seen = HashSet::new();
        self.cities.iter().all(|c| seen.insert(c.as_str()))
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the route is empty.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_successor_wraps_around() {
        let r = Route::new(ids(&["A", "B", "C"]), 3.0);
        assert_eq!(r.successor_of("A"), Some("B"));
        assert_eq!(r.successor_of("C"), Some("A"));
        assert_eq!(r.successor_of("Z"), None);
    }

    #[test]
    fn test_arcs() {
        let r = Route::new(ids(&["A", "B", "C"]), 3.0);
        let arcs: Vec<_> = r.arcs().collect();
        assert_eq!(arcs, vec![("A", "B"), ("B", "C"), ("C", "A")]);

        let single = Route::new(ids(&["A"]), 0.0);
        assert_eq!(single.arcs().count(), 0);
        assert_eq!(single.successor_of("A"), Some("A"));
    }

    #[test]
    fn test_visits_each_once() {
        assert!(Route::new(ids(&["A", "B"]), 0.0).visits_each_once());
        assert!(!Route::new(ids(&["A", "B", "A"]), 0.0).visits_each_once());
    }
}
