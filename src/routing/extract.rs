//! Route extraction from final arc values.

use super::arcs::{ArcKind, ArcVars};
use super::subtour::{decompose_directed, decompose_undirected};
use crate::costs::DistanceMatrix;
use crate::error::ExtractionError;
use crate::milp::{MilpEngine, SELECTION_THRESHOLD};
use crate::models::{City, Route};

/// Reads the selected arcs from `engine` and walks them from city 0.
///
/// Fails unless the selection is a single cycle through every city.
pub fn extract_route<E: MilpEngine + ?Sized>(
    engine: &E,
    arcs: &ArcVars,
    cities: &[City],
    distances: &DistanceMatrix,
) -> Result<Route, ExtractionError> {
    let mut selected = Vec::new();
    for (i, j, var) in arcs.iter() {
        let value = engine.value(var).ok_or_else(|| {
            ExtractionError::MissingValue(format!("arc {}->{}", cities[i].id, cities[j].id))
        })?;
        if value > SELECTION_THRESHOLD {
            selected.push((i, j));
        }
    }
    route_from_arcs(&selected, arcs.kind(), cities, distances)
}

/// Builds the route visiting `cities` along the selected arcs, starting at
/// city 0.
///
/// # Examples
///
/// ```
/// use u_milp::costs::DistanceMatrix;
/// use u_milp::models::City;
/// use u_milp::routing::{route_from_arcs, ArcKind};
///
/// let cities = vec![
///     City::new("A", 0.0, 0.0),
///     City::new("B", 3.0, 0.0),
///     City::new("C", 3.0, 4.0),
/// ];
/// let d = DistanceMatrix::euclidean(&cities);
/// let route = route_from_arcs(&[(2, 0), (0, 1), (1, 2)], ArcKind::Directed, &cities, &d).unwrap();
/// assert_eq!(route.cities(), &["A", "B", "C"]);
/// assert!((route.length() - 12.0).abs() < 1e-12);
/// ```
pub fn route_from_arcs(
    selected: &[(usize, usize)],
    kind: ArcKind,
    cities: &[City],
    distances: &DistanceMatrix,
) -> Result<Route, ExtractionError> {
    let n = cities.len();
    let subtours = match kind {
        ArcKind::Directed => decompose_directed(n, selected)?,
        ArcKind::Undirected => decompose_undirected(n, selected)?,
    };
    if subtours.len() != 1 {
        return Err(ExtractionError::NotHamiltonian {
            cycles: subtours.len(),
            shortest: subtours.shortest().len(),
            cities: n,
        });
    }

    // the first walk starts at city 0
    let order = subtours.into_cycles().swap_remove(0);
    let length = distances.tour_length(&order);
    let ids = order.iter().map(|&i| cities[i].id.clone()).collect();
    Ok(Route::new(ids, length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubtourError;
    use crate::milp::testing::ScriptedEngine;

    fn pentagon() -> Vec<City> {
        (0..5)
            .map(|k| {
                let angle = k as f64 * std::f64::consts::TAU / 5.0;
                City::new(format!("P{k}"), angle.cos(), angle.sin())
            })
            .collect()
    }

    #[test]
    fn test_round_trip_directed() {
        let cities = pentagon();
        let d = DistanceMatrix::euclidean(&cities);
        let order = [0, 3, 1, 4, 2];
        let arcs: Vec<_> = (0..5).map(|k| (order[k], order[(k + 1) % 5])).collect();

        let route = route_from_arcs(&arcs, ArcKind::Directed, &cities, &d).unwrap();
        let expected: Vec<String> = order.iter().map(|&i| format!("P{i}")).collect();
        assert_eq!(route.cities(), expected.as_slice());
        assert!(route.visits_each_once());
        assert_eq!(route.successor_of("P2"), Some("P0"));
        assert!((route.length() - d.tour_length(&order)).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_undirected() {
        let cities = pentagon();
        let d = DistanceMatrix::euclidean(&cities);
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (0, 4)];
        let route = route_from_arcs(&edges, ArcKind::Undirected, &cities, &d).unwrap();
        assert_eq!(route.len(), 5);
        assert_eq!(route.cities()[0], "P0");
        assert!(route.visits_each_once());
    }

    #[test]
    fn test_subtours_are_rejected() {
        let cities = pentagon();
        let d = DistanceMatrix::euclidean(&cities);
        let arcs = [(0, 1), (1, 0), (2, 3), (3, 4), (4, 2)];
        let err = route_from_arcs(&arcs, ArcKind::Directed, &cities, &d).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::NotHamiltonian {
                cycles: 2,
                shortest: 2,
                cities: 5
            }
        );
    }

    #[test]
    fn test_broken_selection_is_rejected() {
        let cities = pentagon();
        let d = DistanceMatrix::euclidean(&cities);
        let err = route_from_arcs(&[(0, 1)], ArcKind::Directed, &cities, &d).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Subtour(SubtourError::MissingSuccessor { city: 1 })
        );
    }

    #[test]
    fn test_extract_applies_threshold() {
        let cities = pentagon();
        let d = DistanceMatrix::euclidean(&cities);
        let mut engine = ScriptedEngine::default();
        let arcs = ArcVars::directed(&mut engine, &cities);
        for k in 0..5 {
            let name = format!("x[P{k},P{}]", (k + 1) % 5);
            engine.set(&name, 0.9999996);
        }
        engine.set("x[P0,P2]", 0.4);
        engine.zero_rest();

        let route = extract_route(&engine, &arcs, &cities, &d).unwrap();
        assert_eq!(route.cities(), &["P0", "P1", "P2", "P3", "P4"]);
    }

    #[test]
    fn test_extract_missing_value() {
        let cities = pentagon();
        let d = DistanceMatrix::euclidean(&cities);
        let mut engine = ScriptedEngine::default();
        let arcs = ArcVars::directed(&mut engine, &cities);
        let err = extract_route(&engine, &arcs, &cities, &d).unwrap_err();
        assert_eq!(err, ExtractionError::MissingValue("arc P0->P1".into()));
    }
}
