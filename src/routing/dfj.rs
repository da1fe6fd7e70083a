//! Dantzig–Fulkerson–Johnson TSP formulations.
//!
//! Only the degree constraints are static. The exponential family of
//! subtour elimination constraints is generated on demand by
//! [`SubtourCutter`](super::SubtourCutter) during the solve.

use log::debug;

use super::arcs::ArcVars;
use super::model::{add_flow_constraints, check_instance, set_tour_objective, Formulation, TspModel};
use crate::costs::DistanceMatrix;
use crate::error::ModelError;
use crate::milp::{LinearExpr, MilpEngine};
use crate::models::City;

/// Adds the directed DFJ formulation: one variable per ordered city pair,
/// one outgoing and one incoming arc per city.
pub fn build_dfj<E: MilpEngine + ?Sized>(
    engine: &mut E,
    cities: &[City],
) -> Result<TspModel, ModelError> {
    check_instance(cities, Formulation::Dfj)?;

    let distances = DistanceMatrix::euclidean(cities);
    let arcs = ArcVars::directed(engine, cities);
    set_tour_objective(engine, &arcs, &distances);
    add_flow_constraints(engine, &arcs, cities);

    debug!(
        "DFJ model: {} cities, {} vars, {} constraints",
        cities.len(),
        engine.num_vars(),
        engine.num_constraints()
    );

    Ok(TspModel {
        formulation: Formulation::Dfj,
        cities: cities.to_vec(),
        distances,
        arcs,
        positions: Vec::new(),
    })
}

/// Adds the symmetric DFJ formulation: one variable per unordered city
/// pair, exactly two selected edges at every city. Needs at least three
/// cities.
pub fn build_symmetric_dfj<E: MilpEngine + ?Sized>(
    engine: &mut E,
    cities: &[City],
) -> Result<TspModel, ModelError> {
    check_instance(cities, Formulation::SymmetricDfj)?;

    let distances = DistanceMatrix::euclidean(cities);
    let arcs = ArcVars::undirected(engine, cities);
    set_tour_objective(engine, &arcs, &distances);
    for (i, city) in cities.iter().enumerate() {
        engine.add_constraint(
            LinearExpr::sum(arcs.outgoing(i)).equals(2.0),
            &format!("degree[{}]", city.id),
        );
    }

    debug!(
        "symmetric DFJ model: {} cities, {} vars, {} constraints",
        cities.len(),
        engine.num_vars(),
        engine.num_constraints()
    );

    Ok(TspModel {
        formulation: Formulation::SymmetricDfj,
        cities: cities.to_vec(),
        distances,
        arcs,
        positions: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ExtractionError};
    use crate::milp::testing::ScriptedEngine;
    use crate::milp::{MicrolpEngine, MilpEngine, SolveStatus, SolverConfig};
    use std::time::Duration;

    fn unit_square() -> Vec<City> {
        vec![
            City::new("A", 0.0, 0.0),
            City::new("B", 1.0, 0.0),
            City::new("C", 1.0, 1.0),
            City::new("D", 0.0, 1.0),
        ]
    }

    /// Two far-apart triangles: the assignment relaxation picks subtours.
    fn two_clusters() -> Vec<City> {
        vec![
            City::new("A", 0.0, 0.0),
            City::new("B", 1.0, 0.0),
            City::new("C", 0.0, 1.0),
            City::new("D", 10.0, 0.0),
            City::new("E", 11.0, 0.0),
            City::new("F", 10.0, 1.0),
        ]
    }

    #[test]
    fn test_dfj_structure() {
        let mut engine = ScriptedEngine::default();
        let model = build_dfj(&mut engine, &unit_square()).unwrap();
        assert_eq!(engine.num_vars(), 12);
        assert_eq!(engine.num_constraints(), 8);
        assert!(model.formulation().uses_lazy_cuts());
        assert!(model.position_var(1).is_none());
    }

    #[test]
    fn test_symmetric_structure() {
        let mut engine = ScriptedEngine::default();
        build_symmetric_dfj(&mut engine, &unit_square()).unwrap();
        assert_eq!(engine.num_vars(), 6);
        assert_eq!(engine.labels_starting_with("degree"), 4);

        let (objective, _) = engine.objective.as_ref().unwrap();
        let total: f64 = objective.terms().iter().map(|&(_, c)| c).sum();
        assert!((total - (4.0 + 2.0 * 2f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_needs_three_cities() {
        let mut engine = ScriptedEngine::default();
        let cities = vec![City::new("A", 0.0, 0.0), City::new("B", 1.0, 0.0)];
        let err = build_symmetric_dfj(&mut engine, &cities).unwrap_err();
        assert!(matches!(err, ModelError::TooFewCities { min: 3, got: 2, .. }));
    }

    #[test]
    fn test_candidate_with_subtours_gets_cut() {
        let mut engine = ScriptedEngine::default();
        let model = build_dfj(&mut engine, &unit_square()).unwrap();
        for (from, to) in [("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")] {
            engine.set(&format!("x[{from},{to}]"), 1.0);
        }
        engine.zero_rest();

        // the scripted engine claims optimality for the rejected candidate,
        // which extraction must refuse
        let err = model.solve(&mut engine).unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::NotHamiltonian {
                cycles: 2,
                shortest: 2,
                cities: 4
            })
        ));
        assert_eq!(engine.lazy.len(), 1);
        assert_eq!(engine.lazy[0].rhs, 1.0);
    }

    #[test]
    fn test_dfj_unit_square() {
        let mut engine = MicrolpEngine::default();
        let model = build_dfj(&mut engine, &unit_square()).unwrap();
        let outcome = model.solve(&mut engine).unwrap();

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.objective.unwrap() - 4.0).abs() < 1e-6);
        let route = outcome.solution.unwrap();
        assert!(route.visits_each_once());
        assert_eq!(route.len(), 4);
    }

    #[test]
    fn test_symmetric_unit_square() {
        let mut engine = MicrolpEngine::default();
        let model = build_symmetric_dfj(&mut engine, &unit_square()).unwrap();
        let outcome = model.solve(&mut engine).unwrap();

        assert!(outcome.is_solved());
        assert!((outcome.objective.unwrap() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_clusters_need_cuts() {
        let cities = two_clusters();
        let mut engine = MicrolpEngine::default();
        let model = build_dfj(&mut engine, &cities).unwrap();
        let outcome = model.solve(&mut engine).unwrap();

        assert!(outcome.is_solved());
        assert!(outcome.lazy_cuts >= 1);
        let route = outcome.solution.unwrap();
        assert_eq!(route.len(), 6);
        assert!(route.visits_each_once());
        assert!((route.length() - outcome.objective.unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_time_limit_leaves_no_route() {
        let cities = two_clusters();
        let config = SolverConfig::default().with_time_limit(Duration::ZERO);
        let mut engine = MicrolpEngine::new(config);
        let model = build_dfj(&mut engine, &cities).unwrap();
        let outcome = model.solve(&mut engine).unwrap();

        assert_eq!(outcome.status, SolveStatus::TimeLimit);
        assert!(outcome.solution.is_none());
        assert!(outcome.objective.is_none());
        assert!(!outcome.is_solved());
        assert!(outcome.lazy_cuts >= 1);
        assert!(outcome.diagnostic.unwrap().contains("time limit"));
    }

    #[test]
    fn test_reinjected_cuts_keep_optimum() {
        let cities = two_clusters();
        let mut engine = MicrolpEngine::default();
        let model = build_dfj(&mut engine, &cities).unwrap();
        let first = model.solve(&mut engine).unwrap();
        let cuts = engine.lazy_constraints().to_vec();

        // second session on the same engine: every cut is already present
        let second = model.solve(&mut engine).unwrap();
        assert_eq!(engine.lazy_constraint_count(), cuts.len());
        assert!((first.objective.unwrap() - second.objective.unwrap()).abs() < 1e-9);
        assert_eq!(second.lazy_cuts, first.lazy_cuts);
    }
}
