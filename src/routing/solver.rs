//! TSP solve entry point.

use log::debug;

use super::model::Formulation;
use crate::costs::DistanceMatrix;
use crate::error::{Error, ModelError};
use crate::milp::MilpEngine;
use crate::models::{City, Route};
use crate::outcome::SolveOutcome;
use crate::validation::validate_cities;

/// Solves a TSP instance with one [`Formulation`].
///
/// Instances of one or two cities have a single tour and are answered
/// without touching the engine.
///
/// # Examples
///
/// ```
/// use u_milp::milp::MicrolpEngine;
/// use u_milp::models::City;
/// use u_milp::routing::{Formulation, TspSolver};
///
/// let cities = vec![
///     City::new("A", 0.0, 0.0),
///     City::new("B", 1.0, 0.0),
///     City::new("C", 1.0, 1.0),
///     City::new("D", 0.0, 1.0),
/// ];
/// let mut engine = MicrolpEngine::default();
/// let outcome = TspSolver::new(Formulation::Dfj).solve(&mut engine, &cities).unwrap();
/// assert!(outcome.is_solved());
/// assert!((outcome.objective.unwrap() - 4.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TspSolver {
    formulation: Formulation,
}

impl TspSolver {
    /// Creates a solver for `formulation`.
    pub fn new(formulation: Formulation) -> Self {
        Self { formulation }
    }

    /// Formulation in use.
    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Validates `cities`, builds the model into `engine`, optimizes and
    /// extracts the route.
    pub fn solve<E: MilpEngine + ?Sized>(
        &self,
        engine: &mut E,
        cities: &[City],
    ) -> Result<SolveOutcome<Route>, Error> {
        validate_cities(cities).map_err(ModelError::from)?;

        if cities.len() <= 2 {
            let distances = DistanceMatrix::euclidean(cities);
            let order: Vec<usize> = (0..cities.len()).collect();
            let length = distances.tour_length(&order);
            debug!("{} cities: degenerate tour of length {length}", cities.len());
            let ids = cities.iter().map(|c| c.id.clone()).collect();
            return Ok(SolveOutcome::trivial(Route::new(ids, length), length));
        }

        let model = self.formulation.build(engine, cities)?;
        model.solve(engine)
    }
}
