//! Built TSP models and the pieces shared by every formulation.

use log::debug;
use serde::{Deserialize, Serialize};

use super::arcs::ArcVars;
use super::cutter::SubtourCutter;
use super::extract::extract_route;
use super::{dfj, mtz};
use crate::costs::DistanceMatrix;
use crate::error::{Error, ExtractionError, ModelError};
use crate::milp::{LazyCallback, LinearExpr, MilpEngine, Sense, Var};
use crate::models::{City, Route};
use crate::outcome::{conclude, SolveOutcome};
use crate::validation::validate_cities;

/// TSP formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formulation {
    /// Miller–Tucker–Zemlin: static ordering variables, no callback.
    Mtz,
    /// Dantzig–Fulkerson–Johnson on directed arcs, cuts added lazily.
    #[default]
    Dfj,
    /// Dantzig–Fulkerson–Johnson on undirected edges with degree-2
    /// constraints, cuts added lazily.
    SymmetricDfj,
}

impl Formulation {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Formulation::Mtz => "MTZ",
            Formulation::Dfj => "DFJ",
            Formulation::SymmetricDfj => "symmetric DFJ",
        }
    }

    /// Whether the formulation relies on the subtour cutter.
    pub fn uses_lazy_cuts(&self) -> bool {
        !matches!(self, Formulation::Mtz)
    }

    /// Smallest instance the formulation can express.
    pub fn min_cities(&self) -> usize {
        match self {
            Formulation::Mtz | Formulation::Dfj => 2,
            Formulation::SymmetricDfj => 3,
        }
    }

    /// Adds this formulation for `cities` to `engine`.
    pub fn build<E: MilpEngine + ?Sized>(
        &self,
        engine: &mut E,
        cities: &[City],
    ) -> Result<TspModel, ModelError> {
        match self {
            Formulation::Mtz => mtz::build_mtz(engine, cities),
            Formulation::Dfj => dfj::build_dfj(engine, cities),
            Formulation::SymmetricDfj => dfj::build_symmetric_dfj(engine, cities),
        }
    }
}

/// Handles of a built TSP model.
#[derive(Debug, Clone)]
pub struct TspModel {
    pub(super) formulation: Formulation,
    pub(super) cities: Vec<City>,
    pub(super) distances: DistanceMatrix,
    pub(super) arcs: ArcVars,
    /// MTZ positions of cities `1..n`; empty for DFJ.
    pub(super) positions: Vec<Var>,
}

impl TspModel {
    /// Formulation of the model.
    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Cities in input order; index 0 is the depot and the route start.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Arc costs.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Arc-selection variables.
    pub fn arcs(&self) -> &ArcVars {
        &self.arcs
    }

    /// MTZ position variable of city `i` (`i >= 1`).
    pub fn position_var(&self, i: usize) -> Option<Var> {
        i.checked_sub(1).and_then(|k| self.positions.get(k)).copied()
    }

    /// Reads the route out of the engine incumbent.
    pub fn extract<E: MilpEngine + ?Sized>(&self, engine: &E) -> Result<Route, ExtractionError> {
        extract_route(engine, &self.arcs, &self.cities, &self.distances)
    }

    /// Optimizes the model, with the subtour cutter for DFJ formulations,
    /// and extracts the route.
    pub fn solve<E: MilpEngine + ?Sized>(&self, engine: &mut E) -> Result<SolveOutcome<Route>, Error> {
        if self.formulation.uses_lazy_cuts() {
            let mut cutter = SubtourCutter::new(&self.arcs);
            let callback: &mut dyn LazyCallback = &mut cutter;
            let status = engine.optimize(Some(callback));
            let stats = cutter.stats();
            debug!(
                "{} finished with {status}: {} candidates, {} cuts",
                self.formulation.name(),
                stats.candidates,
                stats.cuts
            );
        } else {
            engine.optimize(None);
        }
        conclude(engine, |e| self.extract(e))
    }
}

/// Validates the instance and checks it is large enough for `formulation`.
pub(super) fn check_instance(cities: &[City], formulation: Formulation) -> Result<(), ModelError> {
    validate_cities(cities)?;
    let min = formulation.min_cities();
    if cities.len() < min {
        return Err(ModelError::TooFewCities {
            formulation: formulation.name(),
            min,
            got: cities.len(),
        });
    }
    Ok(())
}

/// Minimizes the total cost of the selected arcs.
pub(super) fn set_tour_objective<E: MilpEngine + ?Sized>(
    engine: &mut E,
    arcs: &ArcVars,
    distances: &DistanceMatrix,
) {
    let mut objective = LinearExpr::new();
    for (i, j, var) in arcs.iter() {
        objective.add_term(var, distances.get(i, j));
    }
    engine.set_objective(objective, Sense::Minimize);
}

/// Exactly one outgoing and one incoming arc per city.
pub(super) fn add_flow_constraints<E: MilpEngine + ?Sized>(
    engine: &mut E,
    arcs: &ArcVars,
    cities: &[City],
) {
    for (i, city) in cities.iter().enumerate() {
        engine.add_constraint(
            LinearExpr::sum(arcs.outgoing(i)).equals(1.0),
            &format!("flow out[{}]", city.id),
        );
    }
    for (j, city) in cities.iter().enumerate() {
        engine.add_constraint(
            LinearExpr::sum(arcs.incoming(j)).equals(1.0),
            &format!("flow in[{}]", city.id),
        );
    }
}
