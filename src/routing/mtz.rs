//! Miller–Tucker–Zemlin TSP formulation.
//!
//! Subtours are ruled out statically: every non-depot city `i` gets a
//! position `u[i]` in `[0, n-1]`, and for every arc between two non-depot
//! cities
//!
//! ```text
//! u[i] - u[j] + n * x[i,j] <= n - 1
//! ```
//!
//! forces `u[j] >= u[i] + 1` whenever `x[i,j]` is selected. A cycle avoiding
//! the depot would need strictly increasing positions all the way around, so
//! only tours through the depot survive. The relaxation is weaker than DFJ
//! but needs no callback.

use log::debug;

use super::arcs::ArcVars;
use super::model::{add_flow_constraints, check_instance, set_tour_objective, Formulation, TspModel};
use crate::costs::DistanceMatrix;
use crate::error::ModelError;
use crate::milp::{LinearExpr, MilpEngine, Var};
use crate::models::City;

/// Adds the MTZ formulation for `cities` to `engine`. City 0 is the depot.
pub fn build_mtz<E: MilpEngine + ?Sized>(
    engine: &mut E,
    cities: &[City],
) -> Result<TspModel, ModelError> {
    check_instance(cities, Formulation::Mtz)?;

    let n = cities.len();
    let distances = DistanceMatrix::euclidean(cities);
    let arcs = ArcVars::directed(engine, cities);
    let positions: Vec<Var> = cities[1..]
        .iter()
        .map(|city| engine.add_continuous(&format!("u[{}]", city.id), 0.0))
        .collect();

    set_tour_objective(engine, &arcs, &distances);
    add_flow_constraints(engine, &arcs, cities);

    let n_f = n as f64;
    for (k, city) in cities[1..].iter().enumerate() {
        engine.add_constraint(
            LinearExpr::sum([positions[k]]).ge(0.0),
            &format!("position lower[{}]", city.id),
        );
        engine.add_constraint(
            LinearExpr::sum([positions[k]]).le(n_f - 1.0),
            &format!("position upper[{}]", city.id),
        );
    }

    for i in 1..n {
        for j in 1..n {
            if let Some(x) = arcs.get(i, j) {
                engine.add_constraint(
                    LinearExpr::new()
                        .term(positions[i - 1], 1.0)
                        .term(positions[j - 1], -1.0)
                        .term(x, n_f)
                        .le(n_f - 1.0),
                    &format!("mtz[{},{}]", cities[i].id, cities[j].id),
                );
            }
        }
    }

    debug!(
        "MTZ model: {n} cities, {} vars, {} constraints",
        engine.num_vars(),
        engine.num_constraints()
    );

    Ok(TspModel {
        formulation: Formulation::Mtz,
        cities: cities.to_vec(),
        distances,
        arcs,
        positions,
    })
}
