//! Traveling-salesman formulations and lazy subtour elimination.
//!
//! # Formulations
//!
//! | [`Formulation`] | Arc variables | Subtour prevention |
//! |-----------------|---------------|--------------------|
//! | `Mtz` | directed | static ordering constraints |
//! | `Dfj` | directed | lazy cuts, Σ over ordered pairs ≤ \|S\| - 1 |
//! | `SymmetricDfj` | undirected | lazy cuts, Σ over unordered pairs ≤ \|S\| - 1 |
//!
//! # Branch-and-cut loop
//!
//! For the DFJ formulations the engine hands every integer-feasible
//! candidate to a [`SubtourCutter`]. The cutter decomposes the selected arcs
//! into cycles ([`decompose_directed`], [`decompose_undirected`]) and, unless
//! one cycle covers every city, injects the elimination constraint of the
//! shortest cycle. Each cut removes the current candidate and the set of
//! integer points is finite, so the loop terminates.
//!
//! # References
//!
//! - Dantzig, Fulkerson & Johnson (1954), "Solution of a Large-Scale
//!   Traveling-Salesman Problem"
//! - Miller, Tucker & Zemlin (1960), "Integer Programming Formulation of
//!   Traveling Salesman Problems"
//! - Applegate et al. (2006), "The Traveling Salesman Problem: A
//!   Computational Study"

mod arcs;
mod cutter;
mod dfj;
mod extract;
mod model;
mod mtz;
mod solver;
mod subtour;

pub use arcs::{ArcKind, ArcVars};
pub use cutter::{CutDecision, CutStats, SubtourCutter};
pub use dfj::{build_dfj, build_symmetric_dfj};
pub use extract::{extract_route, route_from_arcs};
pub use model::{Formulation, TspModel};
pub use mtz::build_mtz;
pub use solver::TspSolver;
pub use subtour::{decompose_directed, decompose_undirected, Subtours};
