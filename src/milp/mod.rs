//! Mixed-integer linear programming layer.
//!
//! Defines the narrow engine contract the model builders are written against
//! and one concrete engine.
//!
//! # Key Components
//!
//! - **Handles and expressions**: [`Var`], [`LinearExpr`], [`LinearConstraint`]
//! - **Engine contract**: [`MilpEngine`]: add variables and constraints, set
//!   the objective, optimize, read the incumbent
//! - **Lazy constraints**: [`LazyCallback`] receives a [`CandidateContext`] for
//!   every integer-feasible candidate and may inject constraints into it
//! - **Engine**: [`MicrolpEngine`]: backed by the pure-Rust `microlp` solver
//!
//! # Design
//!
//! Builders own the typed handles they create; there is no global registry of
//! named variables or constraints. One engine value is one solve session.
//!
//! # References
//!
//! - Wolsey (1998), "Integer Programming"
//! - Padberg & Rinaldi (1991), "A Branch-and-Cut Algorithm for the Resolution
//!   of Large-Scale Symmetric Traveling Salesman Problems"

mod backend;
mod config;
mod engine;
mod expr;
#[cfg(test)]
pub(crate) mod testing;

pub use backend::MicrolpEngine;
pub use config::SolverConfig;
pub use engine::{CallbackError, CandidateContext, LazyCallback, MilpEngine, SolveStatus};
pub use expr::{Cmp, LinearConstraint, LinearExpr, Sense, Var, VarKind};

/// Values above this threshold count as "selected" when reading 0/1
/// variables back from the engine.
///
/// Relaxation-based engines report binaries with floating-point noise
/// (`0.9999999`, `1e-12`). Values close to 0.5 are not expected from an
/// integer-feasible solution; if they occur the model is numerically
/// ill-conditioned.
pub const SELECTION_THRESHOLD: f64 = 0.5;
