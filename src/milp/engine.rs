//! Engine interface consumed by the model builders.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::expr::{LinearConstraint, LinearExpr, Sense, Var};

/// Terminal (or initial) state of an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Model assembled, `optimize` not yet called.
    Loaded,
    /// Proven optimal solution found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// The relaxation is unbounded; the integer problem is either
    /// infeasible or unbounded.
    InfeasibleOrUnbounded,
    /// The time limit was reached between cut rounds.
    TimeLimit,
    /// The maximum number of lazy-cut rounds was reached.
    CutLimit,
    /// The engine failed; see the session diagnostic.
    Error,
}

impl SolveStatus {
    /// Whether the status proves optimality.
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    /// Whether the search was stopped early by a limit.
    pub fn is_limit(&self) -> bool {
        matches!(self, SolveStatus::TimeLimit | SolveStatus::CutLimit)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Loaded => "LOADED",
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::InfeasibleOrUnbounded => "INF_OR_UNBD",
            SolveStatus::TimeLimit => "TIME_LIMIT",
            SolveStatus::CutLimit => "CUT_LIMIT",
            SolveStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Failure raised from inside a lazy callback.
///
/// The engine converts it into [`SolveStatus::Error`] and keeps the message
/// as the session diagnostic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("lazy callback failed: {0}")]
pub struct CallbackError(pub String);

/// Read/inject view of one integer-feasible candidate, valid for the
/// duration of a single callback invocation.
pub trait CandidateContext {
    /// Value of `var` in the current candidate.
    fn candidate_value(&self, var: Var) -> f64;

    /// Registers a lazy constraint with the running search.
    fn add_lazy(&mut self, constraint: LinearConstraint);
}

/// Hook invoked once per integer-feasible candidate.
///
/// The engine blocks until the hook returns. A candidate is accepted when
/// the hook injects no constraint.
pub trait LazyCallback {
    /// Inspects the candidate and optionally injects lazy constraints.
    fn on_candidate(&mut self, ctx: &mut dyn CandidateContext) -> Result<(), CallbackError>;
}

/// The narrow MILP engine contract.
///
/// One engine value is one solve session: it owns its variables, static
/// constraints and injected lazy constraints, and nothing is shared between
/// sessions.
pub trait MilpEngine {
    /// Adds a 0/1 variable.
    fn add_binary(&mut self, name: &str) -> Var;

    /// Adds a real variable with the given lower bound and no upper bound.
    fn add_continuous(&mut self, name: &str, lower: f64) -> Var;

    /// Replaces the objective.
    fn set_objective(&mut self, expr: LinearExpr, sense: Sense);

    /// Adds a static constraint under a diagnostic label.
    fn add_constraint(&mut self, constraint: LinearConstraint, label: &str);

    /// Runs the search to a terminal status, invoking `callback` on every
    /// integer-feasible candidate.
    fn optimize(&mut self, callback: Option<&mut dyn LazyCallback>) -> SolveStatus;

    /// Status of the last `optimize` call.
    fn status(&self) -> SolveStatus;

    /// Value of `var` in the incumbent, if one exists.
    fn value(&self, var: Var) -> Option<f64>;

    /// Objective value of the incumbent, if one exists.
    fn objective_value(&self) -> Option<f64>;

    /// Diagnostic message for non-optimal terminations.
    fn diagnostic(&self) -> Option<&str>;

    /// Number of distinct lazy constraints injected so far.
    fn lazy_constraint_count(&self) -> usize;

    /// Number of variables.
    fn num_vars(&self) -> usize;

    /// Number of static constraints.
    fn num_constraints(&self) -> usize;
}
