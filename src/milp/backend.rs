//! [`MilpEngine`] adapter over the pure-Rust `microlp` solver.
//!
//! `microlp` solves a complete model in one call (LP relaxation followed by
//! branch-and-bound on the integer variables). Lazy constraints are realised
//! on top of it: the optimal integer candidate of the current model is handed
//! to the callback, and when the callback injects constraints they join the
//! model and the search resumes from scratch. Because each round optimises
//! over a relaxation of the final model, the first accepted candidate is
//! optimal for the final model as well.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use log::{debug, info, warn};
use microlp::{ComparisonOp, OptimizationDirection, Problem};

use super::config::SolverConfig;
use super::engine::{CandidateContext, LazyCallback, MilpEngine, SolveStatus};
use super::expr::{Cmp, ConstraintKey, LinearConstraint, LinearExpr, Sense, Var, VarKind};

#[derive(Debug, Clone)]
struct VarSpec {
    name: String,
    kind: VarKind,
    lower: f64,
}

#[derive(Debug, Clone)]
struct LabeledConstraint {
    label: String,
    constraint: LinearConstraint,
}

/// Engine session backed by `microlp`.
///
/// # Examples
///
/// ```
/// use u_milp::milp::{LinearExpr, MicrolpEngine, MilpEngine, Sense, SolveStatus};
///
/// let mut engine = MicrolpEngine::default();
/// let x = engine.add_binary("x");
/// let y = engine.add_binary("y");
/// engine.set_objective(LinearExpr::new().term(x, 3.0).term(y, 2.0), Sense::Maximize);
/// engine.add_constraint(LinearExpr::sum([x, y]).le(1.0), "pick one");
///
/// assert_eq!(engine.optimize(None), SolveStatus::Optimal);
/// assert!((engine.objective_value().unwrap() - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct MicrolpEngine {
    config: SolverConfig,
    vars: Vec<VarSpec>,
    constraints: Vec<LabeledConstraint>,
    lazy: Vec<LinearConstraint>,
    lazy_keys: HashSet<ConstraintKey>,
    objective: LinearExpr,
    sense: Sense,
    status: SolveStatus,
    incumbent: Option<Vec<f64>>,
    objective_value: Option<f64>,
    diagnostic: Option<String>,
}

impl Default for MicrolpEngine {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Outcome of a single `microlp` run.
enum RoundResult {
    Solved { values: Vec<f64>, objective: f64 },
    Failed { status: SolveStatus, message: String },
}

/// Candidate handed to the callback; collects injected constraints.
struct Candidate<'a> {
    values: &'a [f64],
    pending: Vec<LinearConstraint>,
}

impl CandidateContext for Candidate<'_> {
    fn candidate_value(&self, var: Var) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    fn add_lazy(&mut self, constraint: LinearConstraint) {
        self.pending.push(constraint);
    }
}

impl MicrolpEngine {
    /// Creates an empty session.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            vars: Vec::new(),
            constraints: Vec::new(),
            lazy: Vec::new(),
            lazy_keys: HashSet::new(),
            objective: LinearExpr::new(),
            sense: Sense::Minimize,
            status: SolveStatus::Loaded,
            incumbent: None,
            objective_value: None,
            diagnostic: None,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Name given to `var` at creation.
    pub fn var_name(&self, var: Var) -> Option<&str> {
        self.vars.get(var.index()).map(|v| v.name.as_str())
    }

    /// Labels of the static constraints, in insertion order.
    pub fn constraint_labels(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|c| c.label.as_str())
    }

    /// Lazy constraints injected so far, in injection order.
    pub fn lazy_constraints(&self) -> &[LinearConstraint] {
        &self.lazy
    }

    /// Adds a lazy constraint unless an identical one is already present.
    ///
    /// Returns whether the constraint was new.
    fn register_lazy(&mut self, constraint: LinearConstraint) -> bool {
        if self.lazy_keys.insert(constraint.key()) {
            self.lazy.push(constraint);
            true
        } else {
            false
        }
    }

    fn build_problem(&self) -> (Problem, Vec<microlp::Variable>) {
        let direction = match self.sense {
            Sense::Minimize => OptimizationDirection::Minimize,
            Sense::Maximize => OptimizationDirection::Maximize,
        };
        let mut problem = Problem::new(direction);

        let mut obj_coeffs = vec![0.0; self.vars.len()];
        for &(var, coeff) in self.objective.normalized().terms() {
            obj_coeffs[var.index()] = coeff;
        }

        let handles: Vec<microlp::Variable> = self
            .vars
            .iter()
            .zip(&obj_coeffs)
            .map(|(spec, &coeff)| match spec.kind {
                VarKind::Binary => problem.add_binary_var(coeff),
                VarKind::Continuous => problem.add_var(coeff, (spec.lower, f64::INFINITY)),
            })
            .collect();

        let all = self
            .constraints
            .iter()
            .map(|c| &c.constraint)
            .chain(self.lazy.iter());
        for constraint in all {
            let c = constraint.normalized();
            let op = match c.cmp {
                Cmp::Le => ComparisonOp::Le,
                Cmp::Ge => ComparisonOp::Ge,
                Cmp::Eq => ComparisonOp::Eq,
            };
            let terms: Vec<(microlp::Variable, f64)> = c
                .expr
                .terms()
                .iter()
                .map(|&(var, coeff)| (handles[var.index()], coeff))
                .collect();
            problem.add_constraint(terms, op, c.rhs);
        }

        (problem, handles)
    }

    fn solve_round(&self) -> RoundResult {
        let constant = self.objective.constant_value();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let (problem, handles) = self.build_problem();
            problem.solve().map(|solution| {
                let values: Vec<f64> = handles.iter().map(|&h| *solution.var_value(h)).collect();
                (values, solution.objective())
            })
        }));

        match result {
            Ok(Ok((values, objective))) => RoundResult::Solved {
                values,
                objective: objective + constant,
            },
            Ok(Err(microlp::Error::Infeasible)) => RoundResult::Failed {
                status: SolveStatus::Infeasible,
                message: "model is infeasible".into(),
            },
            Ok(Err(microlp::Error::Unbounded)) => RoundResult::Failed {
                status: SolveStatus::InfeasibleOrUnbounded,
                message: "relaxation is unbounded".into(),
            },
            Ok(Err(err)) => RoundResult::Failed {
                status: SolveStatus::Error,
                message: format!("engine error: {err}"),
            },
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                RoundResult::Failed {
                    status: SolveStatus::Error,
                    message: format!("engine panicked: {detail}"),
                }
            }
        }
    }

    fn finish(&mut self, status: SolveStatus, message: Option<String>) -> SolveStatus {
        match status {
            SolveStatus::Optimal => info!(
                "solve finished: {status}, objective {:?}, {} lazy constraints",
                self.objective_value,
                self.lazy.len()
            ),
            _ => warn!(
                "solve stopped: {status} ({})",
                message.as_deref().unwrap_or("no diagnostic")
            ),
        }
        self.status = status;
        self.diagnostic = message;
        status
    }
}

impl MilpEngine for MicrolpEngine {
    fn add_binary(&mut self, name: &str) -> Var {
        let var = Var(self.vars.len());
        self.vars.push(VarSpec {
            name: name.to_string(),
            kind: VarKind::Binary,
            lower: 0.0,
        });
        var
    }

    fn add_continuous(&mut self, name: &str, lower: f64) -> Var {
        let var = Var(self.vars.len());
        self.vars.push(VarSpec {
            name: name.to_string(),
            kind: VarKind::Continuous,
            lower,
        });
        var
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.objective = expr;
        self.sense = sense;
    }

    fn add_constraint(&mut self, constraint: LinearConstraint, label: &str) {
        self.constraints.push(LabeledConstraint {
            label: label.to_string(),
            constraint,
        });
    }

    fn optimize(&mut self, mut callback: Option<&mut dyn LazyCallback>) -> SolveStatus {
        let started = Instant::now();
        self.incumbent = None;
        self.objective_value = None;
        self.diagnostic = None;

        debug!(
            "optimize: {} vars, {} constraints, {} lazy constraints",
            self.vars.len(),
            self.constraints.len(),
            self.lazy.len()
        );

        let mut rejected_rounds = 0usize;
        loop {
            let (values, objective) = match self.solve_round() {
                RoundResult::Solved { values, objective } => (values, objective),
                RoundResult::Failed { status, message } => {
                    return self.finish(status, Some(message));
                }
            };

            let Some(cb) = callback.as_deref_mut() else {
                self.incumbent = Some(values);
                self.objective_value = Some(objective);
                return self.finish(SolveStatus::Optimal, None);
            };

            let mut candidate = Candidate {
                values: &values,
                pending: Vec::new(),
            };
            if let Err(err) = cb.on_candidate(&mut candidate) {
                return self.finish(SolveStatus::Error, Some(err.to_string()));
            }
            let pending = candidate.pending;

            if pending.is_empty() {
                self.incumbent = Some(values);
                self.objective_value = Some(objective);
                return self.finish(SolveStatus::Optimal, None);
            }

            let requested = pending.len();
            let added = pending
                .into_iter()
                .filter(|c| self.register_lazy(c.clone()))
                .count();
            rejected_rounds += 1;
            debug!(
                "round {rejected_rounds}: candidate rejected (objective {objective}), \
                 {added}/{requested} new lazy constraints"
            );

            if added == 0 {
                return self.finish(
                    SolveStatus::Error,
                    Some("candidate rejected but violates no new constraint".into()),
                );
            }
            if rejected_rounds >= self.config.max_cut_rounds {
                return self.finish(
                    SolveStatus::CutLimit,
                    Some(format!("stopped after {rejected_rounds} cut rounds")),
                );
            }
            if let Some(limit) = self.config.time_limit {
                if started.elapsed() >= limit {
                    return self.finish(
                        SolveStatus::TimeLimit,
                        Some(format!("time limit of {limit:?} reached")),
                    );
                }
            }
        }
    }

    fn status(&self) -> SolveStatus {
        self.status
    }

    fn value(&self, var: Var) -> Option<f64> {
        self.incumbent
            .as_ref()
            .and_then(|values| values.get(var.index()).copied())
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    fn lazy_constraint_count(&self) -> usize {
        self.lazy.len()
    }

    fn num_vars(&self) -> usize {
        self.vars.len()
    }

    fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
