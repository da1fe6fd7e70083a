//! Scripted engine for builder and extractor tests.

use super::engine::{CandidateContext, LazyCallback, MilpEngine, SolveStatus};
use super::expr::{LinearConstraint, LinearExpr, Sense, Var, VarKind};

/// Records everything a builder adds and replays preset values.
#[derive(Debug)]
pub(crate) struct ScriptedEngine {
    pub names: Vec<String>,
    pub kinds: Vec<VarKind>,
    pub lowers: Vec<f64>,
    pub constraints: Vec<(LinearConstraint, String)>,
    pub objective: Option<(LinearExpr, Sense)>,
    pub values: Vec<Option<f64>>,
    pub lazy: Vec<LinearConstraint>,
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    /// Status reported by the next `optimize`.
    pub next_status: SolveStatus,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            kinds: Vec::new(),
            lowers: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            values: Vec::new(),
            lazy: Vec::new(),
            status: SolveStatus::Loaded,
            objective_value: None,
            next_status: SolveStatus::Optimal,
        }
    }
}

struct Replay<'a> {
    values: &'a [Option<f64>],
    pending: Vec<LinearConstraint>,
}

impl CandidateContext for Replay<'_> {
    fn candidate_value(&self, var: Var) -> f64 {
        self.values.get(var.index()).copied().flatten().unwrap_or(0.0)
    }

    fn add_lazy(&mut self, constraint: LinearConstraint) {
        self.pending.push(constraint);
    }
}

impl ScriptedEngine {
    pub fn var(&self, name: &str) -> Var {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("no variable named {name}"));
        Var(idx)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        let var = self.var(name);
        self.values[var.index()] = Some(value);
    }

    /// Sets every variable without a value to zero.
    pub fn zero_rest(&mut self) {
        for v in &mut self.values {
            v.get_or_insert(0.0);
        }
    }

    pub fn labels_starting_with(&self, prefix: &str) -> usize {
        self.constraints
            .iter()
            .filter(|(_, label)| label.starts_with(prefix))
            .count()
    }

    fn push_var(&mut self, name: &str, kind: VarKind, lower: f64) -> Var {
        let var = Var(self.names.len());
        self.names.push(name.to_string());
        self.kinds.push(kind);
        self.lowers.push(lower);
        self.values.push(None);
        var
    }
}

impl MilpEngine for ScriptedEngine {
    fn add_binary(&mut self, name: &str) -> Var {
        self.push_var(name, VarKind::Binary, 0.0)
    }

    fn add_continuous(&mut self, name: &str, lower: f64) -> Var {
        self.push_var(name, VarKind::Continuous, lower)
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.objective = Some((expr, sense));
    }

    fn add_constraint(&mut self, constraint: LinearConstraint, label: &str) {
        self.constraints.push((constraint, label.to_string()));
    }

    /// Hands the preset values to the callback once.
    fn optimize(&mut self, callback: Option<&mut dyn LazyCallback>) -> SolveStatus {
        if let Some(cb) = callback {
            let mut replay = Replay {
                values: &self.values,
                pending: Vec::new(),
            };
            if cb.on_candidate(&mut replay).is_err() {
                self.status = SolveStatus::Error;
                return self.status;
            }
            let pending = replay.pending;
            self.lazy.extend(pending);
        }
        self.status = self.next_status;
        self.status
    }

    fn status(&self) -> SolveStatus {
        self.status
    }

    fn value(&self, var: Var) -> Option<f64> {
        self.values.get(var.index()).copied().flatten()
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    fn diagnostic(&self) -> Option<&str> {
        None
    }

    fn lazy_constraint_count(&self) -> usize {
        self.lazy.len()
    }

    fn num_vars(&self) -> usize {
        self.names.len()
    }

    fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
