//! Linear expressions and constraints over typed variable handles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle to a decision variable owned by one engine session.
///
/// Handles are issued in creation order and are only meaningful for the
/// engine that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Var(pub(crate) usize);

impl Var {
    /// Position of the variable in the engine's creation sequence.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// 0/1 variable.
    Binary,
    /// Real-valued variable with a lower bound.
    Continuous,
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective.
    Maximize,
}

/// Relation between the left-hand side and the right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cmp {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

/// A weighted sum of variables plus a constant.
///
/// # Examples
///
/// ```
/// use u_milp::milp::{LinearExpr, MilpEngine, MicrolpEngine};
///
/// let mut engine = MicrolpEngine::default();
/// let x = engine.add_binary("x");
/// let y = engine.add_continuous("y", 0.0);
///
/// let expr = LinearExpr::new().term(x, 2.0).term(y, 1.0).term(x, 1.0).constant(5.0);
/// let normalized = expr.normalized();
/// assert_eq!(normalized.terms(), &[(x, 3.0), (y, 1.0)]);
/// assert_eq!(normalized.constant_value(), 5.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    terms: Vec<(Var, f64)>,
    constant: f64,
}

impl LinearExpr {
    /// Creates the zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = Var>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Adds `coeff * var`.
    pub fn term(mut self, var: Var, coeff: f64) -> Self {
        self.terms.push((var, coeff));
        self
    }

    /// Adds a constant offset.
    pub fn constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    /// In-place variant of [`LinearExpr::term`].
    pub fn add_term(&mut self, var: Var, coeff: f64) {
        self.terms.push((var, coeff));
    }

    /// Raw terms, possibly with repeated variables.
    pub fn terms(&self) -> &[(Var, f64)] {
        &self.terms
    }

    /// Constant offset.
    pub fn constant_value(&self) -> f64 {
        self.constant
    }

    /// Merges repeated variables, drops zero coefficients and sorts by handle.
    pub fn normalized(&self) -> Self {
        let mut merged: BTreeMap<Var, f64> = BTreeMap::new();
        for &(var, coeff) in &self.terms {
            *merged.entry(var).or_insert(0.0) += coeff;
        }
        Self {
            terms: merged.into_iter().filter(|&(_, c)| c != 0.0).collect(),
            constant: self.constant,
        }
    }

    /// Evaluates the expression against a value lookup.
    pub fn evaluate(&self, mut value: impl FnMut(Var) -> f64) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| coeff * value(var))
            .sum::<f64>()
            + self.constant
    }

    /// `self <= rhs`
    pub fn le(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Cmp::Le, rhs)
    }

    /// `self >= rhs`
    pub fn ge(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Cmp::Ge, rhs)
    }

    /// `self == rhs`
    pub fn equals(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Cmp::Eq, rhs)
    }
}

/// A linear inequality or equality `expr (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub cmp: Cmp,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Creates a constraint.
    pub fn new(expr: LinearExpr, cmp: Cmp, rhs: f64) -> Self {
        Self { expr, cmp, rhs }
    }

    /// Folds the expression constant into the right-hand side and merges
    /// repeated variables.
    pub fn normalized(&self) -> Self {
        let expr = self.expr.normalized();
        let rhs = self.rhs - expr.constant;
        Self {
            expr: LinearExpr {
                terms: expr.terms,
                constant: 0.0,
            },
            cmp: self.cmp,
            rhs,
        }
    }

    /// Whether the constraint holds for the given values, within `tolerance`.
    pub fn is_satisfied(&self, value: impl FnMut(Var) -> f64, tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(value);
        match self.cmp {
            Cmp::Le => lhs <= self.rhs + tolerance,
            Cmp::Ge => lhs >= self.rhs - tolerance,
            Cmp::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }

    /// Canonical identity used to recognise semantically identical constraints.
    ///
    /// Coefficients and the right-hand side are compared bit-for-bit after
    /// normalization.
    pub(crate) fn key(&self) -> ConstraintKey {
        let n = self.normalized();
        ConstraintKey {
            terms: n
                .expr
                .terms
                .iter()
                .map(|&(v, c)| (v, (c + 0.0).to_bits()))
                .collect(),
            cmp: n.cmp,
            rhs: (n.rhs + 0.0).to_bits(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ConstraintKey {
    terms: Vec<(Var, u64)>,
    cmp: Cmp,
    rhs: u64,
}
