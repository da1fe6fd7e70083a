//! Typed arc-variable table.

use crate::milp::{LinearConstraint, LinearExpr, MilpEngine, Var, SELECTION_THRESHOLD};
use crate::models::City;

/// Orientation of the arc variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// One variable per ordered pair `i != j`.
    Directed,
    /// One variable per unordered pair `{i, j}`, shared by both directions.
    Undirected,
}

/// Arc-selection variables of a routing model, indexed by city position.
#[derive(Debug, Clone)]
pub struct ArcVars {
    n: usize,
    kind: ArcKind,
    vars: Vec<Option<Var>>,
}

impl ArcVars {
    /// Adds `x[i,j]` for every ordered pair of distinct cities.
    pub fn directed<E: MilpEngine + ?Sized>(engine: &mut E, cities: &[City]) -> Self {
        let n = cities.len();
        let mut vars = vec![None; n * n];
        for (i, a) in cities.iter().enumerate() {
            for (j, b) in cities.iter().enumerate() {
                if i != j {
                    vars[i * n + j] = Some(engine.add_binary(&format!("x[{},{}]", a.id, b.id)));
                }
            }
        }
        Self {
            n,
            kind: ArcKind::Directed,
            vars,
        }
    }

    /// Adds `e[i,j]` for every unordered pair of distinct cities.
    pub fn undirected<E: MilpEngine + ?Sized>(engine: &mut E, cities: &[City]) -> Self {
        let n = cities.len();
        let mut vars = vec![None; n * n];
        for (i, a) in cities.iter().enumerate() {
            for (j, b) in cities.iter().enumerate().skip(i + 1) {
                let var = engine.add_binary(&format!("e[{},{}]", a.id, b.id));
                vars[i * n + j] = Some(var);
                vars[j * n + i] = Some(var);
            }
        }
        Self {
            n,
            kind: ArcKind::Undirected,
            vars,
        }
    }

    /// Number of cities.
    pub fn cities(&self) -> usize {
        self.n
    }

    /// Orientation.
    pub fn kind(&self) -> ArcKind {
        self.kind
    }

    /// Variable of the arc `i -> j` (or edge `{i, j}`).
    pub fn get(&self, i: usize, j: usize) -> Option<Var> {
        if i >= self.n || j >= self.n {
            return None;
        }
        self.vars[i * self.n + j]
    }

    /// Distinct variables with their endpoints; undirected edges are listed
    /// once, with `i < j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Var)> + '_ {
        let n = self.n;
        let undirected = self.kind == ArcKind::Undirected;
        (0..n)
            .flat_map(move |i| (0..n).map(move |j| (i, j)))
            .filter(move |&(i, j)| !undirected || i < j)
            .filter_map(move |(i, j)| self.get(i, j).map(|v| (i, j, v)))
    }

    /// Variables leaving city `i` (every edge at `i` when undirected).
    pub fn outgoing(&self, i: usize) -> Vec<Var> {
        (0..self.n).filter_map(|j| self.get(i, j)).collect()
    }

    /// Variables entering city `j`.
    pub fn incoming(&self, j: usize) -> Vec<Var> {
        (0..self.n).filter_map(|i| self.get(i, j)).collect()
    }

    /// Arcs whose value exceeds [`SELECTION_THRESHOLD`], in table order.
    pub fn selected(&self, mut value: impl FnMut(Var) -> f64) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, var)| value(var) > SELECTION_THRESHOLD)
            .map(|(i, j, _)| (i, j))
            .collect()
    }

    /// Subtour elimination constraint for the city set `cycle`:
    /// at most `|cycle| - 1` of the arcs inside the set may be selected.
    ///
    /// Directed tables sum over every ordered pair in the set, undirected
    /// tables over every unordered pair.
    pub fn elimination_cut(&self, cycle: &[usize]) -> LinearConstraint {
        let mut expr = LinearExpr::new();
        for (a, &i) in cycle.iter().enumerate() {
            for (b, &j) in cycle.iter().enumerate() {
                let inside = match self.kind {
                    ArcKind::Directed => a != b,
                    ArcKind::Undirected => a < b,
                };
                if let Some(var) = self.get(i, j).filter(|_| inside) {
                    expr.add_term(var, 1.0);
                }
            }
        }
        expr.le(cycle.len() as f64 - 1.0)
    }
}
