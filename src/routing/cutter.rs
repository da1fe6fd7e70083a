//! Lazy subtour elimination (the branch-and-cut callback).
//!
//! # State machine
//!
//! - **Idle** → on an integer-feasible candidate → **Checking**
//! - **Checking**: decompose the selected arcs. A single cycle covering all
//!   cities is accepted and the search continues unchanged. Otherwise →
//!   **Cutting**
//! - **Cutting**: inject the elimination constraint of the shortest cycle,
//!   then back to **Idle**
//!
//! The cutter only reads the candidate; its single side effect on the
//! engine is the injected constraint.

use log::debug;

use super::arcs::{ArcKind, ArcVars};
use super::subtour::{decompose_directed, decompose_undirected, Subtours};
use crate::error::SubtourError;
use crate::milp::{CallbackError, CandidateContext, LazyCallback};

/// Verdict on one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutDecision {
    /// The candidate is a single tour.
    Accept,
    /// The candidate contains subtours; cut the carried (shortest) one.
    Cut(Vec<usize>),
}

/// Counters of one solve session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutStats {
    /// Candidates inspected.
    pub candidates: usize,
    /// Candidates accepted.
    pub accepted: usize,
    /// Elimination constraints injected.
    pub cuts: usize,
}

/// [`LazyCallback`] eliminating the shortest subtour of each candidate.
#[derive(Debug)]
pub struct SubtourCutter<'a> {
    arcs: &'a ArcVars,
    stats: CutStats,
}

impl<'a> SubtourCutter<'a> {
    /// Creates a cutter over the arc table of one model.
    pub fn new(arcs: &'a ArcVars) -> Self {
        Self {
            arcs,
            stats: CutStats::default(),
        }
    }

    /// Session counters.
    pub fn stats(&self) -> CutStats {
        self.stats
    }

    /// Decomposes the candidate's selected arcs into cycles.
    ///
    /// The candidate must satisfy the static degree constraints; anything
    /// else is reported as a [`SubtourError`].
    pub fn subtours(&self, ctx: &dyn CandidateContext) -> Result<Subtours, SubtourError> {
        let selected = self.arcs.selected(|var| ctx.candidate_value(var));
        match self.arcs.kind() {
            ArcKind::Directed => decompose_directed(self.arcs.cities(), &selected),
            ArcKind::Undirected => decompose_undirected(self.arcs.cities(), &selected),
        }
    }

    /// Decides whether the candidate is accepted.
    pub fn check(&self, ctx: &dyn CandidateContext) -> Result<CutDecision, SubtourError> {
        let subtours = self.subtours(ctx)?;
        if subtours.is_hamiltonian() {
            Ok(CutDecision::Accept)
        } else {
            Ok(CutDecision::Cut(subtours.shortest().to_vec()))
        }
    }
}

impl LazyCallback for SubtourCutter<'_> {
    fn on_candidate(&mut self, ctx: &mut dyn CandidateContext) -> Result<(), CallbackError> {
        self.stats.candidates += 1;
        match self.check(ctx)? {
            CutDecision::Accept => {
                self.stats.accepted += 1;
                debug!("candidate {} accepted as a tour", self.stats.candidates);
            }
            CutDecision::Cut(cycle) => {
                debug!(
                    "candidate {} rejected: subtour of {} of {} cities {:?}",
                    self.stats.candidates,
                    cycle.len(),
                    self.arcs.cities(),
                    cycle
                );
                ctx.add_lazy(self.arcs.elimination_cut(&cycle));
                self.stats.cuts += 1;
            }
        }
        Ok(())
    }
}
