//! Machine scheduling models.
//!
//! Big-M disjunctive formulations: a binary precedence indicator per
//! unordered job pair switches between the two no-overlap inequalities.
//!
//! # Models
//!
//! | Builder | Problem | Objective |
//! |---------|---------|-----------|
//! | [`ParallelMachineBuilder`] | P \| r_j \| Σ S_j | total start time, or makespan |
//! | [`WeightedTardinessBuilder`] | 1 \|\| Σ w_j T_j | total weighted tardiness |
//!
//! Each builder validates its instance, adds the model to a
//! [`MilpEngine`](crate::milp::MilpEngine) and returns typed handles that
//! extract a [`Schedule`](crate::models::Schedule) from the incumbent.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-5
//! - Balas (1985), "On the facial structure of scheduling polyhedra"

mod extract;
mod parallel;
mod tardiness;

pub use parallel::{ParallelMachineBuilder, ParallelMachineModel, PmspObjective};
pub use tardiness::{WeightedTardinessBuilder, WeightedTardinessModel};
