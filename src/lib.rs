//! MILP formulations for machine scheduling and traveling-salesman routing.
//!
//! Builds mixed-integer linear programs for two problem families, hands them
//! to a MILP engine and reads the results back as typed schedules and
//! routes. For routing, subtours are eliminated by a branch-and-cut
//! callback that injects cuts lazily.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Machine`, `City`, `Schedule`, `Route`
//! - **`validation`**: Input integrity checks (empty instances, duplicate IDs,
//!   negative or non-finite values)
//! - **`costs`**: Euclidean distance matrix and the scheduling Big-M
//! - **`milp`**: Engine contract (`MilpEngine`, `LazyCallback`), linear
//!   expressions, solver configuration and the `microlp` engine adapter
//! - **`scheduling`**: Parallel-machine and single-machine weighted-tardiness
//!   models with schedule extraction
//! - **`routing`**: MTZ and DFJ TSP models, subtour detection, the lazy cut
//!   injector and route extraction
//! - **`kpi`**: Schedule metrics recomputed from an extracted schedule
//! - **`outcome`**: Status, objective and solution of a solve session
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use u_milp::milp::MicrolpEngine;
//! use u_milp::models::Job;
//! use u_milp::scheduling::WeightedTardinessBuilder;
//!
//! let jobs = vec![
//!     Job::new("J1", 12.0).with_deadline(16.0).with_weight(4.0),
//!     Job::new("J2", 8.0).with_deadline(26.0).with_weight(3.0),
//!     Job::new("J3", 15.0).with_deadline(25.0).with_weight(4.0),
//!     Job::new("J4", 9.0).with_deadline(27.0).with_weight(5.0),
//! ];
//!
//! let mut engine = MicrolpEngine::default();
//! let outcome = WeightedTardinessBuilder::new(&jobs).solve(&mut engine).unwrap();
//! assert!(outcome.is_solved());
//! assert!((outcome.objective.unwrap() - 85.0).abs() < 1e-6);
//! ```
//!
//! # Architecture
//!
//! Builders depend only on the `MilpEngine` trait. Each engine value is one
//! solve session owning its variables, constraints and lazy cuts; nothing is
//! shared between sessions.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Wolsey (1998), "Integer Programming"
//! - Applegate et al. (2006), "The Traveling Salesman Problem: A
//!   Computational Study"

pub mod costs;
pub mod error;
pub mod kpi;
pub mod milp;
pub mod models;
pub mod outcome;
pub mod routing;
pub mod scheduling;
pub mod validation;

pub use error::{Error, ExtractionError, ModelError, SubtourError};
pub use outcome::SolveOutcome;
