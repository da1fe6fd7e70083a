//! Result of one solve session.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ExtractionError};
use crate::milp::{MilpEngine, SolveStatus};

/// Engine status, objective and extracted solution of a solve.
///
/// `solution` is always present for [`SolveStatus::Optimal`]. After a limit
/// it holds the best-effort extraction of the incumbent, if the engine had
/// one. Infeasible and failed sessions carry no solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome<T> {
    /// Terminal engine status.
    pub status: SolveStatus,
    /// Objective value of the incumbent.
    pub objective: Option<f64>,
    /// Extracted schedule or route.
    pub solution: Option<T>,
    /// Number of lazy constraints injected during the session.
    pub lazy_cuts: usize,
    /// Engine diagnostic for non-optimal terminations.
    pub diagnostic: Option<String>,
}

impl<T> SolveOutcome<T> {
    /// Outcome of a session that needed no engine call.
    pub fn trivial(solution: T, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective: Some(objective),
            solution: Some(solution),
            lazy_cuts: 0,
            diagnostic: None,
        }
    }

    /// Whether the session proved optimality and produced a solution.
    pub fn is_solved(&self) -> bool {
        self.status.is_optimal() && self.solution.is_some()
    }

    /// Whether the engine status is [`SolveStatus::Optimal`].
    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Whether a solution is present, optimal or not.
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Maps the solution, keeping status and statistics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SolveOutcome<U> {
        SolveOutcome {
            status: self.status,
            objective: self.objective,
            solution: self.solution.map(f),
            lazy_cuts: self.lazy_cuts,
            diagnostic: self.diagnostic,
        }
    }
}

/// Reads the session result out of a finished engine.
///
/// Extraction failures after an optimal status are defects and surface as
/// errors. After a limit, a failed best-effort extraction only drops the
/// solution.
pub(crate) fn conclude<E, T>(
    engine: &E,
    extract: impl FnOnce(&E) -> Result<T, ExtractionError>,
) -> Result<SolveOutcome<T>, Error>
where
    E: MilpEngine + ?Sized,
{
    let status = engine.status();
    let solution = match status {
        SolveStatus::Optimal => Some(extract(engine)?),
        s if s.is_limit() && engine.objective_value().is_some() => match extract(engine) {
            Ok(solution) => Some(solution),
            Err(err) => {
                warn!("best-effort extraction after {s} failed: {err}");
                None
            }
        },
        _ => None,
    };

    Ok(SolveOutcome {
        status,
        objective: engine.objective_value(),
        solution,
        lazy_cuts: engine.lazy_constraint_count(),
        diagnostic: engine.diagnostic().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::testing::ScriptedEngine;

    fn finished(status: SolveStatus, objective: Option<f64>) -> ScriptedEngine {
        let mut engine = ScriptedEngine {
            next_status: status,
            objective_value: objective,
            ..Default::default()
        };
        engine.optimize(None);
        engine
    }

    #[test]
    fn test_optimal_requires_extraction() {
        let engine = finished(SolveStatus::Optimal, Some(4.0));
        let outcome = conclude(&engine, |_| Ok(7)).unwrap();
        assert!(outcome.is_solved());
        assert_eq!(outcome.solution, Some(7));
        assert_eq!(outcome.objective, Some(4.0));

        let err = conclude(&engine, |_| -> Result<(), _> {
            Err(ExtractionError::MissingValue("x".into()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_limit_is_best_effort() {
        let engine = finished(SolveStatus::TimeLimit, Some(10.0));
        let outcome = conclude(&engine, |_| Ok("partial")).unwrap();
        assert!(!outcome.is_solved());
        assert!(outcome.has_solution());

        let outcome = conclude(&engine, |_| -> Result<(), _> {
            Err(ExtractionError::MissingValue("x".into()))
        })
        .unwrap();
        assert!(!outcome.has_solution());
    }

    #[test]
    fn test_limit_without_incumbent() {
        let engine = finished(SolveStatus::CutLimit, None);
        let outcome = conclude(&engine, |_| Ok(1)).unwrap();
        assert!(outcome.solution.is_none());
    }

    #[test]
    fn test_infeasible_skips_extraction() {
        let engine = finished(SolveStatus::Infeasible, None);
        let outcome = conclude(&engine, |_| -> Result<i32, ExtractionError> {
            panic!("must not extract")
        })
        .unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(!outcome.is_optimal());
    }

    #[test]
    fn test_trivial_and_map() {
        let outcome = SolveOutcome::trivial(vec![1, 2], 0.0).map(|v| v.len());
        assert!(outcome.is_solved());
        assert_eq!(outcome.solution, Some(2));
        assert_eq!(outcome.lazy_cuts, 0);
    }

    #[test]
    fn test_json_round_trip() {
        let outcome = SolveOutcome::trivial("route".to_string(), 4.0);
        let json = serde_json::to_string(&outcome).unwrap();
        let back: SolveOutcome<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
