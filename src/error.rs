//! Error types.
//!
//! Engine failures are not errors at this level: they are reported as a
//! [`SolveStatus`](crate::milp::SolveStatus) on the solve outcome. The types
//! here cover malformed input, broken detector preconditions and
//! inconsistent engine results.

use crate::milp::CallbackError;
use crate::validation::ValidationError;

/// Failure while assembling a model, before any engine call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The instance failed validation.
    #[error("invalid instance: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),
    /// The formulation cannot express an instance this small.
    #[error("{formulation} needs at least {min} cities, got {got}")]
    TooFewCities {
        /// Formulation name.
        formulation: &'static str,
        /// Minimum supported city count.
        min: usize,
        /// Actual city count.
        got: usize,
    },
}

impl From<Vec<ValidationError>> for ModelError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ModelError::Invalid(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A selected-arc set that does not decompose into disjoint cycles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubtourError {
    /// An arc references a city index outside the instance.
    #[error("arc endpoint {city} out of range for {cities} cities")]
    UnknownCity {
        /// Offending index.
        city: usize,
        /// Instance size.
        cities: usize,
    },
    /// A city has no selected outgoing arc.
    #[error("city {city} has no successor")]
    MissingSuccessor {
        /// City index.
        city: usize,
    },
    /// A city has more than one selected outgoing arc.
    #[error("city {city} has more than one successor")]
    DuplicateSuccessor {
        /// City index.
        city: usize,
    },
    /// Two cities share a successor, so the walk from `city` never closes.
    #[error("walk from city {city} does not return to its start")]
    OpenWalk {
        /// Start of the walk.
        city: usize,
    },
    /// In an undirected selection, a city does not have exactly two edges.
    #[error("city {city} has degree {degree}, expected 2")]
    WrongDegree {
        /// City index.
        city: usize,
        /// Number of selected edges at the city.
        degree: usize,
    },
}

impl From<SubtourError> for CallbackError {
    fn from(err: SubtourError) -> Self {
        CallbackError(err.to_string())
    }
}

/// Engine values that cannot be turned into a schedule or route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    /// The engine holds no value for a variable the extractor needs.
    #[error("no value for {0}")]
    MissingValue(String),
    /// No machine-assignment indicator is set for a job.
    #[error("job '{job_id}' is not assigned to any machine")]
    NoMachine {
        /// Job ID.
        job_id: String,
    },
    /// More than one machine-assignment indicator is set for a job.
    #[error("job '{job_id}' is assigned to {count} machines")]
    MultipleMachines {
        /// Job ID.
        job_id: String,
        /// Number of indicators set.
        count: usize,
    },
    /// The selected arcs form more than one cycle.
    #[error("selected arcs form {cycles} cycles (shortest has {shortest} of {cities} cities)")]
    NotHamiltonian {
        /// Number of cycles.
        cycles: usize,
        /// Size of the shortest cycle.
        shortest: usize,
        /// Instance size.
        cities: usize,
    },
    /// The selected arcs do not even decompose into cycles.
    #[error(transparent)]
    Subtour(#[from] SubtourError),
}

/// Top-level error of the solve entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The model could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The engine result could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
