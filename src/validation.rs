//! Input validation for scheduling and routing instances.
//!
//! Checks structural integrity before any model is handed to an engine.
//! Detects:
//! - Empty job, machine or city lists
//! - Duplicate IDs
//! - Negative durations, release times, weights or availability times
//! - Non-finite numbers (NaN, infinities)
//!
//! All problems are collected, not just the first one.

use crate::models::{City, Job, Machine};
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required list is empty.
    EmptyInstance,
    /// Two entities share the same ID.
    DuplicateId,
    /// A quantity that must be non-negative is negative.
    NegativeValue,
    /// A quantity is NaN or infinite.
    NonFiniteValue,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn check_quantity(
    errors: &mut Vec<ValidationError>,
    owner: &str,
    field: &str,
    value: f64,
    non_negative: bool,
) {
    if !value.is_finite() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonFiniteValue,
            format!("{owner}: {field} is not finite ({value})"),
        ));
    } else if non_negative && value < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("{owner}: {field} is negative ({value})"),
        ));
    }
}

/// Validates a machine scheduling instance.
///
/// Checks:
/// 1. At least one job and one machine
/// 2. No duplicate job IDs, no duplicate machine IDs
/// 3. Durations, release times, weights and availability times are finite
///    and non-negative
/// 4. Deadlines are finite (a deadline may be negative: the job is late
///    whatever happens)
pub fn validate_jobs(jobs: &[Job], machines: &[Machine]) -> ValidationResult {
    let mut errors = Vec::new();

    if jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance has no jobs",
        ));
    }
    if machines.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance has no machines",
        ));
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        let owner = format!("Job '{}'", job.id);
        check_quantity(&mut errors, &owner, "duration", job.duration, true);
        check_quantity(&mut errors, &owner, "release time", job.release, true);
        if let Some(deadline) = job.deadline {
            check_quantity(&mut errors, &owner, "deadline", deadline, false);
        }
        if let Some(weight) = job.weight {
            check_quantity(&mut errors, &owner, "weight", weight, true);
        }
    }

    let mut machine_ids = HashSet::new();
    for machine in machines {
        if !machine_ids.insert(machine.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate machine ID: {}", machine.id),
            ));
        }
        let owner = format!("Machine '{}'", machine.id);
        check_quantity(&mut errors, &owner, "available time", machine.available_at, true);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a routing instance.
///
/// Checks:
/// 1. At least one city
/// 2. No duplicate city IDs
/// 3. Coordinates are finite
pub fn validate_cities(cities: &[City]) -> ValidationResult {
    let mut errors = Vec::new();

    if cities.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance has no cities",
        ));
    }

    let mut ids = HashSet::new();
    for city in cities {
        if !ids.insert(city.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate city ID: {}", city.id),
            ));
        }
        let owner = format!("City '{}'", city.id);
        check_quantity(&mut errors, &owner, "x", city.x, false);
        check_quantity(&mut errors, &owner, "y", city.y, false);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
