//! Job model.
//!
//! A job is a single non-preemptive unit of work processed by exactly one
//! machine.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

/// A job to be scheduled.
///
/// # Time Representation
/// Times are plain numbers relative to a scheduling epoch (t=0); the caller
/// chooses the unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Earliest start time (request time).
    pub release: f64,
    /// Processing duration.
    pub duration: f64,
    /// Due date used for tardiness. `None` = never tardy.
    pub deadline: Option<f64>,
    /// Tardiness weight. `None` = weight 1.
    pub weight: Option<f64>,
}

impl Job {
    /// Creates a job released at t=0 with no deadline.
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            release: 0.0,
            duration,
            deadline: None,
            weight: None,
        }
    }

    /// Sets the release time.
    pub fn with_release(mut self, release: f64) -> Self {
        self.release = release;
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: f64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the tardiness weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Tardiness weight, defaulting to 1.
    #[inline]
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    /// Tardiness of this job when it finishes at `finish`: `max(0, finish - deadline)`.
    pub fn tardiness_at(&self, finish: f64) -> f64 {
        self.deadline.map_or(0.0, |d| (finish - d).max(0.0))
    }
}
