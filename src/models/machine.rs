//! Machine model.

use serde::{Deserialize, Serialize};

/// A machine that processes one job at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
    /// Earliest time the machine can start any job.
    pub available_at: f64,
}

impl Machine {
    /// Creates a machine available from t=0.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            available_at: 0.0,
        }
    }

    /// Sets the earliest available time.
    pub fn with_available_at(mut self, time: f64) -> Self {
        self.available_at = time;
        self
    }
}
