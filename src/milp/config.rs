//! Engine session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied to one engine session.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_milp::milp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(10))
///     .with_max_cut_rounds(500);
/// assert_eq!(config.max_cut_rounds, 500);
/// assert_eq!(config.time_limit, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock budget, checked between lazy-cut rounds. `None` = unlimited.
    ///
    /// Has no effect on solves without a lazy callback, which finish in a
    /// single round.
    pub time_limit: Option<Duration>,
    /// Maximum number of rounds in which a candidate is rejected.
    pub max_cut_rounds: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            max_cut_rounds: 10_000,
        }
    }
}

impl SolverConfig {
    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the maximum number of cut rounds.
    pub fn with_max_cut_rounds(mut self, rounds: usize) -> Self {
        self.max_cut_rounds = rounds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert!(config.time_limit.is_none());
        assert_eq!(config.max_cut_rounds, 10_000);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = SolverConfig::default().with_time_limit(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
