//! Schedule quality metrics (KPIs).
//!
//! Recomputes objective values from an extracted schedule and its input
//! jobs, independently of the engine.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Total Start Time | Sum of start times |
//! | Total Tardiness | Sum of max(0, completion - deadline) |
//! | Weighted Tardiness | Sum of weight × tardiness |
//! | Maximum Tardiness | Largest single delay |
//! | On-Time Rate | Fraction meeting deadlines |
//! | Avg Flow Time | Mean time from release to completion |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Job, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: f64,
    /// Sum of start times.
    pub total_start_time: f64,
    /// Sum of tardiness across all jobs.
    pub total_tardiness: f64,
    /// Sum of weight × tardiness (missing weights count as 1).
    pub weighted_tardiness: f64,
    /// Maximum tardiness of any single job.
    pub max_tardiness: f64,
    /// Fraction of jobs completing on time (0.0..1.0).
    pub on_time_rate: f64,
    /// Per-machine utilization over the makespan.
    pub utilization_by_machine: HashMap<String, f64>,
    /// Average flow time: mean(completion - release).
    pub avg_flow_time: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its input jobs.
    ///
    /// Jobs missing from the schedule are ignored.
    pub fn calculate(schedule: &Schedule, jobs: &[Job]) -> Self {
        let mut total_tardiness = 0.0;
        let mut weighted_tardiness = 0.0;
        let mut max_tardiness: f64 = 0.0;
        let mut on_time_count = 0usize;
        let mut total_flow_time = 0.0;
        let mut counted = 0usize;

        for job in jobs {
            let Some(entry) = schedule.entry_for_job(&job.id) else {
                continue;
            };
            counted += 1;
            total_flow_time += entry.finish - job.release;

            // No deadline: on time
            let tardiness = job.tardiness_at(entry.finish);
            if tardiness > 0.0 {
                total_tardiness += tardiness;
                weighted_tardiness += job.effective_weight() * tardiness;
                max_tardiness = max_tardiness.max(tardiness);
            } else {
                on_time_count += 1;
            }
        }

        let on_time_rate = if counted == 0 {
            1.0
        } else {
            on_time_count as f64 / counted as f64
        };

        let avg_flow_time = if counted == 0 {
            0.0
        } else {
            total_flow_time / counted as f64
        };

        Self {
            makespan: schedule.makespan(),
            total_start_time: schedule.total_start_time(),
            total_tardiness,
            weighted_tardiness,
            max_tardiness,
            on_time_rate,
            utilization_by_machine: schedule.all_utilizations(),
            avg_flow_time,
        }
    }

    /// Whether the schedule keeps every job within `max_tardiness` of its
    /// deadline.
    pub fn meets_tardiness(&self, max_tardiness: f64) -> bool {
        self.max_tardiness <= max_tardiness
    }
}
