//! Schedule (solution) model.
//!
//! A schedule assigns every job a machine and a start time. It is produced
//! once, after a solve, and is not modified afterwards.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete schedule.
///
/// Entries keep the job input order; [`Schedule::order`] lists job IDs by
/// start time, ties broken by job ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    order: Vec<String>,
}

/// Placement of one job: machine × time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Scheduled job ID.
    pub job_id: String,
    /// Assigned machine ID.
    pub machine_id: String,
    /// Start time.
    pub start: f64,
    /// Finish time (start + duration).
    pub finish: f64,
}

impl ScheduleEntry {
    /// Creates an entry.
    pub fn new(
        job_id: impl Into<String>,
        machine_id: impl Into<String>,
        start: f64,
        finish: f64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            machine_id: machine_id.into(),
            start,
            finish,
        }
    }

    /// Processing time (finish - start).
    #[inline]
    pub fn duration(&self) -> f64 {
        self.finish - self.start
    }

    /// Whether two entries share a machine and overlap in time.
    ///
    /// Touching intervals (`a.finish == b.start`) do not overlap; `tolerance`
    /// absorbs floating-point noise from the engine.
    pub fn overlaps(&self, other: &ScheduleEntry, tolerance: f64) -> bool {
        self.machine_id == other.machine_id
            && self.start + tolerance < other.finish
            && other.start + tolerance < self.finish
    }
}

/// Grid that start times snap to before jobs are ordered.
const ORDER_GRID: f64 = 1e-6;

fn order_slot(start: f64) -> f64 {
    (start / ORDER_GRID).round()
}

impl Schedule {
    /// Builds a schedule and derives the execution order.
    ///
    /// Starts are snapped to a `1e-6` grid first, so engine noise does not
    /// override the job-ID tie-break.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        let mut sorted: Vec<&ScheduleEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            order_slot(a.start)
                .total_cmp(&order_slot(b.start))
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        let order = sorted.iter().map(|e| e.job_id.clone()).collect();
        Self { entries, order }
    }

    /// Entries in job input order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Job IDs sorted by start time (ties by job ID).
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Finds the entry for a job.
    pub fn entry_for_job(&self, job_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.job_id == job_id)
    }

    /// Entries on one machine, sorted by start time.
    pub fn entries_for_machine(&self, machine_id: &str) -> Vec<&ScheduleEntry> {
        let mut on_machine: Vec<&ScheduleEntry> = self
            .entries
            .iter()
            .filter(|e| e.machine_id == machine_id)
            .collect();
        on_machine.sort_by(|a, b| a.start.total_cmp(&b.start));
        on_machine
    }

    /// Latest finish time (0 for an empty schedule).
    pub fn makespan(&self) -> f64 {
        self.entries.iter().map(|e| e.finish).fold(0.0, f64::max)
    }

    /// Sum of start times.
    pub fn total_start_time(&self) -> f64 {
        self.entries.iter().map(|e| e.start).sum()
    }

    /// Busy time of a machine divided by `horizon`.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn machine_utilization(&self, machine_id: &str, horizon: f64) -> Option<f64> {
        if horizon <= 0.0 {
            return None;
        }
        let busy: f64 = self
            .entries
            .iter()
            .filter(|e| e.machine_id == machine_id)
            .map(|e| e.duration())
            .sum();
        Some(busy / horizon)
    }

    /// Utilization of every machine that has work, over the makespan.
    pub fn all_utilizations(&self) -> HashMap<String, f64> {
        let horizon = self.makespan();
        if horizon <= 0.0 {
            return HashMap::new();
        }
        let mut busy: HashMap<String, f64> = HashMap::new();
        for e in &self.entries {
            *busy.entry(e.machine_id.clone()).or_insert(0.0) += e.duration();
        }
        busy.into_iter().map(|(id, b)| (id, b / horizon)).collect()
    }

    /// Whether any two jobs overlap on the same machine.
    pub fn has_overlap(&self, tolerance: f64) -> bool {
        self.entries.iter().enumerate().any(|(i, a)| {
            self.entries[i + 1..]
                .iter()
                .any(|b| a.overlaps(b, tolerance))
        })
    }

    /// Number of scheduled jobs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        Schedule::from_entries(vec![
            ScheduleEntry::new("J1", "M1", 0.0, 5.0),
            ScheduleEntry::new("J2", "M2", 1.0, 4.0),
            ScheduleEntry::new("J3", "M1", 5.0, 8.0),
        ])
    }

    #[test]
    fn test_makespan_and_total_start() {
        let s = sample_schedule();
        assert_eq!(s.makespan(), 8.0);
        assert_eq!(s.total_start_time(), 6.0);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_order_by_start_then_id() {
        let s = Schedule::from_entries(vec![
            ScheduleEntry::new("J3", "M1", 2.0, 4.0),
            ScheduleEntry::new("J2", "M2", 0.0, 1.0),
            ScheduleEntry::new("J1", "M1", 0.0, 2.0),
        ]);
        assert_eq!(s.order(), &["J1", "J2", "J3"]);
        // entries keep input order
        assert_eq!(s.entries()[0].job_id, "J3");
    }

    #[test]
    fn test_near_equal_starts_tie_break_by_id() {
        let s = Schedule::from_entries(vec![
            ScheduleEntry::new("J1", "M1", 2.0000000000003, 5.0),
            ScheduleEntry::new("J2", "M2", 1.9999999999997, 4.0),
            ScheduleEntry::new("J3", "M1", 1.5, 2.0),
        ]);
        assert_eq!(s.order(), &["J3", "J1", "J2"]);
    }

    #[test]
    fn test_entry_lookup() {
        let s = sample_schedule();
        assert_eq!(s.entry_for_job("J2").unwrap().machine_id, "M2");
        assert!(s.entry_for_job("J99").is_none());
        let m1 = s.entries_for_machine("M1");
        assert_eq!(m1.len(), 2);
        assert_eq!(m1[0].job_id, "J1");
    }

    #[test]
    fn test_utilization() {
        let s = sample_schedule();
        assert!((s.machine_utilization("M1", 8.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((s.machine_utilization("M2", 8.0).unwrap() - 0.375).abs() < 1e-12);
        assert!(s.machine_utilization("M1", 0.0).is_none());

        let all = s.all_utilizations();
        assert!((all["M1"] - 1.0).abs() < 1e-12);
        assert!((all["M2"] - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_detection() {
        let s = sample_schedule();
        assert!(!s.has_overlap(1e-6));

        let clash = Schedule::from_entries(vec![
            ScheduleEntry::new("J1", "M1", 0.0, 5.0),
            ScheduleEntry::new("J2", "M1", 4.0, 6.0),
        ]);
        assert!(clash.has_overlap(1e-6));
    }

    #[test]
    fn test_zero_duration_entry() {
        let s = Schedule::from_entries(vec![
            ScheduleEntry::new("J1", "M1", 3.0, 3.0),
            ScheduleEntry::new("J2", "M1", 3.0, 7.0),
        ]);
        assert!(!s.has_overlap(1e-6));
        assert_eq!(s.entry_for_job("J1").unwrap().duration(), 0.0);
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::default();
        assert!(s.is_empty());
        assert_eq!(s.makespan(), 0.0);
        assert!(s.all_utilizations().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let s = sample_schedule();
        let json = serde_json::to_string(&s).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
