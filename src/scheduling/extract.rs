//! Schedule extraction shared by the scheduling models.

use crate::error::ExtractionError;
use crate::milp::{MilpEngine, Var, SELECTION_THRESHOLD};
use crate::models::{Job, Machine, ScheduleEntry};

/// Reads the value of `var`, naming it in the error when absent.
pub(crate) fn read<E: MilpEngine + ?Sized>(
    engine: &E,
    var: Var,
    name: impl FnOnce() -> String,
) -> Result<f64, ExtractionError> {
    engine
        .value(var)
        .ok_or_else(|| ExtractionError::MissingValue(name()))
}

/// Index of the single machine whose assignment indicator is set.
///
/// Zero or several set indicators are a data-integrity error; no machine is
/// ever picked arbitrarily.
pub(crate) fn assigned_machine<E: MilpEngine + ?Sized>(
    engine: &E,
    job: &Job,
    indicators: &[Var],
) -> Result<usize, ExtractionError> {
    let mut chosen = Vec::new();
    for (k, &var) in indicators.iter().enumerate() {
        let value = read(engine, var, || format!("assign[{},{k}]", job.id))?;
        if value > SELECTION_THRESHOLD {
            chosen.push(k);
        }
    }
    match chosen.as_slice() {
        [k] => Ok(*k),
        [] => Err(ExtractionError::NoMachine {
            job_id: job.id.clone(),
        }),
        many => Err(ExtractionError::MultipleMachines {
            job_id: job.id.clone(),
            count: many.len(),
        }),
    }
}

/// Entry for `job` started at `start` on `machine`.
pub(crate) fn entry(job: &Job, machine: &Machine, start: f64) -> ScheduleEntry {
    ScheduleEntry::new(&job.id, &machine.id, start, start + job.duration)
}
