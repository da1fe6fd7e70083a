//! Single-machine total weighted tardiness (1 || Σ w_j T_j).

use std::collections::BTreeMap;

use log::debug;

use super::extract;
use crate::costs::big_m;
use crate::error::{Error, ExtractionError, ModelError};
use crate::milp::{LinearExpr, MilpEngine, Sense, Var};
use crate::models::{Job, Machine, Schedule};
use crate::outcome::{conclude, SolveOutcome};
use crate::validation::validate_jobs;

/// Builds the single-machine weighted-tardiness MILP.
///
/// Variables are `x[i,j]` (binary, `i < j`, job `i` before job `j`),
/// `start[j] >= 0` and, for jobs with a deadline, `tardiness[j] >= 0`.
/// Jobs without a deadline are never tardy. Jobs without a weight count
/// with weight 1.
///
/// # Examples
///
/// ```
/// use u_milp::milp::MicrolpEngine;
/// use u_milp::models::Job;
/// use u_milp::scheduling::WeightedTardinessBuilder;
///
/// let jobs = vec![
///     Job::new("J1", 4.0).with_deadline(4.0).with_weight(1.0),
///     Job::new("J2", 2.0).with_deadline(2.0).with_weight(3.0),
/// ];
/// let mut engine = MicrolpEngine::default();
/// let outcome = WeightedTardinessBuilder::new(&jobs).solve(&mut engine).unwrap();
/// // J2 first (on time), J1 finishes at 6: tardiness 2
/// assert!((outcome.objective.unwrap() - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedTardinessBuilder<'a> {
    jobs: &'a [Job],
    machine: Machine,
}

/// Handles of a built weighted-tardiness model.
#[derive(Debug, Clone)]
pub struct WeightedTardinessModel {
    jobs: Vec<Job>,
    machine: Machine,
    precedes: BTreeMap<(usize, usize), Var>,
    start: Vec<Var>,
    tardiness: Vec<Option<Var>>,
    big_m: f64,
}

impl<'a> WeightedTardinessBuilder<'a> {
    /// Creates a builder on a default machine `M0` available at time 0.
    pub fn new(jobs: &'a [Job]) -> Self {
        Self {
            jobs,
            machine: Machine::new("M0"),
        }
    }

    /// Uses `machine` instead of the default one.
    pub fn with_machine(mut self, machine: Machine) -> Self {
        self.machine = machine;
        self
    }

    /// Validates the instance and adds the model to `engine`.
    pub fn build<E: MilpEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> Result<WeightedTardinessModel, ModelError> {
        let machines = std::slice::from_ref(&self.machine);
        validate_jobs(self.jobs, machines)?;

        let jobs = self.jobs;
        let m = big_m(jobs, machines);

        let mut precedes = BTreeMap::new();
        for i in 0..jobs.len() {
            for j in (i + 1)..jobs.len() {
                let var = engine.add_binary(&format!("x[{},{}]", jobs[i].id, jobs[j].id));
                precedes.insert((i, j), var);
            }
        }

        let start: Vec<Var> = jobs
            .iter()
            .map(|job| engine.add_continuous(&format!("start[{}]", job.id), 0.0))
            .collect();

        let tardiness: Vec<Option<Var>> = jobs
            .iter()
            .map(|job| {
                job.deadline
                    .map(|_| engine.add_continuous(&format!("tardiness[{}]", job.id), 0.0))
            })
            .collect();

        let mut objective = LinearExpr::new();
        for (job, t) in jobs.iter().zip(&tardiness) {
            if let Some(t) = *t {
                objective.add_term(t, job.effective_weight());
            }
        }
        engine.set_objective(objective, Sense::Minimize);

        for (&(i, j), &x) in &precedes {
            engine.add_constraint(
                LinearExpr::new()
                    .term(start[j], 1.0)
                    .term(start[i], -1.0)
                    .term(x, -m)
                    .ge(jobs[i].duration - m),
                &format!("no overlap[{},{}]", jobs[i].id, jobs[j].id),
            );
            engine.add_constraint(
                LinearExpr::new()
                    .term(start[i], 1.0)
                    .term(start[j], -1.0)
                    .term(x, m)
                    .ge(jobs[j].duration),
                &format!("no overlap[{},{}]", jobs[j].id, jobs[i].id),
            );
        }

        for (i, job) in jobs.iter().enumerate() {
            let earliest = job.release.max(self.machine.available_at);
            if earliest > 0.0 {
                engine.add_constraint(
                    LinearExpr::sum([start[i]]).ge(earliest),
                    &format!("release[{}]", job.id),
                );
            }
            if let (Some(deadline), Some(t)) = (job.deadline, tardiness[i]) {
                // T >= start + p - d
                engine.add_constraint(
                    LinearExpr::new()
                        .term(t, 1.0)
                        .term(start[i], -1.0)
                        .ge(job.duration - deadline),
                    &format!("deadline[{}]", job.id),
                );
            }
        }

        debug!(
            "weighted-tardiness model: {} jobs, {} vars, {} constraints, M = {m}",
            jobs.len(),
            engine.num_vars(),
            engine.num_constraints()
        );

        Ok(WeightedTardinessModel {
            jobs: jobs.to_vec(),
            machine: self.machine.clone(),
            precedes,
            start,
            tardiness,
            big_m: m,
        })
    }

    /// Builds, optimizes and extracts in one session.
    pub fn solve<E: MilpEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> Result<SolveOutcome<Schedule>, Error> {
        let model = self.build(engine)?;
        engine.optimize(None);
        conclude(engine, |e| model.extract(e))
    }
}

impl WeightedTardinessModel {
    /// Big-M used by the no-overlap constraints.
    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    /// Precedence variable of the pair `{i, j}`; reads 1 when the lower
    /// index goes first.
    pub fn precedence_var(&self, i: usize, j: usize) -> Option<Var> {
        self.precedes.get(&(i.min(j), i.max(j))).copied()
    }

    /// Start-time variable of job `i`.
    pub fn start_var(&self, i: usize) -> Option<Var> {
        self.start.get(i).copied()
    }

    /// Tardiness variable of job `i`, present when the job has a deadline.
    pub fn tardiness_var(&self, i: usize) -> Option<Var> {
        self.tardiness.get(i).copied().flatten()
    }

    /// Reads the schedule out of the engine incumbent.
    pub fn extract<E: MilpEngine + ?Sized>(&self, engine: &E) -> Result<Schedule, ExtractionError> {
        let entries = self
            .jobs
            .iter()
            .zip(&self.start)
            .map(|(job, &var)| {
                let start = extract::read(engine, var, || format!("start[{}]", job.id))?;
                Ok(extract::entry(job, &self.machine, start))
            })
            .collect::<Result<Vec<_>, ExtractionError>>()?;
        Ok(Schedule::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::ScheduleKpi;
    use crate::milp::testing::ScriptedEngine;
    use crate::milp::{MicrolpEngine, SolveStatus};

    const TOL: f64 = 1e-6;

    fn four_jobs() -> Vec<Job> {
        [
            ("J1", 12.0, 16.0, 4.0),
            ("J2", 8.0, 26.0, 3.0),
            ("J3", 15.0, 25.0, 4.0),
            ("J4", 9.0, 27.0, 5.0),
        ]
        .iter()
        .map(|&(id, p, d, w)| Job::new(id, p).with_deadline(d).with_weight(w))
        .collect()
    }

    #[test]
    fn test_model_structure() {
        let jobs = four_jobs();
        let mut engine = ScriptedEngine::default();
        let model = WeightedTardinessBuilder::new(&jobs).build(&mut engine).unwrap();

        // 6 x + 4 start + 4 tardiness
        assert_eq!(engine.num_vars(), 14);
        assert_eq!(engine.labels_starting_with("no overlap"), 12);
        assert_eq!(engine.labels_starting_with("deadline"), 4);
        assert_eq!(engine.labels_starting_with("release"), 0);
        assert_eq!(model.big_m(), 44.0);
        assert_eq!(model.precedence_var(3, 1), model.precedence_var(1, 3));
        assert!(model.tardiness_var(0).is_some());
    }

    #[test]
    fn test_job_without_deadline_has_no_tardiness() {
        let jobs = vec![Job::new("J1", 3.0), Job::new("J2", 1.0).with_deadline(1.0)];
        let mut engine = ScriptedEngine::default();
        let model = WeightedTardinessBuilder::new(&jobs).build(&mut engine).unwrap();
        assert!(model.tardiness_var(0).is_none());
        assert!(model.tardiness_var(1).is_some());
        let (objective, _) = engine.objective.as_ref().unwrap();
        assert_eq!(objective.terms().len(), 1);
    }

    #[test]
    fn test_four_job_instance_optimum() {
        let jobs = four_jobs();
        let mut engine = MicrolpEngine::default();
        let outcome = WeightedTardinessBuilder::new(&jobs).solve(&mut engine).unwrap();

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.objective.unwrap() - 85.0).abs() < TOL);

        let schedule = outcome.solution.unwrap();
        assert!(!schedule.has_overlap(TOL));
        let kpi = ScheduleKpi::calculate(&schedule, &jobs);
        assert!((kpi.weighted_tardiness - 85.0).abs() < TOL);
        assert!((kpi.makespan - 44.0).abs() < TOL);
    }

    #[test]
    fn test_objective_is_reproducible() {
        let jobs = four_jobs();
        let objectives: Vec<f64> = (0..2)
            .map(|_| {
                let mut engine = MicrolpEngine::default();
                WeightedTardinessBuilder::new(&jobs)
                    .solve(&mut engine)
                    .unwrap()
                    .objective
                    .unwrap()
            })
            .collect();
        assert!((objectives[0] - objectives[1]).abs() < TOL);
    }

    #[test]
    fn test_release_and_machine_availability() {
        let jobs = vec![
            Job::new("J1", 2.0).with_deadline(3.0).with_release(4.0),
            Job::new("J2", 1.0).with_deadline(10.0),
        ];
        let mut engine = MicrolpEngine::default();
        let outcome = WeightedTardinessBuilder::new(&jobs)
            .with_machine(Machine::new("Line").with_available_at(1.0))
            .solve(&mut engine)
            .unwrap();

        // J1 cannot start before 4: tardiness 4 + 2 - 3 = 3
        assert!((outcome.objective.unwrap() - 3.0).abs() < TOL);
        let schedule = outcome.solution.unwrap();
        for entry in schedule.entries() {
            assert_eq!(entry.machine_id, "Line");
            assert!(entry.start >= 1.0 - TOL);
        }
        assert!(!schedule.has_overlap(TOL));
    }
}
