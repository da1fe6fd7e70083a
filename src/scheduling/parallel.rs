//! Parallel-machine scheduling with release and availability times.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::extract;
use crate::costs::big_m;
use crate::error::{Error, ExtractionError, ModelError};
use crate::milp::{LinearExpr, MilpEngine, Sense, Var};
use crate::models::{Job, Machine, Schedule};
use crate::outcome::{conclude, SolveOutcome};
use crate::validation::validate_jobs;

/// Objective of the parallel-machine model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PmspObjective {
    /// Minimize the sum of start times.
    #[default]
    TotalStartTime,
    /// Minimize the latest finish time.
    Makespan,
}

/// Builds the parallel-machine MILP.
///
/// # Variables
///
/// - `assign[i,k]` binary: job `i` runs on machine `k`
/// - `order[i,j]` binary for `i < j`: job `i` precedes job `j` if both share
///   a machine
/// - `start[i] >= 0` continuous
/// - `makespan >= 0` continuous, only for [`PmspObjective::Makespan`]
///
/// # Constraints
///
/// - release: `start[i] >= release[i]`
/// - availability: `start[i] >= available[k] - M(1 - assign[i,k])`
/// - no overlap, per machine `k` and pair `i < j`:
///   `start[j] >= start[i] + p[i] - M((1 - order) + (1 - assign[i,k]) + (1 - assign[j,k]))`
///   and `start[i] >= start[j] + p[j] - M(order + (1 - assign[i,k]) + (1 - assign[j,k]))`
/// - one machine per job: `Σ_k assign[i,k] = 1`
///
/// `M` is [`big_m`] of the instance.
///
/// # Examples
///
/// ```
/// use u_milp::milp::MicrolpEngine;
/// use u_milp::models::{Job, Machine};
/// use u_milp::scheduling::ParallelMachineBuilder;
///
/// let jobs = vec![Job::new("J1", 3.0), Job::new("J2", 2.0)];
/// let machines = vec![Machine::new("M1")];
///
/// let mut engine = MicrolpEngine::default();
/// let outcome = ParallelMachineBuilder::new(&jobs, &machines)
///     .solve(&mut engine)
///     .unwrap();
/// assert!(outcome.is_solved());
/// // shorter job first: starts 0 and 2
/// assert!((outcome.objective.unwrap() - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ParallelMachineBuilder<'a> {
    jobs: &'a [Job],
    machines: &'a [Machine],
    objective: PmspObjective,
}

/// Handles of a built parallel-machine model.
#[derive(Debug, Clone)]
pub struct ParallelMachineModel {
    jobs: Vec<Job>,
    machines: Vec<Machine>,
    assign: Vec<Vec<Var>>,
    order: BTreeMap<(usize, usize), Var>,
    start: Vec<Var>,
    makespan: Option<Var>,
    big_m: f64,
}

impl<'a> ParallelMachineBuilder<'a> {
    /// Creates a builder minimizing total start time.
    pub fn new(jobs: &'a [Job], machines: &'a [Machine]) -> Self {
        Self {
            jobs,
            machines,
            objective: PmspObjective::default(),
        }
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: PmspObjective) -> Self {
        self.objective = objective;
        self
    }

    /// Validates the instance and adds the model to `engine`.
    pub fn build<E: MilpEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> Result<ParallelMachineModel, ModelError> {
        validate_jobs(self.jobs, self.machines)?;

        let jobs = self.jobs;
        let machines = self.machines;
        let m = big_m(jobs, machines);

        let assign: Vec<Vec<Var>> = jobs
            .iter()
            .map(|job| {
                machines
                    .iter()
                    .map(|machine| engine.add_binary(&format!("assign[{},{}]", job.id, machine.id)))
                    .collect()
            })
            .collect();

        let mut order = BTreeMap::new();
        for i in 0..jobs.len() {
            for j in (i + 1)..jobs.len() {
                let var = engine.add_binary(&format!("order[{},{}]", jobs[i].id, jobs[j].id));
                order.insert((i, j), var);
            }
        }

        let start: Vec<Var> = jobs
            .iter()
            .map(|job| engine.add_continuous(&format!("start[{}]", job.id), 0.0))
            .collect();

        let makespan = match self.objective {
            PmspObjective::TotalStartTime => {
                engine.set_objective(LinearExpr::sum(start.iter().copied()), Sense::Minimize);
                None
            }
            PmspObjective::Makespan => {
                let c_max = engine.add_continuous("makespan", 0.0);
                engine.set_objective(LinearExpr::sum([c_max]), Sense::Minimize);
                for (i, job) in jobs.iter().enumerate() {
                    engine.add_constraint(
                        LinearExpr::new()
                            .term(c_max, 1.0)
                            .term(start[i], -1.0)
                            .ge(job.duration),
                        &format!("makespan[{}]", job.id),
                    );
                }
                Some(c_max)
            }
        };

        for (i, job) in jobs.iter().enumerate() {
            engine.add_constraint(
                LinearExpr::sum([start[i]]).ge(job.release),
                &format!("release[{}]", job.id),
            );
        }

        for (i, job) in jobs.iter().enumerate() {
            for (k, machine) in machines.iter().enumerate() {
                // start - M * assign >= available - M
                engine.add_constraint(
                    LinearExpr::new()
                        .term(start[i], 1.0)
                        .term(assign[i][k], -m)
                        .ge(machine.available_at - m),
                    &format!("available[{},{}]", job.id, machine.id),
                );
            }
        }

        for (k, machine) in machines.iter().enumerate() {
            for (&(i, j), &y) in &order {
                let (zi, zj) = (assign[i][k], assign[j][k]);
                // i before j
                engine.add_constraint(
                    LinearExpr::new()
                        .term(start[j], 1.0)
                        .term(start[i], -1.0)
                        .term(y, -m)
                        .term(zi, -m)
                        .term(zj, -m)
                        .ge(jobs[i].duration - 3.0 * m),
                    &format!("disjunctive[{},{},{}]", jobs[i].id, jobs[j].id, machine.id),
                );
                // j before i
                engine.add_constraint(
                    LinearExpr::new()
                        .term(start[i], 1.0)
                        .term(start[j], -1.0)
                        .term(y, m)
                        .term(zi, -m)
                        .term(zj, -m)
                        .ge(jobs[j].duration - 2.0 * m),
                    &format!("disjunctive[{},{},{}]", jobs[j].id, jobs[i].id, machine.id),
                );
            }
        }

        for (i, job) in jobs.iter().enumerate() {
            engine.add_constraint(
                LinearExpr::sum(assign[i].iter().copied()).equals(1.0),
                &format!("one machine[{}]", job.id),
            );
        }

        debug!(
            "parallel-machine model: {} jobs, {} machines, {} vars, {} constraints, M = {m}",
            jobs.len(),
            machines.len(),
            engine.num_vars(),
            engine.num_constraints()
        );

        Ok(ParallelMachineModel {
            jobs: jobs.to_vec(),
            machines: machines.to_vec(),
            assign,
            order,
            start,
            makespan,
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

impl ParallelMachineModel {
    /// Big-M used by the availability and no-overlap constraints.
    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    /// Start-time variable of job `i`.
    pub fn start_var(&self, i: usize) -> Option<Var> {
        self.start.get(i).copied()
    }

    /// Assignment indicator of job `i` on machine `k`.
    pub fn assign_var(&self, i: usize, k: usize) -> Option<Var> {
        self.assign.get(i).and_then(|row| row.get(k)).copied()
    }

    /// Precedence indicator of the unordered pair `{i, j}`.
    ///
    /// The variable reads 1 when the lower index goes first.
    pub fn order_var(&self, i: usize, j: usize) -> Option<Var> {
        self.order.get(&(i.min(j), i.max(j))).copied()
    }

    /// Makespan variable, present for [`PmspObjective::Makespan`].
    pub fn makespan_var(&self) -> Option<Var> {
        self.makespan
    }

    /// Reads the schedule out of the engine incumbent.
    pub fn extract<E: MilpEngine + ?Sized>(&self, engine: &E) -> Result<Schedule, ExtractionError> {
        let mut entries = Vec::with_capacity(self.jobs.len());
        for (i, job) in self.jobs.iter().enumerate() {
            let start = extract::read(engine, self.start[i], || format!("start[{}]", job.id))?;
            let k = extract::assigned_machine(engine, job, &self.assign[i])?;
            entries.push(extract::entry(job, &self.machines[k], start));
        }
        Ok(Schedule::from_entries(entries))
    }
}
