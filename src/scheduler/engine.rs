//! Greedy earliest-fit scheduler with bounded backtracking.
//!
//! # Algorithm
//!
//! 1. Order jobs by ground-window start, departure, aircraft ID, precedence.
//! 2. Reject the run up front if some job has no placement even on an empty
//!    schedule.
//! 3. For each job, enumerate placements on every compatible truck (ascending
//!    truck ID). Candidate starts are the job's lower bound plus every release
//!    point above it: the end of a committed same-truck entry plus transition
//!    time, the end of a committed same-aircraft entry, and the time the truck
//!    can reach the gate from home. Every candidate is checked with the
//!    [`ConstraintChecker`].
//! 4. Rank placements by (start, truck ID) and commit the first.
//! 5. Forward check: every later job on the same aircraft or on a truck type
//!    the committed truck serves must still have at least one placement.
//! 6. On a dead end (no placement, or a forward-check wipeout), jump back to
//!    the most recent decision that constrains a failed job: one on the same
//!    aircraft, or one that occupies a truck able to serve it. Decisions in
//!    between are undone without being retried. The target commits its next
//!    option; if it has none, its own job joins the failed set and the jump
//!    continues below it. Give up when no constraining decision is left or
//!    the backtrack budget is spent.
//!
//! Only entries on the job's aircraft and on trucks able to serve it shape its
//! placements, so skipping the other decisions loses no schedule the
//! chronological search would find.
//!
//! # Complexity
//! O(n² · t · m²) per pass without backtracking (forward checking included),
//! where n = jobs, t = trucks, m = entries per truck/aircraft.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching;
//! Russell & Norvig (2020), "Artificial Intelligence", Ch. 6.3 (Forward Checking);
//! Prosser (1993), "Hybrid Algorithms for the Constraint Satisfaction Problem"
//! (conflict-directed backjumping)

use tracing::{debug, info, warn};

use super::order::{job_order, Job};
use super::report::{Infeasibility, RejectionReason, TruckRejection};
use crate::checker::{ConstraintChecker, Indexed};
use crate::models::{Problem, Schedule, ScheduleEntry};

/// Default bound on backtrack steps.
pub const DEFAULT_MAX_BACKTRACKS: usize = 10_000;

/// Engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerParams {
    /// Maximum number of undo steps before reporting infeasibility.
    pub max_backtracks: usize,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
        }
    }
}

/// A ranked placement option for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    truck: usize,
    start: i64,
}

/// A decision point on the explicit backtracking stack.
///
/// The decision at stack depth `d` always places job `d` of the order.
#[derive(Debug)]
struct Decision {
    options: Vec<Placement>,
    chosen: usize,
    /// Jobs (order positions) whose dead ends were blamed on this decision.
    conflicts: Vec<usize>,
}

impl Decision {
    fn new(options: Vec<Placement>) -> Self {
        Self {
            options,
            chosen: 0,
            conflicts: Vec::new(),
        }
    }

    fn placement(&self) -> Placement {
        self.options[self.chosen]
    }

    fn blame(&mut self, failed: &[usize]) {
        for &slot in failed {
            if !self.conflicts.contains(&slot) {
                self.conflicts.push(slot);
            }
        }
    }
}

/// Placed entries, one arena slot per job, plus per-truck and per-aircraft
/// indices of committed slots.
#[derive(Debug)]
struct SearchState {
    arena: Vec<Option<ScheduleEntry>>,
    by_truck: Vec<Vec<usize>>,
    by_aircraft: Vec<Vec<usize>>,
}

impl SearchState {
    fn new(problem: &Problem, jobs: usize) -> Self {
        Self {
            arena: vec![None; jobs],
            by_truck: vec![Vec::new(); problem.trucks().len()],
            by_aircraft: vec![Vec::new(); problem.aircraft().len()],
        }
    }

    fn commit(&mut self, problem: &Problem, slot: usize, job: Job, placement: Placement) {
        let aircraft = &problem.aircraft()[job.aircraft];
        let operation = &aircraft.operations[job.operation];
        let truck = &problem.trucks()[placement.truck];
        self.arena[slot] = Some(ScheduleEntry::new(
            &truck.id,
            &aircraft.id,
            &operation.kind,
            placement.start,
            placement.start + operation.duration,
        ));
        self.by_truck[placement.truck].push(slot);
        self.by_aircraft[job.aircraft].push(slot);
    }

    fn undo(&mut self, slot: usize, job: Job) -> Option<ScheduleEntry> {
        self.by_aircraft[job.aircraft].retain(|&s| s != slot);
        for slots in &mut self.by_truck {
            slots.retain(|&s| s != slot);
        }
        self.arena[slot].take()
    }

    fn indexed<'s>(&'s self, slots: &[usize]) -> Vec<Indexed<'s>> {
        slots
            .iter()
            .filter_map(|&s| self.arena[s].as_ref().map(|e| (s, e)))
            .collect()
    }

    fn into_schedule(self) -> Schedule {
        let mut schedule = Schedule::from_entries(self.arena.into_iter().flatten().collect());
        schedule.sort_canonical();
        schedule
    }
}

/// Greedy earliest-fit scheduler with bounded explicit-stack backtracking.
///
/// Deterministic: identical input always yields the identical schedule or
/// the identical infeasibility report.
///
/// # Example
///
/// ```
/// use u_turnaround::models::{Aircraft, Operation, Problem, TerminalConfig, TimeWindow, Truck};
/// use u_turnaround::scheduler::Scheduler;
///
/// let problem = Problem::new(
///     TerminalConfig::new(TimeWindow::new(0, 1000)),
///     vec![Aircraft::new("AC1", "G1", 100, 300).with_operation(Operation::new("fuel", 50, "fuel"))],
///     vec![Truck::new("F1", "fuel", "G1", TimeWindow::new(0, 1000))],
/// )
/// .unwrap();
///
/// let schedule = Scheduler::new().schedule(&problem).unwrap();
/// assert_eq!(schedule.entries[0].start, 100);
/// assert_eq!(schedule.entries[0].end, 150);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    params: SchedulerParams,
}

impl Scheduler {
    /// Creates a scheduler with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backtrack budget.
    pub fn with_max_backtracks(mut self, max_backtracks: usize) -> Self {
        self.params.max_backtracks = max_backtracks;
        self
    }

    /// Builds a complete schedule or reports the first job that could not be placed.
    pub fn schedule(&self, problem: &Problem) -> Result<Schedule, Infeasibility> {
        let checker = ConstraintChecker::new(problem);
        let jobs = job_order(problem);
        let truck_order = truck_order(problem);

        let mut state = SearchState::new(problem, jobs.len());
        debug!(jobs = jobs.len(), trucks = truck_order.len(), "scheduling started");

        for (slot, &job) in jobs.iter().enumerate() {
            if let Err(rejections) = self.placement_options(&checker, &state, &truck_order, slot, job) {
                let report = infeasibility(problem, job, rejections);
                warn!(%report, "job cannot be placed even on an empty schedule");
                return Err(report);
            }
        }

        let mut stack: Vec<Decision> = Vec::with_capacity(jobs.len());
        let mut first_failure: Option<Infeasibility> = None;
        let mut backtracks = 0usize;

        while stack.len() < jobs.len() {
            let slot = stack.len();
            let job = jobs[slot];

            let (failed, rejections) =
                match self.placement_options(&checker, &state, &truck_order, slot, job) {
                    Ok(options) => {
                        let first = options[0];
                        state.commit(problem, slot, job, first);
                        debug!(
                            slot,
                            aircraft = %problem.aircraft()[job.aircraft].id,
                            truck = %problem.trucks()[first.truck].id,
                            start = first.start,
                            alternatives = options.len() - 1,
                            "placed job"
                        );
                        stack.push(Decision::new(options));
                        match self.forward_check(&checker, &state, &truck_order, &jobs, slot, first) {
                            None => continue,
                            Some(wipeout) => wipeout,
                        }
                    }
                    Err(rejections) => (slot, rejections),
                };

            let mut failure = first_failure
                .take()
                .unwrap_or_else(|| infeasibility(problem, jobs[failed], rejections));
            debug!(slot, failed, aircraft = %problem.aircraft()[jobs[failed].aircraft].id, "dead end");

            let mut blamed = vec![failed];
            loop {
                let Some(target) = (0..stack.len())
                    .rev()
                    .find(|&depth| constrains(problem, &jobs, depth, stack[depth].placement(), &blamed))
                else {
                    failure.backtracks = backtracks;
                    warn!(%failure, backtracks, "schedule infeasible");
                    return Err(failure);
                };
                if backtracks >= self.params.max_backtracks {
                    failure.backtracks = backtracks;
                    failure.budget_exhausted = true;
                    warn!(%failure, backtracks, "backtrack budget exhausted");
                    return Err(failure);
                }
                backtracks += 1;

                for depth in (target..stack.len()).rev() {
                    state.undo(depth, jobs[depth]);
                }
                let skipped = stack.len() - target - 1;
                stack.truncate(target + 1);
                let mut decision = stack.remove(target);
                decision.blame(&blamed);
                decision.chosen += 1;

                let Some(&next) = decision.options.get(decision.chosen) else {
                    debug!(target, skipped, "decision exhausted");
                    blamed = decision.conflicts;
                    blamed.push(target);
                    continue;
                };
                state.commit(problem, target, jobs[target], next);
                debug!(target, skipped, option = decision.chosen, start = next.start, "retrying decision");
                stack.push(decision);
                match self.forward_check(&checker, &state, &truck_order, &jobs, target, next) {
                    None => break,
                    Some((wiped, _)) => blamed = vec![wiped],
                }
            }
            first_failure = Some(failure);
        }

        let schedule = state.into_schedule();
        info!(entries = schedule.len(), backtracks, makespan = schedule.makespan(), "schedule complete");
        Ok(schedule)
    }

    /// Finds the first later job left without any placement by the commit at `slot`.
    ///
    /// Only jobs the new entry can affect are checked. Committed entries only
    /// ever remove options, so a job with none now stays unplaceable until
    /// something it depends on is undone.
    fn forward_check(
        &self,
        checker: &ConstraintChecker<'_>,
        state: &SearchState,
        truck_order: &[usize],
        jobs: &[Job],
        slot: usize,
        placement: Placement,
    ) -> Option<(usize, Vec<TruckRejection>)> {
        let problem = checker.problem();
        (slot + 1..jobs.len())
            .filter(|&later| constrains(problem, jobs, slot, placement, &[later]))
            .find_map(|later| {
                self.placement_options(checker, state, truck_order, later, jobs[later])
                    .err()
                    .map(|rejections| (later, rejections))
            })
    }

    /// Ranks every legal placement of `job`, or explains why each truck failed.
    fn placement_options(
        &self,
        checker: &ConstraintChecker<'_>,
        state: &SearchState,
        truck_order: &[usize],
        slot: usize,
        job: Job,
    ) -> Result<Vec<Placement>, Vec<TruckRejection>> {
        let problem = checker.problem();
        let aircraft = &problem.aircraft()[job.aircraft];
        let operation = &aircraft.operations[job.operation];
        let aircraft_entries = state.indexed(&state.by_aircraft[job.aircraft]);

        let mut options = Vec::new();
        let mut rejections = Vec::new();

        for (rank, &truck_pos) in truck_order.iter().enumerate() {
            let truck = &problem.trucks()[truck_pos];
            if !truck.can_perform(operation) {
                rejections.push(TruckRejection {
                    truck_id: truck.id.clone(),
                    reason: RejectionReason::IncompatibleType {
                        truck_type: truck.truck_type.clone(),
                        required: operation.truck_type.clone(),
                    },
                });
                continue;
            }
            if !truck.is_usable() {
                rejections.push(TruckRejection {
                    truck_id: truck.id.clone(),
                    reason: RejectionReason::NeverAvailable,
                });
                continue;
            }

            let truck_entries = state.indexed(&state.by_truck[truck_pos]);
            let mut first_violation = None;
            let mut feasible = 0usize;

            for start in candidate_starts(problem, job, truck_pos, &truck_entries, &aircraft_entries) {
                let entry = ScheduleEntry::new(
                    &truck.id,
                    &aircraft.id,
                    &operation.kind,
                    start,
                    start + operation.duration,
                );
                match checker.check_placement((slot, &entry), &truck_entries, &aircraft_entries) {
                    Ok(()) => {
                        options.push((rank, Placement { truck: truck_pos, start }));
                        feasible += 1;
                    }
                    Err(violation) => {
                        first_violation.get_or_insert(violation);
                    }
                }
            }

            if feasible == 0 {
                if let Some(violation) = first_violation {
                    rejections.push(TruckRejection {
                        truck_id: truck.id.clone(),
                        reason: RejectionReason::NoFeasibleSlot {
                            kind: violation.kind,
                            detail: violation.message,
                        },
                    });
                }
            }
        }

        if options.is_empty() {
            return Err(rejections);
        }
        options.sort_by_key(|&(rank, p)| (p.start, rank));
        Ok(options.into_iter().map(|(_, p)| p).collect())
    }
}

/// Whether the entry placed for `jobs[slot]` can restrict any job in `failed`.
fn constrains(problem: &Problem, jobs: &[Job], slot: usize, placement: Placement, failed: &[usize]) -> bool {
    let truck = &problem.trucks()[placement.truck];
    let aircraft = jobs[slot].aircraft;
    failed.iter().any(|&other| {
        let job = jobs[other];
        job.aircraft == aircraft
            || truck.can_perform(&problem.aircraft()[job.aircraft].operations[job.operation])
    })
}

fn infeasibility(problem: &Problem, job: Job, rejections: Vec<TruckRejection>) -> Infeasibility {
    let aircraft = &problem.aircraft()[job.aircraft];
    Infeasibility::new(&aircraft.id, &aircraft.operations[job.operation].kind, rejections)
}

/// Truck positions sorted by truck ID.
fn truck_order(problem: &Problem) -> Vec<usize> {
    let trucks = problem.trucks();
    let mut order: Vec<usize> = (0..trucks.len()).collect();
    order.sort_by(|&a, &b| trucks[a].id.cmp(&trucks[b].id));
    order
}

/// Candidate start times for `job` on one truck, ascending and deduplicated.
///
/// Always contains the lower bound; other release points are kept only if
/// the job could still finish inside every window.
fn candidate_starts(
    problem: &Problem,
    job: Job,
    truck_pos: usize,
    truck_entries: &[Indexed<'_>],
    aircraft_entries: &[Indexed<'_>],
) -> Vec<i64> {
    let terminal = problem.terminal();
    let aircraft = &problem.aircraft()[job.aircraft];
    let operation = &aircraft.operations[job.operation];
    let truck = &problem.trucks()[truck_pos];

    let mut lower = aircraft
        .ground
        .start
        .max(truck.availability.start)
        .max(terminal.horizon.start);
    if terminal.policy.enforce_precedence {
        for (_, entry) in aircraft_entries {
            if operation.must_follow(&entry.operation) {
                lower = lower.max(entry.end);
            }
        }
    }
    let latest = aircraft
        .ground
        .end
        .min(truck.availability.end)
        .min(terminal.horizon.end)
        - operation.duration;

    let mut releases = vec![truck.availability.start + terminal.transition(&truck.home, &aircraft.gate)];
    for (_, entry) in truck_entries {
        if let Some(other) = problem.aircraft_by_id(&entry.aircraft_id) {
            releases.push(entry.end + terminal.transition(&other.gate, &aircraft.gate));
        }
    }
    releases.extend(aircraft_entries.iter().map(|(_, entry)| entry.end));

    let mut starts: Vec<i64> = releases
        .into_iter()
        .filter(|&t| t > lower && t <= latest)
        .collect();
    starts.push(lower);
    starts.sort_unstable();
    starts.dedup();
    starts
}
