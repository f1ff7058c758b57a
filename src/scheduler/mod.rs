//! Scheduling engine and KPI evaluation.
//!
//! # Algorithm
//!
//! `Scheduler` uses a deterministic greedy earliest-fit heuristic: jobs in
//! priority order, each placed at the earliest legal start on the
//! lowest-ID compatible truck. When a job cannot be placed, recent decisions
//! are revisited through an explicit, bounded backtracking stack.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, truck utilization, transition overhead
//! and aircraft slack.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

mod engine;
mod kpi;
mod order;
mod report;

pub use engine::{Scheduler, SchedulerParams, DEFAULT_MAX_BACKTRACKS};
pub use kpi::ScheduleKpi;
pub use order::{job_order, precedence_order, Job};
pub use report::{FailureReason, Infeasibility, RejectionReason, TruckRejection};
