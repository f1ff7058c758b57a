//! File formats.
//!
//! Thin collaborator around the core: parses the meta, aircraft and truck
//! JSON files into a validated [`Problem`](crate::models::Problem), reads
//! candidate schedules, and writes schedules or infeasibility reports.
//!
//! Two clock encodings are supported for instants (`"clock"` in meta.json):
//! plain minutes, and 24-hour HHMM integers. Durations and transition times
//! are always minutes.

mod loader;
mod records;
mod writer;

pub use loader::{
    load_problem, load_schedule, schedule_from_entries, LoadError, LoadedProblem, ProblemRecords,
};
pub use records::{
    Clock, JsonAircraft, JsonEntry, JsonMeta, JsonOperation, JsonScheduleInput,
    JsonScheduleOutput, JsonTransitionPair, JsonTransitions, JsonTruck, JsonWindow,
};
pub use writer::{render_outcome, schedule_entries, write_outcome, WriteError};
