//! Turnaround domain models.
//!
//! Provides the core data types for representing ground-service scheduling
//! problems and their solutions. Inputs are loaded once per run and never
//! mutated; schedules are read-only once constructed.
//!
//! # Domain Mappings
//!
//! | u-turnaround | Job-shop scheduling | Ground handling |
//! |--------------|---------------------|-----------------|
//! | Aircraft | Job | Flight turnaround |
//! | Operation | Operation | Fueling, baggage, catering |
//! | Truck | Machine | Bowser, belt loader, catering truck |
//! | TransitionMatrix | Setup times | Apron driving times |
//! | Schedule | Production plan | Ground handling timetable |

mod aircraft;
mod problem;
mod schedule;
mod terminal;
mod time;
mod truck;

pub use aircraft::{Aircraft, Operation};
pub use problem::Problem;
pub use schedule::{Schedule, ScheduleEntry, Violation, ViolationKind};
pub use terminal::{CheckerPolicy, OperationOverlap, TerminalConfig, TransitionMatrix};
pub use time::{in_range, TimeWindow, MAX_MINUTES};
pub use truck::Truck;
