//! Ground-service truck scheduling for aircraft turnarounds.
//!
//! Assigns a limited fleet of service trucks (fuel, baggage, catering, ...)
//! to the operations each aircraft requires during its ground time, with
//! travel time between gates. Produces a feasible timetable or an
//! infeasibility report, and validates timetables against every constraint.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Aircraft`, `Operation`, `Truck`,
//!   `TerminalConfig`, `TransitionMatrix`, `Schedule`, `Problem`
//! - **`validation`**: Input integrity checks (duplicate IDs, precedence
//!   cycles, fleet declaration, window sanity)
//! - **`checker`**: Pure constraint predicates shared by engine and validator
//! - **`scheduler`**: Greedy earliest-fit engine with bounded backtracking, KPIs
//! - **`validator`**: Full schedule validation
//! - **`io`**: JSON input/output in minutes or HHMM clock
//! - **`generate`**: Seeded random instances
//!
//! # Example
//!
//! ```
//! use u_turnaround::models::{Aircraft, Operation, Problem, TerminalConfig, TimeWindow, Truck};
//! use u_turnaround::scheduler::Scheduler;
//! use u_turnaround::validator::validate_schedule;
//!
//! let problem = Problem::new(
//!     TerminalConfig::new(TimeWindow::new(0, 1440)),
//!     vec![Aircraft::new("AC1", "G1", 100, 300)
//!         .with_operation(Operation::new("fuel", 50, "fuel"))],
//!     vec![Truck::new("F1", "fuel", "G1", TimeWindow::new(0, 1440))],
//! )?;
//!
//! let schedule = Scheduler::new().schedule(&problem)?;
//! assert!(validate_schedule(&problem, &schedule).is_pass());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod checker;
pub mod error;
pub mod generate;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod validator;
