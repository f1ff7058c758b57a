//! JSON loader.
//!
//! Reads the meta, aircraft and truck files, converts file-clock values to
//! run-clock minutes and builds a validated [`Problem`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::records::{
    Clock, JsonAircraft, JsonEntry, JsonMeta, JsonScheduleInput, JsonTruck, JsonWindow,
};
use crate::error::InputError;
use crate::models::{
    Aircraft, Operation, Problem, Schedule, ScheduleEntry, TerminalConfig, TimeWindow,
    TransitionMatrix, Truck,
};

/// Errors raised while loading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field}: {value} is not a valid {clock:?} time")]
    Clock {
        field: String,
        value: i64,
        clock: Clock,
    },
    #[error("{} holds an infeasibility report, not a schedule", path.display())]
    NotASchedule { path: PathBuf },
    #[error(transparent)]
    Input(#[from] InputError),
}

/// A validated problem and the clock its files use.
#[derive(Debug, Clone)]
pub struct LoadedProblem {
    pub problem: Problem,
    pub clock: Clock,
}

/// The three input files, parsed but not yet converted.
#[derive(Debug, Clone)]
pub struct ProblemRecords {
    pub meta: JsonMeta,
    pub aircraft: Vec<JsonAircraft>,
    pub trucks: Vec<JsonTruck>,
}

impl ProblemRecords {
    /// Parses the three input files.
    pub fn read(meta: &Path, aircraft: &Path, trucks: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            meta: read_json(meta)?,
            aircraft: read_json(aircraft)?,
            trucks: read_json(trucks)?,
        })
    }

    /// Converts to run-clock minutes and validates.
    pub fn into_problem(self) -> Result<LoadedProblem, LoadError> {
        let clock = self.meta.clock;
        let terminal = terminal_config(&self.meta)?;
        let aircraft = self
            .aircraft
            .iter()
            .map(|record| aircraft(record, clock))
            .collect::<Result<Vec<_>, _>>()?;
        let trucks = self
            .trucks
            .iter()
            .map(|record| truck(record, clock))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            ?clock,
            aircraft = aircraft.len(),
            trucks = trucks.len(),
            "input converted"
        );
        let problem = Problem::new(terminal, aircraft, trucks)?;
        Ok(LoadedProblem { problem, clock })
    }
}

/// Reads, converts and validates a problem from its three files.
pub fn load_problem(meta: &Path, aircraft: &Path, trucks: &Path) -> Result<LoadedProblem, LoadError> {
    ProblemRecords::read(meta, aircraft, trucks)?.into_problem()
}

/// Reads a candidate schedule written in `clock`.
pub fn load_schedule(path: &Path, clock: Clock) -> Result<Schedule, LoadError> {
    match read_json::<JsonScheduleInput>(path)? {
        JsonScheduleInput::Feasible { entries } => schedule_from_entries(&entries, clock),
        JsonScheduleInput::Infeasible { .. } => Err(LoadError::NotASchedule {
            path: path.to_path_buf(),
        }),
    }
}

/// Converts file entries to a schedule, keeping file order.
pub fn schedule_from_entries(entries: &[JsonEntry], clock: Clock) -> Result<Schedule, LoadError> {
    let entries = entries
        .iter()
        .enumerate()
        .map(|(i, e)| -> Result<ScheduleEntry, LoadError> {
            let field = |name: &str| format!("entry {i} {name}");
            Ok(ScheduleEntry::new(
                &e.truck,
                &e.aircraft,
                &e.operation,
                minutes(clock, e.start, || field("start"))?,
                minutes(clock, e.end, || field("end"))?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Schedule::from_entries(entries))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn minutes(clock: Clock, value: i64, field: impl FnOnce() -> String) -> Result<i64, LoadError> {
    clock.to_minutes(value).ok_or_else(|| LoadError::Clock {
        field: field(),
        value,
        clock,
    })
}

fn window(clock: Clock, w: JsonWindow, what: &str) -> Result<TimeWindow, LoadError> {
    Ok(TimeWindow::new(
        minutes(clock, w.start, || format!("{what} start"))?,
        minutes(clock, w.end, || format!("{what} end"))?,
    ))
}

fn terminal_config(meta: &JsonMeta) -> Result<TerminalConfig, LoadError> {
    let mut transitions = TransitionMatrix::new()
        .with_default(meta.transition.default)
        .with_same_location(meta.transition.same_location);
    for pair in &meta.transition.pairs {
        transitions.set_transition(&pair.from, &pair.to, pair.minutes);
    }

    let mut terminal = TerminalConfig::new(window(meta.clock, meta.horizon, "horizon")?)
        .with_transitions(transitions)
        .with_policy(meta.policy);
    for (truck_type, &count) in &meta.trucks_per_type {
        terminal = terminal.with_fleet(truck_type, count);
    }
    Ok(terminal)
}

fn aircraft(record: &JsonAircraft, clock: Clock) -> Result<Aircraft, LoadError> {
    let arrival = minutes(clock, record.arrival, || format!("aircraft '{}' arrival", record.id))?;
    let departure = minutes(clock, record.departure, || {
        format!("aircraft '{}' departure", record.id)
    })?;

    let mut ac = Aircraft::new(&record.id, &record.gate, arrival, departure);
    for op in &record.operations {
        let mut operation = Operation::new(&op.kind, op.duration, &op.truck_type);
        operation.after = op.after.clone();
        operation.exclusive_with = op.exclusive_with.clone();
        ac = ac.with_operation(operation);
    }
    Ok(ac)
}

fn truck(record: &JsonTruck, clock: Clock) -> Result<Truck, LoadError> {
    let availability = window(clock, record.available, &format!("truck '{}' availability", record.id))?;
    Ok(Truck::new(
        &record.id,
        &record.truck_type,
        &record.home,
        availability,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ModelViolationKind};
    use crate::models::OperationOverlap;

    fn records(meta: &str, aircraft: &str, trucks: &str) -> ProblemRecords {
        ProblemRecords {
            meta: serde_json::from_str(meta).unwrap(),
            aircraft: serde_json::from_str(aircraft).unwrap(),
            trucks: serde_json::from_str(trucks).unwrap(),
        }
    }

    const AIRCRAFT: &str = r#"[
        {"id": "AC1", "gate": "G1", "arrival": 100, "departure": 300,
         "operations": [
            {"kind": "fuel", "duration": 50, "truck_type": "fuel"},
            {"kind": "bags", "duration": 20, "truck_type": "baggage", "after": ["fuel"]}
         ]}
    ]"#;

    const TRUCKS: &str = r#"[
        {"id": "F1", "truck_type": "fuel", "home": "DEPOT", "available": {"start": 0, "end": 1000}},
        {"id": "B1", "truck_type": "baggage", "home": "DEPOT", "available": {"start": 0, "end": 1000}}
    ]"#;

    #[test]
    fn test_minutes_clock_conversion() {
        let loaded = records(
            r#"{"horizon": {"start": 0, "end": 1440},
                "transition": {"default": 10, "pairs": [{"from": "DEPOT", "to": "G1", "minutes": 4}]},
                "policy": {"operation_overlap": "exclusive"}}"#,
            AIRCRAFT,
            TRUCKS,
        )
        .into_problem()
        .unwrap();

        let p = &loaded.problem;
        assert_eq!(loaded.clock, Clock::Minutes);
        assert_eq!(p.terminal().transition("DEPOT", "G1"), 4);
        assert_eq!(p.terminal().transition("G1", "G2"), 10);
        assert_eq!(p.terminal().policy.operation_overlap, OperationOverlap::Exclusive);
        let ac = p.aircraft_by_id("AC1").unwrap();
        assert_eq!(ac.ground, TimeWindow::new(100, 300));
        assert_eq!(ac.operation("bags").unwrap().after, vec!["fuel".to_string()]);
    }

    #[test]
    fn test_military_clock_conversion() {
        let loaded = records(
            r#"{"clock": "military", "horizon": {"start": 600, "end": 1800}}"#,
            r#"[{"id": "AC1", "gate": "G1", "arrival": 830, "departure": 1015,
                 "operations": [{"kind": "fuel", "duration": 45, "truck_type": "fuel"}]}]"#,
            r#"[{"id": "F1", "truck_type": "fuel", "home": "G1", "available": {"start": 700, "end": 1200}}]"#,
        )
        .into_problem()
        .unwrap();

        let p = &loaded.problem;
        assert_eq!(p.terminal().horizon, TimeWindow::new(360, 1080));
        let ac = p.aircraft_by_id("AC1").unwrap();
        assert_eq!(ac.ground, TimeWindow::new(510, 615));
        assert_eq!(ac.operations[0].duration, 45);
        assert_eq!(p.truck_by_id("F1").unwrap().availability, TimeWindow::new(420, 720));
    }

    #[test]
    fn test_malformed_military_time() {
        let err = records(
            r#"{"clock": "military", "horizon": {"start": 600, "end": 1800}}"#,
            r#"[{"id": "AC1", "gate": "G1", "arrival": 875, "departure": 1015}]"#,
            "[]",
        )
        .into_problem()
        .unwrap_err();

        match err {
            LoadError::Clock { field, value, .. } => {
                assert_eq!(field, "aircraft 'AC1' arrival");
                assert_eq!(value, 875);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extreme_minutes_rejected_without_panic() {
        let err = records(
            r#"{"horizon": {"start": 0, "end": 1440}}"#,
            r#"[{"id": "AC1", "gate": "G1", "arrival": -9223372036854775807, "departure": 9223372036854775807,
                 "operations": [{"kind": "fuel", "duration": 50, "truck_type": "fuel"}]}]"#,
            TRUCKS,
        )
        .into_problem()
        .unwrap_err();
        assert!(matches!(err, LoadError::Clock { value: -9223372036854775807, .. }));

        let err = records(
            r#"{"horizon": {"start": 0, "end": 1440}}"#,
            r#"[{"id": "AC1", "gate": "G1", "arrival": 100, "departure": 300,
                 "operations": [{"kind": "fuel", "duration": 9223372036854775807, "truck_type": "fuel"}]}]"#,
            TRUCKS,
        )
        .into_problem()
        .unwrap_err();
        match err {
            LoadError::Input(InputError::Model(violations)) => {
                assert_eq!(violations[0].kind, ModelViolationKind::OutOfRange);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_errors_surface() {
        let err = records(
            r#"{"horizon": {"start": 0, "end": 1440}, "trucks_per_type": {"fuel": 2, "baggage": 1}}"#,
            AIRCRAFT,
            TRUCKS,
        )
        .into_problem()
        .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Input(InputError::Config(ConfigError::FleetMismatch { declared: 2, .. }))
        ));
    }

    #[test]
    fn test_schedule_entries_keep_file_order() {
        let entries = vec![
            JsonEntry {
                truck: "F1".into(),
                aircraft: "AC2".into(),
                operation: "fuel".into(),
                start: 1000,
                end: 1030,
            },
            JsonEntry {
                truck: "F1".into(),
                aircraft: "AC1".into(),
                operation: "fuel".into(),
                start: 900,
                end: 930,
            },
        ];
        let schedule = schedule_from_entries(&entries, Clock::Military).unwrap();
        assert_eq!(schedule.entries[0].aircraft_id, "AC2");
        assert_eq!(schedule.entries[0].start, 600);
        assert_eq!(schedule.entries[1].end, 570);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_schedule(Path::new("does/not/exist.json"), Clock::Minutes).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
