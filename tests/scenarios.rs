use std::path::PathBuf;

use u_turnaround::error::{InputError, ModelViolationKind};
use u_turnaround::io::{load_problem, load_schedule, render_outcome, Clock, LoadError, LoadedProblem};
use u_turnaround::models::{ScheduleEntry, ViolationKind};
use u_turnaround::scheduler::{FailureReason, Scheduler};
use u_turnaround::validator::validate_schedule;

fn fixture(case: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(case)
}

fn load(case: &str) -> LoadedProblem {
    try_load(case).unwrap()
}

fn try_load(case: &str) -> Result<LoadedProblem, LoadError> {
    let dir = fixture(case);
    load_problem(
        &dir.join("meta.json"),
        &dir.join("aircraft.json"),
        &dir.join("trucks.json"),
    )
}

#[test]
fn test_single_fuel_schedules_at_arrival() {
    let loaded = load("single_fuel");
    let schedule = Scheduler::new().schedule(&loaded.problem).unwrap();

    assert_eq!(
        schedule.entries,
        vec![ScheduleEntry::new("F1", "AC1", "fuel", 100, 150)]
    );
    assert!(validate_schedule(&loaded.problem, &schedule).is_pass());
}

#[test]
fn test_single_fuel_candidate_files() {
    let loaded = load("single_fuel");

    let pass = load_schedule(&fixture("single_fuel").join("schedule_pass.json"), loaded.clock).unwrap();
    assert!(validate_schedule(&loaded.problem, &pass).is_pass());

    let fail =
        load_schedule(&fixture("single_fuel").join("schedule_fail_window.json"), loaded.clock).unwrap();
    let report = validate_schedule(&loaded.problem, &fail);
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::OutsideGroundWindow);
}

#[test]
fn test_sole_truck_conflict_is_infeasible() {
    let loaded = load("sole_truck_conflict");
    let report = Scheduler::new().schedule(&loaded.problem).unwrap_err();

    assert_eq!(report.aircraft_id, "AC2");
    assert_eq!(report.operation, "fuel");
    assert_eq!(report.reason, FailureReason::WindowsExhausted);
}

#[test]
fn test_forced_overlap_fails_validation() {
    let loaded = load("sole_truck_conflict");
    let candidate = load_schedule(
        &fixture("sole_truck_conflict").join("schedule_fail_overlap.json"),
        loaded.clock,
    )
    .unwrap();

    let report = validate_schedule(&loaded.problem, &candidate);
    assert!(!report.is_pass());
    let overlap = report.of_kind(ViolationKind::TruckOverlap).next().unwrap();
    assert_eq!(overlap.entries, vec![0, 1]);
}

#[test]
fn test_military_clock_round_trip() {
    let loaded = load("military_turnaround");
    assert_eq!(loaded.clock, Clock::Military);

    let outcome = Scheduler::new().schedule(&loaded.problem);
    let schedule = outcome.clone().unwrap();
    let expected = load_schedule(
        &fixture("military_turnaround").join("expected_schedule.json"),
        loaded.clock,
    )
    .unwrap();
    assert_eq!(schedule, expected);

    let rendered: serde_json::Value =
        serde_json::from_str(&render_outcome(&outcome, loaded.clock).unwrap()).unwrap();
    let expected_file: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(fixture("military_turnaround").join("expected_schedule.json"))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(rendered, expected_file);
}

#[test]
fn test_invalid_input_reports_every_violation() {
    let err = try_load("cyclic_precedence").unwrap_err();
    let violations = match err {
        LoadError::Input(InputError::Model(violations)) => violations,
        other => panic!("expected model violations, got {other}"),
    };
    let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
    assert!(kinds.contains(&ModelViolationKind::CyclicPrecedence));
    assert!(kinds.contains(&ModelViolationKind::EmptyGroundWindow));
}
