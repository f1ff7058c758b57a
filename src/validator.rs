//! Schedule validator.
//!
//! Replays every checker predicate over a complete candidate schedule and
//! collects every violation. The validator never trusts the engine: it is the
//! ground truth for whether a schedule is legal.
//!
//! # Order of violations
//!
//! 1. Per-entry checks, in schedule order (references, capability, duration,
//!    windows, home reachability)
//! 2. Duplicate (aircraft, operation) entries
//! 3. Missing required (aircraft, operation) pairs
//! 4. Same-truck pairs, truck manifest order, then entry order
//! 5. Same-aircraft pairs, aircraft manifest order, then entry order
//!
//! Pair scans fan out per truck / per aircraft with rayon; results are
//! collected in manifest order so the report is deterministic.
//!
//! # Complexity
//! O(N · M) where N = entries, M = entries per truck or aircraft.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::debug;

use crate::checker::{ConstraintChecker, Indexed};
use crate::models::{Problem, Schedule, Violation, ViolationKind};

/// Result of validating a schedule. Never truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Every violation found.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Whether the schedule satisfies every constraint.
    pub fn is_pass(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pass() {
            return f.write_str("PASS");
        }
        write!(f, "FAIL ({} violation(s))", self.violations.len())
    }
}

/// Validates a complete candidate schedule against the problem.
pub fn validate_schedule(problem: &Problem, schedule: &Schedule) -> ValidationReport {
    let checker = ConstraintChecker::new(problem);
    let indexed: Vec<Indexed<'_>> = schedule.entries.iter().enumerate().collect();

    // Entries grouped by manifest position; unknown references are left out.
    let mut by_truck: Vec<Vec<Indexed<'_>>> = vec![Vec::new(); problem.trucks().len()];
    let mut by_aircraft: Vec<Vec<Indexed<'_>>> = vec![Vec::new(); problem.aircraft().len()];
    for &(idx, entry) in &indexed {
        if let Some(pos) = problem.truck_position(&entry.truck_id) {
            by_truck[pos].push((idx, entry));
        }
        if let Some(pos) = problem.aircraft_position(&entry.aircraft_id) {
            by_aircraft[pos].push((idx, entry));
        }
    }

    let mut violations = Vec::new();

    for &entry in &indexed {
        let (aircraft, operation, truck) = match checker.resolve(entry) {
            Ok(resolved) => resolved,
            Err(v) => {
                violations.push(v);
                continue;
            }
        };
        let same_truck = problem
            .truck_position(&truck.id)
            .map(|pos| by_truck[pos].as_slice())
            .unwrap_or_default();

        let checks = [
            checker.truck_capable_of(entry, truck, operation),
            checker.matches_duration(entry, operation),
            checker.fits_window(entry, aircraft, truck),
            checker.reachable_from_home(entry, aircraft, truck, same_truck),
        ];
        violations.extend(checks.into_iter().filter_map(Result::err));
    }

    violations.extend(duplicate_entries(&indexed));
    violations.extend(missing_entries(problem, schedule));

    let truck_pairs: Vec<Vec<Violation>> = by_truck
        .par_iter()
        .map(|entries| scan_pairs(entries, |a, b| checker.check_truck_pair(a, b)))
        .collect();
    violations.extend(truck_pairs.into_iter().flatten());

    let aircraft_pairs: Vec<Vec<Violation>> = by_aircraft
        .par_iter()
        .map(|entries| scan_pairs(entries, |a, b| checker.check_aircraft_pair(a, b)))
        .collect();
    violations.extend(aircraft_pairs.into_iter().flatten());

    debug!(
        entries = schedule.len(),
        violations = violations.len(),
        "schedule validated"
    );
    ValidationReport { violations }
}

/// Checks every pair `i < j` of one group.
fn scan_pairs<F>(entries: &[Indexed<'_>], check: F) -> Vec<Violation>
where
    F: Fn(Indexed<'_>, Indexed<'_>) -> Result<(), Violation>,
{
    let mut found = Vec::new();
    for (i, &a) in entries.iter().enumerate() {
        for &b in &entries[i + 1..] {
            if let Err(v) = check(a, b) {
                found.push(v);
            }
        }
    }
    found
}

fn duplicate_entries(indexed: &[Indexed<'_>]) -> Vec<Violation> {
    let mut groups: Vec<((&str, &str), Vec<usize>)> = Vec::new();
    let mut position: HashMap<(&str, &str), usize> = HashMap::new();
    for &(idx, entry) in indexed {
        let key = (entry.aircraft_id.as_str(), entry.operation.as_str());
        match position.get(&key) {
            Some(&g) => groups[g].1.push(idx),
            None => {
                position.insert(key, groups.len());
                groups.push((key, vec![idx]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, idxs)| idxs.len() > 1)
        .map(|((aircraft_id, operation), idxs)| {
            let message = format!(
                "operation '{operation}' of aircraft '{aircraft_id}' is scheduled {} times",
                idxs.len()
            );
            Violation::new(ViolationKind::DuplicateEntry, idxs, message)
        })
        .collect()
}

fn missing_entries(problem: &Problem, schedule: &Schedule) -> Vec<Violation> {
    let scheduled: HashSet<(&str, &str)> = schedule
        .entries
        .iter()
        .map(|e| (e.aircraft_id.as_str(), e.operation.as_str()))
        .collect();
    problem
        .required_pairs()
        .filter(|(ac, op)| !scheduled.contains(&(ac.id.as_str(), op.kind.as_str())))
        .map(|(ac, op)| {
            Violation::new(
                ViolationKind::MissingEntry,
                Vec::new(),
                format!("operation '{}' of aircraft '{}' is not scheduled", op.kind, ac.id),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Aircraft, Operation, ScheduleEntry, TerminalConfig, TimeWindow, TransitionMatrix, Truck,
    };

    fn two_aircraft_one_truck() -> Problem {
        Problem::new(
            TerminalConfig::new(TimeWindow::new(0, 1000))
                .with_transitions(TransitionMatrix::uniform(10)),
            vec![
                Aircraft::new("AC1", "G1", 100, 200).with_operation(Operation::new("fuel", 80, "fuel")),
                Aircraft::new("AC2", "G2", 120, 200).with_operation(Operation::new("fuel", 60, "fuel")),
            ],
            vec![Truck::new("F1", "fuel", "G1", TimeWindow::new(0, 1000))],
        )
        .unwrap()
    }

    #[test]
    fn test_forced_overlap_names_both_entries() {
        let p = two_aircraft_one_truck();
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("F1", "AC1", "fuel", 100, 180),
            ScheduleEntry::new("F1", "AC2", "fuel", 120, 180),
        ]);

        let report = validate_schedule(&p, &schedule);
        assert!(!report.is_pass());
        let overlaps: Vec<_> = report.of_kind(ViolationKind::TruckOverlap).collect();
        assert_eq!(overlaps.len(), 1);
        assert!(overlaps[0].involves(0));
        assert!(overlaps[0].involves(1));
    }

    #[test]
    fn test_valid_schedule_passes() {
        let p = Problem::new(
            TerminalConfig::new(TimeWindow::new(0, 1000)),
            vec![Aircraft::new("AC1", "G1", 100, 300).with_operation(Operation::new("fuel", 50, "fuel"))],
            vec![Truck::new("F1", "fuel", "G1", TimeWindow::new(0, 1000))],
        )
        .unwrap();
        let schedule = Schedule::from_entries(vec![ScheduleEntry::new("F1", "AC1", "fuel", 100, 150)]);

        let report = validate_schedule(&p, &schedule);
        assert!(report.is_pass());
        assert_eq!(report.to_string(), "PASS");
    }

    #[test]
    fn test_missing_and_duplicate_entries() {
        let p = two_aircraft_one_truck();
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("F1", "AC1", "fuel", 100, 180),
            ScheduleEntry::new("F1", "AC1", "fuel", 100, 180),
        ]);

        let report = validate_schedule(&p, &schedule);
        let duplicate: Vec<_> = report.of_kind(ViolationKind::DuplicateEntry).collect();
        assert_eq!(duplicate.len(), 1);
        assert_eq!(duplicate[0].entries, vec![0, 1]);

        let missing: Vec<_> = report.of_kind(ViolationKind::MissingEntry).collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].message.contains("AC2"));
    }

    #[test]
    fn test_unknown_references_reported_once() {
        let p = two_aircraft_one_truck();
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("F1", "AC1", "fuel", 100, 180),
            ScheduleEntry::new("F1", "AC2", "fuel", 190, 250),
            ScheduleEntry::new("X1", "AC2", "fuel", 130, 190),
        ]);

        let report = validate_schedule(&p, &schedule);
        assert_eq!(report.violations[0].kind, ViolationKind::OutsideGroundWindow);
        assert_eq!(report.violations[0].entries, vec![1]);
        assert_eq!(report.violations[1].kind, ViolationKind::UnknownTruck);
        assert_eq!(report.violations[1].entries, vec![2]);
    }

    #[test]
    fn test_report_is_complete_and_ordered() {
        let p = two_aircraft_one_truck();
        // wrong duration and overlap at once
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("F1", "AC1", "fuel", 100, 170),
            ScheduleEntry::new("F1", "AC2", "fuel", 120, 180),
        ]);

        let report = validate_schedule(&p, &schedule);
        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![ViolationKind::DurationMismatch, ViolationKind::TruckOverlap]
        );
        assert_eq!(report.to_string(), "FAIL (2 violation(s))");
    }

    #[test]
    fn test_missing_entries_across_many_aircraft() {
        let p = Problem::new(
            TerminalConfig::new(TimeWindow::new(0, 1000)),
            (0..50)
                .map(|i| {
                    Aircraft::new(format!("AC{i:02}"), "G1", 100, 300)
                        .with_operation(Operation::new("fuel", 50, "fuel"))
                })
                .collect(),
            vec![Truck::new("F1", "fuel", "G1", TimeWindow::new(0, 1000))],
        )
        .unwrap();
        let schedule = Schedule::from_entries(vec![ScheduleEntry::new("F1", "AC07", "fuel", 100, 150)]);

        let report = validate_schedule(&p, &schedule);
        let missing: Vec<_> = report.of_kind(ViolationKind::MissingEntry).collect();
        assert_eq!(missing.len(), 49);
        assert!(missing[0].message.contains("AC00"));
        assert!(missing.iter().all(|v| !v.message.contains("AC07")));
    }

    #[test]
    fn test_extreme_entry_times_do_not_panic() {
        let p = two_aircraft_one_truck();
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("F1", "AC1", "fuel", i64::MIN, i64::MAX),
            ScheduleEntry::new("F1", "AC2", "fuel", i64::MAX - 5, i64::MAX),
        ]);

        let report = validate_schedule(&p, &schedule);
        assert!(!report.is_pass());
        assert_eq!(report.of_kind(ViolationKind::DurationMismatch).count(), 2);
        assert_eq!(report.of_kind(ViolationKind::TruckOverlap).count(), 1);
    }

    #[test]
    fn test_transition_gap_violation() {
        let p = two_aircraft_one_truck();
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("F1", "AC1", "fuel", 100, 180),
            ScheduleEntry::new("F1", "AC2", "fuel", 185, 245),
        ]);
        let report = validate_schedule(&p, &schedule);
        // AC2 also leaves its ground window
        assert!(report.of_kind(ViolationKind::OutsideGroundWindow).count() == 1);
        let gap = report.of_kind(ViolationKind::TruckOverlap).next().unwrap();
        assert!(gap.message.contains("5 min gap, 10 min needed"));
    }
}
