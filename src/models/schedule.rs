//! Schedule (solution) model.
//!
//! A schedule assigns every required (aircraft, operation) pair to a truck
//! and a time interval. Violations found by the constraint checker are
//! reported as structured values, never as panics.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeWindow;

/// One truck → aircraft → operation assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Assigned truck ID.
    pub truck_id: String,
    /// Serviced aircraft ID.
    pub aircraft_id: String,
    /// Operation kind on that aircraft.
    pub operation: String,
    /// Start instant (minutes).
    pub start: i64,
    /// End instant (minutes, exclusive) = start + duration.
    pub end: i64,
}

/// A complete or candidate schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Entries in output order.
    pub entries: Vec<ScheduleEntry>,
}

/// A constraint violation.
///
/// `entries` holds the positions of the offending entries in the collection
/// that was checked (schedule order for the validator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub kind: ViolationKind,
    /// Positions of the offending entries.
    pub entries: Vec<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required (aircraft, operation) pair has no entry.
    MissingEntry,
    /// A required (aircraft, operation) pair has more than one entry.
    DuplicateEntry,
    /// Entry references an aircraft that does not exist.
    UnknownAircraft,
    /// Entry references a truck that does not exist.
    UnknownTruck,
    /// Entry references an operation the aircraft does not require.
    UnknownOperation,
    /// Truck type does not match the operation's requirement.
    CapabilityMismatch,
    /// end - start differs from the operation's duration.
    DurationMismatch,
    /// Entry leaves the aircraft's ground window.
    OutsideGroundWindow,
    /// Entry leaves the truck's availability window.
    OutsideAvailability,
    /// Entry leaves the terminal horizon.
    OutsideHorizon,
    /// Truck cannot reach the gate from home in time for its first job.
    UnreachableFromHome,
    /// Two entries on one truck overlap once transition time is added.
    TruckOverlap,
    /// Two mutually exclusive operations on one aircraft overlap.
    AircraftOverlap,
    /// An operation starts before a declared predecessor completes.
    PrecedenceViolation,
}

impl ScheduleEntry {
    /// Creates a new entry.
    pub fn new(
        truck_id: impl Into<String>,
        aircraft_id: impl Into<String>,
        operation: impl Into<String>,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            truck_id: truck_id.into(),
            aircraft_id: aircraft_id.into(),
            operation: operation.into(),
            start,
            end,
        }
    }

    /// Duration (end - start) in minutes.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// The occupied interval `[start, end)`.
    #[inline]
    pub fn interval(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Whether this entry covers `(aircraft_id, operation)`.
    #[inline]
    pub fn is_for(&self, aircraft_id: &str, operation: &str) -> bool {
        self.aircraft_id == aircraft_id && self.operation == operation
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} [{}, {})",
            self.truck_id, self.aircraft_id, self.operation, self.start, self.end
        )
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(kind: ViolationKind, entries: Vec<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entries,
            message: message.into(),
        }
    }

    /// Creates a violation about a single entry.
    pub fn single(kind: ViolationKind, entry: usize, message: impl Into<String>) -> Self {
        Self::new(kind, vec![entry], message)
    }

    /// Creates a violation about a pair of entries.
    pub fn pair(kind: ViolationKind, a: usize, b: usize, message: impl Into<String>) -> Self {
        Self::new(kind, vec![a, b], message)
    }

    /// Whether the violation involves the entry at `index`.
    pub fn involves(&self, index: usize) -> bool {
        self.entries.contains(&index)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from entries, keeping their order.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Adds an entry.
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Sorts entries by (start, truck, aircraft, operation).
    pub fn sort_canonical(&mut self) {
        self.entries.sort_by(|a, b| {
            (a.start, &a.truck_id, &a.aircraft_id, &a.operation).cmp(&(
                b.start,
                &b.truck_id,
                &b.aircraft_id,
                &b.operation,
            ))
        });
    }

    /// Latest end time across all entries.
    pub fn makespan(&self) -> i64 {
        self.entries.iter().map(|e| e.end).max().unwrap_or(0)
    }

    /// Finds the entry for an (aircraft, operation) pair.
    pub fn entry_for(&self, aircraft_id: &str, operation: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.is_for(aircraft_id, operation))
    }

    /// Returns all entries for a given truck, in schedule order.
    pub fn entries_for_truck(&self, truck_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.truck_id == truck_id)
            .collect()
    }

    /// Returns all entries for a given aircraft, in schedule order.
    pub fn entries_for_aircraft(&self, aircraft_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.aircraft_id == aircraft_id)
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_entry(ScheduleEntry::new("F1", "AC2", "fuel", 200, 230));
        s.add_entry(ScheduleEntry::new("F1", "AC1", "fuel", 100, 150));
        s.add_entry(ScheduleEntry::new("B1", "AC1", "bags", 100, 120));
        s
    }

    #[test]
    fn test_schedule_queries() {
        let s = sample_schedule();
        assert_eq!(s.len(), 3);
        assert_eq!(s.makespan(), 230);
        assert_eq!(s.entries_for_truck("F1").len(), 2);
        assert_eq!(s.entries_for_aircraft("AC1").len(), 2);
        assert_eq!(s.entry_for("AC1", "bags").unwrap().truck_id, "B1");
        assert!(s.entry_for("AC2", "bags").is_none());
    }

    #[test]
    fn test_sort_canonical() {
        let mut s = sample_schedule();
        s.sort_canonical();
        let order: Vec<_> = s
            .entries
            .iter()
            .map(|e| (e.start, e.truck_id.as_str()))
            .collect();
        assert_eq!(order, vec![(100, "B1"), (100, "F1"), (200, "F1")]);
    }

    #[test]
    fn test_entry_display_and_duration() {
        let e = ScheduleEntry::new("F1", "AC1", "fuel", 100, 150);
        assert_eq!(e.duration(), 50);
        assert_eq!(e.to_string(), "F1/AC1/fuel [100, 150)");
    }

    #[test]
    fn test_violation_factories() {
        let v = Violation::pair(ViolationKind::TruckOverlap, 0, 3, "overlap");
        assert!(v.involves(0));
        assert!(v.involves(3));
        assert!(!v.involves(1));

        let v = Violation::single(ViolationKind::OutsideHorizon, 2, "late");
        assert_eq!(v.entries, vec![2]);
        assert_eq!(v.to_string(), "OutsideHorizon: late");
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert!(s.is_empty());
        assert_eq!(s.makespan(), 0);
    }
}
