//! Constraint checker.
//!
//! Pure, stateless predicates that decide whether a proposed entry is locally
//! legal against a [`Problem`] and a partial or complete set of other entries.
//! A failed predicate yields a typed [`Violation`]; partial schedules are
//! checked many times during search, so nothing here allocates on success.
//!
//! Entries are passed as `(position, &entry)` pairs. The position is opaque
//! to the checker and is echoed back in violations so callers can name the
//! offending entries (schedule order in the validator, arena slot in the
//! engine).
//!
//! # Transition model
//! A truck finishing entry A at `A.end` at gate `g_A` may start entry B at
//! gate `g_B` no earlier than `A.end + transition(g_A, g_B)`. The first job of
//! a truck starts no earlier than `availability.start + transition(home, gate)`.

use crate::models::{
    Aircraft, Operation, OperationOverlap, Problem, ScheduleEntry, Truck, Violation, ViolationKind,
};

/// An entry together with its position in the checked collection.
pub type Indexed<'e> = (usize, &'e ScheduleEntry);

/// Legality oracle shared by the scheduling engine and the validator.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintChecker<'a> {
    problem: &'a Problem,
}

impl<'a> ConstraintChecker<'a> {
    /// Creates a checker over a validated problem.
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }

    /// The problem this checker reads.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Resolves the aircraft, operation and truck an entry refers to.
    pub fn resolve(
        &self,
        (idx, entry): Indexed<'_>,
    ) -> Result<(&'a Aircraft, &'a Operation, &'a Truck), Violation> {
        let aircraft = self.problem.aircraft_by_id(&entry.aircraft_id).ok_or_else(|| {
            Violation::single(
                ViolationKind::UnknownAircraft,
                idx,
                format!("{entry}: unknown aircraft '{}'", entry.aircraft_id),
            )
        })?;
        let operation = aircraft.operation(&entry.operation).ok_or_else(|| {
            Violation::single(
                ViolationKind::UnknownOperation,
                idx,
                format!(
                    "{entry}: aircraft '{}' does not require '{}'",
                    aircraft.id, entry.operation
                ),
            )
        })?;
        let truck = self.problem.truck_by_id(&entry.truck_id).ok_or_else(|| {
            Violation::single(
                ViolationKind::UnknownTruck,
                idx,
                format!("{entry}: unknown truck '{}'", entry.truck_id),
            )
        })?;
        Ok((aircraft, operation, truck))
    }

    /// Truck type must match the operation's required truck type.
    pub fn truck_capable_of(
        &self,
        (idx, entry): Indexed<'_>,
        truck: &Truck,
        operation: &Operation,
    ) -> Result<(), Violation> {
        if truck.can_perform(operation) {
            return Ok(());
        }
        Err(Violation::single(
            ViolationKind::CapabilityMismatch,
            idx,
            format!(
                "{entry}: truck type '{}' cannot perform '{}' (needs '{}')",
                truck.truck_type, operation.kind, operation.truck_type
            ),
        ))
    }

    /// Entry length must equal the operation's fixed duration.
    pub fn matches_duration(
        &self,
        (idx, entry): Indexed<'_>,
        operation: &Operation,
    ) -> Result<(), Violation> {
        if entry.duration() == operation.duration {
            return Ok(());
        }
        Err(Violation::single(
            ViolationKind::DurationMismatch,
            idx,
            format!(
                "{entry}: lasts {} min but '{}' takes {} min",
                entry.duration(),
                operation.kind,
                operation.duration
            ),
        ))
    }

    /// Entry must lie within the ground window, the truck's availability and
    /// the terminal horizon (reported in that order).
    pub fn fits_window(
        &self,
        (idx, entry): Indexed<'_>,
        aircraft: &Aircraft,
        truck: &Truck,
    ) -> Result<(), Violation> {
        let checks = [
            (aircraft.ground, ViolationKind::OutsideGroundWindow, "ground window"),
            (truck.availability, ViolationKind::OutsideAvailability, "truck availability"),
            (self.problem.terminal().horizon, ViolationKind::OutsideHorizon, "horizon"),
        ];
        for (window, kind, label) in checks {
            if !window.contains_interval(entry.start, entry.end) {
                return Err(Violation::single(
                    kind,
                    idx,
                    format!("{entry}: outside {label} [{}, {})", window.start, window.end),
                ));
            }
        }
        Ok(())
    }

    /// The truck's first job must leave room to drive from home.
    ///
    /// `others` are the remaining entries on the same truck; only an entry
    /// with no earlier-starting sibling is constrained.
    pub fn reachable_from_home(
        &self,
        (idx, entry): Indexed<'_>,
        aircraft: &Aircraft,
        truck: &Truck,
        others: &[Indexed<'_>],
    ) -> Result<(), Violation> {
        let is_first = others
            .iter()
            .all(|&(other_idx, other)| other_idx == idx || other.start >= entry.start);
        if !is_first {
            return Ok(());
        }
        let travel = self.problem.terminal().transition(&truck.home, &aircraft.gate);
        let earliest = truck.availability.start.saturating_add(travel);
        if entry.start >= earliest {
            return Ok(());
        }
        Err(Violation::single(
            ViolationKind::UnreachableFromHome,
            idx,
            format!(
                "{entry}: truck needs {travel} min from '{}' to '{}', earliest start {earliest}",
                truck.home, aircraft.gate
            ),
        ))
    }

    /// Two entries on the same truck must be separated by the transition time
    /// between their gates, in whichever order they run.
    pub fn check_truck_pair(&self, a: Indexed<'_>, b: Indexed<'_>) -> Result<(), Violation> {
        let (a_idx, a_entry) = a;
        let (b_idx, b_entry) = b;
        let (Some(a_ac), Some(b_ac)) = (
            self.problem.aircraft_by_id(&a_entry.aircraft_id),
            self.problem.aircraft_by_id(&b_entry.aircraft_id),
        ) else {
            // Unknown aircraft are reported by the per-entry checks.
            return Ok(());
        };

        let terminal = self.problem.terminal();
        let a_to_b = terminal.transition(&a_ac.gate, &b_ac.gate);
        let b_to_a = terminal.transition(&b_ac.gate, &a_ac.gate);
        if a_entry.end.saturating_add(a_to_b) <= b_entry.start
            || b_entry.end.saturating_add(b_to_a) <= a_entry.start
        {
            return Ok(());
        }

        let message = if a_entry.interval().overlaps(&b_entry.interval()) {
            format!("{a_entry} overlaps {b_entry}")
        } else {
            let gap = if a_entry.end <= b_entry.start {
                let minutes = b_entry.start.saturating_sub(a_entry.end);
                format!("{minutes} min gap, {a_to_b} min needed")
            } else {
                let minutes = a_entry.start.saturating_sub(b_entry.end);
                format!("{minutes} min gap, {b_to_a} min needed")
            };
            format!("{a_entry} and {b_entry} leave no transition time ({gap})")
        };
        Err(Violation::pair(ViolationKind::TruckOverlap, a_idx, b_idx, message))
    }

    /// Two entries on the same aircraft must respect mutual exclusion (per
    /// policy) and declared precedence in both directions.
    pub fn check_aircraft_pair(&self, a: Indexed<'_>, b: Indexed<'_>) -> Result<(), Violation> {
        let (a_idx, a_entry) = a;
        let (b_idx, b_entry) = b;
        let (Some((_, a_op)), Some((_, b_op))) = (
            self.problem.operation(&a_entry.aircraft_id, &a_entry.operation),
            self.problem.operation(&b_entry.aircraft_id, &b_entry.operation),
        ) else {
            return Ok(());
        };
        let policy = self.problem.terminal().policy;

        let exclusive = match policy.operation_overlap {
            OperationOverlap::Declared => {
                a_op.declares_exclusive(&b_op.kind) || b_op.declares_exclusive(&a_op.kind)
            }
            OperationOverlap::Exclusive => true,
            OperationOverlap::Allowed => false,
        };
        if exclusive && a_entry.interval().overlaps(&b_entry.interval()) {
            return Err(Violation::pair(
                ViolationKind::AircraftOverlap,
                a_idx,
                b_idx,
                format!("{a_entry} overlaps mutually exclusive {b_entry}"),
            ));
        }

        if policy.enforce_precedence {
            if a_op.must_follow(&b_op.kind) && b_entry.end > a_entry.start {
                return Err(Violation::pair(
                    ViolationKind::PrecedenceViolation,
                    b_idx,
                    a_idx,
                    format!("{a_entry} starts before predecessor {b_entry} completes"),
                ));
            }
            if b_op.must_follow(&a_op.kind) && a_entry.end > b_entry.start {
                return Err(Violation::pair(
                    ViolationKind::PrecedenceViolation,
                    a_idx,
                    b_idx,
                    format!("{b_entry} starts before predecessor {a_entry} completes"),
                ));
            }
        }
        Ok(())
    }

    /// No other entry on the same truck conflicts with `entry`.
    pub fn no_truck_overlap(
        &self,
        entry: Indexed<'_>,
        others: &[Indexed<'_>],
    ) -> Result<(), Violation> {
        others
            .iter()
            .filter(|(other_idx, _)| *other_idx != entry.0)
            .try_for_each(|&other| self.check_truck_pair(entry, other))
    }

    /// No other entry on the same aircraft conflicts with `entry`.
    pub fn no_aircraft_conflict(
        &self,
        entry: Indexed<'_>,
        others: &[Indexed<'_>],
    ) -> Result<(), Violation> {
        others
            .iter()
            .filter(|(other_idx, _)| *other_idx != entry.0)
            .try_for_each(|&other| self.check_aircraft_pair(entry, other))
    }

    /// Runs every predicate for one proposed placement.
    ///
    /// `truck_entries` and `aircraft_entries` are the already committed
    /// entries sharing the truck and the aircraft respectively.
    pub fn check_placement(
        &self,
        entry: Indexed<'_>,
        truck_entries: &[Indexed<'_>],
        aircraft_entries: &[Indexed<'_>],
    ) -> Result<(), Violation> {
        let (aircraft, operation, truck) = self.resolve(entry)?;
        self.truck_capable_of(entry, truck, operation)?;
        self.matches_duration(entry, operation)?;
        self.fits_window(entry, aircraft, truck)?;
        self.reachable_from_home(entry, aircraft, truck, truck_entries)?;
        self.no_truck_overlap(entry, truck_entries)?;
        self.no_aircraft_conflict(entry, aircraft_entries)
    }
}
