//! Infeasibility report.
//!
//! Produced when the engine cannot place a required job after bounded
//! backtracking. Names the first job that could not be placed and why every
//! truck was rejected for it.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::ViolationKind;

/// The engine could not construct a complete schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("cannot place operation '{operation}' of aircraft '{aircraft_id}': {reason}")]
pub struct Infeasibility {
    /// Aircraft of the first job that could not be placed.
    pub aircraft_id: String,
    /// Operation kind of that job.
    pub operation: String,
    /// Why no truck could take the job.
    pub reason: FailureReason,
    /// Every truck considered, with its rejection reason (truck ID order).
    pub rejections: Vec<TruckRejection>,
    /// Backtrack steps performed before giving up.
    pub backtracks: usize,
    /// Whether the search stopped because the backtrack budget ran out.
    pub budget_exhausted: bool,
}

/// Reason code for a placement failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No truck of the required type exists.
    NoCompatibleTruck,
    /// Every compatible truck's windows are exhausted.
    WindowsExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoCompatibleTruck => f.write_str("no compatible truck"),
            FailureReason::WindowsExhausted => f.write_str("all compatible trucks' windows exhausted"),
        }
    }
}

/// Why one truck could not take the failing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruckRejection {
    /// Rejected truck.
    pub truck_id: String,
    /// Rejection reason.
    pub reason: RejectionReason,
}

/// Per-truck rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectionReason {
    /// Truck type differs from the operation's requirement.
    IncompatibleType { truck_type: String, required: String },
    /// Truck has an empty availability window.
    NeverAvailable,
    /// Every candidate start failed a constraint; the earliest failure is kept.
    NoFeasibleSlot { kind: ViolationKind, detail: String },
}

impl fmt::Display for TruckRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RejectionReason::IncompatibleType {
                truck_type,
                required,
            } => write!(f, "{}: type '{truck_type}', needs '{required}'", self.truck_id),
            RejectionReason::NeverAvailable => write!(f, "{}: never available", self.truck_id),
            RejectionReason::NoFeasibleSlot { detail, .. } => {
                write!(f, "{}: no feasible slot ({detail})", self.truck_id)
            }
        }
    }
}

impl Infeasibility {
    /// Builds the report for a job whose trucks were all rejected.
    pub fn new(
        aircraft_id: impl Into<String>,
        operation: impl Into<String>,
        rejections: Vec<TruckRejection>,
    ) -> Self {
        let compatible = rejections
            .iter()
            .any(|r| !matches!(r.reason, RejectionReason::IncompatibleType { .. }));
        Self {
            aircraft_id: aircraft_id.into(),
            operation: operation.into(),
            reason: if compatible {
                FailureReason::WindowsExhausted
            } else {
                FailureReason::NoCompatibleTruck
            },
            rejections,
            backtracks: 0,
            budget_exhausted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_derivation() {
        let none = Infeasibility::new(
            "AC1",
            "deicing",
            vec![TruckRejection {
                truck_id: "F1".into(),
                reason: RejectionReason::IncompatibleType {
                    truck_type: "fuel".into(),
                    required: "deicer".into(),
                },
            }],
        );
        assert_eq!(none.reason, FailureReason::NoCompatibleTruck);
        assert_eq!(
            none.to_string(),
            "cannot place operation 'deicing' of aircraft 'AC1': no compatible truck"
        );

        let exhausted = Infeasibility::new(
            "AC1",
            "fuel",
            vec![TruckRejection {
                truck_id: "F2".into(),
                reason: RejectionReason::NeverAvailable,
            }],
        );
        assert_eq!(exhausted.reason, FailureReason::WindowsExhausted);
        assert_eq!(exhausted.rejections[0].to_string(), "F2: never available");
    }

    #[test]
    fn test_empty_fleet_is_no_compatible_truck() {
        let report = Infeasibility::new("AC1", "fuel", vec![]);
        assert_eq!(report.reason, FailureReason::NoCompatibleTruck);
    }

    #[test]
    fn test_report_serializes_with_codes() {
        let report = Infeasibility::new(
            "AC2",
            "fuel",
            vec![TruckRejection {
                truck_id: "F1".into(),
                reason: RejectionReason::NoFeasibleSlot {
                    kind: ViolationKind::TruckOverlap,
                    detail: "overlap".into(),
                },
            }],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reason"], "windows_exhausted");
        assert_eq!(json["rejections"][0]["reason"]["code"], "no_feasible_slot");
        assert_eq!(json["rejections"][0]["reason"]["kind"], "truck_overlap");
    }
}
