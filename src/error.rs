//! Input error taxonomy.
//!
//! Configuration errors are fatal and reported before any scheduling attempt.
//! Model violations are collected per entity so that every broken aircraft or
//! truck record is reported, not only the first one.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Malformed or inconsistent terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("horizon end {end} must be after horizon start {start}")]
    EmptyHorizon { start: i64, end: i64 },
    #[error("transition time from '{from}' to '{to}' is negative ({minutes} min)")]
    NegativeTransition {
        from: String,
        to: String,
        minutes: i64,
    },
    #[error("{field} {value} is outside the supported range of ±{max} min", max = crate::models::MAX_MINUTES)]
    OutOfRange { field: String, value: i64 },
    #[error("terminal declares {declared} truck(s) of type '{truck_type}' but the manifest lists {actual}")]
    FleetMismatch {
        truck_type: String,
        declared: u32,
        actual: u32,
    },
}

/// The entity a model violation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "entity", content = "id", rename_all = "snake_case")]
pub enum Entity {
    Aircraft(String),
    Truck(String),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Aircraft(id) => write!(f, "aircraft '{id}'"),
            Entity::Truck(id) => write!(f, "truck '{id}'"),
        }
    }
}

/// Categories of self-contradictory aircraft/truck data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelViolationKind {
    /// Two entities of the same class share an ID.
    DuplicateId,
    /// Arrival is not strictly before departure.
    EmptyGroundWindow,
    /// Operation duration is zero or negative.
    NonPositiveDuration,
    /// Operation duration does not fit inside the ground window.
    OperationExceedsWindow,
    /// The same operation kind is required twice on one aircraft.
    DuplicateOperation,
    /// `after`/`exclusive_with` names a kind the aircraft does not require.
    UnknownOperationReference,
    /// Precedence declarations form a cycle.
    CyclicPrecedence,
    /// Truck availability ends before it starts.
    InvertedAvailability,
    /// An instant or duration exceeds the supported magnitude.
    OutOfRange,
}

/// A self-contradictory aircraft or truck record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{entity}: {message}")]
pub struct ModelViolation {
    /// Offending entity.
    pub entity: Entity,
    /// Violation category.
    pub kind: ModelViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl ModelViolation {
    pub(crate) fn aircraft(
        id: &str,
        kind: ModelViolationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity: Entity::Aircraft(id.to_string()),
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn truck(id: &str, kind: ModelViolationKind, message: impl Into<String>) -> Self {
        Self {
            entity: Entity::Truck(id.to_string()),
            kind,
            message: message.into(),
        }
    }
}

/// Input rejected before scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid terminal configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{}", summarize(.0))]
    Model(Vec<ModelViolation>),
}

impl InputError {
    /// Model violations carried by this error (empty for config errors).
    pub fn violations(&self) -> &[ModelViolation] {
        match self {
            InputError::Config(_) => &[],
            InputError::Model(v) => v,
        }
    }
}

fn summarize(violations: &[ModelViolation]) -> String {
    let lines: Vec<String> = violations.iter().map(|v| format!("  - {v}")).collect();
    format!(
        "{} invalid aircraft/truck record(s):\n{}",
        violations.len(),
        lines.join("\n")
    )
}
