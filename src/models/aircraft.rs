//! Aircraft and servicing operation models.
//!
//! An aircraft sits at a gate during its ground window and requires a set of
//! servicing operations, each performed by one truck of a given type.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// An aircraft on the ground at the terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    /// Unique aircraft identifier (e.g. flight number or tail).
    pub id: String,
    /// Gate/stand where the aircraft is serviced.
    pub gate: String,
    /// Ground window [arrival, departure).
    pub ground: TimeWindow,
    /// Required servicing operations, one entry per kind.
    pub operations: Vec<Operation>,
}

/// A servicing operation required by one aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Operation type tag (e.g. "fuel", "baggage", "catering").
    /// Unique within an aircraft.
    pub kind: String,
    /// Fixed processing time (minutes).
    pub duration: i64,
    /// Truck type able to perform this operation.
    pub truck_type: String,
    /// Kinds that must complete before this operation starts.
    #[serde(default)]
    pub after: Vec<String>,
    /// Kinds that must not overlap this operation.
    #[serde(default)]
    pub exclusive_with: Vec<String>,
}

impl Aircraft {
    /// Creates an aircraft with no operations.
    pub fn new(id: impl Into<String>, gate: impl Into<String>, arrival: i64, departure: i64) -> Self {
        Self {
            id: id.into(),
            gate: gate.into(),
            ground: TimeWindow::new(arrival, departure),
            operations: Vec::new(),
        }
    }

    /// Adds a required operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Arrival instant.
    #[inline]
    pub fn arrival(&self) -> i64 {
        self.ground.start
    }

    /// Departure instant.
    #[inline]
    pub fn departure(&self) -> i64 {
        self.ground.end
    }

    /// Finds a required operation by kind.
    pub fn operation(&self, kind: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.kind == kind)
    }

    /// Total processing time across all operations (minutes).
    pub fn total_duration(&self) -> i64 {
        self.operations.iter().map(|op| op.duration).sum()
    }

    /// Whether this aircraft requires any servicing.
    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }
}

impl Operation {
    /// Creates an operation.
    pub fn new(kind: impl Into<String>, duration: i64, truck_type: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            duration,
            truck_type: truck_type.into(),
            after: Vec::new(),
            exclusive_with: Vec::new(),
        }
    }

    /// Requires `kind` to complete before this operation starts.
    pub fn after(mut self, kind: impl Into<String>) -> Self {
        self.after.push(kind.into());
        self
    }

    /// Declares `kind` mutually exclusive with this operation.
    pub fn exclusive_with(mut self, kind: impl Into<String>) -> Self {
        self.exclusive_with.push(kind.into());
        self
    }

    /// Whether `other` must complete before this operation starts.
    pub fn must_follow(&self, other: &str) -> bool {
        self.after.iter().any(|k| k == other)
    }

    /// Whether this operation declares `other` as mutually exclusive.
    pub fn declares_exclusive(&self, other: &str) -> bool {
        self.exclusive_with.iter().any(|k| k == other)
    }
}
