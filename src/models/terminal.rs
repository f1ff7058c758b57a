//! Terminal configuration, transition times and checker policy.
//!
//! The terminal configuration is loaded once per run and never mutated.
//! It carries the planning horizon, the declared fleet, the transition-time
//! model between locations, and the policy knobs of the constraint checker.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::TimeWindow;

/// Static configuration of one terminal for one run.
///
/// Built by the loader from `meta.json` or through the builders below.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Planning horizon; every entry must lie inside it.
    pub horizon: TimeWindow,
    /// Declared number of trucks per truck type. Empty = undeclared.
    pub trucks_per_type: BTreeMap<String, u32>,
    /// Location-to-location transition times.
    pub transitions: TransitionMatrix,
    /// Ordering semantics enforced by the constraint checker.
    pub policy: CheckerPolicy,
}

impl TerminalConfig {
    /// Creates a configuration with a horizon, zero transition time and default policy.
    pub fn new(horizon: TimeWindow) -> Self {
        Self {
            horizon,
            trucks_per_type: BTreeMap::new(),
            transitions: TransitionMatrix::default(),
            policy: CheckerPolicy::default(),
        }
    }

    /// Declares the fleet size for a truck type.
    pub fn with_fleet(mut self, truck_type: impl Into<String>, count: u32) -> Self {
        self.trucks_per_type.insert(truck_type.into(), count);
        self
    }

    /// Sets the transition matrix.
    pub fn with_transitions(mut self, transitions: TransitionMatrix) -> Self {
        self.transitions = transitions;
        self
    }

    /// Sets the checker policy.
    pub fn with_policy(mut self, policy: CheckerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Transition time between two locations (minutes).
    #[inline]
    pub fn transition(&self, from: &str, to: &str) -> i64 {
        self.transitions.get_transition(from, to)
    }
}

/// Location-dependent transition (travel/repositioning) times.
///
/// Maps (from_location, to_location) → minutes. A fixed constant is the
/// special case of an empty table with only a default.
#[derive(Debug, Clone, Default)]
pub struct TransitionMatrix {
    /// Transition time between two different locations with no explicit entry.
    pub default: i64,
    /// Transition time within one location with no explicit entry.
    pub same_location: i64,
    pairs: HashMap<(String, String), i64>,
}

impl TransitionMatrix {
    /// Creates a matrix with zero transition time everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matrix where every move, including staying put, costs `minutes`.
    pub fn uniform(minutes: i64) -> Self {
        Self {
            default: minutes,
            same_location: minutes,
            pairs: HashMap::new(),
        }
    }

    /// Sets the default transition time between different locations.
    pub fn with_default(mut self, minutes: i64) -> Self {
        self.default = minutes;
        self
    }

    /// Sets the transition time within one location.
    pub fn with_same_location(mut self, minutes: i64) -> Self {
        self.same_location = minutes;
        self
    }

    /// Builder: defines a directed transition time.
    pub fn with_transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        minutes: i64,
    ) -> Self {
        self.set_transition(from, to, minutes);
        self
    }

    /// Defines a directed transition time between two locations.
    pub fn set_transition(&mut self, from: impl Into<String>, to: impl Into<String>, minutes: i64) {
        self.pairs.insert((from.into(), to.into()), minutes);
    }

    /// Gets the transition time between two locations.
    ///
    /// Returns the explicit time if defined, otherwise `same_location` when
    /// `from == to`, otherwise the default.
    pub fn get_transition(&self, from: &str, to: &str) -> i64 {
        if let Some(&minutes) = self.pairs.get(&(from.to_string(), to.to_string())) {
            return minutes;
        }
        if from == to {
            self.same_location
        } else {
            self.default
        }
    }

    /// Explicit pairs, sorted for stable output.
    pub fn explicit_pairs(&self) -> Vec<(&str, &str, i64)> {
        let mut pairs: Vec<_> = self
            .pairs
            .iter()
            .map(|((from, to), &m)| (from.as_str(), to.as_str(), m))
            .collect();
        pairs.sort();
        pairs
    }
}

/// Which operations on one aircraft may run at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOverlap {
    /// Only pairs declared via `exclusive_with` are mutually exclusive.
    #[default]
    Declared,
    /// No two operations on the same aircraft may overlap.
    Exclusive,
    /// Aircraft-level overlap is never checked.
    Allowed,
}

/// Ordering semantics enforced by the constraint checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerPolicy {
    /// Mutual-exclusion mode between operations of one aircraft.
    #[serde(default)]
    pub operation_overlap: OperationOverlap,
    /// Whether `after` precedence declarations are enforced.
    #[serde(default = "enabled")]
    pub enforce_precedence: bool,
}

fn enabled() -> bool {
    true
}

impl Default for CheckerPolicy {
    fn default() -> Self {
        Self {
            operation_overlap: OperationOverlap::Declared,
            enforce_precedence: true,
        }
    }
}
