//! Raw JSON records for the input and output files.
//!
//! These mirror the file layout one-to-one and carry times in the file's
//! clock encoding. Conversion to domain types happens in the loader.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{in_range, CheckerPolicy};
use crate::scheduler::Infeasibility;

/// Encoding of instants in the input and output files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    /// Plain minutes on the run clock.
    #[default]
    Minutes,
    /// 24-hour HHMM integers (e.g. `1345`), minutes since midnight internally.
    Military,
}

impl Clock {
    /// Converts a file value to run-clock minutes.
    ///
    /// Returns `None` for values that are not valid in this encoding: HHMM
    /// values need an hour below 24 and minutes below 60, plain minutes must
    /// stay within [`MAX_MINUTES`](crate::models::MAX_MINUTES).
    pub fn to_minutes(self, value: i64) -> Option<i64> {
        match self {
            Clock::Minutes => in_range(value).then_some(value),
            Clock::Military => {
                let (hours, minutes) = (value / 100, value % 100);
                if value < 0 || hours >= 24 || minutes >= 60 {
                    None
                } else {
                    Some(hours * 60 + minutes)
                }
            }
        }
    }

    /// Converts run-clock minutes to a file value.
    pub fn from_minutes(self, minutes: i64) -> i64 {
        match self {
            Clock::Minutes => minutes,
            Clock::Military => minutes.div_euclid(60) * 100 + minutes.rem_euclid(60),
        }
    }
}

/// `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonMeta {
    #[serde(default)]
    pub clock: Clock,
    pub horizon: JsonWindow,
    #[serde(default)]
    pub trucks_per_type: BTreeMap<String, u32>,
    #[serde(default)]
    pub transition: JsonTransitions,
    #[serde(default)]
    pub policy: CheckerPolicy,
}

/// A `{start, end}` pair in the file clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonWindow {
    pub start: i64,
    pub end: i64,
}

/// Transition times, always in minutes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonTransitions {
    #[serde(default)]
    pub default: i64,
    #[serde(default)]
    pub same_location: i64,
    #[serde(default)]
    pub pairs: Vec<JsonTransitionPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonTransitionPair {
    pub from: String,
    pub to: String,
    pub minutes: i64,
}

/// One element of `aircraft.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonAircraft {
    pub id: String,
    pub gate: String,
    pub arrival: i64,
    pub departure: i64,
    #[serde(default)]
    pub operations: Vec<JsonOperation>,
}

/// One required operation; `duration` is always in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonOperation {
    pub kind: String,
    pub duration: i64,
    pub truck_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusive_with: Vec<String>,
}

/// One element of `trucks.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonTruck {
    pub id: String,
    pub truck_type: String,
    pub home: String,
    pub available: JsonWindow,
}

/// One schedule entry in the file clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonEntry {
    pub truck: String,
    pub aircraft: String,
    pub operation: String,
    pub start: i64,
    pub end: i64,
}

/// Schedule file as written by the engine.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JsonScheduleOutput<'a> {
    Feasible { entries: Vec<JsonEntry> },
    Infeasible { report: &'a Infeasibility },
}

/// Schedule file as read back for validation. The report of an infeasible
/// run is kept opaque.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JsonScheduleInput {
    Feasible { entries: Vec<JsonEntry> },
    Infeasible { report: serde_json::Value },
}
