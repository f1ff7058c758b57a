//! JSON writer for schedules and infeasibility reports.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::records::{Clock, JsonEntry, JsonScheduleOutput};
use crate::models::Schedule;
use crate::scheduler::Infeasibility;

/// Errors raised while writing the output file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize output")]
    Json(#[from] serde_json::Error),
}

/// Converts schedule entries to file records in `clock`.
pub fn schedule_entries(schedule: &Schedule, clock: Clock) -> Vec<JsonEntry> {
    schedule
        .entries
        .iter()
        .map(|e| JsonEntry {
            truck: e.truck_id.clone(),
            aircraft: e.aircraft_id.clone(),
            operation: e.operation.clone(),
            start: clock.from_minutes(e.start),
            end: clock.from_minutes(e.end),
        })
        .collect()
}

/// Renders the outcome of a scheduling run as pretty-printed JSON.
pub fn render_outcome(
    outcome: &Result<Schedule, Infeasibility>,
    clock: Clock,
) -> Result<String, WriteError> {
    let output = match outcome {
        Ok(schedule) => JsonScheduleOutput::Feasible {
            entries: schedule_entries(schedule, clock),
        },
        Err(report) => JsonScheduleOutput::Infeasible { report },
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Writes the outcome of a scheduling run to `path`.
pub fn write_outcome(
    path: &Path,
    outcome: &Result<Schedule, Infeasibility>,
    clock: Clock,
) -> Result<(), WriteError> {
    let text = render_outcome(outcome, clock)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text + "\n").map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::records::JsonScheduleInput;
    use crate::models::ScheduleEntry;
    use crate::scheduler::{RejectionReason, TruckRejection};

    #[test]
    fn test_feasible_output_in_military_clock() {
        let schedule = Schedule::from_entries(vec![ScheduleEntry::new("F1", "AC1", "fuel", 510, 555)]);
        let text = render_outcome(&Ok(schedule), Clock::Military).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "feasible");
        assert_eq!(value["entries"][0]["start"], 830);
        assert_eq!(value["entries"][0]["end"], 915);

        match serde_json::from_str::<JsonScheduleInput>(&text).unwrap() {
            JsonScheduleInput::Feasible { entries } => assert_eq!(entries[0].truck, "F1"),
            JsonScheduleInput::Infeasible { .. } => panic!("expected feasible"),
        }
    }

    #[test]
    fn test_infeasible_output() {
        let report = Infeasibility::new(
            "AC2",
            "fuel",
            vec![TruckRejection {
                truck_id: "F1".into(),
                reason: RejectionReason::NeverAvailable,
            }],
        );
        let text = render_outcome(&Err(report), Clock::Minutes).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "infeasible");
        assert_eq!(value["report"]["aircraft_id"], "AC2");
        assert_eq!(value["report"]["reason"], "windows_exhausted");
        assert_eq!(value["report"]["rejections"][0]["reason"]["code"], "never_available");
    }
}
