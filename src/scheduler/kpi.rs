//! Schedule quality metrics (KPIs).
//!
//! Computes ground-handling performance indicators from a completed
//! schedule and its problem.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest entry end |
//! | Busy time | Sum of entry durations per truck |
//! | Utilization | Busy time / availability duration, per truck |
//! | Avg Utilization | Mean utilization over trucks with at least one entry |
//! | Transition time | Repositioning minutes: home → first gate, then gate → gate |
//! | Slack | Departure − end of the aircraft's last operation |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Problem, Schedule};

/// Schedule performance indicators. All times are in minutes.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleKpi {
    /// Latest entry end (0 for an empty schedule).
    pub makespan: i64,
    /// Busy minutes per truck ID (every truck in the manifest).
    pub busy_by_truck: BTreeMap<String, i64>,
    /// Busy / available fraction per truck ID (0.0 for never-available trucks).
    pub utilization_by_truck: BTreeMap<String, f64>,
    /// Mean utilization over trucks that were used.
    pub avg_utilization: f64,
    /// Total repositioning minutes across the fleet.
    pub total_transition: i64,
    /// Smallest departure slack over aircraft with operations.
    pub min_slack: Option<i64>,
    /// Mean departure slack over aircraft with operations.
    pub avg_slack: f64,
    /// Number of trucks with at least one entry.
    pub trucks_used: usize,
}

impl ScheduleKpi {
    /// Computes KPIs for a schedule of the given problem.
    ///
    /// Entries referring to unknown trucks or aircraft are ignored.
    pub fn calculate(problem: &Problem, schedule: &Schedule) -> Self {
        let terminal = problem.terminal();
        let mut busy_by_truck = BTreeMap::new();
        let mut utilization_by_truck = BTreeMap::new();
        let mut total_transition = 0;
        let mut trucks_used = 0;
        let mut used_utilization = 0.0;

        for truck in problem.trucks() {
            let mut entries = schedule.entries_for_truck(&truck.id);
            entries.sort_by_key(|e| e.start);

            let busy: i64 = entries.iter().map(|e| e.duration()).sum();
            let available = truck.availability.duration();
            let utilization = if available > 0 {
                busy as f64 / available as f64
            } else {
                0.0
            };

            let mut location = truck.home.as_str();
            for entry in &entries {
                if let Some(aircraft) = problem.aircraft_by_id(&entry.aircraft_id) {
                    total_transition += terminal.transition(location, &aircraft.gate);
                    location = aircraft.gate.as_str();
                }
            }

            if !entries.is_empty() {
                trucks_used += 1;
                used_utilization += utilization;
            }
            busy_by_truck.insert(truck.id.clone(), busy);
            utilization_by_truck.insert(truck.id.clone(), utilization);
        }

        let slacks: Vec<i64> = problem
            .aircraft()
            .iter()
            .filter_map(|ac| {
                schedule
                    .entries_for_aircraft(&ac.id)
                    .iter()
                    .map(|e| e.end)
                    .max()
                    .map(|last| ac.departure().saturating_sub(last))
            })
            .collect();

        let avg_utilization = if trucks_used == 0 {
            0.0
        } else {
            used_utilization / trucks_used as f64
        };
        let avg_slack = if slacks.is_empty() {
            0.0
        } else {
            slacks.iter().sum::<i64>() as f64 / slacks.len() as f64
        };

        Self {
            makespan: schedule.makespan(),
            busy_by_truck,
            utilization_by_truck,
            avg_utilization,
            total_transition,
            min_slack: slacks.iter().copied().min(),
            avg_slack,
            trucks_used,
        }
    }
}
