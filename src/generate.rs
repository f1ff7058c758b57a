//! Seeded random instance generator.
//!
//! Produces loader-compatible meta, aircraft and truck records for fixtures
//! and property tests. The same configuration always yields the same
//! instance.
//!
//! Instances are generated in the minutes clock over a one-day horizon.
//! Every aircraft requires fueling; baggage and catering are drawn at
//! random. Deplaning bags precede boarding bags, and catering is declared
//! mutually exclusive with fueling. Ground windows are long enough for every
//! operation, but feasibility of the whole instance is not guaranteed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::io::{
    Clock, JsonAircraft, JsonMeta, JsonOperation, JsonTransitionPair, JsonTransitions, JsonTruck,
    JsonWindow, ProblemRecords,
};
use crate::models::CheckerPolicy;

const HORIZON: JsonWindow = JsonWindow { start: 0, end: 1440 };
const DEPOT: &str = "DEPOT";
const TRUCK_TYPES: [&str; 3] = ["fuel", "baggage", "catering"];

/// Generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of aircraft.
    pub aircraft: usize,
    /// Number of trucks (at least one per truck type).
    pub trucks: usize,
    /// Number of gates.
    pub gates: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            aircraft: 10,
            trucks: 6,
            gates: 4,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration with default sizes and the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Sets the number of aircraft.
    pub fn with_aircraft(mut self, count: usize) -> Self {
        self.aircraft = count;
        self
    }

    /// Sets the number of trucks.
    pub fn with_trucks(mut self, count: usize) -> Self {
        self.trucks = count;
        self
    }

    /// Sets the number of gates.
    pub fn with_gates(mut self, count: usize) -> Self {
        self.gates = count.max(1);
        self
    }
}

/// Generates one instance.
pub fn generate(config: &GeneratorConfig) -> ProblemRecords {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let gates: Vec<String> = (1..=config.gates.max(1)).map(|g| format!("G{g}")).collect();

    let trucks = generate_trucks(config.trucks, &mut rng);
    let aircraft = (1..=config.aircraft)
        .map(|i| generate_aircraft(i, &gates, &mut rng))
        .collect();

    let mut trucks_per_type = BTreeMap::new();
    for truck in &trucks {
        *trucks_per_type.entry(truck.truck_type.clone()).or_insert(0) += 1;
    }

    let meta = JsonMeta {
        clock: Clock::Minutes,
        horizon: HORIZON,
        trucks_per_type,
        transition: JsonTransitions {
            default: rng.random_range(4..=10),
            same_location: 0,
            pairs: gates
                .iter()
                .map(|gate| JsonTransitionPair {
                    from: DEPOT.to_string(),
                    to: gate.clone(),
                    minutes: rng.random_range(5..=15),
                })
                .collect(),
        },
        policy: CheckerPolicy::default(),
    };

    ProblemRecords {
        meta,
        aircraft,
        trucks,
    }
}

fn generate_trucks(count: usize, rng: &mut StdRng) -> Vec<JsonTruck> {
    let mut counters: BTreeMap<&str, usize> = BTreeMap::new();
    (0..count.max(TRUCK_TYPES.len()))
        .map(|i| {
            let truck_type = match TRUCK_TYPES.get(i) {
                Some(&t) => t,
                None => TRUCK_TYPES.choose(rng).copied().unwrap_or(TRUCK_TYPES[0]),
            };
            let n = counters.entry(truck_type).or_insert(0);
            *n += 1;

            let start = rng.random_range(0..=6) * 60;
            let end = rng.random_range(18..=24) * 60;
            JsonTruck {
                id: format!("{}{}", truck_type[..1].to_uppercase(), n),
                truck_type: truck_type.to_string(),
                home: DEPOT.to_string(),
                available: JsonWindow { start, end },
            }
        })
        .collect()
}

fn generate_aircraft(index: usize, gates: &[String], rng: &mut StdRng) -> JsonAircraft {
    let arrival = rng.random_range(72..=240) * 5;
    let ground = rng.random_range(12..=30) * 5;

    let mut operations = vec![operation("fuel", rng.random_range(20..=40), "fuel")];
    if rng.random_bool(0.7) {
        operations.push(operation("deplane_bags", rng.random_range(15..=25), "baggage"));
        let mut boarding = operation("board_bags", rng.random_range(15..=25), "baggage");
        boarding.after.push("deplane_bags".to_string());
        operations.push(boarding);
    }
    if rng.random_bool(0.5) {
        let mut catering = operation("catering", rng.random_range(15..=30), "catering");
        catering.exclusive_with.push("fuel".to_string());
        operations.push(catering);
    }

    JsonAircraft {
        id: format!("AC{index:03}"),
        gate: gates.choose(rng).cloned().unwrap_or_else(|| "G1".to_string()),
        arrival,
        departure: arrival + ground,
        operations,
    }
}

fn operation(kind: &str, duration: i64, truck_type: &str) -> JsonOperation {
    JsonOperation {
        kind: kind.to_string(),
        duration,
        truck_type: truck_type.to_string(),
        after: Vec::new(),
        exclusive_with: Vec::new(),
    }
}

impl ProblemRecords {
    /// Writes `meta.json`, `aircraft.json` and `trucks.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(dir)?;
        write_pretty(&dir.join("meta.json"), &self.meta)?;
        write_pretty(&dir.join("aircraft.json"), &self.aircraft)?;
        write_pretty(&dir.join("trucks.json"), &self.trucks)?;
        info!(
            dir = %dir.display(),
            aircraft = self.aircraft.len(),
            trucks = self.trucks.len(),
            "instance written"
        );
        Ok(())
    }
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text + "\n")
}
