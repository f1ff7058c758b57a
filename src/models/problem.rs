//! Validated problem instance.
//!
//! Bundles the terminal configuration, aircraft manifest and truck manifest
//! after input validation, with ID lookups used by the checker, the engine
//! and the validator. A `Problem` can only be built from input that passed
//! [`validate_input`](crate::validation::validate_input).

use std::collections::HashMap;

use super::{Aircraft, Operation, TerminalConfig, Truck};
use crate::error::InputError;
use crate::validation::validate_input;

/// An immutable, validated turnaround scheduling problem.
#[derive(Debug, Clone)]
pub struct Problem {
    terminal: TerminalConfig,
    aircraft: Vec<Aircraft>,
    trucks: Vec<Truck>,
    aircraft_index: HashMap<String, usize>,
    truck_index: HashMap<String, usize>,
}

impl Problem {
    /// Validates the input and builds the problem.
    pub fn new(
        terminal: TerminalConfig,
        aircraft: Vec<Aircraft>,
        trucks: Vec<Truck>,
    ) -> Result<Self, InputError> {
        validate_input(&terminal, &aircraft, &trucks)?;

        let aircraft_index = aircraft
            .iter()
            .enumerate()
            .map(|(i, ac)| (ac.id.clone(), i))
            .collect();
        let truck_index = trucks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();

        Ok(Self {
            terminal,
            aircraft,
            trucks,
            aircraft_index,
            truck_index,
        })
    }

    /// Terminal configuration.
    pub fn terminal(&self) -> &TerminalConfig {
        &self.terminal
    }

    /// Aircraft in manifest order.
    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    /// Trucks in manifest order.
    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    /// Finds an aircraft by ID.
    pub fn aircraft_by_id(&self, id: &str) -> Option<&Aircraft> {
        self.aircraft_index.get(id).map(|&i| &self.aircraft[i])
    }

    /// Finds a truck by ID.
    pub fn truck_by_id(&self, id: &str) -> Option<&Truck> {
        self.truck_index.get(id).map(|&i| &self.trucks[i])
    }

    /// Manifest position of an aircraft.
    pub fn aircraft_position(&self, id: &str) -> Option<usize> {
        self.aircraft_index.get(id).copied()
    }

    /// Manifest position of a truck.
    pub fn truck_position(&self, id: &str) -> Option<usize> {
        self.truck_index.get(id).copied()
    }

    /// Resolves the (aircraft, operation) pair an entry refers to.
    pub fn operation(&self, aircraft_id: &str, kind: &str) -> Option<(&Aircraft, &Operation)> {
        let ac = self.aircraft_by_id(aircraft_id)?;
        ac.operation(kind).map(|op| (ac, op))
    }

    /// Every required (aircraft, operation) pair in manifest order.
    pub fn required_pairs(&self) -> impl Iterator<Item = (&Aircraft, &Operation)> {
        self.aircraft
            .iter()
            .flat_map(|ac| ac.operations.iter().map(move |op| (ac, op)))
    }

    /// Number of required (aircraft, operation) pairs.
    pub fn job_count(&self) -> usize {
        self.aircraft.iter().map(|ac| ac.operations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    #[test]
    fn test_problem_lookups() {
        let problem = Problem::new(
            TerminalConfig::new(TimeWindow::new(0, 1000)),
            vec![
                Aircraft::new("AC1", "G1", 100, 300)
                    .with_operation(Operation::new("fuel", 50, "fuel"))
                    .with_operation(Operation::new("bags", 20, "baggage")),
                Aircraft::new("AC2", "G2", 100, 300),
            ],
            vec![Truck::new("F1", "fuel", "G1", TimeWindow::new(0, 1000))],
        )
        .unwrap();

        assert_eq!(problem.job_count(), 2);
        assert_eq!(problem.aircraft_position("AC2"), Some(1));
        assert_eq!(problem.truck_by_id("F1").unwrap().truck_type, "fuel");
        assert!(problem.truck_by_id("F9").is_none());

        let (ac, op) = problem.operation("AC1", "bags").unwrap();
        assert_eq!(ac.gate, "G1");
        assert_eq!(op.duration, 20);
        assert!(problem.operation("AC2", "fuel").is_none());

        let pairs: Vec<_> = problem
            .required_pairs()
            .map(|(ac, op)| (ac.id.as_str(), op.kind.as_str()))
            .collect();
        assert_eq!(pairs, vec![("AC1", "fuel"), ("AC1", "bags")]);
    }

    #[test]
    fn test_problem_rejects_invalid_input() {
        let err = Problem::new(
            TerminalConfig::new(TimeWindow::new(0, 1000)),
            vec![Aircraft::new("AC1", "G1", 300, 100)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.violations().len(), 1);
    }
}
