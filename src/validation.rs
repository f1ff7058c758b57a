//! Input validation for turnaround problems.
//!
//! Checks structural integrity of the terminal configuration, aircraft and
//! trucks before scheduling. Detects:
//! - Empty horizons, negative transition times and out-of-range values
//!   (fatal config errors)
//! - Fleet size mismatches against the declared trucks per type
//! - Duplicate aircraft/truck IDs and duplicate operation kinds
//! - Empty ground windows, non-positive durations, operations longer than
//!   their ground window, instants or durations beyond [`MAX_MINUTES`]
//! - Dangling `after`/`exclusive_with` references
//! - Circular precedence dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{ConfigError, InputError, ModelViolation, ModelViolationKind};
use crate::models::{in_range, Aircraft, TerminalConfig, TimeWindow, Truck, MAX_MINUTES};

/// Validation result.
pub type ValidationResult = Result<(), InputError>;

/// Validates the input data for a turnaround problem.
///
/// Configuration errors short-circuit; model violations are collected for
/// every aircraft and truck.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(InputError::Config)` for the first
/// configuration error, otherwise `Err(InputError::Model(all_violations))`.
pub fn validate_input(
    terminal: &TerminalConfig,
    aircraft: &[Aircraft],
    trucks: &[Truck],
) -> ValidationResult {
    validate_terminal(terminal, trucks)?;

    let mut violations = Vec::new();

    let mut aircraft_ids = HashSet::new();
    for ac in aircraft {
        if !aircraft_ids.insert(ac.id.as_str()) {
            violations.push(ModelViolation::aircraft(
                &ac.id,
                ModelViolationKind::DuplicateId,
                "duplicate aircraft ID",
            ));
        }
        validate_aircraft(ac, &mut violations);
    }

    let mut truck_ids = HashSet::new();
    for truck in trucks {
        if !truck_ids.insert(truck.id.as_str()) {
            violations.push(ModelViolation::truck(
                &truck.id,
                ModelViolationKind::DuplicateId,
                "duplicate truck ID",
            ));
        }
        if !truck.availability.in_range() {
            violations.push(ModelViolation::truck(
                &truck.id,
                ModelViolationKind::OutOfRange,
                out_of_range("availability", truck.availability),
            ));
        } else if truck.availability.end < truck.availability.start {
            violations.push(ModelViolation::truck(
                &truck.id,
                ModelViolationKind::InvertedAvailability,
                format!(
                    "availability ends at {} before it starts at {}",
                    truck.availability.end, truck.availability.start
                ),
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(InputError::Model(violations))
    }
}

fn validate_terminal(terminal: &TerminalConfig, trucks: &[Truck]) -> Result<(), ConfigError> {
    let horizon = terminal.horizon;
    for (field, value) in [("horizon start", horizon.start), ("horizon end", horizon.end)] {
        if !in_range(value) {
            return Err(ConfigError::OutOfRange {
                field: field.into(),
                value,
            });
        }
    }
    if horizon.end <= horizon.start {
        return Err(ConfigError::EmptyHorizon {
            start: horizon.start,
            end: horizon.end,
        });
    }

    let transitions = &terminal.transitions;
    if transitions.default < 0 {
        return Err(ConfigError::NegativeTransition {
            from: "*".into(),
            to: "*".into(),
            minutes: transitions.default,
        });
    }
    if transitions.same_location < 0 {
        return Err(ConfigError::NegativeTransition {
            from: "*".into(),
            to: "(same)".into(),
            minutes: transitions.same_location,
        });
    }
    if let Some((from, to, minutes)) = transitions
        .explicit_pairs()
        .into_iter()
        .find(|&(_, _, m)| m < 0)
    {
        return Err(ConfigError::NegativeTransition {
            from: from.to_string(),
            to: to.to_string(),
            minutes,
        });
    }

    if let Some((from, to, minutes)) = [
        ("*", "*", transitions.default),
        ("*", "(same)", transitions.same_location),
    ]
    .into_iter()
    .chain(transitions.explicit_pairs())
    .find(|&(_, _, m)| m > MAX_MINUTES)
    {
        return Err(ConfigError::OutOfRange {
            field: format!("transition time from '{from}' to '{to}'"),
            value: minutes,
        });
    }

    if !terminal.trucks_per_type.is_empty() {
        let mut actual: BTreeMap<&str, u32> = BTreeMap::new();
        for truck in trucks {
            *actual.entry(truck.truck_type.as_str()).or_insert(0) += 1;
        }
        for (truck_type, &declared) in &terminal.trucks_per_type {
            let count = actual.remove(truck_type.as_str()).unwrap_or(0);
            if count != declared {
                return Err(ConfigError::FleetMismatch {
                    truck_type: truck_type.clone(),
                    declared,
                    actual: count,
                });
            }
        }
        if let Some((truck_type, count)) = actual.into_iter().next() {
            return Err(ConfigError::FleetMismatch {
                truck_type: truck_type.to_string(),
                declared: 0,
                actual: count,
            });
        }
    }

    Ok(())
}

fn out_of_range(what: &str, window: TimeWindow) -> String {
    format!(
        "{what} [{}, {}) exceeds the supported range of ±{MAX_MINUTES} min",
        window.start, window.end
    )
}

fn validate_aircraft(ac: &Aircraft, violations: &mut Vec<ModelViolation>) {
    if !ac.ground.in_range() {
        violations.push(ModelViolation::aircraft(
            &ac.id,
            ModelViolationKind::OutOfRange,
            out_of_range("ground window", ac.ground),
        ));
    } else if ac.ground.end <= ac.ground.start {
        violations.push(ModelViolation::aircraft(
            &ac.id,
            ModelViolationKind::EmptyGroundWindow,
            format!(
                "arrival {} is not before departure {}",
                ac.ground.start, ac.ground.end
            ),
        ));
    }

    let mut kinds = HashSet::new();
    for op in &ac.operations {
        if !kinds.insert(op.kind.as_str()) {
            violations.push(ModelViolation::aircraft(
                &ac.id,
                ModelViolationKind::DuplicateOperation,
                format!("operation '{}' is required more than once", op.kind),
            ));
        }
        if op.duration > MAX_MINUTES {
            violations.push(ModelViolation::aircraft(
                &ac.id,
                ModelViolationKind::OutOfRange,
                format!("operation '{}' has duration {}", op.kind, op.duration),
            ));
        } else if op.duration <= 0 {
            violations.push(ModelViolation::aircraft(
                &ac.id,
                ModelViolationKind::NonPositiveDuration,
                format!("operation '{}' has duration {}", op.kind, op.duration),
            ));
        } else if op.duration > ac.ground.duration() {
            violations.push(ModelViolation::aircraft(
                &ac.id,
                ModelViolationKind::OperationExceedsWindow,
                format!(
                    "operation '{}' takes {} min but the ground window is {} min",
                    op.kind,
                    op.duration,
                    ac.ground.duration()
                ),
            ));
        }
    }

    for op in &ac.operations {
        for reference in op.after.iter().chain(&op.exclusive_with) {
            if !kinds.contains(reference.as_str()) {
                violations.push(ModelViolation::aircraft(
                    &ac.id,
                    ModelViolationKind::UnknownOperationReference,
                    format!(
                        "operation '{}' references unknown operation '{}'",
                        op.kind, reference
                    ),
                ));
            }
        }
    }

    if let Some(kind) = detect_cycles(ac) {
        violations.push(ModelViolation::aircraft(
            &ac.id,
            ModelViolationKind::CyclicPrecedence,
            format!("circular precedence involving operation '{kind}'"),
        ));
    }
}

/// Detects cycles in one aircraft's precedence graph using DFS.
///
/// Returns the kind at which a back-edge was found. Nodes are visited in
/// declaration order so the reported kind is deterministic.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(ac: &Aircraft) -> Option<&str> {
    // predecessor kind → successor kinds
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for op in &ac.operations {
        for pred in &op.after {
            adj.entry(pred.as_str()).or_default().push(op.kind.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for op in &ac.operations {
        let node = op.kind.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(node);
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
