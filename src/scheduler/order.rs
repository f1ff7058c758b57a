//! Job priority order.
//!
//! Jobs are required (aircraft, operation) pairs. They are processed by
//! earliest ground-window start, then earliest departure, then aircraft ID.
//! Within one aircraft, operations follow a topological order of their
//! precedence declarations, ties broken by declaration order, so a job's
//! predecessors are always committed before the job itself.

use std::cmp::Ordering;

use crate::models::{Aircraft, Problem};

/// A required (aircraft, operation) pair, by manifest position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Job {
    /// Position of the aircraft in the manifest.
    pub aircraft: usize,
    /// Position of the operation within the aircraft.
    pub operation: usize,
}

/// Returns every job of the problem in processing order.
pub fn job_order(problem: &Problem) -> Vec<Job> {
    let aircraft = problem.aircraft();

    let mut aircraft_order: Vec<usize> = (0..aircraft.len()).collect();
    aircraft_order.sort_by(|&a, &b| compare_aircraft(&aircraft[a], &aircraft[b]));

    aircraft_order
        .into_iter()
        .flat_map(|ac| {
            precedence_order(&aircraft[ac])
                .into_iter()
                .map(move |op| Job {
                    aircraft: ac,
                    operation: op,
                })
        })
        .collect()
}

fn compare_aircraft(a: &Aircraft, b: &Aircraft) -> Ordering {
    a.arrival()
        .cmp(&b.arrival())
        .then_with(|| a.departure().cmp(&b.departure()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Topological order of one aircraft's operations (Kahn's algorithm).
///
/// Always picks the lowest declaration index among ready operations.
/// Operations caught in a cycle (rejected by input validation) are appended
/// in declaration order so the result is still a permutation.
pub fn precedence_order(aircraft: &Aircraft) -> Vec<usize> {
    let ops = &aircraft.operations;
    let mut placed = vec![false; ops.len()];
    let mut order = Vec::with_capacity(ops.len());

    while order.len() < ops.len() {
        let ready = (0..ops.len()).find(|&i| {
            !placed[i]
                && ops[i].after.iter().all(|pred| {
                    ops.iter()
                        .enumerate()
                        .all(|(j, other)| other.kind != *pred || placed[j])
                })
        });
        match ready {
            Some(i) => {
                placed[i] = true;
                order.push(i);
            }
            None => break,
        }
    }

    order.extend((0..ops.len()).filter(|&i| !placed[i]));
    order
}
