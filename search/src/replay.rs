//! Replay verification: re-derive every step of a trace from the world.
//!
//! A trace is accepted only if it could have been produced by the search
//! rules. Verification stops at the first divergence.

use std::collections::BTreeSet;

use starpath_kernel::grid::Cell;
use starpath_kernel::world::{WormholeId, WorldV1};

use crate::trace::{ArrivalV1, CellEffectV1, PathTraceV1, StepRecordV1};

/// First divergence found while replaying a trace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("trace has no steps")]
    EmptyTrace,
    #[error("step {step}: expected origin {expected}, found {actual}")]
    WrongOrigin {
        step: usize,
        expected: Cell,
        actual: Cell,
    },
    #[error("step {step}: illegal transition: {detail}")]
    IllegalTransition { step: usize, detail: String },
    #[error("step {step}: {field} is {actual}, replay gives {expected}")]
    EnergyMismatch {
        step: usize,
        field: &'static str,
        expected: i64,
        actual: i64,
    },
    #[error("step {step}: recorded effect {actual:?}, replay gives {expected:?}")]
    EffectMismatch {
        step: usize,
        expected: CellEffectV1,
        actual: CellEffectV1,
    },
    #[error("step {step}: gate at {cell} needs {threshold}, arrived with {energy}")]
    GateViolated {
        step: usize,
        cell: Cell,
        threshold: i64,
        energy: i64,
    },
    #[error("step {step}: entered active black hole {cell}")]
    BlackHole { step: usize, cell: Cell },
    #[error("step {step}: {cell} was already visited")]
    Revisit { step: usize, cell: Cell },
    #[error("step {step}: energy went negative ({energy})")]
    NegativeEnergy { step: usize, energy: i64 },
    #[error("step {step}: {which} snapshot does not match replay")]
    SnapshotMismatch { step: usize, which: &'static str },
    #[error("trace ends at {actual}, destination is {expected}")]
    WrongDestination { expected: Cell, actual: Cell },
}

/// Replay `trace` against `world`.
///
/// # Errors
///
/// Returns the first [`ReplayError`] found.
pub fn replay_verify(world: &WorldV1, trace: &PathTraceV1) -> Result<(), ReplayError> {
    let steps = trace.steps();
    let first = steps.first().ok_or(ReplayError::EmptyTrace)?;
    verify_origin(world, first)?;

    let mut visited = BTreeSet::from([first.cell]);
    let mut neutralized: BTreeSet<Cell> = BTreeSet::new();
    let mut consumed: BTreeSet<WormholeId> = BTreeSet::new();
    let mut previous = first;

    for (step, record) in steps.iter().enumerate().skip(1) {
        let expected_before =
            replay_transition(world, step, previous, record, &mut neutralized, &mut consumed)?;
        if record.energy_before != expected_before {
            return Err(ReplayError::EnergyMismatch {
                step,
                field: "energy_before",
                expected: expected_before,
                actual: record.energy_before,
            });
        }

        let cell = record.cell;
        if let Some(threshold) = world.gate_threshold(cell) {
            if record.energy_before < threshold {
                return Err(ReplayError::GateViolated {
                    step,
                    cell,
                    threshold,
                    energy: record.energy_before,
                });
            }
        }
        if !visited.insert(cell) {
            return Err(ReplayError::Revisit { step, cell });
        }
        let live_wormhole = world
            .wormhole_at(cell)
            .is_some_and(|w| !consumed.contains(&w.id));
        if world.is_black_hole(cell) && !neutralized.contains(&cell) && !live_wormhole {
            return Err(ReplayError::BlackHole { step, cell });
        }

        let effect = CellEffectV1::for_cell(world, cell);
        if record.effect != effect {
            return Err(ReplayError::EffectMismatch {
                step,
                expected: effect,
                actual: record.effect,
            });
        }
        let expected_after = effect.apply(record.energy_before);
        if expected_after < 0 {
            return Err(ReplayError::NegativeEnergy {
                step,
                energy: expected_after,
            });
        }
        if record.energy_after != expected_after {
            return Err(ReplayError::EnergyMismatch {
                step,
                field: "energy_after",
                expected: expected_after,
                actual: record.energy_after,
            });
        }

        if *record.neutralized != neutralized {
            return Err(ReplayError::SnapshotMismatch {
                step,
                which: "neutralized_black_holes",
            });
        }
        if *record.consumed != consumed {
            return Err(ReplayError::SnapshotMismatch {
                step,
                which: "consumed_wormholes",
            });
        }
        previous = record;
    }

    if previous.cell != world.destination() {
        return Err(ReplayError::WrongDestination {
            expected: world.destination(),
            actual: previous.cell,
        });
    }
    Ok(())
}

fn verify_origin(world: &WorldV1, first: &StepRecordV1) -> Result<(), ReplayError> {
    if first.cell != world.origin() {
        return Err(ReplayError::WrongOrigin {
            step: 0,
            expected: world.origin(),
            actual: first.cell,
        });
    }
    if first.arrival != ArrivalV1::Origin {
        return Err(ReplayError::IllegalTransition {
            step: 0,
            detail: "first step must be the origin".into(),
        });
    }
    if first.effect != CellEffectV1::Start {
        return Err(ReplayError::EffectMismatch {
            step: 0,
            expected: CellEffectV1::Start,
            actual: first.effect,
        });
    }
    for (field, actual) in [
        ("energy_before", first.energy_before),
        ("energy_after", first.energy_after),
    ] {
        if actual != world.initial_energy() {
            return Err(ReplayError::EnergyMismatch {
                step: 0,
                field,
                expected: world.initial_energy(),
                actual,
            });
        }
    }
    if !first.neutralized.is_empty() {
        return Err(ReplayError::SnapshotMismatch {
            step: 0,
            which: "neutralized_black_holes",
        });
    }
    if !first.consumed.is_empty() {
        return Err(ReplayError::SnapshotMismatch {
            step: 0,
            which: "consumed_wormholes",
        });
    }
    Ok(())
}

/// Check how `record` was reached from `previous`, update the branch sets,
/// and return the energy the ship should arrive with.
fn replay_transition(
    world: &WorldV1,
    step: usize,
    previous: &StepRecordV1,
    record: &StepRecordV1,
    neutralized: &mut BTreeSet<Cell>,
    consumed: &mut BTreeSet<WormholeId>,
) -> Result<i64, ReplayError> {
    let illegal = |detail: String| ReplayError::IllegalTransition { step, detail };
    let pending = world
        .wormhole_at(previous.cell)
        .filter(|w| !consumed.contains(&w.id));

    match (&record.arrival, pending) {
        (ArrivalV1::Origin, _) => Err(illegal("origin arrival after the first step".into())),
        (ArrivalV1::Move { .. }, Some(wormhole)) => Err(illegal(format!(
            "left {} by moving while wormhole {} was unconsumed",
            previous.cell, wormhole.id
        ))),
        (ArrivalV1::Teleport { .. }, None) => Err(illegal(format!(
            "teleport from {} without an unconsumed wormhole",
            previous.cell
        ))),
        (
            ArrivalV1::Teleport {
                wormhole: id,
                from,
                cost,
            },
            Some(wormhole),
        ) => {
            if *id != wormhole.id || *from != previous.cell || *cost != wormhole.cost {
                return Err(illegal(format!(
                    "teleport record does not match wormhole {} at {}",
                    wormhole.id, previous.cell
                )));
            }
            if record.cell != wormhole.exit {
                return Err(illegal(format!(
                    "wormhole {} exits at {}, trace lands at {}",
                    wormhole.id, wormhole.exit, record.cell
                )));
            }
            let remaining = previous.energy_after.saturating_sub(wormhole.cost);
            if remaining < 0 {
                return Err(ReplayError::NegativeEnergy {
                    step,
                    energy: remaining,
                });
            }
            consumed.insert(wormhole.id.clone());
            Ok(remaining)
        }
        (ArrivalV1::Move { direction, cleared }, None) => {
            if direction.step(previous.cell) != Some(record.cell) {
                return Err(illegal(format!(
                    "moving {direction} from {} does not reach {}",
                    previous.cell, record.cell
                )));
            }
            if let Some(hole) = cleared {
                let valid = world.is_giant_star(previous.cell)
                    && hole.is_adjacent(previous.cell)
                    && world.is_black_hole(*hole)
                    && !neutralized.contains(hole);
                if !valid {
                    return Err(illegal(format!(
                        "{hole} cannot be neutralized when leaving {}",
                        previous.cell
                    )));
                }
                neutralized.insert(*hole);
            }
            Ok(previous.energy_after)
        }
    }
}
