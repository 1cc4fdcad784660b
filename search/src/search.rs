//! Search entry point and expansion loop.
//!
//! Depth-first over an explicit work stack of [`BranchStateV1`]. Each popped
//! state is checked on arrival (bounds, gate, revisit, black hole, energy),
//! admitted through the dominance cache, linked onto its branch's trace, and
//! then expanded by the wormhole, giant-star and movement rules. The
//! destination is never cached, since arriving there ends the branch.
//!
//! Move order within a successor group is right, left, down, up, except that
//! a move landing on the destination is tried first. Successors are pushed in
//! reverse so they pop in that order; giant-star groups pop in candidate
//! order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use starpath_kernel::grid::{Cell, Direction};
use starpath_kernel::world::{WormholeV1, WorldV1};

use crate::branch::{with_inserted, with_visited, BranchStateV1};
use crate::dominance::DominanceCacheV1;
use crate::error::SearchError;
use crate::policy::SearchPolicyV1;
use crate::tiebreak::GiantStarChooserV1;
use crate::trace::{ArrivalV1, CellEffectV1, PathTraceV1, StepRecordV1, TraceNodeV1};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReasonV1 {
    /// `max_solutions` traces were collected.
    SolutionTargetReached,
    /// Every branch was explored or pruned.
    StackExhausted,
    /// `max_expansions` states were expanded.
    ExpansionBudgetExceeded,
    /// The cancel flag was raised.
    Cancelled,
}

impl TerminationReasonV1 {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TerminationReasonV1::SolutionTargetReached => "solution_target_reached",
            TerminationReasonV1::StackExhausted => "stack_exhausted",
            TerminationReasonV1::ExpansionBudgetExceeded => "expansion_budget_exceeded",
            TerminationReasonV1::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TerminationReasonV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a branch was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReasonV1 {
    OutOfBounds,
    GateBelowThreshold,
    Revisit,
    BlackHole,
    EnergyExhausted,
    WormholeUnaffordable,
    Dominated,
}

impl PruneReasonV1 {
    pub const ALL: [PruneReasonV1; 7] = [
        PruneReasonV1::OutOfBounds,
        PruneReasonV1::GateBelowThreshold,
        PruneReasonV1::Revisit,
        PruneReasonV1::BlackHole,
        PruneReasonV1::EnergyExhausted,
        PruneReasonV1::WormholeUnaffordable,
        PruneReasonV1::Dominated,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PruneReasonV1::OutOfBounds => "out_of_bounds",
            PruneReasonV1::GateBelowThreshold => "gate_below_threshold",
            PruneReasonV1::Revisit => "revisit",
            PruneReasonV1::BlackHole => "black_hole",
            PruneReasonV1::EnergyExhausted => "energy_exhausted",
            PruneReasonV1::WormholeUnaffordable => "wormhole_unaffordable",
            PruneReasonV1::Dominated => "dominated",
        }
    }

    const fn slot(self) -> usize {
        match self {
            PruneReasonV1::OutOfBounds => 0,
            PruneReasonV1::GateBelowThreshold => 1,
            PruneReasonV1::Revisit => 2,
            PruneReasonV1::BlackHole => 3,
            PruneReasonV1::EnergyExhausted => 4,
            PruneReasonV1::WormholeUnaffordable => 5,
            PruneReasonV1::Dominated => 6,
        }
    }
}

/// Counters collected during one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatsV1 {
    pub states_popped: u64,
    /// States that passed every arrival check and were recorded.
    pub states_expanded: u64,
    pub successors_pushed: u64,
    pub stack_high_water: u64,
    pub solutions_found: u64,
    pub cache_entries: u64,
    prunes: [u64; 7],
}

impl SearchStatsV1 {
    #[must_use]
    pub fn prunes(&self, reason: PruneReasonV1) -> u64 {
        self.prunes[reason.slot()]
    }

    #[must_use]
    pub fn total_prunes(&self) -> u64 {
        self.prunes.iter().sum()
    }

    fn record_prune(&mut self, reason: PruneReasonV1) {
        self.prunes[reason.slot()] += 1;
    }

    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let prunes: serde_json::Map<String, Value> = PruneReasonV1::ALL
            .iter()
            .map(|reason| (reason.as_str().to_string(), json!(self.prunes(*reason))))
            .collect();
        json!({
            "states_popped": self.states_popped,
            "states_expanded": self.states_expanded,
            "successors_pushed": self.successors_pushed,
            "stack_high_water": self.stack_high_water,
            "solutions_found": self.solutions_found,
            "cache_entries": self.cache_entries,
            "prunes": prunes,
        })
    }
}

/// Result of a solve.
///
/// An empty `traces` list is the normal "no path exists" answer.
#[derive(Debug, Clone)]
pub struct SolveOutcomeV1 {
    pub traces: Vec<PathTraceV1>,
    pub termination: TerminationReasonV1,
    pub stats: SearchStatsV1,
}

impl SolveOutcomeV1 {
    /// Returns `true` if at least one path was found.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.traces.is_empty()
    }

    /// The first path found, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PathTraceV1> {
        self.traces.first()
    }
}

/// Run the search to completion.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] only for pre-flight policy
/// validation failures.
pub fn solve(world: &WorldV1, policy: &SearchPolicyV1) -> Result<SolveOutcomeV1, SearchError> {
    solve_cancellable(world, policy, &AtomicBool::new(false))
}

/// Run the search, stopping with [`TerminationReasonV1::Cancelled`] once
/// `cancel` is observed set. The flag is checked before every pop.
///
/// Traces found before cancellation are kept in the outcome.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] only for pre-flight policy
/// validation failures.
pub fn solve_cancellable(
    world: &WorldV1,
    policy: &SearchPolicyV1,
    cancel: &AtomicBool,
) -> Result<SolveOutcomeV1, SearchError> {
    policy.validate()?;

    let span = tracing::info_span!(
        "solve",
        rows = world.rows(),
        cols = world.cols(),
        max_solutions = policy.max_solutions,
        dominance = %policy.dominance,
    );
    let _enter = span.enter();

    let mut engine = Engine::new(world, policy);
    let termination = engine.run(cancel);
    engine.stats.cache_entries = engine.cache.len() as u64;

    tracing::info!(
        termination = %termination,
        solutions = engine.solutions.len(),
        popped = engine.stats.states_popped,
        expanded = engine.stats.states_expanded,
        pruned = engine.stats.total_prunes(),
        stack_high_water = engine.stats.stack_high_water,
        "search finished"
    );

    Ok(SolveOutcomeV1 {
        traces: engine.solutions,
        termination,
        stats: engine.stats,
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

struct Engine<'w> {
    world: &'w WorldV1,
    policy: &'w SearchPolicyV1,
    stack: Vec<BranchStateV1>,
    cache: DominanceCacheV1,
    chooser: GiantStarChooserV1,
    stats: SearchStatsV1,
    solutions: Vec<PathTraceV1>,
}

/// A state that survived every arrival check.
struct Arrived {
    energy_after: i64,
    node: Arc<TraceNodeV1>,
}

impl<'w> Engine<'w> {
    fn new(world: &'w WorldV1, policy: &'w SearchPolicyV1) -> Self {
        Self {
            world,
            policy,
            stack: Vec::new(),
            cache: DominanceCacheV1::new(policy.dominance),
            chooser: GiantStarChooserV1::new(policy.giant_star),
            stats: SearchStatsV1::default(),
            solutions: Vec::new(),
        }
    }

    fn run(&mut self, cancel: &AtomicBool) -> TerminationReasonV1 {
        self.push(BranchStateV1::root(self.world));
        self.drain(cancel)
    }

    /// Pop and process states until a termination condition holds.
    fn drain(&mut self, cancel: &AtomicBool) -> TerminationReasonV1 {
        loop {
            if cancel.load(Ordering::Relaxed) {
                return TerminationReasonV1::Cancelled;
            }
            let Some(state) = self.stack.pop() else {
                return TerminationReasonV1::StackExhausted;
            };
            self.stats.states_popped += 1;

            if self
                .policy
                .max_expansions
                .is_some_and(|budget| self.stats.states_expanded >= budget)
            {
                return TerminationReasonV1::ExpansionBudgetExceeded;
            }

            let Some(arrived) = self.arrive(&state) else {
                continue;
            };

            if state.position == self.world.destination() {
                let trace = arrived.node.to_trace();
                tracing::debug!(
                    moves = trace.moves(),
                    final_energy = arrived.energy_after,
                    "solution found"
                );
                self.solutions.push(trace);
                self.stats.solutions_found += 1;
                if self.solutions.len() >= self.policy.max_solutions as usize {
                    return TerminationReasonV1::SolutionTargetReached;
                }
                continue;
            }

            self.expand(&state, &arrived);
        }
    }

    /// Apply the arrival checks and the cell's energy effect. Records the
    /// step and returns `None` if the branch dies here.
    fn arrive(&mut self, state: &BranchStateV1) -> Option<Arrived> {
        let world = self.world;
        let cell = state.position;

        let Some(index) = world.index(cell) else {
            self.prune(PruneReasonV1::OutOfBounds, cell);
            return None;
        };
        let at_origin = state.is_root();

        if !at_origin {
            if let Some(threshold) = world.gate_threshold(cell) {
                if state.energy < threshold {
                    self.prune(PruneReasonV1::GateBelowThreshold, cell);
                    return None;
                }
            }
        }

        if state.visited.contains(index) {
            self.prune(PruneReasonV1::Revisit, cell);
            return None;
        }

        if !at_origin
            && world.is_black_hole(cell)
            && !state.neutralized.contains(&cell)
            && self.live_wormhole(state).is_none()
        {
            self.prune(PruneReasonV1::BlackHole, cell);
            return None;
        }

        let effect = if at_origin {
            CellEffectV1::Start
        } else {
            CellEffectV1::for_cell(world, cell)
        };
        let energy_after = effect.apply(state.energy);
        if energy_after < 0 {
            self.prune(PruneReasonV1::EnergyExhausted, cell);
            return None;
        }

        if cell != world.destination() {
            if let Some(signature) =
                self.cache
                    .signature(cell, energy_after, &state.neutralized, &state.consumed)
            {
                if !self.cache.admit(signature, energy_after) {
                    self.prune(PruneReasonV1::Dominated, cell);
                    return None;
                }
            }
        }

        let node = TraceNodeV1::new(
            state.parent.clone(),
            StepRecordV1 {
                cell,
                energy_before: state.energy,
                energy_after,
                arrival: state.arrival.clone(),
                effect,
                neutralized: state.neutralized.clone(),
                consumed: state.consumed.clone(),
            },
        );
        self.stats.states_expanded += 1;
        Some(Arrived { energy_after, node })
    }

    /// Push the successors of an arrived, non-destination state.
    fn expand(&mut self, state: &BranchStateV1, arrived: &Arrived) {
        let world = self.world;
        let destination = world.destination();
        let cell = state.position;
        let Some(index) = world.index(cell) else {
            return;
        };
        let visited = with_visited(&state.visited, index);

        if let Some(wormhole) = self.live_wormhole(state) {
            let remaining = arrived.energy_after.saturating_sub(wormhole.cost);
            if remaining < 0 {
                self.prune(PruneReasonV1::WormholeUnaffordable, cell);
                return;
            }
            let successor = BranchStateV1 {
                position: wormhole.exit,
                energy: remaining,
                visited,
                consumed: with_inserted(&state.consumed, wormhole.id.clone()),
                neutralized: state.neutralized.clone(),
                arrival: ArrivalV1::Teleport {
                    wormhole: wormhole.id.clone(),
                    from: cell,
                    cost: wormhole.cost,
                },
                parent: Some(Arc::clone(&arrived.node)),
            };
            self.push(successor);
            return;
        }

        let groups = if world.is_giant_star(cell) {
            let candidates: Vec<Cell> = world
                .neighbors(cell)
                .map(|(_, neighbor)| neighbor)
                .filter(|n| world.is_black_hole(*n) && !state.neutralized.contains(n))
                .collect();
            self.chooser.groups(&candidates)
        } else {
            vec![None]
        };

        let mut successors = Vec::with_capacity(groups.len() * Direction::ALL.len());
        for cleared in groups {
            let neutralized = match cleared {
                Some(hole) => with_inserted(&state.neutralized, hole),
                None => state.neutralized.clone(),
            };
            let group_start = successors.len();
            for direction in Direction::ALL {
                let Some(next) = direction.step(cell).filter(|n| world.in_bounds(*n)) else {
                    self.stats.record_prune(PruneReasonV1::OutOfBounds);
                    continue;
                };
                successors.push(BranchStateV1 {
                    position: next,
                    energy: arrived.energy_after,
                    visited: visited.clone(),
                    consumed: state.consumed.clone(),
                    neutralized: neutralized.clone(),
                    arrival: ArrivalV1::Move { direction, cleared },
                    parent: Some(Arc::clone(&arrived.node)),
                });
            }
            // A move onto the destination is tried before the others in its group.
            successors[group_start..].sort_by_key(|s| s.position != destination);
        }
        // Reverse so the first group's first direction is popped first.
        for successor in successors.into_iter().rev() {
            self.push(successor);
        }
    }

    /// The unconsumed wormhole whose entrance is the state's position.
    fn live_wormhole(&self, state: &BranchStateV1) -> Option<&'w WormholeV1> {
        let world: &'w WorldV1 = self.world;
        world
            .wormhole_at(state.position)
            .filter(|w| !state.consumed.contains(&w.id))
    }

    fn push(&mut self, state: BranchStateV1) {
        self.stack.push(state);
        self.stats.successors_pushed += 1;
        self.stats.stack_high_water = self.stats.stack_high_water.max(self.stack.len() as u64);
    }

    fn prune(&mut self, reason: PruneReasonV1, cell: Cell) {
        self.stats.record_prune(reason);
        tracing::trace!(reason = reason.as_str(), %cell, "branch pruned");
    }
}
