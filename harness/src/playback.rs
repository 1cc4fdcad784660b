//! Step-by-step playback over a completed path.
//!
//! A renderer owns a [`PlaybackCursorV1`] and reads everything it draws from
//! the trace's self-contained step records. Nothing here calls back into the
//! search.

use std::collections::BTreeSet;

use starpath_kernel::grid::Cell;
use starpath_kernel::world::{WormholeId, WorldV1};
use starpath_search::{PathTraceV1, StepRecordV1};

/// Cursor over one [`PathTraceV1`].
#[derive(Debug, Clone)]
pub struct PlaybackCursorV1<'a> {
    world: &'a WorldV1,
    trace: &'a PathTraceV1,
    index: usize,
}

impl<'a> PlaybackCursorV1<'a> {
    /// Place a cursor on the first step. `None` for an empty trace.
    #[must_use]
    pub fn new(world: &'a WorldV1, trace: &'a PathTraceV1) -> Option<Self> {
        if trace.steps().is_empty() {
            return None;
        }
        Some(Self {
            world,
            trace,
            index: 0,
        })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> &'a StepRecordV1 {
        &self.trace.steps()[self.index]
    }

    /// Move one step forward. Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Move one step back. Returns `false` at the first step.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// True when the cursor is on the destination step.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index + 1 >= self.trace.steps().len()
    }

    /// `(current step number, total steps)`, 1-based.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.index + 1, self.trace.steps().len())
    }

    /// Black holes not yet neutralized at the cursor.
    #[must_use]
    pub fn active_black_holes(&self) -> Vec<Cell> {
        let neutralized = &self.current().neutralized;
        self.world
            .black_holes()
            .iter()
            .filter(|cell| !neutralized.contains(cell))
            .copied()
            .collect()
    }

    /// Wormholes consumed up to and including the cursor.
    #[must_use]
    pub fn used_wormholes(&self) -> &'a BTreeSet<WormholeId> {
        &self.current().consumed
    }

    /// One-line status summary for a heads-up display.
    #[must_use]
    pub fn hud_line(&self) -> String {
        let (step, total) = self.progress();
        let current = self.current();
        format!(
            "step {step}/{total} at {} | energy {} | black holes active {} | wormholes used {} | {current}",
            current.cell,
            current.energy_after,
            self.active_black_holes().len(),
            current.consumed.len(),
        )
    }
}
