//! Performance measures for scoring an episode.
//!
//! A measure watches the outcome of every executed action and reduces the
//! episode to a single non-negative score. Only real effects count: a
//! CLEAN on a clean cell and a move into a wall change nothing, so they
//! score nothing.

use serde::{Deserialize, Serialize};
use sweep_types::ActionOutcome;

/// An incremental episode score.
pub trait PerformanceMeasure {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Account for one executed action.
    fn update(&mut self, outcome: ActionOutcome);

    /// The score so far.
    fn score(&self) -> u64;
}

/// One point per unit of dirt actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanCount {
    cleaned: u64,
}

impl CleanCount {
    /// A fresh counter at zero.
    pub const fn new() -> Self {
        Self { cleaned: 0 }
    }
}

impl PerformanceMeasure for CleanCount {
    fn name(&self) -> &'static str {
        "clean_count"
    }

    fn update(&mut self, outcome: ActionOutcome) {
        if outcome.cleaned() {
            self.cleaned = self.cleaned.saturating_add(1);
        }
    }

    fn score(&self) -> u64 {
        self.cleaned
    }
}

/// Cleanings minus successful moves, floored at zero.
///
/// Rewards agents that clean a lot while walking little.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanMoveBalance {
    cleaned: u64,
    moves: u64,
}

impl CleanMoveBalance {
    /// A fresh balance at zero.
    pub const fn new() -> Self {
        Self {
            cleaned: 0,
            moves: 0,
        }
    }

    /// Dirt removed so far.
    pub const fn cleaned(&self) -> u64 {
        self.cleaned
    }

    /// Successful moves so far.
    pub const fn moves(&self) -> u64 {
        self.moves
    }
}

impl PerformanceMeasure for CleanMoveBalance {
    fn name(&self) -> &'static str {
        "clean_move_balance"
    }

    fn update(&mut self, outcome: ActionOutcome) {
        if outcome.cleaned() {
            self.cleaned = self.cleaned.saturating_add(1);
        }
        if outcome.moved() {
            self.moves = self.moves.saturating_add(1);
        }
    }

    fn score(&self) -> u64 {
        self.cleaned.saturating_sub(self.moves)
    }
}
