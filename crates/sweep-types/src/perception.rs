//! Percept payload delivered to agents each turn.
//!
//! The percept is the **only** information an agent receives about the
//! world. It reports whether the current cell is dirty and which moves are
//! feasible from here. It says nothing about dirt at the destinations, and
//! nothing about the agent's absolute position.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::Move;

/// Locally observable facts for a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Percept {
    /// Whether the cell the agent stands on is dirty.
    pub current_dirty: bool,
    /// Moves that are neither out of bounds nor blocked by an obstacle.
    pub possible_moves: BTreeSet<Move>,
}

impl Percept {
    /// Build a percept from a dirt flag and any collection of moves.
    pub fn new(current_dirty: bool, possible_moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            current_dirty,
            possible_moves: possible_moves.into_iter().collect(),
        }
    }

    /// Whether `mv` is currently feasible.
    pub fn allows(&self, mv: Move) -> bool {
        self.possible_moves.contains(&mv)
    }

    /// Whether no move at all is feasible from the current cell.
    pub fn is_enclosed(&self) -> bool {
        self.possible_moves.is_empty()
    }
}
