//! The agent's knowledge map: what it has learned about grid cells.
//!
//! The map is the model-based agent's only persistent memory. It is built
//! incrementally from percepts and never forgets:
//!
//! - A position with no entry is **unknown**.
//! - An entry with `obstacle = false` is a known traversable cell. It is
//!   either visited (the agent stood there) or a frontier (the agent saw a
//!   feasible move into it but has not been there yet).
//! - An entry with `obstacle = true` is a known blocked cell. Out-of-grid
//!   neighbors show up here too, because the percept reports them the same
//!   way as obstacles.
//!
//! # Invariants
//!
//! - Monotonic: once `visited` or `obstacle` is set, it is never cleared.
//! - Consistent: no entry is ever both `visited` and `obstacle`. An
//!   observation that would break this is dropped with a warning.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sweep_types::{Move, Position};
use tracing::warn;

/// What the agent has recorded about a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRecord {
    /// The agent has stood on this cell.
    pub visited: bool,
    /// A move into this cell was reported infeasible.
    pub obstacle: bool,
}

/// Tri-state read of a cell. Unknown is never conflated with free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKnowledge {
    /// No observation has referenced this cell.
    Unknown,
    /// Known traversable (visited or not).
    Free,
    /// Known blocked.
    Obstacle,
}

/// Mapping from [`Position`] to [`CellRecord`], created lazily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    cells: BTreeMap<Position, CellRecord>,
}

impl KnowledgeMap {
    /// Create an empty map (everything unknown).
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Observations
    // -------------------------------------------------------------------

    /// Record that the agent is standing on `pos`.
    pub fn observe_self(&mut self, pos: Position) {
        let record = self.cells.entry(pos).or_default();
        if record.obstacle {
            warn!(%pos, "standing on a cell recorded as obstacle, keeping record");
            return;
        }
        record.visited = true;
    }

    /// Record what the feasible moves from `pos` reveal about its neighbors.
    ///
    /// A neighbor whose move is missing from `possible_moves` becomes an
    /// obstacle. A neighbor whose move is present is recorded as known
    /// traversable if it had no entry yet; existing entries are untouched.
    pub fn observe_neighbors(&mut self, pos: Position, possible_moves: &BTreeSet<Move>) {
        for (mv, neighbor) in pos.neighbors() {
            let record = self.cells.entry(neighbor).or_default();
            if possible_moves.contains(&mv) {
                continue;
            }
            if record.visited {
                warn!(%pos, %neighbor, "visited cell reported blocked, keeping record");
                continue;
            }
            record.obstacle = true;
        }
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// The raw record for `pos`, if any.
    pub fn record(&self, pos: Position) -> Option<CellRecord> {
        self.cells.get(&pos).copied()
    }

    /// Tri-state read of `pos`.
    pub fn cell(&self, pos: Position) -> CellKnowledge {
        match self.cells.get(&pos) {
            None => CellKnowledge::Unknown,
            Some(r) if r.obstacle => CellKnowledge::Obstacle,
            Some(_) => CellKnowledge::Free,
        }
    }

    /// Whether `pos` is recorded as an obstacle.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.cell(pos) == CellKnowledge::Obstacle
    }

    /// Whether the agent has stood on `pos`.
    pub fn is_visited(&self, pos: Position) -> bool {
        self.cells.get(&pos).is_some_and(|r| r.visited)
    }

    /// True only for a recorded, non-obstacle, not-yet-visited cell.
    ///
    /// Unknown positions are never eligible.
    pub fn is_free_and_unvisited(&self, pos: Position) -> bool {
        self.cell(pos) == CellKnowledge::Free && !self.is_visited(pos)
    }

    /// Every remembered frontier cell (free and unvisited).
    pub fn known_unvisited_free_positions(&self) -> BTreeSet<Position> {
        self.cells
            .keys()
            .copied()
            .filter(|&pos| self.is_free_and_unvisited(pos))
            .collect()
    }

    /// Number of visited cells.
    pub fn visited_count(&self) -> usize {
        self.cells.values().filter(|r| r.visited).count()
    }

    /// Number of cells recorded as obstacles.
    pub fn obstacle_count(&self) -> usize {
        self.cells.values().filter(|r| r.obstacle).count()
    }

    /// Number of entries (known cells of any kind).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Inclusive bounding box `(min, max)` of all entries.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), p| {
            (
                Position::new(lo.row.min(p.row), lo.col.min(p.col)),
                Position::new(hi.row.max(p.row), hi.col.max(p.col)),
            )
        }))
    }

    /// Iterate over all entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellRecord)> + '_ {
        self.cells.iter().map(|(&p, &r)| (p, r))
    }
}
