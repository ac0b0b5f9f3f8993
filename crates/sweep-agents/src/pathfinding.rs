//! Breadth-first shortest paths over a [`KnowledgeMap`].
//!
//! The search is optimistic: only cells recorded as obstacles are avoided,
//! and unknown cells are expanded as if free. The agent has no evidence
//! against them, and every real step is validated against the percept
//! before it is taken.
//!
//! Because unknown cells are expanded, an unreachable goal set on an
//! unbounded plane would never exhaust the queue. Expansion is therefore
//! confined to the bounding box of everything known (map entries, start,
//! and goals) padded by one cell. That is enough room to walk around any
//! known wall.
//!
//! Neighbors are expanded in the canonical order UP, DOWN, LEFT, RIGHT,
//! so ties between equally short paths are broken deterministically.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use sweep_types::Position;

use crate::knowledge::{CellKnowledge, KnowledgeMap};

/// Inclusive rectangle the search may expand into.
#[derive(Debug, Clone, Copy)]
struct SearchBounds {
    min: Position,
    max: Position,
}

impl SearchBounds {
    fn covering(map: &KnowledgeMap, start: Position, goals: &BTreeSet<Position>) -> Self {
        let (mut min, mut max) = map.bounds().unwrap_or((start, start));
        for p in goals.iter().copied().chain(std::iter::once(start)) {
            min = Position::new(min.row.min(p.row), min.col.min(p.col));
            max = Position::new(max.row.max(p.row), max.col.max(p.col));
        }
        Self {
            min: Position::new(min.row.saturating_sub(1), min.col.saturating_sub(1)),
            max: Position::new(max.row.saturating_add(1), max.col.saturating_add(1)),
        }
    }

    const fn contains(self, p: Position) -> bool {
        p.row >= self.min.row && p.row <= self.max.row && p.col >= self.min.col && p.col <= self.max.col
    }
}

/// Find the shortest path from `start` to the nearest position in `goals`.
///
/// Returns the ordered positions from `start` to the reached goal, both
/// inclusive, or `None` if no goal is reachable without crossing a known
/// obstacle. If `start` is itself a goal the path is `[start]`. An empty
/// goal set has no path.
pub fn shortest_path(
    map: &KnowledgeMap,
    start: Position,
    goals: &BTreeSet<Position>,
) -> Option<Vec<Position>> {
    if goals.is_empty() {
        return None;
    }
    if goals.contains(&start) {
        return Some(vec![start]);
    }

    let bounds = SearchBounds::covering(map, start, goals);
    let mut seen = BTreeSet::new();
    let mut prev: BTreeMap<Position, Position> = BTreeMap::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for (_, next) in current.neighbors() {
            if !bounds.contains(next)
                || map.cell(next) == CellKnowledge::Obstacle
                || !seen.insert(next)
            {
                continue;
            }
            prev.insert(next, current);
            if goals.contains(&next) {
                return Some(reconstruct(&prev, start, next));
            }
            queue.push_back(next);
        }
    }

    None
}

/// Walk predecessor links back from `goal` to `start`.
fn reconstruct(prev: &BTreeMap<Position, Position>, start: Position, goal: Position) -> Vec<Position> {
    let mut path = VecDeque::new();
    let mut current = goal;
    path.push_front(current);
    while current != start {
        let Some(&predecessor) = prev.get(&current) else {
            break;
        };
        path.push_front(predecessor);
        current = predecessor;
    }
    path.into_iter().collect()
}
