//! The model-based agent: frontier exploration followed by homing.
//!
//! Each call to [`ModelBasedAgent::select_action`] runs one turn of the
//! decision loop:
//!
//! 1. Update the [`KnowledgeMap`] from the percept (always, even when the
//!    turn ends up cleaning).
//! 2. **Clean** if the current cell is dirty.
//! 3. **Local frontier** (exploring): step into a random adjacent cell that
//!    is known free and not yet visited.
//! 4. **Remote frontier** (exploring): BFS to the nearest remembered
//!    frontier cell and take the first step. The rest of the path is thrown
//!    away and recomputed next turn, so new obstacles are picked up as
//!    soon as they are seen.
//! 5. **Begin homing** once neither frontier step is available.
//! 6. **Homing**: follow the stored path back to the origin. A stale step
//!    (blocked, or no longer adjacent after a position correction) discards
//!    the path and replans with the current map.
//! 7. **Fallback**: a random feasible move, or [`Action::Clean`] when the
//!    agent is enclosed.
//!
//! "No path" from the search is never an error. It only moves the decision
//! down to the next branch.

use std::collections::{BTreeSet, VecDeque};

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sweep_types::{Action, AgentKind, Move, Percept, Position};
use tracing::{debug, info};

use crate::agent::CleaningAgent;
use crate::knowledge::KnowledgeMap;
use crate::pathfinding::shortest_path;

/// Which half of the run the agent is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Visiting every reachable frontier cell.
    Exploring,
    /// Frontier exhausted, returning to the origin.
    Homing,
}

/// A cleaning agent that remembers what it has seen.
///
/// The position is the agent's own estimate. The driver must call
/// [`sync_position`](Self::sync_position) after every executed action.
#[derive(Debug, Clone)]
pub struct ModelBasedAgent<R = SmallRng> {
    /// Everything learned so far.
    knowledge: KnowledgeMap,
    /// Believed current position.
    position: Position,
    /// Where the run started and where homing leads.
    origin: Position,
    /// Exploring or homing.
    phase: Phase,
    /// Remaining positions to walk back to the origin (current excluded).
    home_path: VecDeque<Position>,
    /// Source of tie-breaking randomness.
    rng: R,
}

impl ModelBasedAgent<SmallRng> {
    /// Create an agent with a seeded [`SmallRng`].
    pub fn seeded(origin: Position, seed: u64) -> Self {
        Self::new(origin, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ModelBasedAgent<R> {
    /// Create an agent standing on `origin` with an empty map.
    pub const fn new(origin: Position, rng: R) -> Self {
        Self {
            knowledge: KnowledgeMap::new(),
            position: origin,
            origin,
            phase: Phase::Exploring,
            home_path: VecDeque::new(),
            rng,
        }
    }

    /// Believed current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The start cell homing returns to.
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Positions still to traverse on the way home.
    pub const fn home_path(&self) -> &VecDeque<Position> {
        &self.home_path
    }

    /// The knowledge map built so far.
    pub const fn knowledge(&self) -> &KnowledgeMap {
        &self.knowledge
    }

    /// Overwrite the position estimate with the true position.
    pub fn sync_position(&mut self, actual: Position) {
        if actual != self.position {
            debug!(believed = %self.position, %actual, "position estimate corrected");
        }
        self.position = actual;
    }

    /// Run one turn of the decision loop and return the chosen action.
    pub fn select_action(&mut self, percept: &Percept) -> Action {
        let here = self.position;
        self.knowledge.observe_self(here);
        self.knowledge.observe_neighbors(here, &percept.possible_moves);

        if percept.current_dirty {
            debug!(%here, "cleaning");
            return Action::Clean;
        }

        if self.phase == Phase::Exploring {
            if let Some(mv) = self.local_frontier_step(percept) {
                debug!(%here, direction = %mv, "stepping to adjacent frontier");
                return self.step(mv);
            }
            if let Some(mv) = self.remote_frontier_step(percept) {
                debug!(%here, direction = %mv, "heading to remote frontier");
                return self.step(mv);
            }
            self.phase = Phase::Homing;
            info!(
                %here,
                visited = self.knowledge.visited_count(),
                obstacles = self.knowledge.obstacle_count(),
                "exploration exhausted, homing"
            );
        }

        if let Some(mv) = self.homing_step(percept) {
            debug!(%here, direction = %mv, remaining = self.home_path.len(), "homing");
            return self.step(mv);
        }

        self.fallback(percept)
    }

    // -------------------------------------------------------------------
    // Policy branches
    // -------------------------------------------------------------------

    /// Random feasible move into an adjacent free, unvisited cell.
    fn local_frontier_step(&mut self, percept: &Percept) -> Option<Move> {
        let candidates: Vec<Move> = percept
            .possible_moves
            .iter()
            .copied()
            .filter(|&mv| self.knowledge.is_free_and_unvisited(self.position.apply(mv)))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// First step of a shortest path to the nearest remembered frontier.
    fn remote_frontier_step(&self, percept: &Percept) -> Option<Move> {
        let frontier = self.knowledge.known_unvisited_free_positions();
        if frontier.is_empty() {
            return None;
        }
        let path = shortest_path(&self.knowledge, self.position, &frontier)?;
        let next = *path.get(1)?;
        Move::between(self.position, next).filter(|&mv| percept.allows(mv))
    }

    /// Next move home, replanning once if the stored path is stale.
    fn homing_step(&mut self, percept: &Percept) -> Option<Move> {
        if self.position == self.origin {
            self.home_path.clear();
            return None;
        }
        if let Some(mv) = self.pop_home_move(percept) {
            return Some(mv);
        }
        if !self.home_path.is_empty() {
            debug!(at = %self.position, "home path stale, replanning");
        }
        self.plan_home();
        self.pop_home_move(percept)
    }

    /// Take the head of `home_path` if it is one feasible step away.
    fn pop_home_move(&mut self, percept: &Percept) -> Option<Move> {
        let target = *self.home_path.front()?;
        let mv = Move::between(self.position, target).filter(|&mv| percept.allows(mv))?;
        self.home_path.pop_front();
        Some(mv)
    }

    /// Replace `home_path` with a fresh shortest path to the origin.
    fn plan_home(&mut self) {
        let goal: BTreeSet<Position> = std::iter::once(self.origin).collect();
        match shortest_path(&self.knowledge, self.position, &goal) {
            Some(path) => {
                self.home_path = path.into_iter().skip(1).collect();
                debug!(
                    from = %self.position,
                    steps = self.home_path.len(),
                    distance = self.position.manhattan_distance(self.origin),
                    "home path planned"
                );
            }
            None => {
                self.home_path.clear();
                debug!(from = %self.position, "no known path home");
            }
        }
    }

    /// Random feasible move, or clean when nothing is feasible.
    fn fallback(&mut self, percept: &Percept) -> Action {
        if percept.is_enclosed() {
            debug!(here = %self.position, "enclosed, cleaning in place");
            return Action::Clean;
        }
        let moves: Vec<Move> = percept.possible_moves.iter().copied().collect();
        match moves.choose(&mut self.rng) {
            Some(&mv) => {
                debug!(here = %self.position, direction = %mv, "fallback move");
                self.step(mv)
            }
            None => Action::Clean,
        }
    }

    /// Commit to a move: advance the position estimate.
    const fn step(&mut self, mv: Move) -> Action {
        self.position = self.position.apply(mv);
        Action::Move(mv)
    }
}

impl<R: Rng + Send> CleaningAgent for ModelBasedAgent<R> {
    fn kind(&self) -> AgentKind {
        AgentKind::ModelBased
    }

    fn select_action(&mut self, percept: &Percept) -> Action {
        Self::select_action(self, percept)
    }

    fn sync_position(&mut self, actual: Position) {
        Self::sync_position(self, actual);
    }

    fn exploration_complete(&self) -> bool {
        self.phase == Phase::Homing
    }
}
