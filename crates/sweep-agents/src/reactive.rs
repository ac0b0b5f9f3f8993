//! The reactive baseline agent.
//!
//! No memory at all: clean if the current cell is dirty, otherwise pick a
//! direction uniformly at random from all four. The agent does not consult
//! the feasible moves, so it bumps into walls and grid edges. That is what
//! makes it a baseline.

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sweep_types::{Action, AgentKind, Move, Percept};

use crate::agent::CleaningAgent;

/// Memoryless clean-or-wander agent.
#[derive(Debug, Clone)]
pub struct ReactiveAgent<R = SmallRng> {
    rng: R,
}

impl ReactiveAgent<SmallRng> {
    /// Create an agent with a seeded [`SmallRng`].
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReactiveAgent<R> {
    /// Create an agent drawing directions from `rng`.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Clean if dirty, otherwise a uniformly random direction.
    pub fn select_action(&mut self, percept: &Percept) -> Action {
        if percept.current_dirty {
            return Action::Clean;
        }
        Move::ALL
            .choose(&mut self.rng)
            .map_or(Action::Clean, |&mv| Action::Move(mv))
    }
}

impl<R: Rng + Send> CleaningAgent for ReactiveAgent<R> {
    fn kind(&self) -> AgentKind {
        AgentKind::Reactive
    }

    fn select_action(&mut self, percept: &Percept) -> Action {
        Self::select_action(self, percept)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn cleans_when_dirty() {
        let mut agent = ReactiveAgent::seeded(0);
        for _ in 0..20 {
            assert_eq!(agent.select_action(&Percept::new(true, [])), Action::Clean);
        }
    }

    #[test]
    fn ignores_feasibility_when_clean() {
        let mut agent = ReactiveAgent::seeded(4);
        let enclosed = Percept::new(false, []);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            let action = agent.select_action(&enclosed);
            assert_ne!(action, Action::Clean, "clean cell must not be cleaned");
            seen.extend(action.as_move());
        }
        assert_eq!(seen.len(), 4, "all four directions should eventually appear");
    }

    #[test]
    fn same_seed_same_choices() {
        let mut a = ReactiveAgent::seeded(21);
        let mut b = ReactiveAgent::seeded(21);
        let p = Percept::new(false, Move::ALL);
        for _ in 0..50 {
            assert_eq!(a.select_action(&p), b.select_action(&p));
        }
    }
}
