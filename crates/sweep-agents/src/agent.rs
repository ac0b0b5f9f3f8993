//! The cleaning agent trait and a factory for boxed agents.
//!
//! During every step of an episode the runner presents the agent with a
//! [`Percept`] and executes the [`Action`] it returns. The
//! [`CleaningAgent`] trait abstracts over the policy so the runner and the
//! experiment driver can treat the reactive and the model-based agent the
//! same way.

use sweep_types::{Action, AgentKind, Percept, Position};

use crate::model_based::ModelBasedAgent;
use crate::reactive::ReactiveAgent;

/// A policy that maps percepts to actions.
///
/// Implementations must be `Send` so episodes can run inside async tasks.
pub trait CleaningAgent: Send {
    /// Which policy this is.
    fn kind(&self) -> AgentKind;

    /// Choose the next action for the given percept.
    fn select_action(&mut self, percept: &Percept) -> Action;

    /// Report the agent's true position after an action was executed.
    ///
    /// Agents that track no position ignore this.
    fn sync_position(&mut self, _actual: Position) {}

    /// Whether the agent considers its exploration finished.
    ///
    /// Agents that keep no map have nothing to explore and report `true`.
    fn exploration_complete(&self) -> bool {
        true
    }
}

/// Build a boxed agent of the given kind.
///
/// `origin` is where the episode starts. `seed` seeds the agent's own
/// random number generator; callers keep it apart from the world's seed.
pub fn build_agent(kind: AgentKind, origin: Position, seed: u64) -> Box<dyn CleaningAgent> {
    match kind {
        AgentKind::Reactive => Box::new(ReactiveAgent::seeded(seed)),
        AgentKind::ModelBased => Box::new(ModelBasedAgent::seeded(origin, seed)),
    }
}

#[cfg(test)]
mod tests {
    use sweep_types::Move;

    use super::*;

    #[test]
    fn factory_builds_requested_kind() {
        for kind in [AgentKind::Reactive, AgentKind::ModelBased] {
            let agent = build_agent(kind, Position::ORIGIN, 5);
            assert_eq!(agent.kind(), kind);
        }
    }

    #[test]
    fn boxed_agents_clean_dirty_cells() {
        for kind in [AgentKind::Reactive, AgentKind::ModelBased] {
            let mut agent = build_agent(kind, Position::ORIGIN, 11);
            let percept = Percept::new(true, [Move::Down]);
            assert_eq!(agent.select_action(&percept), Action::Clean);
            agent.sync_position(Position::ORIGIN);
        }
    }

    #[test]
    fn only_the_model_based_agent_tracks_exploration() {
        let reactive = build_agent(AgentKind::Reactive, Position::ORIGIN, 2);
        assert!(reactive.exploration_complete());

        let mut model_based = build_agent(AgentKind::ModelBased, Position::ORIGIN, 2);
        assert!(!model_based.exploration_complete());
        model_based.select_action(&Percept::new(false, []));
        assert!(model_based.exploration_complete());
    }
}
