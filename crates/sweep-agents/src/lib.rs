//! Knowledge map, path search, and cleaning policies for the Sweep simulation.
//!
//! This crate contains the decision logic for agents -- everything that
//! turns a [`Percept`] into an [`Action`] without touching the world. It
//! sits between `sweep-types` (the shared vocabulary) and `sweep-core`
//! (which drives episodes and scores them).
//!
//! # Modules
//!
//! - [`agent`] -- The [`CleaningAgent`] trait and the [`build_agent`] factory
//! - [`knowledge`] -- The agent's belief store about visited and blocked cells ([`KnowledgeMap`])
//! - [`pathfinding`] -- Breadth-first shortest paths over a knowledge map
//! - [`model_based`] -- Frontier exploration followed by homing ([`ModelBasedAgent`])
//! - [`reactive`] -- Memoryless clean-or-wander policy ([`ReactiveAgent`])
//!
//! [`Percept`]: sweep_types::Percept
//! [`Action`]: sweep_types::Action

pub mod agent;
pub mod knowledge;
pub mod model_based;
pub mod pathfinding;
pub mod reactive;

// Re-export primary types at crate root for convenience.
pub use agent::{CleaningAgent, build_agent};
pub use knowledge::{CellKnowledge, CellRecord, KnowledgeMap};
pub use model_based::{ModelBasedAgent, Phase};
pub use pathfinding::shortest_path;
pub use reactive::ReactiveAgent;
