//! Shared type definitions for the Sweep simulation.
//!
//! This crate is the single source of truth for the vocabulary shared by
//! the world, the agents, and the driver: grid coordinates, moves, the
//! percept an agent receives each turn, and the action it answers with.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for episode identifiers
//! - [`enums`] -- Enumeration types (agent kinds)
//! - [`geometry`] -- [`Position`] and the four cardinal [`Move`]s
//! - [`actions`] -- [`Action`] requests and the [`ActionOutcome`] the world reports
//! - [`perception`] -- [`Percept`] payload delivered to agents each turn

pub mod actions;
pub mod enums;
pub mod geometry;
pub mod ids;
pub mod perception;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, ActionOutcome};
pub use enums::AgentKind;
pub use geometry::{Move, Position};
pub use ids::RunId;
pub use perception::Percept;
