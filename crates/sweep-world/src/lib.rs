//! Grid world, dirt, and obstacles for the Sweep simulation.
//!
//! This crate models the physical world the agents clean: a rectangular
//! grid of cells, each possibly dirty and possibly blocked. It is the only
//! place that knows the agent's true position. Agents see it exclusively
//! through the [`Percept`] it produces each turn.
//!
//! # Modules
//!
//! - [`environment`] -- [`GridEnvironment`]: percepts, action execution,
//!   obstacle editing, and cleanliness queries.
//! - [`error`] -- Error types for world construction and editing.
//! - [`generation`] -- Random world generation from dirt and obstacle
//!   probabilities, with a guaranteed open start.
//! - [`layout`] -- ASCII layouts for hand-written scenarios, and rendering
//!   a world back to text.
//!
//! [`Percept`]: sweep_types::Percept

pub mod environment;
pub mod error;
pub mod generation;
pub mod layout;

// Re-export primary types at crate root.
pub use environment::{Cell, GridEnvironment};
pub use error::WorldError;
