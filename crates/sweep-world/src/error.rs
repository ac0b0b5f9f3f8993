//! Error types for the `sweep-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use sweep_types::Position;

/// Errors that can occur while building or editing a grid world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Width or height is zero or does not fit the coordinate type.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },

    /// A probability lies outside `[0, 1]` (or is NaN).
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The position is outside the grid.
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    /// An ASCII layout could not be parsed.
    #[error("invalid layout: {reason}")]
    InvalidLayout {
        /// Description of what is wrong with the layout.
        reason: String,
    },

    /// The edit would place an obstacle on the start cell or on the agent.
    #[error("cannot place an obstacle at {0}: the cell must stay free")]
    StartBlocked(Position),
}
