//! Action request and outcome types exchanged between agents and the world.

use serde::{Deserialize, Serialize};

use crate::geometry::Move;

/// The single action an agent returns each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Remove dirt from the current cell (a no-op on a clean cell).
    Clean,
    /// Step one cell in the given direction.
    Move(Move),
}

impl Action {
    /// Return the move carried by this action, if any.
    pub const fn as_move(self) -> Option<Move> {
        match self {
            Self::Clean => None,
            Self::Move(mv) => Some(mv),
        }
    }

    /// Upper-case wire name (`"CLEAN"`, `"UP"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "CLEAN",
            Self::Move(mv) => mv.as_str(),
        }
    }
}

impl From<Move> for Action {
    fn from(mv: Move) -> Self {
        Self::Move(mv)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the world reports after executing an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Dirt was present and has been removed.
    Cleaned,
    /// A clean action on an already clean cell.
    NothingToClean,
    /// The agent moved to the neighboring cell.
    Moved,
    /// The move was blocked by an obstacle or the grid edge; nothing changed.
    Bumped,
}

impl ActionOutcome {
    /// Whether dirt was actually removed.
    pub const fn cleaned(self) -> bool {
        matches!(self, Self::Cleaned)
    }

    /// Whether the agent changed cells.
    pub const fn moved(self) -> bool {
        matches!(self, Self::Moved)
    }
}
