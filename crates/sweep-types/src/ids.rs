//! Episode identifier.
//!
//! Every episode gets a strongly-typed ID so results from a batch of
//! trials can be correlated in logs. IDs use UUID v7 (time-ordered), so
//! sorting by ID sorts by start time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one episode (one agent in one world).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
