//! Grid coordinates and cardinal moves.
//!
//! A [`Position`] has no inherent bounds. Whether a position is inside
//! the world is decided by the environment; whether the agent knows
//! anything about it is decided by its knowledge map. Coordinate math
//! saturates at the `i32` limits instead of overflowing.

use serde::{Deserialize, Serialize};

/// A cell on the grid, addressed as `(row, col)`.
///
/// Rows grow downward and columns grow to the right, so [`Move::Up`]
/// decrements the row. Ordering is row-major, which keeps iteration over
/// `BTreeMap<Position, _>` stable and readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0 at the top edge of the world).
    pub row: i32,
    /// Column index (0 at the left edge of the world).
    pub col: i32,
}

impl Position {
    /// The conventional start cell of every episode.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Create a position from a row and a column.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return the position one step away in the direction of `mv`.
    ///
    /// This is pure coordinate arithmetic: the result may lie outside any
    /// world and is still a valid [`Position`].
    pub const fn apply(self, mv: Move) -> Self {
        let (d_row, d_col) = mv.delta();
        Self {
            row: self.row.saturating_add(d_row),
            col: self.col.saturating_add(d_col),
        }
    }

    /// Return the four neighbors in canonical move order, paired with the
    /// move that reaches each one.
    pub fn neighbors(self) -> [(Move, Self); 4] {
        Move::ALL.map(|mv| (mv, self.apply(mv)))
    }

    /// Manhattan (taxicab) distance between two positions.
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal moves.
///
/// The declaration order is the canonical expansion order used everywhere
/// a deterministic ordering is needed: UP, DOWN, LEFT, RIGHT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Move {
    /// One row toward the top edge.
    Up,
    /// One row toward the bottom edge.
    Down,
    /// One column toward the left edge.
    Left,
    /// One column toward the right edge.
    Right,
}

impl Move {
    /// All moves in canonical order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The `(row, col)` unit delta of this move.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// The single move that takes `from` to `to`, if the two positions are
    /// orthogonally adjacent.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Self::ALL.into_iter().find(|&mv| from.apply(mv) == to)
    }

    /// Upper-case wire name (`"UP"`, `"DOWN"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl core::fmt::Display for Move {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
