//! ASCII layouts.
//!
//! Hand-written scenarios are easier to read as text than as coordinate
//! lists. A layout is one line per row:
//!
//! | Char | Meaning          |
//! |------|------------------|
//! | `.`  | free, clean      |
//! | `*`  | free, dirty      |
//! | `#`  | obstacle         |
//!
//! Surrounding whitespace and blank lines are ignored. All rows must have
//! the same length, and the top-left cell (the start) must not be `#`.
//!
//! [`GridEnvironment::render`] produces the same alphabet, with `A` marking
//! the agent (`a` when the agent stands on dirt).

use crate::environment::{Cell, GridEnvironment};
use crate::error::WorldError;

impl GridEnvironment {
    /// Parse an ASCII layout.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidLayout`] for empty input, ragged rows,
    /// unknown characters, or a blocked start cell.
    pub fn from_layout(text: &str) -> Result<Self, WorldError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(WorldError::InvalidLayout {
                reason: String::from("layout is empty"),
            });
        };
        let width = first.chars().count();

        let mut cells = Vec::with_capacity(width.saturating_mul(rows.len()));
        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(WorldError::InvalidLayout {
                    reason: format!("row {row_idx} has a different width than row 0"),
                });
            }
            for ch in row.chars() {
                cells.push(parse_cell(ch).ok_or_else(|| WorldError::InvalidLayout {
                    reason: format!("unexpected character {ch:?} in row {row_idx}"),
                })?);
            }
        }

        if cells.first().is_some_and(|c| c.obstacle) {
            return Err(WorldError::InvalidLayout {
                reason: String::from("start cell (0, 0) is an obstacle"),
            });
        }

        let width = u32::try_from(width).map_err(|e| WorldError::InvalidLayout {
            reason: format!("layout too wide: {e}"),
        })?;
        let height = u32::try_from(rows.len()).map_err(|e| WorldError::InvalidLayout {
            reason: format!("layout too tall: {e}"),
        })?;
        Self::from_cells(width, height, cells)
    }

    /// Render the world as ASCII, one line per row, agent included.
    pub fn render(&self) -> String {
        let agent = self.agent_position();
        let mut out = String::new();
        let mut current_row = None;
        for pos in self.positions() {
            if current_row.is_some_and(|r| r != pos.row) {
                out.push('\n');
            }
            current_row = Some(pos.row);
            let cell = self.cell(pos).unwrap_or_default();
            out.push(render_cell(cell, pos == agent));
        }
        out
    }
}

const fn parse_cell(ch: char) -> Option<Cell> {
    match ch {
        '.' => Some(Cell { dirty: false, obstacle: false }),
        '*' => Some(Cell { dirty: true, obstacle: false }),
        '#' => Some(Cell { dirty: false, obstacle: true }),
        _ => None,
    }
}

const fn render_cell(cell: Cell, agent_here: bool) -> char {
    match (agent_here, cell.dirty, cell.obstacle) {
        (true, true, _) => 'a',
        (true, false, _) => 'A',
        (false, _, true) => '#',
        (false, true, false) => '*',
        (false, false, false) => '.',
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sweep_types::{Action, Move, Position};

    use super::*;

    #[test]
    fn parse_simple_layout() {
        let env = GridEnvironment::from_layout(
            "
            .*.
            .#.
            ...
            ",
        )
        .unwrap();
        assert_eq!(env.width(), 3);
        assert_eq!(env.height(), 3);
        assert!(env.is_dirty(Position::new(0, 1)));
        assert!(env.is_obstacle(Position::new(1, 1)));
        assert_eq!(env.dirt_count(), 1);
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(GridEnvironment::from_layout("...\n..").is_err());
    }

    #[test]
    fn unknown_character_rejected() {
        assert!(GridEnvironment::from_layout(".x.").is_err());
    }

    #[test]
    fn blocked_start_rejected() {
        assert!(GridEnvironment::from_layout("#..").is_err());
    }

    #[test]
    fn empty_layout_rejected() {
        assert!(GridEnvironment::from_layout("  \n  ").is_err());
    }

    #[test]
    fn render_round_trips_with_agent_marker() {
        let mut env = GridEnvironment::from_layout("*.\n#.").unwrap();
        assert_eq!(env.render(), "a.\n#.");
        let _ = env.execute(Action::Move(Move::Right));
        assert_eq!(env.render(), "*A\n#.");
    }
}
