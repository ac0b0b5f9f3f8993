//! The grid environment: true world state, percepts, and action execution.
//!
//! A [`GridEnvironment`] owns a `width x height` grid of [`Cell`]s stored
//! row-major, plus the agent's true position. Episodes always start at
//! [`Position::ORIGIN`], which is never an obstacle.
//!
//! Agents never read this struct directly. Each turn the driver asks for a
//! [`Percept`], hands it to the agent, and feeds the chosen [`Action`] back
//! through [`GridEnvironment::execute`]. Infeasible moves are no-ops.

use serde::{Deserialize, Serialize};
use sweep_types::{Action, ActionOutcome, Move, Percept, Position};
use tracing::debug;

use crate::error::WorldError;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Whether the cell currently holds dirt.
    pub dirty: bool,
    /// Whether the cell is blocked.
    pub obstacle: bool,
}

/// A rectangular world of dirt and obstacles with a single agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEnvironment {
    /// Number of columns.
    width: u32,
    /// Number of rows.
    height: u32,
    /// Row-major cell storage, `width * height` entries.
    cells: Vec<Cell>,
    /// The agent's true position.
    agent_pos: Position,
}

impl GridEnvironment {
    /// The cell every episode starts on.
    pub const START: Position = Position::ORIGIN;

    /// Create a clean, obstacle-free world of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is zero
    /// or too large to address with `i32` coordinates.
    pub fn empty(width: u32, height: u32) -> Result<Self, WorldError> {
        let count = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); count],
            agent_pos: Self::START,
        })
    }

    /// Create a world from pre-built cells in row-major order.
    ///
    /// The start cell is forced free.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for bad dimensions or
    /// [`WorldError::InvalidLayout`] if `cells` has the wrong length.
    pub fn from_cells(width: u32, height: u32, mut cells: Vec<Cell>) -> Result<Self, WorldError> {
        let count = cell_count(width, height)?;
        if cells.len() != count {
            return Err(WorldError::InvalidLayout {
                reason: format!("expected {count} cells, got {}", cells.len()),
            });
        }
        if let Some(start) = cells.first_mut() {
            start.obstacle = false;
        }
        Ok(Self {
            width,
            height,
            cells,
            agent_pos: Self::START,
        })
    }

    // -------------------------------------------------------------------
    // Dimensions and lookups
    // -------------------------------------------------------------------

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The agent's true position.
    pub const fn agent_position(&self) -> Position {
        self.agent_pos
    }

    /// Whether `pos` lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Return the cell at `pos`, or `None` if it is outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).and_then(|i| self.cells.get(i)).copied()
    }

    /// Whether `pos` is an obstacle. Out-of-bounds positions report `false`.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.obstacle)
    }

    /// Whether `pos` holds dirt. Out-of-bounds positions report `false`.
    pub fn is_dirty(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.dirty)
    }

    /// Whether the agent may step onto `pos`.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| !c.obstacle)
    }

    /// Whether no dirt remains anywhere in the grid.
    pub fn is_clean(&self) -> bool {
        self.cells.iter().all(|c| !c.dirty)
    }

    /// Number of dirty cells remaining.
    pub fn dirt_count(&self) -> usize {
        self.cells.iter().filter(|c| c.dirty).count()
    }

    /// Number of obstacle cells.
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.obstacle).count()
    }

    /// Iterate over every in-bounds position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let rows = i32::try_from(self.height).unwrap_or(0);
        let cols = i32::try_from(self.width).unwrap_or(0);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    // -------------------------------------------------------------------
    // Agent interface
    // -------------------------------------------------------------------

    /// Moves that are in bounds and not blocked, from the agent's cell.
    pub fn possible_moves(&self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&mv| self.is_passable(self.agent_pos.apply(mv)))
            .collect()
    }

    /// Build the percept for the agent's current cell.
    pub fn percept(&self) -> Percept {
        Percept::new(self.is_dirty(self.agent_pos), self.possible_moves())
    }

    /// Apply an action to the world.
    ///
    /// Cleaning removes dirt from the agent's cell. A move succeeds only
    /// if the destination is in bounds and not an obstacle; otherwise the
    /// agent stays put and [`ActionOutcome::Bumped`] is reported.
    pub fn execute(&mut self, action: Action) -> ActionOutcome {
        match action {
            Action::Clean => {
                let pos = self.agent_pos;
                match self.cell_mut(pos) {
                    Some(cell) if cell.dirty => {
                        cell.dirty = false;
                        debug!(%pos, "dirt removed");
                        ActionOutcome::Cleaned
                    }
                    _ => ActionOutcome::NothingToClean,
                }
            }
            Action::Move(mv) => {
                let target = self.agent_pos.apply(mv);
                if self.is_passable(target) {
                    self.agent_pos = target;
                    ActionOutcome::Moved
                } else {
                    debug!(from = %self.agent_pos, direction = %mv, "move blocked");
                    ActionOutcome::Bumped
                }
            }
        }
    }

    // -------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------

    /// Set or clear an obstacle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions outside the grid,
    /// and [`WorldError::StartBlocked`] when trying to block the start
    /// cell or the agent's current cell.
    pub fn set_obstacle(&mut self, pos: Position, value: bool) -> Result<(), WorldError> {
        if value && (pos == Self::START || pos == self.agent_pos) {
            return Err(WorldError::StartBlocked(pos));
        }
        let cell = self.cell_mut(pos).ok_or(WorldError::OutOfBounds(pos))?;
        cell.obstacle = value;
        Ok(())
    }

    /// Set or clear dirt on a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions outside the grid.
    pub fn set_dirty(&mut self, pos: Position, value: bool) -> Result<(), WorldError> {
        let cell = self.cell_mut(pos).ok_or(WorldError::OutOfBounds(pos))?;
        cell.dirty = value;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    /// Row-major index of `pos`, or `None` when out of bounds.
    fn index(&self, pos: Position) -> Option<usize> {
        let row = u32::try_from(pos.row).ok()?;
        let col = u32::try_from(pos.col).ok()?;
        if row >= self.height || col >= self.width {
            return None;
        }
        let flat = row.checked_mul(self.width)?.checked_add(col)?;
        usize::try_from(flat).ok()
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let i = self.index(pos)?;
        self.cells.get_mut(i)
    }
}

/// Validate dimensions and return the number of cells.
fn cell_count(width: u32, height: u32) -> Result<usize, WorldError> {
    let invalid = WorldError::InvalidDimensions { width, height };
    if width == 0 || height == 0 || i32::try_from(width).is_err() || i32::try_from(height).is_err()
    {
        return Err(invalid);
    }
    width
        .checked_mul(height)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(invalid)
}
