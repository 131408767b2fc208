#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ice Maze solver.
//!
//! This crate defines the vocabulary every other crate speaks: the terrain
//! grid and its classification rules, cardinal directions, the search state
//! that pairs a cell with the direction the actor arrived from, and the
//! outcome of a single simulated move. Systems consume an immutable
//! [`TerrainGrid`] and never mutate it while searching.

mod state;
mod terrain;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use state::{SearchState, StateSpace, HEADING_COUNT};
pub use terrain::{CellKind, GridError, TerrainBehavior, TerrainGrid};

/// Cardinal movement directions available to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing row indices.
    Up,
}

impl Direction {
    /// Every direction in canonical exploration order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Dense index of the direction in `0..4`, matching [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Left => 1,
            Self::Down => 2,
            Self::Up => 3,
        }
    }

    /// Upper-case label used by the map file and the command-line output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
            Self::Down => "DOWN",
            Self::Up => "UP",
        }
    }
}

/// Direction the actor arrived from when it came to rest in a cell.
///
/// The [`Heading::Start`] sentinel marks the initial state before any move
/// has been made. It never equals a travelling heading, so the first move
/// out of the start always counts as a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// No move has been made yet.
    Start,
    /// The actor last moved in the wrapped direction.
    Travel(Direction),
}

impl Heading {
    /// Every heading in slot order: the four directions, then the sentinel.
    pub const ALL: [Heading; HEADING_COUNT] = [
        Heading::Travel(Direction::Right),
        Heading::Travel(Direction::Left),
        Heading::Travel(Direction::Down),
        Heading::Travel(Direction::Up),
        Heading::Start,
    ];

    /// Dense slot of the heading in `0..5`. The sentinel occupies the last slot.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Travel(direction) => direction.index(),
            Self::Start => 4,
        }
    }

    /// Direction carried by the heading, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Travel(direction) => Some(direction),
            Self::Start => None,
        }
    }

    /// Number of turns charged for leaving this heading in `next`.
    ///
    /// Continuing straight is free; every other choice, including the first
    /// move out of [`Heading::Start`], costs exactly one turn.
    #[must_use]
    pub fn turn_cost(self, next: Direction) -> u32 {
        if self == Self::Travel(next) {
            0
        } else {
            1
        }
    }
}

impl From<Direction> for Heading {
    fn from(direction: Direction) -> Self {
        Self::Travel(direction)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell one step away in `direction`, bounded by `columns` × `rows`.
    ///
    /// Returns `None` when the step would leave the grid.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::Right => (self.column.checked_add(1)?, self.row),
            Direction::Left => (self.column.checked_sub(1)?, self.row),
            Direction::Down => (self.column, self.row.checked_add(1)?),
            Direction::Up => (self.column, self.row.checked_sub(1)?),
        };

        if column < columns && row < rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Terminal classification of a simulated move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminal {
    /// The actor came to rest on a non-lethal cell.
    Rest,
    /// The actor ended the move on a lethal cell.
    Hazard,
    /// The move produced no movement at all.
    Blocked,
}

/// Result of applying one directional input to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveOutcome {
    cell: CellCoord,
    terminal: Terminal,
}

impl MoveOutcome {
    /// Outcome where the actor comes to rest on `cell`.
    #[must_use]
    pub const fn rest(cell: CellCoord) -> Self {
        Self {
            cell,
            terminal: Terminal::Rest,
        }
    }

    /// Outcome where the actor lands on the lethal `cell`.
    #[must_use]
    pub const fn hazard(cell: CellCoord) -> Self {
        Self {
            cell,
            terminal: Terminal::Hazard,
        }
    }

    /// Outcome where the actor stays on `origin`.
    #[must_use]
    pub const fn blocked(origin: CellCoord) -> Self {
        Self {
            cell: origin,
            terminal: Terminal::Blocked,
        }
    }

    /// Cell the actor occupies after the move.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Terminal classification of the move.
    #[must_use]
    pub const fn terminal(&self) -> Terminal {
        self.terminal
    }

    /// Resting cell when the move is a valid search transition.
    ///
    /// Blocked and hazardous moves are never expanded by the searches.
    #[must_use]
    pub const fn resting_cell(&self) -> Option<CellCoord> {
        match self.terminal {
            Terminal::Rest => Some(self.cell),
            Terminal::Hazard | Terminal::Blocked => None,
        }
    }
}

/// Reasons a search request is rejected before any exploration happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum InputError {
    /// The start cell lies outside the grid.
    #[error("start cell {0} lies outside the grid")]
    StartOutOfBounds(CellCoord),
    /// The goal cell lies outside the grid.
    #[error("goal cell {0} lies outside the grid")]
    GoalOutOfBounds(CellCoord),
    /// The start cell is a wall.
    #[error("start cell {0} is a wall")]
    StartOnWall(CellCoord),
    /// The goal cell is a wall.
    #[error("goal cell {0} is a wall")]
    GoalOnWall(CellCoord),
}
