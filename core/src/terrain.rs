//! Terrain classification and the immutable grid the solver runs on.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Direction, InputError};

/// Kind of terrain occupying a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable cell.
    Wall,
    /// Slippery ice the actor slides across.
    OpenIce,
    /// Ice that slides exactly like [`CellKind::OpenIce`] during a move.
    FragileIce,
    /// Ground with enough friction to stop a slide.
    NormalGround,
    /// Cell the actor starts on.
    Entrance,
    /// Cell the actor must reach.
    Exit,
    /// Lethal cell that ends the move.
    Hazard,
    /// Conveyor that pushes the actor one cell in its fixed direction.
    Conveyor(Direction),
}

/// Movement rule a cell imposes on an actor entering it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainBehavior {
    /// The cell cannot be entered.
    Blocking,
    /// Entering the cell ends the move as a hazard.
    Lethal,
    /// The actor keeps sliding in its current direction of travel.
    Sliding,
    /// A slide halts on the cell.
    Stopping,
    /// The actor is pushed one cell in the wrapped direction and redirected.
    Conveyor(Direction),
}

impl CellKind {
    /// Movement rule associated with the cell kind.
    #[must_use]
    pub const fn behavior(self) -> TerrainBehavior {
        match self {
            Self::Wall => TerrainBehavior::Blocking,
            Self::Hazard => TerrainBehavior::Lethal,
            Self::OpenIce | Self::FragileIce => TerrainBehavior::Sliding,
            Self::NormalGround | Self::Entrance | Self::Exit => TerrainBehavior::Stopping,
            Self::Conveyor(direction) => TerrainBehavior::Conveyor(direction),
        }
    }

    /// Decodes a map symbol.
    ///
    /// `X` marks fragile ice that already broke and decodes as a hazard.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        let kind = match symbol {
            'M' => Self::Wall,
            'G' => Self::OpenIce,
            'D' => Self::FragileIce,
            'T' => Self::NormalGround,
            'I' => Self::Entrance,
            'E' => Self::Exit,
            'B' | 'X' => Self::Hazard,
            '1' => Self::Conveyor(Direction::Right),
            '2' => Self::Conveyor(Direction::Left),
            '3' => Self::Conveyor(Direction::Down),
            '4' => Self::Conveyor(Direction::Up),
            _ => return None,
        };
        Some(kind)
    }

    /// Map symbol used when rendering the cell.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => 'M',
            Self::OpenIce => 'G',
            Self::FragileIce => 'D',
            Self::NormalGround => 'T',
            Self::Entrance => 'I',
            Self::Exit => 'E',
            Self::Hazard => 'B',
            Self::Conveyor(Direction::Right) => '1',
            Self::Conveyor(Direction::Left) => '2',
            Self::Conveyor(Direction::Down) => '3',
            Self::Conveyor(Direction::Up) => '4',
        }
    }
}

/// Errors raised while building or editing a [`TerrainGrid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows or no columns.
    #[error("grid must contain at least one cell")]
    Empty,
    /// The provided cell buffer does not match the declared dimensions.
    #[error("expected {expected} cells but found {found}")]
    CellCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
    /// A row has a different width from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A symbol does not name any terrain.
    #[error("unknown terrain symbol '{symbol}' at {cell}")]
    UnknownSymbol {
        /// The unrecognised character.
        symbol: char,
        /// Location of the character.
        cell: CellCoord,
    },
    /// An edit addressed a cell outside the grid.
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(CellCoord),
}

/// Rectangular, row-major grid of terrain cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainGrid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl TerrainGrid {
    /// Creates a grid from a row-major cell buffer.
    pub fn new(columns: u32, rows: u32, cells: Vec<CellKind>) -> Result<Self, GridError> {
        let expected = cell_count(columns, rows)?;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Creates a grid where every cell holds `kind`.
    pub fn filled(columns: u32, rows: u32, kind: CellKind) -> Result<Self, GridError> {
        let count = cell_count(columns, rows)?;
        Self::new(columns, rows, vec![kind; count])
    }

    /// Parses the textual map form, one symbol per cell and one line per row.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut columns = None;
        let mut rows = 0_u32;
        let mut cells = Vec::new();

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let mut width = 0_u32;
            for symbol in line.chars() {
                let cell = CellCoord::new(width, rows);
                let kind = CellKind::from_symbol(symbol)
                    .ok_or(GridError::UnknownSymbol { symbol, cell })?;
                cells.push(kind);
                width += 1;
            }

            match columns {
                None => columns = Some(width),
                Some(expected) if expected != width => {
                    return Err(GridError::RaggedRow {
                        row: rows,
                        expected,
                        found: width,
                    });
                }
                Some(_) => {}
            }
            rows += 1;
        }

        Self::new(columns.unwrap_or(0), rows, cells)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Terrain occupying `cell`, if it lies inside the grid.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Movement rule of `cell`. Cells outside the grid block movement.
    #[must_use]
    pub fn behavior_at(&self, cell: CellCoord) -> TerrainBehavior {
        self.kind_at(cell)
            .map_or(TerrainBehavior::Blocking, CellKind::behavior)
    }

    /// Neighbour of `cell` in `direction` when it exists and is not a wall.
    #[must_use]
    pub fn open_neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let next = cell.step(direction, self.columns, self.rows)?;
        match self.behavior_at(next) {
            TerrainBehavior::Blocking => None,
            _ => Some(next),
        }
    }

    /// Replaces the terrain of `cell`.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) -> Result<(), GridError> {
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(GridError::OutOfBounds(cell))?;
        *slot = kind;
        Ok(())
    }

    /// First cell in row-major order holding `kind`.
    #[must_use]
    pub fn find(&self, kind: CellKind) -> Option<CellCoord> {
        self.iter()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(cell, _)| cell)
    }

    /// Location of the entrance cell.
    #[must_use]
    pub fn entrance(&self) -> Option<CellCoord> {
        self.find(CellKind::Entrance)
    }

    /// Location of the exit cell.
    #[must_use]
    pub fn exit(&self) -> Option<CellCoord> {
        self.find(CellKind::Exit)
    }

    /// Iterator over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().zip(0_u32..).map(move |(kind, offset)| {
            (CellCoord::new(offset % columns, offset / columns), *kind)
        })
    }

    /// Confirms that `start` and `goal` are usable search endpoints.
    pub fn validate_endpoints(&self, start: CellCoord, goal: CellCoord) -> Result<(), InputError> {
        match self.kind_at(start) {
            None => return Err(InputError::StartOutOfBounds(start)),
            Some(CellKind::Wall) => return Err(InputError::StartOnWall(start)),
            Some(_) => {}
        }

        match self.kind_at(goal) {
            None => Err(InputError::GoalOutOfBounds(goal)),
            Some(CellKind::Wall) => Err(InputError::GoalOnWall(goal)),
            Some(_) => Ok(()),
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for TerrainGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).map_err(|_| fmt::Error)?;
        for row in self.cells.chunks(width.max(1)) {
            for kind in row {
                write!(f, "{}", kind.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn cell_count(columns: u32, rows: u32) -> Result<usize, GridError> {
    if columns == 0 || rows == 0 {
        return Err(GridError::Empty);
    }

    usize::try_from(u64::from(columns) * u64::from(rows)).map_err(|_| GridError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
MMMMM
MIGTM
M1B4M
MDGEM
MMMMM
";

    #[test]
    fn parse_reads_every_symbol() {
        let grid = TerrainGrid::parse(SAMPLE).expect("sample parses");

        assert_eq!(grid.columns(), 5);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.entrance(), Some(CellCoord::new(1, 1)));
        assert_eq!(grid.exit(), Some(CellCoord::new(3, 3)));
        assert_eq!(
            grid.kind_at(CellCoord::new(1, 2)),
            Some(CellKind::Conveyor(Direction::Right))
        );
        assert_eq!(
            grid.kind_at(CellCoord::new(3, 2)),
            Some(CellKind::Conveyor(Direction::Up))
        );
        assert_eq!(grid.kind_at(CellCoord::new(2, 2)), Some(CellKind::Hazard));
        assert_eq!(grid.kind_at(CellCoord::new(5, 0)), None);
    }

    #[test]
    fn display_renders_the_parsed_text() {
        let grid = TerrainGrid::parse(SAMPLE).expect("sample parses");
        assert_eq!(grid.to_string(), SAMPLE.trim_start());
    }

    #[test]
    fn broken_fragile_ice_decodes_as_hazard() {
        assert_eq!(CellKind::from_symbol('X'), Some(CellKind::Hazard));
        assert_eq!(CellKind::from_symbol('?'), None);
    }

    #[test]
    fn fragile_ice_slides_like_open_ice() {
        assert_eq!(CellKind::FragileIce.behavior(), TerrainBehavior::Sliding);
        assert_eq!(CellKind::OpenIce.behavior(), TerrainBehavior::Sliding);
    }

    #[test]
    fn entrance_and_exit_stop_a_slide() {
        assert_eq!(CellKind::Entrance.behavior(), TerrainBehavior::Stopping);
        assert_eq!(CellKind::Exit.behavior(), TerrainBehavior::Stopping);
        assert_eq!(CellKind::NormalGround.behavior(), TerrainBehavior::Stopping);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = TerrainGrid::parse("MMM\nMM\n").expect_err("ragged grid");
        assert_eq!(
            error,
            GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_symbols() {
        let error = TerrainGrid::parse("MMM\nMZM\n").expect_err("unknown symbol");
        assert_eq!(
            error,
            GridError::UnknownSymbol {
                symbol: 'Z',
                cell: CellCoord::new(1, 1),
            }
        );
    }

    #[test]
    fn parse_rejects_empty_text() {
        assert_eq!(TerrainGrid::parse("\n\n"), Err(GridError::Empty));
    }

    #[test]
    fn outside_cells_block_movement() {
        let grid = TerrainGrid::parse(SAMPLE).expect("sample parses");
        assert_eq!(
            grid.behavior_at(CellCoord::new(9, 9)),
            TerrainBehavior::Blocking
        );
        assert_eq!(
            grid.open_neighbor(CellCoord::new(1, 1), Direction::Up),
            None
        );
        assert_eq!(
            grid.open_neighbor(CellCoord::new(1, 1), Direction::Right),
            Some(CellCoord::new(2, 1))
        );
    }

    #[test]
    fn set_rejects_cells_outside_the_grid() {
        let mut grid = TerrainGrid::filled(2, 2, CellKind::OpenIce).expect("grid");
        assert_eq!(
            grid.set(CellCoord::new(2, 0), CellKind::Wall),
            Err(GridError::OutOfBounds(CellCoord::new(2, 0)))
        );
        grid.set(CellCoord::new(1, 1), CellKind::Exit)
            .expect("cell inside grid");
        assert_eq!(grid.exit(), Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn validate_endpoints_flags_walls_and_bounds() {
        let grid = TerrainGrid::parse(SAMPLE).expect("sample parses");
        let entrance = CellCoord::new(1, 1);
        let exit = CellCoord::new(3, 3);

        assert_eq!(grid.validate_endpoints(entrance, exit), Ok(()));
        assert_eq!(
            grid.validate_endpoints(CellCoord::new(0, 0), exit),
            Err(InputError::StartOnWall(CellCoord::new(0, 0)))
        );
        assert_eq!(
            grid.validate_endpoints(entrance, CellCoord::new(7, 1)),
            Err(InputError::GoalOutOfBounds(CellCoord::new(7, 1)))
        );
    }
}
