//! Search graph vocabulary shared by the reachability and turn searches.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Heading, TerrainGrid};

/// Number of arrival headings tracked per cell: four directions plus the sentinel.
pub const HEADING_COUNT: usize = 5;

/// Node of the search graph: a resting cell paired with its arrival heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchState {
    cell: CellCoord,
    heading: Heading,
}

impl SearchState {
    /// Creates a state for `cell` reached with `heading`.
    #[must_use]
    pub const fn new(cell: CellCoord, heading: Heading) -> Self {
        Self { cell, heading }
    }

    /// Initial state of a search rooted at `cell`.
    #[must_use]
    pub const fn origin(cell: CellCoord) -> Self {
        Self::new(cell, Heading::Start)
    }

    /// Cell the actor rests on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Heading the actor arrived with.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }
}

/// Dense indexing scheme for every [`SearchState`] of a grid.
///
/// Slots are laid out row-major by cell with [`HEADING_COUNT`] consecutive
/// headings per cell, so a grid of `columns × rows` cells owns exactly
/// `columns × rows × 5` slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateSpace {
    columns: u32,
    rows: u32,
}

impl StateSpace {
    /// Creates the state space for a grid of the provided dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Creates the state space matching `grid`.
    #[must_use]
    pub fn for_grid(grid: &TerrainGrid) -> Self {
        Self::new(grid.columns(), grid.rows())
    }

    /// Total number of slots in the space.
    #[must_use]
    pub fn len(&self) -> usize {
        let cells = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(HEADING_COUNT))
            .unwrap_or(0)
    }

    /// Reports whether the space contains no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot assigned to `state`, or `None` when its cell lies outside the grid.
    #[must_use]
    pub fn index(&self, state: SearchState) -> Option<usize> {
        let cell = state.cell();
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let cell_index = row.checked_mul(width)?.checked_add(column)?;
        cell_index
            .checked_mul(HEADING_COUNT)?
            .checked_add(state.heading().index())
    }
}
