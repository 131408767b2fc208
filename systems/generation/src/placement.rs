//! Random terrain placement for a single generation candidate.

use ice_maze_core::{CellCoord, CellKind, Direction, GridError, TerrainGrid};
use rand::Rng;

use crate::Difficulty;

const PLACEMENT_TRIES: u32 = 50;
const OBSTACLE_TRIES: u32 = 100;
const MAX_OBSTACLE_SIDE: u32 = 3;

/// Candidate map awaiting the reachability and turn checks.
#[derive(Clone, Debug)]
pub(crate) struct Candidate {
    pub(crate) grid: TerrainGrid,
    pub(crate) entrance: CellCoord,
    pub(crate) exit: CellCoord,
}

/// Builds one random candidate of `columns` × `rows` cells.
///
/// Both sides must be at least four so the interior holds two distinct cells.
pub(crate) fn build_candidate<R: Rng>(
    rng: &mut R,
    columns: u32,
    rows: u32,
    difficulty: Difficulty,
) -> Result<Candidate, GridError> {
    let mut grid = walled_ice(columns, rows)?;
    let level = difficulty.factor();
    let area = columns * rows;

    let entrance = interior_cell(rng, columns, rows);
    let mut exit = interior_cell(rng, columns, rows);
    while exit == entrance {
        exit = interior_cell(rng, columns, rows);
    }
    grid.set(entrance, CellKind::Entrance)?;
    grid.set(exit, CellKind::Exit)?;

    scatter(rng, &mut grid, area / (35 + level * 5), CellKind::NormalGround)?;
    place_obstacles(rng, &mut grid, level * 5 + area / 25)?;
    place_scattered_walls(rng, &mut grid, area / 15)?;
    if level >= 2 {
        scatter(rng, &mut grid, (level - 1) * 3 + area / 80, CellKind::FragileIce)?;
    }
    if level >= 4 {
        place_conveyors(rng, &mut grid, (level - 3) * 2 + area / 120)?;
    }
    if level >= 3 {
        scatter(rng, &mut grid, (level - 2) * 2 + area / 100, CellKind::Hazard)?;
    }

    Ok(Candidate {
        grid,
        entrance,
        exit,
    })
}

fn walled_ice(columns: u32, rows: u32) -> Result<TerrainGrid, GridError> {
    let mut grid = TerrainGrid::filled(columns, rows, CellKind::Wall)?;
    for row in 1..rows.saturating_sub(1) {
        for column in 1..columns.saturating_sub(1) {
            grid.set(CellCoord::new(column, row), CellKind::OpenIce)?;
        }
    }
    Ok(grid)
}

fn interior_cell<R: Rng>(rng: &mut R, columns: u32, rows: u32) -> CellCoord {
    CellCoord::new(rng.gen_range(1..columns - 1), rng.gen_range(1..rows - 1))
}

/// Picks a random interior cell that still holds plain ice.
fn plain_ice_cell<R: Rng>(rng: &mut R, grid: &TerrainGrid, tries: u32) -> Option<CellCoord> {
    (0..tries)
        .map(|_| interior_cell(rng, grid.columns(), grid.rows()))
        .find(|cell| grid.kind_at(*cell) == Some(CellKind::OpenIce))
}

fn scatter<R: Rng>(
    rng: &mut R,
    grid: &mut TerrainGrid,
    count: u32,
    kind: CellKind,
) -> Result<(), GridError> {
    for _ in 0..count {
        if let Some(cell) = plain_ice_cell(rng, grid, PLACEMENT_TRIES) {
            grid.set(cell, kind)?;
        }
    }
    Ok(())
}

/// Square wall blocks of side one to three, clipped to the interior.
fn place_obstacles<R: Rng>(
    rng: &mut R,
    grid: &mut TerrainGrid,
    count: u32,
) -> Result<(), GridError> {
    let column_limit = grid.columns() - 1;
    let row_limit = grid.rows() - 1;

    for _ in 0..count {
        let Some(origin) = plain_ice_cell(rng, grid, OBSTACLE_TRIES) else {
            continue;
        };
        let side = rng.gen_range(1..=MAX_OBSTACLE_SIDE);

        for row in origin.row()..(origin.row() + side).min(row_limit) {
            for column in origin.column()..(origin.column() + side).min(column_limit) {
                let cell = CellCoord::new(column, row);
                if grid.kind_at(cell) == Some(CellKind::OpenIce) {
                    grid.set(cell, CellKind::Wall)?;
                }
            }
        }
    }
    Ok(())
}

fn place_scattered_walls<R: Rng>(
    rng: &mut R,
    grid: &mut TerrainGrid,
    count: u32,
) -> Result<(), GridError> {
    for _ in 0..count {
        let cell = interior_cell(rng, grid.columns(), grid.rows());
        if grid.kind_at(cell) == Some(CellKind::OpenIce) {
            grid.set(cell, CellKind::Wall)?;
        }
    }
    Ok(())
}

/// Conveyors only point at neighbours the actor can be pushed onto.
fn place_conveyors<R: Rng>(
    rng: &mut R,
    grid: &mut TerrainGrid,
    count: u32,
) -> Result<(), GridError> {
    for _ in 0..count {
        let Some(cell) = plain_ice_cell(rng, grid, PLACEMENT_TRIES) else {
            continue;
        };

        let open: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| grid.open_neighbor(cell, *direction).is_some())
            .collect();
        if open.is_empty() {
            continue;
        }

        let direction = open[rng.gen_range(0..open.len())];
        grid.set(cell, CellKind::Conveyor(direction))?;
    }
    Ok(())
}
