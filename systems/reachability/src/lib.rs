#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first feasibility gate over the sliding-move state graph.
//!
//! The search explores `(cell, arrival heading)` states without tracking any
//! cost, which makes it the cheap check to run before the minimum-turn
//! search. Any arrival heading at the goal counts as success.

use std::collections::VecDeque;

use ice_maze_core::{
    CellCoord, Direction, Heading, InputError, SearchState, StateSpace, TerrainGrid,
};
use ice_maze_system_movement::simulate;
use log::debug;

/// Reports whether `goal` can be reached from `start` without touching a hazard.
pub fn is_reachable(
    grid: &TerrainGrid,
    start: CellCoord,
    goal: CellCoord,
) -> Result<bool, InputError> {
    grid.validate_endpoints(start, goal)?;

    let space = StateSpace::for_grid(grid);
    let mut visited = vec![false; space.len()];
    let mut queue = VecDeque::new();

    let origin = SearchState::origin(start);
    if let Some(index) = space.index(origin) {
        visited[index] = true;
        queue.push_back(origin);
    }

    let mut explored = 0_usize;
    while let Some(state) = queue.pop_front() {
        explored += 1;
        if state.cell() == goal {
            debug!("goal {goal} reachable from {start} after {explored} states");
            return Ok(true);
        }

        for direction in Direction::ALL {
            let Some(cell) = simulate(grid, state.cell(), direction).resting_cell() else {
                continue;
            };

            let next = SearchState::new(cell, Heading::Travel(direction));
            let Some(index) = space.index(next) else {
                continue;
            };

            if visited[index] {
                continue;
            }

            visited[index] = true;
            queue.push_back(next);
        }
    }

    debug!("goal {goal} unreachable from {start}; explored {explored} states");
    Ok(false)
}
