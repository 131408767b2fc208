#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Minimum-turn search over the sliding-move state graph.
//!
//! Every search state pairs a resting cell with the heading the actor
//! arrived with. Leaving a state in the same direction is free, any other
//! direction costs one turn, so the search runs as a 0-1 breadth-first
//! search: free edges jump the queue, unit edges wait at the back. The
//! resulting [`TurnSearch`] holds the dense distance and parent tables that
//! [`reconstruct`] turns into a [`Solution`].

mod reconstruct;

use std::collections::VecDeque;

use ice_maze_core::{
    CellCoord, Direction, Heading, InputError, SearchState, StateSpace, TerrainGrid,
};
use ice_maze_system_movement::simulate;
use log::debug;
use thiserror::Error;

pub use reconstruct::{reconstruct, ReconstructionError, Solution};

const UNREACHED: u32 = u32::MAX;

/// Distance and parent tables produced by a single-source turn search.
#[derive(Clone, Debug)]
pub struct TurnSearch {
    space: StateSpace,
    start: CellCoord,
    distances: Vec<u32>,
    parents: Vec<Option<SearchState>>,
}

impl TurnSearch {
    /// Cell the search was rooted at.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// State space the tables are indexed by.
    #[must_use]
    pub const fn space(&self) -> StateSpace {
        self.space
    }

    /// Minimum number of turns needed to reach `state`, if it was reached.
    #[must_use]
    pub fn distance(&self, state: SearchState) -> Option<u32> {
        self.space
            .index(state)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != UNREACHED)
    }

    /// State `state` was reached from. The origin state has no parent.
    #[must_use]
    pub fn parent(&self, state: SearchState) -> Option<SearchState> {
        self.space
            .index(state)
            .and_then(|index| self.parents.get(index).copied().flatten())
    }

    /// Cheapest arrival heading at `goal` together with its turn count.
    ///
    /// Ties resolve in [`Heading::ALL`] order.
    #[must_use]
    pub fn best_arrival(&self, goal: CellCoord) -> Option<(Heading, u32)> {
        let mut best: Option<(Heading, u32)> = None;
        for heading in Heading::ALL {
            let Some(distance) = self.distance(SearchState::new(goal, heading)) else {
                continue;
            };
            if best.map_or(true, |(_, current)| distance < current) {
                best = Some((heading, distance));
            }
        }
        best
    }

    /// Minimum number of turns needed to reach `goal`, if it is reachable.
    #[must_use]
    pub fn goal_cost(&self, goal: CellCoord) -> Option<u32> {
        self.best_arrival(goal).map(|(_, distance)| distance)
    }

    /// Number of states the search reached.
    #[must_use]
    pub fn reached_states(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHED)
            .count()
    }
}

/// Runs the minimum-turn search from `start` over every reachable state.
pub fn solve(grid: &TerrainGrid, start: CellCoord) -> Result<TurnSearch, InputError> {
    grid.validate_endpoints(start, start)?;

    let space = StateSpace::for_grid(grid);
    let mut distances = vec![UNREACHED; space.len()];
    let mut parents = vec![None; space.len()];
    let mut frontier = VecDeque::new();

    let origin = SearchState::origin(start);
    if let Some(index) = space.index(origin) {
        distances[index] = 0;
        frontier.push_back((origin, 0_u32));
    }

    while let Some((state, cost)) = frontier.pop_front() {
        let Some(index) = space.index(state) else {
            continue;
        };
        if cost > distances[index] {
            continue;
        }

        for direction in Direction::ALL {
            let Some(cell) = simulate(grid, state.cell(), direction).resting_cell() else {
                continue;
            };

            let next = SearchState::new(cell, Heading::Travel(direction));
            let Some(next_index) = space.index(next) else {
                continue;
            };

            let turn = state.heading().turn_cost(direction);
            let next_cost = cost.saturating_add(turn);
            if next_cost >= distances[next_index] {
                continue;
            }

            distances[next_index] = next_cost;
            parents[next_index] = Some(state);
            if turn == 0 {
                frontier.push_front((next, next_cost));
            } else {
                frontier.push_back((next, next_cost));
            }
        }
    }

    let search = TurnSearch {
        space,
        start,
        distances,
        parents,
    };
    debug!(
        "turn search from {start} reached {} states",
        search.reached_states()
    );
    Ok(search)
}

/// Errors raised by [`solve_path`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The start or goal cell cannot be searched.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The search tables could not be turned back into a path.
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),
}

/// Searches from `start` and reconstructs the cheapest path to `goal`.
///
/// Returns `Ok(None)` when the goal is unreachable.
pub fn solve_path(
    grid: &TerrainGrid,
    start: CellCoord,
    goal: CellCoord,
) -> Result<Option<Solution>, SolveError> {
    grid.validate_endpoints(start, goal)?;
    let search = solve(grid, start)?;
    Ok(reconstruct(&search, grid, goal)?)
}
