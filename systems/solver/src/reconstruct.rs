//! Conversion of search tables into turn lists and cell-by-cell moves.

use ice_maze_core::{CellCoord, Direction, Heading, SearchState, TerrainGrid};
use ice_maze_system_movement::trace;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TurnSearch;

/// Cheapest route from the search origin to a goal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    turns: u32,
    direction_changes: Vec<Direction>,
    inputs: Vec<Direction>,
    moves: Vec<Direction>,
}

impl Solution {
    /// Minimum number of direction changes.
    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }

    /// Direction adopted at each turn, in order.
    #[must_use]
    pub fn direction_changes(&self) -> &[Direction] {
        &self.direction_changes
    }

    /// Directional inputs, one per simulated move.
    #[must_use]
    pub fn inputs(&self) -> &[Direction] {
        &self.inputs
    }

    /// Single-cell displacements, one per cell crossed.
    ///
    /// Conveyor pushes appear in the conveyor's direction.
    #[must_use]
    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }
}

/// Internal consistency failures detected while rebuilding a path.
///
/// These indicate a defect in the search tables, never an unreachable goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ReconstructionError {
    /// A state on the parent chain has no parent or loops back on itself.
    #[error("parent chain broken at {cell} (arrived {heading:?})")]
    BrokenChain {
        /// Cell of the offending state.
        cell: CellCoord,
        /// Heading of the offending state.
        heading: Heading,
    },
    /// Replaying a recorded input did not move the actor.
    #[error("replaying {direction:?} from {cell} did not move the actor")]
    StalledReplay {
        /// Cell the replay was resting on.
        cell: CellCoord,
        /// Input that failed to move the actor.
        direction: Direction,
    },
    /// Replaying recorded inputs never reached the next waypoint.
    #[error("replay from {cell} never reached waypoint {waypoint}")]
    DivergedReplay {
        /// Cell the replay was resting on.
        cell: CellCoord,
        /// Waypoint the replay was heading for.
        waypoint: CellCoord,
    },
    /// The turn list disagrees with the recorded goal distance.
    #[error("reconstructed {found} turns but the search recorded {expected}")]
    TurnCountMismatch {
        /// Distance recorded by the search.
        expected: u32,
        /// Number of turns found on the parent chain.
        found: u32,
    },
}

/// Rebuilds the cheapest path from the search origin to `goal`.
///
/// Returns `Ok(None)` when the search never reached `goal`.
pub fn reconstruct(
    search: &TurnSearch,
    grid: &TerrainGrid,
    goal: CellCoord,
) -> Result<Option<Solution>, ReconstructionError> {
    let Some((heading, turns)) = search.best_arrival(goal) else {
        return Ok(None);
    };

    let waypoints = waypoints(search, SearchState::new(goal, heading))?;
    let direction_changes = direction_changes(&waypoints);
    let found = u32::try_from(direction_changes.len()).unwrap_or(u32::MAX);
    if found != turns {
        return Err(ReconstructionError::TurnCountMismatch {
            expected: turns,
            found,
        });
    }

    let (inputs, moves) = replay(search, grid, &waypoints)?;
    debug!(
        "path to {goal}: {turns} turns, {} inputs, {} moves",
        inputs.len(),
        moves.len()
    );

    Ok(Some(Solution {
        turns,
        direction_changes,
        inputs,
        moves,
    }))
}

/// States on the parent chain from the origin (exclusive) to `target`, in order.
fn waypoints(
    search: &TurnSearch,
    target: SearchState,
) -> Result<Vec<SearchState>, ReconstructionError> {
    let origin = SearchState::origin(search.start());
    let limit = search.space().len();
    let mut chain = Vec::new();
    let mut current = target;

    while current != origin {
        let broken = ReconstructionError::BrokenChain {
            cell: current.cell(),
            heading: current.heading(),
        };
        if chain.len() >= limit {
            return Err(broken);
        }

        chain.push(current);
        current = search.parent(current).ok_or(broken)?;
    }

    chain.reverse();
    Ok(chain)
}

fn direction_changes(waypoints: &[SearchState]) -> Vec<Direction> {
    let mut previous = Heading::Start;
    let mut changes = Vec::new();
    for waypoint in waypoints {
        let heading = waypoint.heading();
        if heading != previous {
            if let Some(direction) = heading.direction() {
                changes.push(direction);
            }
        }
        previous = heading;
    }
    changes
}

/// Re-simulates the waypoints from the origin, expanding each search edge
/// into the inputs pressed and the cells crossed.
fn replay(
    search: &TurnSearch,
    grid: &TerrainGrid,
    waypoints: &[SearchState],
) -> Result<(Vec<Direction>, Vec<Direction>), ReconstructionError> {
    let limit = search.space().len();
    let mut inputs = Vec::with_capacity(waypoints.len());
    let mut moves = Vec::new();
    let mut current = search.start();

    for waypoint in waypoints {
        let Some(direction) = waypoint.heading().direction() else {
            return Err(ReconstructionError::BrokenChain {
                cell: waypoint.cell(),
                heading: waypoint.heading(),
            });
        };

        let mut presses = 0_usize;
        while current != waypoint.cell() {
            if presses == limit {
                return Err(ReconstructionError::DivergedReplay {
                    cell: current,
                    waypoint: waypoint.cell(),
                });
            }
            presses += 1;

            let moved = trace(grid, current, direction);
            let Some(cell) = moved.outcome().resting_cell() else {
                return Err(ReconstructionError::StalledReplay {
                    cell: current,
                    direction,
                });
            };

            inputs.push(direction);
            moves.extend(moved.into_steps());
            current = cell;
        }
    }

    Ok((inputs, moves))
}
