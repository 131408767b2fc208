#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement physics for a single directional input.
//!
//! One call resolves one complete move: the actor steps into the adjacent
//! cell, is pushed by conveyors, keeps sliding across ice, and finally comes
//! to rest, lands on a hazard, or never leaves its origin. Conveyors change
//! the direction of travel for the remainder of the move, so the travel
//! direction is tracked separately from the input direction.

use ice_maze_core::{CellCoord, Direction, MoveOutcome, TerrainBehavior, TerrainGrid, Terminal};

/// Resolves the move triggered by pressing `direction` while resting on `origin`.
#[must_use]
pub fn simulate(grid: &TerrainGrid, origin: CellCoord, direction: Direction) -> MoveOutcome {
    resolve(grid, origin, direction, |_| {})
}

/// Resolves a move and records every single-cell displacement it performs.
///
/// Conveyor pushes are recorded in the conveyor's direction. Blocked moves
/// carry no steps.
#[must_use]
pub fn trace(grid: &TerrainGrid, origin: CellCoord, direction: Direction) -> MoveTrace {
    let mut steps = Vec::new();
    let outcome = resolve(grid, origin, direction, |step| steps.push(step));
    if outcome.terminal() == Terminal::Blocked {
        steps.clear();
    }

    MoveTrace { outcome, steps }
}

/// Outcome of a move together with the cell-by-cell path it followed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTrace {
    outcome: MoveOutcome,
    steps: Vec<Direction>,
}

impl MoveTrace {
    /// Final outcome of the move.
    #[must_use]
    pub const fn outcome(&self) -> MoveOutcome {
        self.outcome
    }

    /// Direction of each single-cell displacement, in order.
    #[must_use]
    pub fn steps(&self) -> &[Direction] {
        &self.steps
    }

    /// Consumes the trace, yielding the recorded displacements.
    #[must_use]
    pub fn into_steps(self) -> Vec<Direction> {
        self.steps
    }
}

fn resolve<F>(grid: &TerrainGrid, origin: CellCoord, direction: Direction, mut record: F) -> MoveOutcome
where
    F: FnMut(Direction),
{
    let Some(entered) = grid.open_neighbor(origin, direction) else {
        return MoveOutcome::blocked(origin);
    };
    record(direction);

    let mut cell = entered;
    let mut travel = direction;

    match grid.behavior_at(cell) {
        TerrainBehavior::Lethal => return MoveOutcome::hazard(cell),
        TerrainBehavior::Conveyor(push) => {
            if let Some(pushed) = grid.open_neighbor(cell, push) {
                record(push);
                cell = pushed;
                travel = push;
                if grid.behavior_at(cell) == TerrainBehavior::Lethal {
                    return MoveOutcome::hazard(cell);
                }
            }
        }
        TerrainBehavior::Sliding | TerrainBehavior::Stopping | TerrainBehavior::Blocking => {}
    }

    let limit = grid.columns().max(grid.rows());
    let mut iterations = 0;
    while grid.behavior_at(cell) == TerrainBehavior::Sliding {
        if iterations == limit {
            log::trace!("slide from {origin} capped after {limit} iterations at {cell}");
            break;
        }
        iterations += 1;

        let Some(next) = grid.open_neighbor(cell, travel) else {
            break;
        };
        record(travel);
        cell = next;

        match grid.behavior_at(cell) {
            TerrainBehavior::Lethal => return MoveOutcome::hazard(cell),
            TerrainBehavior::Conveyor(push) => {
                let Some(pushed) = grid.open_neighbor(cell, push) else {
                    break;
                };
                record(push);
                cell = pushed;
                travel = push;
                if grid.behavior_at(cell) == TerrainBehavior::Lethal {
                    return MoveOutcome::hazard(cell);
                }
            }
            TerrainBehavior::Sliding | TerrainBehavior::Stopping | TerrainBehavior::Blocking => {}
        }
    }

    // Being carried back onto the origin is indistinguishable from not moving.
    if cell == origin {
        MoveOutcome::blocked(origin)
    } else {
        MoveOutcome::rest(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_trace_has_no_steps() {
        let grid = TerrainGrid::parse("MMM\nMTM\nMMM").expect("grid");
        let moved = trace(&grid, CellCoord::new(1, 1), Direction::Up);
        assert_eq!(moved.outcome(), MoveOutcome::blocked(CellCoord::new(1, 1)));
        assert!(moved.steps().is_empty());
    }

    #[test]
    fn returning_to_origin_counts_as_blocked() {
        let grid = TerrainGrid::parse("MMMM\nMT2M\nMMMM").expect("grid");
        let origin = CellCoord::new(1, 1);
        let moved = trace(&grid, origin, Direction::Right);
        assert_eq!(moved.outcome(), MoveOutcome::blocked(origin));
        assert!(moved.into_steps().is_empty());
    }
}
