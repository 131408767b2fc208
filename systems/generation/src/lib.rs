#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural generation of solvable ice mazes.
//!
//! A generation run draws the grid dimensions once, then keeps building
//! random candidates until one passes the reachability gate and demands at
//! least the configured number of turns. Every random draw comes from a
//! seeded `ChaCha8Rng`, so the same seed and plan always yield the same map.

mod placement;

use ice_maze_core::{CellCoord, GridError, InputError, TerrainGrid};
use ice_maze_system_reachability::is_reachable;
use ice_maze_system_solver::{solve_path, Solution, SolveError};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest supported difficulty level.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest supported difficulty level.
pub const MAX_DIFFICULTY: u8 = 5;

const DEFAULT_MAX_ATTEMPTS: u32 = 1_000;
const PROGRESS_INTERVAL: u32 = 100;
const SMALLEST_SIDE: u32 = 4;
const LARGEST_SIDE: u32 = 1_024;

/// Difficulty level in `1..=5` controlling map size and terrain mix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Difficulty(u8);

impl Difficulty {
    /// Validates a raw difficulty level.
    pub fn new(level: u8) -> Result<Self, GenerationError> {
        if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&level) {
            Ok(Self(level))
        } else {
            Err(GenerationError::InvalidDifficulty(level))
        }
    }

    /// Raw difficulty level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    const fn factor(self) -> u32 {
        self.0 as u32
    }
}

/// Optional overrides for the difficulty-derived generation parameters.
///
/// Missing fields fall back to the values derived from the difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationTuning {
    /// Smallest grid side, walls included.
    pub min_size: Option<u32>,
    /// Largest grid side, walls included. Capped at 1024.
    pub max_size: Option<u32>,
    /// Fewest turns an accepted map must require.
    pub min_turns: Option<u32>,
    /// Candidates built before giving up.
    pub max_attempts: Option<u32>,
}

/// Resolved parameters of a generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationPlan {
    difficulty: Difficulty,
    min_size: u32,
    max_size: u32,
    min_turns: u32,
    max_attempts: u32,
}

impl GenerationPlan {
    /// Derives the plan for `difficulty`, applying any overrides in `tuning`.
    pub fn resolve(
        difficulty: Difficulty,
        tuning: &GenerationTuning,
    ) -> Result<Self, GenerationError> {
        let level = difficulty.factor();
        let plan = Self {
            difficulty,
            min_size: tuning.min_size.unwrap_or(8 + level * 2),
            max_size: tuning.max_size.unwrap_or(15 + level * 8),
            min_turns: tuning.min_turns.unwrap_or(level * 5 + 3),
            max_attempts: tuning.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };

        if plan.min_size < SMALLEST_SIDE {
            return Err(GenerationError::InvalidTuning(format!(
                "min_size {} is below {SMALLEST_SIDE}",
                plan.min_size
            )));
        }
        if plan.max_size > LARGEST_SIDE {
            return Err(GenerationError::InvalidTuning(format!(
                "max_size {} exceeds {LARGEST_SIDE}",
                plan.max_size
            )));
        }
        if plan.max_size < plan.min_size {
            return Err(GenerationError::InvalidTuning(format!(
                "max_size {} is below min_size {}",
                plan.max_size, plan.min_size
            )));
        }
        if plan.max_attempts == 0 {
            return Err(GenerationError::InvalidTuning(
                "max_attempts must be positive".to_owned(),
            ));
        }

        Ok(plan)
    }

    /// Difficulty the plan was derived from.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Smallest grid side, walls included.
    #[must_use]
    pub const fn min_size(&self) -> u32 {
        self.min_size
    }

    /// Largest grid side, walls included.
    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Fewest turns an accepted map must require.
    #[must_use]
    pub const fn min_turns(&self) -> u32 {
        self.min_turns
    }

    /// Candidates built before giving up.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Map accepted by a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMap {
    /// Terrain of the accepted candidate.
    pub grid: TerrainGrid,
    /// Cell the actor starts on.
    pub entrance: CellCoord,
    /// Cell the actor must reach.
    pub exit: CellCoord,
    /// Difficulty the map was generated for.
    pub difficulty: Difficulty,
    /// Number of candidates built, the accepted one included.
    pub attempts: u32,
    /// Cheapest route from the entrance to the exit.
    pub solution: Solution,
}

/// Errors raised while generating a map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The requested difficulty lies outside `1..=5`.
    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),
    /// The tuning overrides describe an impossible plan.
    #[error("invalid generation tuning: {0}")]
    InvalidTuning(String),
    /// No acceptable candidate appeared within the attempt budget.
    #[error("no valid map found after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of candidates built.
        attempts: u32,
    },
    /// A candidate grid could not be assembled.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The reachability gate rejected the candidate endpoints.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The turn search failed on a candidate.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Generates a map following `plan`, drawing every random value from `seed`.
pub fn generate(plan: &GenerationPlan, seed: u64) -> Result<GeneratedMap, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let columns = rng.gen_range(plan.min_size..=plan.max_size);
    let rows = rng.gen_range(plan.min_size..=plan.max_size);
    debug!(
        "generating {columns}x{rows} map at difficulty {} with seed {seed}",
        plan.difficulty.get()
    );

    for attempt in 1..=plan.max_attempts {
        if attempt % PROGRESS_INTERVAL == 0 {
            info!("attempt {attempt}/{}", plan.max_attempts);
        }

        let candidate = placement::build_candidate(&mut rng, columns, rows, plan.difficulty)?;
        if !is_reachable(&candidate.grid, candidate.entrance, candidate.exit)? {
            continue;
        }

        let Some(solution) = solve_path(&candidate.grid, candidate.entrance, candidate.exit)?
        else {
            continue;
        };
        if solution.turns() < plan.min_turns {
            continue;
        }

        info!(
            "accepted map after {attempt} attempts requiring {} turns",
            solution.turns()
        );
        return Ok(GeneratedMap {
            grid: candidate.grid,
            entrance: candidate.entrance,
            exit: candidate.exit,
            difficulty: plan.difficulty,
            attempts: attempt,
            solution,
        });
    }

    Err(GenerationError::AttemptsExhausted {
        attempts: plan.max_attempts,
    })
}
