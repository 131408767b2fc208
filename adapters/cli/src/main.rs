#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and solves ice maze map files.

mod config;
mod map_file;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ice_maze_core::{CellCoord, Direction};
use ice_maze_system_generation::{generate, Difficulty, GenerationPlan};
use ice_maze_system_reachability::is_reachable;
use ice_maze_system_solver::{solve_path, Solution};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "ice-maze", version, about = "Generate and solve ice sliding mazes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a solvable map and write it to a file
    Generate {
        /// Map name; `.map` is appended when missing
        name: String,
        /// Difficulty level between 1 and 5
        difficulty: u8,
        /// Seed for the generator; drawn at random when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Directory the map file is written to
        #[arg(long, default_value = "maps")]
        out_dir: PathBuf,
        /// TOML file overriding the difficulty-derived parameters
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load a map file and find the route needing the fewest turns
    Solve {
        /// Path of the map file
        path: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Solve result printed by `solve --json`.
#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    entrance: CellCoord,
    exit: CellCoord,
    reachable: bool,
    solution: Option<&'a Solution>,
}

/// Entry point for the ice maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Generate {
            name,
            difficulty,
            seed,
            out_dir,
            config,
        } => generate_map(&name, difficulty, seed, &out_dir, config.as_deref()),
        Command::Solve { path, json } => solve_map(&path, json),
    }
}

fn generate_map(
    name: &str,
    difficulty: u8,
    seed: Option<u64>,
    out_dir: &Path,
    config: Option<&Path>,
) -> Result<()> {
    let difficulty = Difficulty::new(difficulty)?;
    let tuning = config::load_tuning(config)?;
    let plan = GenerationPlan::resolve(difficulty, &tuning)?;
    let seed = seed.unwrap_or_else(rand::random);
    info!(
        "generating map `{name}` at difficulty {} with seed {seed}",
        difficulty.get()
    );

    let map = generate(&plan, seed).context("map generation failed")?;

    let path = map_path(out_dir, name);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    fs::write(&path, map_file::render(&map))
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Valid map found after {} attempts.", map.attempts);
    println!(
        "Minimum turns required (direction changes): {}",
        map.solution.turns()
    );
    print_moves(map.solution.moves());
    println!("Map written to {}", path.display());
    Ok(())
}

fn solve_map(path: &Path, json: bool) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let map = map_file::parse(&text)
        .with_context(|| format!("invalid map file {}", path.display()))?;

    let reachable = is_reachable(&map.grid, map.entrance, map.exit)?;
    let solution = if reachable {
        solve_path(&map.grid, map.entrance, map.exit)?
    } else {
        None
    };

    if let (Some(recorded), Some(solution)) = (map.min_turns, &solution) {
        if recorded != solution.turns() {
            warn!(
                "file records {recorded} minimum turns but the search found {}",
                solution.turns()
            );
        }
    }
    if let (Some(recorded), Some(solution)) = (map.total_moves, &solution) {
        if recorded != solution.moves().len() {
            warn!(
                "file records {recorded} total moves but the route has {}",
                solution.moves().len()
            );
        }
    }

    if json {
        let report = SolveReport {
            entrance: map.entrance,
            exit: map.exit,
            reachable,
            solution: solution.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match map.difficulty {
        Some(level) => println!(
            "Map {}x{} at difficulty {level}",
            map.grid.columns(),
            map.grid.rows()
        ),
        None => println!("Map {}x{}", map.grid.columns(), map.grid.rows()),
    }
    println!("Entrance {} -> exit {}", map.entrance, map.exit);

    let Some(solution) = solution else {
        println!("The exit cannot be reached from the entrance.");
        return Ok(());
    };
    println!(
        "Minimum turns required (direction changes): {}",
        solution.turns()
    );
    println!(
        "Turn sequence: {}",
        map_file::join_labels(solution.direction_changes())
    );
    println!("Inputs pressed: {}", solution.inputs().len());
    print_moves(solution.moves());
    Ok(())
}

fn print_moves(moves: &[Direction]) {
    println!("Full direction sequence ({} total moves):", moves.len());
    for (index, direction) in moves.iter().enumerate() {
        println!("{}. {}", index + 1, direction.label());
    }
}

fn map_path(out_dir: &Path, name: &str) -> PathBuf {
    let suffix = format!(".{}", map_file::EXTENSION);
    if name.ends_with(&suffix) {
        out_dir.join(name)
    } else {
        out_dir.join(format!("{name}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn map_extension_is_appended_once() {
        let dir = Path::new("maps");
        assert_eq!(map_path(dir, "level1"), dir.join("level1.map"));
        assert_eq!(map_path(dir, "level1.map"), dir.join("level1.map"));
    }

    #[test]
    fn generate_defaults_output_directory() {
        let cli = Cli::try_parse_from(["ice-maze", "generate", "cave", "3"]).expect("parses");
        match cli.command {
            Command::Generate {
                name,
                difficulty,
                seed,
                out_dir,
                config,
            } => {
                assert_eq!(name, "cave");
                assert_eq!(difficulty, 3);
                assert_eq!(seed, None);
                assert_eq!(out_dir, PathBuf::from("maps"));
                assert_eq!(config, None);
            }
            Command::Solve { .. } => panic!("parsed the wrong subcommand"),
        }
    }
}
