use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::Value;

const CORRIDOR: &str = "width=5\nheight=3\n\nMMMMM\nMIGEM\nMMMMM\n";

fn ice_maze(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ice-maze"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the ice-maze binary")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ice-maze-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch directory");
    dir
}

fn solve_json(path: &Path) -> Value {
    let output = ice_maze(&["solve", path.to_str().expect("utf-8 path"), "--json"]);
    assert!(
        output.status.success(),
        "solve failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("solve prints JSON")
}

#[test]
fn help_lists_both_subcommands() {
    let output = ice_maze(&["--help"]);
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("generate"), "missing generate in:\n{help}");
    assert!(help.contains("solve"), "missing solve in:\n{help}");

    let output = ice_maze(&["solve", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--json"));
}

#[test]
fn solve_reports_route_as_json() {
    let dir = scratch_dir("solve-json");
    let path = dir.join("corridor.map");
    fs::write(&path, CORRIDOR).expect("map written");

    let report = solve_json(&path);

    assert_eq!(report["reachable"], true);
    assert_eq!(report["solution"]["turns"], 1);
    assert_eq!(report["solution"]["moves"], serde_json::json!(["Right", "Right"]));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn solve_reports_unreachable_exit() {
    let dir = scratch_dir("solve-unreachable");
    let path = dir.join("sealed.map");
    fs::write(&path, "MMMMM\nMIMEM\nMMMMM\n").expect("map written");

    let output = ice_maze(&["solve", path.to_str().expect("utf-8 path")]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("cannot be reached"));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn generated_map_solves_with_recorded_turns() {
    let dir = scratch_dir("generate");
    let tuning = dir.join("tuning.toml");
    fs::write(&tuning, "min_size = 12\nmax_size = 14\nmin_turns = 2\n").expect("tuning written");

    let output = ice_maze(&[
        "generate",
        "cave",
        "2",
        "--seed",
        "7",
        "--out-dir",
        dir.to_str().expect("utf-8 path"),
        "--config",
        tuning.to_str().expect("utf-8 path"),
    ]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let path = dir.join("cave.map");
    let text = fs::read_to_string(&path).expect("map file written with extension");
    let report = solve_json(&path);

    assert_eq!(report["reachable"], true);
    let turns = report["solution"]["turns"].as_u64().expect("turn count");
    assert!(turns >= 2, "generated map needs only {turns} turns");
    assert!(text.contains(&format!("min_moves={turns}\n")));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn out_of_range_difficulty_fails() {
    let dir = scratch_dir("bad-difficulty");

    let output = ice_maze(&[
        "generate",
        "cave",
        "9",
        "--out-dir",
        dir.to_str().expect("utf-8 path"),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("difficulty must be between 1 and 5"));
    assert!(!dir.join("cave.map").exists());
    let _ = fs::remove_dir_all(dir);
}
