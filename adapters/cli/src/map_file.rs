//! Plain-text map files shared by the `generate` and `solve` commands.
//!
//! A map file opens with `#` comment lines describing the map for humans,
//! followed by `key=value` metadata, a blank line and the terrain grid.

use std::str::FromStr;

use ice_maze_core::{CellCoord, Direction, GridError, TerrainGrid};
use ice_maze_system_generation::GeneratedMap;
use thiserror::Error;

/// File extension appended to map names that lack one.
pub(crate) const EXTENSION: &str = "map";

/// Map loaded from disk together with the metadata recorded when it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MapFile {
    pub(crate) grid: TerrainGrid,
    pub(crate) entrance: CellCoord,
    pub(crate) exit: CellCoord,
    pub(crate) difficulty: Option<u8>,
    pub(crate) min_turns: Option<u32>,
    pub(crate) total_moves: Option<usize>,
}

/// Errors raised while reading a map file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum MapFileError {
    /// A metadata line used a key the format does not define.
    #[error("line {line}: unknown key `{key}`")]
    UnknownKey {
        /// One-based line number.
        line: usize,
        /// Offending key.
        key: String,
    },
    /// A metadata value could not be parsed.
    #[error("line {line}: invalid value `{value}` for `{key}`")]
    InvalidValue {
        /// One-based line number.
        line: usize,
        /// Key the value belongs to.
        key: String,
        /// Offending value.
        value: String,
    },
    /// Declared dimensions disagree with the grid rows.
    #[error("declared {key}={declared} but the grid has {actual}")]
    DimensionMismatch {
        /// Either `width` or `height`.
        key: &'static str,
        /// Value recorded in the metadata.
        declared: u32,
        /// Value measured from the grid.
        actual: u32,
    },
    /// The grid has no entrance or no exit cell.
    #[error("map has no {0} cell")]
    MissingEndpoint(&'static str),
    /// The grid rows are malformed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Renders a generated map in the on-disk format.
#[must_use]
pub(crate) fn render(map: &GeneratedMap) -> String {
    let level = map.difficulty.get();
    let moves = map.solution.moves();

    let mut legend = String::from(
        "# Terrain: M=wall, G=ice, T=normal ground, I=entrance, E=exit",
    );
    if level >= 2 {
        legend.push_str(", D=fragile ice");
    }
    if level >= 3 {
        legend.push_str(", B=hole (lethal)");
    }
    if level >= 4 {
        legend.push_str(", 1234=conveyors (1=right, 2=left, 3=down, 4=up)");
    }

    let mut text = String::new();
    text.push_str(&format!("# Map generated at difficulty {level}\n"));
    text.push_str(&legend);
    text.push('\n');
    text.push_str(&format!(
        "# Minimum turns required: {}\n",
        map.solution.turns()
    ));
    text.push_str(&format!("# Total moves in sequence: {}\n", moves.len()));
    text.push_str(&format!("# Full sequence: {}\n", join_labels(moves)));
    text.push_str(&format!("width={}\n", map.grid.columns()));
    text.push_str(&format!("height={}\n", map.grid.rows()));
    text.push_str(&format!("difficulty={level}\n"));
    text.push_str(&format!("min_moves={}\n", map.solution.turns()));
    text.push_str(&format!("total_moves={}\n", moves.len()));
    text.push('\n');
    text.push_str(&map.grid.to_string());
    text
}

/// Parses a map file, checking the declared dimensions against the grid.
pub(crate) fn parse(text: &str) -> Result<MapFile, MapFileError> {
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut difficulty = None;
    let mut min_turns = None;
    let mut total_moves = None;
    let mut rows = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            rows.push(line);
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        let number = index + 1;
        match key {
            "width" => width = Some(metadata(number, key, value)?),
            "height" => height = Some(metadata(number, key, value)?),
            "difficulty" => difficulty = Some(metadata(number, key, value)?),
            "min_moves" => min_turns = Some(metadata(number, key, value)?),
            "total_moves" => total_moves = Some(metadata(number, key, value)?),
            _ => {
                return Err(MapFileError::UnknownKey {
                    line: number,
                    key: key.to_owned(),
                })
            }
        }
    }

    let grid = TerrainGrid::parse(&rows.join("\n"))?;
    check_dimension("width", width, grid.columns())?;
    check_dimension("height", height, grid.rows())?;
    let entrance = grid
        .entrance()
        .ok_or(MapFileError::MissingEndpoint("entrance"))?;
    let exit = grid.exit().ok_or(MapFileError::MissingEndpoint("exit"))?;

    Ok(MapFile {
        grid,
        entrance,
        exit,
        difficulty,
        min_turns,
        total_moves,
    })
}

/// Joins direction labels with arrows, as written in the file header.
#[must_use]
pub(crate) fn join_labels(directions: &[Direction]) -> String {
    directions
        .iter()
        .map(|direction| direction.label())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn metadata<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, MapFileError> {
    value.parse().map_err(|_| MapFileError::InvalidValue {
        line,
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

fn check_dimension(
    key: &'static str,
    declared: Option<u32>,
    actual: u32,
) -> Result<(), MapFileError> {
    match declared {
        Some(declared) if declared != actual => Err(MapFileError::DimensionMismatch {
            key,
            declared,
            actual,
        }),
        _ => Ok(()),
    }
}
