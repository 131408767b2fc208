//! Generation tuning loaded from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use ice_maze_system_generation::GenerationTuning;

/// Reads tuning overrides from `path`, or returns the defaults when no file is given.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<GenerationTuning> {
    let Some(path) = path else {
        return Ok(GenerationTuning::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    parse_tuning(&text).with_context(|| format!("invalid tuning file {}", path.display()))
}

fn parse_tuning(text: &str) -> Result<GenerationTuning> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let tuning = load_tuning(None).expect("defaults");
        assert_eq!(tuning, GenerationTuning::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let tuning = parse_tuning("max_size = 20\nmin_turns = 6\n").expect("tuning parses");

        assert_eq!(tuning.max_size, Some(20));
        assert_eq!(tuning.min_turns, Some(6));
        assert_eq!(tuning.min_size, None);
        assert_eq!(tuning.max_attempts, None);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let path = Path::new("definitely/not/here/tuning.toml");
        let error = load_tuning(Some(path)).expect_err("missing file");
        assert!(format!("{error:#}").contains("tuning.toml"));
    }
}
