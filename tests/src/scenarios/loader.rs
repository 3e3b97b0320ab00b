//! Loads scenario files from `src/vectors`.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{Result, ScenarioError};
use super::model::ScenarioFile;

/// Path of a scenario file shipped with this crate
pub fn scenario_path(file_name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("vectors")
        .join(file_name)
}

pub fn load_scenarios(path: &Path) -> Result<ScenarioFile> {
    let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}
