//! Unit data loading from disk.
//!
//! Finds the `units.ron` document and parses it into [`GameData`].
//! Parsing itself lives in the core; this module only owns the IO.

use std::fs;
use std::path::{Path, PathBuf};

use battlehex_core::data::GameData;
use battlehex_core::error::GameError;
use thiserror::Error;

/// Environment variable naming a directory that holds `units.ron`.
pub const DATA_DIR_ENV: &str = "BATTLEHEX_DATA_DIR";

/// File name of the unit data document.
pub const DATA_FILE_NAME: &str = "units.ron";

/// Errors that can occur while loading unit data.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// No data file was given and none was found in the standard locations.
    #[error("No unit data found (pass --data or set {DATA_DIR_ENV})")]
    NotFound,

    /// The data file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is malformed or incomplete.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Resolve the default unit data file.
///
/// Looks for `units.ron` in standard locations:
/// 1. Directory named by `BATTLEHEX_DATA_DIR`
/// 2. `./crates/battlehex_cli/assets/data/` (repo root)
/// 3. `./assets/data/` (running from battlehex_cli)
pub fn default_data_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        let path = PathBuf::from(dir).join(DATA_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "{DATA_DIR_ENV} is set but holds no {DATA_FILE_NAME}");
    }

    let candidates = ["crates/battlehex_cli/assets/data", "assets/data"];
    candidates
        .iter()
        .map(|dir| Path::new(dir).join(DATA_FILE_NAME))
        .find(|path| path.exists())
}

/// Pick the data file: `explicit` if given, otherwise [`default_data_path`].
///
/// # Errors
///
/// [`DataLoadError::NotFound`] if nothing was given and nothing was found.
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf, DataLoadError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_data_path().ok_or(DataLoadError::NotFound),
    }
}

/// Read and parse a unit data document.
///
/// # Errors
///
/// [`DataLoadError::Read`] for IO failures, [`DataLoadError::Game`] for
/// parse errors and records missing required fields.
pub fn load_game_data(path: &Path) -> Result<GameData, DataLoadError> {
    let source = fs::read_to_string(path).map_err(|source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let data = GameData::from_ron_str(&source, &path.display().to_string())?;
    tracing::info!(path = %path.display(), units = data.units.len(), "Unit data loaded");
    Ok(data)
}

/// Resolve the data file and load it.
///
/// # Errors
///
/// Anything [`resolve_data_path`] or [`load_game_data`] returns.
pub fn load_from(explicit: Option<&Path>) -> Result<GameData, DataLoadError> {
    let path = resolve_data_path(explicit)?;
    load_game_data(&path)
}
