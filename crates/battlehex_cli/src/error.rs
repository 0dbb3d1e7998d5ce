//! Errors surfaced by the `battlehex` commands.

use std::path::PathBuf;

use battlehex_core::error::GameError;
use thiserror::Error;

use crate::data_loader::DataLoadError;

/// Error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Unit data could not be loaded.
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// Battle setup or the turn loop failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Unit data loaded but failed validation.
    #[error("{0} problem(s) found in unit data")]
    InvalidData(usize),

    /// Repeated runs of one seed disagreed.
    #[error("Non-determinism detected: {unique} distinct results over {runs} runs")]
    NonDeterministic {
        /// Runs played.
        runs: usize,
        /// Distinct final hashes.
        unique: usize,
    },

    /// Writing battle output failed.
    #[error("Failed to write battle output: {0}")]
    Output(#[from] std::io::Error),

    /// A scenario file could not be read or parsed.
    #[error("Failed to load scenario '{}': {message}", .path.display())]
    Scenario {
        /// Scenario file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The battle report could not be written.
    #[error("Failed to write report '{}': {message}", .path.display())]
    Report {
        /// Report destination.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}
