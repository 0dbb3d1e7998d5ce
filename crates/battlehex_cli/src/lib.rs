//! Console runner for BattleHex battles.
//!
//! The `battlehex` binary loads unit data from RON, sets up a duel and
//! prints the battle turn by turn:
//!
//! - **stdout**: battle rendering
//! - **stderr**: logs (`RUST_LOG` or `--verbose`)
//!
//! # Example
//!
//! ```bash
//! # Default duel: pikeman at 0, archer at 22
//! cargo run -p battlehex_cli -- run --seed 7
//!
//! # Check the data file
//! cargo run -p battlehex_cli -- validate --data crates/battlehex_cli/assets/data/units.ron
//!
//! # Verify determinism
//! cargo run -p battlehex_cli -- verify --seed 12345 --runs 5
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod data_loader;
pub mod error;
pub mod renderer;
pub mod report;
pub mod scenario;

pub use data_loader::{default_data_path, load_from, load_game_data, DataLoadError};
pub use error::CliError;
pub use renderer::ConsoleRenderer;
pub use report::write_report;
pub use scenario::{verify_determinism, DuelScenario, VerifyOutcome};
