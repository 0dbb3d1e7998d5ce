//! Data structures for unit and battlefield configuration.
//!
//! All structs are designed to be deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types and
//! parses documents handed to it. File loading is handled by
//! `battlehex_cli`.

mod game_data;
mod unit_data;

pub use game_data::{FieldData, GameData};
pub use unit_data::UnitData;
