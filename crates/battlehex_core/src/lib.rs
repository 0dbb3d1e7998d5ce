//! # BattleHex Core
//!
//! Deterministic battle engine for BattleHex.
//!
//! This crate contains **only** battle logic:
//! - No rendering
//! - No IO
//! - No system randomness (callers pass in the RNG)
//!
//! This separation enables:
//! - Headless battle runs from the CLI
//! - Seeded replays
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`position`] - Cell coordinates on the linear battlefield
//! - [`battlefield`] - Cell occupancy and unit placement
//! - [`unit`] - Units, stats and attack behaviors
//! - [`combat`] - Damage formula
//! - [`battle`] - Turn loop
//! - [`events`] - Battle events, snapshots and observers
//! - [`registry`] - Unit-type registry and unit factory
//! - [`data`] - Unit data records (RON)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod battlefield;
pub mod combat;
pub mod data;
pub mod error;
pub mod events;
pub mod position;
pub mod registry;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{BattleConfig, BattleManager, BattleReport};
    pub use crate::battlefield::Battlefield;
    pub use crate::data::{FieldData, GameData, UnitData};
    pub use crate::error::{GameError, Result};
    pub use crate::events::{BattleEvent, BattleObserver, EventLog, FieldSnapshot, HealthSnapshot};
    pub use crate::position::Position;
    pub use crate::registry::{UnitFactory, VariantRegistry};
    pub use crate::unit::{Behavior, CombatStats, Unit, UnitId, UnitVariant};
}
