//! Error types for the battle engine.

use thiserror::Error;

use crate::position::Position;
use crate::unit::UnitId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all battle engine errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Position lies outside `[0, size)`.
    #[error("Position {position} is outside the battlefield (size {size})")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Battlefield size.
        size: usize,
    },

    /// Placement target already holds a unit.
    #[error("Cell {0} is already occupied")]
    OccupiedCell(Position),

    /// Operation referenced a unit that is not on the battlefield.
    #[error("Unit {0} is not on the battlefield")]
    UnitNotOnField(UnitId),

    /// Dead units never occupy a cell.
    #[error("Unit {0} is dead and cannot be placed")]
    DeadUnit(UnitId),

    /// Roster already holds a unit with this id.
    #[error("Unit id {0} is already in the battle")]
    DuplicateUnit(UnitId),

    /// Move target failed the bounds-or-occupancy check.
    #[error("Unit {unit} cannot move to {position}")]
    InvalidDestination {
        /// Unit being moved.
        unit: UnitId,
        /// Rejected destination.
        position: Position,
    },

    /// No behavior variant is registered for a unit-type key.
    #[error("Unit type '{key}' is not registered (known: {known:?})")]
    UnregisteredUnitType {
        /// Requested key.
        key: String,
        /// Registered keys, sorted.
        known: Vec<String>,
    },

    /// Unit configuration record (or one of its required fields) is missing.
    #[error("Missing configuration for '{key}'{}", .field.as_ref().map(|f| format!(": field '{f}'")).unwrap_or_default())]
    MissingConfiguration {
        /// Unit-type key.
        key: String,
        /// Missing field, `None` when the whole record is absent.
        field: Option<String>,
    },

    /// Unit configuration is present but breaks a stat constraint.
    #[error("Invalid configuration for '{key}': {reason}")]
    InvalidConfiguration {
        /// Unit-type key.
        key: String,
        /// Which constraint failed.
        reason: String,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the document that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid battle state. Raised when the turn loop finds a broken invariant.
    #[error("Invalid battle state: {0}")]
    InvalidState(String),
}
