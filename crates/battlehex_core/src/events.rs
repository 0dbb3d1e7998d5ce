//! Battle events and read-only snapshots.
//!
//! The battle loop reports everything that happens as [`BattleEvent`]s
//! handed to a [`BattleObserver`]. Presentation layers implement the
//! observer to draw the battle; [`EventLog`] simply records the events.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::unit::{Unit, UnitId, UnitVariant};

/// A participant as listed at the start of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Unit identifier.
    pub unit: UnitId,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub icon: String,
    /// Behavior archetype.
    pub variant: UnitVariant,
    /// Starting cell.
    pub position: Position,
    /// Starting health.
    pub health: u32,
}

impl From<&Unit> for RosterEntry {
    fn from(unit: &Unit) -> Self {
        Self {
            unit: unit.id(),
            name: unit.name().to_string(),
            icon: unit.icon().to_string(),
            variant: unit.variant(),
            position: unit.position(),
            health: unit.health(),
        }
    }
}

/// Health of one unit at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Unit identifier.
    pub unit: UnitId,
    /// Display name.
    pub name: String,
    /// Current health.
    pub current: u32,
    /// Health at creation.
    pub max: u32,
    /// Whether the unit is still alive.
    pub alive: bool,
}

impl From<&Unit> for HealthSnapshot {
    fn from(unit: &Unit) -> Self {
        Self {
            unit: unit.id(),
            name: unit.name().to_string(),
            current: unit.health(),
            max: unit.max_health(),
            alive: unit.is_alive(),
        }
    }
}

/// Battlefield occupancy and roster health at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// Occupant of each cell, in axis order.
    pub cells: Vec<Option<UnitId>>,
    /// Health of every roster unit, in roster order.
    pub units: Vec<HealthSnapshot>,
}

/// What a unit did with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Nothing: no enemies left, or no way to act.
    Idle,
    /// Attacked a target.
    Attack {
        /// Target unit.
        target: UnitId,
        /// Damage applied.
        damage: u32,
        /// Whether the hit was a ranged shot.
        ranged: bool,
        /// Whether the target died.
        killed: bool,
    },
    /// Moved to another cell.
    Move {
        /// Cell before the move.
        from: Position,
        /// Cell after the move.
        to: Position,
        /// Cells traversed.
        distance: u32,
    },
}

/// Something that happened during a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// The battle began with this roster.
    Started {
        /// Participants in join order.
        roster: Vec<RosterEntry>,
        /// Battlefield occupancy before the first round.
        snapshot: FieldSnapshot,
    },
    /// A round began. Turns are numbered from 1.
    TurnStarted {
        /// Round number.
        turn: u64,
    },
    /// A unit moved.
    Moved {
        /// Moving unit.
        unit: UnitId,
        /// Cell before the move.
        from: Position,
        /// Cell after the move.
        to: Position,
        /// Cells traversed.
        distance: u32,
    },
    /// A unit attacked another.
    Attacked {
        /// Attacker.
        unit: UnitId,
        /// Target.
        target: UnitId,
        /// Damage applied.
        damage: u32,
        /// Whether the hit was a ranged shot.
        ranged: bool,
    },
    /// A unit died.
    Died {
        /// Dead unit.
        unit: UnitId,
    },
    /// A round finished.
    TurnEnded {
        /// Round number.
        turn: u64,
        /// State after the round.
        snapshot: FieldSnapshot,
    },
    /// The battle is over.
    Finished {
        /// Last unit standing, `None` if the battle ended without one.
        winner: Option<UnitId>,
        /// Rounds played.
        turns: u64,
    },
}

/// Receives battle events as they happen.
pub trait BattleObserver {
    /// Called once per event, in order.
    fn on_event(&mut self, event: &BattleEvent);
}

/// Observer that records every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Consume the log, returning the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}

impl BattleObserver for EventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards every event to two observers.
impl<A: BattleObserver, B: BattleObserver> BattleObserver for (A, B) {
    fn on_event(&mut self, event: &BattleEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}

impl<T: BattleObserver + ?Sized> BattleObserver for &mut T {
    fn on_event(&mut self, event: &BattleEvent) {
        (**self).on_event(event);
    }
}
