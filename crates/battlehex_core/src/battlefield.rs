//! Linear battlefield grid and occupancy tracking.
//!
//! The battlefield owns two views of the same fact: an ordered list of
//! cells (occupant or empty) and a map from unit to its cell. Every
//! mutation goes through [`Battlefield::add`], [`Battlefield::remove`] or
//! [`Battlefield::move_unit`], which keep both views in agreement.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::position::Position;
use crate::unit::{Unit, UnitId};

/// Fixed-size line of cells, each holding at most one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battlefield {
    /// Occupant of each cell, indexed by `Position::x`.
    cells: Vec<Option<UnitId>>,
    /// Current cell of every unit on the field.
    positions: HashMap<UnitId, Position>,
}

impl Battlefield {
    /// Create an empty battlefield with `size` cells.
    #[must_use]
    pub fn new(size: usize) -> Self {
        tracing::debug!(size, "Battlefield created");
        Self {
            cells: vec![None; size],
            positions: HashMap::new(),
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Occupancy of every cell, in axis order.
    #[must_use]
    pub fn cells(&self) -> &[Option<UnitId>] {
        &self.cells
    }

    /// Whether `position` lies inside `[0, size)`.
    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    fn index(&self, position: Position) -> Option<usize> {
        usize::try_from(position.x)
            .ok()
            .filter(|&i| i < self.cells.len())
    }

    /// True iff `position` is in bounds and unoccupied.
    #[must_use]
    pub fn is_position_available(&self, position: Position) -> bool {
        self.index(position)
            .is_some_and(|i| self.cells[i].is_none())
    }

    /// Occupant of `position`. Out-of-bounds queries return `None`.
    #[must_use]
    pub fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.index(position).and_then(|i| self.cells[i])
    }

    /// Current cell of `unit`, if it is on the field.
    #[must_use]
    pub fn position_of(&self, unit: UnitId) -> Option<Position> {
        self.positions.get(&unit).copied()
    }

    /// Whether `unit` is currently on the field.
    #[must_use]
    pub fn contains(&self, unit: UnitId) -> bool {
        self.positions.contains_key(&unit)
    }

    /// Number of units on the field.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.positions.len()
    }

    /// Cells between two positions.
    #[must_use]
    pub fn distance(a: Position, b: Position) -> u32 {
        a.distance(b)
    }

    /// Place `unit` at its own position.
    ///
    /// Adding a unit that is already on the field is a no-op.
    ///
    /// # Errors
    ///
    /// [`GameError::OutOfBounds`] if the position is outside the field,
    /// [`GameError::OccupiedCell`] if another unit holds the cell,
    /// [`GameError::DeadUnit`] if the unit is not alive.
    pub fn add(&mut self, unit: &Unit) -> Result<()> {
        if self.contains(unit.id()) {
            tracing::warn!(unit = %unit.id(), "Unit is already on the battlefield");
            return Ok(());
        }
        if !unit.is_alive() {
            return Err(GameError::DeadUnit(unit.id()));
        }

        let position = unit.position();
        let index = self.index(position).ok_or(GameError::OutOfBounds {
            position,
            size: self.size(),
        })?;

        if self.cells[index].is_some() {
            return Err(GameError::OccupiedCell(position));
        }

        self.cells[index] = Some(unit.id());
        self.positions.insert(unit.id(), position);
        tracing::debug!(unit = %unit.id(), %position, "Unit placed");
        Ok(())
    }

    /// Take `unit` off the field. Returns the cell it occupied.
    ///
    /// Removing a unit that is not on the field is a no-op.
    pub fn remove(&mut self, unit: UnitId) -> Option<Position> {
        let position = self.positions.remove(&unit)?;
        if let Some(i) = self.index(position) {
            self.cells[i] = None;
        }
        tracing::debug!(%unit, %position, "Unit removed");
        Some(position)
    }

    /// Move `unit` to `destination`, updating its stored position.
    ///
    /// Returns the number of cells traversed.
    ///
    /// # Errors
    ///
    /// [`GameError::UnitNotOnField`] if the unit is absent,
    /// [`GameError::InvalidDestination`] if the destination is out of
    /// bounds or occupied.
    pub fn move_unit(&mut self, unit: &mut Unit, destination: Position) -> Result<u32> {
        let id = unit.id();
        let origin = self.position_of(id).ok_or(GameError::UnitNotOnField(id))?;

        let target = self
            .index(destination)
            .filter(|&i| self.cells[i].is_none())
            .ok_or(GameError::InvalidDestination {
                unit: id,
                position: destination,
            })?;

        if let Some(i) = self.index(origin) {
            self.cells[i] = None;
        }
        self.cells[target] = Some(id);
        self.positions.insert(id, destination);
        unit.set_position(destination);

        tracing::debug!(unit = %id, from = %origin, to = %destination, "Unit moved");
        Ok(origin.distance(destination))
    }

    /// Check that the cell list and the position map agree.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] describing the first disagreement found.
    pub fn check_invariants(&self) -> Result<()> {
        for (&unit, &position) in &self.positions {
            match self.index(position) {
                Some(i) if self.cells[i] == Some(unit) => {}
                _ => {
                    return Err(GameError::InvalidState(format!(
                        "unit {unit} mapped to {position} but the cell disagrees"
                    )));
                }
            }
        }

        let occupied = self.cells.iter().filter(|c| c.is_some()).count();
        if occupied != self.positions.len() {
            return Err(GameError::InvalidState(format!(
                "{occupied} occupied cells but {} tracked units",
                self.positions.len()
            )));
        }

        Ok(())
    }
}
