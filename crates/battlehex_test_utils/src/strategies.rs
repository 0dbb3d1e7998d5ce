//! Proptest strategies for battle properties.
//!
//! These strategies generate random but reproducible inputs for
//! property-based testing of the battlefield and combat rules.

use battlehex_core::battlefield::Battlefield;
use battlehex_core::position::Position;
use battlehex_core::unit::{Behavior, CombatStats, Unit, UnitId};
use proptest::prelude::*;

/// One random operation against a battlefield.
#[derive(Debug, Clone)]
pub enum FieldOp {
    /// Add unit `id` at `x`.
    Add {
        /// Unit id.
        id: u32,
        /// Target cell, possibly out of bounds.
        x: i32,
    },
    /// Remove unit `id`.
    Remove {
        /// Unit id.
        id: u32,
    },
    /// Move unit `id` to `x`.
    Move {
        /// Unit id.
        id: u32,
        /// Destination, possibly out of bounds.
        x: i32,
    },
}

/// Generate a battlefield size (1-40).
pub fn arb_field_size() -> impl Strategy<Value = usize> {
    1usize..40
}

/// Generate a cell coordinate, a few cells past either edge of `size`.
pub fn arb_cell(size: usize) -> impl Strategy<Value = i32> {
    let size = i32::try_from(size).unwrap_or(i32::MAX);
    -3..size.saturating_add(3)
}

/// Generate one battlefield operation over a pool of `max_units` ids.
pub fn arb_field_op(size: usize, max_units: u32) -> impl Strategy<Value = FieldOp> {
    prop_oneof![
        (1..=max_units, arb_cell(size)).prop_map(|(id, x)| FieldOp::Add { id, x }),
        (1..=max_units).prop_map(|id| FieldOp::Remove { id }),
        (1..=max_units, arb_cell(size)).prop_map(|(id, x)| FieldOp::Move { id, x }),
    ]
}

/// Generate a field size with a sequence of operations against it.
pub fn arb_field_script(max_len: usize) -> impl Strategy<Value = (usize, Vec<FieldOp>)> {
    arb_field_size().prop_flat_map(move |size| {
        (
            Just(size),
            proptest::collection::vec(arb_field_op(size, 6), 0..max_len),
        )
    })
}

/// Generate combat stats with a valid damage range.
pub fn arb_stats() -> impl Strategy<Value = CombatStats> {
    (
        1u32..50,
        0u32..100,
        0u32..100,
        1u32..10,
        0u32..10,
        1u32..5,
        1u32..12,
    )
        .prop_map(
            |(max_health, attack, defense, damage_min, spread, speed, range)| CombatStats {
                max_health,
                attack,
                defense,
                damage_min,
                damage_max: damage_min + spread,
                speed,
                range,
            },
        )
}

/// Generate a melee or ranged behavior.
pub fn arb_behavior() -> impl Strategy<Value = Behavior> {
    prop_oneof![
        Just(Behavior::Melee),
        (0u32..6, 1u32..=10).prop_map(|(ammo, tenths)| Behavior::Ranged {
            ammo,
            melee_penalty: f64::from(tenths) / 10.0,
        }),
    ]
}

/// Generate a roster of up to `max_units` units on distinct cells of a
/// field of `size`.
pub fn arb_roster(size: usize, max_units: usize) -> impl Strategy<Value = Vec<Unit>> {
    let cells: Vec<i32> = (0..i32::try_from(size).unwrap_or(i32::MAX)).collect();
    let max_units = max_units.min(size).max(1);
    (
        proptest::sample::subsequence(cells, 1..=max_units).prop_shuffle(),
        proptest::collection::vec((arb_stats(), arb_behavior()), max_units),
    )
        .prop_map(|(cells, specs)| {
            cells
                .into_iter()
                .zip(specs)
                .enumerate()
                .map(|(i, (x, (stats, behavior)))| {
                    let id = u32::try_from(i + 1).unwrap_or(u32::MAX);
                    Unit::new(
                        UnitId::new(id),
                        format!("unit-{id}"),
                        stats,
                        behavior,
                        Position::new(x),
                    )
                })
                .collect()
        })
}

/// Apply `op` to `field`, keeping `units` positions in sync. Errors are
/// ignored; the battlefield is expected to reject bad operations cleanly.
pub fn apply_field_op(field: &mut Battlefield, units: &mut Vec<Unit>, op: &FieldOp) {
    match *op {
        FieldOp::Add { id, x } => {
            let unit = Unit::new(
                UnitId::new(id),
                format!("unit-{id}"),
                CombatStats::default(),
                Behavior::Melee,
                Position::new(x),
            );
            if field.add(&unit).is_ok() && !units.iter().any(|u| u.id() == unit.id()) {
                units.push(unit);
            }
        }
        FieldOp::Remove { id } => {
            field.remove(UnitId::new(id));
            units.retain(|u| u.id() != UnitId::new(id));
        }
        FieldOp::Move { id, x } => {
            if let Some(unit) = units.iter_mut().find(|u| u.id() == UnitId::new(id)) {
                let _ = field.move_unit(unit, Position::new(x));
            }
        }
    }
}
