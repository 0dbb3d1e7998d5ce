//! Property tests for battlefield bookkeeping, damage and battles.

use battlehex_core::battle::{BattleConfig, BattleManager};
use battlehex_core::battlefield::Battlefield;
use battlehex_core::combat::{apply_melee_penalty, scale_damage, MIN_DAMAGE};
use battlehex_core::events::EventLog;
use battlehex_core::position::Position;
use battlehex_core::unit::{Behavior, CombatStats, Unit, UnitId};
use battlehex_test_utils::fixtures::seeded_rng;
use battlehex_test_utils::strategies::{
    apply_field_op, arb_cell, arb_field_script, arb_field_size, arb_roster,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn battlefield_stays_consistent((size, ops) in arb_field_script(60)) {
        let mut field = Battlefield::new(size);
        let mut units = Vec::new();

        for op in &ops {
            apply_field_op(&mut field, &mut units, op);
            prop_assert!(field.check_invariants().is_ok());
        }

        prop_assert_eq!(field.unit_count(), units.len());
        for unit in &units {
            prop_assert_eq!(field.position_of(unit.id()), Some(unit.position()));
            prop_assert_eq!(field.unit_at(unit.position()), Some(unit.id()));
        }
    }

    #[test]
    fn availability_means_in_bounds_and_empty(
        (size, ops, x) in arb_field_script(30)
            .prop_flat_map(|(size, ops)| (Just(size), Just(ops), arb_cell(size)))
    ) {
        let mut field = Battlefield::new(size);
        let mut units = Vec::new();
        for op in &ops {
            apply_field_op(&mut field, &mut units, op);
        }

        let cell = Position::new(x);
        let expected = field.in_bounds(cell) && field.unit_at(cell).is_none();
        prop_assert_eq!(field.is_position_available(cell), expected);
    }

    #[test]
    fn move_then_move_back_restores_field(size in arb_field_size(), a in 0i32..40, b in 0i32..40) {
        let size_i = i32::try_from(size).unwrap();
        prop_assume!(a < size_i && b < size_i && a != b);

        let mut field = Battlefield::new(size);
        let mut unit = Unit::new(UnitId::new(1), "Mover", CombatStats::default(), Behavior::Melee, Position::new(a));
        field.add(&unit).unwrap();
        let before = field.clone();

        let there = field.move_unit(&mut unit, Position::new(b)).unwrap();
        let back = field.move_unit(&mut unit, Position::new(a)).unwrap();

        prop_assert_eq!(there, back);
        prop_assert_eq!(there, a.abs_diff(b));
        prop_assert_eq!(field, before);
    }

    #[test]
    fn damage_never_drops_below_floor(base in 0u32..1000, attack in any::<u32>(), defense in any::<u32>()) {
        prop_assert!(scale_damage(base, attack, defense) >= MIN_DAMAGE);
    }

    #[test]
    fn skew_is_capped(base in 1u32..200, attack in 0u32..1000, defense in 0u32..1000) {
        let damage = f64::from(scale_damage(base, attack, defense));
        prop_assert!(damage <= f64::from(base) * 1.05_f64.powi(20) + 1.0);
        prop_assert!(damage + 1.0 >= f64::from(base) * 0.95_f64.powi(20));
    }

    #[test]
    fn melee_penalty_never_raises_damage(damage in 1u32..500, tenths in 1u32..=10) {
        let penalised = apply_melee_penalty(damage, f64::from(tenths) / 10.0);
        prop_assert!(penalised <= damage);
        prop_assert!(penalised >= MIN_DAMAGE);
    }

    #[test]
    fn death_is_permanent(health in 1u32..100, hits in proptest::collection::vec(1u32..200, 1..10)) {
        let mut field = Battlefield::new(3);
        let stats = CombatStats { max_health: health, ..CombatStats::default() };
        let mut unit = Unit::new(UnitId::new(1), "Target", stats, Behavior::Melee, Position::new(1));
        field.add(&unit).unwrap();

        let mut deaths = 0;
        for hit in hits {
            if unit.receive_damage(hit, &mut field) {
                deaths += 1;
            }
            prop_assert_eq!(unit.is_alive(), unit.health() > 0);
            prop_assert_eq!(unit.is_alive(), field.contains(unit.id()));
        }
        prop_assert!(deaths <= 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_battles_end_cleanly(
        (size, roster, seed) in (2usize..20)
            .prop_flat_map(|size| (Just(size), arb_roster(size, 5), any::<u64>()))
    ) {
        let config = BattleConfig { max_turns: 5_000 };
        let mut battle = BattleManager::with_config(Battlefield::new(size), config);
        let mut rng = seeded_rng(seed);
        let mut log = EventLog::new();

        let winner = battle.run_with_observer(roster, &mut rng, &mut log).unwrap();

        prop_assert!(battle.is_over());
        prop_assert!(battle.battlefield().check_invariants().is_ok());
        for unit in battle.units() {
            prop_assert_eq!(unit.is_alive(), battle.battlefield().contains(unit.id()));
        }
        if let Some(id) = winner {
            let alive: Vec<_> = battle.alive_units().map(Unit::id).collect();
            prop_assert_eq!(alive, vec![id]);
        }
    }
}
