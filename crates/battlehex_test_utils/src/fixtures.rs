//! Test fixtures and helpers.
//!
//! Pre-built units, data documents and RNGs for consistent testing.

use battlehex_core::battle::BattleManager;
use battlehex_core::battlefield::Battlefield;
use battlehex_core::data::GameData;
use battlehex_core::position::Position;
use battlehex_core::registry::{UnitFactory, VariantRegistry};
use battlehex_core::unit::{Behavior, CombatStats, Unit, UnitId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Field size of the stock two-unit scenario.
pub const STANDARD_FIELD_SIZE: usize = 23;

/// Unit records matching the bundled data file.
pub const SAMPLE_GAME_DATA: &str = r#"
GameData(
    field: FieldData(empty_icon: "_"),
    units: {
        "pikeman": UnitData(
            name: "Pikeman",
            type: "infantry",
            health: 10,
            attack: 5,
            defense: 2,
            damage_min: 2,
            damage_max: 4,
            speed: 2,
            icon: "P",
        ),
        "archer": UnitData(
            name: "Archer",
            type: "shooter",
            health: 8,
            attack: 3,
            defense: 1,
            damage_min: 1,
            damage_max: 3,
            speed: 2,
            icon: "A",
            range: Some(10),
            ammo: Some(5),
            melee_penalty: Some(0.6),
        ),
    },
)
"#;

/// Seeded RNG used by every deterministic test.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Parsed [`SAMPLE_GAME_DATA`].
///
/// # Panics
///
/// Panics if the sample document stops parsing.
#[must_use]
pub fn sample_game_data() -> GameData {
    GameData::from_ron_str(SAMPLE_GAME_DATA, "fixtures").expect("sample data parses")
}

/// Melee unit with pikeman-like stats.
#[must_use]
pub fn melee(id: u32, x: i32) -> Unit {
    Unit::new(
        UnitId::new(id),
        format!("Pikeman {id}"),
        CombatStats {
            max_health: 10,
            attack: 5,
            defense: 2,
            damage_min: 2,
            damage_max: 4,
            speed: 2,
            range: 1,
        },
        Behavior::Melee,
        Position::new(x),
    )
    .with_icon("P")
}

/// Ranged unit with archer-like stats and the given ammo.
#[must_use]
pub fn ranged(id: u32, x: i32, ammo: u32) -> Unit {
    Unit::new(
        UnitId::new(id),
        format!("Archer {id}"),
        CombatStats {
            max_health: 8,
            attack: 3,
            defense: 1,
            damage_min: 1,
            damage_max: 3,
            speed: 2,
            range: 10,
        },
        Behavior::Ranged {
            ammo,
            melee_penalty: 0.6,
        },
        Position::new(x),
    )
    .with_icon("A")
}

/// Stock duel: pikeman at cell 0, archer at cell 22, on a 23-cell field.
///
/// # Panics
///
/// Panics if the sample data or placement stops working.
#[must_use]
pub fn standard_duel() -> BattleManager {
    let data = sample_game_data();
    let registry = VariantRegistry::with_defaults();
    let mut factory = UnitFactory::new(&data, &registry);

    let mut battle = BattleManager::new(Battlefield::new(STANDARD_FIELD_SIZE));
    for (key, x) in [("pikeman", 0), ("archer", 22)] {
        let unit = factory
            .create(key, Position::new(x))
            .expect("stock unit builds");
        battle.add_unit(unit).expect("stock placement is valid");
    }
    battle
}
