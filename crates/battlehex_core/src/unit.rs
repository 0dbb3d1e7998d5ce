//! Units and their combat behavior.
//!
//! A [`Unit`] carries its stats, health and position plus a [`Behavior`]
//! tag selecting one of the closed set of attack rule variants:
//!
//! - [`Behavior::Melee`]: attacks anything within `range` (usually 1)
//! - [`Behavior::Ranged`]: shoots while it has ammo, and always falls back
//!   to a penalised strike against adjacent targets
//!
//! Units never keep a reference to the [`Battlefield`]; it is passed in
//! for the duration of each call that needs it.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battlefield::Battlefield;
use crate::combat::{apply_melee_penalty, roll_base_damage, scale_damage};
use crate::position::Position;

/// Unique identifier for a unit within one battle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct UnitId(u32);

impl UnitId {
    /// Create a unit ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Behavior archetype a unit-type key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitVariant {
    /// Close-combat unit.
    Infantry,
    /// Ranged unit with limited ammo.
    Shooter,
}

impl UnitVariant {
    /// Attack range used when the data record does not set one.
    #[must_use]
    pub const fn default_range(self) -> u32 {
        match self {
            Self::Infantry => 1,
            Self::Shooter => 10,
        }
    }

    /// Starting ammo used when the data record does not set one.
    #[must_use]
    pub const fn default_ammo(self) -> u32 {
        match self {
            Self::Infantry => 0,
            Self::Shooter => 5,
        }
    }

    /// Melee penalty used when the data record does not set one.
    #[must_use]
    pub const fn default_melee_penalty(self) -> f64 {
        match self {
            Self::Infantry => 1.0,
            Self::Shooter => 0.5,
        }
    }

    /// Display name of the variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Infantry => "Infantry",
            Self::Shooter => "Shooter",
        }
    }
}

/// Variant-specific attack rules and state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Attacks targets within range, no ammo.
    Melee,
    /// Shoots targets within range while ammo lasts.
    Ranged {
        /// Shots left.
        ammo: u32,
        /// Damage multiplier in `(0, 1]` for adjacent or out-of-ammo strikes.
        melee_penalty: f64,
    },
}

impl Behavior {
    /// The variant this behavior belongs to.
    #[must_use]
    pub const fn variant(&self) -> UnitVariant {
        match self {
            Self::Melee => UnitVariant::Infantry,
            Self::Ranged { .. } => UnitVariant::Shooter,
        }
    }
}

/// Combat statistics fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Health at creation.
    pub max_health: u32,
    /// Attack rating.
    pub attack: u32,
    /// Defense rating.
    pub defense: u32,
    /// Smallest damage roll.
    pub damage_min: u32,
    /// Largest damage roll.
    pub damage_max: u32,
    /// Cells traversable per turn.
    pub speed: u32,
    /// Maximum attack distance.
    pub range: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            max_health: 10,
            attack: 1,
            defense: 1,
            damage_min: 1,
            damage_max: 1,
            speed: 1,
            range: 1,
        }
    }
}

/// Result of a single [`Unit::attack`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Damage applied to the target (0 if no attack happened).
    pub damage: u32,
    /// Whether the hit was a ranged shot.
    pub ranged: bool,
    /// Whether the target died from this hit.
    pub killed: bool,
}

/// A combatant on the battlefield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    name: String,
    icon: String,
    stats: CombatStats,
    behavior: Behavior,
    health: u32,
    alive: bool,
    position: Position,
}

impl Unit {
    /// Create a unit at full health.
    ///
    /// The icon defaults to the first letter of the name.
    #[must_use]
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        stats: CombatStats,
        behavior: Behavior,
        position: Position,
    ) -> Self {
        let name = name.into();
        let icon = name
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().to_string());
        Self {
            id,
            name,
            icon,
            stats,
            behavior,
            health: stats.max_health,
            alive: stats.max_health > 0,
            position,
        }
    }

    /// Builder method to set the display glyph.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Unit identifier.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display glyph.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Combat statistics.
    #[must_use]
    pub const fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Variant rules and state.
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Behavior archetype.
    #[must_use]
    pub const fn variant(&self) -> UnitVariant {
        self.behavior.variant()
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health at creation.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    /// False once the unit has died.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current cell.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Cells traversable per turn.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.stats.speed
    }

    /// Maximum attack distance.
    #[must_use]
    pub const fn range(&self) -> u32 {
        self.stats.range
    }

    /// Shots left, `None` for melee units.
    #[must_use]
    pub const fn ammo(&self) -> Option<u32> {
        match self.behavior {
            Behavior::Melee => None,
            Behavior::Ranged { ammo, .. } => Some(ammo),
        }
    }

    /// Whether this unit can attack `target` from where it stands.
    #[must_use]
    pub fn can_attack(&self, target: &Unit) -> bool {
        self.can_attack_from(target, self.position)
    }

    /// Whether this unit could attack `target` if it stood at `from`.
    #[must_use]
    pub fn can_attack_from(&self, target: &Unit, from: Position) -> bool {
        if !self.alive || !target.alive {
            return false;
        }

        let distance = from.distance(target.position);
        match self.behavior {
            Behavior::Melee => distance <= self.stats.range,
            Behavior::Ranged { ammo, .. } => {
                distance <= 1 || (distance <= self.stats.range && ammo > 0)
            }
        }
    }

    /// Attack `target`, rolling damage from `rng`.
    ///
    /// Does nothing and reports zero damage if [`can_attack`](Self::can_attack)
    /// fails. A ranged unit striking an adjacent target, or out of ammo,
    /// applies its melee penalty and keeps its ammo; a ranged shot spends
    /// one round of ammo. A lethal hit removes the target from `battlefield`.
    pub fn attack<R: Rng + ?Sized>(
        &mut self,
        target: &mut Unit,
        battlefield: &mut Battlefield,
        rng: &mut R,
    ) -> AttackOutcome {
        if !self.can_attack(target) {
            return AttackOutcome::default();
        }

        let base = roll_base_damage(rng, self.stats.damage_min, self.stats.damage_max);
        let mut damage = scale_damage(base, self.stats.attack, target.stats.defense);
        let mut ranged = false;

        if let Behavior::Ranged {
            ammo,
            melee_penalty,
        } = &mut self.behavior
        {
            let distance = self.position.distance(target.position);
            if distance <= 1 || *ammo == 0 {
                damage = apply_melee_penalty(damage, *melee_penalty);
            } else {
                *ammo -= 1;
                ranged = true;
            }
        }

        let killed = target.receive_damage(damage, battlefield);
        AttackOutcome {
            damage,
            ranged,
            killed,
        }
    }

    /// Subtract `damage` from health, dying if it reaches zero.
    ///
    /// Returns true if this hit killed the unit. Dead units ignore damage.
    pub fn receive_damage(&mut self, damage: u32, battlefield: &mut Battlefield) -> bool {
        if !self.alive {
            return false;
        }

        if damage >= self.health {
            self.health = 0;
            self.alive = false;
            battlefield.remove(self.id);
            tracing::debug!(unit = %self.id, name = %self.name, "Unit died");
            return true;
        }

        self.health -= damage;
        false
    }

    /// First reachable free cell from which this unit could attack `target`.
    ///
    /// Candidates are searched outward from the target, one distance at a
    /// time from 1 to `range`, trying the cell below the target before the
    /// one above it.
    #[must_use]
    pub fn find_attack_position(
        &self,
        target: &Unit,
        battlefield: &Battlefield,
    ) -> Option<Position> {
        // Cells farther than the field is long are never in bounds.
        let reach = self.stats.range.min(battlefield.size() as u32);
        let range = i32::try_from(reach).unwrap_or(i32::MAX);

        (1..=range)
            .flat_map(|distance| [-1, 1].map(|direction| target.position + distance * direction))
            .find(|&candidate| {
                battlefield.is_position_available(candidate)
                    && self.can_attack_from(target, candidate)
                    && candidate.distance(self.position) <= self.stats.speed
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn melee(id: u32, x: i32) -> Unit {
        Unit::new(
            UnitId::new(id),
            "Pikeman",
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
    }

    fn ranged(id: u32, x: i32, ammo: u32) -> Unit {
        Unit::new(
            UnitId::new(id),
            "Archer",
            CombatStats {
                max_health: 8,
                attack: 3,
                defense: 1,
                damage_min: 10,
                damage_max: 10,
                speed: 1,
                range: 3,
            },
            Behavior::Ranged {
                ammo,
                melee_penalty: 0.6,
            },
            Position::new(x),
        )
    }

    fn field_with(units: &[&Unit]) -> Battlefield {
        let mut field = Battlefield::new(20);
        for unit in units {
            field.add(unit).unwrap();
        }
        field
    }

    #[test]
    fn test_new_unit_full_health() {
        let unit = melee(1, 0);
        assert_eq!(unit.health(), 10);
        assert_eq!(unit.max_health(), 10);
        assert!(unit.is_alive());
        assert_eq!(unit.icon(), "P");
        assert_eq!(unit.variant(), UnitVariant::Infantry);
    }

    #[test]
    fn test_melee_can_attack_within_range() {
        let a = melee(1, 5);
        assert!(a.can_attack(&melee(2, 6)));
        assert!(a.can_attack(&melee(2, 4)));
        assert!(!a.can_attack(&melee(2, 7)));
    }

    #[test]
    fn test_ranged_can_attack_rules() {
        let target = melee(2, 10);
        assert!(ranged(1, 7, 3).can_attack(&target));
        assert!(!ranged(1, 6, 3).can_attack(&target));
        // Out of ammo: only adjacent strikes remain
        assert!(!ranged(1, 7, 0).can_attack(&target));
        assert!(ranged(1, 9, 0).can_attack(&target));
    }

    #[test]
    fn test_ranged_shot_spends_ammo() {
        let mut archer = ranged(1, 0, 2);
        let mut target = Unit::new(
            UnitId::new(2),
            "Dummy",
            CombatStats {
                max_health: 100,
                attack: 3,
                defense: 3,
                ..CombatStats::default()
            },
            Behavior::Melee,
            Position::new(3),
        );
        let mut field = field_with(&[&archer, &target]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = archer.attack(&mut target, &mut field, &mut rng);
        assert_eq!(
            outcome,
            AttackOutcome {
                damage: 10,
                ranged: true,
                killed: false
            }
        );
        assert_eq!(archer.ammo(), Some(1));
        assert_eq!(target.health(), 90);
    }

    #[test]
    fn test_adjacent_ranged_strike_is_penalised() {
        let mut archer = ranged(1, 4, 2);
        let mut target = Unit::new(
            UnitId::new(2),
            "Dummy",
            CombatStats {
                max_health: 100,
                attack: 3,
                defense: 3,
                ..CombatStats::default()
            },
            Behavior::Melee,
            Position::new(5),
        );
        let mut field = field_with(&[&archer, &target]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = archer.attack(&mut target, &mut field, &mut rng);
        assert_eq!(outcome.damage, 6);
        assert!(!outcome.ranged);
        assert_eq!(archer.ammo(), Some(2));
    }

    #[test]
    fn test_lethal_attack_kills_and_removes() {
        let mut archer = ranged(1, 0, 5);
        let mut target = melee(2, 2);
        let mut field = field_with(&[&archer, &target]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // 10 * 1.05 = 10.5 -> 10 each shot against 10 health
        let outcome = archer.attack(&mut target, &mut field, &mut rng);
        assert!(outcome.killed);
        assert_eq!(target.health(), 0);
        assert!(!target.is_alive());
        assert!(!field.contains(target.id()));
        assert_eq!(field.unit_at(Position::new(2)), None);

        // Dead targets can no longer be attacked
        assert!(!archer.can_attack(&target));
        let again = archer.attack(&mut target, &mut field, &mut rng);
        assert_eq!(again, AttackOutcome::default());
        assert_eq!(archer.ammo(), Some(4));
    }

    #[test]
    fn test_attack_out_of_range_is_noop() {
        let mut a = melee(1, 0);
        let mut b = melee(2, 5);
        let mut field = field_with(&[&a, &b]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        assert_eq!(a.attack(&mut b, &mut field, &mut rng).damage, 0);
        assert_eq!(b.health(), 10);
    }

    #[test]
    fn test_find_attack_position_prefers_lower_side() {
        let hunter = melee(1, 5);
        let target = melee(2, 7);
        let field = field_with(&[&hunter, &target]);

        // Cells 6 and 8 are both one away from the target; 6 comes first.
        assert_eq!(
            hunter.find_attack_position(&target, &field),
            Some(Position::new(6))
        );
    }

    #[test]
    fn test_find_attack_position_skips_occupied() {
        let hunter = melee(1, 9);
        let target = melee(2, 7);
        let blocker = melee(3, 6);
        let field = field_with(&[&hunter, &target, &blocker]);

        assert_eq!(
            hunter.find_attack_position(&target, &field),
            Some(Position::new(8))
        );
    }

    #[test]
    fn test_find_attack_position_unreachable() {
        // range 3, speed 1, five cells away: nearest firing cell is two steps off
        let archer = ranged(1, 0, 5);
        let target = melee(2, 5);
        let field = field_with(&[&archer, &target]);

        assert_eq!(archer.find_attack_position(&target, &field), None);
    }

    #[test]
    fn test_find_attack_position_ranged_out_of_ammo_needs_adjacency() {
        let mut archer = ranged(1, 3, 0);
        archer.stats.speed = 3;
        let target = melee(2, 6);
        let field = field_with(&[&archer, &target]);

        assert_eq!(
            archer.find_attack_position(&target, &field),
            Some(Position::new(5))
        );
    }
}
