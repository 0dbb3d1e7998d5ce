//! Unit data structures for data-driven unit definitions.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::unit::{Behavior, CombatStats, UnitVariant};

/// Data-driven unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     name: "Archer",
///     type: "shooter",
///     health: 8,
///     attack: 3,
///     defense: 1,
///     damage_min: 1,
///     damage_max: 3,
///     speed: 2,
///     icon: "A",
///     range: Some(10),
///     ammo: Some(5),
///     melee_penalty: Some(0.6),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    /// Display name.
    pub name: String,

    /// Free-form category label (e.g. "infantry").
    #[serde(rename = "type")]
    pub unit_type: String,

    /// Maximum health points.
    pub health: u32,

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

    /// Display glyph on the battlefield.
    pub icon: String,

    /// Attack range; defaults per variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,

    /// Starting ammo; defaults per variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo: Option<u32>,

    /// Melee damage multiplier for ranged units; defaults per variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub melee_penalty: Option<f64>,
}

impl UnitData {
    /// Combat stats with per-variant defaults filled in.
    #[must_use]
    pub fn stats_for(&self, variant: UnitVariant) -> CombatStats {
        CombatStats {
            max_health: self.health,
            attack: self.attack,
            defense: self.defense,
            damage_min: self.damage_min,
            damage_max: self.damage_max,
            speed: self.speed,
            range: self.range.unwrap_or_else(|| variant.default_range()),
        }
    }

    /// Starting behavior state for `variant`.
    #[must_use]
    pub fn behavior_for(&self, variant: UnitVariant) -> Behavior {
        match variant {
            UnitVariant::Infantry => Behavior::Melee,
            UnitVariant::Shooter => Behavior::Ranged {
                ammo: self.ammo.unwrap_or_else(|| variant.default_ammo()),
                melee_penalty: self
                    .melee_penalty
                    .unwrap_or_else(|| variant.default_melee_penalty()),
            },
        }
    }

    /// Check stat constraints for this record resolved as `variant`.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfiguration`] naming the first broken constraint.
    pub fn validate(&self, key: &str, variant: UnitVariant) -> Result<()> {
        let invalid = |reason: String| GameError::InvalidConfiguration {
            key: key.to_string(),
            reason,
        };

        let stats = self.stats_for(variant);
        if stats.max_health == 0 {
            return Err(invalid("health must be positive".into()));
        }
        if stats.damage_min > stats.damage_max {
            return Err(invalid(format!(
                "damage_min {} exceeds damage_max {}",
                stats.damage_min, stats.damage_max
            )));
        }
        if stats.speed == 0 {
            return Err(invalid("speed must be positive".into()));
        }
        if stats.range == 0 {
            return Err(invalid("range must be at least 1".into()));
        }
        if let Behavior::Ranged { melee_penalty, .. } = self.behavior_for(variant) {
            if !(melee_penalty > 0.0 && melee_penalty <= 1.0) {
                return Err(invalid(format!(
                    "melee_penalty {melee_penalty} outside (0, 1]"
                )));
            }
        }
        Ok(())
    }
}
