//! Damage model.
//!
//! This module implements the attack/defense damage formula:
//! - Base damage rolled uniformly from `[damage_min, damage_max]`
//! - Each point of attack/defense skew scales damage by 5%
//! - Skew stops counting after 20 points
//! - Every hit deals at least [`MIN_DAMAGE`]

use rand::Rng;

/// Minimum damage floor - attacks always deal at least 1 damage.
pub const MIN_DAMAGE: u32 = 1;

/// Skew points beyond this count are ignored.
pub const MAX_SKEW: u32 = 20;

/// Damage scaling per point of attack/defense skew.
pub const SKEW_STEP: f64 = 0.05;

/// Roll base damage uniformly from the inclusive range `[min, max]`.
///
/// A reversed range collapses to `min`.
pub fn roll_base_damage<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Multiplier applied for an attacker/defender rating pair.
///
/// ```text
/// diff       = attack - defense
/// multiplier = (1 + 0.05 * sign(diff)) ^ min(|diff|, 20)
/// ```
#[must_use]
pub fn skew_multiplier(attack: u32, defense: u32) -> f64 {
    let diff = i64::from(attack) - i64::from(defense);
    let steps = diff.unsigned_abs().min(u64::from(MAX_SKEW)) as i32;
    let base = 1.0 + SKEW_STEP * diff.signum() as f64;
    base.powi(steps)
}

/// Scale a rolled damage value by the attack/defense skew.
///
/// The result is floored and never drops below [`MIN_DAMAGE`].
#[must_use]
pub fn scale_damage(base: u32, attack: u32, defense: u32) -> u32 {
    floor_damage(f64::from(base) * skew_multiplier(attack, defense))
}

/// Apply a melee penalty multiplier to already scaled damage.
#[must_use]
pub fn apply_melee_penalty(damage: u32, penalty: f64) -> u32 {
    floor_damage(f64::from(damage) * penalty)
}

fn floor_damage(value: f64) -> u32 {
    // `as` saturates: NaN and negatives become 0.
    (value.floor() as u32).max(MIN_DAMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_no_skew_keeps_base() {
        assert_eq!(skew_multiplier(5, 5), 1.0);
        assert_eq!(scale_damage(7, 5, 5), 7);
    }

    #[test]
    fn test_positive_skew() {
        // 10 * 1.05^3 = 11.576...
        assert_eq!(scale_damage(10, 8, 5), 11);
        // 4 * 1.05^3 = 4.63
        assert_eq!(scale_damage(4, 5, 2), 4);
    }

    #[test]
    fn test_negative_skew() {
        // 10 * 0.95^4 = 8.145...
        assert_eq!(scale_damage(10, 1, 5), 8);
    }

    #[test]
    fn test_skew_clamped_at_max() {
        assert_eq!(skew_multiplier(100, 0), skew_multiplier(20, 0));
        assert_eq!(skew_multiplier(0, 500), skew_multiplier(0, 20));
        // 10 * 1.05^20 = 26.53
        assert_eq!(scale_damage(10, 60, 0), 26);
    }

    #[test]
    fn test_damage_floor() {
        assert_eq!(scale_damage(0, 5, 5), MIN_DAMAGE);
        assert_eq!(scale_damage(1, 0, 1000), MIN_DAMAGE);
        assert_eq!(apply_melee_penalty(1, 0.1), MIN_DAMAGE);
    }

    #[test]
    fn test_melee_penalty() {
        assert_eq!(apply_melee_penalty(10, 0.6), 6);
        assert_eq!(apply_melee_penalty(7, 0.5), 3);
        assert_eq!(apply_melee_penalty(9, 1.0), 9);
    }

    #[test]
    fn test_roll_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let roll = roll_base_damage(&mut rng, 2, 4);
            assert!((2..=4).contains(&roll));
        }
        assert_eq!(roll_base_damage(&mut rng, 3, 3), 3);
    }
}
