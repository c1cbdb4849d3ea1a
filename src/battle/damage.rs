//! Damage calculation
//!
//! `damage = max(1, floor(AT * (1 + atk_bonus) * r - DF * (1 + def_bonus)))`
//! with r drawn uniformly from [0.9, 1.1]. Bonuses come from undestroyed
//! buff units on each side's own field; an undestroyed Giant Airship
//! doubles its side's summed bonus, once, regardless of count.

use rand::Rng;

use crate::grid::Field;
use crate::units::{UnitEffect, UnitKind};

pub const VARIANCE_MIN: f32 = 0.9;
pub const VARIANCE_MAX: f32 = 1.1;

/// Summed attack bonus from the attacker's own field
pub fn attack_bonus(field: &Field) -> f32 {
    let base: f32 = field
        .placed_units
        .iter()
        .filter(|u| !u.is_destroyed)
        .filter_map(|u| match u.kind.effect() {
            Some(UnitEffect::AttackBoost(b)) => Some(b),
            _ => None,
        })
        .sum();
    apply_amplifier(field, base)
}

/// Summed defense bonus from the defender's own field
pub fn defense_bonus(field: &Field) -> f32 {
    let base: f32 = field
        .placed_units
        .iter()
        .filter(|u| !u.is_destroyed)
        .filter_map(|u| match u.kind.effect() {
            Some(UnitEffect::DefenseBoost(b)) => Some(b),
            _ => None,
        })
        .sum();
    apply_amplifier(field, base)
}

fn apply_amplifier(field: &Field, bonus: f32) -> f32 {
    if field.has_active(UnitKind::GiantAirship) {
        bonus * 2.0
    } else {
        bonus
    }
}

/// Damage for one hit, with an explicit variance factor
pub fn calculate_damage(at: u32, atk_bonus: f32, df: u32, def_bonus: f32, r: f32) -> u32 {
    let raw = at as f32 * (1.0 + atk_bonus) * r - df as f32 * (1.0 + def_bonus);
    (raw.floor() as i64).max(1) as u32
}

/// Damage for one hit, drawing the variance factor from `rng`
pub fn roll_damage<R: Rng>(
    rng: &mut R,
    at: u32,
    atk_bonus: f32,
    df: u32,
    def_bonus: f32,
) -> u32 {
    let r = rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX);
    calculate_damage(at, atk_bonus, df, def_bonus, r)
}
