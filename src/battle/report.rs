//! Post-battle summary and rewards

use serde::{Deserialize, Serialize};

use crate::battle::state::{AttackOutcome, BattleState};
use crate::battle::victory::{VictoryReason, VictoryResult};
use crate::core::types::Side;
use crate::units::{Enemy, UnitEffect, UnitKind};

/// Exp granted per cell of a destroyed enemy unit
pub const EXP_PER_DESTROYED_CELL: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub winner: Side,
    pub reason: VictoryReason,
    pub player_won: bool,
    /// Total resolved attacks, both sides, specials included
    pub shots_fired: usize,
    pub player_hits: usize,
    pub player_accuracy: f32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub units_destroyed: usize,
    pub units_lost: usize,
    pub money_reward: u32,
    pub exp_gained: u32,
}

/// Build the end-of-battle report and compute rewards.
///
/// Exp comes from destruction (per cell of every destroyed enemy unit)
/// plus an occupancy bonus for a dense own deployment; a surviving
/// Passenger Plane multiplies the total. Money is paid on victory only
/// and scales with remaining HP and surviving units.
pub fn generate_report(
    state: &BattleState,
    victory: VictoryResult,
    enemy: &Enemy,
) -> BattleReport {
    let player_won = victory.winner == Side::Player;

    let player_shots = state
        .attack_history
        .iter()
        .filter(|l| l.side == Side::Player)
        .count();
    let player_hits = state
        .attack_history
        .iter()
        .filter(|l| l.side == Side::Player && l.outcome == AttackOutcome::Hit)
        .count();

    let damage_of = |side: Side| -> u32 {
        state
            .attack_history
            .iter()
            .filter(|l| l.side == side)
            .filter_map(|l| l.damage)
            .sum()
    };

    let units_destroyed = state
        .enemy_field
        .placed_units
        .iter()
        .filter(|u| u.is_destroyed)
        .count();
    let units_lost = state
        .player_field
        .placed_units
        .iter()
        .filter(|u| u.is_destroyed)
        .count();

    let destroy_exp: u32 = state
        .enemy_field
        .placed_units
        .iter()
        .filter(|u| u.is_destroyed)
        .map(|u| EXP_PER_DESTROYED_CELL * u.occupied_cells.len() as u32)
        .sum();
    let occupancy_bonus =
        destroy_exp as f32 * state.player_field.occupancy_rate() * 0.5;
    let mut exp = destroy_exp as f32 + occupancy_bonus;
    if let Some(UnitEffect::ExpBoost(mult)) = state
        .player_field
        .unit_of_kind(UnitKind::PassengerPlane)
        .and_then(|u| u.kind.effect())
    {
        exp *= mult;
    }

    let money_reward = if player_won {
        let base = enemy.base_reward as f32;
        let stats = &state.player_stats;
        let hp_rate = stats.hp as f32 / stats.max_hp as f32;
        let total_units = state.player_field.placed_units.len();
        let units_rate = if total_units == 0 {
            0.0
        } else {
            (total_units - units_lost) as f32 / total_units as f32
        };
        (base + hp_rate * 0.5 * base + units_rate * 0.3 * base).round() as u32
    } else {
        0
    };

    BattleReport {
        winner: victory.winner,
        reason: victory.reason,
        player_won,
        shots_fired: state.attack_history.len(),
        player_hits,
        player_accuracy: if player_shots == 0 {
            0.0
        } else {
            player_hits as f32 / player_shots as f32
        },
        damage_dealt: damage_of(Side::Player),
        damage_taken: damage_of(Side::Enemy),
        units_destroyed,
        units_lost,
        money_reward,
        exp_gained: exp.round() as u32,
    }
}
