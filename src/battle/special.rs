//! Special attacks and SP-funded unit abilities
//!
//! Every special is anchored to a placed, undestroyed unit on the
//! attacker's field. Costs are taken from the unit catalog; the
//! escalating abilities grow with the per-side usage count.
//!
//! Area specials (cross, column, row) resolve cells without dealing
//! direct HP damage. Each mine they strike fires its own counter.

use rand::Rng;
use tracing::debug;

use crate::battle::combat::{mine_counter, strike_cell, CounterStrike};
use crate::battle::damage::{attack_bonus, defense_bonus, roll_damage};
use crate::battle::state::{
    ActiveSpecialAttack, AttackLog, AttackOutcome, BattlePhase, BattleState,
};
use crate::battle::victory::{check_victory, VictoryResult};
use crate::core::error::{GameError, Result};
use crate::core::types::{GridSize, Position};
use crate::grid::Field;
use crate::units::{SpecialAttackKind, UnitEffect, UnitKind};

/// Cross arm length per range multiplier step
pub const CROSS_ARM: i32 = 3;
/// Rapid-fire window length in milliseconds
pub const RAPID_WINDOW_MS: u64 = 10_000;
/// Random follow-up shots after a missed burst opener
pub const BURST_FOLLOW_UPS: usize = 2;

/// Result of one special-attack activation
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialOutcome {
    pub kind: SpecialAttackKind,
    pub name: &'static str,
    pub sp_spent: u32,
    /// Cells newly resolved by this activation
    pub struck_cells: Vec<Position>,
    pub destroyed_units: Vec<UnitKind>,
    pub counters: Vec<CounterStrike>,
    /// Total HP damage dealt to the defender
    pub damage: u32,
    pub turn_ended: bool,
    pub victory: Option<VictoryResult>,
}

/// Range multiplier for area specials: an undestroyed Aircraft Carrier
/// on the attacker's field doubles it.
pub fn area_multiplier(field: &Field) -> i32 {
    if field.has_active(UnitKind::AircraftCarrier) {
        2
    } else {
        1
    }
}

/// Cross pattern: the center plus an arm of `CROSS_ARM * multiplier`
/// cells in each cardinal direction, clipped to the grid.
pub fn cross_targets(center: Position, size: GridSize, multiplier: i32) -> Vec<Position> {
    let arm = CROSS_ARM * multiplier;
    let mut cells = Vec::with_capacity(1 + 4 * arm as usize);
    if size.contains(center) {
        cells.push(center);
    }
    for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
        for step in 1..=arm {
            let pos = Position::new(center.x + dx * step, center.y + dy * step);
            if size.contains(pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

/// Every cell in the target's column
pub fn column_targets(center: Position, size: GridSize) -> Vec<Position> {
    (0..size.height).map(|y| Position::new(center.x, y)).collect()
}

/// Every cell in the target's row
pub fn row_targets(center: Position, size: GridSize) -> Vec<Position> {
    (0..size.width).map(|x| Position::new(x, center.y)).collect()
}

fn require_battle_phase(state: &BattleState) -> Result<()> {
    match state.phase {
        BattlePhase::Battle => Ok(()),
        BattlePhase::Result => Err(GameError::BattleOver),
        BattlePhase::Placement => Err(GameError::WrongPhase),
    }
}

/// Activate `unit_kind`'s special attack for the side whose turn it is.
///
/// `target` is required for the targeted kinds (cross, column, row,
/// burst) and ignored by the rest; passing `None` for a targeted kind
/// is a caller bug and panics.
pub fn execute_special_attack<R: Rng>(
    state: &mut BattleState,
    unit_kind: UnitKind,
    target: Option<Position>,
    now_ms: u64,
    rng: &mut R,
) -> Result<SpecialOutcome> {
    require_battle_phase(state)?;

    let attacker = state.turn;
    let defender = attacker.opponent();

    let spec = unit_kind
        .special_attack()
        .ok_or(GameError::NoSpecialAttack(unit_kind))?;
    if !state.field(attacker).has_active(unit_kind) {
        return Err(GameError::UnitUnavailable(unit_kind));
    }

    let uses = state.usage_counts.get(attacker, unit_kind);
    let cost = spec.cost(uses);
    let available = state.stats(attacker).sp;
    if !state.stats_mut(attacker).spend_sp(cost) {
        return Err(GameError::InsufficientSp { required: cost, available });
    }
    state.usage_counts.increment(attacker, unit_kind);

    debug!(side = ?attacker, kind = ?spec.kind, cost, "special attack activated");

    let mut outcome = SpecialOutcome {
        kind: spec.kind,
        name: spec.name,
        sp_spent: cost,
        struck_cells: Vec::new(),
        destroyed_units: Vec::new(),
        counters: Vec::new(),
        damage: 0,
        turn_ended: false,
        victory: None,
    };

    match spec.kind {
        SpecialAttackKind::Cross | SpecialAttackKind::Column | SpecialAttackKind::Row => {
            let center = targeted(spec.kind, target);
            let size = state.field(defender).size;
            let cells = match spec.kind {
                SpecialAttackKind::Cross => {
                    cross_targets(center, size, area_multiplier(state.field(attacker)))
                }
                SpecialAttackKind::Column => column_targets(center, size),
                SpecialAttackKind::Row => row_targets(center, size),
                _ => unreachable!(),
            };
            resolve_area(state, &mut outcome, &cells, rng);
            outcome.turn_ended = true;
            state.switch_turn();
        }
        SpecialAttackKind::Burst => {
            let opener = targeted(spec.kind, target);
            resolve_burst(state, &mut outcome, opener, rng);
            outcome.turn_ended = true;
            state.switch_turn();
        }
        SpecialAttackKind::Rapid => {
            state.active_special = Some(ActiveSpecialAttack {
                kind: SpecialAttackKind::Rapid,
                side: attacker,
                started_ms: now_ms,
                ends_ms: now_ms + RAPID_WINDOW_MS,
            });
        }
        SpecialAttackKind::AutoDetect => {
            resolve_auto_detect(state, &mut outcome, rng);
        }
        SpecialAttackKind::StealTurn => {
            // The caster keeps (or takes) the turn and attacks again
            state.turn = attacker;
            state.can_continue_attack = true;
        }
    }

    outcome.victory = check_victory(state);
    if outcome.victory.is_some() {
        state.phase = BattlePhase::Result;
    }

    Ok(outcome)
}

fn targeted(kind: SpecialAttackKind, target: Option<Position>) -> Position {
    match target {
        Some(pos) => pos,
        None => panic!("special attack {:?} requires a target cell", kind),
    }
}

/// Resolve an area pattern: no direct HP damage, but every mine struck
/// fires one counter at the attacker.
fn resolve_area<R: Rng>(
    state: &mut BattleState,
    outcome: &mut SpecialOutcome,
    cells: &[Position],
    rng: &mut R,
) {
    let attacker = state.turn;
    let defender = attacker.opponent();
    for &pos in cells {
        let Some(strike) = strike_cell(state.field_mut(defender), pos) else {
            continue;
        };
        outcome.struck_cells.push(pos);
        if strike.destroyed {
            if let Some(kind) = strike.unit_kind {
                outcome.destroyed_units.push(kind);
            }
        }
        if strike.is_mine {
            if let Some(counter) = mine_counter(state, attacker, rng) {
                outcome.counters.push(counter);
            }
        }
        state.attack_history.push(AttackLog {
            side: attacker,
            position: pos,
            outcome: strike.outcome,
            damage: None,
            destroyed_unit: if strike.destroyed { strike.unit_kind } else { None },
            special_attack: Some(outcome.name),
        });
    }
}

/// Burst fire: one aimed shot; a missed opener buys up to two random
/// follow-ups that fire regardless of what they strike, each miss
/// rolling its own damage. An opening hit fires alone, and tripping a
/// mine counters and aborts the remaining shots.
fn resolve_burst<R: Rng>(
    state: &mut BattleState,
    outcome: &mut SpecialOutcome,
    opener: Position,
    rng: &mut R,
) {
    let attacker = state.turn;
    let defender = attacker.opponent();

    let mut next_target = Some(opener);
    let mut follow_ups_left = BURST_FOLLOW_UPS;
    let mut opener_pending = true;

    while let Some(pos) = next_target.take() {
        let aimed_opener = opener_pending;
        opener_pending = false;

        let Some(strike) = strike_cell(state.field_mut(defender), pos) else {
            // Aimed at a resolved cell: pick a fresh one if any remain
            if follow_ups_left > 0 {
                follow_ups_left -= 1;
                next_target = random_unexplored(state.field(defender), rng);
            }
            continue;
        };
        outcome.struck_cells.push(pos);

        let mut damage = None;
        match strike.outcome {
            AttackOutcome::Hit if strike.is_mine => {
                if strike.destroyed {
                    outcome.destroyed_units.push(UnitKind::Mine);
                }
                if let Some(counter) = mine_counter(state, attacker, rng) {
                    outcome.counters.push(counter);
                }
            }
            AttackOutcome::Hit => {
                if strike.destroyed {
                    if let Some(kind) = strike.unit_kind {
                        outcome.destroyed_units.push(kind);
                    }
                }
            }
            AttackOutcome::Miss => {
                let atk = attack_bonus(state.field(attacker));
                let def = defense_bonus(state.field(defender));
                let at = state.stats(attacker).at;
                let df = state.stats(defender).df;
                let dealt = roll_damage(rng, at, atk, df, def);
                state.stats_mut(defender).take_damage(dealt);
                outcome.damage += dealt;
                damage = Some(dealt);
            }
        }

        state.attack_history.push(AttackLog {
            side: attacker,
            position: pos,
            outcome: strike.outcome,
            damage,
            destroyed_unit: if strike.destroyed { strike.unit_kind } else { None },
            special_attack: Some(outcome.name),
        });

        if strike.is_mine {
            break;
        }
        // An opening hit consumes no bonus shots
        if aimed_opener && strike.outcome == AttackOutcome::Hit {
            break;
        }
        if follow_ups_left > 0 {
            follow_ups_left -= 1;
            next_target = random_unexplored(state.field(defender), rng);
        }
    }
}

/// Guided missile: resolve one random hidden occupied cell as a hit,
/// no damage attached. Mines revealed this way do not counter. The
/// caster keeps the turn, same as an ordinary hit. A board with no
/// hidden units left is a no-op.
fn resolve_auto_detect<R: Rng>(
    state: &mut BattleState,
    outcome: &mut SpecialOutcome,
    rng: &mut R,
) {
    let attacker = state.turn;
    let defender = attacker.opponent();

    let candidates = state.field(defender).hidden_occupied_cells();
    if candidates.is_empty() {
        return;
    }
    let pos = candidates[rng.gen_range(0..candidates.len())];
    let Some(strike) = strike_cell(state.field_mut(defender), pos) else {
        return;
    };
    outcome.struck_cells.push(pos);

    if strike.destroyed {
        if let Some(kind) = strike.unit_kind {
            outcome.destroyed_units.push(kind);
        }
    }
    state.can_continue_attack = true;

    state.attack_history.push(AttackLog {
        side: attacker,
        position: pos,
        outcome: strike.outcome,
        damage: None,
        destroyed_unit: if strike.destroyed { strike.unit_kind } else { None },
        special_attack: Some(outcome.name),
    });
}

fn random_unexplored<R: Rng>(field: &Field, rng: &mut R) -> Option<Position> {
    let candidates = field.unexplored_cells();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

/// Activate a heal unit at a rate of one SP per HP restored. The
/// restore is capped by the unit's heal fraction, the missing HP, and
/// the SP on hand. Healing consumes the turn.
pub fn execute_heal(state: &mut BattleState, unit_kind: UnitKind) -> Result<u32> {
    require_battle_phase(state)?;

    let side = state.turn;
    let Some(UnitEffect::Heal { fraction }) = unit_kind.effect() else {
        return Err(GameError::UnitUnavailable(unit_kind));
    };
    if !state.field(side).has_active(unit_kind) {
        return Err(GameError::UnitUnavailable(unit_kind));
    }

    let stats = state.stats(side);
    if stats.hp >= stats.max_hp {
        return Err(GameError::HpAlreadyFull);
    }
    if stats.sp == 0 {
        return Err(GameError::InsufficientSp { required: 1, available: 0 });
    }

    let stats = state.stats_mut(side);
    let amount = ((stats.max_hp as f32 * fraction).round() as u32)
        .min(stats.max_hp - stats.hp)
        .min(stats.sp);
    stats.hp += amount;
    stats.sp -= amount;

    debug!(side = ?side, amount, "heal activated");
    state.switch_turn();
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Stats;
    use crate::core::types::{Rotation, Side};
    use crate::grid::placement::place_unit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn state_10x10() -> BattleState {
        let size = GridSize::new(10, 10);
        BattleState::new(
            Field::new(size),
            Field::new(size),
            Stats::new(100, 100, 10, 5, 1),
            Stats::new(100, 100, 10, 5, 1),
        )
    }

    #[test]
    fn test_cross_center_of_ten_grid() {
        let cells = cross_targets(Position::new(5, 5), GridSize::new(10, 10), 1);
        assert_eq!(cells.len(), 13);
    }

    #[test]
    fn test_cross_doubled_on_large_grid() {
        let cells = cross_targets(Position::new(10, 10), GridSize::new(20, 20), 2);
        assert_eq!(cells.len(), 25);
    }

    #[test]
    fn test_cross_clipped_at_corner() {
        let cells = cross_targets(Position::new(0, 0), GridSize::new(10, 10), 1);
        // Center plus two arms of 3
        assert_eq!(cells.len(), 7);
    }

    #[test]
    fn test_column_and_row_cover_full_lines() {
        let size = GridSize::new(8, 7);
        assert_eq!(column_targets(Position::new(3, 2), size).len(), 7);
        assert_eq!(row_targets(Position::new(3, 2), size).len(), 8);
    }

    #[test]
    fn test_special_requires_fielded_unit() {
        let mut state = state_10x10();
        let err = execute_special_attack(
            &mut state,
            UnitKind::Harrier,
            Some(Position::new(5, 5)),
            0,
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err, GameError::UnitUnavailable(UnitKind::Harrier));
    }

    #[test]
    fn test_unit_without_special_rejected() {
        let mut state = state_10x10();
        let err = execute_special_attack(&mut state, UnitKind::Ferrari, None, 0, &mut rng())
            .unwrap_err();
        assert_eq!(err, GameError::NoSpecialAttack(UnitKind::Ferrari));
    }

    #[test]
    fn test_insufficient_sp() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::Harrier,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        state.player_stats.sp = 5;
        let err = execute_special_attack(
            &mut state,
            UnitKind::Harrier,
            Some(Position::new(5, 5)),
            0,
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err, GameError::InsufficientSp { required: 20, available: 5 });
        assert_eq!(state.player_stats.sp, 5);
    }

    #[test]
    fn test_cross_bombing_resolves_and_ends_turn() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::Harrier,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        place_unit(
            &mut state.enemy_field,
            UnitKind::Ferrari,
            Position::new(5, 5),
            Rotation::Deg0,
        )
        .unwrap();
        let outcome = execute_special_attack(
            &mut state,
            UnitKind::Harrier,
            Some(Position::new(5, 5)),
            0,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(outcome.struck_cells.len(), 13);
        assert!(outcome.destroyed_units.contains(&UnitKind::Ferrari));
        // Area patterns deal no direct HP damage
        assert_eq!(outcome.damage, 0);
        assert!(outcome.turn_ended);
        // Wiping the only non-mine unit ends the battle
        assert!(outcome.victory.is_some());
    }

    #[test]
    fn test_escalating_cost_across_uses() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::SpyVan,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        let mut rng = rng();
        let first =
            execute_special_attack(&mut state, UnitKind::SpyVan, None, 0, &mut rng).unwrap();
        assert_eq!(first.sp_spent, 20);
        let second =
            execute_special_attack(&mut state, UnitKind::SpyVan, None, 0, &mut rng).unwrap();
        assert_eq!(second.sp_spent, 30);
        assert_eq!(state.player_stats.sp, 50);
    }

    #[test]
    fn test_rapid_fire_opens_window() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::AttackHeli,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        let outcome =
            execute_special_attack(&mut state, UnitKind::AttackHeli, None, 1_000, &mut rng())
                .unwrap();
        assert!(!outcome.turn_ended);
        let window = state.active_special.unwrap();
        assert_eq!(window.kind, SpecialAttackKind::Rapid);
        assert_eq!(window.side, Side::Player);
        assert_eq!(window.ends_ms, 1_000 + RAPID_WINDOW_MS);
    }

    #[test]
    fn test_auto_detect_always_hits_hidden_unit() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::ReconPlane,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        place_unit(
            &mut state.enemy_field,
            UnitKind::OilTanker,
            Position::new(2, 2),
            Rotation::Deg0,
        )
        .unwrap();
        let outcome =
            execute_special_attack(&mut state, UnitKind::ReconPlane, None, 0, &mut rng())
                .unwrap();
        assert_eq!(outcome.struck_cells.len(), 1);
        assert_eq!(outcome.damage, 0);
        assert!(!outcome.turn_ended);
        let pos = outcome.struck_cells[0];
        assert!(pos.y == 2 && (2..6).contains(&pos.x));
    }

    #[test]
    fn test_burst_opener_hit_fires_alone() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::MissileBoat,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        place_unit(
            &mut state.enemy_field,
            UnitKind::OilTanker,
            Position::new(2, 2),
            Rotation::Deg0,
        )
        .unwrap();
        let outcome = execute_special_attack(
            &mut state,
            UnitKind::MissileBoat,
            Some(Position::new(2, 2)),
            0,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(outcome.struck_cells, vec![Position::new(2, 2)]);
        // An opening hit consumes no bonus shots and carries no damage
        assert_eq!(outcome.damage, 0);
        assert!(outcome.turn_ended);
    }

    #[test]
    fn test_burst_follow_ups_after_miss() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::MissileBoat,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        let outcome = execute_special_attack(
            &mut state,
            UnitKind::MissileBoat,
            Some(Position::new(9, 9)),
            0,
            &mut rng(),
        )
        .unwrap();
        // Empty defender field: opener plus both follow-ups, all misses
        assert_eq!(outcome.struck_cells.len(), 3);
        // Three misses at AT 10 vs DF 5: 3 * [4, 6]
        assert!((12..=18).contains(&outcome.damage));
    }

    #[test]
    fn test_burst_follow_up_hit_keeps_firing() {
        // 5x1 defender board with a tanker on all but the opener's
        // cell: the missed opener forces both follow-ups onto the unit
        let mut state = BattleState::new(
            Field::new(GridSize::new(10, 10)),
            Field::new(GridSize::new(5, 1)),
            Stats::new(100, 100, 10, 5, 1),
            Stats::new(100, 100, 10, 5, 1),
        );
        place_unit(
            &mut state.player_field,
            UnitKind::MissileBoat,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        place_unit(
            &mut state.enemy_field,
            UnitKind::OilTanker,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        let outcome = execute_special_attack(
            &mut state,
            UnitKind::MissileBoat,
            Some(Position::new(4, 0)),
            0,
            &mut rng(),
        )
        .unwrap();
        // A follow-up hit does not cut the burst short
        assert_eq!(outcome.struck_cells.len(), 3);
        assert_eq!(outcome.struck_cells[0], Position::new(4, 0));
        // Only the opening miss carries a damage roll
        assert!((4..=6).contains(&outcome.damage));
        assert!(outcome.destroyed_units.is_empty());
    }

    #[test]
    fn test_heal_restores_and_ends_turn() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::Ambulance,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        state.player_stats.hp = 50;
        let healed = execute_heal(&mut state, UnitKind::Ambulance).unwrap();
        assert_eq!(healed, 30);
        assert_eq!(state.player_stats.hp, 80);
        // One SP per restored HP
        assert_eq!(state.player_stats.sp, 70);
        assert_eq!(state.turn, Side::Enemy);
    }

    #[test]
    fn test_heal_capped_at_max_hp() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::Ambulance,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        state.player_stats.hp = 90;
        let healed = execute_heal(&mut state, UnitKind::Ambulance).unwrap();
        assert_eq!(healed, 10);
        assert_eq!(state.player_stats.hp, 100);
        assert_eq!(state.player_stats.sp, 90);
    }

    #[test]
    fn test_heal_limited_by_sp_on_hand() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::Ambulance,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        state.player_stats.hp = 10;
        state.player_stats.sp = 5;
        let healed = execute_heal(&mut state, UnitKind::Ambulance).unwrap();
        assert_eq!(healed, 5);
        assert_eq!(state.player_stats.sp, 0);

        state.turn = Side::Player;
        let err = execute_heal(&mut state, UnitKind::Ambulance).unwrap_err();
        assert_eq!(err, GameError::InsufficientSp { required: 1, available: 0 });
    }

    #[test]
    fn test_heal_rejected_at_full_hp() {
        let mut state = state_10x10();
        place_unit(
            &mut state.player_field,
            UnitKind::Ambulance,
            Position::new(0, 0),
            Rotation::Deg0,
        )
        .unwrap();
        let err = execute_heal(&mut state, UnitKind::Ambulance).unwrap_err();
        assert_eq!(err, GameError::HpAlreadyFull);
    }
}
