//! Ordinary attack resolution
//!
//! One call resolves one cell on the defender's field. Hits chip away
//! at units and keep the turn; the turn-ending miss is the shot that
//! applies the damage roll to the defender. Tripping a mine fires a
//! counter at the attacker. Area and burst attacks build on the same
//! cell strike.

use rand::Rng;
use tracing::debug;

use crate::battle::damage::{attack_bonus, defense_bonus, roll_damage};
use crate::battle::state::{
    AttackLog, AttackOutcome, BattlePhase, BattleState,
};
use crate::battle::victory::{check_victory, VictoryResult};
use crate::core::error::{GameError, Result};
use crate::core::types::{Position, Side};
use crate::grid::{CellState, Field};
use crate::units::{SpecialAttackKind, UnitKind};

/// Damage dealt to the attacker when a mine counter lands on open water
pub const COUNTER_MISS_DAMAGE: u32 = 1;

/// What one cell strike did to the target field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStrike {
    pub outcome: AttackOutcome,
    pub unit_kind: Option<UnitKind>,
    pub destroyed: bool,
    pub is_mine: bool,
}

/// A landmine's return strike against the attacker's own field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterStrike {
    pub position: Position,
    pub outcome: AttackOutcome,
    pub damage: u32,
    pub destroyed_unit: Option<UnitKind>,
}

/// Full result of one ordinary attack
#[derive(Debug, Clone, PartialEq)]
pub struct AttackResult {
    pub position: Position,
    pub outcome: AttackOutcome,
    pub damage: Option<u32>,
    pub destroyed_unit: Option<UnitKind>,
    pub hit_mine: bool,
    pub counter: Option<CounterStrike>,
    pub turn_ended: bool,
    pub victory: Option<VictoryResult>,
}

/// Resolve one unexplored cell: flip its state and the owning unit's
/// hit bookkeeping. Returns `None` when the cell is out of bounds or
/// already resolved.
pub(crate) fn strike_cell(field: &mut Field, pos: Position) -> Option<CellStrike> {
    let unit_id = {
        let cell = field.cell(pos)?;
        if !cell.is_unexplored() {
            return None;
        }
        cell.unit
    };

    let Some(id) = unit_id else {
        if let Some(cell) = field.cell_mut(pos) {
            cell.state = CellState::Miss;
        }
        return Some(CellStrike {
            outcome: AttackOutcome::Miss,
            unit_kind: None,
            destroyed: false,
            is_mine: false,
        });
    };

    let (kind, destroyed) = {
        let unit = field
            .unit_mut(id)
            .unwrap_or_else(|| panic!("cell references missing unit {:?}", id));
        if !unit.hit_cells.contains(&pos) {
            unit.hit_cells.push(pos);
        }
        (unit.kind, unit.all_cells_hit())
    };

    if let Some(cell) = field.cell_mut(pos) {
        cell.state = CellState::Hit;
        cell.is_revealed = true;
    }
    if destroyed {
        field.destroy_unit(id);
    }

    Some(CellStrike {
        outcome: AttackOutcome::Hit,
        unit_kind: Some(kind),
        destroyed,
        is_mine: kind.is_mine(),
    })
}

/// Landmine counter: one random unexplored cell on the attacker's own
/// field is resolved against them. Hitting one of their own units is an
/// ordinary hit with no damage; landing on open water chips a fixed
/// point off the attacker. Counters never chain off mines they happen
/// to strike.
pub(crate) fn mine_counter<R: Rng>(
    state: &mut BattleState,
    attacker: Side,
    rng: &mut R,
) -> Option<CounterStrike> {
    let candidates = state.field(attacker).unexplored_cells();
    if candidates.is_empty() {
        return None;
    }
    let pos = candidates[rng.gen_range(0..candidates.len())];

    let strike = strike_cell(state.field_mut(attacker), pos)?;
    let damage = match strike.outcome {
        AttackOutcome::Hit => 0,
        AttackOutcome::Miss => COUNTER_MISS_DAMAGE,
    };
    state.stats_mut(attacker).take_damage(damage);

    debug!(
        side = ?attacker,
        x = pos.x,
        y = pos.y,
        damage,
        "landmine counter resolved"
    );

    Some(CounterStrike {
        position: pos,
        outcome: strike.outcome,
        damage,
        destroyed_unit: if strike.destroyed { strike.unit_kind } else { None },
    })
}

/// Whether a rapid-fire window is open for the current attacker
fn rapid_window_open(state: &BattleState, now_ms: u64) -> bool {
    matches!(
        state.active_special,
        Some(a) if a.kind == SpecialAttackKind::Rapid
            && a.side == state.turn
            && now_ms < a.ends_ms
    )
}

/// Resolve one ordinary attack by the side whose turn it is.
pub fn execute_attack<R: Rng>(
    state: &mut BattleState,
    target: Position,
    now_ms: u64,
    rng: &mut R,
) -> Result<AttackResult> {
    match state.phase {
        BattlePhase::Battle => {}
        BattlePhase::Result => return Err(GameError::BattleOver),
        BattlePhase::Placement => return Err(GameError::WrongPhase),
    }

    // Expire a stale rapid-fire window before resolving
    if let Some(a) = state.active_special {
        if a.kind == SpecialAttackKind::Rapid && now_ms >= a.ends_ms {
            state.active_special = None;
        }
    }

    let attacker = state.turn;
    let defender = attacker.opponent();

    let strike = strike_cell(state.field_mut(defender), target)
        .ok_or(GameError::CellAlreadyResolved(target))?;

    let mut damage = None;
    let mut counter = None;
    let turn_ended;

    match strike.outcome {
        AttackOutcome::Hit if strike.is_mine => {
            // Tripping a mine always ends the turn, rapid fire included
            counter = mine_counter(state, attacker, rng);
            turn_ended = true;
            state.active_special = None;
            state.switch_turn();
        }
        AttackOutcome::Hit => {
            state.can_continue_attack = true;
            state.consecutive_hits += 1;
            turn_ended = false;
        }
        AttackOutcome::Miss => {
            // The miss is the shot that carries the damage roll
            let atk = attack_bonus(state.field(attacker));
            let def = defense_bonus(state.field(defender));
            let at = state.stats(attacker).at;
            let df = state.stats(defender).df;
            let dealt = roll_damage(rng, at, atk, df, def);
            state.stats_mut(defender).take_damage(dealt);
            damage = Some(dealt);

            if rapid_window_open(state, now_ms) {
                state.reset_continuation();
                turn_ended = false;
            } else {
                turn_ended = true;
                state.switch_turn();
            }
        }
    }

    state.attack_history.push(AttackLog {
        side: attacker,
        position: target,
        outcome: strike.outcome,
        damage,
        destroyed_unit: if strike.destroyed { strike.unit_kind } else { None },
        special_attack: None,
    });

    debug!(
        side = ?attacker,
        x = target.x,
        y = target.y,
        outcome = ?strike.outcome,
        ?damage,
        "attack resolved"
    );

    let victory = check_victory(state);
    if victory.is_some() {
        state.phase = BattlePhase::Result;
    }

    Ok(AttackResult {
        position: target,
        outcome: strike.outcome,
        damage,
        destroyed_unit: if strike.destroyed { strike.unit_kind } else { None },
        hit_mine: strike.is_mine,
        counter,
        turn_ended,
        victory,
    })
}
