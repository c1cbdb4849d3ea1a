//! Victory conditions
//!
//! A side loses when its HP reaches zero, or when every non-mine unit it
//! placed is destroyed. HP depletion is checked first for both sides, so
//! it always wins over unit destruction when both hold at once.

use serde::{Deserialize, Serialize};

use crate::battle::state::{BattlePhase, BattleState};
use crate::core::types::Side;
use crate::grid::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryReason {
    HpDepleted,
    AllUnitsDestroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryResult {
    pub winner: Side,
    pub reason: VictoryReason,
}

/// Whether every placed non-mine unit is destroyed. A field with no
/// non-mine units placed does not count as wiped out.
fn all_units_destroyed(field: &Field) -> bool {
    let mut any = false;
    for unit in field.placed_units.iter().filter(|u| !u.kind.is_mine()) {
        any = true;
        if !unit.is_destroyed {
            return false;
        }
    }
    any
}

/// Check the battle-end conditions. Only meaningful during the battle
/// phase; returns `None` in any other phase.
pub fn check_victory(state: &BattleState) -> Option<VictoryResult> {
    if state.phase != BattlePhase::Battle {
        return None;
    }

    for side in [Side::Player, Side::Enemy] {
        if state.stats(side).hp == 0 {
            return Some(VictoryResult {
                winner: side.opponent(),
                reason: VictoryReason::HpDepleted,
            });
        }
    }
    for side in [Side::Player, Side::Enemy] {
        if all_units_destroyed(state.field(side)) {
            return Some(VictoryResult {
                winner: side.opponent(),
                reason: VictoryReason::AllUnitsDestroyed,
            });
        }
    }
    None
}
