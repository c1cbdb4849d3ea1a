//! Aggressive policy: relentless pursuit and eager special attacks

use rand::Rng;

use crate::ai::balanced::pursue;
use crate::ai::state::{random_unexplored_or_center, AiState};
use crate::battle::Stats;
use crate::core::types::Position;
use crate::grid::Field;

const PURSUE_RATE: f64 = 0.7;

/// SP fraction below which specials are held back
const SPECIAL_SP_FLOOR: f32 = 0.6;
/// Opponent HP fraction above which specials are held back
const SPECIAL_HP_CEILING: f32 = 0.8;
/// Chance of firing a special once the conditions hold
const SPECIAL_RATE: f64 = 0.4;

pub fn choose_target<R: Rng>(state: &AiState, field: &Field, rng: &mut R) -> Position {
    if state.has_open_hits() && rng.gen_bool(PURSUE_RATE) {
        if let Some(pos) = pursue(state, field, rng) {
            return pos;
        }
    }
    random_unexplored_or_center(field, rng)
}

/// The aggressive special-attack trigger: enough SP banked and the
/// opponent already softened up.
pub fn should_use_special<R: Rng>(own: &Stats, opponent: &Stats, rng: &mut R) -> bool {
    let sp_ok = own.sp as f32 >= own.max_sp as f32 * SPECIAL_SP_FLOOR;
    let hp_ok = opponent.hp as f32 <= opponent.max_hp as f32 * SPECIAL_HP_CEILING;
    sp_ok && hp_ok && rng.gen_bool(SPECIAL_RATE)
}
