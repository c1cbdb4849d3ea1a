//! Enemy decision making
//!
//! A policy picks target cells; a profile layers tunable imperfection
//! (mistakes) and appetite for special attacks on top. The controller
//! ties both to a persistent targeting memory.

pub mod aggressive;
pub mod balanced;
pub mod difficulty;
pub mod expert;
pub mod placement;
pub mod state;
pub mod strategic;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::state::{Stats, UsageCounts};
use crate::core::types::{Position, Side};
use crate::grid::Field;
use crate::units::{SpecialAttackKind, UnitKind};

pub use difficulty::{AiProfile, ProfileError};
pub use placement::PlacementMode;
pub use state::AiState;

/// The four attack policies, in rough order of strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiPolicy {
    Balanced,
    Aggressive,
    Strategic,
    Expert,
}

/// One AI opponent: policy, profile, and targeting memory
#[derive(Debug, Clone)]
pub struct AiController {
    pub policy: AiPolicy,
    pub profile: AiProfile,
    state: AiState,
}

impl AiController {
    pub fn new(policy: AiPolicy, profile: AiProfile) -> Self {
        Self { policy, profile, state: AiState::default() }
    }

    /// Controller with the policy's built-in profile
    pub fn with_defaults(policy: AiPolicy) -> Self {
        Self::new(policy, AiProfile::for_policy(policy))
    }

    /// Deploy a roster according to the profile's placement mode
    pub fn place_units<R: Rng>(&self, field: &mut Field, units: &[UnitKind], rng: &mut R) {
        placement::place_units(field, units, self.profile.placement, rng);
    }

    /// Pick the next cell to attack on the opponent's field, mistakes
    /// included.
    pub fn next_target<R: Rng>(&mut self, field: &Field, rng: &mut R) -> Position {
        let intended = match self.policy {
            AiPolicy::Balanced => balanced::choose_target(&self.state, field, rng),
            AiPolicy::Aggressive => aggressive::choose_target(&self.state, field, rng),
            AiPolicy::Strategic => strategic::choose_target(&mut self.state, field, rng),
            AiPolicy::Expert => expert::choose_target(field, rng),
        };
        let actual = self.profile.apply_mistake(field, intended, rng);
        if actual != intended {
            debug!(?intended, ?actual, "shot displaced by mistake roll");
        }
        actual
    }

    /// Fold a resolved shot back into targeting memory
    pub fn observe(&mut self, field: &Field, target: Position, hit: bool) {
        self.state.update_after_attack(field, target, hit);
    }

    /// Decide whether to open the turn with a special attack, and with
    /// which unit and target.
    pub fn choose_special<R: Rng>(
        &self,
        side: Side,
        own_field: &Field,
        target_field: &Field,
        own_stats: &Stats,
        opponent_stats: &Stats,
        usage: &UsageCounts,
        rng: &mut R,
    ) -> Option<(UnitKind, Option<Position>)> {
        let fire = match self.policy {
            AiPolicy::Aggressive => {
                aggressive::should_use_special(own_stats, opponent_stats, rng)
            }
            _ => rng.gen_bool(self.profile.special_attack_rate),
        };
        if !fire {
            return None;
        }

        let unit = own_field
            .placed_units
            .iter()
            .filter(|u| !u.is_destroyed)
            .filter_map(|u| u.kind.special_attack().map(|spec| (u.kind, spec)))
            .find(|(kind, spec)| spec.cost(usage.get(side, *kind)) <= own_stats.sp)?;

        let (kind, spec) = unit;
        let target = match spec.kind {
            SpecialAttackKind::Cross
            | SpecialAttackKind::Column
            | SpecialAttackKind::Row
            | SpecialAttackKind::Burst => Some(
                expert::most_probable_cell(target_field, rng)
                    .unwrap_or_else(|| target_field.size.center()),
            ),
            _ => None,
        };
        Some((kind, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GridSize, Rotation};
    use crate::grid::placement::place_unit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_next_target_is_unexplored() {
        let field = Field::new(GridSize::new(7, 7));
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for policy in [
            AiPolicy::Balanced,
            AiPolicy::Aggressive,
            AiPolicy::Strategic,
            AiPolicy::Expert,
        ] {
            let mut ai = AiController::with_defaults(policy);
            let pos = ai.next_target(&field, &mut rng);
            assert!(field.cell(pos).unwrap().is_unexplored());
        }
    }

    #[test]
    fn test_choose_special_requires_fielded_unit() {
        let ai = AiController::with_defaults(AiPolicy::Expert);
        let own = Field::new(GridSize::new(7, 7));
        let target = Field::new(GridSize::new(7, 7));
        let stats = Stats::new(100, 100, 10, 5, 1);
        let usage = UsageCounts::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..100 {
            assert!(ai
                .choose_special(Side::Enemy, &own, &target, &stats, &stats, &usage, &mut rng)
                .is_none());
        }
    }

    #[test]
    fn test_choose_special_targets_area_kinds() {
        let mut profile = AiProfile::for_policy(AiPolicy::Strategic);
        profile.special_attack_rate = 1.0;
        let ai = AiController::new(AiPolicy::Strategic, profile);

        let mut own = Field::new(GridSize::new(7, 7));
        place_unit(&mut own, UnitKind::Harrier, Position::new(0, 0), Rotation::Deg0)
            .unwrap();
        let target = Field::new(GridSize::new(7, 7));
        let stats = Stats::new(100, 100, 10, 5, 1);
        let usage = UsageCounts::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        let (kind, target_pos) = ai
            .choose_special(Side::Enemy, &own, &target, &stats, &stats, &usage, &mut rng)
            .unwrap();
        assert_eq!(kind, UnitKind::Harrier);
        assert!(target_pos.is_some());
    }

    #[test]
    fn test_choose_special_skips_unaffordable() {
        let mut profile = AiProfile::for_policy(AiPolicy::Strategic);
        profile.special_attack_rate = 1.0;
        let ai = AiController::new(AiPolicy::Strategic, profile);

        let mut own = Field::new(GridSize::new(7, 7));
        place_unit(&mut own, UnitKind::Harrier, Position::new(0, 0), Rotation::Deg0)
            .unwrap();
        let target = Field::new(GridSize::new(7, 7));
        let mut stats = Stats::new(100, 100, 10, 5, 1);
        stats.sp = 10;
        let usage = UsageCounts::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        assert!(ai
            .choose_special(Side::Enemy, &own, &target, &stats, &stats, &usage, &mut rng)
            .is_none());
    }
}
