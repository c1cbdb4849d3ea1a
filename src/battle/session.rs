//! Battle orchestration
//!
//! A session owns the state, the RNG, and the enemy controller, and
//! enforces the placement -> battle -> result flow. All randomness
//! comes from one seeded generator, so a session replays exactly from
//! its seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::ai::AiController;
use crate::battle::combat::{execute_attack, AttackResult};
use crate::battle::report::{generate_report, BattleReport};
use crate::battle::special::{execute_heal, execute_special_attack, SpecialOutcome};
use crate::battle::state::{AttackOutcome, BattlePhase, BattleState, Stats};
use crate::battle::victory::VictoryResult;
use crate::core::error::{GameError, Result};
use crate::core::types::{GridSize, Position, Rotation, Side};
use crate::grid::placement::{is_placement_complete, place_unit};
use crate::grid::{Field, PlacedUnitId};
use crate::units::{Enemy, EnemyId, UnitEffect, UnitKind};

/// One action taken during the enemy's turn
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    Attack(AttackResult),
    Special(SpecialOutcome),
}

pub struct BattleSession {
    pub state: BattleState,
    enemy: Enemy,
    ai: AiController,
    rng: ChaCha8Rng,
    outcome: Option<VictoryResult>,
}

impl BattleSession {
    /// Start a new session in the placement phase. Field sizes follow
    /// each side's AR stat.
    pub fn new(enemy_id: EnemyId, player_stats: Stats, seed: u64) -> Self {
        let enemy = Enemy::get(enemy_id);
        let ai = AiController::with_defaults(enemy.policy);

        let player_field = Field::new(GridSize::from_area_level(player_stats.ar));
        let enemy_field = Field::new(GridSize::from_area_level(enemy.stats.ar));

        let mut state =
            BattleState::new(player_field, enemy_field, player_stats, enemy.stats);
        state.phase = BattlePhase::Placement;

        info!(enemy = enemy.name, seed, "battle session created");

        Self {
            state,
            enemy,
            ai,
            rng: ChaCha8Rng::seed_from_u64(seed),
            outcome: None,
        }
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn victory(&self) -> Option<VictoryResult> {
        self.outcome
    }

    pub fn place_player_unit(
        &mut self,
        kind: UnitKind,
        anchor: Position,
        rotation: Rotation,
    ) -> Result<PlacedUnitId> {
        if self.state.phase != BattlePhase::Placement {
            return Err(GameError::WrongPhase);
        }
        Ok(place_unit(&mut self.state.player_field, kind, anchor, rotation)?)
    }

    pub fn remove_player_unit(&mut self, id: PlacedUnitId) {
        if self.state.phase == BattlePhase::Placement {
            self.state.player_field.remove_unit(id);
        }
    }

    /// Lock in the player's deployment, place the enemy roster, and
    /// decide who opens. A side holding the only undestroyed first
    /// strike unit opens; otherwise the player does.
    pub fn start_battle(&mut self) -> Result<()> {
        if self.state.phase != BattlePhase::Placement {
            return Err(GameError::WrongPhase);
        }
        if !is_placement_complete(&self.state.player_field) {
            return Err(GameError::PlacementIncomplete);
        }

        let roster = self.enemy.units.clone();
        self.ai
            .place_units(&mut self.state.enemy_field, &roster, &mut self.rng);

        self.state.turn = self.opening_side();
        self.state.phase = BattlePhase::Battle;
        info!(opener = ?self.state.turn, "battle started");
        Ok(())
    }

    fn opening_side(&self) -> Side {
        let first_strike = |field: &Field| {
            field
                .placed_units
                .iter()
                .any(|u| !u.is_destroyed && u.kind.effect() == Some(UnitEffect::FirstStrike))
        };
        match (
            first_strike(&self.state.player_field),
            first_strike(&self.state.enemy_field),
        ) {
            (false, true) => Side::Enemy,
            _ => Side::Player,
        }
    }

    fn require_player_turn(&self) -> Result<()> {
        if self.state.turn != Side::Player {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    pub fn player_attack(&mut self, target: Position, now_ms: u64) -> Result<AttackResult> {
        self.require_player_turn()?;
        let result = execute_attack(&mut self.state, target, now_ms, &mut self.rng)?;
        self.note_victory(result.victory);
        Ok(result)
    }

    pub fn player_special(
        &mut self,
        unit_kind: UnitKind,
        target: Option<Position>,
        now_ms: u64,
    ) -> Result<SpecialOutcome> {
        self.require_player_turn()?;
        let outcome =
            execute_special_attack(&mut self.state, unit_kind, target, now_ms, &mut self.rng)?;
        self.note_victory(outcome.victory);
        Ok(outcome)
    }

    pub fn player_heal(&mut self, unit_kind: UnitKind) -> Result<u32> {
        self.require_player_turn()?;
        execute_heal(&mut self.state, unit_kind)
    }

    /// Voluntarily pass, e.g. to stop shooting after a hit streak
    pub fn end_turn(&mut self) -> Result<()> {
        match self.state.phase {
            BattlePhase::Battle => {}
            BattlePhase::Result => return Err(GameError::BattleOver),
            BattlePhase::Placement => return Err(GameError::WrongPhase),
        }
        self.require_player_turn()?;
        self.state.switch_turn();
        Ok(())
    }

    /// Drive the enemy until its turn ends or the battle does. At most
    /// one special attack per turn; hits let it keep shooting.
    pub fn run_enemy_turn(&mut self, now_ms: u64) -> Result<Vec<EnemyAction>> {
        if self.state.phase != BattlePhase::Battle {
            return Err(match self.state.phase {
                BattlePhase::Result => GameError::BattleOver,
                _ => GameError::WrongPhase,
            });
        }
        if self.state.turn != Side::Enemy {
            return Err(GameError::NotYourTurn);
        }

        let mut actions = Vec::new();

        if let Some((kind, target)) = self.ai.choose_special(
            Side::Enemy,
            &self.state.enemy_field,
            &self.state.player_field,
            &self.state.enemy_stats,
            &self.state.player_stats,
            &self.state.usage_counts,
            &mut self.rng,
        ) {
            let outcome = execute_special_attack(
                &mut self.state,
                kind,
                target,
                now_ms,
                &mut self.rng,
            )?;
            self.note_victory(outcome.victory);
            actions.push(EnemyAction::Special(outcome));
        }

        // One shot per resolvable cell bounds the loop. The clock
        // advances one second per shot so a rapid-fire window covers a
        // realistic number of follow-ups.
        let max_shots = self.state.player_field.size.cell_count();
        for shot in 0..max_shots {
            if self.state.phase != BattlePhase::Battle || self.state.turn != Side::Enemy {
                break;
            }
            // An exhausted defender board leaves nothing to shoot at;
            // yield the turn instead of wedging on a resolved cell
            if self.state.player_field.unexplored_count() == 0 {
                self.state.switch_turn();
                break;
            }
            let shot_ms = now_ms + shot as u64 * 1_000;
            let target = self.ai.next_target(&self.state.player_field, &mut self.rng);
            let result = match execute_attack(&mut self.state, target, shot_ms, &mut self.rng)
            {
                Ok(result) => result,
                // The AI's fallback can pick an already resolved cell
                Err(GameError::CellAlreadyResolved(_)) => {
                    self.state.switch_turn();
                    break;
                }
                Err(e) => return Err(e),
            };
            self.ai.observe(
                &self.state.player_field,
                target,
                result.outcome == AttackOutcome::Hit,
            );
            self.note_victory(result.victory);
            let ended = result.turn_ended;
            actions.push(EnemyAction::Attack(result));
            if ended {
                break;
            }
        }

        Ok(actions)
    }

    fn note_victory(&mut self, victory: Option<VictoryResult>) {
        if let Some(v) = victory {
            if self.outcome.is_none() {
                info!(winner = ?v.winner, reason = ?v.reason, "battle over");
                self.outcome = Some(v);
            }
        }
    }

    /// The end-of-battle report; `None` while the battle is running
    pub fn report(&self) -> Option<BattleReport> {
        self.outcome
            .map(|v| generate_report(&self.state, v, &self.enemy))
    }
}
