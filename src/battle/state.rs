//! Mutable battle state owned by the orchestrator

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Position, Side};
use crate::grid::Field;
use crate::units::{SpecialAttackKind, UnitKind};

/// Combat stat block for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub max_hp: u32,
    pub sp: u32,
    pub max_sp: u32,
    pub at: u32,
    pub df: u32,
    /// Area level: controls this side's grid size
    pub ar: u32,
}

impl Stats {
    pub const fn new(hp: u32, sp: u32, at: u32, df: u32, ar: u32) -> Self {
        Self { hp, max_hp: hp, sp, max_sp: sp, at, df, ar }
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Spend SP; false (and no change) when there is not enough
    pub fn spend_sp(&mut self, amount: u32) -> bool {
        if self.sp < amount {
            return false;
        }
        self.sp -= amount;
        true
    }
}

/// Battle flow phases, one-directional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Placement,
    Battle,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Hit,
    Miss,
}

/// One resolved attack, as recorded in the history
#[derive(Debug, Clone, Serialize)]
pub struct AttackLog {
    pub side: Side,
    pub position: Position,
    pub outcome: AttackOutcome,
    pub damage: Option<u32>,
    pub destroyed_unit: Option<UnitKind>,
    pub special_attack: Option<&'static str>,
}

/// A special attack whose effect outlives its activation (rapid fire)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveSpecialAttack {
    pub kind: SpecialAttackKind,
    pub side: Side,
    /// Caller-supplied clock, milliseconds
    pub started_ms: u64,
    pub ends_ms: u64,
}

/// Per-side special-attack usage counters (escalating SP costs)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageCounts {
    player: AHashMap<UnitKind, u32>,
    enemy: AHashMap<UnitKind, u32>,
}

impl UsageCounts {
    pub fn get(&self, side: Side, kind: UnitKind) -> u32 {
        match side {
            Side::Player => self.player.get(&kind).copied().unwrap_or(0),
            Side::Enemy => self.enemy.get(&kind).copied().unwrap_or(0),
        }
    }

    pub fn increment(&mut self, side: Side, kind: UnitKind) {
        let map = match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        };
        *map.entry(kind).or_insert(0) += 1;
    }
}

/// Complete battle state
#[derive(Debug, Clone, Serialize)]
pub struct BattleState {
    pub phase: BattlePhase,
    pub turn: Side,

    pub player_field: Field,
    pub enemy_field: Field,
    pub player_stats: Stats,
    pub enemy_stats: Stats,

    pub attack_history: Vec<AttackLog>,

    // Continuation control
    pub can_continue_attack: bool,
    pub consecutive_hits: u32,

    pub active_special: Option<ActiveSpecialAttack>,
    pub usage_counts: UsageCounts,
}

impl BattleState {
    pub fn new(
        player_field: Field,
        enemy_field: Field,
        player_stats: Stats,
        enemy_stats: Stats,
    ) -> Self {
        Self {
            phase: BattlePhase::Battle,
            turn: Side::Player,
            player_field,
            enemy_field,
            player_stats,
            enemy_stats,
            attack_history: Vec::new(),
            can_continue_attack: false,
            consecutive_hits: 0,
            active_special: None,
            usage_counts: UsageCounts::default(),
        }
    }

    pub fn field(&self, side: Side) -> &Field {
        match side {
            Side::Player => &self.player_field,
            Side::Enemy => &self.enemy_field,
        }
    }

    pub fn field_mut(&mut self, side: Side) -> &mut Field {
        match side {
            Side::Player => &mut self.player_field,
            Side::Enemy => &mut self.enemy_field,
        }
    }

    pub fn stats(&self, side: Side) -> &Stats {
        match side {
            Side::Player => &self.player_stats,
            Side::Enemy => &self.enemy_stats,
        }
    }

    pub fn stats_mut(&mut self, side: Side) -> &mut Stats {
        match side {
            Side::Player => &mut self.player_stats,
            Side::Enemy => &mut self.enemy_stats,
        }
    }

    /// The field the current attacker is shooting at
    pub fn target_field(&self) -> &Field {
        self.field(self.turn.opponent())
    }

    pub fn switch_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.can_continue_attack = false;
        self.consecutive_hits = 0;
    }

    pub fn reset_continuation(&mut self) {
        self.can_continue_attack = false;
        self.consecutive_hits = 0;
    }
}
