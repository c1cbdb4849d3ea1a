//! Battle layer: combat resolution, special attacks, victory, orchestration
//!
//! `BattleSession` owns the single mutable `BattleState` and drives the
//! phase/turn state machine. The resolver and special-attack functions are
//! free functions over `BattleState` so they stay independently testable.

pub mod combat;
pub mod damage;
pub mod report;
pub mod session;
pub mod special;
pub mod state;
pub mod victory;

pub use combat::{execute_attack, AttackResult, CounterStrike};
pub use report::{generate_report, BattleReport};
pub use session::{BattleSession, EnemyAction};
pub use special::{execute_heal, execute_special_attack, SpecialOutcome};
pub use state::{
    ActiveSpecialAttack, AttackLog, AttackOutcome, BattlePhase, BattleState, Stats,
    UsageCounts,
};
pub use victory::{check_victory, VictoryReason, VictoryResult};
