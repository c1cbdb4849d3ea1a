//! Save data: player progression, owned units, and campaign progress
//!
//! Serialized as JSON. Validation runs on load so a hand-edited or
//! truncated file is rejected instead of corrupting a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::{BattleReport, Stats};
use crate::units::{Character, EnemyId, UnitKind};

pub const SAVE_VERSION: u32 = 1;

/// Highest purchasable AR level (12x12 grid)
pub const MAX_AR_LEVEL: u32 = 11;

/// Stat growth per level-up
pub const HP_PER_LEVEL: u32 = 10;
pub const SP_PER_LEVEL: u32 = 5;
pub const AT_PER_LEVEL: u32 = 2;
pub const DF_PER_LEVEL: u32 = 1;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),

    #[error("save data is inconsistent: {0}")]
    Corrupt(String),

    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Upgradeable stat tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Hp,
    Sp,
    At,
    Df,
    Ar,
}

impl StatKind {
    /// Money cost of the first level-up
    pub fn base_cost(&self) -> u32 {
        match self {
            StatKind::Hp => 100,
            StatKind::Sp => 100,
            StatKind::At => 150,
            StatKind::Df => 150,
            StatKind::Ar => 300,
        }
    }
}

/// Cost of buying the next level when `level` is the current one.
/// Grows geometrically: base * 1.3^(level - 1).
pub fn level_up_cost(stat: StatKind, level: u32) -> u32 {
    let base = stat.base_cost() as f64;
    (base * 1.3_f64.powi(level.max(1) as i32 - 1)).round() as u32
}

/// Current level of each stat track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLevels {
    pub hp: u32,
    pub sp: u32,
    pub at: u32,
    pub df: u32,
    pub ar: u32,
}

impl Default for StatLevels {
    fn default() -> Self {
        Self { hp: 1, sp: 1, at: 1, df: 1, ar: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub character: Character,
    pub stats: Stats,
    pub levels: StatLevels,
    pub money: u32,
    pub exp: u32,
    /// One entry per owned copy; mines may repeat
    pub owned_units: Vec<UnitKind>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub defeated_enemies: Vec<EnemyId>,
    pub total_battles: u32,
    pub total_victories: u32,
    pub total_defeats: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Unix epoch milliseconds of the last write
    pub last_saved_ms: u64,
    pub player: PlayerSave,
    pub progress: Progress,
}

impl SaveData {
    /// A fresh save for a new game
    pub fn new(character: Character) -> Self {
        Self {
            version: SAVE_VERSION,
            last_saved_ms: 0,
            player: PlayerSave {
                character,
                stats: Stats::new(100, 50, 10, 5, 1),
                levels: StatLevels::default(),
                money: 300,
                exp: 0,
                owned_units: vec![UnitKind::Ambulance, UnitKind::DumpTruck, UnitKind::Mine],
            },
            progress: Progress::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SaveError> {
        let save: SaveData = serde_json::from_str(text)?;
        save.validate()?;
        Ok(save)
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(self.version));
        }
        if self.player.stats.max_hp == 0 {
            return Err(SaveError::Corrupt("max HP is zero".into()));
        }
        if self.player.stats.hp > self.player.stats.max_hp
            || self.player.stats.sp > self.player.stats.max_sp
        {
            return Err(SaveError::Corrupt("current stats exceed maxima".into()));
        }
        if self.player.levels.ar > MAX_AR_LEVEL {
            return Err(SaveError::Corrupt("AR level above maximum".into()));
        }
        for &kind in &self.player.owned_units {
            if let Some(owner) = kind.exclusive_for() {
                if owner != self.player.character {
                    return Err(SaveError::Corrupt(format!(
                        "{} is exclusive to another character",
                        kind.name()
                    )));
                }
            }
        }
        let mines = self
            .player
            .owned_units
            .iter()
            .filter(|u| u.is_mine())
            .count();
        if mines > UnitKind::Mine.max_placement() as usize {
            return Err(SaveError::Corrupt("too many mines owned".into()));
        }
        if self.progress.total_victories + self.progress.total_defeats
            > self.progress.total_battles
        {
            return Err(SaveError::Corrupt("battle counters disagree".into()));
        }
        Ok(())
    }

    /// Whether the player can afford the next level of `stat`
    pub fn can_level_up(&self, stat: StatKind) -> bool {
        let level = self.current_level(stat);
        if stat == StatKind::Ar && level >= MAX_AR_LEVEL {
            return false;
        }
        self.player.money >= level_up_cost(stat, level)
    }

    fn current_level(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Hp => self.player.levels.hp,
            StatKind::Sp => self.player.levels.sp,
            StatKind::At => self.player.levels.at,
            StatKind::Df => self.player.levels.df,
            StatKind::Ar => self.player.levels.ar,
        }
    }

    /// Buy one level of `stat`. Returns the money spent, or `None` if
    /// it cannot be afforded or AR is maxed out.
    pub fn level_up(&mut self, stat: StatKind) -> Option<u32> {
        if !self.can_level_up(stat) {
            return None;
        }
        let cost = level_up_cost(stat, self.current_level(stat));
        self.player.money -= cost;

        let stats = &mut self.player.stats;
        match stat {
            StatKind::Hp => {
                self.player.levels.hp += 1;
                stats.max_hp += HP_PER_LEVEL;
                stats.hp += HP_PER_LEVEL;
            }
            StatKind::Sp => {
                self.player.levels.sp += 1;
                stats.max_sp += SP_PER_LEVEL;
                stats.sp += SP_PER_LEVEL;
            }
            StatKind::At => {
                self.player.levels.at += 1;
                stats.at += AT_PER_LEVEL;
            }
            StatKind::Df => {
                self.player.levels.df += 1;
                stats.df += DF_PER_LEVEL;
            }
            StatKind::Ar => {
                self.player.levels.ar += 1;
                stats.ar += 1;
            }
        }
        Some(cost)
    }

    /// Fold a finished battle into progression
    pub fn record_battle(&mut self, report: &BattleReport, enemy_id: EnemyId) {
        self.progress.total_battles += 1;
        if report.player_won {
            self.progress.total_victories += 1;
            if !self.progress.defeated_enemies.contains(&enemy_id) {
                self.progress.defeated_enemies.push(enemy_id);
            }
        } else {
            self.progress.total_defeats += 1;
        }
        self.player.money += report.money_reward;
        self.player.exp += report.exp_gained;
    }
}
