//! Enemy roster master data

use serde::{Deserialize, Serialize};

use crate::ai::AiPolicy;
use crate::battle::Stats;
use crate::units::UnitKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyId {
    CarrierA,
    MadmanB,
    ColonelZ,
    BomberJ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Nightmare,
}

/// Static description of an opponent
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub name: &'static str,
    pub stats: Stats,
    pub units: Vec<UnitKind>,
    pub policy: AiPolicy,
    pub base_reward: u32,
    pub difficulty: Difficulty,
}

impl Enemy {
    pub fn get(id: EnemyId) -> Enemy {
        match id {
            EnemyId::CarrierA => Enemy {
                id,
                name: "Carrier A",
                stats: Stats::new(80, 30, 8, 3, 1),
                units: vec![
                    UnitKind::DumpTruck,
                    UnitKind::OilTanker,
                    UnitKind::Harrier,
                    UnitKind::Mine,
                    UnitKind::Mine,
                ],
                policy: AiPolicy::Balanced,
                base_reward: 100,
                difficulty: Difficulty::Easy,
            },
            EnemyId::MadmanB => Enemy {
                id,
                name: "Madman B",
                stats: Stats::new(100, 50, 12, 4, 2),
                units: vec![
                    UnitKind::M4Tank,
                    UnitKind::FireTruck,
                    UnitKind::MissileBoat,
                    UnitKind::AttackHeli,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                ],
                policy: AiPolicy::Aggressive,
                base_reward: 200,
                difficulty: Difficulty::Medium,
            },
            EnemyId::ColonelZ => Enemy {
                id,
                name: "Colonel Z",
                stats: Stats::new(120, 60, 14, 6, 3),
                units: vec![
                    UnitKind::AircraftCarrier,
                    UnitKind::M4Tank,
                    UnitKind::DumpTruck,
                    UnitKind::BomberPlane,
                    UnitKind::Gunboat,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                ],
                policy: AiPolicy::Strategic,
                base_reward: 350,
                difficulty: Difficulty::Hard,
            },
            EnemyId::BomberJ => Enemy {
                id,
                name: "Bomber J",
                stats: Stats::new(150, 80, 16, 8, 4),
                units: vec![
                    UnitKind::GiantAirship,
                    UnitKind::AircraftCarrier,
                    UnitKind::OilTanker,
                    UnitKind::FireTruck,
                    UnitKind::Harrier,
                    UnitKind::BomberPlane,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                    UnitKind::Mine,
                ],
                policy: AiPolicy::Expert,
                base_reward: 500,
                difficulty: Difficulty::Nightmare,
            },
        }
    }

    pub fn roster() -> Vec<Enemy> {
        [
            EnemyId::CarrierA,
            EnemyId::MadmanB,
            EnemyId::ColonelZ,
            EnemyId::BomberJ,
        ]
        .into_iter()
        .map(Enemy::get)
        .collect()
    }
}
