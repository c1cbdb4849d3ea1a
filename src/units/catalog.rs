//! Unit catalog: the closed set of deployable units and their static data

use serde::{Deserialize, Serialize};

/// Playable characters. A few units are exclusive to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Jack,
    Gaprino,
}

/// Broad unit role, used for shop grouping and AI placement priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Heal,
    Attack,
    Buff,
    Special,
    Counter,
}

/// Passive effect a unit grants while it is placed and undestroyed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitEffect {
    /// SP-funded HP restore, as a fraction of max HP per activation
    Heal { fraction: f32 },
    /// Additive attack bonus while undestroyed
    AttackBoost(f32),
    /// Additive defense bonus while undestroyed
    DefenseBoost(f32),
    /// Exp multiplier applied when the unit survives the battle
    ExpBoost(f32),
    /// Grants the opening turn if only this side fields one
    FirstStrike,
    /// Doubles the summed attack/defense bonus of other buff units
    AmplifyBuffs,
    /// Doubles the range of area special attacks
    DoubleSpecialRange,
    /// Landmine counter-attack on the side that triggers it
    Counter,
}

/// The seven special-attack archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAttackKind {
    /// Center cell plus a cardinal arm in each direction
    Cross,
    /// Every cell in the target's column
    Column,
    /// Every cell in the target's row
    Row,
    /// Up to three shots in one activation when the first misses
    Burst,
    /// Real-time window during which attacks do not switch the turn
    Rapid,
    /// Reveals one hidden occupied cell as a hit
    AutoDetect,
    /// Forces the turn back to the caster
    StealTurn,
}

/// Static description of a unit's special attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialAttackSpec {
    pub kind: SpecialAttackKind,
    pub name: &'static str,
    /// SP cost of the first use
    pub base_sp_cost: u32,
    /// Added to the cost for every previous use (escalating abilities only)
    pub sp_increase: u32,
}

impl SpecialAttackSpec {
    const fn flat(kind: SpecialAttackKind, name: &'static str, cost: u32) -> Self {
        Self { kind, name, base_sp_cost: cost, sp_increase: 0 }
    }

    const fn escalating(
        kind: SpecialAttackKind,
        name: &'static str,
        base: u32,
        increase: u32,
    ) -> Self {
        Self { kind, name, base_sp_cost: base, sp_increase: increase }
    }

    /// SP cost of the next use, given how many times it has been used
    pub fn cost(&self, uses: u32) -> u32 {
        self.base_sp_cost + self.sp_increase * uses
    }
}

/// The closed set of deployable units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Ambulance,
    RescueHeli,
    OilTanker,
    M4Tank,
    FireTruck,
    DumpTruck,
    GiantAirship,
    AircraftCarrier,
    PassengerPlane,
    Ferrari,
    Harrier,
    BomberPlane,
    Gunboat,
    MissileBoat,
    AttackHeli,
    ReconPlane,
    SpyVan,
    Mine,
}

impl UnitKind {
    pub const ALL: [UnitKind; 18] = [
        UnitKind::Ambulance,
        UnitKind::RescueHeli,
        UnitKind::OilTanker,
        UnitKind::M4Tank,
        UnitKind::FireTruck,
        UnitKind::DumpTruck,
        UnitKind::GiantAirship,
        UnitKind::AircraftCarrier,
        UnitKind::PassengerPlane,
        UnitKind::Ferrari,
        UnitKind::Harrier,
        UnitKind::BomberPlane,
        UnitKind::Gunboat,
        UnitKind::MissileBoat,
        UnitKind::AttackHeli,
        UnitKind::ReconPlane,
        UnitKind::SpyVan,
        UnitKind::Mine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Ambulance => "Ambulance",
            UnitKind::RescueHeli => "Rescue Helicopter",
            UnitKind::OilTanker => "Oil Tanker",
            UnitKind::M4Tank => "M4 Tank",
            UnitKind::FireTruck => "Fire Truck",
            UnitKind::DumpTruck => "Dump Truck",
            UnitKind::GiantAirship => "Giant Airship",
            UnitKind::AircraftCarrier => "Aircraft Carrier",
            UnitKind::PassengerPlane => "Passenger Plane",
            UnitKind::Ferrari => "Ferrari",
            UnitKind::Harrier => "Harrier",
            UnitKind::BomberPlane => "Bomber Plane",
            UnitKind::Gunboat => "Gunboat",
            UnitKind::MissileBoat => "Missile Boat",
            UnitKind::AttackHeli => "Attack Helicopter",
            UnitKind::ReconPlane => "Recon Plane",
            UnitKind::SpyVan => "Spy Van",
            UnitKind::Mine => "Mine",
        }
    }

    /// Unit footprint before rotation. 1 = occupied, 0 = empty.
    pub fn shape(&self) -> &'static [&'static [u8]] {
        match self {
            UnitKind::Ambulance => &[&[1, 1]],
            UnitKind::RescueHeli => &[&[1, 0], &[1, 1]],
            UnitKind::OilTanker => &[&[1, 1, 1, 1]],
            UnitKind::M4Tank => &[&[1, 1], &[1, 1]],
            UnitKind::FireTruck => &[&[1, 1, 1]],
            UnitKind::DumpTruck => &[&[1, 1]],
            UnitKind::GiantAirship => &[&[1, 1, 1, 1], &[1, 1, 1, 1]],
            UnitKind::AircraftCarrier => &[&[1, 1, 1, 1, 1]],
            UnitKind::PassengerPlane => &[&[1, 1, 1, 1]],
            UnitKind::Ferrari => &[&[1]],
            UnitKind::Harrier => &[&[1, 1]],
            UnitKind::BomberPlane => &[&[1, 1, 1]],
            UnitKind::Gunboat => &[&[1, 1, 1]],
            UnitKind::MissileBoat => &[&[1, 1]],
            UnitKind::AttackHeli => &[&[1, 1]],
            UnitKind::ReconPlane => &[&[1, 1]],
            UnitKind::SpyVan => &[&[1, 1]],
            UnitKind::Mine => &[&[1]],
        }
    }

    /// Number of cells the unit occupies
    pub fn size(&self) -> usize {
        self.shape()
            .iter()
            .map(|row| row.iter().filter(|&&c| c == 1).count())
            .sum()
    }

    pub fn category(&self) -> UnitCategory {
        match self {
            UnitKind::Ambulance | UnitKind::RescueHeli => UnitCategory::Heal,
            UnitKind::Harrier
            | UnitKind::BomberPlane
            | UnitKind::Gunboat
            | UnitKind::MissileBoat
            | UnitKind::AttackHeli
            | UnitKind::ReconPlane
            | UnitKind::SpyVan => UnitCategory::Attack,
            UnitKind::OilTanker
            | UnitKind::M4Tank
            | UnitKind::FireTruck
            | UnitKind::DumpTruck
            | UnitKind::PassengerPlane
            | UnitKind::Ferrari => UnitCategory::Buff,
            UnitKind::GiantAirship | UnitKind::AircraftCarrier => UnitCategory::Special,
            UnitKind::Mine => UnitCategory::Counter,
        }
    }

    pub fn price(&self) -> u32 {
        match self {
            UnitKind::Ambulance => 100,
            UnitKind::RescueHeli => 250,
            UnitKind::OilTanker => 200,
            UnitKind::M4Tank => 400,
            UnitKind::FireTruck => 150,
            UnitKind::DumpTruck => 120,
            UnitKind::GiantAirship => 800,
            UnitKind::AircraftCarrier => 700,
            UnitKind::PassengerPlane => 300,
            UnitKind::Ferrari => 500,
            UnitKind::Harrier => 350,
            UnitKind::BomberPlane => 400,
            UnitKind::Gunboat => 380,
            UnitKind::MissileBoat => 300,
            UnitKind::AttackHeli => 450,
            UnitKind::ReconPlane => 280,
            UnitKind::SpyVan => 320,
            UnitKind::Mine => 50,
        }
    }

    /// How many copies of this unit one side may place
    pub fn max_placement(&self) -> u32 {
        match self {
            UnitKind::Mine => 6,
            _ => 1,
        }
    }

    pub fn is_mine(&self) -> bool {
        matches!(self, UnitKind::Mine)
    }

    pub fn effect(&self) -> Option<UnitEffect> {
        match self {
            UnitKind::Ambulance => Some(UnitEffect::Heal { fraction: 0.3 }),
            UnitKind::RescueHeli => Some(UnitEffect::Heal { fraction: 0.5 }),
            UnitKind::OilTanker => Some(UnitEffect::AttackBoost(0.3)),
            UnitKind::M4Tank => Some(UnitEffect::AttackBoost(0.5)),
            UnitKind::FireTruck => Some(UnitEffect::DefenseBoost(0.2)),
            UnitKind::DumpTruck => Some(UnitEffect::DefenseBoost(0.3)),
            UnitKind::GiantAirship => Some(UnitEffect::AmplifyBuffs),
            UnitKind::AircraftCarrier => Some(UnitEffect::DoubleSpecialRange),
            UnitKind::PassengerPlane => Some(UnitEffect::ExpBoost(1.5)),
            UnitKind::Ferrari => Some(UnitEffect::FirstStrike),
            UnitKind::Mine => Some(UnitEffect::Counter),
            _ => None,
        }
    }

    pub fn special_attack(&self) -> Option<SpecialAttackSpec> {
        match self {
            UnitKind::Harrier => Some(SpecialAttackSpec::flat(
                SpecialAttackKind::Cross,
                "Cross Bombing",
                20,
            )),
            UnitKind::BomberPlane => Some(SpecialAttackSpec::flat(
                SpecialAttackKind::Column,
                "Column Bombing",
                25,
            )),
            UnitKind::Gunboat => Some(SpecialAttackSpec::flat(
                SpecialAttackKind::Row,
                "Row Bombing",
                25,
            )),
            UnitKind::MissileBoat => Some(SpecialAttackSpec::flat(
                SpecialAttackKind::Burst,
                "Burst Fire",
                15,
            )),
            UnitKind::AttackHeli => Some(SpecialAttackSpec::flat(
                SpecialAttackKind::Rapid,
                "Rapid Fire",
                30,
            )),
            UnitKind::ReconPlane => Some(SpecialAttackSpec::escalating(
                SpecialAttackKind::AutoDetect,
                "Guided Missile",
                10,
                5,
            )),
            UnitKind::SpyVan => Some(SpecialAttackSpec::escalating(
                SpecialAttackKind::StealTurn,
                "Sabotage",
                20,
                10,
            )),
            _ => None,
        }
    }

    /// Some units are only available to one character
    pub fn exclusive_for(&self) -> Option<Character> {
        match self {
            UnitKind::ReconPlane | UnitKind::SpyVan => Some(Character::Gaprino),
            UnitKind::Ferrari => Some(Character::Jack),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_size_consistency() {
        for kind in UnitKind::ALL {
            assert!(kind.size() > 0, "{:?} has an empty shape", kind);
            // Shape rows must all have the same width
            let shape = kind.shape();
            let width = shape[0].len();
            assert!(shape.iter().all(|row| row.len() == width));
        }
    }

    #[test]
    fn test_mine_is_single_cell() {
        assert_eq!(UnitKind::Mine.size(), 1);
        assert_eq!(UnitKind::Mine.max_placement(), 6);
    }

    #[test]
    fn test_non_mine_placement_limit() {
        for kind in UnitKind::ALL {
            if !kind.is_mine() {
                assert_eq!(kind.max_placement(), 1);
            }
        }
    }

    #[test]
    fn test_escalating_cost() {
        let spec = UnitKind::SpyVan.special_attack().unwrap();
        assert_eq!(spec.cost(0), 20);
        assert_eq!(spec.cost(1), 30);
        assert_eq!(spec.cost(3), 50);

        let flat = UnitKind::Harrier.special_attack().unwrap();
        assert_eq!(flat.cost(0), flat.cost(5));
    }
}
