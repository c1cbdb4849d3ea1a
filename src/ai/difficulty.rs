//! Tunable AI behavior profiles
//!
//! Each policy ships with a built-in profile; a TOML file with the same
//! shape can override it for balancing without a rebuild.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::placement::PlacementMode;
use crate::ai::state::{nearby_unexplored, random_choice};
use crate::ai::AiPolicy;
use crate::core::types::Position;
use crate::grid::Field;

/// Chebyshev radius a mistaken shot lands within
pub const MISTAKE_RADIUS: i32 = 2;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Behavior knobs for one AI opponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiProfile {
    /// Chance of a chosen shot being displaced to a nearby cell
    pub mistake_probability: f64,
    /// Chance per turn of attempting a special attack
    pub special_attack_rate: f64,
    pub placement: PlacementMode,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self {
            mistake_probability: 0.2,
            special_attack_rate: 0.2,
            placement: PlacementMode::Random,
        }
    }
}

impl AiProfile {
    /// The built-in profile for a policy
    pub fn for_policy(policy: AiPolicy) -> Self {
        match policy {
            AiPolicy::Balanced => Self {
                mistake_probability: 0.3,
                special_attack_rate: 0.1,
                placement: PlacementMode::Random,
            },
            AiPolicy::Aggressive => Self {
                mistake_probability: 0.2,
                special_attack_rate: 0.4,
                placement: PlacementMode::Random,
            },
            AiPolicy::Strategic => Self {
                mistake_probability: 0.1,
                special_attack_rate: 0.25,
                placement: PlacementMode::Strategic,
            },
            AiPolicy::Expert => Self {
                mistake_probability: 0.05,
                special_attack_rate: 0.35,
                placement: PlacementMode::Strategic,
            },
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Displace `intended` to a random unexplored cell nearby when the
    /// mistake roll comes up. Keeps the intended cell when nothing
    /// nearby is open.
    pub fn apply_mistake<R: Rng>(
        &self,
        field: &Field,
        intended: Position,
        rng: &mut R,
    ) -> Position {
        if self.mistake_probability > 0.0 && rng.gen_bool(self.mistake_probability) {
            let nearby = nearby_unexplored(field, intended, MISTAKE_RADIUS);
            if let Some(pos) = random_choice(&nearby, rng) {
                return pos;
            }
        }
        intended
    }
}
