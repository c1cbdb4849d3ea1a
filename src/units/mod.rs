//! Unit and enemy master data
//!
//! All balance numbers live here: unit shapes, prices, passive effects,
//! special-attack patterns, and the enemy roster. Runtime state (placement,
//! hits) lives in `grid::field`; this module is static data only.

pub mod catalog;
pub mod enemies;

pub use catalog::{
    Character, SpecialAttackKind, SpecialAttackSpec, UnitCategory, UnitEffect, UnitKind,
};
pub use enemies::{Difficulty, Enemy, EnemyId};
