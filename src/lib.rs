//! Gridstrike - deterministic engine for a turn-based grid battle game
//!
//! Two sides deploy units on hidden grids and trade shots until one
//! side's HP or fleet is gone. All randomness flows through seeded RNGs
//! passed in by the caller, so whole battles replay from a seed.

pub mod ai;
pub mod battle;
pub mod core;
pub mod grid;
pub mod save;
pub mod units;
