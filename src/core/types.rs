//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// A cell coordinate on a battle grid. (0, 0) is the top-left corner,
/// x grows rightward and y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions
    pub fn manhattan_distance(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance between two positions
    pub fn euclidean_distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// The four orthogonal neighbors, clipped to the given grid
    pub fn neighbors(&self, size: GridSize) -> Vec<Position> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .iter()
            .map(|(dx, dy)| Position::new(self.x + dx, self.y + dy))
            .filter(|p| size.contains(*p))
            .collect()
    }
}

/// Dimensions of a battle grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Grid center, rounded down. Used as the AI fallback target.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Grid dimensions for an AR (area) stat level.
    ///
    /// Level 1 is the 7x7 base. Each level after that extends one axis,
    /// alternating width (even levels) and height (odd levels).
    pub fn from_area_level(level: u32) -> Self {
        let mut size = Self::new(7, 7);
        for l in 2..=level.max(1) {
            if l % 2 == 0 {
                size.width += 1;
            } else {
                size.height += 1;
            }
        }
        size
    }
}

/// Clockwise rotation applied to a unit shape at placement time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];
}

/// The two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}
