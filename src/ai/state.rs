//! Shared targeting memory and helpers used by every attack policy

use rand::Rng;

use crate::core::types::Position;
use crate::grid::{CellState, Field};

/// Consecutive misses after which pursuit memory is dropped
pub const MISS_RESET_THRESHOLD: u32 = 5;

/// What the AI remembers about its shots so far
#[derive(Debug, Clone, Default)]
pub struct AiState {
    /// Hits on units not yet destroyed, in shot order
    pub hit_cells: Vec<Position>,
    pub consecutive_misses: u32,
    /// Row-major scan cursor for the checkerboard opening
    pub scan_cursor: usize,
}

impl AiState {
    /// Fold one resolved shot into memory. Destroyed units drop out of
    /// the pursuit list; a long miss streak resets it entirely.
    pub fn update_after_attack(&mut self, field: &Field, target: Position, hit: bool) {
        if hit {
            self.consecutive_misses = 0;
            if !self.hit_cells.contains(&target) {
                self.hit_cells.push(target);
            }
        } else {
            self.consecutive_misses += 1;
            if self.consecutive_misses > MISS_RESET_THRESHOLD {
                self.hit_cells.clear();
                self.consecutive_misses = 0;
            }
        }
        // Prune hits whose unit has since been destroyed
        self.hit_cells.retain(|&pos| {
            matches!(field.cell(pos), Some(cell) if cell.state == CellState::Hit)
        });
    }

    pub fn has_open_hits(&self) -> bool {
        !self.hit_cells.is_empty()
    }
}

/// Uniform pick from a non-empty slice
pub fn random_choice<T: Copy, R: Rng>(items: &[T], rng: &mut R) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.gen_range(0..items.len())])
    }
}

/// Unexplored cells orthogonally adjacent to `pos`
pub fn adjacent_unexplored(field: &Field, pos: Position) -> Vec<Position> {
    pos.neighbors(field.size)
        .into_iter()
        .filter(|&p| matches!(field.cell(p), Some(c) if c.is_unexplored()))
        .collect()
}

/// Unexplored cells within a Chebyshev radius of `pos`, excluding it
pub fn nearby_unexplored(field: &Field, pos: Position, radius: i32) -> Vec<Position> {
    let mut cells = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            let p = Position::new(pos.x + dx, pos.y + dy);
            if matches!(field.cell(p), Some(c) if c.is_unexplored()) {
                cells.push(p);
            }
        }
    }
    cells
}

/// Random unexplored cell, falling back to the grid center
pub fn random_unexplored_or_center<R: Rng>(field: &Field, rng: &mut R) -> Position {
    random_choice(&field.unexplored_cells(), rng).unwrap_or_else(|| field.size.center())
}
