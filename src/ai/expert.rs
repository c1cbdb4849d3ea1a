//! Expert policy: probability heat map over the unexplored cells
//!
//! Every unexplored cell starts at weight 1.0, then multiplicative
//! heuristics shape the map: edge cells are discounted, cells next to
//! an open hit are boosted, and cells that extend a straight line of
//! hits are boosted harder. Weights are normalized by the maximum and
//! the best cell wins, random among ties.

use rand::Rng;

use crate::ai::state::{random_choice, random_unexplored_or_center};
use crate::core::types::Position;
use crate::grid::{CellState, Field};

const EDGE_FACTOR: f32 = 0.8;
const HIT_ADJACENT_FACTOR: f32 = 1.5;
const LINE_EXTENSION_FACTOR: f32 = 2.0;

/// The heat map reads everything it needs off the field itself, so
/// this policy carries no extra memory.
pub fn choose_target<R: Rng>(field: &Field, rng: &mut R) -> Position {
    match most_probable_cell(field, rng) {
        Some(pos) => pos,
        None => random_unexplored_or_center(field, rng),
    }
}

/// The unexplored cell with the highest heat-map weight
pub fn most_probable_cell<R: Rng>(field: &Field, rng: &mut R) -> Option<Position> {
    let weights = heat_map(field);
    let max = weights
        .iter()
        .map(|&(_, w)| w)
        .fold(f32::MIN, f32::max);
    let best: Vec<Position> = weights
        .iter()
        .filter(|&&(_, w)| (w - max).abs() < f32::EPSILON)
        .map(|&(pos, _)| pos)
        .collect();
    random_choice(&best, rng)
}

/// Normalized weights for every unexplored cell
pub fn heat_map(field: &Field) -> Vec<(Position, f32)> {
    let mut weights: Vec<(Position, f32)> = field
        .unexplored_cells()
        .into_iter()
        .map(|pos| (pos, cell_weight(field, pos)))
        .collect();

    let max = weights.iter().map(|&(_, w)| w).fold(0.0_f32, f32::max);
    if max > 0.0 {
        for (_, w) in &mut weights {
            *w /= max;
        }
    }
    weights
}

fn cell_weight(field: &Field, pos: Position) -> f32 {
    let mut w = 1.0;

    if pos.x == 0 || pos.y == 0 || pos.x == field.size.width - 1 || pos.y == field.size.height - 1
    {
        w *= EDGE_FACTOR;
    }

    let hit_at = |p: Position| matches!(field.cell(p), Some(c) if c.state == CellState::Hit);

    let mut adjacent_hit = false;
    let mut extends_line = false;
    for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
        let near = Position::new(pos.x + dx, pos.y + dy);
        if hit_at(near) {
            adjacent_hit = true;
            let beyond = Position::new(pos.x + 2 * dx, pos.y + 2 * dy);
            if hit_at(beyond) {
                extends_line = true;
            }
        }
    }
    if adjacent_hit {
        w *= HIT_ADJACENT_FACTOR;
    }
    if extends_line {
        w *= LINE_EXTENSION_FACTOR;
    }
    w
}
