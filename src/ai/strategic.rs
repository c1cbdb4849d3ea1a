//! Strategic policy: scored pursuit plus a checkerboard opening
//!
//! With open hits, candidate neighbors are scored and the best one is
//! taken; a neighbor that extends a straight line of hits scores
//! highest. Without hits, the board is swept on the (x + y) even
//! checkerboard, which is guaranteed to touch every unit of size two
//! or more.

use rand::Rng;

use crate::ai::state::{adjacent_unexplored, random_choice, random_unexplored_or_center, AiState};
use crate::core::types::Position;
use crate::grid::{CellState, Field};

const BASE_SCORE: i32 = 1;
const LINE_BONUS: i32 = 2;

pub fn choose_target<R: Rng>(state: &mut AiState, field: &Field, rng: &mut R) -> Position {
    if state.has_open_hits() {
        if let Some(pos) = best_neighbor(state, field, rng) {
            return pos;
        }
    }
    if let Some(pos) = checkerboard_scan(state, field) {
        return pos;
    }
    random_unexplored_or_center(field, rng)
}

/// Highest-scoring unexplored neighbor of any open hit. A candidate
/// whose opposite side (relative to its hit) is also a hit extends a
/// line and gets the bonus.
fn best_neighbor<R: Rng>(state: &AiState, field: &Field, rng: &mut R) -> Option<Position> {
    let mut best: Vec<Position> = Vec::new();
    let mut best_score = i32::MIN;

    for &hit in &state.hit_cells {
        for candidate in adjacent_unexplored(field, hit) {
            let mut score = BASE_SCORE;
            let opposite =
                Position::new(hit.x * 2 - candidate.x, hit.y * 2 - candidate.y);
            if matches!(field.cell(opposite), Some(c) if c.state == CellState::Hit) {
                score += LINE_BONUS;
            }
            if score > best_score {
                best_score = score;
                best.clear();
            }
            if score == best_score && !best.contains(&candidate) {
                best.push(candidate);
            }
        }
    }
    random_choice(&best, rng)
}

/// Sweep the (x + y) even cells row-major from the saved cursor
fn checkerboard_scan(state: &mut AiState, field: &Field) -> Option<Position> {
    let width = field.size.width;
    let total = field.size.cell_count();
    for offset in 0..total {
        let idx = (state.scan_cursor + offset) % total;
        let pos = Position::new(idx as i32 % width, idx as i32 / width);
        if (pos.x + pos.y) % 2 != 0 {
            continue;
        }
        if matches!(field.cell(pos), Some(c) if c.is_unexplored()) {
            state.scan_cursor = (idx + 1) % total;
            return Some(pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridSize;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_checkerboard_covers_exact_set_on_three_grid() {
        let field = Field::new(GridSize::new(3, 3));
        let mut state = AiState::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            let pos = checkerboard_scan(&mut state, &field).unwrap();
            assert!(!seen.contains(&pos));
            seen.push(pos);
        }
        let expected = [
            Position::new(0, 0),
            Position::new(2, 0),
            Position::new(1, 1),
            Position::new(0, 2),
            Position::new(2, 2),
        ];
        for pos in expected {
            assert!(seen.contains(&pos));
        }
    }

    #[test]
    fn test_line_extension_preferred() {
        let mut field = Field::new(GridSize::new(7, 7));
        field.cell_mut(Position::new(2, 3)).unwrap().state = CellState::Hit;
        field.cell_mut(Position::new(3, 3)).unwrap().state = CellState::Hit;

        let mut state = AiState::default();
        state.hit_cells.push(Position::new(2, 3));
        state.hit_cells.push(Position::new(3, 3));

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let pos = choose_target(&mut state, &field, &mut rng);
            // Only the two cells extending the horizontal line qualify
            assert!(
                pos == Position::new(1, 3) || pos == Position::new(4, 3),
                "unexpected target {:?}",
                pos
            );
        }
    }

    #[test]
    fn test_opening_uses_checkerboard() {
        let field = Field::new(GridSize::new(7, 7));
        let mut state = AiState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pos = choose_target(&mut state, &field, &mut rng);
        assert_eq!((pos.x + pos.y) % 2, 0);
    }
}
