//! Balanced policy: even mix of pursuit and exploration

use rand::Rng;

use crate::ai::state::{
    adjacent_unexplored, random_choice, random_unexplored_or_center, AiState,
};
use crate::core::types::Position;
use crate::grid::Field;

/// Chance of following up on an open hit instead of exploring
const PURSUE_RATE: f64 = 0.5;

pub fn choose_target<R: Rng>(state: &AiState, field: &Field, rng: &mut R) -> Position {
    if state.has_open_hits() && rng.gen_bool(PURSUE_RATE) {
        if let Some(pos) = pursue(state, field, rng) {
            return pos;
        }
    }
    random_unexplored_or_center(field, rng)
}

/// Random unexplored neighbor of a random open hit
pub(crate) fn pursue<R: Rng>(
    state: &AiState,
    field: &Field,
    rng: &mut R,
) -> Option<Position> {
    let hit = random_choice(&state.hit_cells, rng)?;
    random_choice(&adjacent_unexplored(field, hit), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridSize;
    use crate::grid::CellState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_target_is_always_unexplored() {
        let field = Field::new(GridSize::new(7, 7));
        let state = AiState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let pos = choose_target(&state, &field, &mut rng);
            assert!(field.cell(pos).unwrap().is_unexplored());
        }
    }

    #[test]
    fn test_pursuit_picks_a_neighbor() {
        let mut field = Field::new(GridSize::new(7, 7));
        field.cell_mut(Position::new(3, 3)).unwrap().state = CellState::Hit;
        let mut state = AiState::default();
        state.hit_cells.push(Position::new(3, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pos = pursue(&state, &field, &mut rng).unwrap();
        assert_eq!(pos.manhattan_distance(&Position::new(3, 3)), 1);
    }
}
