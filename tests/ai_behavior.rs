//! AI behavior integration tests

use gridstrike::ai::{placement, AiController, AiPolicy, AiProfile, PlacementMode};
use gridstrike::core::types::GridSize;
use gridstrike::grid::Field;
use gridstrike::units::{Enemy, UnitKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ALL_POLICIES: [AiPolicy; 4] = [
    AiPolicy::Balanced,
    AiPolicy::Aggressive,
    AiPolicy::Strategic,
    AiPolicy::Expert,
];

#[test]
fn test_every_roster_places_fully_in_both_modes() {
    for enemy in Enemy::roster() {
        for mode in [PlacementMode::Random, PlacementMode::Strategic] {
            let mut field = Field::new(GridSize::from_area_level(enemy.stats.ar));
            let mut rng = ChaCha8Rng::seed_from_u64(enemy.base_reward as u64);
            placement::place_units(&mut field, &enemy.units, mode, &mut rng);
            assert_eq!(
                field.placed_units.len(),
                enemy.units.len(),
                "{} roster did not fit in {:?} mode",
                enemy.name,
                mode
            );
        }
    }
}

#[test]
fn test_placements_never_overlap() {
    for seed in 0..20 {
        let mut field = Field::new(GridSize::new(7, 7));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let enemy = &Enemy::roster()[3]; // largest roster
        placement::place_units(
            &mut field,
            &enemy.units,
            PlacementMode::Strategic,
            &mut rng,
        );

        let mut seen = Vec::new();
        for unit in &field.placed_units {
            for &pos in &unit.occupied_cells {
                assert!(!seen.contains(&pos), "cell {:?} double-booked", pos);
                seen.push(pos);
            }
        }
    }
}

#[test]
fn test_targets_are_always_fresh_until_board_exhausted() {
    for policy in ALL_POLICIES {
        let mut field = Field::new(GridSize::new(7, 7));
        let mut ai = AiController::with_defaults(policy);
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..field.size.cell_count() {
            let pos = ai.next_target(&field, &mut rng);
            let cell = field.cell(pos).unwrap();
            assert!(
                cell.is_unexplored(),
                "{:?} revisited {:?}",
                policy,
                pos
            );
            field.cell_mut(pos).unwrap().state = gridstrike::grid::CellState::Miss;
            ai.observe(&field, pos, false);
        }
        assert_eq!(field.unexplored_count(), 0);
    }
}

#[test]
fn test_mistakes_disabled_means_deterministic_expert() {
    let profile = AiProfile {
        mistake_probability: 0.0,
        ..AiProfile::for_policy(AiPolicy::Expert)
    };
    let field = Field::new(GridSize::new(7, 7));

    let mut a = AiController::new(AiPolicy::Expert, profile);
    let mut b = AiController::new(AiPolicy::Expert, profile);
    let mut rng_a = ChaCha8Rng::seed_from_u64(5);
    let mut rng_b = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..10 {
        assert_eq!(a.next_target(&field, &mut rng_a), b.next_target(&field, &mut rng_b));
    }
}

#[test]
fn test_strategic_pursuit_sinks_a_ship_quickly() {
    use gridstrike::core::types::{Position, Rotation};
    use gridstrike::grid::placement::place_unit;

    // A 1x4 tanker; give the AI its first hit and count the shots to
    // finish it
    let mut field = Field::new(GridSize::new(7, 7));
    place_unit(&mut field, UnitKind::OilTanker, Position::new(1, 3), Rotation::Deg0)
        .unwrap();

    let profile = AiProfile {
        mistake_probability: 0.0,
        ..AiProfile::for_policy(AiPolicy::Strategic)
    };
    let mut ai = AiController::new(AiPolicy::Strategic, profile);
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    // Seed the hunt
    let first = Position::new(2, 3);
    let unit_id = field.cell(first).unwrap().unit.unwrap();
    field.cell_mut(first).unwrap().state = gridstrike::grid::CellState::Hit;
    field
        .placed_units
        .iter_mut()
        .find(|u| u.id == unit_id)
        .unwrap()
        .hit_cells
        .push(first);
    ai.observe(&field, first, true);

    let mut shots = 0;
    while !field.placed_units[0].is_destroyed && shots < 12 {
        let pos = ai.next_target(&field, &mut rng);
        shots += 1;
        let hit = field.cell(pos).unwrap().unit.is_some();
        if hit {
            field.cell_mut(pos).unwrap().state = gridstrike::grid::CellState::Hit;
            let unit = field
                .placed_units
                .iter_mut()
                .find(|u| u.occupied_cells.contains(&pos))
                .unwrap();
            unit.hit_cells.push(pos);
            if unit.hit_cells.len() == unit.occupied_cells.len() {
                unit.is_destroyed = true;
            }
        } else {
            field.cell_mut(pos).unwrap().state = gridstrike::grid::CellState::Miss;
        }
        ai.observe(&field, pos, hit);
    }

    assert!(field.placed_units[0].is_destroyed);
    // Pursuit should finish a 4-cell ship well inside 12 shots
    assert!(shots <= 10, "took {} shots", shots);
}
