//! Property-based tests for geometry, placement, and damage invariants

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use gridstrike::battle::damage::calculate_damage;
use gridstrike::battle::special::{column_targets, cross_targets, row_targets};
use gridstrike::core::types::{GridSize, Position, Rotation};
use gridstrike::grid::geometry::{occupied_cells, rotate_shape, rotated_dimensions};
use gridstrike::grid::placement::place_unit;
use gridstrike::grid::Field;
use gridstrike::units::UnitKind;

fn any_unit_kind() -> impl Strategy<Value = UnitKind> {
    prop::sample::select(UnitKind::ALL.to_vec())
}

fn any_rotation() -> impl Strategy<Value = Rotation> {
    prop::sample::select(Rotation::ALL.to_vec())
}

proptest! {
    /// Rotating a shape never changes how many cells it occupies.
    #[test]
    fn prop_rotation_preserves_cell_count(
        kind in any_unit_kind(),
        rotation in any_rotation()
    ) {
        let rotated = rotate_shape(kind.shape(), rotation);
        let count: usize = rotated
            .iter()
            .map(|row| row.iter().filter(|&&c| c == 1).count())
            .sum();
        prop_assert_eq!(count, kind.size());
    }

    /// A successful placement puts every occupied cell inside the grid
    /// and stamps each with the unit's id.
    #[test]
    fn prop_placement_is_consistent(
        kind in any_unit_kind(),
        rotation in any_rotation(),
        x in 0i32..12,
        y in 0i32..12,
        width in 7i32..=12,
        height in 7i32..=12
    ) {
        let size = GridSize::new(width, height);
        let mut field = Field::new(size);
        let anchor = Position::new(x, y);

        if let Ok(id) = place_unit(&mut field, kind, anchor, rotation) {
            let unit = field.unit(id).unwrap();
            prop_assert_eq!(unit.occupied_cells.len(), kind.size());
            for &pos in &unit.occupied_cells {
                prop_assert!(size.contains(pos));
                prop_assert_eq!(field.cell(pos).unwrap().unit, Some(id));
            }
        } else {
            prop_assert!(field.placed_units.is_empty());
        }
    }

    /// Occupied cells always fall inside the rotated bounding box.
    #[test]
    fn prop_occupied_cells_within_rotated_bounds(
        kind in any_unit_kind(),
        rotation in any_rotation()
    ) {
        let anchor = Position::new(0, 0);
        let shape = kind.shape();
        let (w, h) = rotated_dimensions(shape[0].len() as i32, shape.len() as i32, rotation);
        for pos in occupied_cells(shape, anchor, rotation) {
            prop_assert!(pos.x >= 0 && pos.x < w);
            prop_assert!(pos.y >= 0 && pos.y < h);
        }
    }

    /// Area patterns stay in bounds and never repeat a cell.
    #[test]
    fn prop_area_patterns_in_bounds(
        x in 0i32..12,
        y in 0i32..12,
        width in 7i32..=20,
        height in 7i32..=20,
        multiplier in 1i32..=2
    ) {
        let size = GridSize::new(width, height);
        let center = Position::new(x.min(width - 1), y.min(height - 1));

        for cells in [
            cross_targets(center, size, multiplier),
            column_targets(center, size),
            row_targets(center, size),
        ] {
            let mut seen = Vec::new();
            for pos in cells {
                prop_assert!(size.contains(pos));
                prop_assert!(!seen.contains(&pos));
                seen.push(pos);
            }
        }
    }

    /// Damage is never below one, whatever the stats and variance.
    #[test]
    fn prop_damage_floor(
        at in 1u32..200,
        df in 0u32..200,
        atk_bonus in 0.0f32..2.0,
        def_bonus in 0.0f32..2.0,
        r in 0.9f32..=1.1
    ) {
        let damage = calculate_damage(at, atk_bonus, df, def_bonus, r);
        prop_assert!(damage >= 1);
    }

    /// With no defense, damage tracks the boosted attack value.
    #[test]
    fn prop_damage_monotonic_in_attack(at in 5u32..200) {
        let low = calculate_damage(at, 0.0, 0, 0.0, 1.0);
        let high = calculate_damage(at + 10, 0.0, 0, 0.0, 1.0);
        prop_assert!(high >= low);
    }
}
