//! Placement legality and deployment validation
//!
//! Count limits are checked before geometry so the caller always gets the
//! most meaningful failure reason.

use thiserror::Error;

use crate::core::types::{Position, Rotation};
use crate::grid::field::{Field, PlacedUnit, PlacedUnitId};
use crate::grid::geometry::occupied_cells;
use crate::units::UnitKind;

/// Minimum units for a deployment to count as complete
pub const MIN_UNITS: usize = 3;
/// Occupancy below this fraction draws a validation warning
pub const LOW_OCCUPANCY: f32 = 0.2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Mines are limited to {0} per field")]
    MineLimitReached(u32),

    #[error("{} is already placed", .0.name())]
    AlreadyPlaced(UnitKind),

    #[error("Unit extends outside the field")]
    OutOfBounds,

    #[error("Another unit already occupies those cells")]
    Overlap,
}

/// Whether the unit would fit: in bounds and on free cells only
pub fn can_place_unit(
    field: &Field,
    kind: UnitKind,
    anchor: Position,
    rotation: Rotation,
) -> bool {
    occupied_cells(kind.shape(), anchor, rotation)
        .iter()
        .all(|&pos| matches!(field.cell(pos), Some(cell) if cell.unit.is_none()))
}

/// Full legality check with a specific failure reason
pub fn check_placement(
    field: &Field,
    kind: UnitKind,
    anchor: Position,
    rotation: Rotation,
) -> Result<Vec<Position>, PlacementError> {
    let limit = kind.max_placement();
    if field.placed_count(kind) >= limit as usize {
        return Err(if kind.is_mine() {
            PlacementError::MineLimitReached(limit)
        } else {
            PlacementError::AlreadyPlaced(kind)
        });
    }

    let cells = occupied_cells(kind.shape(), anchor, rotation);
    for &pos in &cells {
        match field.cell(pos) {
            None => return Err(PlacementError::OutOfBounds),
            Some(cell) if cell.unit.is_some() => return Err(PlacementError::Overlap),
            Some(_) => {}
        }
    }
    Ok(cells)
}

/// Place a unit, stamping its id on every occupied cell
pub fn place_unit(
    field: &mut Field,
    kind: UnitKind,
    anchor: Position,
    rotation: Rotation,
) -> Result<PlacedUnitId, PlacementError> {
    let cells = check_placement(field, kind, anchor, rotation)?;
    let id = PlacedUnitId::new();
    field.insert_unit(PlacedUnit {
        id,
        kind,
        position: anchor,
        rotation,
        occupied_cells: cells,
        hit_cells: Vec::new(),
        is_destroyed: false,
    });
    Ok(id)
}

/// Deployment check result. Errors block battle start; warnings do not.
#[derive(Debug, Clone, Default)]
pub struct PlacementValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PlacementValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Valid and enough units to start a battle
    pub fn is_complete(&self, field: &Field) -> bool {
        self.is_valid() && field.placed_units.len() >= MIN_UNITS
    }
}

/// Validate a whole deployment: hard consistency errors plus soft
/// composition warnings.
pub fn validate_placement(field: &Field) -> PlacementValidation {
    let mut result = PlacementValidation::default();

    if field.placed_units.is_empty() {
        result.errors.push("No units have been placed".to_string());
    }
    if field.placed_units.len() < MIN_UNITS {
        result.warnings.push(format!(
            "At least {} units are recommended (currently {})",
            MIN_UNITS,
            field.placed_units.len()
        ));
    }
    if field.occupancy_rate() < LOW_OCCUPANCY {
        result.warnings.push(format!(
            "Field occupancy is low ({}%)",
            (field.occupancy_rate() * 100.0) as u32
        ));
    }

    // Cross-check every unit's footprint against the cell layer
    for unit in &field.placed_units {
        for &pos in &unit.occupied_cells {
            match field.cell(pos) {
                None => result.errors.push(format!(
                    "{} occupies ({}, {}), outside the field",
                    unit.kind.name(),
                    pos.x,
                    pos.y
                )),
                Some(cell) if cell.unit != Some(unit.id) => result.errors.push(format!(
                    "{} footprint does not match the cell layer at ({}, {})",
                    unit.kind.name(),
                    pos.x,
                    pos.y
                )),
                Some(_) => {}
            }
        }
    }

    result
}

/// Whether the deployment is ready for battle
pub fn is_placement_complete(field: &Field) -> bool {
    validate_placement(field).is_complete(field)
}

/// Deployment summary used by shop/placement screens
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementStats {
    pub total_units: usize,
    pub occupied_cells: usize,
    pub occupancy_rate: f32,
    pub mine_count: usize,
    pub has_minimum_units: bool,
}

pub fn placement_stats(field: &Field) -> PlacementStats {
    PlacementStats {
        total_units: field.placed_units.len(),
        occupied_cells: field.occupied_cell_count(),
        occupancy_rate: field.occupancy_rate(),
        mine_count: field.placed_count(UnitKind::Mine),
        has_minimum_units: field.placed_units.len() >= MIN_UNITS,
    }
}
