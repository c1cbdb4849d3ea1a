//! One side's board: cells plus placed units
//!
//! The field owns both layers and keeps them consistent: a cell's `unit`
//! reference is set iff some placed unit occupies that cell, and no two
//! units share a cell.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{GridSize, Position, Rotation};
use crate::grid::cell::{Cell, CellState};
use crate::units::UnitKind;

/// Unique identifier for a placed unit instance.
///
/// Kinds are not unique on a field (up to six mines), so cells reference
/// instances, not kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedUnitId(pub Uuid);

impl PlacedUnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlacedUnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedUnit {
    pub id: PlacedUnitId,
    pub kind: UnitKind,
    /// Top-left anchor of the rotated shape
    pub position: Position,
    pub rotation: Rotation,
    pub occupied_cells: Vec<Position>,
    pub hit_cells: Vec<Position>,
    pub is_destroyed: bool,
}

impl PlacedUnit {
    /// Destroyed iff every occupied cell has been hit
    pub fn all_cells_hit(&self) -> bool {
        self.hit_cells.len() == self.occupied_cells.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub size: GridSize,
    cells: Vec<Cell>,
    pub placed_units: Vec<PlacedUnit>,
}

impl Field {
    pub fn new(size: GridSize) -> Self {
        let mut cells = Vec::with_capacity(size.cell_count());
        for y in 0..size.height {
            for x in 0..size.width {
                cells.push(Cell::new(Position::new(x, y)));
            }
        }
        Self { size, cells, placed_units: Vec::new() }
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.size.contains(pos) {
            Some((pos.y * self.size.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn unit(&self, id: PlacedUnitId) -> Option<&PlacedUnit> {
        self.placed_units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: PlacedUnitId) -> Option<&mut PlacedUnit> {
        self.placed_units.iter_mut().find(|u| u.id == id)
    }

    /// The unit whose footprint covers `pos`, if any
    pub fn unit_at(&self, pos: Position) -> Option<&PlacedUnit> {
        self.placed_units
            .iter()
            .find(|u| u.occupied_cells.contains(&pos))
    }

    /// First undestroyed unit of the given kind
    pub fn unit_of_kind(&self, kind: UnitKind) -> Option<&PlacedUnit> {
        self.placed_units
            .iter()
            .find(|u| u.kind == kind && !u.is_destroyed)
    }

    /// Whether an undestroyed unit of this kind is fielded
    pub fn has_active(&self, kind: UnitKind) -> bool {
        self.unit_of_kind(kind).is_some()
    }

    pub fn placed_count(&self, kind: UnitKind) -> usize {
        self.placed_units.iter().filter(|u| u.kind == kind).count()
    }

    pub fn unexplored_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.is_unexplored())
            .map(|c| c.position)
            .collect()
    }

    /// Unexplored cells that contain a unit (hidden targets)
    pub fn hidden_occupied_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.is_unexplored() && c.unit.is_some())
            .map(|c| c.position)
            .collect()
    }

    pub fn occupied_cell_count(&self) -> usize {
        self.placed_units.iter().map(|u| u.occupied_cells.len()).sum()
    }

    pub fn unexplored_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_unexplored()).count()
    }

    /// Fraction of the board covered by units
    pub fn occupancy_rate(&self) -> f32 {
        self.occupied_cell_count() as f32 / self.size.cell_count() as f32
    }

    /// Record a placement that has already passed the legality checks.
    /// Stamps the instance id on every occupied cell.
    pub(crate) fn insert_unit(&mut self, unit: PlacedUnit) {
        for &pos in &unit.occupied_cells {
            if let Some(cell) = self.cell_mut(pos) {
                cell.unit = Some(unit.id);
            }
        }
        self.placed_units.push(unit);
    }

    /// Remove a placed unit, clearing its cells. Unknown ids are a no-op.
    pub fn remove_unit(&mut self, id: PlacedUnitId) {
        let Some(idx) = self.placed_units.iter().position(|u| u.id == id) else {
            return;
        };
        let unit = self.placed_units.remove(idx);
        for pos in unit.occupied_cells {
            if let Some(cell) = self.cell_mut(pos) {
                if cell.unit == Some(id) {
                    cell.unit = None;
                }
            }
        }
    }

    /// Mark a unit destroyed and flip all its cells to `Destroyed`
    pub(crate) fn destroy_unit(&mut self, id: PlacedUnitId) {
        let cells: Vec<Position> = match self.unit_mut(id) {
            Some(unit) => {
                unit.is_destroyed = true;
                unit.occupied_cells.clone()
            }
            None => return,
        };
        for pos in cells {
            if let Some(cell) = self.cell_mut(pos) {
                cell.state = CellState::Destroyed;
            }
        }
    }
}
