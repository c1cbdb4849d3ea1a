//! Grid layer: geometry kernel, cell/field state, and placement rules
//!
//! Everything here is presentation-agnostic. A `Field` is the single source
//! of truth for one side's board: cell resolution states plus the placed
//! units that own them.

pub mod cell;
pub mod field;
pub mod geometry;
pub mod placement;

pub use cell::{Cell, CellState};
pub use field::{Field, PlacedUnit, PlacedUnitId};
pub use placement::{
    validate_placement, PlacementError, PlacementStats, PlacementValidation,
};
