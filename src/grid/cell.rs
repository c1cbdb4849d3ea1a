//! Cell state for one grid square

use serde::{Deserialize, Serialize};

use crate::core::types::Position;
use crate::grid::field::PlacedUnitId;

/// Resolution state of a cell. `Miss` and `Destroyed` are terminal;
/// `Hit` becomes `Destroyed` once every cell of the owning unit is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unexplored,
    Hit,
    Miss,
    Destroyed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub state: CellState,
    /// Instance id of the unit occupying this cell, if any
    pub unit: Option<PlacedUnitId>,
    /// Whether the opponent may see this cell's contents
    pub is_revealed: bool,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            state: CellState::Unexplored,
            unit: None,
            is_revealed: false,
        }
    }

    pub fn is_unexplored(&self) -> bool {
        self.state == CellState::Unexplored
    }
}
