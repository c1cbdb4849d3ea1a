//! Shape rotation math
//!
//! Shapes are row-major binary matrices. Rotation is clockwise, and position
//! rotation always uses the unit's own pre-rotation dimensions so a rotated
//! unit's occupied cells match its rotated shape exactly.

use crate::core::types::{Position, Rotation};

/// A rotated copy of a unit footprint
pub fn rotate_shape(shape: &[&[u8]], rotation: Rotation) -> Vec<Vec<u8>> {
    let height = shape.len();
    let width = shape[0].len();

    match rotation {
        Rotation::Deg0 => shape.iter().map(|row| row.to_vec()).collect(),
        Rotation::Deg90 => {
            let mut rotated = vec![vec![0u8; height]; width];
            for (y, row) in shape.iter().enumerate() {
                for (x, &v) in row.iter().enumerate() {
                    rotated[x][height - 1 - y] = v;
                }
            }
            rotated
        }
        Rotation::Deg180 => shape
            .iter()
            .rev()
            .map(|row| row.iter().rev().copied().collect())
            .collect(),
        Rotation::Deg270 => {
            let mut rotated = vec![vec![0u8; height]; width];
            for (y, row) in shape.iter().enumerate() {
                for (x, &v) in row.iter().enumerate() {
                    rotated[width - 1 - x][y] = v;
                }
            }
            rotated
        }
    }
}

/// Where a cell of the unrotated shape lands after rotation.
///
/// `width`/`height` are the shape's pre-rotation dimensions.
pub fn rotate_position(pos: Position, rotation: Rotation, width: i32, height: i32) -> Position {
    match rotation {
        Rotation::Deg0 => pos,
        Rotation::Deg90 => Position::new(height - 1 - pos.y, pos.x),
        Rotation::Deg180 => Position::new(width - 1 - pos.x, height - 1 - pos.y),
        Rotation::Deg270 => Position::new(pos.y, width - 1 - pos.x),
    }
}

/// Shape dimensions after rotation: (width, height)
pub fn rotated_dimensions(width: i32, height: i32, rotation: Rotation) -> (i32, i32) {
    match rotation {
        Rotation::Deg0 | Rotation::Deg180 => (width, height),
        Rotation::Deg90 | Rotation::Deg270 => (height, width),
    }
}

/// Cells a shape occupies when anchored (top-left) at `anchor`
pub fn occupied_cells(shape: &[&[u8]], anchor: Position, rotation: Rotation) -> Vec<Position> {
    let rotated = rotate_shape(shape, rotation);
    let mut cells = Vec::new();
    for (y, row) in rotated.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v == 1 {
                cells.push(Position::new(anchor.x + x as i32, anchor.y + y as i32));
            }
        }
    }
    cells
}
