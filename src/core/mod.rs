pub mod error;
pub mod types;

pub use error::{GameError, Result};
pub use types::{GridSize, Position, Rotation, Side};
