use thiserror::Error;

use crate::core::types::Position;
use crate::grid::placement::PlacementError;
use crate::units::UnitKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("Cell {0:?} has already been resolved")]
    CellAlreadyResolved(Position),

    #[error("Not enough SP: need {required}, have {available}")]
    InsufficientSp { required: u32, available: u32 },

    #[error("Unit {0:?} has no special attack")]
    NoSpecialAttack(UnitKind),

    #[error("Unit {0:?} is not on the field or already destroyed")]
    UnitUnavailable(UnitKind),

    #[error("HP is already full")]
    HpAlreadyFull,

    #[error("Action not allowed in the current phase")]
    WrongPhase,

    #[error("Unit placement is not complete")]
    PlacementIncomplete,

    #[error("The battle is already over")]
    BattleOver,

    #[error("It is not that side's turn")]
    NotYourTurn,
}

pub type Result<T> = std::result::Result<T, GameError>;
