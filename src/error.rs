//! Error types for board operations and layout decoding.

use thiserror::Error;

use crate::direction::{DirSet, Direction};

/// A rejected board operation. The board is never modified when one of these
/// is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("game has already started")]
    AlreadyStarted,
    #[error("game has not started yet")]
    NotStarted,
    #[error("invalid board position ({x}, {y})")]
    OutOfRange { x: usize, y: usize },
    #[error("tile ({x}, {y}) is not available as a start")]
    TileUnavailable { x: usize, y: usize },
    #[error("invalid move {dir}, valid directions are {valid}")]
    InvalidMove { dir: Direction, valid: DirSet },
    #[error("cannot block {requested} tiles with {free} free tiles")]
    BadBlockCount { requested: usize, free: usize },
    #[error("no solvable layout found after {attempts} attempts")]
    BudgetExhausted { attempts: u64 },
}

/// Why a layout code could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("layout code is too short")]
    TooShort,
    #[error("invalid hex digit {found:?} at position {index}")]
    BadDigit { index: usize, found: char },
    #[error("layout has zero height or width")]
    EmptyBoard,
    #[error("expected {expected} layout digits, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction {0:?}, expected up, down, left or right")]
pub struct ParseDirectionError(pub String);
