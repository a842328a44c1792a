//! Error types for Knight Trap
//!
//! Only contract violations and I/O problems are errors. Rule violations
//! (illegal knight shapes, stepping on a bomb) are normal turn outcomes and
//! show up as a terminal session state instead.

use crate::core::Position;
use crate::game::GameStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnightTrapError {
    #[error("Session is not in progress (status: {0:?})")]
    SessionNotInProgress(GameStatus),

    #[error("Square {pos} is outside a {size}x{size} board")]
    OutOfBounds { pos: Position, size: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown adversary: {0}")]
    UnknownAdversary(u32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KnightTrapError>;
