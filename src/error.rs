//! Error types for the Mineopoly engine

use crate::core::Coord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MineError {
    #[error("Invalid board layout: {0}")]
    InvalidLayout(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Coordinate out of bounds: {0}")]
    OutOfBounds(Coord),

    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),

    #[error("Replay diverged from the record at tick {0}")]
    ReplayDiverged(u32),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for MineError {
    fn from(err: serde_json::Error) -> Self {
        MineError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MineError>;
