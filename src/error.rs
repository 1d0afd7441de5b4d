//! Error types for the boundary and configuration layers.
//!
//! Move legality and search never fail; they answer with `bool`, a score or
//! `Option<Move>`. Errors only arise when input handed to the core is
//! malformed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Board matrix contained a code outside `PNBRQKpnbrqk.`
    #[error("invalid piece code {0:?}")]
    InvalidPieceCode(char),

    #[error("square ({row}, {col}) is off the board")]
    SquareOutOfRange { row: i8, col: i8 },

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

pub type ChessResult<T> = Result<T, ChessError>;
