//! Chess move legality and a depth-limited alpha-beta move search.
//!
//! The crate works on a plain 8x8 [`Board`] handed to it by a caller: it
//! answers legality queries, enumerates and orders legal moves, evaluates
//! positions, picks a move for either side, and fingerprints positions with
//! Zobrist hashes.

pub mod board;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod movegen;
pub mod search;
pub mod transposition;
pub mod validator;
pub mod zobrist;

pub use board::{Board, CastlingRights, Color, Piece, Square};
pub use config::SearchConfig;
pub use error::{ChessError, ChessResult};
pub use evaluation::Evaluator;
pub use movegen::{Move, MoveGenerator};
pub use search::Search;
pub use transposition::{TranspositionEntry, TranspositionTable};
pub use validator::MoveValidator;
pub use zobrist::{init_zobrist, PositionHasher, ZobristTable};
