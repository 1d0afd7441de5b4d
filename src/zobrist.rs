//! Zobrist position fingerprints.
//!
//! One random 64-bit key per (colored piece, square). The process-wide table
//! is drawn from the operating system's random source the first time it is
//! needed and never changes afterwards. Hashes cover piece placement only:
//! side to move and castling rights are not folded in.

use std::sync::OnceLock;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::board::{piece_index, Board, Color, Piece, Square};
use crate::movegen::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristTable {
    keys: [[u64; 64]; 12],
}

static TABLE: OnceLock<ZobristTable> = OnceLock::new();

impl ZobristTable {
    pub fn from_rng<R: RngCore>(rng: &mut R) -> Self {
        let mut keys = [[0u64; 64]; 12];
        for piece in keys.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.next_u64();
            }
        }
        Self { keys }
    }

    /// Keys from the operating system's random source.
    pub fn random() -> Self {
        Self::from_rng(&mut OsRng)
    }

    /// Reproducible keys, for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// The process-wide table, built on first use.
    pub fn global() -> &'static ZobristTable {
        TABLE.get_or_init(|| {
            debug!("zobrist table initialised");
            Self::random()
        })
    }

    #[inline]
    pub fn key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.keys[piece_index(piece, color)][square.index()]
    }
}

/// Forces the process-wide table into existence.
pub fn init_zobrist() -> &'static ZobristTable {
    ZobristTable::global()
}

/// Hashes boards against a [`ZobristTable`] and keeps an explicit,
/// optional cache of the last full hash.
#[derive(Debug, Clone)]
pub struct PositionHasher<'a> {
    table: &'a ZobristTable,
    current_hash: Option<u64>,
}

impl PositionHasher<'static> {
    /// Hasher over the process-wide table.
    pub fn new() -> Self {
        Self::with_table(ZobristTable::global())
    }
}

impl Default for PositionHasher<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PositionHasher<'a> {
    pub fn with_table(table: &'a ZobristTable) -> Self {
        Self { table, current_hash: None }
    }

    /// XOR of the keys of every occupied square.
    pub fn hash(&self, board: &Board) -> u64 {
        board
            .pieces()
            .fold(0, |hash, (square, piece, color)| hash ^ self.table.key(piece, color, square))
    }

    /// Like [`hash`](Self::hash), and remembers the result.
    pub fn hash_and_cache(&mut self, board: &Board) -> u64 {
        let hash = self.hash(board);
        self.current_hash = Some(hash);
        hash
    }

    pub fn current_hash(&self) -> Option<u64> {
        self.current_hash
    }

    pub fn clear_cache(&mut self) {
        self.current_hash = None;
    }

    /// Incrementally updates `hash` for `mv` played on `board_before`.
    ///
    /// Removes the mover from its origin, removes whatever stood on the
    /// destination and adds the mover there. Promotions, the castling rook
    /// and en-passant victims are not accounted for, so the result differs
    /// from a full [`hash`](Self::hash) after those moves. A move with an
    /// off-board square leaves `hash` unchanged.
    pub fn update_hash_for_move(&self, hash: u64, mv: Move, board_before: &Board) -> u64 {
        if !mv.from.is_on_board() || !mv.to.is_on_board() {
            return hash;
        }
        let mut hash = hash;
        let moving = board_before.get(mv.from);

        if let Some((piece, color)) = moving {
            hash ^= self.table.key(piece, color, mv.from);
        }
        if let Some((piece, color)) = board_before.get(mv.to) {
            hash ^= self.table.key(piece, color, mv.to);
        }
        if let Some((piece, color)) = moving {
            hash ^= self.table.key(piece, color, mv.to);
        }
        hash
    }
}
