use crate::movegen::Move;

pub const TABLE_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub hash: u64,
    pub score: i32,
    pub depth: u32,
    pub best_move: Option<Move>,
}

/// Fixed-size, direct-mapped table of search results keyed by Zobrist hash.
///
/// A store always overwrites its slot. The search does not read or write
/// this table; it is a standalone probe/store interface.
#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Box<[Option<TranspositionEntry>; TABLE_SIZE]>,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self {
            slots: Box::new([None; TABLE_SIZE]),
        }
    }

    fn slot(hash: u64) -> usize {
        (hash % TABLE_SIZE as u64) as usize
    }

    pub fn store(&mut self, entry: TranspositionEntry) {
        self.slots[Self::slot(entry.hash)] = Some(entry);
    }

    /// The entry for `hash`, if its slot still holds that position.
    pub fn probe(&self, hash: u64) -> Option<&TranspositionEntry> {
        self.slots[Self::slot(hash)]
            .as_ref()
            .filter(|entry| entry.hash == hash)
    }

    pub fn get_best_move(&self, hash: u64) -> Option<Move> {
        self.probe(hash).and_then(|entry| entry.best_move)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
