use crate::error::{ChessError, ChessResult};

/// Fixed search depth used by [`crate::search::Search::find_best_move`].
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;
pub const DEFAULT_ALPHA: i32 = -10_000;
pub const DEFAULT_BETA: i32 = 10_000;

/// Parameters of a root search.
///
/// `depth` is the depth handed to minimax for each root child, so a search
/// looks `depth + 1` plies ahead of the root position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u32,
    pub alpha: i32,
    pub beta: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self { depth, ..Self::default() }
    }

    pub fn validate(&self) -> ChessResult<()> {
        if self.alpha >= self.beta {
            return Err(ChessError::InvalidConfig(format!(
                "alpha ({}) must be below beta ({})",
                self.alpha, self.beta
            )));
        }
        Ok(())
    }
}
