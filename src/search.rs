use crate::board::{Board, CastlingRights};
use crate::config::SearchConfig;
use crate::evaluation::Evaluator;
use crate::movegen::{Move, MoveGenerator};
use tracing::{debug, warn};

/// Depth-limited minimax with alpha-beta pruning.
///
/// White maximizes and black minimizes the [`Evaluator`] score. A node whose
/// side has no legal move is scored statically; checkmate and stalemate are
/// not recognised.
pub struct Search {
    evaluator: Evaluator,
    move_generator: MoveGenerator,
    config: SearchConfig,
    nodes_searched: u64,
}

impl Default for Search {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Search {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            evaluator: Evaluator::new(),
            move_generator: MoveGenerator::new(),
            config,
            nodes_searched: 0,
        }
    }

    /// Castling rights consulted at every node of later searches.
    pub fn with_castling_rights(mut self, castling_rights: CastlingRights) -> Self {
        self.move_generator = MoveGenerator::with_castling_rights(castling_rights);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.config.depth = depth;
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Best move for the side to move, or `None` when it has no legal move.
    ///
    /// Each root move is scored by `minimax` from the opponent's turn with the
    /// configured depth and window. White keeps the highest score, black the
    /// lowest; on ties the earlier move in ordering wins.
    pub fn find_best_move(&mut self, board: &Board, white_to_move: bool) -> Option<Move> {
        self.nodes_searched = 0;

        let moves = self.move_generator.generate_moves(board, white_to_move);
        if moves.is_empty() {
            warn!(white_to_move, "no legal moves");
            return None;
        }

        let mut best: Option<(Move, i32)> = None;
        for mv in moves {
            let board_copy = board.with_move(mv);
            let score = self.minimax(
                &board_copy,
                self.config.depth,
                !white_to_move,
                self.config.alpha,
                self.config.beta,
            );

            let improves = match best {
                None => true,
                Some((_, best_score)) if white_to_move => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
            }
        }

        if let Some((mv, score)) = best {
            debug!(?mv, score, nodes = self.nodes_searched, white_to_move, "search finished");
        }
        best.map(|(mv, _)| mv)
    }

    pub fn minimax(&mut self, board: &Board, depth: u32, white_to_move: bool, alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            return self.evaluator.evaluate(board);
        }

        let moves = self.move_generator.generate_moves(board, white_to_move);
        if moves.is_empty() {
            return self.evaluator.evaluate(board);
        }

        let mut alpha = alpha;
        let mut beta = beta;

        if white_to_move {
            let mut best_score = i32::MIN;
            for mv in moves {
                let score = self.minimax(&board.with_move(mv), depth - 1, false, alpha, beta);
                best_score = best_score.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }
            best_score
        } else {
            let mut best_score = i32::MAX;
            for mv in moves {
                let score = self.minimax(&board.with_move(mv), depth - 1, true, alpha, beta);
                best_score = best_score.min(score);
                beta = beta.min(score);
                if alpha >= beta {
                    break;
                }
            }
            best_score
        }
    }
}
