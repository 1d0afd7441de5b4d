use crate::board::{Board, CastlingRights, Color, Piece, Square};
use crate::evaluation::Evaluator;
use crate::validator::MoveValidator;

/// Origin, destination and optional promotion kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to, promotion: None }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: Piece) -> Self {
        Self { from, to, promotion: Some(promotion) }
    }

    pub fn from_coords(from_row: i8, from_col: i8, to_row: i8, to_col: i8) -> Self {
        Self::new(Square::new(from_row, from_col), Square::new(to_row, to_col))
    }
}

/// Bonus for a pawn stepping onto its last rank.
pub const PROMOTION_BONUS: i32 = 800;
/// Multiplier applied to the victim-minus-attacker material difference.
pub const CAPTURE_WEIGHT: i32 = 100;

/// Legal move enumeration and heuristic ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator {
    validator: MoveValidator,
    evaluator: Evaluator,
}

impl MoveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_castling_rights(castling_rights: CastlingRights) -> Self {
        Self {
            validator: MoveValidator::new(castling_rights),
            evaluator: Evaluator::new(),
        }
    }

    pub fn validator(&self) -> &MoveValidator {
        &self.validator
    }

    /// All legal moves for the side to move, best-scored first.
    ///
    /// A candidate is kept when the validator accepts it and, once applied to
    /// a scratch board, the mover's king is not attacked. Pawns reaching the
    /// last rank yield one move per promotion kind.
    pub fn generate_moves(&self, board: &Board, white_to_move: bool) -> Vec<Move> {
        let side = Color::from_white_to_move(white_to_move);
        let mut scored = Vec::new();

        for (from, piece, color) in board.pieces() {
            if color != side {
                continue;
            }
            for to in Square::all() {
                let promotions: &[Option<Piece>] = if piece == Piece::Pawn && to.row == side.promotion_row() {
                    &[Some(Piece::Queen), Some(Piece::Rook), Some(Piece::Bishop), Some(Piece::Knight)]
                } else {
                    &[None]
                };
                for &promotion in promotions {
                    if !self.validator.is_valid_move(board, (piece, color), from, to, promotion) {
                        continue;
                    }
                    let mv = Move { from, to, promotion };
                    if self.leaves_king_safe(board, mv, side) {
                        scored.push((mv, self.score_move(mv, board)));
                    }
                }
            }
        }

        // Stable: equal scores keep board order
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(mv, _)| mv).collect()
    }

    fn leaves_king_safe(&self, board: &Board, mv: Move, side: Color) -> bool {
        let after = board.with_move(mv);
        match after.find_king(side) {
            Some(king) => !self.validator.is_square_under_attack(&after, king, side),
            None => true,
        }
    }

    /// Ordering heuristic; higher is better for the side making `mv`.
    ///
    /// Captures add `100 * (|victim| - |attacker|)`, a pawn reaching its last
    /// rank adds 800, and the evaluation change is added re-signed for the
    /// mover.
    pub fn score_move(&self, mv: Move, board: &Board) -> i32 {
        let Some((piece, color)) = board.get(mv.from) else {
            return 0;
        };
        let mut score = 0;

        if let Some((victim, _)) = board.get(mv.to) {
            score += CAPTURE_WEIGHT * (victim.value() - piece.value());
        }

        if piece == Piece::Pawn && mv.to.row == color.promotion_row() {
            score += PROMOTION_BONUS;
        }

        let before = self.evaluator.evaluate(board);
        let after = self.evaluator.evaluate(&board.with_move(mv));
        let delta = after - before;
        score += match color {
            Color::White => delta,
            Color::Black => -delta,
        };

        score
    }
}
