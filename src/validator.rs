use crate::board::{Board, CastlingRights, Color, Piece, Square};
use tracing::trace;

/// Per-piece move legality, attack detection and castling checks.
///
/// The validator holds a snapshot of the caller's [`CastlingRights`]; it reads
/// them for castling and never changes them. Legality here is pseudo-legal:
/// whether the move exposes the mover's own king is decided by
/// [`crate::movegen::MoveGenerator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveValidator {
    castling_rights: CastlingRights,
}

impl MoveValidator {
    pub fn new(castling_rights: CastlingRights) -> Self {
        Self { castling_rights }
    }

    /// Whether `piece` standing on `from` may move to `to`.
    ///
    /// A pawn landing on its last rank needs a `promotion` kind among
    /// Queen, Rook, Bishop or Knight; on any other rank `promotion` is ignored.
    pub fn is_valid_move(
        &self,
        board: &Board,
        piece: (Piece, Color),
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> bool {
        let (kind, color) = piece;
        if !from.is_on_board() || !to.is_on_board() || from == to {
            return false;
        }

        // No capturing our own pieces
        if let Some((_, target_color)) = board.get(to) {
            if target_color == color {
                return false;
            }
        }

        let row_diff = to.row - from.row;
        let col_diff = to.col - from.col;

        match kind {
            Piece::Pawn => {
                let direction = color.pawn_direction();
                let lands = if col_diff == 0 {
                    // Pushes need an empty destination, double pushes an empty intermediate too
                    board.is_empty(to)
                        && (row_diff == direction
                            || (from.row == color.pawn_start_row()
                                && row_diff == 2 * direction
                                && board.is_empty(from.offset(direction, 0))))
                } else if col_diff.abs() == 1 && row_diff == direction {
                    // Diagonal steps only as captures
                    board.get(to).is_some()
                } else {
                    false
                };
                lands && self.check_promotion(color, to, promotion)
            }
            Piece::Knight => is_knight_jump(row_diff, col_diff),
            Piece::Bishop => {
                row_diff.abs() == col_diff.abs() && self.is_path_clear(board, from, to)
            }
            Piece::Rook => (row_diff == 0 || col_diff == 0) && self.is_path_clear(board, from, to),
            Piece::Queen => {
                (row_diff == 0 || col_diff == 0 || row_diff.abs() == col_diff.abs())
                    && self.is_path_clear(board, from, to)
            }
            Piece::King => {
                if row_diff.abs() <= 1 && col_diff.abs() <= 1 {
                    true
                } else if row_diff == 0 && col_diff.abs() == 2 {
                    self.is_castleable(board, from, to)
                } else {
                    false
                }
            }
        }
    }

    fn check_promotion(&self, color: Color, to: Square, promotion: Option<Piece>) -> bool {
        if to.row != color.promotion_row() {
            return true;
        }
        match promotion {
            Some(p) if p.is_promotion_target() => true,
            _ => {
                trace!(?to, ?promotion, "pawn reached last rank without a valid promotion piece");
                false
            }
        }
    }

    /// Every square strictly between `from` and `to` is empty.
    ///
    /// Walks unit row/column steps, so the two squares must share a row,
    /// column or diagonal.
    pub fn is_path_clear(&self, board: &Board, from: Square, to: Square) -> bool {
        if !from.is_on_board() || !to.is_on_board() {
            return false;
        }
        let row_step = (to.row - from.row).signum();
        let col_step = (to.col - from.col).signum();
        let mut square = from.offset(row_step, col_step);
        while square != to {
            if !square.is_on_board() || !board.is_empty(square) {
                return false;
            }
            square = square.offset(row_step, col_step);
        }
        true
    }

    /// Whether `piece` on `from` attacks `target`.
    ///
    /// Uses capture geometry: pawns hit their forward diagonals only and
    /// kings only adjacent squares, so castling never counts as an attack.
    fn attacks(&self, board: &Board, piece: (Piece, Color), from: Square, target: Square) -> bool {
        let (kind, color) = piece;
        if from == target {
            return false;
        }
        let row_diff = target.row - from.row;
        let col_diff = target.col - from.col;

        match kind {
            Piece::Pawn => row_diff == color.pawn_direction() && col_diff.abs() == 1,
            Piece::Knight => is_knight_jump(row_diff, col_diff),
            Piece::King => row_diff.abs() <= 1 && col_diff.abs() <= 1,
            Piece::Bishop => {
                row_diff.abs() == col_diff.abs() && self.is_path_clear(board, from, target)
            }
            Piece::Rook => {
                (row_diff == 0 || col_diff == 0) && self.is_path_clear(board, from, target)
            }
            Piece::Queen => {
                (row_diff == 0 || col_diff == 0 || row_diff.abs() == col_diff.abs())
                    && self.is_path_clear(board, from, target)
            }
        }
    }

    /// Whether any piece not of `occupant_color` attacks `square`.
    ///
    /// Pins are ignored: an attacker counts even if moving would expose its
    /// own king.
    pub fn is_square_under_attack(&self, board: &Board, square: Square, occupant_color: Color) -> bool {
        if !square.is_on_board() {
            return false;
        }
        board
            .pieces()
            .filter(|&(_, _, color)| color != occupant_color)
            .any(|(from, piece, color)| self.attacks(board, (piece, color), from, square))
    }

    /// A side without a king is never in check.
    pub fn is_in_check(&self, board: &Board, color: Color) -> bool {
        match board.find_king(color) {
            Some(king) => self.is_square_under_attack(board, king, color),
            None => false,
        }
    }

    /// Whether the king on `from` may castle to `to`.
    pub fn is_castleable(&self, board: &Board, from: Square, to: Square) -> bool {
        if !to.is_on_board() {
            return false;
        }
        let Some((Piece::King, color)) = board.get(from) else {
            return false;
        };
        if from.row != to.row || (to.col - from.col).abs() != 2 {
            return false;
        }
        let row = color.home_row();
        if from.row != row || from.col != 4 {
            return false;
        }

        let king_side = to.col > from.col;
        if !self.castling_rights.allows(color, king_side) {
            return false;
        }

        if self.is_square_under_attack(board, from, color) {
            return false;
        }

        let rook_col = if king_side { 7 } else { 0 };
        if board.get(Square::new(row, rook_col)) != Some((Piece::Rook, color)) {
            return false;
        }

        let between = if king_side { 5..7 } else { 1..4 };
        if between.into_iter().any(|col| !board.is_empty(Square::new(row, col))) {
            return false;
        }

        // King side: squares the king crosses and lands on. Queen side: every
        // square between king and rook, b-file included.
        let guarded: &[i8] = if king_side { &[5, 6] } else { &[3, 2, 1] };
        if guarded
            .iter()
            .any(|&col| self.is_square_under_attack(board, Square::new(row, col), color))
        {
            return false;
        }

        trace!(?color, king_side, "castling permitted");
        true
    }
}

fn is_knight_jump(row_diff: i8, col_diff: i8) -> bool {
    (row_diff.abs() == 2 && col_diff.abs() == 1) || (row_diff.abs() == 1 && col_diff.abs() == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: i8, col: i8) -> Square {
        Square::new(row, col)
    }

    fn castling_board() -> Board {
        // White king e1, rook h1, black king a8
        let mut board = Board::empty();
        board.put(sq(7, 4), Piece::King, Color::White);
        board.put(sq(7, 7), Piece::Rook, Color::White);
        board.put(sq(0, 0), Piece::King, Color::Black);
        board
    }

    #[test]
    fn test_pawn_pushes() {
        let board = Board::starting_position();
        let validator = MoveValidator::default();
        let pawn = (Piece::Pawn, Color::White);

        assert!(validator.is_valid_move(&board, pawn, sq(6, 4), sq(5, 4), None));
        assert!(validator.is_valid_move(&board, pawn, sq(6, 4), sq(4, 4), None));
        assert!(!validator.is_valid_move(&board, pawn, sq(6, 4), sq(3, 4), None));
        assert!(!validator.is_valid_move(&board, pawn, sq(6, 4), sq(7, 4), None));

        let black_pawn = (Piece::Pawn, Color::Black);
        assert!(validator.is_valid_move(&board, black_pawn, sq(1, 3), sq(3, 3), None));
        assert!(!validator.is_valid_move(&board, black_pawn, sq(1, 3), sq(0, 3), None));
    }

    #[test]
    fn test_pawn_double_push_blocked() {
        let mut board = Board::starting_position();
        board.put(sq(5, 4), Piece::Knight, Color::Black);
        let validator = MoveValidator::default();
        let pawn = (Piece::Pawn, Color::White);

        assert!(!validator.is_valid_move(&board, pawn, sq(6, 4), sq(4, 4), None));
        assert!(!validator.is_valid_move(&board, pawn, sq(6, 4), sq(5, 4), None));
        // Not from the starting rank
        board.put(sq(5, 0), Piece::Pawn, Color::White);
        assert!(!validator.is_valid_move(&board, pawn, sq(5, 0), sq(3, 0), None));
    }

    #[test]
    fn test_pawn_captures_need_a_victim() {
        let mut board = Board::empty();
        board.put(sq(4, 4), Piece::Pawn, Color::White);
        board.put(sq(3, 3), Piece::Rook, Color::Black);
        board.put(sq(3, 5), Piece::Knight, Color::White);
        let validator = MoveValidator::default();
        let pawn = (Piece::Pawn, Color::White);

        assert!(validator.is_valid_move(&board, pawn, sq(4, 4), sq(3, 3), None));
        assert!(!validator.is_valid_move(&board, pawn, sq(4, 4), sq(3, 5), None));

        board.set(sq(3, 3), None);
        assert!(!validator.is_valid_move(&board, pawn, sq(4, 4), sq(3, 3), None));

        // Backwards diagonal
        board.put(sq(5, 3), Piece::Rook, Color::Black);
        assert!(!validator.is_valid_move(&board, pawn, sq(4, 4), sq(5, 3), None));
    }

    #[test]
    fn test_promotion_piece_required() {
        let mut board = Board::empty();
        board.put(sq(1, 0), Piece::Pawn, Color::White);
        board.put(sq(6, 7), Piece::Pawn, Color::Black);
        let validator = MoveValidator::default();

        let white = (Piece::Pawn, Color::White);
        assert!(!validator.is_valid_move(&board, white, sq(1, 0), sq(0, 0), None));
        assert!(!validator.is_valid_move(&board, white, sq(1, 0), sq(0, 0), Some(Piece::King)));
        assert!(!validator.is_valid_move(&board, white, sq(1, 0), sq(0, 0), Some(Piece::Pawn)));
        for promotion in Piece::PROMOTIONS {
            assert!(validator.is_valid_move(&board, white, sq(1, 0), sq(0, 0), Some(promotion)));
        }

        let black = (Piece::Pawn, Color::Black);
        assert!(!validator.is_valid_move(&board, black, sq(6, 7), sq(7, 7), None));
        assert!(validator.is_valid_move(&board, black, sq(6, 7), sq(7, 7), Some(Piece::Queen)));
    }

    #[test]
    fn test_knight_jumps() {
        let board = Board::starting_position();
        let validator = MoveValidator::default();
        let knight = (Piece::Knight, Color::White);

        assert!(validator.is_valid_move(&board, knight, sq(7, 6), sq(5, 5), None));
        assert!(validator.is_valid_move(&board, knight, sq(7, 6), sq(5, 7), None));
        // Own pawn on e2
        assert!(!validator.is_valid_move(&board, knight, sq(7, 6), sq(6, 4), None));
        assert!(!validator.is_valid_move(&board, knight, sq(7, 6), sq(5, 6), None));
    }

    #[test]
    fn test_sliders_need_clear_path() {
        let board = Board::starting_position();
        let validator = MoveValidator::default();

        assert!(!validator.is_valid_move(&board, (Piece::Rook, Color::White), sq(7, 0), sq(4, 0), None));
        assert!(!validator.is_valid_move(&board, (Piece::Bishop, Color::White), sq(7, 2), sq(4, 5), None));
        assert!(!validator.is_valid_move(&board, (Piece::Queen, Color::White), sq(7, 3), sq(5, 3), None));

        let mut open = Board::empty();
        open.put(sq(4, 4), Piece::Queen, Color::White);
        open.put(sq(4, 1), Piece::Pawn, Color::Black);
        let queen = (Piece::Queen, Color::White);
        assert!(validator.is_valid_move(&open, queen, sq(4, 4), sq(0, 0), None));
        assert!(validator.is_valid_move(&open, queen, sq(4, 4), sq(4, 1), None));
        assert!(!validator.is_valid_move(&open, queen, sq(4, 4), sq(4, 0), None));
        assert!(!validator.is_valid_move(&open, queen, sq(4, 4), sq(2, 5), None));
        assert!(!validator.is_valid_move(&open, (Piece::Rook, Color::White), sq(4, 4), sq(3, 3), None));
        assert!(!validator.is_valid_move(&open, (Piece::Bishop, Color::White), sq(4, 4), sq(4, 6), None));
    }

    #[test]
    fn test_out_of_bounds_and_same_square() {
        let board = Board::starting_position();
        let validator = MoveValidator::default();
        let rook = (Piece::Rook, Color::White);

        assert!(!validator.is_valid_move(&board, rook, sq(7, 0), sq(8, 0), None));
        assert!(!validator.is_valid_move(&board, rook, sq(7, 0), sq(7, -1), None));
        assert!(!validator.is_valid_move(&board, rook, sq(7, 0), sq(7, 0), None));
        assert!(!validator.is_valid_move(&board, rook, sq(9, 9), sq(7, 0), None));
    }

    #[test]
    fn test_king_steps() {
        let mut board = Board::empty();
        board.put(sq(4, 4), Piece::King, Color::Black);
        let validator = MoveValidator::default();
        let king = (Piece::King, Color::Black);

        for (dr, dc) in [(-1, -1), (-1, 0), (0, 1), (1, 1)] {
            assert!(validator.is_valid_move(&board, king, sq(4, 4), sq(4 + dr, 4 + dc), None));
        }
        assert!(!validator.is_valid_move(&board, king, sq(4, 4), sq(2, 4), None));
        // Two-column jump off the home square is never castling
        assert!(!validator.is_valid_move(&board, king, sq(4, 4), sq(4, 6), None));
    }

    #[test]
    fn test_square_under_attack() {
        let mut board = Board::empty();
        board.put(sq(4, 4), Piece::Rook, Color::Black);
        board.put(sq(4, 6), Piece::Pawn, Color::White);
        let validator = MoveValidator::default();

        assert!(validator.is_square_under_attack(&board, sq(4, 0), Color::White));
        assert!(validator.is_square_under_attack(&board, sq(0, 4), Color::White));
        // Blocked by the pawn on g4
        assert!(!validator.is_square_under_attack(&board, sq(4, 7), Color::White));
        // Own pieces do not attack
        assert!(!validator.is_square_under_attack(&board, sq(4, 0), Color::Black));
        // White pawn hits f5 and h5, not its push square
        assert!(validator.is_square_under_attack(&board, sq(3, 5), Color::Black));
        assert!(!validator.is_square_under_attack(&board, sq(3, 6), Color::Black));
    }

    #[test]
    fn test_pawn_attacks_promotion_rank() {
        let mut board = Board::empty();
        board.put(sq(6, 3), Piece::Pawn, Color::Black);
        board.put(sq(7, 4), Piece::King, Color::White);
        let validator = MoveValidator::default();

        assert!(validator.is_in_check(&board, Color::White));
        assert!(!validator.is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_facing_kings_do_not_recurse() {
        // Two kings two columns apart on the same row would chase each other
        // through castling checks if a castling jump counted as an attack.
        let mut board = Board::empty();
        board.put(sq(7, 4), Piece::King, Color::White);
        board.put(sq(7, 6), Piece::King, Color::Black);
        board.put(sq(7, 7), Piece::Rook, Color::White);
        let validator = MoveValidator::default();

        assert!(!validator.is_square_under_attack(&board, sq(7, 4), Color::White));
        assert!(!validator.is_valid_move(&board, (Piece::King, Color::White), sq(7, 4), sq(7, 6), None));
    }

    #[test]
    fn test_kingside_castle_allowed() {
        let board = castling_board();
        let validator = MoveValidator::default();

        assert!(validator.is_castleable(&board, sq(7, 4), sq(7, 6)));
        assert!(validator.is_valid_move(&board, (Piece::King, Color::White), sq(7, 4), sq(7, 6), None));
    }

    #[test]
    fn test_kingside_castle_destination_attacked() {
        let mut board = castling_board();
        board.put(sq(2, 6), Piece::Rook, Color::Black);
        let validator = MoveValidator::default();

        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, 6)));
    }

    #[test]
    fn test_kingside_castle_rejections() {
        let validator = MoveValidator::default();

        // Transit square attacked
        let mut board = castling_board();
        board.put(sq(2, 5), Piece::Rook, Color::Black);
        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, 6)));

        // In check
        let mut board = castling_board();
        board.put(sq(2, 4), Piece::Rook, Color::Black);
        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, 6)));

        // Blocked
        let mut board = castling_board();
        board.put(sq(7, 5), Piece::Bishop, Color::White);
        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, 6)));

        // Rook gone
        let mut board = castling_board();
        board.set(sq(7, 7), None);
        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, 6)));

        // Right already spent
        let rights = CastlingRights { white_king_side: false, ..CastlingRights::default() };
        assert!(!MoveValidator::new(rights).is_castleable(&castling_board(), sq(7, 4), sq(7, 6)));
    }

    #[test]
    fn test_queenside_castle() {
        let mut board = Board::empty();
        board.put(sq(0, 4), Piece::King, Color::Black);
        board.put(sq(0, 0), Piece::Rook, Color::Black);
        board.put(sq(7, 7), Piece::King, Color::White);
        let validator = MoveValidator::default();
        assert!(validator.is_castleable(&board, sq(0, 4), sq(0, 2)));

        // b8 attacked
        board.put(sq(5, 1), Piece::Rook, Color::White);
        assert!(!validator.is_castleable(&board, sq(0, 4), sq(0, 2)));
        board.set(sq(5, 1), None);

        // b8 occupied
        board.put(sq(0, 1), Piece::Knight, Color::Black);
        assert!(!validator.is_castleable(&board, sq(0, 4), sq(0, 2)));

        board.set(sq(0, 1), None);
        let rights = CastlingRights { black_queen_side: false, ..CastlingRights::default() };
        assert!(!MoveValidator::new(rights).is_castleable(&board, sq(0, 4), sq(0, 2)));
    }

    #[test]
    fn test_white_queenside_castle_b1_attacked() {
        let mut board = Board::empty();
        board.put(sq(7, 4), Piece::King, Color::White);
        board.put(sq(7, 0), Piece::Rook, Color::White);
        board.put(sq(0, 7), Piece::King, Color::Black);
        let validator = MoveValidator::default();
        assert!(validator.is_castleable(&board, sq(7, 4), sq(7, 2)));

        board.put(sq(2, 1), Piece::Rook, Color::Black);
        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, 2)));
        assert!(!validator.is_valid_move(&board, (Piece::King, Color::White), sq(7, 4), sq(7, 2), None));
    }

    #[test]
    fn test_extreme_coordinates_are_rejected() {
        let board = Board::starting_position();
        let validator = MoveValidator::default();

        assert!(!validator.is_castleable(&board, sq(7, 4), sq(7, i8::MIN)));
        assert!(!validator.is_castleable(&board, sq(7, 4), sq(i8::MAX, 6)));
        assert!(!validator.is_path_clear(&board, sq(i8::MAX, i8::MAX), sq(i8::MIN, i8::MIN)));
        assert!(!validator.is_path_clear(&board, sq(7, 0), sq(7, i8::MIN)));
        assert!(!validator.is_valid_move(&board, (Piece::King, Color::White), sq(7, 4), sq(7, i8::MIN), None));
    }
}
