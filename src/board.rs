use std::fmt;
use crate::error::{ChessError, ChessResult};
use crate::movegen::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Kinds a pawn may promote to, best first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    pub fn index(&self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    /// Unsigned material value, ten units per pawn.
    pub fn value(&self) -> i32 {
        match self {
            Piece::Pawn => 10,
            Piece::Knight => 30,
            Piece::Bishop => 30,
            Piece::Rook => 50,
            Piece::Queen => 90,
            Piece::King => 900,
        }
    }

    pub fn is_promotion_target(&self) -> bool {
        Piece::PROMOTIONS.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn from_white_to_move(white_to_move: bool) -> Color {
        if white_to_move { Color::White } else { Color::Black }
    }

    /// Row the side's king and rooks start on.
    pub fn home_row(&self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row a pawn of this color promotes on.
    pub fn promotion_row(&self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row delta of a single pawn push.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

/// Dense `0..12` index of a colored piece: white Pawn..King, then black.
pub fn piece_index(piece: Piece, color: Color) -> usize {
    match color {
        Color::White => piece.index(),
        Color::Black => 6 + piece.index(),
    }
}

/// Letter code used at the boundary: uppercase white, lowercase black.
pub fn piece_code(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

/// Inverse of [`piece_code`]. `.` and space are empty cells.
pub fn parse_piece_code(code: char) -> ChessResult<Option<(Piece, Color)>> {
    let color = if code.is_ascii_uppercase() { Color::White } else { Color::Black };
    let piece = match code.to_ascii_lowercase() {
        '.' | ' ' => return Ok(None),
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return Err(ChessError::InvalidPieceCode(code)),
    };
    Ok(Some((piece, color)))
}

/// Grid coordinate. Row 0 is the top rank (black's back rank).
///
/// Coordinates are signed so that off-board requests can be expressed and
/// rejected instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn try_new(row: i8, col: i8) -> ChessResult<Self> {
        let square = Self::new(row, col);
        if square.is_on_board() {
            Ok(square)
        } else {
            Err(ChessError::SquareOutOfRange { row, col })
        }
    }

    pub fn is_on_board(&self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }

    /// `row * 8 + col`; only meaningful on the board.
    pub fn index(&self) -> usize {
        (self.row as usize) * 8 + self.col as usize
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Square {
        Square::new(self.row + d_row, self.col + d_col)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square::new(row, col)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_king_side: false,
            white_queen_side: false,
            black_king_side: false,
            black_queen_side: false,
        }
    }

    pub fn allows(&self, color: Color, king_side: bool) -> bool {
        match (color, king_side) {
            (Color::White, true) => self.white_king_side,
            (Color::White, false) => self.white_queen_side,
            (Color::Black, true) => self.black_king_side,
            (Color::Black, false) => self.black_queen_side,
        }
    }

    /// Clears rights invalidated by the piece about to leave `from`.
    ///
    /// Must be called by whoever applies the move, with the board as it was
    /// before the move. A rook captured on its corner is not noticed.
    pub fn update(&mut self, board: &Board, from: Square) {
        let Some((piece, color)) = board.get(from) else {
            return;
        };
        match (piece, color) {
            (Piece::King, Color::White) => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            (Piece::King, Color::Black) => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
            (Piece::Rook, _) => {
                if from.row != color.home_row() {
                    return;
                }
                match (color, from.col) {
                    (Color::White, 0) => self.white_queen_side = false,
                    (Color::White, 7) => self.white_king_side = false,
                    (Color::Black, 0) => self.black_queen_side = false,
                    (Color::Black, 7) => self.black_king_side = false,
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<(Piece, Color)>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self { squares: [[None; 8]; 8] }
    }

    pub fn starting_position() -> Self {
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut board = Self::empty();
        for (col, &piece) in back_rank.iter().enumerate() {
            board.squares[0][col] = Some((piece, Color::Black));
            board.squares[1][col] = Some((Piece::Pawn, Color::Black));
            board.squares[6][col] = Some((Piece::Pawn, Color::White));
            board.squares[7][col] = Some((piece, Color::White));
        }
        board
    }

    /// Builds a board from the boundary matrix of piece codes.
    pub fn from_codes(codes: &[[char; 8]; 8]) -> ChessResult<Self> {
        let mut board = Self::empty();
        for (row, line) in codes.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                board.squares[row][col] = parse_piece_code(code)?;
            }
        }
        Ok(board)
    }

    /// Off-board squares read as empty.
    pub fn get(&self, square: Square) -> Option<(Piece, Color)> {
        if !square.is_on_board() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Writes a cell; off-board squares are ignored.
    pub fn set(&mut self, square: Square, cell: Option<(Piece, Color)>) {
        if square.is_on_board() {
            self.squares[square.row as usize][square.col as usize] = cell;
        }
    }

    pub fn put(&mut self, square: Square, piece: Piece, color: Color) {
        self.set(square, Some((piece, color)));
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|(piece, color)| (sq, piece, color)))
    }

    /// First king of `color` in row-major order.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, piece, c)| piece == Piece::King && c == color)
            .map(|(sq, _, _)| sq)
    }

    /// Applies `mv` in place.
    ///
    /// The promotion piece (when present) replaces the moving piece, and a
    /// two-column king move also relocates the corner rook. Castling rights
    /// are the caller's business, see [`CastlingRights::update`].
    pub fn make_move(&mut self, mv: Move) {
        let Some((piece, color)) = self.get(mv.from) else {
            return;
        };
        if !mv.to.is_on_board() {
            return;
        }

        self.set(mv.from, None);
        let placed = mv.promotion.unwrap_or(piece);
        self.put(mv.to, placed, color);

        // Castling
        if piece == Piece::King && mv.from.row == mv.to.row && (mv.to.col - mv.from.col).abs() == 2 {
            let (rook_from, rook_to) = if mv.to.col > mv.from.col {
                (Square::new(mv.from.row, 7), Square::new(mv.from.row, mv.to.col - 1))
            } else {
                (Square::new(mv.from.row, 0), Square::new(mv.from.row, mv.to.col + 1))
            };
            if self.get(rook_from) == Some((Piece::Rook, color)) {
                self.set(rook_from, None);
                self.put(rook_to, Piece::Rook, color);
            }
        }
    }

    /// Returns a copy with `mv` applied.
    pub fn with_move(&self, mv: Move) -> Board {
        let mut board = *self;
        board.make_move(mv);
        board
    }

    /// Colors swapped and rows reversed.
    pub fn mirrored(&self) -> Board {
        let mut board = Self::empty();
        for (sq, piece, color) in self.pieces() {
            board.put(Square::new(7 - sq.row, sq.col), piece, color.opposite());
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in 0..8 {
            for col in 0..8 {
                let c = match self.get(Square::new(row, col)) {
                    Some((piece, color)) => piece_code(piece, color),
                    None => '.',
                };
                result.push(c);
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_layout() {
        let board = Board::starting_position();
        assert_eq!(board.get(Square::new(7, 4)), Some((Piece::King, Color::White)));
        assert_eq!(board.get(Square::new(0, 3)), Some((Piece::Queen, Color::Black)));
        assert_eq!(board.get(Square::new(6, 0)), Some((Piece::Pawn, Color::White)));
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.find_king(Color::Black), Some(Square::new(0, 4)));
    }

    #[test]
    fn test_from_codes_matches_starting_position() {
        let codes = [
            ['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r'],
            ['p'; 8],
            ['.'; 8],
            ['.'; 8],
            ['.'; 8],
            ['.'; 8],
            ['P'; 8],
            ['R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R'],
        ];
        assert_eq!(Board::from_codes(&codes).unwrap(), Board::starting_position());
    }

    #[test]
    fn test_from_codes_rejects_unknown_code() {
        let mut codes = [['.'; 8]; 8];
        codes[3][3] = 'x';
        assert!(matches!(Board::from_codes(&codes), Err(ChessError::InvalidPieceCode('x'))));
    }

    #[test]
    fn test_off_board_access() {
        let mut board = Board::empty();
        board.put(Square::new(8, 0), Piece::Queen, Color::White);
        assert_eq!(board.pieces().count(), 0);
        assert_eq!(board.get(Square::new(-1, 3)), None);
        assert!(Square::try_new(0, 8).is_err());
        assert_eq!(Square::try_new(7, 7).unwrap().index(), 63);
    }

    #[test]
    fn test_make_move_promotion_and_castling() {
        let mut board = Board::empty();
        board.put(Square::new(1, 2), Piece::Pawn, Color::White);
        board.make_move(Move::with_promotion(Square::new(1, 2), Square::new(0, 2), Piece::Knight));
        assert_eq!(board.get(Square::new(0, 2)), Some((Piece::Knight, Color::White)));
        assert!(board.is_empty(Square::new(1, 2)));

        let mut board = Board::empty();
        board.put(Square::new(0, 4), Piece::King, Color::Black);
        board.put(Square::new(0, 0), Piece::Rook, Color::Black);
        board.make_move(Move::new(Square::new(0, 4), Square::new(0, 2)));
        assert_eq!(board.get(Square::new(0, 2)), Some((Piece::King, Color::Black)));
        assert_eq!(board.get(Square::new(0, 3)), Some((Piece::Rook, Color::Black)));
        assert!(board.is_empty(Square::new(0, 0)));
    }

    #[test]
    fn test_castling_rights_update() {
        let board = Board::starting_position();
        let mut rights = CastlingRights::default();

        rights.update(&board, Square::new(7, 7));
        assert!(!rights.white_king_side);
        assert!(rights.white_queen_side);

        rights.update(&board, Square::new(0, 4));
        assert!(!rights.black_king_side && !rights.black_queen_side);

        // Non-rook, non-king moves leave rights alone
        rights.update(&board, Square::new(7, 1));
        assert!(rights.white_queen_side);
    }

    #[test]
    fn test_castling_rights_ignore_captured_rook() {
        // A rook taken on h1 is not observed: only the mover is inspected.
        let mut board = Board::empty();
        board.put(Square::new(7, 7), Piece::Rook, Color::White);
        board.put(Square::new(5, 7), Piece::Rook, Color::Black);
        let mut rights = CastlingRights::default();
        rights.update(&board, Square::new(5, 7));
        assert!(rights.white_king_side);
        assert!(rights.black_king_side);
    }

    #[test]
    fn test_display() {
        let text = Board::starting_position().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "r n b q k b n r");
        assert_eq!(lines[7], "R N B Q K B N R");
    }
}
