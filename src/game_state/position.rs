//! Board plus metadata value type.
//!
//! `Position` is plain data: copying it duplicates the board and the
//! castling/en-passant/king-square [`Details`], nothing else. Per-game state
//! such as move history lives in [`GameState`](crate::game_state::game_state::GameState).

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::chess_errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Castling rights, en-passant target and king locations.
///
/// Make/unmake snapshots this by value; it is everything a move can change
/// besides the squares and the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Details {
    pub enpassant_target: Option<Square>,
    pub light_king_square: Square,
    pub dark_king_square: Square,
    /// Raw flags. A flag alone does not permit castling, see
    /// [`Position::castle_allowed`].
    pub castling_rights: CastlingRights,
}

impl Default for Details {
    fn default() -> Self {
        Self {
            enpassant_target: None,
            light_king_square: E1,
            dark_king_square: E8,
            castling_rights: CASTLE_ALL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub side_to_move: Color,
    pub squares: Board,
    pub half_move_clock: u32,
    pub full_move_count: u32,
    pub details: Details,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Standard starting position.
    pub fn new() -> Self {
        let mut position = Self::empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            position.squares[square_from_file_rank(file, 7) as usize] = Some(Piece::new(Color::Dark, *kind));
            position.squares[square_from_file_rank(file, 6) as usize] = Some(Piece::new(Color::Dark, PieceKind::Pawn));
            position.squares[square_from_file_rank(file, 1) as usize] = Some(Piece::new(Color::Light, PieceKind::Pawn));
            position.squares[square_from_file_rank(file, 0) as usize] = Some(Piece::new(Color::Light, *kind));
        }
        position.details.castling_rights = CASTLE_ALL;
        position
    }

    /// Empty board, light to move, no castling rights.
    pub fn empty() -> Self {
        Self {
            side_to_move: Color::Light,
            squares: [None; 64],
            half_move_clock: 0,
            full_move_count: 1,
            details: Details {
                castling_rights: 0,
                ..Details::default()
            },
        }
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    /// Replace this position with a parsed one; on error nothing changes.
    pub fn set_from_fen(&mut self, fen: &str) -> ChessResult<()> {
        *self = parse_fen(fen)?;
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[inline]
    pub fn piece_is(&self, square: Square, color: Color, kind: PieceKind) -> bool {
        matches!(self.squares[square as usize], Some(p) if p.is(color, kind))
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::Light => self.details.light_king_square,
            Color::Dark => self.details.dark_king_square,
        }
    }

    #[inline]
    pub fn is_light_to_move(&self) -> bool {
        self.side_to_move == Color::Light
    }

    #[inline]
    pub fn toggle(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
    }

    /// Point the king-square details at the kings actually on the board.
    /// Missing kings leave the previous value in place.
    pub fn locate_kings(&mut self) {
        for (square, piece) in self.squares.iter().enumerate() {
            match piece {
                Some(p) if p.is(Color::Light, PieceKind::King) => self.details.light_king_square = square as Square,
                Some(p) if p.is(Color::Dark, PieceKind::King) => self.details.dark_king_square = square as Square,
                _ => {}
            }
        }
    }

    /// Castling is really available: flag set and king and rook at home.
    pub fn castle_allowed(&self, color: Color, kingside: bool) -> bool {
        let (flag, king_home, rook_home) = match (color, kingside) {
            (Color::Light, true) => (CASTLE_LIGHT_KINGSIDE, E1, H1),
            (Color::Light, false) => (CASTLE_LIGHT_QUEENSIDE, E1, A1),
            (Color::Dark, true) => (CASTLE_DARK_KINGSIDE, E8, H8),
            (Color::Dark, false) => (CASTLE_DARK_QUEENSIDE, E8, A8),
        };
        (self.details.castling_rights & flag) != 0
            && self.piece_is(king_home, color, PieceKind::King)
            && self.piece_is(rook_home, color, PieceKind::Rook)
    }

    pub fn light_kingside_allowed(&self) -> bool {
        self.castle_allowed(Color::Light, true)
    }

    pub fn light_queenside_allowed(&self) -> bool {
        self.castle_allowed(Color::Light, false)
    }

    pub fn dark_kingside_allowed(&self) -> bool {
        self.castle_allowed(Color::Dark, true)
    }

    pub fn dark_queenside_allowed(&self) -> bool {
        self.castle_allowed(Color::Dark, false)
    }

    /// Effective castling rights as a mask of the `CASTLE_*` bits.
    pub fn allowed_castling(&self) -> CastlingRights {
        let mut rights = 0;
        if self.light_kingside_allowed() {
            rights |= CASTLE_LIGHT_KINGSIDE;
        }
        if self.light_queenside_allowed() {
            rights |= CASTLE_LIGHT_QUEENSIDE;
        }
        if self.dark_kingside_allowed() {
            rights |= CASTLE_DARK_KINGSIDE;
        }
        if self.dark_queenside_allowed() {
            rights |= CASTLE_DARK_QUEENSIDE;
        }
        rights
    }

    /// The en-passant target, reported only when a pawn of the side to move
    /// stands ready to capture onto it.
    pub fn groomed_enpassant_target(&self) -> Option<Square> {
        let target = self.details.enpassant_target?;
        let (target_rank, passed_pawn, capturer) = match self.side_to_move {
            Color::Light => (5, target.checked_add(8)?, Color::Light),
            Color::Dark => (2, target.checked_sub(8)?, Color::Dark),
        };
        if square_rank(target) != target_rank {
            return None;
        }

        let file = square_file(passed_pawn);
        let left = file > 0 && self.piece_is(passed_pawn - 1, capturer, PieceKind::Pawn);
        let right = file < 7 && self.piece_is(passed_pawn + 1, capturer, PieceKind::Pawn);
        if left || right {
            Some(target)
        } else {
            None
        }
    }

    /// Effective equality plus both clocks.
    pub fn cmp_strict(&self, other: &Self) -> bool {
        self == other
            && self.half_move_clock == other.half_move_clock
            && self.full_move_count == other.full_move_count
    }

    /// Field-for-field equality, raw details included.
    pub fn is_identical(&self, other: &Self) -> bool {
        self.side_to_move == other.side_to_move
            && self.squares == other.squares
            && self.half_move_clock == other.half_move_clock
            && self.full_move_count == other.full_move_count
            && self.details == other.details
    }

    /// Mirror the board top to bottom and swap colors, so the side to move
    /// changes while every relationship on the board is kept.
    pub fn transform(&mut self) {
        let mut squares = [None; 64];
        for (square, piece) in self.squares.iter().enumerate() {
            squares[mirror_square(square as Square) as usize] = piece.map(Piece::flipped);
        }
        self.squares = squares;
        self.toggle();

        let rights = self.details.castling_rights;
        let mut flipped = 0;
        if rights & CASTLE_LIGHT_KINGSIDE != 0 {
            flipped |= CASTLE_DARK_KINGSIDE;
        }
        if rights & CASTLE_LIGHT_QUEENSIDE != 0 {
            flipped |= CASTLE_DARK_QUEENSIDE;
        }
        if rights & CASTLE_DARK_KINGSIDE != 0 {
            flipped |= CASTLE_LIGHT_KINGSIDE;
        }
        if rights & CASTLE_DARK_QUEENSIDE != 0 {
            flipped |= CASTLE_LIGHT_QUEENSIDE;
        }

        self.details = Details {
            enpassant_target: self.details.enpassant_target.map(mirror_square),
            light_king_square: mirror_square(self.details.dark_king_square),
            dark_king_square: mirror_square(self.details.light_king_square),
            castling_rights: flipped,
        };
    }

    /// The move that corresponds to `mv` after [`Position::transform`].
    pub fn transform_move(mv: Move) -> Move {
        Move::new(
            mirror_square(mv.src),
            mirror_square(mv.dst),
            mv.special.flipped(),
            mv.capture.map(Piece::flipped),
        )
    }

    fn equality_key(&self) -> (Color, &Board, Option<Square>, CastlingRights) {
        (
            self.side_to_move,
            &self.squares,
            self.groomed_enpassant_target(),
            self.allowed_castling(),
        )
    }
}

/// Positions are equal when they allow exactly the same play: raw castling
/// flags and unusable en-passant targets do not take part.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.equality_key() == other.equality_key()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.equality_key().hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.equality_key().cmp(&other.equality_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::moves::move_descriptions::SpecialMove;

    #[test]
    fn new_matches_starting_fen() {
        let parsed = Position::from_fen(STARTING_POSITION_FEN).expect("start FEN should parse");
        let built = Position::new();
        assert!(built.is_identical(&parsed));
        assert_eq!(built.king_square(Color::Light), E1);
        assert_eq!(built.king_square(Color::Dark), E8);
    }

    #[test]
    fn castling_requires_king_and_rook_at_home() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K1R1 w KQkq - 0 1").expect("FEN should parse");
        assert!(!position.light_kingside_allowed());
        assert!(position.light_queenside_allowed());
        assert!(position.dark_kingside_allowed());
        assert!(position.dark_queenside_allowed());
    }

    #[test]
    fn raw_flag_differences_without_effect_compare_equal() {
        let with_flag = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KQ - 0 1").expect("FEN should parse");
        let without_flag = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(with_flag, without_flag);
        assert!(!with_flag.is_identical(&without_flag));
    }

    #[test]
    fn groomed_enpassant_needs_a_capturing_pawn() {
        let usable = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        assert_eq!(usable.groomed_enpassant_target(), Some(D6));

        let unusable = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        assert_eq!(unusable.groomed_enpassant_target(), None);

        let edge = Position::from_fen("4k3/8/8/pP6/8/8/8/4K3 w - a6 0 2").expect("FEN should parse");
        assert_eq!(edge.groomed_enpassant_target(), Some(A6));

        let dark = Position::from_fen("4k3/8/8/8/5Pp1/8/8/4K3 b - f3 0 2").expect("FEN should parse");
        assert_eq!(dark.groomed_enpassant_target(), Some(F3));
    }

    #[test]
    fn strict_comparison_includes_clocks() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 7 30").expect("FEN should parse");
        assert_eq!(a, b);
        assert!(!a.cmp_strict(&b));
    }

    #[test]
    fn transform_twice_restores_position() {
        let original = Position::from_fen("r3k2r/pp3ppp/8/3pP3/8/8/PPP2PPP/R3K2R w Kq d6 0 12").expect("FEN should parse");
        let mut flipped = original;
        flipped.transform();

        assert_eq!(flipped.side_to_move, Color::Dark);
        assert!(flipped.dark_kingside_allowed());
        assert!(flipped.light_queenside_allowed());
        assert!(!flipped.light_kingside_allowed());
        assert_eq!(flipped.groomed_enpassant_target(), Some(D3));
        assert_eq!(flipped.king_square(Color::Dark), E8);

        flipped.transform();
        assert!(flipped.is_identical(&original));
    }

    #[test]
    fn transform_move_flips_squares_and_tags() {
        let mv = Move::new(E1, G1, SpecialMove::LightKingsideCastle, None);
        let flipped = Position::transform_move(mv);
        assert_eq!(flipped, Move::new(E8, G8, SpecialMove::DarkKingsideCastle, None));
    }
}
