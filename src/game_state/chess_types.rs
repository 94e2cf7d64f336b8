//! Core value types shared across the rules engine.
//!
//! Squares are numbered rank-major from the top-left of the board as seen by
//! the light side: `a8 = 0`, `h8 = 7`, `a1 = 56`, `h1 = 63`.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::position::{Details, Position};

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

/// Piece kind (color is carried separately in [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Single-bit mask used by the attack tables.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self.index()
    }

    /// Upper-case letter used by FEN and natural notation.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece. Board squares hold `Option<Piece>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Dense index `0..12`, light pieces first.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    #[inline]
    pub const fn is(self, color: Color, kind: PieceKind) -> bool {
        self.color.index() == color.index() && self.kind.index() == kind.index()
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else if ch.is_ascii_lowercase() {
            Color::Dark
        } else {
            return None;
        };
        PieceKind::from_letter(ch).map(|kind| Piece::new(color, kind))
    }

    pub fn to_fen_char(self) -> char {
        match self.color {
            Color::Light => self.kind.letter(),
            Color::Dark => self.kind.letter().to_ascii_lowercase(),
        }
    }

    /// Same kind, other color.
    #[inline]
    pub const fn flipped(self) -> Self {
        Piece::new(self.color.opposite(), self.kind)
    }
}

/// Mailbox board, indexed by [`Square`].
pub type Board = [Option<Piece>; 64];

/// Compact castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights =
    CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE | CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE;

/// Board square index (`0..=63`, `a8 = 0`).
pub type Square = u8;

/// File of a square, `0` for the a-file.
#[inline]
pub const fn square_file(square: Square) -> u8 {
    square & 7
}

/// Rank of a square, `0` for the first rank.
#[inline]
pub const fn square_rank(square: Square) -> u8 {
    7 - (square >> 3)
}

/// Build a square from a file and rank, both counted from zero.
#[inline]
pub const fn square_from_file_rank(file: u8, rank: u8) -> Square {
    (7 - rank) * 8 + file
}

/// Same file, mirrored rank.
#[inline]
pub const fn mirror_square(square: Square) -> Square {
    square ^ 56
}

#[inline]
pub fn file_char(square: Square) -> char {
    char::from(b'a' + square_file(square))
}

#[inline]
pub fn rank_char(square: Square) -> char {
    char::from(b'1' + square_rank(square))
}

/// How a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawType {
    FiftyMove,
    /// Insufficient material the claimant may ask for.
    Insufficient,
    /// Insufficient material that draws without a claim.
    InsufficientAuto,
    Repetition,
}

/// Terminal classification of a legal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    NotTerminal,
    LightCheckmated,
    LightStalemated,
    DarkCheckmated,
    DarkStalemated,
}

impl Terminal {
    /// Signed code: negative when the light side is the one with no moves.
    pub const fn code(self) -> i8 {
        match self {
            Terminal::NotTerminal => 0,
            Terminal::LightCheckmated => -1,
            Terminal::LightStalemated => -2,
            Terminal::DarkCheckmated => 1,
            Terminal::DarkStalemated => 2,
        }
    }

    pub const fn is_checkmate(self) -> bool {
        matches!(self, Terminal::LightCheckmated | Terminal::DarkCheckmated)
    }

    pub const fn is_stalemate(self) -> bool {
        matches!(self, Terminal::LightStalemated | Terminal::DarkStalemated)
    }
}

pub const A8: Square = 0;
pub const B8: Square = 1;
pub const C8: Square = 2;
pub const D8: Square = 3;
pub const E8: Square = 4;
pub const F8: Square = 5;
pub const G8: Square = 6;
pub const H8: Square = 7;
pub const A7: Square = 8;
pub const B7: Square = 9;
pub const C7: Square = 10;
pub const D7: Square = 11;
pub const E7: Square = 12;
pub const F7: Square = 13;
pub const G7: Square = 14;
pub const H7: Square = 15;
pub const A6: Square = 16;
pub const B6: Square = 17;
pub const C6: Square = 18;
pub const D6: Square = 19;
pub const E6: Square = 20;
pub const F6: Square = 21;
pub const G6: Square = 22;
pub const H6: Square = 23;
pub const A5: Square = 24;
pub const B5: Square = 25;
pub const C5: Square = 26;
pub const D5: Square = 27;
pub const E5: Square = 28;
pub const F5: Square = 29;
pub const G5: Square = 30;
pub const H5: Square = 31;
pub const A4: Square = 32;
pub const B4: Square = 33;
pub const C4: Square = 34;
pub const D4: Square = 35;
pub const E4: Square = 36;
pub const F4: Square = 37;
pub const G4: Square = 38;
pub const H4: Square = 39;
pub const A3: Square = 40;
pub const B3: Square = 41;
pub const C3: Square = 42;
pub const D3: Square = 43;
pub const E3: Square = 44;
pub const F3: Square = 45;
pub const G3: Square = 46;
pub const H3: Square = 47;
pub const A2: Square = 48;
pub const B2: Square = 49;
pub const C2: Square = 50;
pub const D2: Square = 51;
pub const E2: Square = 52;
pub const F2: Square = 53;
pub const G2: Square = 54;
pub const H2: Square = 55;
pub const A1: Square = 56;
pub const B1: Square = 57;
pub const C1: Square = 58;
pub const D1: Square = 59;
pub const E1: Square = 60;
pub const F1: Square = 61;
pub const G1: Square = 62;
pub const H1: Square = 63;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_numbering_runs_from_a8_to_h1() {
        assert_eq!(A8, 0);
        assert_eq!(H8, 7);
        assert_eq!(A1, 56);
        assert_eq!(H1, 63);
        assert_eq!(square_file(E2), 4);
        assert_eq!(square_rank(E2), 1);
        assert_eq!(square_from_file_rank(4, 1), E2);
        assert_eq!(mirror_square(E2), E7);
        assert_eq!((file_char(G1), rank_char(G1)), ('g', '1'));
    }

    #[test]
    fn piece_fen_chars_round_trip() {
        for ch in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_fen_char(ch).expect("piece letter should parse");
            assert_eq!(piece.to_fen_char(), ch);
        }
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('3'), None);
    }

    #[test]
    fn piece_indices_are_dense() {
        let mut seen = [false; 12];
        for ch in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_fen_char(ch).expect("piece letter should parse");
            seen[piece.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
