//! Move representation.
//!
//! A [`Move`] records source, destination, the captured piece (so the move can
//! be undone without extra state) and a [`SpecialMove`] tag that selects the
//! board mutation applied by make/unmake.

use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::game_state::chess_rules::MAX_MOVES;
use crate::game_state::chess_types::*;

/// Board mutation selector for make/unmake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecialMove {
    #[default]
    None,
    /// Any non-castling king move; keeps the tracked king square current.
    KingMove,
    LightKingsideCastle,
    DarkKingsideCastle,
    LightQueensideCastle,
    DarkQueensideCastle,
    PromoteQueen,
    PromoteRook,
    PromoteBishop,
    PromoteKnight,
    LightDoublePush,
    DarkDoublePush,
    LightEnPassant,
    DarkEnPassant,
}

impl SpecialMove {
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self {
            SpecialMove::PromoteQueen => Some(PieceKind::Queen),
            SpecialMove::PromoteRook => Some(PieceKind::Rook),
            SpecialMove::PromoteBishop => Some(PieceKind::Bishop),
            SpecialMove::PromoteKnight => Some(PieceKind::Knight),
            _ => None,
        }
    }

    pub const fn from_promotion_kind(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Queen => Some(SpecialMove::PromoteQueen),
            PieceKind::Rook => Some(SpecialMove::PromoteRook),
            PieceKind::Bishop => Some(SpecialMove::PromoteBishop),
            PieceKind::Knight => Some(SpecialMove::PromoteKnight),
            _ => None,
        }
    }

    pub const fn is_promotion(self) -> bool {
        self.promotion_kind().is_some()
    }

    pub const fn is_castle(self) -> bool {
        matches!(
            self,
            SpecialMove::LightKingsideCastle
                | SpecialMove::LightQueensideCastle
                | SpecialMove::DarkKingsideCastle
                | SpecialMove::DarkQueensideCastle
        )
    }

    pub const fn is_kingside_castle(self) -> bool {
        matches!(self, SpecialMove::LightKingsideCastle | SpecialMove::DarkKingsideCastle)
    }

    pub const fn is_en_passant(self) -> bool {
        matches!(self, SpecialMove::LightEnPassant | SpecialMove::DarkEnPassant)
    }

    /// The same tag for the other color. Color-neutral tags map to themselves.
    pub const fn flipped(self) -> Self {
        match self {
            SpecialMove::LightKingsideCastle => SpecialMove::DarkKingsideCastle,
            SpecialMove::DarkKingsideCastle => SpecialMove::LightKingsideCastle,
            SpecialMove::LightQueensideCastle => SpecialMove::DarkQueensideCastle,
            SpecialMove::DarkQueensideCastle => SpecialMove::LightQueensideCastle,
            SpecialMove::LightDoublePush => SpecialMove::DarkDoublePush,
            SpecialMove::DarkDoublePush => SpecialMove::LightDoublePush,
            SpecialMove::LightEnPassant => SpecialMove::DarkEnPassant,
            SpecialMove::DarkEnPassant => SpecialMove::LightEnPassant,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: Square,
    pub dst: Square,
    pub special: SpecialMove,
    pub capture: Option<Piece>,
}

impl Default for Move {
    fn default() -> Self {
        Move::INVALID
    }
}

impl Move {
    /// Null move sentinel; `src == dst` marks a move as not usable.
    pub const INVALID: Move = Move {
        src: A8,
        dst: A8,
        special: SpecialMove::None,
        capture: None,
    };

    #[inline]
    pub const fn new(src: Square, dst: Square, special: SpecialMove, capture: Option<Piece>) -> Self {
        Self {
            src,
            dst,
            special,
            capture,
        }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.src != self.dst
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Coordinate notation such as `g1f3` or `e7e8q`; the null move is `0000`.
    pub fn terse_out(&self) -> String {
        if !self.is_valid() {
            return "0000".to_owned();
        }

        let mut out = String::with_capacity(5);
        out.push(file_char(self.src));
        out.push(rank_char(self.src));
        out.push(file_char(self.dst));
        out.push(rank_char(self.dst));
        if let Some(kind) = self.special.promotion_kind() {
            out.push(kind.letter().to_ascii_lowercase());
        }
        out
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.terse_out())
    }
}

/// Fixed-capacity list of generated moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: SmallVec<[Move; MAX_MOVES]>,
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }
}

impl Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        &self.moves
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = smallvec::IntoIter<[Move; MAX_MOVES]>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}
