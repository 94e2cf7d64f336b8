//! Static sanity checks on a set-up position.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::game_state::chess_types::*;

/// Bitmask of the reasons a position cannot arise in a game. Empty means legal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IllegalReasons(u8);

impl IllegalReasons {
    pub const NONE: Self = Self(0);
    /// A pawn on the first or eighth rank.
    pub const PAWN_POSITION: Self = Self(1);
    pub const NOT_ONE_KING_EACH: Self = Self(2);
    /// The side to move could capture the other king.
    pub const CAN_TAKE_KING: Self = Self(4);
    pub const WHITE_TOO_MANY_PIECES: Self = Self(8);
    pub const WHITE_TOO_MANY_PAWNS: Self = Self(16);
    pub const BLACK_TOO_MANY_PIECES: Self = Self(32);
    pub const BLACK_TOO_MANY_PAWNS: Self = Self(64);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::PAWN_POSITION, "pawn on first or last rank"),
        (Self::NOT_ONE_KING_EACH, "not exactly one king each"),
        (Self::CAN_TAKE_KING, "king can be captured"),
        (Self::WHITE_TOO_MANY_PIECES, "white has too many pieces"),
        (Self::WHITE_TOO_MANY_PAWNS, "white has too many pawns"),
        (Self::BLACK_TOO_MANY_PIECES, "black has too many pieces"),
        (Self::BLACK_TOO_MANY_PAWNS, "black has too many pawns"),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_legal(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for IllegalReasons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for IllegalReasons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for IllegalReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_legal() {
            return f.write_str("legal");
        }
        let mut first = true;
        for (reason, name) in Self::NAMES {
            if self.contains(reason) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Material {
    kings: u32,
    /// Everything but pawns, king included.
    pieces: u32,
    pawns: u32,
}

impl Material {
    fn too_many(&self) -> (bool, bool) {
        (self.pieces > 8 && self.pieces + self.pawns > 16, self.pawns > 8)
    }
}

impl Position {
    /// Every reason this position could not have come from a game.
    pub fn is_legal(&self) -> IllegalReasons {
        let mut reasons = IllegalReasons::NONE;
        let mut material = [Material::default(), Material::default()];
        let mut waiting_king = None;
        let waiting = self.side_to_move.opposite();

        for (square, piece) in self.squares.iter().enumerate() {
            let Some(piece) = piece else {
                continue;
            };
            let square = square as Square;
            let count = &mut material[piece.color.index()];
            match piece.kind {
                PieceKind::Pawn => {
                    count.pawns += 1;
                    let rank = square_rank(square);
                    if rank == 0 || rank == 7 {
                        reasons |= IllegalReasons::PAWN_POSITION;
                    }
                }
                PieceKind::King => {
                    count.kings += 1;
                    count.pieces += 1;
                    if piece.color == waiting {
                        waiting_king = Some(square);
                    }
                }
                _ => count.pieces += 1,
            }
        }

        let [light, dark] = &material;
        if light.kings != 1 || dark.kings != 1 {
            reasons |= IllegalReasons::NOT_ONE_KING_EACH;
        }
        if waiting_king.is_some_and(|square| self.is_square_attacked(square, self.side_to_move)) {
            reasons |= IllegalReasons::CAN_TAKE_KING;
        }

        let (pieces, pawns) = light.too_many();
        if pieces {
            reasons |= IllegalReasons::WHITE_TOO_MANY_PIECES;
        }
        if pawns {
            reasons |= IllegalReasons::WHITE_TOO_MANY_PAWNS;
        }
        let (pieces, pawns) = dark.too_many();
        if pieces {
            reasons |= IllegalReasons::BLACK_TOO_MANY_PIECES;
        }
        if pawns {
            reasons |= IllegalReasons::BLACK_TOO_MANY_PAWNS;
        }

        reasons
    }
}
