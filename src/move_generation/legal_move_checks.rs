//! Attack and check detection.

use crate::game_state::chess_types::*;
use crate::moves::lookup_tables::{attack_rays, KNIGHT_STEPS};

impl Position {
    /// Whether any `attacker` piece hits `square`.
    ///
    /// Walks the attack rays outward from `square`; the first occupied square
    /// on each ray either attacks or blocks. Knights are probed directly.
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        for ray in attack_rays(square, attacker).rays() {
            for (target, mask) in ray.steps() {
                if let Some(piece) = self.squares[target as usize] {
                    if piece.color == attacker && piece.kind.mask() & mask != 0 {
                        return true;
                    }
                    break;
                }
            }
        }

        KNIGHT_STEPS[square as usize]
            .squares()
            .iter()
            .any(|&from| self.piece_is(from, attacker, PieceKind::Knight))
    }

    /// Whether the piece on `square` is attacked by the other color. An empty
    /// square is treated as light, so it is tested against dark attackers.
    pub fn is_piece_attacked(&self, square: Square) -> bool {
        let defender = self.squares[square as usize].map_or(Color::Light, |p| p.color);
        self.is_square_attacked(square, defender.opposite())
    }

    #[inline]
    pub fn is_king_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }
}
