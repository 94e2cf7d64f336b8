//! Reversible make/unmake on a [`Position`].
//!
//! `make_move` returns the [`Details`] it replaced; handing the same value
//! back to `unmake_move` restores the position exactly. Calls must nest
//! last-in first-out.

use crate::game_state::chess_types::*;
use crate::moves::lookup_tables::CASTLING_CLEARED_BY_DESTINATION;
use crate::moves::move_descriptions::{Move, SpecialMove};

/// King and rook travel for a castling tag:
/// `(king_from, king_to, rook_from, rook_to)`.
pub(crate) const fn castle_squares(special: SpecialMove) -> Option<(Square, Square, Square, Square)> {
    match special {
        SpecialMove::LightKingsideCastle => Some((E1, G1, H1, F1)),
        SpecialMove::LightQueensideCastle => Some((E1, C1, A1, D1)),
        SpecialMove::DarkKingsideCastle => Some((E8, G8, H8, F8)),
        SpecialMove::DarkQueensideCastle => Some((E8, C8, A8, D8)),
        _ => None,
    }
}

/// Square of the pawn removed by an en-passant capture landing on `dst`.
#[inline]
pub(crate) const fn en_passant_victim_square(special: SpecialMove, dst: Square) -> Square {
    match special {
        SpecialMove::DarkEnPassant => dst - 8,
        _ => dst + 8,
    }
}

impl Position {
    pub fn make_move(&mut self, mv: Move) -> Details {
        let saved = self.details;
        let color = self.side_to_move;
        let src = mv.src as usize;
        let dst = mv.dst as usize;

        // Arrival on a king or rook home square is enough: castling also
        // checks that both pieces still stand at home.
        self.details.castling_rights &= !CASTLING_CLEARED_BY_DESTINATION[dst];
        self.details.enpassant_target = None;

        match mv.special {
            SpecialMove::None => {
                self.squares[dst] = self.squares[src];
                self.squares[src] = None;
            }
            SpecialMove::KingMove => {
                self.squares[dst] = self.squares[src];
                self.squares[src] = None;
                self.set_king_square(color, mv.dst);
            }
            SpecialMove::PromoteQueen
            | SpecialMove::PromoteRook
            | SpecialMove::PromoteBishop
            | SpecialMove::PromoteKnight => {
                self.squares[src] = None;
                self.squares[dst] = mv.special.promotion_kind().map(|kind| Piece::new(color, kind));
            }
            SpecialMove::LightEnPassant | SpecialMove::DarkEnPassant => {
                self.squares[dst] = self.squares[src];
                self.squares[src] = None;
                self.squares[en_passant_victim_square(mv.special, mv.dst) as usize] = None;
            }
            SpecialMove::LightDoublePush => {
                self.squares[dst] = self.squares[src];
                self.squares[src] = None;
                self.details.enpassant_target = Some(mv.dst + 8);
            }
            SpecialMove::DarkDoublePush => {
                self.squares[dst] = self.squares[src];
                self.squares[src] = None;
                self.details.enpassant_target = Some(mv.dst - 8);
            }
            SpecialMove::LightKingsideCastle
            | SpecialMove::LightQueensideCastle
            | SpecialMove::DarkKingsideCastle
            | SpecialMove::DarkQueensideCastle => {
                if let Some((king_from, king_to, rook_from, rook_to)) = castle_squares(mv.special) {
                    self.squares[king_from as usize] = None;
                    self.squares[rook_from as usize] = None;
                    self.squares[king_to as usize] = Some(Piece::new(color, PieceKind::King));
                    self.squares[rook_to as usize] = Some(Piece::new(color, PieceKind::Rook));
                    self.set_king_square(color, king_to);
                }
            }
        }

        self.toggle();
        saved
    }

    pub fn unmake_move(&mut self, mv: Move, saved: Details) {
        self.details = saved;
        self.toggle();
        let color = self.side_to_move;
        let src = mv.src as usize;
        let dst = mv.dst as usize;

        match mv.special {
            SpecialMove::None
            | SpecialMove::KingMove
            | SpecialMove::LightDoublePush
            | SpecialMove::DarkDoublePush => {
                self.squares[src] = self.squares[dst];
                self.squares[dst] = mv.capture;
            }
            SpecialMove::PromoteQueen
            | SpecialMove::PromoteRook
            | SpecialMove::PromoteBishop
            | SpecialMove::PromoteKnight => {
                self.squares[src] = Some(Piece::new(color, PieceKind::Pawn));
                self.squares[dst] = mv.capture;
            }
            SpecialMove::LightEnPassant | SpecialMove::DarkEnPassant => {
                self.squares[src] = self.squares[dst];
                self.squares[dst] = None;
                self.squares[en_passant_victim_square(mv.special, mv.dst) as usize] = mv.capture;
            }
            SpecialMove::LightKingsideCastle
            | SpecialMove::LightQueensideCastle
            | SpecialMove::DarkKingsideCastle
            | SpecialMove::DarkQueensideCastle => {
                if let Some((king_from, king_to, rook_from, rook_to)) = castle_squares(mv.special) {
                    self.squares[king_to as usize] = None;
                    self.squares[rook_to as usize] = None;
                    self.squares[king_from as usize] = Some(Piece::new(color, PieceKind::King));
                    self.squares[rook_from as usize] = Some(Piece::new(color, PieceKind::Rook));
                }
            }
        }
    }

    #[inline]
    fn set_king_square(&mut self, color: Color, square: Square) {
        match color {
            Color::Light => self.details.light_king_square = square,
            Color::Dark => self.details.dark_king_square = square,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn assert_round_trip(fen: &str) {
        let original = Position::from_fen(fen).expect("FEN should parse");
        let mut position = original;

        for mv in original.generate_legal_moves() {
            let saved = position.make_move(mv);
            assert_ne!(position.side_to_move, original.side_to_move);
            position.unmake_move(mv, saved);
            assert!(position.is_identical(&original), "{fen}: {mv} did not unmake cleanly");
        }
    }

    #[test]
    fn make_unmake_restores_every_special_kind() {
        assert_round_trip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_round_trip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1");
        assert_round_trip("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        assert_round_trip("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1");
        assert_round_trip("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
    }

    #[test]
    fn castling_moves_king_and_rook_and_tracks_king_square() {
        let mut position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle = Move::new(E1, G1, SpecialMove::LightKingsideCastle, None);

        position.make_move(castle);

        assert!(position.piece_is(G1, Color::Light, PieceKind::King));
        assert!(position.piece_is(F1, Color::Light, PieceKind::Rook));
        assert_eq!(position.piece_at(H1), None);
        assert_eq!(position.king_square(Color::Light), G1);
        assert!(!position.light_kingside_allowed());
        assert!(!position.light_queenside_allowed());
        assert!(position.dark_kingside_allowed());
    }

    #[test]
    fn double_push_sets_target_and_en_passant_removes_pawn() {
        let mut position = Position::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        position.make_move(Move::new(D7, D5, SpecialMove::DarkDoublePush, None));
        assert_eq!(position.details.enpassant_target, Some(D6));

        let capture = Some(Piece::new(Color::Dark, PieceKind::Pawn));
        let saved = position.make_move(Move::new(E5, D6, SpecialMove::LightEnPassant, capture));
        assert_eq!(position.piece_at(D5), None);
        assert!(position.piece_is(D6, Color::Light, PieceKind::Pawn));
        assert_eq!(position.details.enpassant_target, None);

        position.unmake_move(Move::new(E5, D6, SpecialMove::LightEnPassant, capture), saved);
        assert!(position.piece_is(D5, Color::Dark, PieceKind::Pawn));
        assert_eq!(position.details.enpassant_target, Some(D6));
    }

    #[test]
    fn random_playouts_unwind_to_the_start() {
        let mut rng = StdRng::seed_from_u64(0x5EED);

        for _ in 0..8 {
            let start = Position::new();
            let mut position = start;
            let mut trail = Vec::new();

            for _ in 0..60 {
                let moves = position.generate_legal_moves();
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.random_range(0..moves.len())];
                let saved = position.make_move(mv);
                trail.push((mv, saved));
            }

            while let Some((mv, saved)) = trail.pop() {
                position.unmake_move(mv, saved);
            }
            assert!(position.is_identical(&start));
        }
    }
}
