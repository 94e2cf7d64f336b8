//! Pseudo-legal move generation.
//!
//! Moves obey piece movement rules but may leave the mover's own king
//! attacked; [`legal_move_generator`](crate::move_generation::legal_move_generator)
//! filters those out.

use crate::game_state::chess_types::*;
use crate::moves::lookup_tables::{pawn_steps, RaySet, StepSet, BISHOP_RAYS, KING_STEPS, KNIGHT_STEPS, QUEEN_RAYS, ROOK_RAYS};
use crate::moves::move_descriptions::{Move, MoveList, SpecialMove};

/// Promotion expansion order. Callers treat the first entry as the default.
pub const PROMOTION_ORDER: [SpecialMove; 4] = [
    SpecialMove::PromoteQueen,
    SpecialMove::PromoteKnight,
    SpecialMove::PromoteBishop,
    SpecialMove::PromoteRook,
];

impl Position {
    pub fn generate_pseudo_legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.append_pseudo_legal_moves(&mut list);
        list
    }

    pub(crate) fn append_pseudo_legal_moves(&self, list: &mut MoveList) {
        let us = self.side_to_move;

        for square in 0..64u8 {
            let Some(piece) = self.squares[square as usize] else {
                continue;
            };
            if piece.color != us {
                continue;
            }

            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(list, square, us),
                PieceKind::Knight => self.step_moves(list, square, &KNIGHT_STEPS[square as usize], SpecialMove::None),
                PieceKind::Bishop => self.ray_moves(list, square, &BISHOP_RAYS[square as usize]),
                PieceKind::Rook => self.ray_moves(list, square, &ROOK_RAYS[square as usize]),
                PieceKind::Queen => self.ray_moves(list, square, &QUEEN_RAYS[square as usize]),
                PieceKind::King => {
                    self.step_moves(list, square, &KING_STEPS[square as usize], SpecialMove::KingMove);
                    self.castling_moves(list, square, us);
                }
            }
        }
    }

    fn ray_moves(&self, list: &mut MoveList, src: Square, rays: &RaySet) {
        let us = self.side_to_move;
        for ray in rays.rays() {
            for &dst in ray.squares() {
                match self.squares[dst as usize] {
                    None => list.push(Move::new(src, dst, SpecialMove::None, None)),
                    Some(target) => {
                        if target.color != us {
                            list.push(Move::new(src, dst, SpecialMove::None, Some(target)));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn step_moves(&self, list: &mut MoveList, src: Square, steps: &StepSet, special: SpecialMove) {
        let us = self.side_to_move;
        for &dst in steps.squares() {
            match self.squares[dst as usize] {
                None => list.push(Move::new(src, dst, special, None)),
                Some(target) if target.color != us => list.push(Move::new(src, dst, special, Some(target))),
                Some(_) => {}
            }
        }
    }

    fn castling_moves(&self, list: &mut MoveList, square: Square, us: Color) {
        let (home, kingside, queenside) = match us {
            Color::Light => (E1, SpecialMove::LightKingsideCastle, SpecialMove::LightQueensideCastle),
            Color::Dark => (E8, SpecialMove::DarkKingsideCastle, SpecialMove::DarkQueensideCastle),
        };
        if square != home {
            return;
        }
        let them = us.opposite();

        // Kingside: f and g empty, king does not start on, cross or land on an attacked square.
        if self.castle_allowed(us, true)
            && self.squares[(home + 1) as usize].is_none()
            && self.squares[(home + 2) as usize].is_none()
            && !self.is_square_attacked(home, them)
            && !self.is_square_attacked(home + 1, them)
            && !self.is_square_attacked(home + 2, them)
        {
            list.push(Move::new(home, home + 2, kingside, None));
        }

        // Queenside: b, c and d empty; only e, d and c must be safe.
        if self.castle_allowed(us, false)
            && self.squares[(home - 1) as usize].is_none()
            && self.squares[(home - 2) as usize].is_none()
            && self.squares[(home - 3) as usize].is_none()
            && !self.is_square_attacked(home, them)
            && !self.is_square_attacked(home - 1, them)
            && !self.is_square_attacked(home - 2, them)
        {
            list.push(Move::new(home, home - 2, queenside, None));
        }
    }

    fn pawn_moves(&self, list: &mut MoveList, src: Square, us: Color) {
        let steps = pawn_steps(src, us);
        let (promotes_from, en_passant_rank, en_passant, double_push) = match us {
            Color::Light => (6, 5, SpecialMove::LightEnPassant, SpecialMove::LightDoublePush),
            Color::Dark => (1, 2, SpecialMove::DarkEnPassant, SpecialMove::DarkDoublePush),
        };
        let promotion = square_rank(src) == promotes_from;
        let en_passant_target = self
            .details
            .enpassant_target
            .filter(|&target| square_rank(target) == en_passant_rank);

        for &dst in steps.captures.squares() {
            if Some(dst) == en_passant_target {
                let victim = Piece::new(us.opposite(), PieceKind::Pawn);
                list.push(Move::new(src, dst, en_passant, Some(victim)));
                continue;
            }
            if let Some(target) = self.squares[dst as usize] {
                if target.color != us {
                    push_pawn_move(list, src, dst, Some(target), promotion, SpecialMove::None);
                }
            }
        }

        for (i, &dst) in steps.advances.squares().iter().enumerate() {
            if self.squares[dst as usize].is_some() {
                break;
            }
            let special = if i == 0 { SpecialMove::None } else { double_push };
            push_pawn_move(list, src, dst, None, promotion, special);
        }
    }
}

fn push_pawn_move(list: &mut MoveList, src: Square, dst: Square, capture: Option<Piece>, promotion: bool, special: SpecialMove) {
    if promotion {
        for promote in PROMOTION_ORDER {
            list.push(Move::new(src, dst, promote, capture));
        }
    } else {
        list.push(Move::new(src, dst, special, capture));
    }
}
