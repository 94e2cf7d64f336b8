//! Legal move generation and terminal classification.
//!
//! Each pseudo-legal move is made on a scratch copy, kept if the mover's king
//! is not attacked afterwards, then unmade.

use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{
    ensure_playable, GeneratedMove, MoveAnnotations, MoveGenResult, MoveGenerator,
};
use crate::moves::move_descriptions::{Move, MoveList};

impl Position {
    pub fn generate_legal_moves(&self) -> MoveList {
        let mut scratch = *self;
        self.generate_pseudo_legal_moves()
            .into_iter()
            .filter(|&mv| scratch.keeps_king_safe(mv))
            .collect()
    }

    /// Legal moves with check, checkmate and stalemate flags for each.
    pub fn generate_legal_moves_annotated(&self) -> Vec<GeneratedMove> {
        let mut scratch = *self;
        let mover = self.side_to_move;
        let mut out = Vec::new();

        for mv in self.generate_pseudo_legal_moves() {
            let saved = scratch.make_move(mv);
            if !scratch.is_king_in_check(mover) {
                let check = scratch.is_king_in_check(mover.opposite());
                let stuck = !scratch.has_legal_move();
                out.push(GeneratedMove {
                    mv,
                    annotations: MoveAnnotations {
                        gives_check: check && !stuck,
                        is_checkmate: check && stuck,
                        is_stalemate: !check && stuck,
                    },
                });
            }
            scratch.unmake_move(mv, saved);
        }

        out
    }

    /// Whether `mv` is among the legal moves of this position.
    pub fn is_legal_move(&self, mv: &Move) -> bool {
        self.generate_legal_moves().contains(mv)
    }

    pub fn has_legal_move(&self) -> bool {
        let mut scratch = *self;
        self.generate_pseudo_legal_moves()
            .into_iter()
            .any(|mv| scratch.keeps_king_safe(mv))
    }

    /// `None` when the side not to move is in check (the position could not
    /// have been reached); otherwise the terminal state for the side to move.
    pub fn evaluate(&self) -> Option<Terminal> {
        let mover = self.side_to_move;
        if self.is_king_in_check(mover.opposite()) {
            return None;
        }
        if self.has_legal_move() {
            return Some(Terminal::NotTerminal);
        }

        let in_check = self.is_king_in_check(mover);
        Some(match (mover, in_check) {
            (Color::Light, true) => Terminal::LightCheckmated,
            (Color::Light, false) => Terminal::LightStalemated,
            (Color::Dark, true) => Terminal::DarkCheckmated,
            (Color::Dark, false) => Terminal::DarkStalemated,
        })
    }

    fn keeps_king_safe(&mut self, mv: Move) -> bool {
        let mover = self.side_to_move;
        let saved = self.make_move(mv);
        let safe = !self.is_king_in_check(mover);
        self.unmake_move(mv, saved);
        safe
    }
}

/// Legal moves with full [`MoveAnnotations`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, position: &Position) -> MoveGenResult<Vec<GeneratedMove>> {
        ensure_playable(position)?;
        Ok(position.generate_legal_moves_annotated())
    }
}

/// Legal moves without annotations; skips the reply search per move.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastLegalMoveGenerator;

impl MoveGenerator for FastLegalMoveGenerator {
    fn generate_legal_moves(&self, position: &Position) -> MoveGenResult<Vec<GeneratedMove>> {
        ensure_playable(position)?;
        Ok(position
            .generate_legal_moves()
            .into_iter()
            .map(|mv| GeneratedMove {
                mv,
                annotations: MoveAnnotations::default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::move_generator::MoveGenerationError;
    use crate::moves::move_descriptions::SpecialMove;

    #[test]
    fn pinned_piece_cannot_leave_the_pin() {
        let position = Position::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let moves = position.generate_legal_moves();
        assert!(moves.iter().all(|m| m.src != E2));
        assert!(moves.iter().all(|m| m.src == E1));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let position =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").expect("FEN should parse");
        assert!(position.generate_legal_moves().is_empty());
        assert_eq!(position.evaluate(), Some(Terminal::LightCheckmated));
        assert_eq!(Terminal::LightCheckmated.code(), -1);
    }

    #[test]
    fn stalemate_is_classified() {
        let position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert_eq!(position.evaluate(), Some(Terminal::DarkStalemated));
    }

    #[test]
    fn capturable_king_is_illegal() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(position.evaluate(), None);
        assert!(matches!(
            LegalMoveGenerator.generate_legal_moves(&position),
            Err(MoveGenerationError::InvalidPosition(_))
        ));
    }

    #[test]
    fn annotations_flag_check_mate_and_stalemate() {
        let mate = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").expect("FEN should parse");
        let moves = mate.generate_legal_moves_annotated();
        let back_rank = moves
            .iter()
            .find(|g| g.mv.src == A1 && g.mv.dst == A8)
            .expect("Ra8 should be legal");
        assert!(back_rank.annotations.is_checkmate);
        assert!(!back_rank.annotations.gives_check);

        let check = moves
            .iter()
            .find(|g| g.mv.src == G1 && g.mv.dst == F2)
            .expect("Kf2 should be legal");
        assert_eq!(check.annotations, MoveAnnotations::default());

        let stalemating = Position::from_fen("7k/8/5QK1/8/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let quiet = stalemating
            .generate_legal_moves_annotated()
            .into_iter()
            .find(|g| g.mv.src == F6 && g.mv.dst == F7)
            .expect("Qf7 should be legal");
        assert!(quiet.annotations.is_stalemate);
    }

    #[test]
    fn fast_and_annotated_generators_agree_on_moves() {
        let position =
            Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let full: Vec<Move> = LegalMoveGenerator
            .generate_legal_moves(&position)
            .expect("generation should succeed")
            .into_iter()
            .map(|g| g.mv)
            .collect();
        let fast: Vec<Move> = FastLegalMoveGenerator
            .generate_legal_moves(&position)
            .expect("generation should succeed")
            .into_iter()
            .map(|g| g.mv)
            .collect();
        assert_eq!(full, fast);
        assert_eq!(full.len(), 48);
        assert_eq!(full.iter().filter(|m| m.special.is_castle()).count(), 2);
        assert!(position.is_legal_move(&Move::new(E1, G1, SpecialMove::LightKingsideCastle, None)));
    }
}
