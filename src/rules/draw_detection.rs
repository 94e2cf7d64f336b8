//! Draw rules: insufficient material, the fifty-move rule and repetition.

use crate::game_state::chess_rules::{FIFTY_MOVE_HALF_MOVES, HISTORY_CAPACITY, REPETITION_DRAW_COUNT};
use crate::game_state::chess_types::*;

impl Position {
    /// Insufficient-material verdict for a draw requested by `claimant`.
    ///
    /// Bare kings, or a single knight or bishop against a bare king, draw
    /// automatically. Otherwise the claim is granted when the claimant's
    /// opponent has nothing but the king.
    pub fn is_insufficient_draw(&self, claimant: Color) -> Option<DrawType> {
        let mut material = 0;
        let mut minor = false;
        let mut lone = [true; 2];

        for piece in self.squares.iter().flatten() {
            match piece.kind {
                PieceKind::King => continue,
                PieceKind::Knight | PieceKind::Bishop => minor = true,
                _ => {}
            }
            material += 1;
            lone[piece.color.index()] = false;
        }

        if material == 0 || (material == 1 && minor) {
            Some(DrawType::InsufficientAuto)
        } else if lone[claimant.opposite().index()] {
            Some(DrawType::Insufficient)
        } else {
            None
        }
    }
}

impl GameState {
    pub fn is_insufficient_draw(&self, claimant: Color) -> Option<DrawType> {
        self.position.is_insufficient_draw(claimant)
    }

    /// Draw verdict for `claimant`, checked in order: insufficient material,
    /// the fifty-move rule, then threefold repetition.
    pub fn is_draw(&mut self, claimant: Color) -> Option<DrawType> {
        if let Some(draw) = self.is_insufficient_draw(claimant) {
            return Some(draw);
        }
        if self.position.half_move_clock >= FIFTY_MOVE_HALF_MOVES {
            return Some(DrawType::FiftyMove);
        }
        if self.repetition_count() >= REPETITION_DRAW_COUNT {
            return Some(DrawType::Repetition);
        }
        None
    }

    /// Occurrences of the current position, itself included, found by undoing
    /// played moves one at a time.
    ///
    /// The walk ends at a pawn move or capture, since nothing before one can
    /// recur, or when the retained history runs out. A match needs the same
    /// board, side to move, and real castling and en-passant possibilities;
    /// raw flags that differ without changing what can be played do not
    /// prevent a match. The live position is restored before returning.
    pub fn repetition_count(&mut self) -> usize {
        let current = self.position;
        let history_mark = self.history.mark();
        let detail_mark = self.detail_stack.mark();

        let window = self.history.len().min(HISTORY_CAPACITY - 1);

        let mut count = 1;
        for _ in 0..window {
            let Some(record) = self.history.pop() else {
                break;
            };
            let mv = record.mv;
            if !mv.is_valid() || self.pop_move(mv).is_err() {
                break;
            }

            let position = &self.position;
            let same_board = position.side_to_move == current.side_to_move && position.squares == current.squares;
            if same_board && (position.details == current.details || *position == current) {
                count += 1;
            }

            let pawn_move = matches!(position.piece_at(mv.src), Some(p) if p.kind == PieceKind::Pawn);
            if pawn_move || mv.is_capture() {
                break;
            }
        }

        self.position = current;
        self.history.restore(history_mark);
        self.detail_stack.restore(detail_mark);
        count
    }
}
