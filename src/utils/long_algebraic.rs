//! Terse coordinate notation (`g1f3`, `e7e8q`) input.
//!
//! Output lives on [`Move::terse_out`].

use tracing::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::{Move, SpecialMove};
use crate::utils::algebraic::square_from_chars;

/// Resolve coordinate text against the legal moves of `position`.
///
/// Only the first four characters must be coordinates. A fifth character of
/// `n`, `b` or `r` (either case) selects an under-promotion; anything else,
/// or nothing, promotes to a queen.
pub fn terse_in(position: &Position, text: &str) -> ChessResult<Move> {
    let chars: Vec<char> = text.chars().take(5).collect();
    let squares = match chars.as_slice() {
        [f1, r1, f2, r2, ..] => square_from_chars(*f1, *r1).zip(square_from_chars(*f2, *r2)),
        _ => None,
    };
    let Some((src, dst)) = squares else {
        debug!(text, "rejected terse move text");
        return Err(ChessErrors::InvalidMoveText(text.to_owned()));
    };

    let promotion = match chars.get(4).map(char::to_ascii_lowercase) {
        Some('n') => SpecialMove::PromoteKnight,
        Some('b') => SpecialMove::PromoteBishop,
        Some('r') => SpecialMove::PromoteRook,
        _ => SpecialMove::PromoteQueen,
    };

    position
        .generate_legal_moves()
        .iter()
        .find(|mv| mv.src == src && mv.dst == dst && (!mv.special.is_promotion() || mv.special == promotion))
        .copied()
        .ok_or_else(|| ChessErrors::IllegalMove(text.to_owned()))
}
