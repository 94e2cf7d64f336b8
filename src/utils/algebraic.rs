//! Square conversions for coordinate notation (`e4`).

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;

/// Square from a file letter (`a`..`h`) and rank digit (`1`..`8`).
#[inline]
pub fn square_from_chars(file: char, rank: char) -> Option<Square> {
    if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some(square_from_file_rank(file as u8 - b'a', rank as u8 - b'1'))
}

/// Convert coordinate notation (for example: "e4") to a square index.
pub fn algebraic_to_square(text: &str) -> ChessResult<Square> {
    let mut chars = text.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(file), Some(rank), None) => square_from_chars(file, rank)
            .ok_or_else(|| ChessErrors::InvalidMoveText(format!("invalid square: {text}"))),
        _ => Err(ChessErrors::InvalidMoveText(format!("invalid square: {text}"))),
    }
}

/// Convert a square index to coordinate notation (for example: "e4").
pub fn square_to_algebraic(square: Square) -> String {
    let mut out = String::with_capacity(2);
    out.push(file_char(square));
    out.push(rank_char(square));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_both_ways() {
        assert_eq!(algebraic_to_square("e4").expect("e4 should parse"), E4);
        assert_eq!(algebraic_to_square("a8").expect("a8 should parse"), A8);
        assert_eq!(square_to_algebraic(H1), "h1");
        assert_eq!(square_to_algebraic(C6), "c6");
    }

    #[test]
    fn rejects_out_of_range_text() {
        assert!(algebraic_to_square("i4").is_err());
        assert!(algebraic_to_square("e9").is_err());
        assert!(algebraic_to_square("e44").is_err());
        assert!(algebraic_to_square("").is_err());
    }
}
