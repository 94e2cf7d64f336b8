//! Errors used throughout the rules engine.
//!
//! `ChessErrors` is the single error type returned by parsing, notation,
//! codec and history operations. Every variant is an expected failure mode
//! (bad input, exhausted history); nothing here signals internal corruption.

use thiserror::Error;

pub type ChessResult<T> = Result<T, ChessErrors>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// A Forsyth-Edwards string failed validation. The target position is
    /// left unchanged.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// Move text that does not follow terse or natural notation.
    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    /// Well-formed move text (or a move value) that names no legal move.
    #[error("move '{0}' is not legal in this position")]
    IllegalMove(String),

    /// The position needs more than 24 bytes; only reachable for illegal
    /// positions with excess material.
    #[error("position does not fit in a compressed record")]
    CompressionOverflow,

    /// The record ran out of bits before all 64 squares were decoded.
    #[error("compressed record ended before the last square")]
    CompressedDataTruncated,

    /// Undo was requested past the oldest retained ring entry.
    #[error("no retained history to undo")]
    HistoryExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = ChessErrors::InvalidFen("bad side to move 'x'".to_owned());
        assert_eq!(err.to_string(), "invalid FEN: bad side to move 'x'");
        assert_eq!(
            ChessErrors::IllegalMove("e2e5".to_owned()).to_string(),
            "move 'e2e5' is not legal in this position"
        );
    }
}
