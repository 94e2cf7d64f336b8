//! Canonical chess-rule constants.
//!
//! Static rule literals and capacities shared by the position model, the
//! move generator, the draw detector and the binary codec.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Slots in each of the per-game ring buffers (played moves and detail snapshots).
///
/// Once full, the oldest entry is overwritten. Repetition search and undo can
/// therefore look back at most this many half-moves.
pub const HISTORY_CAPACITY: usize = 256;

/// Upper bound on the number of moves generated for one position.
///
/// Sum of the best case for every piece type: queens, rooks, bishops,
/// knights, king, four promoting pawns and three more promoted queens.
pub const MAX_MOVES: usize = 27 + 2 * 14 + 2 * 13 + 2 * 8 + 8 + 8 * 4 + 3 * 27;

/// Half-move clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_HALF_MOVES: u32 = 100;

/// Occurrences of a position (current one included) that make a repetition draw.
pub const REPETITION_DRAW_COUNT: usize = 3;

/// Size of a compressed position record.
pub const COMPRESSED_POSITION_BYTES: usize = 24;
