//! Move generator seam shared by the legal generators and perft.
//!
//! Generators reject positions where the side not to move is in check with
//! [`MoveGenerationError::InvalidPosition`].

use thiserror::Error;

use crate::game_state::chess_types::Position;
use crate::moves::move_descriptions::Move;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    /// The side that just moved left its king attacked.
    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveAnnotations {
    /// Check that is not mate.
    pub gives_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedMove {
    pub mv: Move,
    pub annotations: MoveAnnotations,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, position: &Position) -> MoveGenResult<Vec<GeneratedMove>>;
}

/// Reject positions where the side not to move could capture a king.
pub(crate) fn ensure_playable(position: &Position) -> MoveGenResult<()> {
    let waiting = position.side_to_move.opposite();
    if position.is_king_in_check(waiting) {
        return Err(MoveGenerationError::InvalidPosition(format!(
            "{:?} king can be captured in {}",
            waiting,
            position.to_fen()
        )));
    }
    Ok(())
}
