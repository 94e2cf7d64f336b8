//! Per-game rules engine state.
//!
//! `GameState` pairs the current [`Position`] with two bounded rings: the
//! moves played so far and the [`Details`] snapshots taken by every push.
//! Repetition detection walks these rings backward and undo pops them.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::RingStack;
use crate::moves::move_descriptions::Move;

/// A played move plus the clocks it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    pub prev_half_move_clock: u32,
    pub prev_full_move_count: u32,
}

#[derive(Debug)]
pub struct GameState {
    pub position: Position,
    pub(crate) history: RingStack<PlayedMove>,
    pub(crate) detail_stack: RingStack<Details>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning copies the current position only; the clone starts with empty
/// history, so it cannot see repetitions or undo past its creation.
impl Clone for GameState {
    fn clone(&self) -> Self {
        Self::from_position(self.position)
    }
}

impl GameState {
    /// Standard starting position with no history.
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            history: RingStack::new("history"),
            detail_stack: RingStack::new("detail"),
        }
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Replace the position and forget all history. On error nothing changes.
    pub fn set_from_fen(&mut self, fen: &str) -> ChessResult<()> {
        self.position.set_from_fen(fen)?;
        self.history.clear();
        self.detail_stack.clear();
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Make `mv`, saving the replaced details for [`GameState::pop_move`].
    pub fn push_move(&mut self, mv: Move) {
        let saved = self.position.make_move(mv);
        self.detail_stack.push(saved);
    }

    /// Unmake the most recently pushed `mv`.
    pub fn pop_move(&mut self, mv: Move) -> ChessResult<()> {
        let saved = self.detail_stack.pop().ok_or(ChessErrors::HistoryExhausted)?;
        self.position.unmake_move(mv, saved);
        Ok(())
    }

    /// Push `mv` and record it as played: history, clocks and move count.
    pub fn play_move(&mut self, mv: Move) {
        let position = &mut self.position;
        self.history.push(PlayedMove {
            mv,
            prev_half_move_clock: position.half_move_clock,
            prev_full_move_count: position.full_move_count,
        });

        if position.side_to_move == Color::Dark {
            position.full_move_count += 1;
        }

        let pawn_move = matches!(position.piece_at(mv.src), Some(p) if p.kind == PieceKind::Pawn);
        if pawn_move || mv.is_capture() {
            position.half_move_clock = 0;
        } else {
            position.half_move_clock += 1;
        }

        self.push_move(mv);
    }

    /// Take back the last played move, clocks included.
    pub fn undo_last_move(&mut self) -> ChessResult<Move> {
        let played = self.history.peek(0).ok_or(ChessErrors::HistoryExhausted)?;
        self.pop_move(played.mv)?;
        self.history.pop();
        self.position.half_move_clock = played.prev_half_move_clock;
        self.position.full_move_count = played.prev_full_move_count;
        Ok(played.mv)
    }

    /// The most recent played move, if any is retained.
    pub fn last_move(&self) -> Option<Move> {
        self.history.peek(0).map(|played| played.mv)
    }

    /// Number of played moves still retained for look-back.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Played moves dropped because the history ring was full.
    pub fn history_overwritten(&self) -> u64 {
        self.history.overwritten()
    }
}
