//! FEN-to-Position parser.
//!
//! Accepts extended Forsyth-Edwards text: ranks may be separated by `/`, `|`
//! or `\`, a separator part way through a rank skips the rest of that rank,
//! `x` marks a single empty square, and the placement may stop early (the
//! remaining squares are empty). The full-move field is optional; nothing
//! but whitespace may follow the last field. The whole string is validated
//! into [`FenFields`] first; a [`Position`] is only built once that
//! succeeded.

use tracing::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_from_chars;

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    let fields = validate_fen(fen).map_err(|reason| {
        debug!(fen, %reason, "rejected FEN");
        ChessErrors::InvalidFen(reason)
    })?;
    Ok(fields.commit())
}

/// Every field of a FEN string, checked but not yet applied.
#[derive(Debug, Clone)]
struct FenFields {
    squares: Board,
    side_to_move: Color,
    castling_rights: CastlingRights,
    enpassant_target: Option<Square>,
    half_move_clock: u32,
    full_move_count: u32,
}

impl FenFields {
    fn commit(self) -> Position {
        let mut position = Position::empty();
        position.squares = self.squares;
        position.side_to_move = self.side_to_move;
        position.details.castling_rights = self.castling_rights;
        position.details.enpassant_target = self.enpassant_target;
        position.half_move_clock = self.half_move_clock;
        position.full_move_count = self.full_move_count;
        position.locate_kings();
        position
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn rest(&self) -> &'a str {
        std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or_default()
    }

    fn digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.pos]).ok()
    }
}

#[inline]
fn is_separator(byte: u8) -> bool {
    matches!(byte, b'/' | b'|' | b'\\')
}

fn validate_fen(fen: &str) -> Result<FenFields, String> {
    let mut cursor = Cursor::new(fen);

    let squares = parse_placement(&mut cursor)?;
    let side_to_move = parse_side_to_move(&mut cursor)?;
    let castling_rights = parse_castling_rights(&mut cursor)?;
    let enpassant_target = parse_en_passant_square(&mut cursor)?;

    cursor.skip_blanks();
    let half_move_clock = cursor
        .digits()
        .ok_or("missing halfmove clock")?
        .parse::<u32>()
        .map_err(|e| format!("invalid halfmove clock: {e}"))?;

    cursor.skip_blanks();
    let full_move_count = match cursor.digits() {
        Some(digits) => digits
            .parse::<u32>()
            .map_err(|e| format!("invalid fullmove number: {e}"))?,
        None => 1,
    };

    let rest = cursor.rest();
    if !rest.trim().is_empty() {
        return Err(format!("unexpected text after move counters: '{}'", rest.trim()));
    }

    Ok(FenFields {
        squares,
        side_to_move,
        castling_rights,
        enpassant_target,
        half_move_clock,
        full_move_count,
    })
}

fn parse_placement(cursor: &mut Cursor<'_>) -> Result<Board, String> {
    let mut squares: Board = [None; 64];
    let mut index = 0usize;

    while index < 64 {
        let Some(byte) = cursor.next() else {
            break;
        };

        let skip = match byte {
            b' ' | b'\t' => break,
            b'x' => 1,
            b'1'..=b'8' => usize::from(byte - b'0'),
            sep if is_separator(sep) => {
                let file = index % 8;
                let mut skip = if file == 0 { 0 } else { 8 - file };
                while cursor.peek().is_some_and(is_separator) {
                    cursor.next();
                    skip += 8;
                }
                skip
            }
            other => {
                let piece = Piece::from_fen_char(char::from(other))
                    .ok_or_else(|| format!("invalid character '{}' in piece placement", char::from(other)))?;
                squares[index] = Some(piece);
                1
            }
        };

        index = (index + skip).min(64);
    }

    Ok(squares)
}

fn parse_side_to_move(cursor: &mut Cursor<'_>) -> Result<Color, String> {
    if cursor.peek().is_some_and(is_separator) {
        cursor.next();
    }
    cursor.skip_blanks();

    match cursor.next() {
        Some(b'w' | b'W') => Ok(Color::Light),
        Some(b'b' | b'B') => Ok(Color::Dark),
        Some(other) => Err(format!("invalid side-to-move '{}'", char::from(other))),
        None => Err("missing side-to-move".to_owned()),
    }
}

fn parse_castling_rights(cursor: &mut Cursor<'_>) -> Result<CastlingRights, String> {
    cursor.skip_blanks();
    if cursor.peek() == Some(b'-') {
        cursor.next();
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for _ in 0..4 {
        match cursor.peek() {
            Some(b'K') => rights |= CASTLE_LIGHT_KINGSIDE,
            Some(b'Q') => rights |= CASTLE_LIGHT_QUEENSIDE,
            Some(b'k') => rights |= CASTLE_DARK_KINGSIDE,
            Some(b'q') => rights |= CASTLE_DARK_QUEENSIDE,
            // Placeholder dashes such as "KQ-q" are allowed.
            Some(b'-') => {}
            Some(b' ' | b'\t') => break,
            Some(other) => return Err(format!("invalid castling character '{}'", char::from(other))),
            None => return Err("missing castling rights".to_owned()),
        }
        cursor.next();
    }

    Ok(rights)
}

fn parse_en_passant_square(cursor: &mut Cursor<'_>) -> Result<Option<Square>, String> {
    cursor.skip_blanks();
    match cursor.next() {
        Some(b'-') => Ok(None),
        Some(file @ (b'a'..=b'h' | b'A'..=b'H')) => {
            let file = char::from(file.to_ascii_lowercase());
            let rank = cursor.next().map(char::from).unwrap_or(' ');
            square_from_chars(file, rank)
                .map(Some)
                .ok_or_else(|| format!("invalid en-passant rank '{rank}'"))
        }
        Some(other) => Err(format!("invalid en-passant square '{}'", char::from(other))),
        None => Err("missing en-passant square".to_owned()),
    }
}
