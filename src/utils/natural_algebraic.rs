//! Natural (SAN-like) move notation: `Nf3`, `exd6`, `O-O`, `e8=Q+`.
//!
//! Input is forgiving. Castling may be written `O-O`, `OO` or `o-o`, en
//! passant may carry an `ep`/`e.p.` suffix, check and mate markers are
//! ignored, and the source may be given as a full square, a file, a rank or
//! not at all. Output uses the shortest unambiguous form.

use tracing::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::{Move, SpecialMove};

#[inline]
fn file_of(byte: u8) -> Option<u8> {
    (b'a'..=b'h').contains(&byte).then(|| byte - b'a')
}

#[inline]
fn rank_of(byte: u8) -> Option<u8> {
    (b'1'..=b'8').contains(&byte).then(|| byte - b'1')
}

fn piece_of(byte: u8) -> Option<PieceKind> {
    match byte {
        b'K' => Some(PieceKind::King),
        b'Q' => Some(PieceKind::Queen),
        b'R' => Some(PieceKind::Rook),
        b'N' => Some(PieceKind::Knight),
        b'B' => Some(PieceKind::Bishop),
        b'P' => Some(PieceKind::Pawn),
        _ => None,
    }
}

fn trim_trailing_symbols(text: &mut Vec<u8>) {
    while text.last().is_some_and(|b| !b.is_ascii_alphanumeric()) {
        text.pop();
    }
}

/// What the text pins down about the move; `None` fields are unconstrained.
#[derive(Debug, Default)]
struct MovePattern {
    piece: Option<PieceKind>,
    src_file: Option<u8>,
    src_rank: Option<u8>,
    dst_file: Option<u8>,
    dst_rank: Option<u8>,
    promotion: Option<PieceKind>,
    en_passant: bool,
    /// `Some(true)` for kingside, `Some(false)` for queenside.
    castle: Option<bool>,
}

fn parse_pattern(text: &str, side: Color) -> Option<MovePattern> {
    let mut mv: Vec<u8> = text.split_whitespace().next()?.bytes().collect();
    let mut pattern = MovePattern::default();
    trim_trailing_symbols(&mut mv);

    if mv.ends_with(b"ep") {
        mv.truncate(mv.len() - 2);
        pattern.en_passant = true;
    } else if mv.ends_with(b"e.p") {
        mv.truncate(mv.len() - 3);
        pattern.en_passant = true;
    }
    trim_trailing_symbols(&mut mv);

    if mv.contains(&b'=') {
        let letter = mv.pop()?.to_ascii_uppercase();
        pattern.promotion = match piece_of(letter)? {
            PieceKind::King | PieceKind::Pawn => return None,
            kind => Some(kind),
        };
        trim_trailing_symbols(&mut mv);
    }

    let lowered = mv.to_ascii_lowercase();
    let castle = match lowered.as_slice() {
        b"oo" | b"o-o" => Some(true),
        b"ooo" | b"o-o-o" => Some(false),
        _ => None,
    };
    if let Some(kingside) = castle {
        let home = match side {
            Color::Light => 0,
            Color::Dark => 7,
        };
        pattern.piece = Some(PieceKind::King);
        pattern.src_file = Some(4);
        pattern.src_rank = Some(home);
        pattern.dst_file = Some(if kingside { 6 } else { 2 });
        pattern.dst_rank = Some(home);
        pattern.castle = castle;
        return Some(pattern);
    }

    let len = mv.len();
    match mv.as_slice() {
        // Pawn takes pawn by files alone: "ef".
        &[from, to] if file_of(from).is_some() && file_of(to).is_some() => {
            pattern.src_file = file_of(from);
            pattern.dst_file = file_of(to);
        }
        // Source square and destination file: "e4f".
        &[file, rank, to] if file_of(file).is_some() && rank_of(rank).is_some() && file_of(to).is_some() => {
            pattern.src_file = file_of(file);
            pattern.src_rank = rank_of(rank);
            pattern.dst_file = file_of(to);
        }
        [.., file, rank] if file_of(*file).is_some() && rank_of(*rank).is_some() => {
            pattern.dst_file = file_of(*file);
            pattern.dst_rank = rank_of(*rank);

            if len > 2 {
                if let (Some(file), Some(rank)) = (file_of(mv[0]), rank_of(mv[1])) {
                    pattern.src_file = Some(file);
                    pattern.src_rank = Some(rank);
                } else {
                    if let Some(kind) = piece_of(mv[0]) {
                        pattern.piece = Some(kind);
                    } else {
                        pattern.src_file = Some(file_of(mv[0])?);
                    }
                    if len > 3 && pattern.src_file.is_none() {
                        if let Some(rank) = rank_of(mv[1]) {
                            pattern.src_rank = Some(rank);
                        } else if let Some(file) = file_of(mv[1]) {
                            pattern.src_file = Some(file);
                            if len > 4 {
                                pattern.src_rank = rank_of(mv[2]);
                            }
                        }
                    }
                }
            }
        }
        _ => return None,
    }

    if pattern.en_passant {
        pattern.src_rank = None;
        pattern.dst_rank = None;
    }
    Some(pattern)
}

impl MovePattern {
    /// Pick the first legal move that fits. With a full source square an
    /// absent piece letter matches any piece; otherwise it means a pawn.
    fn resolve(&self, position: &Position, legal: &[Move]) -> Option<Move> {
        let kind_is = |mv: &Move, kind: PieceKind| position.piece_at(mv.src).is_some_and(|p| p.kind == kind);
        let piece = self.piece.unwrap_or(PieceKind::Pawn);

        match (self.src_file, self.src_rank, self.dst_file, self.dst_rank) {
            (Some(sf), Some(sr), Some(df), Some(dr)) => {
                let src = square_from_file_rank(sf, sr);
                let dst = square_from_file_rank(df, dr);
                let found = legal
                    .iter()
                    .find(|mv| self.piece.map_or(true, |kind| kind_is(mv, kind)) && mv.src == src && mv.dst == dst)?;
                match self.castle {
                    Some(kingside) if !found.special.is_castle() || found.special.is_kingside_castle() != kingside => None,
                    _ => Some(*found),
                }
            }
            (Some(sf), None, Some(df), Some(dr)) => {
                let dst = square_from_file_rank(df, dr);
                legal
                    .iter()
                    .find(|mv| kind_is(mv, piece) && square_file(mv.src) == sf && mv.dst == dst)
                    .copied()
            }
            (None, Some(sr), Some(df), Some(dr)) => {
                let dst = square_from_file_rank(df, dr);
                legal
                    .iter()
                    .find(|mv| kind_is(mv, piece) && square_rank(mv.src) == sr && mv.dst == dst)
                    .copied()
            }
            (Some(sf), Some(sr), Some(df), None) => {
                let src = square_from_file_rank(sf, sr);
                legal
                    .iter()
                    .find(|mv| kind_is(mv, piece) && mv.src == src && square_file(mv.dst) == df)
                    .copied()
            }
            (Some(sf), None, Some(df), None) => {
                let found = legal
                    .iter()
                    .find(|mv| kind_is(mv, piece) && square_file(mv.src) == sf && square_file(mv.dst) == df)?;
                (!self.en_passant || found.special.is_en_passant()).then_some(*found)
            }
            (None, None, Some(df), Some(dr)) => {
                let dst = square_from_file_rank(df, dr);
                legal.iter().find(|mv| kind_is(mv, piece) && mv.dst == dst).copied()
            }
            _ => None,
        }
    }
}

/// Resolve natural notation against the legal moves of `position`.
///
/// A promotion without `=X` promotes to a queen. Naming a promotion for a
/// move that does not promote is an error.
pub fn natural_in(position: &Position, text: &str) -> ChessResult<Move> {
    let Some(pattern) = parse_pattern(text, position.side_to_move) else {
        debug!(text, "rejected natural move text");
        return Err(ChessErrors::InvalidMoveText(text.to_owned()));
    };

    let legal = position.generate_legal_moves();
    let mut found = pattern
        .resolve(position, &legal)
        .ok_or_else(|| ChessErrors::IllegalMove(text.to_owned()))?;

    if found.special.is_promotion() {
        let kind = pattern.promotion.unwrap_or(PieceKind::Queen);
        if let Some(special) = SpecialMove::from_promotion_kind(kind) {
            found.special = special;
        }
    } else if pattern.promotion.is_some() {
        return Err(ChessErrors::IllegalMove(text.to_owned()));
    }
    Ok(found)
}

#[derive(Debug, Clone, Copy)]
enum Disambiguation {
    Bare,
    File,
    Rank,
    Square,
}

fn piece_text(letter: char, mv: &Move, by: Disambiguation) -> String {
    let mut out = String::with_capacity(7);
    out.push(letter);
    match by {
        Disambiguation::Bare => {}
        Disambiguation::File => out.push(file_char(mv.src)),
        Disambiguation::Rank => out.push(rank_char(mv.src)),
        Disambiguation::Square => {
            out.push(file_char(mv.src));
            out.push(rank_char(mv.src));
        }
    }
    if mv.is_capture() {
        out.push('x');
    }
    out.push(file_char(mv.dst));
    out.push(rank_char(mv.dst));
    out
}

fn pawn_text(mv: &Move) -> String {
    let mut out = String::with_capacity(6);
    if mv.is_capture() {
        out.push(file_char(mv.src));
        out.push('x');
    }
    out.push(file_char(mv.dst));
    out.push(rank_char(mv.dst));
    if let Some(kind) = mv.special.promotion_kind() {
        out.push('=');
        out.push(kind.letter());
    }
    out
}

/// Natural notation for a legal move, with `+` for check and `#` for mate.
///
/// Pieces get the first of `Nd2`, `Nbd2`, `N1d2` that no other legal move
/// shares, falling back to `Nb1d2`.
pub fn natural_out(position: &Position, mv: &Move) -> ChessResult<String> {
    let annotated = position.generate_legal_moves_annotated();
    let Some(entry) = annotated.iter().find(|g| g.mv == *mv) else {
        return Err(ChessErrors::IllegalMove(mv.terse_out()));
    };
    let kind_of = |m: &Move| position.piece_at(m.src).map_or(PieceKind::Pawn, |p| p.kind);

    let mut text = if kind_of(mv) == PieceKind::Pawn {
        pawn_text(mv)
    } else if mv.special.is_castle() {
        String::from(if mv.special.is_kingside_castle() { "O-O" } else { "O-O-O" })
    } else {
        let form = |m: &Move, by: Disambiguation| piece_text(kind_of(m).letter(), m, by);
        [Disambiguation::Bare, Disambiguation::File, Disambiguation::Rank]
            .into_iter()
            .find(|&by| {
                let candidate = form(mv, by);
                annotated.iter().filter(|g| form(&g.mv, by) == candidate).count() == 1
            })
            .map_or_else(|| form(mv, Disambiguation::Square), |by| form(mv, by))
    };

    if entry.annotations.is_checkmate {
        text.push('#');
    } else if entry.annotations.gives_check {
        text.push('+');
    }
    Ok(text)
}
