//! Fixed 24-byte position record.
//!
//! Squares are written a8 to h1, most significant bit first: an empty square
//! takes the two bits `10`, an occupied one a four-bit code that never begins
//! with `10`. Everything else a position carries is folded into piece
//! placements that cannot occur in a legal game:
//!
//! * castling rights: an enemy pawn on the rook's home square;
//! * en passant: a friendly pawn on its own back rank, with the displaced
//!   back-rank occupant parked on the capturable pawn's square;
//! * dark to move: the second king written with the first king's colour.
//!
//! Clocks are not stored. Decoding yields half-move clock 0 and move 1.

use tracing::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::COMPRESSED_POSITION_BYTES;
use crate::game_state::chess_types::*;

const RECORD_BITS: usize = COMPRESSED_POSITION_BYTES * 8;

const EMPTY_CODE: u8 = 0b10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPosition([u8; COMPRESSED_POSITION_BYTES]);

impl CompressedPosition {
    pub fn from_bytes(bytes: [u8; COMPRESSED_POSITION_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_POSITION_BYTES] {
        &self.0
    }

    /// 16-bit bucket key: the record's six little-endian words XORed
    /// together, then folded in half.
    pub fn bucket_hash(&self) -> u16 {
        let word = self
            .0
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .fold(0u32, |acc, word| acc ^ word);
        ((word & 0xFFFF) ^ (word >> 16)) as u16
    }
}

const fn piece_code(piece: Piece) -> u8 {
    match (piece.color, piece.kind) {
        (Color::Light, PieceKind::Rook) => 0,
        (Color::Light, PieceKind::Knight) => 1,
        (Color::Light, PieceKind::Bishop) => 2,
        (Color::Light, PieceKind::Queen) => 3,
        (Color::Light, PieceKind::King) => 4,
        (Color::Light, PieceKind::Pawn) => 5,
        (Color::Dark, PieceKind::Rook) => 6,
        (Color::Dark, PieceKind::Knight) => 7,
        (Color::Dark, PieceKind::Bishop) => 12,
        (Color::Dark, PieceKind::Queen) => 13,
        (Color::Dark, PieceKind::King) => 14,
        (Color::Dark, PieceKind::Pawn) => 15,
    }
}

const fn piece_from_code(code: u8) -> Option<Piece> {
    let (color, kind) = match code {
        0 => (Color::Light, PieceKind::Rook),
        1 => (Color::Light, PieceKind::Knight),
        2 => (Color::Light, PieceKind::Bishop),
        3 => (Color::Light, PieceKind::Queen),
        4 => (Color::Light, PieceKind::King),
        5 => (Color::Light, PieceKind::Pawn),
        6 => (Color::Dark, PieceKind::Rook),
        7 => (Color::Dark, PieceKind::Knight),
        12 => (Color::Dark, PieceKind::Bishop),
        13 => (Color::Dark, PieceKind::Queen),
        14 => (Color::Dark, PieceKind::King),
        15 => (Color::Dark, PieceKind::Pawn),
        _ => return None,
    };
    Some(Piece::new(color, kind))
}

struct BitWriter {
    bytes: [u8; COMPRESSED_POSITION_BYTES],
    bit: usize,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: [0; COMPRESSED_POSITION_BYTES],
            bit: 0,
        }
    }

    fn write(&mut self, value: u8, width: usize) -> ChessResult<()> {
        if self.bit + width > RECORD_BITS {
            return Err(ChessErrors::CompressionOverflow);
        }
        for shift in (0..width).rev() {
            if (value >> shift) & 1 != 0 {
                self.bytes[self.bit / 8] |= 0x80 >> (self.bit % 8);
            }
            self.bit += 1;
        }
        Ok(())
    }
}

struct BitReader<'a> {
    bytes: &'a [u8; COMPRESSED_POSITION_BYTES],
    bit: usize,
}

impl BitReader<'_> {
    fn peek(&self, width: usize) -> ChessResult<u8> {
        if self.bit + width > RECORD_BITS {
            return Err(ChessErrors::CompressedDataTruncated);
        }
        let mut value = 0u8;
        for offset in 0..width {
            let at = self.bit + offset;
            let set = self.bytes[at / 8] & (0x80 >> (at % 8)) != 0;
            value = (value << 1) | u8::from(set);
        }
        Ok(value)
    }

    fn read(&mut self, width: usize) -> ChessResult<u8> {
        let value = self.peek(width)?;
        self.bit += width;
        Ok(value)
    }
}

/// Fold castling, en passant and side to move into a board copy.
fn encode_board(position: &Position) -> Board {
    let mut board = position.squares;

    if position.castle_allowed(Color::Light, true) {
        board[H1 as usize] = Some(Piece::new(Color::Dark, PieceKind::Pawn));
    }
    if position.castle_allowed(Color::Light, false) {
        board[A1 as usize] = Some(Piece::new(Color::Dark, PieceKind::Pawn));
    }
    if position.castle_allowed(Color::Dark, true) {
        board[H8 as usize] = Some(Piece::new(Color::Light, PieceKind::Pawn));
    }
    if position.castle_allowed(Color::Dark, false) {
        board[A8 as usize] = Some(Piece::new(Color::Light, PieceKind::Pawn));
    }

    if let Some(target) = position.groomed_enpassant_target() {
        let target = target as usize;
        match position.side_to_move {
            Color::Light => {
                // Dark pawn on the fifth rank, back-rank slot three ranks up.
                let passed = target + 8;
                board[passed] = board[passed - 24];
                board[passed - 24] = Some(Piece::new(Color::Dark, PieceKind::Pawn));
            }
            Color::Dark => {
                let passed = target - 8;
                board[passed] = board[passed + 24];
                board[passed + 24] = Some(Piece::new(Color::Light, PieceKind::Pawn));
            }
        }
    }

    board
}

/// Pack `position` into a 24-byte record, returning it with its bucket hash.
///
/// Legal positions always fit. Positions with excess material may not, and
/// report [`ChessErrors::CompressionOverflow`].
pub fn compress(position: &Position) -> ChessResult<(CompressedPosition, u16)> {
    let board = encode_board(position);
    let mut writer = BitWriter::new();
    let mut kings = 0;

    for piece in board.iter() {
        let Some(piece) = piece else {
            writer.write(EMPTY_CODE, 2)?;
            continue;
        };

        let mut piece = *piece;
        if piece.kind == PieceKind::King {
            kings += 1;
            if kings == 2 && position.side_to_move == Color::Dark {
                piece = piece.flipped();
            }
        }
        writer.write(piece_code(piece), 4).inspect_err(|_| {
            debug!(fen = %position.to_fen(), "position does not fit in a compressed record");
        })?;
    }

    let record = CompressedPosition(writer.bytes);
    Ok((record, record.bucket_hash()))
}

/// Rebuild the position stored in `record`.
pub fn decompress(record: &CompressedPosition) -> ChessResult<Position> {
    let mut reader = BitReader {
        bytes: &record.0,
        bit: 0,
    };
    let mut position = Position::empty();
    let mut first_king: Option<Color> = None;
    // Without a second king the side cannot be recovered; dark is assumed.
    let mut side = Color::Dark;

    for square in 0..64usize {
        if reader.peek(2)? == EMPTY_CODE {
            reader.read(2)?;
            continue;
        }
        let Some(mut piece) = piece_from_code(reader.read(4)?) else {
            continue;
        };

        if piece.kind == PieceKind::King {
            match first_king {
                None => first_king = Some(piece.color),
                Some(first) => {
                    if piece.color != first {
                        side = Color::Light;
                    } else {
                        side = Color::Dark;
                        piece = piece.flipped();
                    }
                }
            }
        }
        position.squares[square] = Some(piece);
    }
    position.side_to_move = side;

    decode_en_passant(&mut position);
    decode_castling(&mut position);
    position.locate_kings();
    Ok(position)
}

fn decode_en_passant(position: &mut Position) {
    let board = &mut position.squares;
    let dark_pawn = Some(Piece::new(Color::Dark, PieceKind::Pawn));
    let light_pawn = Some(Piece::new(Color::Light, PieceKind::Pawn));

    if let Some(slot) = (A8..=H8).find(|&sq| board[sq as usize] == dark_pawn) {
        let slot = slot as usize;
        board[slot] = board[slot + 24];
        board[slot + 24] = dark_pawn;
        position.details.enpassant_target = Some((slot + 16) as Square);
    } else if let Some(slot) = (A1..=H1).find(|&sq| board[sq as usize] == light_pawn) {
        let slot = slot as usize;
        board[slot] = board[slot - 24];
        board[slot - 24] = light_pawn;
        position.details.enpassant_target = Some((slot - 16) as Square);
    }
}

fn decode_castling(position: &mut Position) {
    let mut rights = 0;
    let homes = [
        (Color::Light, E1, H1, CASTLE_LIGHT_KINGSIDE),
        (Color::Light, E1, A1, CASTLE_LIGHT_QUEENSIDE),
        (Color::Dark, E8, H8, CASTLE_DARK_KINGSIDE),
        (Color::Dark, E8, A8, CASTLE_DARK_QUEENSIDE),
    ];
    for (color, king_home, rook_home, flag) in homes {
        if position.piece_is(king_home, color, PieceKind::King)
            && position.piece_is(rook_home, color.opposite(), PieceKind::Pawn)
        {
            position.squares[rook_home as usize] = Some(Piece::new(color, PieceKind::Rook));
            rights |= flag;
        }
    }
    position.details.castling_rights = rights;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(fen: &str) {
        let position = Position::from_fen(fen).expect("FEN should parse");
        let (record, hash) = compress(&position).expect("legal position should compress");
        assert_eq!(hash, record.bucket_hash());

        let decoded = decompress(&record).expect("record should decompress");
        assert_eq!(decoded, position, "{fen}");
        assert_eq!(decoded.half_move_clock, 0);
        assert_eq!(decoded.full_move_count, 1);
        assert_eq!(decoded.king_square(Color::Light), position.king_square(Color::Light));
        assert_eq!(decoded.king_square(Color::Dark), position.king_square(Color::Dark));
    }

    #[test]
    fn starting_position_round_trips() {
        let (record, _) = compress(&Position::new()).expect("start should compress");
        // 32 pieces at 4 bits and 32 empties at 2 bits fill the record exactly.
        assert_eq!(record.as_bytes().len(), COMPRESSED_POSITION_BYTES);
        let decoded = decompress(&CompressedPosition::from_bytes(*record.as_bytes())).expect("record should decompress");
        assert_eq!(decoded, Position::new());
        assert_eq!(decoded.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    }

    #[test]
    fn castling_side_and_en_passant_combinations_round_trip() {
        let castlings = ["-", "K", "Q", "k", "q", "KQ", "kq", "Kq", "KQkq"];
        for castling in castlings {
            for side in ["w", "b"] {
                round_trip(&format!("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R {side} {castling} - 0 1"));
            }
        }

        // Light to capture: dark pawn just passed, every file.
        for file in 0..8u8 {
            let ep_file = (b'a' + file) as char;
            let mut fifth = ['1'; 8];
            fifth[file as usize] = 'p';
            let capturer = if file == 0 { 1 } else { file as usize - 1 };
            fifth[capturer] = 'P';
            let rank: String = compress_rank(&fifth);
            for castling in ["-", "KQkq"] {
                round_trip(&format!("r3k2r/8/8/{rank}/8/8/8/R3K2R w {castling} {ep_file}6 0 1"));
            }
        }

        // Dark to capture, every file.
        for file in 0..8u8 {
            let ep_file = (b'a' + file) as char;
            let mut fourth = ['1'; 8];
            fourth[file as usize] = 'P';
            let capturer = if file == 7 { 6 } else { file as usize + 1 };
            fourth[capturer] = 'p';
            let rank: String = compress_rank(&fourth);
            for castling in ["-", "KQkq"] {
                round_trip(&format!("r3k2r/8/8/8/{rank}/8/8/R3K2R b {castling} {ep_file}3 0 1"));
            }
        }
    }

    fn compress_rank(cells: &[char; 8]) -> String {
        let mut out = String::new();
        let mut gap = 0;
        for &cell in cells {
            if cell == '1' {
                gap += 1;
                continue;
            }
            if gap > 0 {
                out.push_str(&gap.to_string());
                gap = 0;
            }
            out.push(cell);
        }
        if gap > 0 {
            out.push_str(&gap.to_string());
        }
        out
    }

    #[test]
    fn unusable_en_passant_target_is_not_stored() {
        let raw = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let plain = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 2").expect("FEN should parse");
        let (a, hash_a) = compress(&raw).expect("should compress");
        let (b, hash_b) = compress(&plain).expect("should compress");
        assert_eq!(a, b);
        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn side_to_move_changes_the_record() {
        let light = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let dark = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        let (a, _) = compress(&light).expect("should compress");
        let (b, _) = compress(&dark).expect("should compress");
        assert_ne!(a, b);
        assert_eq!(decompress(&b).expect("should decompress").side_to_move, Color::Dark);
    }

    #[test]
    fn excess_material_overflows() {
        let crowded = Position::from_fen("qqqqkqqq/qqqqqqqq/qqqqqqqq/qqqqqqqq/QQQQQQQQ/QQQQQQQQ/QQQQQQQQ/QQQQKQQQ w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(compress(&crowded), Err(ChessErrors::CompressionOverflow));
    }

    #[test]
    fn record_of_pieces_only_is_truncated() {
        // Every nibble 0x0 decodes as a light rook; 48 squares exhaust the bits.
        let record = CompressedPosition::from_bytes([0; COMPRESSED_POSITION_BYTES]);
        assert_eq!(decompress(&record), Err(ChessErrors::CompressedDataTruncated));
    }
}
