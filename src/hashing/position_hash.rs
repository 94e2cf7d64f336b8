//! Board hashing with full recompute and incremental update.
//!
//! Each hash is the XOR of one key per square, chosen by the square's
//! occupant (one of twelve pieces or empty). Only the board takes part: side
//! to move, castling and en passant are not hashed. Keys are drawn from a
//! fixed seed so values are stable across runs.
//!
//! This is a different function from the 16-bit bucket hash returned by
//! [`compress`](crate::codecs::compressed_position::compress).

use std::ops::BitXor;
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{castle_squares, en_passant_victim_square};
use crate::moves::move_descriptions::Move;

/// Twelve piece indices plus one for an empty square.
const EMPTY_INDEX: usize = 12;
const KEYS_PER_SQUARE: usize = 13;

const KEY_SEED: u64 = 0x5EED_C0DE_0000_0032;

type KeyTable<W> = [[W; KEYS_PER_SQUARE]; 64];

static KEYS_32: OnceLock<Box<KeyTable<u32>>> = OnceLock::new();
static KEYS_64: OnceLock<Box<KeyTable<u64>>> = OnceLock::new();

fn build_keys<W: Copy + Default>(mut draw: impl FnMut(&mut StdRng) -> W) -> Box<KeyTable<W>> {
    let mut rng = StdRng::seed_from_u64(KEY_SEED);
    let mut table = Box::new([[W::default(); KEYS_PER_SQUARE]; 64]);
    for square in table.iter_mut() {
        for key in square.iter_mut() {
            *key = draw(&mut rng);
        }
    }
    table
}

/// An unsigned word the board hash can be computed in.
trait HashWord: Copy + Default + BitXor<Output = Self> + 'static {
    fn keys() -> &'static KeyTable<Self>;
}

impl HashWord for u32 {
    fn keys() -> &'static KeyTable<u32> {
        KEYS_32.get_or_init(|| build_keys(|rng| rng.random::<u32>()))
    }
}

impl HashWord for u64 {
    fn keys() -> &'static KeyTable<u64> {
        KEYS_64.get_or_init(|| build_keys(|rng| rng.random::<u64>()))
    }
}

#[inline]
fn occupant_index(piece: Option<Piece>) -> usize {
    piece.map_or(EMPTY_INDEX, Piece::index)
}

#[inline]
fn key<W: HashWord>(square: Square, piece: Option<Piece>) -> W {
    W::keys()[square as usize][occupant_index(piece)]
}

fn calculate<W: HashWord>(position: &Position) -> W {
    position
        .squares
        .iter()
        .enumerate()
        .fold(W::default(), |hash, (square, &piece)| hash ^ key::<W>(square as Square, piece))
}

/// XOR delta for `square` changing from `before` to `after`.
#[inline]
fn swap<W: HashWord>(square: Square, before: Option<Piece>, after: Option<Piece>) -> W {
    key::<W>(square, before) ^ key::<W>(square, after)
}

fn update<W: HashWord>(position: &Position, hash: W, mv: Move) -> W {
    let color = position.side_to_move;
    let mut hash = hash;

    if let Some((king_from, king_to, rook_from, rook_to)) = castle_squares(mv.special) {
        let king = Some(Piece::new(color, PieceKind::King));
        let rook = Some(Piece::new(color, PieceKind::Rook));
        hash = hash ^ swap(king_from, king, None) ^ swap(king_to, None, king);
        hash = hash ^ swap(rook_from, rook, None) ^ swap(rook_to, None, rook);
        return hash;
    }

    let moving = position.piece_at(mv.src);
    let target = position.piece_at(mv.dst);
    let arriving = match mv.special.promotion_kind() {
        Some(kind) => Some(Piece::new(color, kind)),
        None => moving,
    };
    hash = hash ^ swap(mv.src, moving, None) ^ swap(mv.dst, target, arriving);

    if mv.special.is_en_passant() {
        let victim_square = en_passant_victim_square(mv.special, mv.dst);
        hash = hash ^ swap(victim_square, position.piece_at(victim_square), None);
    }

    hash
}

/// 32-bit board hash computed from scratch.
pub fn hash_calculate(position: &Position) -> u32 {
    calculate(position)
}

/// The 32-bit hash after `mv`, given `hash` of `position` before the move.
///
/// `position` must be the position the move is made from; it is not changed.
pub fn hash_update(position: &Position, hash: u32, mv: Move) -> u32 {
    update(position, hash, mv)
}

/// 64-bit board hash computed from scratch.
pub fn hash64_calculate(position: &Position) -> u64 {
    calculate(position)
}

/// The 64-bit hash after `mv`, see [`hash_update`].
pub fn hash64_update(position: &Position, hash: u64, mv: Move) -> u64 {
    update(position, hash, mv)
}
