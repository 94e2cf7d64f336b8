//! Position-to-FEN generator.

use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

/// Canonical FEN for a position.
///
/// Castling letters appear only for castling that is really available and
/// the en-passant field only names a target some pawn can capture onto.
pub fn generate_fen(position: &Position) -> String {
    let board = generate_board_field(&position.squares);
    let side_to_move = match position.side_to_move {
        Color::Light => "w",
        Color::Dark => "b",
    };
    let castling = generate_castling_field(position.allowed_castling());
    let en_passant = position
        .groomed_enpassant_target()
        .map(square_to_algebraic)
        .unwrap_or_else(|| "-".to_owned());

    format!(
        "{} {} {} {} {} {}",
        board, side_to_move, castling, en_passant, position.half_move_clock, position.full_move_count
    )
}

fn generate_board_field(squares: &Board) -> String {
    let mut out = String::new();

    for (row, rank) in squares.chunks(8).enumerate() {
        let mut empty_count = 0u8;

        for square in rank {
            match square {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.to_fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row < 7 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    if (rights & CASTLE_LIGHT_KINGSIDE) != 0 {
        out.push('K');
    }
    if (rights & CASTLE_LIGHT_QUEENSIDE) != 0 {
        out.push('Q');
    }
    if (rights & CASTLE_DARK_KINGSIDE) != 0 {
        out.push('k');
    }
    if (rights & CASTLE_DARK_QUEENSIDE) != 0 {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trip_starting_position_fen() {
        let parsed = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        let generated = generate_fen(&parsed);

        assert_eq!(generated, STARTING_POSITION_FEN);

        let reparsed = parse_fen(&generated).expect("generated FEN should parse");
        assert!(reparsed.is_identical(&parsed));
    }

    #[test]
    fn publish_then_parse_is_idempotent() {
        let fens = [
            "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        ];

        for fen in fens {
            let first = parse_fen(fen).expect("FEN should parse");
            let published = generate_fen(&first);
            assert_eq!(published, fen);
            let second = parse_fen(&published).expect("published FEN should parse");
            assert!(second.cmp_strict(&first));
        }
    }

    #[test]
    fn unusable_rights_and_targets_are_not_published() {
        let parsed = parse_fen("4k3/8/8/3p4/8/8/8/R3K3 w KQkq d6 0 2").expect("FEN should parse");
        assert_eq!(generate_fen(&parsed), "4k3/8/8/3p4/8/8/8/R3K3 w Q - 0 2");
    }
}
