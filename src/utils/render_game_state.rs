//! Plain-text board renderer.
//!
//! Produces a human-readable view of a position for debugging, tests, and
//! diagnostics in text environments.

use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

/// Render the board with coordinates, followed by one line of metadata.
///
/// Pieces use their FEN letters and empty squares a dot. Castling and en
/// passant show what is really playable, matching the FEN output.
pub fn render_position(position: &Position) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for (row, rank) in position.squares.chunks(8).enumerate() {
        let label = char::from(b'8' - row as u8);
        out.push(label);
        out.push(' ');

        for (file, square) in rank.iter().enumerate() {
            out.push(square.map_or('.', Piece::to_fen_char));
            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(label);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h\n");
    out.push_str(&metadata_line(position));

    out
}

fn metadata_line(position: &Position) -> String {
    let side = match position.side_to_move {
        Color::Light => "light",
        Color::Dark => "dark",
    };

    let castling: String = [
        (position.light_kingside_allowed(), 'K'),
        (position.light_queenside_allowed(), 'Q'),
        (position.dark_kingside_allowed(), 'k'),
        (position.dark_queenside_allowed(), 'q'),
    ]
    .into_iter()
    .filter_map(|(allowed, letter)| allowed.then_some(letter))
    .collect();

    let en_passant = position
        .groomed_enpassant_target()
        .map_or_else(|| "-".to_owned(), square_to_algebraic);

    format!(
        "{side} to move, castling {}, en passant {en_passant}, half-move clock {}, move {}",
        if castling.is_empty() { "-" } else { castling.as_str() },
        position.half_move_clock,
        position.full_move_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_starting_position() {
        let text = render_position(&Position::new());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 r n b q k b n r 8");
        assert_eq!(lines[4], "5 . . . . . . . . 5");
        assert_eq!(lines[8], "1 R N B Q K B N R 1");
        assert_eq!(
            lines[10],
            "light to move, castling KQkq, en passant -, half-move clock 0, move 1"
        );
    }

    #[test]
    fn metadata_reflects_playable_rights_only() {
        let position =
            Position::from_fen("4k3/8/8/3pP3/8/8/8/R3K1R1 w KQ d6 3 20").expect("FEN should parse");
        let text = render_position(&position);
        assert!(text.ends_with("light to move, castling Q, en passant d6, half-move clock 3, move 20"));

        let blocked = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert!(render_position(&blocked).contains("castling -, en passant -"));
    }
}
