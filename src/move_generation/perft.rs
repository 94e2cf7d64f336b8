//! Perft: leaf counts with capture, castle and check breakdowns, used to
//! verify move generation against published tables.

use tracing::trace;

use crate::game_state::chess_types::Position;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }

    fn count_leaf(&mut self, generated: &GeneratedMove) {
        let mv = generated.mv;
        self.nodes += 1;

        if mv.is_capture() {
            self.captures += 1;
        }
        if mv.special.is_en_passant() {
            self.en_passant += 1;
        }
        if mv.special.is_castle() {
            self.castles += 1;
        }
        if mv.special.is_promotion() {
            self.promotions += 1;
        }

        // Mates are counted as checks too.
        if generated.annotations.gives_check || generated.annotations.is_checkmate {
            self.checks += 1;
        }
        if generated.annotations.is_checkmate {
            self.checkmates += 1;
        }
    }
}

/// Count the leaves `depth` plies below `position`, classifying the last
/// move into each leaf.
pub fn perft<G: MoveGenerator>(generator: &G, position: &Position, depth: u8) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut scratch = *position;
    let mut total = PerftCounts::default();

    for generated in generator.generate_legal_moves(position)? {
        let mut split = PerftCounts::default();
        perft_recurse(generator, &mut scratch, &generated, depth, 1, &mut split)?;
        trace!(mv = %generated.mv, nodes = split.nodes, "perft root split");
        total.merge(split);
    }

    Ok(total)
}

/// [`perft`] with the fully annotating [`LegalMoveGenerator`].
pub fn perft_legal(position: &Position, depth: u8) -> MoveGenResult<PerftCounts> {
    perft(&LegalMoveGenerator, position, depth)
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    position: &mut Position,
    generated: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    if current_depth == search_depth {
        counts.count_leaf(generated);
        return Ok(());
    }

    let saved = position.make_move(generated.mv);
    let result = generator
        .generate_legal_moves(position)
        .and_then(|children| {
            children.iter().try_for_each(|child| {
                perft_recurse(generator, position, child, search_depth, current_depth + 1, counts)
            })
        });
    position.unmake_move(generated.mv, saved);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::move_generation::legal_move_generator::FastLegalMoveGenerator;
    use crate::move_generation::move_generator::MoveAnnotations;
    use crate::moves::move_descriptions::{Move, SpecialMove};

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    /// Two root moves; only the first has replies.
    struct MockMoveGenerator;

    impl MoveGenerator for MockMoveGenerator {
        fn generate_legal_moves(&self, position: &Position) -> MoveGenResult<Vec<GeneratedMove>> {
            let quiet = MoveAnnotations::default();
            let check = MoveAnnotations {
                gives_check: true,
                ..quiet
            };
            let mate = MoveAnnotations {
                is_checkmate: true,
                ..quiet
            };
            Ok(match position.side_to_move {
                Color::Light => vec![
                    generated(Move::new(E5, E6, SpecialMove::None, None), quiet),
                    generated(Move::new(E1, F1, SpecialMove::KingMove, None), quiet),
                ],
                Color::Dark if position.piece_at(E6).is_some() => vec![
                    generated(Move::new(D6, E5, SpecialMove::None, None), check),
                    generated(Move::new(D6, D5, SpecialMove::None, None), mate),
                ],
                Color::Dark => Vec::new(),
            })
        }
    }

    fn generated(mv: Move, annotations: MoveAnnotations) -> GeneratedMove {
        GeneratedMove { mv, annotations }
    }

    fn counts(fen: &str, depth: u8) -> PerftCounts {
        let position = Position::from_fen(fen).expect("FEN should parse");
        perft_legal(&position, depth).expect("perft should run")
    }

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let counts = perft(&MockMoveGenerator, &Position::new(), 0).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn perft_depth_two_aggregates_leaf_metrics() {
        let position = Position::from_fen("4k3/8/3p4/4P3/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let counts = perft(&MockMoveGenerator, &position, 2).expect("perft should run");

        assert_eq!(
            counts,
            PerftCounts {
                nodes: 2,
                checks: 2,
                checkmates: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn starting_position_node_counts() {
        let start = STARTING_POSITION_FEN;
        assert_eq!(counts(start, 1).nodes, 20);
        assert_eq!(counts(start, 2).nodes, 400);

        let depth_three = counts(start, 3);
        assert_eq!(depth_three.nodes, 8902);
        assert_eq!(depth_three.captures, 34);
        assert_eq!(depth_three.checks, 12);
        assert_eq!(depth_three.checkmates, 0);
    }

    #[test]
    fn kiwipete_exercises_every_special_move() {
        let depth_one = counts(KIWIPETE, 1);
        assert_eq!(depth_one.nodes, 48);
        assert_eq!(depth_one.captures, 8);
        assert_eq!(depth_one.castles, 2);

        let depth_two = counts(KIWIPETE, 2);
        assert_eq!(depth_two.nodes, 2039);
        assert_eq!(depth_two.captures, 351);
        assert_eq!(depth_two.en_passant, 1);
        assert_eq!(depth_two.castles, 91);
        assert_eq!(depth_two.checks, 3);
    }

    #[test]
    fn endgame_position_with_en_passant_pins() {
        let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
        assert_eq!(counts(fen, 1).nodes, 14);
        assert_eq!(counts(fen, 2).nodes, 191);

        let depth_three = counts(fen, 3);
        assert_eq!(depth_three.nodes, 2812);
        assert_eq!(depth_three.captures, 209);
        assert_eq!(depth_three.en_passant, 2);
        assert_eq!(depth_three.checks, 267);
    }

    #[test]
    fn fast_generator_matches_node_counts() {
        let position = Position::from_fen(KIWIPETE).expect("FEN should parse");
        let fast = perft(&FastLegalMoveGenerator, &position, 2).expect("perft should run");
        assert_eq!(fast.nodes, 2039);
        assert_eq!(fast.checks, 0);
    }
}
