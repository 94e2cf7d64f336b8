//! Crate root module declarations for the chess rules core.
//!
//! This file exposes the position model, move generation, draw and legality
//! rules, the compact position codec, hashing, and notation helpers so
//! engines, tools, and tests can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod position;
    pub mod undo_state;
}

pub mod moves {
    pub mod lookup_tables;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod pseudo_legal;
}

pub mod rules {
    pub mod draw_detection;
    pub mod position_legality;
}

pub mod codecs {
    pub mod compressed_position;
}

pub mod hashing {
    pub mod position_hash;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod natural_algebraic;
    pub mod render_game_state;
}
