//! Precomputed per-square movement and attack tables.
//!
//! Every table is built at compile time. Sliding pieces walk [`Ray`]s outward
//! from their square; knights, kings and pawns use fixed [`StepSet`]s. The
//! attack tables are rays seen from the *attacked* square, each step tagged
//! with the piece kinds that would attack from there.

use crate::game_state::chess_types::*;

/// Squares reached by stepping one direction until the board edge.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    len: u8,
    squares: [Square; 7],
}

impl Ray {
    #[inline]
    pub fn squares(&self) -> &[Square] {
        &self.squares[..self.len as usize]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RaySet {
    count: u8,
    rays: [Ray; 8],
}

impl RaySet {
    #[inline]
    pub fn rays(&self) -> &[Ray] {
        &self.rays[..self.count as usize]
    }
}

/// Single-step destinations (knight, king, pawn captures and advances).
#[derive(Debug, Clone, Copy)]
pub struct StepSet {
    count: u8,
    squares: [Square; 8],
}

impl StepSet {
    #[inline]
    pub fn squares(&self) -> &[Square] {
        &self.squares[..self.count as usize]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PawnSteps {
    pub captures: StepSet,
    /// One square ahead, then two squares ahead from the starting rank.
    pub advances: StepSet,
}

/// One attack ray; `masks[i]` holds the [`PieceKind::mask`] bits of attackers
/// that hit the origin square from `squares[i]`.
#[derive(Debug, Clone, Copy)]
pub struct AttackRay {
    len: u8,
    squares: [Square; 7],
    masks: [u8; 7],
}

impl AttackRay {
    #[inline]
    pub fn steps(&self) -> impl Iterator<Item = (Square, u8)> + '_ {
        let len = self.len as usize;
        self.squares[..len].iter().copied().zip(self.masks[..len].iter().copied())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AttackRaySet {
    count: u8,
    rays: [AttackRay; 8],
}

impl AttackRaySet {
    #[inline]
    pub fn rays(&self) -> &[AttackRay] {
        &self.rays[..self.count as usize]
    }
}

// (file step, rank step); rank steps are positive toward the eighth rank.
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [(0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];

pub const ROOK_RAYS: [RaySet; 64] = build_ray_sets(&ROOK_DIRECTIONS);
pub const BISHOP_RAYS: [RaySet; 64] = build_ray_sets(&BISHOP_DIRECTIONS);
pub const QUEEN_RAYS: [RaySet; 64] = build_ray_sets(&QUEEN_DIRECTIONS);
pub const KNIGHT_STEPS: [StepSet; 64] = build_step_sets(&KNIGHT_OFFSETS);
pub const KING_STEPS: [StepSet; 64] = build_step_sets(&QUEEN_DIRECTIONS);
pub const LIGHT_PAWN_STEPS: [PawnSteps; 64] = build_pawn_steps(1);
pub const DARK_PAWN_STEPS: [PawnSteps; 64] = build_pawn_steps(-1);
pub const ATTACKS_BY_LIGHT: [AttackRaySet; 64] = build_attack_rays(Color::Light);
pub const ATTACKS_BY_DARK: [AttackRaySet; 64] = build_attack_rays(Color::Dark);

/// Castling rights lost when any move lands on the square.
pub const CASTLING_CLEARED_BY_DESTINATION: [CastlingRights; 64] = build_castling_masks();

#[inline]
pub fn attack_rays(square: Square, attacker: Color) -> &'static AttackRaySet {
    match attacker {
        Color::Light => &ATTACKS_BY_LIGHT[square as usize],
        Color::Dark => &ATTACKS_BY_DARK[square as usize],
    }
}

#[inline]
pub fn pawn_steps(square: Square, color: Color) -> &'static PawnSteps {
    match color {
        Color::Light => &LIGHT_PAWN_STEPS[square as usize],
        Color::Dark => &DARK_PAWN_STEPS[square as usize],
    }
}

const EMPTY_RAY: Ray = Ray { len: 0, squares: [0; 7] };
const EMPTY_RAY_SET: RaySet = RaySet {
    count: 0,
    rays: [EMPTY_RAY; 8],
};
const EMPTY_STEP_SET: StepSet = StepSet { count: 0, squares: [0; 8] };
const EMPTY_PAWN_STEPS: PawnSteps = PawnSteps {
    captures: EMPTY_STEP_SET,
    advances: EMPTY_STEP_SET,
};
const EMPTY_ATTACK_RAY: AttackRay = AttackRay {
    len: 0,
    squares: [0; 7],
    masks: [0; 7],
};
const EMPTY_ATTACK_RAY_SET: AttackRaySet = AttackRaySet {
    count: 0,
    rays: [EMPTY_ATTACK_RAY; 8],
};

const fn offset_square(square: usize, file_step: i8, rank_step: i8) -> Option<Square> {
    let file = square_file(square as Square) as i8 + file_step;
    let rank = square_rank(square as Square) as i8 + rank_step;
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return None;
    }
    Some(square_from_file_rank(file as u8, rank as u8))
}

const fn trace_ray(square: usize, file_step: i8, rank_step: i8) -> Ray {
    let mut ray = EMPTY_RAY;
    let mut distance = 1i8;
    while distance < 8 {
        match offset_square(square, file_step * distance, rank_step * distance) {
            Some(target) => {
                ray.squares[ray.len as usize] = target;
                ray.len += 1;
            }
            None => break,
        }
        distance += 1;
    }
    ray
}

const fn build_ray_sets(directions: &[(i8, i8)]) -> [RaySet; 64] {
    let mut table = [EMPTY_RAY_SET; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let mut dir = 0usize;
        while dir < directions.len() {
            let ray = trace_ray(sq, directions[dir].0, directions[dir].1);
            if ray.len > 0 {
                let slot = table[sq].count as usize;
                table[sq].rays[slot] = ray;
                table[sq].count += 1;
            }
            dir += 1;
        }
        sq += 1;
    }

    table
}

const fn with_step(mut set: StepSet, square: Option<Square>) -> StepSet {
    if let Some(target) = square {
        set.squares[set.count as usize] = target;
        set.count += 1;
    }
    set
}

const fn build_step_sets(offsets: &[(i8, i8)]) -> [StepSet; 64] {
    let mut table = [EMPTY_STEP_SET; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let mut i = 0usize;
        while i < offsets.len() {
            table[sq] = with_step(table[sq], offset_square(sq, offsets[i].0, offsets[i].1));
            i += 1;
        }
        sq += 1;
    }

    table
}

const fn build_pawn_steps(forward: i8) -> [PawnSteps; 64] {
    let mut table = [EMPTY_PAWN_STEPS; 64];
    let start_rank: u8 = if forward > 0 { 1 } else { 6 };
    let mut sq = 0usize;

    while sq < 64 {
        let mut captures = with_step(EMPTY_STEP_SET, offset_square(sq, -1, forward));
        captures = with_step(captures, offset_square(sq, 1, forward));
        let mut advances = with_step(EMPTY_STEP_SET, offset_square(sq, 0, forward));
        if square_rank(sq as Square) == start_rank {
            advances = with_step(advances, offset_square(sq, 0, 2 * forward));
        }
        table[sq] = PawnSteps { captures, advances };
        sq += 1;
    }

    table
}

const fn attacker_mask(file_step: i8, rank_step: i8, distance: i8, attacker: Color) -> u8 {
    let adjacent = distance == 1;
    let mut mask = PieceKind::Queen.mask();

    if file_step == 0 || rank_step == 0 {
        mask |= PieceKind::Rook.mask();
    } else {
        mask |= PieceKind::Bishop.mask();
        // Light pawns capture upward, so they strike from the rank below.
        let pawn_side = match attacker {
            Color::Light => -1,
            Color::Dark => 1,
        };
        if adjacent && rank_step == pawn_side {
            mask |= PieceKind::Pawn.mask();
        }
    }
    if adjacent {
        mask |= PieceKind::King.mask();
    }

    mask
}

const fn build_attack_rays(attacker: Color) -> [AttackRaySet; 64] {
    let mut table = [EMPTY_ATTACK_RAY_SET; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let mut dir = 0usize;
        while dir < QUEEN_DIRECTIONS.len() {
            let (file_step, rank_step) = QUEEN_DIRECTIONS[dir];
            let mut ray = EMPTY_ATTACK_RAY;
            let mut distance = 1i8;
            while distance < 8 {
                match offset_square(sq, file_step * distance, rank_step * distance) {
                    Some(target) => {
                        let slot = ray.len as usize;
                        ray.squares[slot] = target;
                        ray.masks[slot] = attacker_mask(file_step, rank_step, distance, attacker);
                        ray.len += 1;
                    }
                    None => break,
                }
                distance += 1;
            }
            if ray.len > 0 {
                let slot = table[sq].count as usize;
                table[sq].rays[slot] = ray;
                table[sq].count += 1;
            }
            dir += 1;
        }
        sq += 1;
    }

    table
}

const fn build_castling_masks() -> [CastlingRights; 64] {
    let mut table = [0 as CastlingRights; 64];
    table[A8 as usize] = CASTLE_DARK_QUEENSIDE;
    table[E8 as usize] = CASTLE_DARK_QUEENSIDE | CASTLE_DARK_KINGSIDE;
    table[H8 as usize] = CASTLE_DARK_KINGSIDE;
    table[A1 as usize] = CASTLE_LIGHT_QUEENSIDE;
    table[E1 as usize] = CASTLE_LIGHT_QUEENSIDE | CASTLE_LIGHT_KINGSIDE;
    table[H1 as usize] = CASTLE_LIGHT_KINGSIDE;
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_steps_from_d4_has_eight_targets() {
        assert_eq!(KNIGHT_STEPS[D4 as usize].squares().len(), 8);
        assert_eq!(KNIGHT_STEPS[A1 as usize].squares().len(), 2);
        assert!(KNIGHT_STEPS[G1 as usize].squares().contains(&F3));
    }

    #[test]
    fn queen_rays_from_corner_cover_three_directions() {
        let rays = QUEEN_RAYS[A1 as usize].rays();
        assert_eq!(rays.len(), 3);
        let total: usize = rays.iter().map(|r| r.squares().len()).sum();
        assert_eq!(total, 21);
        assert_eq!(ROOK_RAYS[D4 as usize].rays().iter().map(|r| r.squares().len()).sum::<usize>(), 14);
        assert_eq!(BISHOP_RAYS[D4 as usize].rays().iter().map(|r| r.squares().len()).sum::<usize>(), 13);
    }

    #[test]
    fn rays_start_adjacent_and_walk_outward() {
        let up = ROOK_RAYS[E2 as usize].rays()[0].squares();
        assert_eq!(up, &[E3, E4, E5, E6, E7, E8]);
    }

    #[test]
    fn pawn_steps_include_double_advance_only_from_start_rank() {
        assert_eq!(LIGHT_PAWN_STEPS[E2 as usize].advances.squares(), &[E3, E4]);
        assert_eq!(LIGHT_PAWN_STEPS[E3 as usize].advances.squares(), &[E4]);
        assert_eq!(DARK_PAWN_STEPS[D7 as usize].advances.squares(), &[D6, D5]);
        assert_eq!(LIGHT_PAWN_STEPS[A2 as usize].captures.squares(), &[B3]);
        assert_eq!(DARK_PAWN_STEPS[E5 as usize].captures.squares(), &[D4, F4]);
    }

    #[test]
    fn attack_masks_tag_pawns_by_color() {
        let pawn = PieceKind::Pawn.mask();
        // A light pawn on d3 attacks e4; d3 sits down-left of e4.
        let light = attack_rays(E4, Color::Light);
        let hit = light
            .rays()
            .iter()
            .flat_map(|ray| ray.steps())
            .find(|(sq, _)| *sq == D3)
            .expect("d3 should be on an attack ray of e4");
        assert_ne!(hit.1 & pawn, 0);

        let dark = attack_rays(E4, Color::Dark);
        let miss = dark
            .rays()
            .iter()
            .flat_map(|ray| ray.steps())
            .find(|(sq, _)| *sq == D3)
            .expect("d3 should be on an attack ray of e4");
        assert_eq!(miss.1 & pawn, 0);
    }

    #[test]
    fn castling_masks_cover_home_squares() {
        assert_eq!(CASTLING_CLEARED_BY_DESTINATION[E1 as usize], CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE);
        assert_eq!(CASTLING_CLEARED_BY_DESTINATION[H8 as usize], CASTLE_DARK_KINGSIDE);
        assert_eq!(CASTLING_CLEARED_BY_DESTINATION[E4 as usize], 0);
    }
}
