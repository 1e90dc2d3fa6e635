//! Attack tables for every piece kind.
//!
//! Leapers (knight, king, pawn) use per-square lookup tables. Sliders use
//! per-direction ray tables: the nearest blocker on a ray is found with a
//! bit scan and everything behind it is masked off.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ray directions as (file, rank) steps. The first four walk toward higher
/// square indices, the last four toward lower ones.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),   // north
    (1, 0),   // east
    (1, 1),   // north-east
    (-1, 1),  // north-west
    (0, -1),  // south
    (-1, 0),  // west
    (1, -1),  // south-east
    (-1, -1), // south-west
];

const ROOK_DIRECTIONS: [usize; 4] = [0, 1, 4, 5];
const BISHOP_DIRECTIONS: [usize; 4] = [2, 3, 6, 7];

static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];
static RAYS: [[Bitboard; 64]; 8] = ray_tables();

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Returns bishop attacks from `sq` given the occupied squares.
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    BISHOP_DIRECTIONS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, dir, occupied))
}

/// Returns rook attacks from `sq` given the occupied squares.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ROOK_DIRECTIONS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, dir, occupied))
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Attacks along a single ray, stopping at (and including) the first blocker.
#[inline]
fn ray_attacks(sq: Square, dir: usize, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq.index() as usize];
    let blockers = ray & occupied;
    let nearest = if dir < 4 {
        blockers.first()
    } else {
        blockers.last()
    };
    match nearest {
        Some(blocker) => ray ^ RAYS[dir][blocker.index() as usize],
        None => ray,
    }
}

const fn square_at(index: usize) -> Square {
    match Square::from_index(index as u8) {
        Some(sq) => sq,
        None => panic!("square index out of range"),
    }
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0;
    while index < 64 {
        let sq = square_at(index);
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (df, dr) = deltas[i];
            if let Some(target) = sq.offset(df, dr) {
                bits |= target.bitboard();
            }
            i += 1;
        }
        table[index] = Bitboard(bits);
        index += 1;
    }
    table
}

const fn ray_tables() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = DIRECTIONS[dir];
        let mut index = 0;
        while index < 64 {
            let mut bits = 0u64;
            let mut current = square_at(index).offset(df, dr);
            while let Some(sq) = current {
                bits |= sq.bitboard();
                current = sq.offset(df, dr);
            }
            rays[dir][index] = Bitboard(bits);
            index += 1;
        }
        dir += 1;
    }
    rays
}
