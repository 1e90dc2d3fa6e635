//! Zobrist hashing for position identification.
//!
//! The hash XORs fixed pseudo-random keys for every piece on every square,
//! the side to move, each castling right and the en passant file. Equal
//! positions always hash equal; unequal positions collide only with
//! negligible probability, so repetition detection still compares the
//! underlying fields on a hash match.

use chess_core::{Color, Piece, Square};

use crate::position::Position;

/// Zobrist hash keys, generated from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    /// XORed in when black is to move.
    pub black_to_move: u64,
    /// One key per castling right bit.
    pub castling: [u64; 4],
    /// Keys for the en passant file.
    pub en_passant: [u64; 8],
}

const fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

impl ZobristKeys {
    pub const fn new() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = xorshift(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = xorshift(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = xorshift(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = xorshift(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub fn piece(&self, piece: Piece, color: Color, sq: Square) -> u64 {
        self.pieces[piece.index()][color.index()][sq.index() as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Hashes `position`, using `en_passant` in place of the stored square.
///
/// Repetition detection passes `None` when no en passant capture is legal.
pub(crate) fn hash(position: &Position, en_passant: Option<Square>) -> u64 {
    let mut h = 0u64;

    for color in Color::ALL {
        for piece in Piece::ALL {
            for sq in position.pieces_of(piece, color) {
                h ^= ZOBRIST.piece(piece, color, sq);
            }
        }
    }

    if position.side_to_move == Color::Black {
        h ^= ZOBRIST.black_to_move;
    }

    let rights = position.castling.raw();
    for (bit, key) in ZOBRIST.castling.iter().enumerate() {
        if rights & (1 << bit) != 0 {
            h ^= key;
        }
    }

    if let Some(ep) = en_passant {
        h ^= ZOBRIST.en_passant[ep.file().index() as usize];
    }

    h
}
