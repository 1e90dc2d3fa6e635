//! Chess rules engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board representation with efficient operations
//! - [`Position`] - Full position state including castling rights and clocks
//! - Legal move generation and move application ([`movegen`])
//! - Variants, terminal predicates and automatic draws ([`rules`])
//! - Repetition and fifty-move claims ([`draw`])
//! - SAN notation parsing and generation ([`san`])
//!
//! The crate is stateless: every operation takes a position and returns a
//! value or a new position. Game history belongs to the caller.
//!
//! # Example
//!
//! ```
//! use chess_engine::{make_move, san_to_move, Position};
//!
//! let position = Position::startpos();
//! let e4 = san_to_move(&position, "e4").unwrap();
//! let position = make_move(&position, e4);
//! let e5 = san_to_move(&position, "e5").unwrap();
//! let position = make_move(&position, e5);
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
//! );
//! ```

mod bitboard;
pub mod draw;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;
mod zobrist;

pub use bitboard::Bitboard;
pub use draw::{DrawFlags, RepetitionKey};
pub use movegen::{
    bishop_attacks, generate_moves, has_legal_moves, is_king_attacked, is_legal,
    is_square_attacked, king_attacks, knight_attacks, make_move, pawn_attacks, queen_attacks,
    rook_attacks, MoveList,
};
pub use position::{CastleSide, CastlingRights, Position};
pub use rules::{
    has_insufficient_material, is_check, is_checkmate, is_seventy_five_moves, is_stalemate,
    AutomaticDraw, RuleConfig, RuleSet, Termination, Variant, VariantError,
};
pub use san::{move_to_san, san_to_move, SanError};
