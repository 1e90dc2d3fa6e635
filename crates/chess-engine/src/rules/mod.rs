//! Rule set abstraction for chess variants.
//!
//! Variants share move generation and differ in their starting array and
//! in which automatic game-ending rules they enforce. The [`RuleSet`] trait
//! is the seam callers use; [`Variant`] is the concrete implementation.

mod chess960;
mod variant;

pub use chess960::{chess960_back_rank, CHESS960_SETUPS, STANDARD_SETUP};
pub use variant::{Variant, VariantError};

use crate::movegen::{generate_moves, has_legal_moves, is_king_attacked};
use crate::{Bitboard, MoveList, Position};
use chess_core::{Color, Piece};

/// Half-move clock value at which a fifty-move draw can be claimed.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Half-move clock value at which the game is drawn automatically.
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Rule switches a variant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    /// Fivefold repetition and the seventy-five-move rule end the game
    /// without a claim.
    pub automatic_draws: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            automatic_draws: true,
        }
    }
}

/// Draws that end the game without either player claiming them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutomaticDraw {
    FivefoldRepetition,
    SeventyFiveMoves,
}

impl std::fmt::Display for AutomaticDraw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomaticDraw::FivefoldRepetition => write!(f, "fivefold repetition"),
            AutomaticDraw::SeventyFiveMoves => write!(f, "seventy-five-move rule"),
        }
    }
}

/// How a game ended, as far as a single position can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The side to move is checkmated.
    Checkmate { winner: Color },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// Neither side can deliver mate.
    InsufficientMaterial,
    /// An automatic draw rule applies.
    Automatic(AutomaticDraw),
}

/// Trait for implementing chess variants.
///
/// # Example
///
/// ```
/// use chess_engine::rules::{RuleSet, Variant};
///
/// let variant = Variant::Standard;
/// let position = variant.initial_position();
/// assert_eq!(variant.generate_moves(&position).len(), 20);
/// ```
pub trait RuleSet {
    /// Returns the initial position for this variant.
    fn initial_position(&self) -> Position;

    /// Returns the rule switches of this variant.
    fn config(&self) -> RuleConfig;

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> MoveList {
        generate_moves(position)
    }

    /// Returns how the game ended if `position` alone decides it.
    ///
    /// Checked in order: checkmate, stalemate, insufficient material, then
    /// the seventy-five-move rule when automatic draws are enabled.
    /// Repetition needs history and is left to the caller.
    fn termination(&self, position: &Position) -> Option<Termination> {
        if !has_legal_moves(position) {
            return Some(if is_check(position) {
                Termination::Checkmate {
                    winner: position.side_to_move.opposite(),
                }
            } else {
                Termination::Stalemate
            });
        }
        if has_insufficient_material(position) {
            return Some(Termination::InsufficientMaterial);
        }
        if self.config().automatic_draws && is_seventy_five_moves(position) {
            return Some(Termination::Automatic(AutomaticDraw::SeventyFiveMoves));
        }
        None
    }
}

/// Returns true if the side to move is in check.
pub fn is_check(position: &Position) -> bool {
    is_king_attacked(position, position.side_to_move)
}

/// Returns true if the side to move is checkmated.
pub fn is_checkmate(position: &Position) -> bool {
    is_check(position) && !has_legal_moves(position)
}

/// Returns true if the side to move is stalemated.
pub fn is_stalemate(position: &Position) -> bool {
    !is_check(position) && !has_legal_moves(position)
}

/// Returns true if the half-move clock reached the seventy-five-move limit.
pub fn is_seventy_five_moves(position: &Position) -> bool {
    position.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES
}

/// Returns true if no sequence of legal moves can produce a checkmate.
///
/// Covers bare kings, a single minor piece, and any number of bishops
/// (either color) that all stand on squares of one color.
pub fn has_insufficient_material(position: &Position) -> bool {
    let heavy = position.pieces[Piece::Pawn.index()]
        | position.pieces[Piece::Rook.index()]
        | position.pieces[Piece::Queen.index()];
    if heavy.is_not_empty() {
        return false;
    }

    let knights = position.pieces[Piece::Knight.index()];
    let bishops = position.pieces[Piece::Bishop.index()];
    let minors = knights | bishops;

    if minors.count() <= 1 {
        return true;
    }
    if knights.is_not_empty() {
        return false;
    }
    (bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty()
}
