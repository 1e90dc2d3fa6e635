//! Claimable and automatic draw conditions that depend on history.
//!
//! Two positions repeat when they agree on placement, side to move,
//! castling rights and the en passant square. The en passant square only
//! counts while an en passant capture is actually legal, so a double push
//! nobody can answer does not make an otherwise equal position distinct.

use chess_core::{Color, Square};

use crate::movegen::generate_moves;
use crate::position::CastlingRights;
use crate::rules::FIFTY_MOVE_PLIES;
use crate::{zobrist, Bitboard, Position};

/// Identity of a position for repetition purposes.
///
/// The Zobrist hash comes first so that comparisons usually stop there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    hash: u64,
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl RepetitionKey {
    pub fn of(position: &Position) -> Self {
        let en_passant = position
            .en_passant
            .filter(|_| generate_moves(position).iter().any(|m| m.is_en_passant()));
        RepetitionKey {
            hash: zobrist::hash(position, en_passant),
            pieces: position.pieces,
            colors: position.colors,
            side_to_move: position.side_to_move,
            castling: position.castling,
            en_passant,
        }
    }
}

/// Returns true if the fifty-move rule can be claimed.
pub fn can_claim_fifty_moves(position: &Position) -> bool {
    position.halfmove_clock >= FIFTY_MOVE_PLIES
}

/// Counts how often `current` has occurred, itself included.
///
/// `snapshots` are the earlier positions of the game, oldest first. Only
/// the last `halfmove_clock` of them are examined: a capture or pawn move
/// cannot be undone, so nothing before it can repeat.
pub fn repetition_count<'a, I>(snapshots: I, current: &Position) -> usize
where
    I: IntoIterator<Item = &'a Position>,
    I::IntoIter: DoubleEndedIterator,
{
    let key = RepetitionKey::of(current);
    1 + snapshots
        .into_iter()
        .rev()
        .take(current.halfmove_clock as usize)
        .filter(|p| p.side_to_move == current.side_to_move)
        .filter(|p| RepetitionKey::of(p) == key)
        .count()
}

/// Returns true if `current` occurred at least twice before.
pub fn can_claim_threefold_repetition<'a, I>(snapshots: I, current: &Position) -> bool
where
    I: IntoIterator<Item = &'a Position>,
    I::IntoIter: DoubleEndedIterator,
{
    repetition_count(snapshots, current) >= 3
}

/// Returns true if `current` occurred at least four times before.
pub fn is_fivefold_repetition<'a, I>(snapshots: I, current: &Position) -> bool
where
    I: IntoIterator<Item = &'a Position>,
    I::IntoIter: DoubleEndedIterator,
{
    repetition_count(snapshots, current) >= 5
}

/// Which draws the side to move could claim right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawFlags {
    pub fifty_moves: bool,
    pub threefold_repetition: bool,
}

impl DrawFlags {
    /// Evaluates both claims for `current` given the earlier positions.
    pub fn evaluate<'a, I>(snapshots: I, current: &Position) -> Self
    where
        I: IntoIterator<Item = &'a Position>,
        I::IntoIter: DoubleEndedIterator,
    {
        DrawFlags {
            fifty_moves: can_claim_fifty_moves(current),
            threefold_repetition: can_claim_threefold_repetition(snapshots, current),
        }
    }

    /// Returns true if any draw can be claimed.
    pub fn any(self) -> bool {
        self.fifty_moves || self.threefold_repetition
    }
}
