//! Move representation.

use crate::{Piece, Square};
use std::fmt;

/// Tags for moves that touch more than the origin and destination squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Kingside castling (O-O).
    CastleKingside = 1,
    /// Queenside castling (O-O-O).
    CastleQueenside = 2,
    /// En passant capture.
    EnPassant = 3,
}

impl MoveFlag {
    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A fully resolved chess move.
///
/// Besides the two squares a move records the piece that moved, the piece
/// it captured, the promotion choice and any special-move tag, so a move
/// read back from history needs no position to be understood.
///
/// Castling is stored as the king's journey. In Chess960 the king may not
/// move at all (`from == to`); the flag is what identifies the move.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotion: Option<Piece>,
    flag: Option<MoveFlag>,
}

impl Move {
    /// Creates a quiet move of `piece` from `from` to `to`.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            flag: None,
        }
    }

    /// Returns this move with a captured piece recorded.
    #[inline]
    pub const fn with_capture(mut self, captured: Piece) -> Self {
        self.captured = Some(captured);
        self
    }

    /// Returns this move with a promotion piece recorded.
    #[inline]
    pub const fn with_promotion(mut self, promotion: Piece) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Returns this move with a special-move tag.
    #[inline]
    pub const fn with_flag(mut self, flag: MoveFlag) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the kind of piece that moved.
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    /// Returns the captured piece, if any.
    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    /// Returns the promotion piece, if any.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    /// Returns the special-move tag, if any.
    #[inline]
    pub const fn flag(self) -> Option<MoveFlag> {
        self.flag
    }

    /// Returns true if the move captures a piece (en passant included).
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(
            self.flag,
            Some(MoveFlag::CastleKingside) | Some(MoveFlag::CastleQueenside)
        )
    }

    /// Returns true if this is an en passant capture.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, Some(MoveFlag::EnPassant))
    }

    /// Returns true if this move resets the half-move clock.
    #[inline]
    pub const fn is_zeroing(self) -> bool {
        self.captured.is_some() || matches!(self.piece, Piece::Pawn)
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion {
            Some(Piece::Knight) => "n",
            Some(Piece::Bishop) => "b",
            Some(Piece::Rook) => "r",
            Some(Piece::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from, self.to, promo)
    }

    /// A placeholder move (never legal), used to fill fixed-size lists.
    pub const NULL: Move = Move::new(Square::A1, Square::A1, Piece::Pawn);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?}", self.to_uci(), self.piece)?;
        if let Some(captured) = self.captured {
            write!(f, " x{:?}", captured)?;
        }
        if let Some(flag) = self.flag {
            write!(f, " {:?}", flag)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
