//! Errors returned by session operations.

use chess_core::FenError;
use chess_engine::{SanError, VariantError};
use thiserror::Error;

use crate::{DrawClaim, PlayerId};

/// Error type for session operations.
///
/// A failed operation never changes the session it was called on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The move text could not be tokenized.
    #[error("'{0}' is not a valid move")]
    MalformedNotation(String),
    /// No legal move matches the move text.
    #[error("'{0}' is not a legal move")]
    IllegalMove(String),
    /// Several legal moves match the move text.
    #[error("'{0}' is ambiguous, add the origin file or rank")]
    AmbiguousMove(String),
    /// The acting player is not the side to move.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    /// The acting player is not part of the game.
    #[error("{0} is not playing this game")]
    NotAPlayer(PlayerId),
    /// The requested draw cannot be claimed in the current position.
    #[error("a draw by {0} cannot be claimed now")]
    DrawNotClaimable(DrawClaim),
    /// The game has already ended.
    #[error("the game is already over")]
    GameOver,
    /// The variant tag is not recognized.
    #[error(transparent)]
    UnknownVariant(#[from] VariantError),
    /// Both sides were given the same player.
    #[error("{0} cannot play against themselves")]
    SamePlayer(PlayerId),
    /// Rule switches were changed after moves were played.
    #[error("the rules cannot change once moves have been played")]
    RulesLocked,
    /// The starting FEN is invalid.
    #[error("invalid starting position: {0}")]
    InvalidFen(#[from] FenError),
    /// A stored session could not be restored.
    #[error("corrupt game record: {0}")]
    EncodingCorrupt(String),
}

impl SessionError {
    /// Returns true for errors that reject a move attempt, turn violations
    /// included.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            SessionError::IllegalMove(_) | SessionError::NotYourTurn(_) | SessionError::NotAPlayer(_)
        )
    }
}

impl From<SanError> for SessionError {
    fn from(e: SanError) -> Self {
        match e {
            SanError::Malformed(text) => SessionError::MalformedNotation(text),
            SanError::Illegal(text) => SessionError::IllegalMove(text),
            SanError::Ambiguous(text) => SessionError::AmbiguousMove(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn san_errors_map_to_notation_errors() {
        assert_eq!(
            SessionError::from(SanError::Malformed("zz".into())),
            SessionError::MalformedNotation("zz".into())
        );
        assert_eq!(
            SessionError::from(SanError::Illegal("e5".into())),
            SessionError::IllegalMove("e5".into())
        );
        assert_eq!(
            SessionError::from(SanError::Ambiguous("Nd2".into())),
            SessionError::AmbiguousMove("Nd2".into())
        );
    }

    #[test]
    fn fen_errors_are_kept_when_cloned() {
        let err = SessionError::from(FenError::InvalidActiveColor("x".into()));
        let copy = err.clone();
        assert_eq!(copy, err);
        assert_eq!(
            copy.to_string(),
            "invalid starting position: invalid active color: expected 'w' or 'b', got 'x'"
        );
    }

    #[test]
    fn turn_violations_are_illegal_moves() {
        assert!(SessionError::NotYourTurn(PlayerId::new("bob")).is_illegal_move());
        assert!(SessionError::NotAPlayer(PlayerId::new("eve")).is_illegal_move());
        assert!(SessionError::IllegalMove("e5".into()).is_illegal_move());
        assert!(!SessionError::GameOver.is_illegal_move());
        assert!(!SessionError::AmbiguousMove("Nd2".into()).is_illegal_move());
    }
}
