//! Two-player chess games.
//!
//! A [`Session`] owns one game: the players, the rules variant, the current
//! position and the full history. Moves are given as SAN text by the player
//! whose turn it is. After every move the session re-evaluates checkmate,
//! stalemate, insufficient material and automatic draws, and recomputes
//! which draws could be claimed.
//!
//! Sessions encode to an opaque blob ([`Session::encode`] /
//! [`Session::decode`]); where the blob is stored is the caller's business.

mod codec;
mod error;
mod session;
mod state;

pub use error::SessionError;
pub use session::{HistoryEntry, Session};
pub use state::{
    Annotation, DrawClaim, GameState, MoveOutcome, MoveSummary, ParseDrawClaimError, PlayerId,
    Turn,
};

pub use chess_engine::{AutomaticDraw, RuleConfig};
pub use chess_render::{RenderError, RenderOptions};
