//! Opaque byte encoding of a session.
//!
//! The blob is a versioned JSON record holding the players, the variant, the
//! starting position, the SAN of every move and the state the game is in.
//! Decoding replays the moves, so a record that does not describe a legal
//! game is rejected instead of being loaded half-way.

use chess_core::Color;
use chess_engine::{AutomaticDraw, Position, RuleConfig, RuleSet, Variant};
use serde::{Deserialize, Serialize};

use crate::{DrawClaim, GameState, PlayerId, Session, SessionError};

/// Version written by [`Session::encode`].
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    version: u32,
    white: PlayerId,
    black: PlayerId,
    variant: String,
    automatic_draws: bool,
    start_fen: String,
    moves: Vec<String>,
    state: RecordedState,
    fen: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RecordedState {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FivefoldRepetition,
    SeventyFiveMoves,
    Resigned { winner: Color },
    DrawClaimed { claim: DrawClaim },
    DrawAgreed,
}

impl From<GameState> for RecordedState {
    fn from(state: GameState) -> Self {
        match state {
            GameState::InProgress => RecordedState::InProgress,
            GameState::Checkmate { winner } => RecordedState::Checkmate { winner },
            GameState::Stalemate => RecordedState::Stalemate,
            GameState::DrawByInsufficientMaterial => RecordedState::InsufficientMaterial,
            GameState::DrawAutomatic(AutomaticDraw::FivefoldRepetition) => {
                RecordedState::FivefoldRepetition
            }
            GameState::DrawAutomatic(AutomaticDraw::SeventyFiveMoves) => {
                RecordedState::SeventyFiveMoves
            }
            GameState::Resigned { winner } => RecordedState::Resigned { winner },
            GameState::DrawClaimed(claim) => RecordedState::DrawClaimed { claim },
            GameState::DrawAgreed => RecordedState::DrawAgreed,
        }
    }
}

impl Session {
    /// Encodes the session into an opaque blob for [`Session::decode`].
    pub fn encode(&self) -> Vec<u8> {
        let record = SessionRecord {
            version: FORMAT_VERSION,
            white: self.white().clone(),
            black: self.black().clone(),
            variant: self.variant_tag(),
            automatic_draws: self.rule_config().automatic_draws,
            start_fen: self.start_position().to_fen(),
            moves: self.san_moves().into_iter().map(String::from).collect(),
            state: self.state().into(),
            fen: self.fen(),
        };
        serde_json::to_vec(&record).expect("record has only string keys")
    }

    /// Restores a session from a blob produced by [`Session::encode`].
    ///
    /// Fails with [`SessionError::EncodingCorrupt`] if the blob is not a
    /// record of a game that can be replayed move by move to the recorded
    /// position and state.
    pub fn decode(bytes: &[u8]) -> Result<Session, SessionError> {
        replay(bytes).map_err(|reason| {
            tracing::warn!("Rejected game record: {}", reason);
            SessionError::EncodingCorrupt(reason)
        })
    }
}

fn replay(bytes: &[u8]) -> Result<Session, String> {
    let record: SessionRecord =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid record: {}", e))?;
    if record.version != FORMAT_VERSION {
        return Err(format!("unsupported version {}", record.version));
    }

    let variant = Variant::from_tag(Some(&record.variant)).map_err(|e| e.to_string())?;
    // Aliases like a bare `chess960` would draw a new random setup.
    if variant.tag() != record.variant {
        return Err(format!("non-canonical variant tag '{}'", record.variant));
    }

    let initial = variant.initial_position();
    let start = if initial.to_fen() == record.start_fen {
        initial
    } else {
        Position::from_fen(&record.start_fen)
            .map_err(|e| format!("bad starting position '{}': {}", record.start_fen, e))?
    };

    let mut session = Session::with_start(record.white, record.black, variant, start)
        .and_then(|session| {
            session.with_rules(RuleConfig {
                automatic_draws: record.automatic_draws,
            })
        })
        .map_err(|e| e.to_string())?;

    for (ply, san) in record.moves.iter().enumerate() {
        let player = session.turn().player;
        session
            .move_piece(&player, san)
            .map_err(|e| format!("move {} '{}' cannot be replayed: {}", ply + 1, san, e))?;
    }

    let ended = match record.state {
        RecordedState::Resigned { winner } => {
            let loser = session.player(winner.opposite()).clone();
            Some(session.resign(&loser))
        }
        RecordedState::DrawClaimed { claim } => Some(session.claim_draw(claim)),
        RecordedState::DrawAgreed => Some(session.agree_draw()),
        _ => None,
    };
    if let Some(ended) = ended {
        ended.map_err(|e| format!("recorded ending {:?} does not apply: {}", record.state, e))?;
    }

    let replayed = RecordedState::from(session.state());
    if replayed != record.state {
        return Err(format!(
            "replayed state {:?} differs from recorded {:?}",
            replayed, record.state
        ));
    }
    if session.fen() != record.fen {
        return Err(format!(
            "replayed position '{}' differs from recorded '{}'",
            session.fen(),
            record.fen
        ));
    }

    Ok(session)
}
