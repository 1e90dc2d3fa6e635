//! Values reported by a session: players, turns, game states and move
//! summaries.

use std::fmt;
use std::str::FromStr;

use chess_core::Color;
use chess_engine::AutomaticDraw;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of a participant.
///
/// The session only compares identifiers; what they name is up to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        PlayerId(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A draw a player may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawClaim {
    /// Fifty moves by each side without a capture or pawn move.
    FiftyMoves,
    /// The current position occurred for the third time.
    ThreefoldRepetition,
}

impl DrawClaim {
    pub const ALL: [DrawClaim; 2] = [DrawClaim::FiftyMoves, DrawClaim::ThreefoldRepetition];
}

impl fmt::Display for DrawClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawClaim::FiftyMoves => write!(f, "Fifty moves"),
            DrawClaim::ThreefoldRepetition => write!(f, "Threefold repetition"),
        }
    }
}

/// Error returned when a draw reason is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown draw reason '{0}', expected 'Fifty moves' or 'Threefold repetition'")]
pub struct ParseDrawClaimError(pub String);

impl FromStr for DrawClaim {
    type Err = ParseDrawClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "fifty moves" | "fifty" | "50 moves" | "50" => Ok(DrawClaim::FiftyMoves),
            "threefold repetition" | "threefold" | "repetition" => {
                Ok(DrawClaim::ThreefoldRepetition)
            }
            _ => Err(ParseDrawClaimError(s.to_string())),
        }
    }
}

/// Lifecycle of a game. Every state but `InProgress` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    DrawByInsufficientMaterial,
    /// Fivefold repetition or the seventy-five-move rule, when the rules
    /// enable automatic draws.
    DrawAutomatic(AutomaticDraw),
    DrawClaimed(DrawClaim),
    DrawAgreed,
    Resigned { winner: Color },
}

impl GameState {
    /// Returns true for every terminal state.
    pub fn is_over(self) -> bool {
        self != GameState::InProgress
    }

    /// Returns the winning color of a decisive result.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameState::Checkmate { winner } | GameState::Resigned { winner } => Some(winner),
            _ => None,
        }
    }

    /// Returns true for drawn results.
    pub fn is_draw(self) -> bool {
        self.is_over() && self.winner().is_none()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::InProgress => write!(f, "in progress"),
            GameState::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameState::Stalemate => write!(f, "draw by stalemate"),
            GameState::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameState::DrawAutomatic(reason) => write!(f, "draw by {}", reason),
            GameState::DrawClaimed(claim) => {
                write!(f, "draw claimed: {}", claim.to_string().to_lowercase())
            }
            GameState::DrawAgreed => write!(f, "draw by agreement"),
            GameState::Resigned { winner } => {
                write!(f, "{} resigned, {} wins", winner.opposite(), winner)
            }
        }
    }
}

/// Whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub color: Color,
    /// The player who moves now.
    pub player: PlayerId,
    /// The player who moves after them.
    pub next_player: PlayerId,
}

/// Check state after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Check,
    Checkmate,
}

/// Human-readable record of an applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub player: PlayerId,
    pub color: Color,
    /// Plies played including this one.
    pub move_number: usize,
    pub san: String,
    pub annotation: Option<Annotation>,
}

impl fmt::Display for MoveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move {}: {} ({}) played {}",
            self.move_number, self.player, self.color, self.san
        )?;
        match self.annotation {
            Some(Annotation::Check) => write!(f, ", check"),
            Some(Annotation::Checkmate) => write!(f, ", checkmate"),
            None => Ok(()),
        }
    }
}

/// Result of a successful [`Session::move_piece`](crate::Session::move_piece).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// True if the move ended the game.
    pub game_over: bool,
    pub summary: MoveSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_claim_parses_original_texts() {
        assert_eq!("Fifty moves".parse(), Ok(DrawClaim::FiftyMoves));
        assert_eq!("fifty-moves".parse(), Ok(DrawClaim::FiftyMoves));
        assert_eq!("FIFTY".parse(), Ok(DrawClaim::FiftyMoves));
        assert_eq!(
            "Threefold repetition".parse(),
            Ok(DrawClaim::ThreefoldRepetition)
        );
        assert_eq!(" threefold ".parse(), Ok(DrawClaim::ThreefoldRepetition));
        assert!("stalemate".parse::<DrawClaim>().is_err());

        for claim in DrawClaim::ALL {
            assert_eq!(claim.to_string().parse(), Ok(claim));
        }
    }

    #[test]
    fn winners_and_draws() {
        let mate = GameState::Checkmate {
            winner: Color::Black,
        };
        assert_eq!(mate.winner(), Some(Color::Black));
        assert!(!mate.is_draw());
        assert!(GameState::DrawAgreed.is_draw());
        assert!(!GameState::InProgress.is_over());
        assert!(!GameState::InProgress.is_draw());
        assert_eq!(
            GameState::Resigned {
                winner: Color::White
            }
            .to_string(),
            "Black resigned, White wins"
        );
    }

    #[test]
    fn summary_line() {
        let summary = MoveSummary {
            player: PlayerId::new("alice"),
            color: Color::Black,
            move_number: 4,
            san: "Qh4#".to_string(),
            annotation: Some(Annotation::Checkmate),
        };
        assert_eq!(
            summary.to_string(),
            "Move 4: alice (Black) played Qh4#, checkmate"
        );
    }
}
