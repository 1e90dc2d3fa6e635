//! Variant tags and their rule configuration.

use std::fmt;

use rand::Rng;
use thiserror::Error;

use super::chess960::{chess960_position, CHESS960_SETUPS, STANDARD_SETUP};
use super::{RuleConfig, RuleSet};
use crate::Position;

/// Error returned for a variant tag the engine does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant '{0}'")]
pub struct VariantError(pub String);

/// A supported rule variant.
///
/// Tags: `standard` (also `chess` or no tag), `chess960` for a random
/// starting array and `chess960:<n>` for Scharnagl setup `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    Standard,
    Chess960 { setup: u16 },
}

impl Variant {
    /// Resolves a variant tag, drawing a random array for a bare `chess960`.
    pub fn from_tag(tag: Option<&str>) -> Result<Self, VariantError> {
        let Some(raw) = tag else {
            return Ok(Variant::Standard);
        };
        let normalized = raw.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "" | "standard" | "chess" => Ok(Variant::Standard),
            "chess960" | "960" | "fischerrandom" => Ok(Variant::Chess960 {
                setup: rand::thread_rng().gen_range(0..CHESS960_SETUPS),
            }),
            other => other
                .strip_prefix("chess960:")
                .and_then(|n| n.parse::<u16>().ok())
                .filter(|&setup| setup < CHESS960_SETUPS)
                .map(|setup| Variant::Chess960 { setup })
                .ok_or_else(|| VariantError(raw.to_string())),
        }
    }

    /// Returns the canonical tag, which [`Variant::from_tag`] maps back to
    /// this exact variant.
    pub fn tag(&self) -> String {
        self.to_string()
    }

    /// Returns true for the standard starting array, including Chess960
    /// setup 518.
    pub fn has_standard_array(&self) -> bool {
        match self {
            Variant::Standard => true,
            Variant::Chess960 { setup } => *setup == STANDARD_SETUP,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Standard => write!(f, "standard"),
            Variant::Chess960 { setup } => write!(f, "chess960:{}", setup),
        }
    }
}

impl RuleSet for Variant {
    fn initial_position(&self) -> Position {
        match self {
            Variant::Standard => Position::startpos(),
            Variant::Chess960 { setup } => {
                chess960_position(*setup).unwrap_or_else(Position::startpos)
            }
        }
    }

    fn config(&self) -> RuleConfig {
        RuleConfig::default()
    }
}
