//! Configuration file loading for the command-line front end.

use std::path::{Path, PathBuf};

use chess_session::RenderOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings read from `chess.toml`.
///
/// ```toml
/// database = "data/games.db"
/// default_variant = "chess960"
///
/// [render]
/// square_size = 48
/// coordinates = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChessConfig {
    /// SQLite file holding the stored games.
    pub database: PathBuf,
    /// Variant tag used when `start` is given none.
    pub default_variant: Option<String>,
    /// Board image settings for `show`.
    pub render: RenderOptions,
}

impl Default for ChessConfig {
    fn default() -> Self {
        ChessConfig {
            database: PathBuf::from("data/chess.db"),
            default_variant: None,
            render: RenderOptions::default(),
        }
    }
}

impl ChessConfig {
    /// Loads the configuration from [`Self::config_path`], or the defaults
    /// if that file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns `chess.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: ChessConfig = toml::from_str(
            r#"
database = "/var/lib/chess/games.db"
default_variant = "chess960"

[render]
square_size = 48
coordinates = true
"#,
        )
        .unwrap();

        assert_eq!(config.database, PathBuf::from("/var/lib/chess/games.db"));
        assert_eq!(config.default_variant.as_deref(), Some("chess960"));
        assert_eq!(config.render.square_size, 48);
        assert!(config.render.coordinates);
        assert_eq!(
            config.render.light_square,
            RenderOptions::default().light_square
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ChessConfig = toml::from_str("").unwrap();
        assert_eq!(config, ChessConfig::default());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChessConfig::load_from(&dir.path().join("chess.toml")).unwrap();
        assert_eq!(config, ChessConfig::default());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chess.toml");
        std::fs::write(&path, "database = [").unwrap();
        assert!(matches!(
            ChessConfig::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
