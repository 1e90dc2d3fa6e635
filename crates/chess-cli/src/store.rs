//! SQLite storage for named games.
//!
//! Games are kept per scope (a table, channel or any other grouping the user
//! picks) under a name that is unique within that scope. The stored value is
//! the opaque blob produced by [`Session::encode`].

use std::path::Path;

use chess_session::{Session, SessionError};
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

/// Name given to a game started without one.
pub const DEFAULT_GAME_NAME: &str = "game";

/// Errors that can occur while accessing stored games.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("game '{0}' does not exist, check the game list")]
    NotFound(String),
    /// The blob exists but does not decode. It is left in place.
    #[error("stored game '{name}' is unreadable: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: SessionError,
    },
}

/// A game as listed by [`Store::list`].
#[derive(Debug)]
pub struct StoredGame {
    pub scope: String,
    pub name: String,
    pub session: Result<Session, SessionError>,
}

/// SQLite-backed mapping from `(scope, name)` to encoded sessions.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens or creates the database at `path`, creating parent
    /// directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Store {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS games (
                scope TEXT NOT NULL,
                name TEXT NOT NULL,
                blob BLOB NOT NULL,
                PRIMARY KEY (scope, name)
            );
            ",
        )
    }

    /// Returns true if `scope` holds a game called `name`.
    pub fn contains(&self, scope: &str, name: &str) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM games WHERE scope = ?1 AND name = ?2",
            [scope, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Picks a free name in `scope`: `base` itself, else `base1`, `base2`
    /// and so on.
    pub fn unique_name(&self, scope: &str, base: &str) -> Result<String, StoreError> {
        let mut name = base.to_string();
        let mut count = 0;
        while self.contains(scope, &name)? {
            count += 1;
            name = format!("{}{}", base, count);
        }
        Ok(name)
    }

    /// Stores a new game under a free name derived from `base` and returns
    /// that name.
    pub fn insert(&self, scope: &str, base: &str, session: &Session) -> Result<String, StoreError> {
        let name = self.unique_name(scope, base)?;
        self.conn.execute(
            "INSERT INTO games (scope, name, blob) VALUES (?1, ?2, ?3)",
            (scope, &name, session.encode()),
        )?;
        tracing::debug!("Stored new game {}/{}", scope, name);
        Ok(name)
    }

    /// Overwrites an existing game.
    pub fn save(&self, scope: &str, name: &str, session: &Session) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE games SET blob = ?3 WHERE scope = ?1 AND name = ?2",
            (scope, name, session.encode()),
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Loads and decodes a game.
    pub fn load(&self, scope: &str, name: &str) -> Result<Session, StoreError> {
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT blob FROM games WHERE scope = ?1 AND name = ?2",
                [scope, name],
                |row| row.get(0),
            )
            .optional()?;
        let blob = blob.ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Session::decode(&blob).map_err(|source| StoreError::Corrupt {
            name: name.to_string(),
            source,
        })
    }

    /// Deletes a game. Returns false if it did not exist.
    pub fn remove(&self, scope: &str, name: &str) -> Result<bool, StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM games WHERE scope = ?1 AND name = ?2",
            [scope, name],
        )?;
        Ok(removed > 0)
    }

    /// Lists the games of `scope`, or of every scope when `None`, ordered
    /// by scope and name.
    pub fn list(&self, scope: Option<&str>) -> Result<Vec<StoredGame>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT scope, name, blob FROM games
             WHERE ?1 IS NULL OR scope = ?1
             ORDER BY scope, name",
        )?;
        let rows = stmt.query_map([scope], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?;

        let mut games = Vec::new();
        for row in rows {
            let (scope, name, blob) = row?;
            games.push(StoredGame {
                scope,
                name,
                session: Session::decode(&blob),
            });
        }
        Ok(games)
    }

    /// Writes a raw blob, bypassing encoding.
    #[cfg(test)]
    fn put_raw(&self, scope: &str, name: &str, blob: &[u8]) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO games (scope, name, blob) VALUES (?1, ?2, ?3)",
            (scope, name, blob),
        )?;
        Ok(())
    }
}
