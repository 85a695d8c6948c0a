use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::entity::EntryType;
use crate::error::{HorizonsError, Result};

const CACHE_DB: &str = "cache.db";

/// Device-local key/blob cache. Always available, no authentication.
///
/// Collections are stored as one JSON array per entry type, scalars as a
/// raw string. Reads and writes never raise: a missing or unreadable row
/// reads as empty, a failed write is logged and reported only through the
/// returned bool.
pub struct LocalCache {
    conn: Connection,
}

impl LocalCache {
    /// Open or create the cache database in the given data directory.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let conn = Connection::open(data_dir.join(CACHE_DB))?;
        let cache = Self { conn };
        cache.init_schema()?;
        Ok(cache)
    }

    /// In-memory cache for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read a collection. Absent or unreadable data reads as empty.
    pub fn get<T: DeserializeOwned>(&self, entry_type: EntryType) -> Vec<T> {
        let Some(raw) = self.get_raw(entry_type.as_str()) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(key = entry_type.as_str(), error = %e, "discarding unreadable cached collection");
                Vec::new()
            }
        }
    }

    /// Write a collection. Failures are logged and swallowed; the bool
    /// feeds the engine's sync outcome and nothing else.
    pub fn put<T: Serialize>(&self, entry_type: EntryType, items: &[T]) -> bool {
        let raw = match serde_json::to_string(items) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = entry_type.as_str(), error = %e, "failed to serialize collection");
                return false;
            }
        };
        self.put_raw(entry_type.as_str(), &raw)
    }

    /// Read a scalar blob, defaulting to the empty string.
    pub fn get_scalar(&self, entry_type: EntryType) -> String {
        self.get_raw(entry_type.as_str()).unwrap_or_default()
    }

    /// Write a scalar blob. Same contract as [`LocalCache::put`].
    pub fn put_scalar(&self, entry_type: EntryType, value: &str) -> bool {
        self.put_raw(entry_type.as_str(), value)
    }

    /// Raw read by key string. Used for deprecated-alias migration, where
    /// the stored value must be copied without reserializing.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        let result = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional();
        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    /// Raw write by key string, same swallow contract as [`LocalCache::put`].
    pub fn put_raw(&self, key: &str, value: &str) -> bool {
        let result = self.conn.execute(
            "INSERT OR REPLACE INTO entries (key, value) VALUES (?1, ?2)",
            params![key, value],
        );
        match result {
            Ok(_) => true,
            Err(e) => {
                warn!(key, error = %e, "cache write failed");
                false
            }
        }
    }
}

impl From<rusqlite::Error> for HorizonsError {
    fn from(e: rusqlite::Error) -> Self {
        HorizonsError::Storage(format!("SQLite error: {}", e))
    }
}
