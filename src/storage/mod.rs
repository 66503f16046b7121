#![allow(dead_code)]
//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - A string key-value surface (`get`/`set`/`remove`) over JSON blobs;
//!   nothing above this layer sees SQL
//! - Room-configuration persistence under the `currentRoom` key
//!
//! Every failure here is recoverable: callers log and fall back to default
//! state rather than surfacing storage problems to the player.

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: Initial schema with meta and kv tables
const SCHEMA_VERSION: u32 = 1;

/// Key the in-progress room configuration persists under
pub const ROOM_CONFIG_KEY: &str = "currentRoom";

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
    /// Failed to encode a value as JSON
    Encode(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
            StorageError::Encode(e) => write!(f, "failed to encode value: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Encode(e)
    }
}

/// Room setup that survives app restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomConfig {
    pub players: Vec<String>,
    pub impostors: usize,
    pub categories: Vec<String>,
    pub show_hint: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            players: Vec::new(),
            impostors: 1,
            categories: Vec::new(),
            show_hint: false,
        }
    }
}

/// The main storage handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/impostor/` or `~/.local/share/impostor/`
    /// - macOS: `~/Library/Application Support/impostor/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;

        // Ensure directory exists
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join("impostor.db");
        let conn = Connection::open(&db_path)?;

        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "impostor")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Read the blob stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store a blob under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete the blob under `key`. Deleting an absent key is fine.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Persist the room configuration under the `currentRoom` key.
    pub fn save_room_config(&self, config: &RoomConfig) -> Result<(), StorageError> {
        let json = serde_json::to_string(config)?;
        self.set(ROOM_CONFIG_KEY, &json)
    }

    /// Load the saved room configuration, treating a missing or corrupt
    /// blob as no saved room.
    pub fn load_room_config(&self) -> Option<RoomConfig> {
        let json = match self.get(ROOM_CONFIG_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("failed to read {}: {}", ROOM_CONFIG_KEY, e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("corrupt {} blob, ignoring: {}", ROOM_CONFIG_KEY, e);
                None
            }
        }
    }

    /// Forget the saved room configuration.
    pub fn clear_room_config(&self) -> Result<(), StorageError> {
        self.remove(ROOM_CONFIG_KEY)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            // Fresh database, create schema
            self.create_schema()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of the app
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        // Check if meta table exists
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: stores schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Key-value table: JSON blobs under string keys
            CREATE TABLE kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, created_at],
        )?;

        Ok(())
    }
}
