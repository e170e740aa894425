use log::debug;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use crate::db::migrations::run_migrations;
use crate::db::repository::StateRepo;
use crate::models::{StoredUserData, UserData};

/// Key the whole user record is stored under.
pub const STORAGE_KEY: &str = "quran-companion-data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored record is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Where the user record lives between sessions.
pub trait Store {
    /// `None` on first run.
    fn load(&self) -> Result<Option<StoredUserData>, StoreError>;
    fn save(&mut self, data: &UserData) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn load(&self) -> Result<Option<StoredUserData>, StoreError> {
        match StateRepo::get(&self.conn, STORAGE_KEY)? {
            None => Ok(None),
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        }
    }

    fn save(&mut self, data: &UserData) -> Result<(), StoreError> {
        let json = serde_json::to_string(data)?;
        debug!("saving user record ({} bytes)", json.len());
        StateRepo::set(&self.conn, STORAGE_KEY, &json)?;
        Ok(())
    }
}

/// Keeps the record as a JSON string in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Option<String>,
    saves: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            saves: 0,
        }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn load(&self) -> Result<Option<StoredUserData>, StoreError> {
        self.json
            .as_deref()
            .map(serde_json::from_str::<StoredUserData>)
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&mut self, data: &UserData) -> Result<(), StoreError> {
        self.json = Some(serde_json::to_string(data)?);
        self.saves += 1;
        Ok(())
    }
}
