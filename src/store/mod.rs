//! SQLite Persistence
//!
//! A [`Database`] is a cheap handle on the database file path. Every request
//! opens its own [`Connection`] through [`Database::connect`] and drops it on
//! exit, success or failure. There is no pool and no connection shared
//! between requests.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

pub mod schema;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open a connection to the database file.
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),
}

/// Handle on the on-disk SQLite database.
///
/// Cloning is cheap; each clone opens independent connections.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Create a handle for the database at `path`. Does not touch the file;
    /// the file is created on first connection.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection.
    pub fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(StoreError::Open)
    }
}
