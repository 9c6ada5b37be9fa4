/// SQLite reader and writer for the consolidated compound table.
pub mod sqlite;

use std::path::Path;

use crate::error::LookupError;

/// Failure while reading or writing a consolidated compound file.
#[derive(Debug)]
pub enum PersistError {
    /// No regular file at the given path.
    NotFound,
    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
    /// File does not look like a compound table.
    Schema(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("database file not found"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::Schema(msg) => write!(f, "schema mismatch: {msg}"),
        }
    }
}

impl PersistError {
    /// Reports this failure as an unavailable store at `path`.
    pub fn into_lookup(self, path: &Path) -> LookupError {
        LookupError::unavailable(path, self)
    }
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;
