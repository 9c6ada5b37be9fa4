//! Error kinds surfaced to callers of the store and the search engine.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a store open or a search.
///
/// An empty result set is never an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    /// Data file missing, unreadable, or not shaped like a compound table.
    #[error("compound store unavailable at {}: {reason}", path.display())]
    StoreUnavailable {
        /// Path that was opened.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
    /// Caller-supplied query parameters violate a precondition.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    /// Adduct identifier outside the supported set.
    #[error("invalid adduct `{0}`")]
    InvalidAdduct(String),
}

impl LookupError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias for results carrying a [`LookupError`].
pub type LookupResult<T> = Result<T, LookupError>;
