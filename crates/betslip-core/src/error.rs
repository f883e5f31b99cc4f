//! Error types for the Betslip core library.

use thiserror::Error;

/// Result type alias using Betslip `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Betslip operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Saved-history storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<crate::db::DatabaseError> for Error {
    fn from(e: crate::db::DatabaseError) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseError;

    #[test]
    fn storage_failures_keep_their_cause() {
        let err = Error::from(DatabaseError::Query("disk I/O error".into()));
        assert!(matches!(&err, Error::Storage(msg) if msg.contains("disk I/O error")));
        assert_eq!(err.to_string(), "Storage error: Query error: disk I/O error");
    }
}
