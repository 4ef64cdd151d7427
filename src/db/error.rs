//! Error type shared by the stores.

use std::fmt;

/// Errors returned by database-backed stores.
#[derive(Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write (e.g. a taken username).
    Conflict,
    /// The statement reported success but returned no row.
    MissingRow(&'static str),
    /// Any other driver failure.
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "Unique constraint violated"),
            Self::MissingRow(what) => write!(f, "No row returned for {}", what),
            Self::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Self::Conflict,
            _ => Self::Database(err),
        }
    }
}
