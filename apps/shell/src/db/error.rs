//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(#[from] serde_json::Error),

    #[error("could not create database directory: {0}")]
    Io(#[from] std::io::Error),
}
