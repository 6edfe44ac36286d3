//! Database error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("MongoDB error: {0}")]
    MongoDb(String),

    /// The startup handshake failed; there is no reconnection.
    #[error("Database not connected: {0}")]
    NotConnected(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),
}

impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        DbError::MongoDb(err.to_string())
    }
}
