//! Error type shared by the card store, rating parser and study session.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rating {0:?}: expected hard, medium or easy")]
    InvalidRating(String),

    #[error("Card not found: {0}")]
    CardNotFound(i64),

    #[error("Card front and back must not be empty")]
    EmptyContent,

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Stored current date is not a Unix timestamp: {0:?}")]
    InvalidStoredDate(String),
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
