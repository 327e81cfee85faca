pub mod config;
pub mod database;
pub mod error;
pub mod models;

pub use error::{FlashcardError, Result};
pub use models::sm2::schedule;
pub use models::{Card, CardDraft, PartialReviewState, Rating, ReviewState, StudySession};
