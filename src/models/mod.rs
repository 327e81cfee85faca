pub mod card;
pub mod card_query;
pub mod rating;
pub mod review_state;
pub mod settings;
pub mod sm2;
pub mod stats;
pub mod study_session;

pub use card::{Card, CardDraft};
pub use card_query::{CardQuery, SortBy};
pub use rating::Rating;
pub use review_state::{PartialReviewState, ReviewState};
pub use settings::Settings;
pub use stats::DifficultyBreakdown;
pub use study_session::StudySession;
