//! Card is a pair <front, back> with optional labels and its review state.
use super::review_state::{PartialReviewState, ReviewState};
use super::{Rating, sm2};
use crate::error::{FlashcardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CardRecord")]
pub struct Card {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub category: String,
    pub chapter: String,
    pub tags: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub review: ReviewState,
}

/// Card as it arrives from outside, with any scheduling field possibly
/// missing. Missing fields get the same defaults as the scheduler applies;
/// a missing due date means the card is due from its creation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    id: i64,
    front: String,
    back: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    chapter: String,
    #[serde(default)]
    tags: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    review: PartialReviewState,
}

impl From<CardRecord> for Card {
    fn from(record: CardRecord) -> Self {
        let review = ReviewState::from_partial(
            &record.review,
            record.due_date,
            record.updated_at,
            record.created_at,
        );
        Self {
            id: record.id,
            front: record.front,
            back: record.back,
            category: record.category,
            chapter: record.chapter,
            tags: record.tags,
            created_at: record.created_at,
            review,
        }
    }
}

impl Card {
    /// Returns the card with its review state replaced by the scheduler's
    /// output for `rating` at `now`.
    pub fn reviewed(mut self, rating: Rating, now: DateTime<Utc>) -> Self {
        self.review = sm2::schedule(&self.review, rating, now);
        self
    }
}

/// User-authored content of a card, used for creating and editing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
    pub category: String,
    pub chapter: String,
    pub tags: String,
}

impl CardDraft {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Front and back are required; the labels may be empty.
    pub fn validate(&self) -> Result<()> {
        if self.front.trim().is_empty() || self.back.trim().is_empty() {
            return Err(FlashcardError::EmptyContent);
        }
        Ok(())
    }

    pub fn from_card(card: &Card) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            category: card.category.clone(),
            chapter: card.chapter.clone(),
            tags: card.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn sample_card() -> Card {
        let created = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        Card {
            id: 7,
            front: "hello".to_string(),
            back: "cześć".to_string(),
            category: "Polish".to_string(),
            chapter: String::new(),
            tags: String::new(),
            created_at: created,
            review: ReviewState::new(created),
        }
    }

    #[test]
    fn test_reviewed_replaces_review_state_only() {
        let card = sample_card();
        let now = card.created_at + TimeDelta::hours(3);

        let next = card.clone().reviewed(Rating::Easy, now);

        assert_eq!(next.id, card.id);
        assert_eq!(next.front, card.front);
        assert_eq!(next.created_at, card.created_at);
        assert_eq!(next.review.interval, 1);
        assert_eq!(next.review.review_count, 1);
        assert_eq!(next.review.due_date, now + TimeDelta::days(1));
    }

    #[test]
    fn test_record_shape_has_flat_review_fields() {
        let value = serde_json::to_value(sample_card()).unwrap();

        assert_eq!(value["front"], "hello");
        assert_eq!(value["easeFactor"], 2.5);
        assert_eq!(value["interval"], 0);
        assert_eq!(value["reviewCount"], 0);
        assert_eq!(value["errorCount"], 0);
        assert!(value["dueDate"].is_string());
        assert!(value.get("review").is_none());
    }

    #[test]
    fn test_record_roundtrip_through_json() {
        let card = sample_card();
        let json = serde_json::to_string(&card).unwrap();
        let parsed: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn test_record_with_missing_review_fields_gets_defaults() {
        let json = r#"{
  "id": 3,
  "front": "tak",
  "back": "yes",
  "createdAt": "2025-02-01T12:00:00Z",
  "interval": 6,
  "easeFactor": 0
}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        let created = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();

        assert_eq!(card.review.interval, 6);
        assert_eq!(card.review.ease_factor, 2.5);
        assert_eq!(card.review.review_count, 0);
        assert_eq!(card.review.error_count, 0);
        assert_eq!(card.review.due_date, created);
        assert_eq!(card.review.updated_at, created);
        assert!(card.category.is_empty());

        let next = card.reviewed(Rating::Medium, created);
        assert_eq!(next.review.interval, 15);
    }

    #[test]
    fn test_draft_validation() {
        assert!(CardDraft::new("term", "definition").validate().is_ok());
        assert!(matches!(
            CardDraft::new("  ", "definition").validate(),
            Err(FlashcardError::EmptyContent)
        ));
        assert!(CardDraft::new("term", "").validate().is_err());
    }

    #[test]
    fn test_draft_from_card() {
        let draft = CardDraft::from_card(&sample_card());
        assert_eq!(draft, CardDraft::new("hello", "cześć").with_category("Polish"));
    }
}
