//! Spaced repetition state carried by every card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor of a card that has never been reviewed.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
/// Lower bound for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    pub review_count: u32,
    pub error_count: u32,
    pub due_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewState {
    /// State of a freshly authored card: due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            review_count: 0,
            error_count: 0,
            due_date: now,
            updated_at: now,
        }
    }

    /// Completes a partial state with defaults. Both timestamps fall back to
    /// `fallback` when absent.
    pub fn from_partial(
        partial: &PartialReviewState,
        due_date: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        fallback: DateTime<Utc>,
    ) -> Self {
        let normalized = partial.normalize();
        Self {
            ease_factor: normalized.ease_factor,
            interval: normalized.interval,
            review_count: normalized.review_count,
            error_count: normalized.error_count,
            due_date: due_date.unwrap_or(fallback),
            updated_at: updated_at.unwrap_or(fallback),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }
}

/// Scheduling fields as they may arrive from a partially initialised record.
///
/// Missing fields are filled in by [`PartialReviewState::normalize`], which is
/// the only place the defaulting policy lives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialReviewState {
    pub ease_factor: Option<f64>,
    pub interval: Option<u32>,
    pub review_count: Option<u32>,
    pub error_count: Option<u32>,
}

/// Scheduler input after defaults have been applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedState {
    pub ease_factor: f64,
    pub interval: u32,
    pub review_count: u32,
    pub error_count: u32,
}

impl PartialReviewState {
    /// Fills absent fields with their defaults.
    ///
    /// An ease factor that is missing, zero or not finite counts as absent.
    /// A finite ease below [`MIN_EASE_FACTOR`] is raised to it.
    pub fn normalize(&self) -> NormalizedState {
        let ease_factor = match self.ease_factor {
            Some(ef) if ef.is_finite() && ef != 0.0 => ef.max(MIN_EASE_FACTOR),
            _ => DEFAULT_EASE_FACTOR,
        };

        NormalizedState {
            ease_factor,
            interval: self.interval.unwrap_or(0),
            review_count: self.review_count.unwrap_or(0),
            error_count: self.error_count.unwrap_or(0),
        }
    }
}

impl From<ReviewState> for PartialReviewState {
    fn from(state: ReviewState) -> Self {
        Self {
            ease_factor: Some(state.ease_factor),
            interval: Some(state.interval),
            review_count: Some(state.review_count),
            error_count: Some(state.error_count),
        }
    }
}

impl From<&ReviewState> for PartialReviewState {
    fn from(state: &ReviewState) -> Self {
        state.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_state_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let state = ReviewState::new(now);

        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.interval, 0);
        assert_eq!(state.review_count, 0);
        assert_eq!(state.error_count, 0);
        assert_eq!(state.due_date, now);
        assert!(state.is_due(now));
    }

    #[test]
    fn test_normalize_empty_state() {
        let normalized = PartialReviewState::default().normalize();

        assert_eq!(normalized.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(normalized.interval, 0);
        assert_eq!(normalized.review_count, 0);
        assert_eq!(normalized.error_count, 0);
    }

    #[test]
    fn test_normalize_falsy_ease_factor() {
        for ef in [0.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let partial = PartialReviewState {
                ease_factor: Some(ef),
                ..Default::default()
            };
            assert_eq!(partial.normalize().ease_factor, DEFAULT_EASE_FACTOR);
        }
    }

    #[test]
    fn test_normalize_raises_low_ease_factor() {
        let partial = PartialReviewState {
            ease_factor: Some(-4.0),
            interval: Some(12),
            ..Default::default()
        };
        let normalized = partial.normalize();

        assert_eq!(normalized.ease_factor, MIN_EASE_FACTOR);
        assert_eq!(normalized.interval, 12);
    }

    #[test]
    fn test_from_partial_fills_defaults() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let partial = PartialReviewState {
            interval: Some(6),
            ..Default::default()
        };
        let state = ReviewState::from_partial(&partial, None, None, created);

        assert_eq!(
            state,
            ReviewState {
                interval: 6,
                ..ReviewState::new(created)
            }
        );
    }

    #[test]
    fn test_partial_state_from_json_with_missing_fields() {
        let partial: PartialReviewState = serde_json::from_str(r#"{"interval": 6}"#).unwrap();

        assert_eq!(partial.interval, Some(6));
        assert_eq!(partial.ease_factor, None);
        assert_eq!(partial.normalize().ease_factor, 2.5);
    }
}
