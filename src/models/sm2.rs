//! SM-2 (SuperMemo 2) spaced repetition scheduler.
//!
//! Given a card's review state and a rating, computes the next ease factor,
//! interval and due date:
//! - Ratings map to fixed quality grades: hard = 2, medium = 4, easy = 5
//! - Quality below 3 counts as an error: the interval resets to 1 day
//! - Successful reviews grow the interval 0 → 1 → 6 days, then multiply it by
//!   the ease factor
//! - EF is adjusted after every review, errors included, and never falls
//!   below 1.3
//!
//! The scheduler is a pure function of its inputs. It reads no clock; the
//! caller passes the review instant.

use super::Rating;
use super::review_state::{MIN_EASE_FACTOR, PartialReviewState, ReviewState};
use chrono::{DateTime, TimeDelta, Utc};

/// Qualities below this count as a failed recall.
const PASSING_QUALITY: u8 = 3;
/// Interval after the first successful review (or after any error).
const FIRST_INTERVAL: u32 = 1;
/// Interval after the second successful review.
const SECOND_INTERVAL: u32 = 6;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Calculates the review state that follows rating a card at `now`.
pub fn schedule(
    state: impl Into<PartialReviewState>,
    rating: Rating,
    now: DateTime<Utc>,
) -> ReviewState {
    let prior = state.into().normalize();
    let quality = rating.quality();
    let is_error = quality < PASSING_QUALITY;

    let error_count = if is_error {
        prior.error_count.saturating_add(1)
    } else {
        prior.error_count
    };

    let interval = if is_error {
        FIRST_INTERVAL
    } else {
        match prior.interval {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            // `as` saturates, so huge intervals stop at u32::MAX
            n => (f64::from(n) * prior.ease_factor).round() as u32,
        }
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let q = f64::from(quality);
    let ease_factor = (prior.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
        .max(MIN_EASE_FACTOR);

    ReviewState {
        ease_factor,
        interval,
        review_count: prior.review_count.saturating_add(1),
        error_count,
        due_date: due_after(now, interval),
        updated_at: now,
    }
}

/// `now` plus `interval` fixed-length days, saturating at the latest
/// representable instant.
fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    TimeDelta::try_seconds(i64::from(interval) * SECONDS_PER_DAY)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Interval each rating would produce, in [`Rating::ALL`] order.
pub fn preview_intervals(state: &ReviewState) -> [(Rating, u32); 3] {
    let now = state.updated_at;
    Rating::ALL.map(|rating| (rating, schedule(state, rating, now).interval))
}

/// Formats an interval in days as a short label ("now", "3d", "2w", "4mo", "1y").
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
