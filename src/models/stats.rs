//! Difficulty breakdown of a set of cards, bucketed by ease factor.
use super::{Card, Rating};

const EASY_ABOVE: f64 = 2.5;
const MEDIUM_ABOVE: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DifficultyBreakdown {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyBreakdown {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut breakdown = Self::default();
        for card in cards {
            match Self::bucket(card.review.ease_factor) {
                Rating::Easy => breakdown.easy += 1,
                Rating::Medium => breakdown.medium += 1,
                Rating::Hard => breakdown.hard += 1,
            }
        }
        breakdown
    }

    /// Bucket for a single ease factor. New cards (EF 2.5) count as medium.
    pub fn bucket(ease_factor: f64) -> Rating {
        if ease_factor > EASY_ABOVE {
            Rating::Easy
        } else if ease_factor > MEDIUM_ABOVE {
            Rating::Medium
        } else {
            Rating::Hard
        }
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }

    pub fn count(&self, rating: Rating) -> usize {
        match rating {
            Rating::Easy => self.easy,
            Rating::Medium => self.medium,
            Rating::Hard => self.hard,
        }
    }

    /// Fraction of cards in the bucket; 0.0 when there are no cards.
    pub fn share(&self, rating: Rating) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(rating) as f32 / total as f32
    }
}
