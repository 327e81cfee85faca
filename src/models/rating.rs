//! Self-rated recall offered to the user after revealing a card.
//!
//! Only three ratings exist. Each maps to a fixed SM-2 quality score; the
//! qualities 0, 1 and 3 are never produced.

use crate::error::FlashcardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Hard,
    Medium,
    Easy,
}

impl Rating {
    /// Every rating, in the order the study screen shows them.
    pub const ALL: [Rating; 3] = [Rating::Hard, Rating::Medium, Rating::Easy];

    /// SM-2 quality score (0-5 scale) for this rating.
    pub const fn quality(self) -> u8 {
        match self {
            Rating::Hard => 2,
            Rating::Medium => 4,
            Rating::Easy => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Rating::Hard => "hard",
            Rating::Medium => "medium",
            Rating::Easy => "easy",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rating::Hard => "Hard",
            Rating::Medium => "Medium",
            Rating::Easy => "Easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = FlashcardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(Rating::Hard),
            "medium" => Ok(Rating::Medium),
            "easy" => Ok(Rating::Easy),
            _ => Err(FlashcardError::InvalidRating(s.to_string())),
        }
    }
}
