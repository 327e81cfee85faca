//! Filtering and ordering of the card list shown on the main screen.
use super::Card;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Earliest due first
    #[default]
    Due,
    /// Highest ease factor first
    Ease,
    /// Alphabetical by front, ignoring case
    Front,
    /// Most errors first
    Errors,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [SortBy::Due, SortBy::Ease, SortBy::Front, SortBy::Errors];

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Due => "Due date",
            SortBy::Ease => "Ease",
            SortBy::Front => "Front",
            SortBy::Errors => "Errors",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardQuery {
    /// Exact category label to keep, or every card when `None`.
    pub category: Option<String>,
    /// Case-insensitive text matched against front and back.
    pub search: String,
    pub sort_by: SortBy,
}

impl CardQuery {
    pub fn matches(&self, card: &Card) -> bool {
        if let Some(category) = &self.category {
            if &card.category != category {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || card.front.to_lowercase().contains(&needle)
            || card.back.to_lowercase().contains(&needle)
    }

    /// Keeps the matching cards and orders them. The sort is stable, so ties
    /// keep their incoming order.
    pub fn apply(&self, cards: Vec<Card>) -> Vec<Card> {
        let mut result: Vec<Card> = cards.into_iter().filter(|c| self.matches(c)).collect();

        match self.sort_by {
            SortBy::Due => result.sort_by(|a, b| a.review.due_date.cmp(&b.review.due_date)),
            SortBy::Ease => {
                result.sort_by(|a, b| b.review.ease_factor.total_cmp(&a.review.ease_factor))
            }
            SortBy::Front => result.sort_by_key(|c| c.front.to_lowercase()),
            SortBy::Errors => result.sort_by(|a, b| b.review.error_count.cmp(&a.review.error_count)),
        }

        result
    }
}
