//! Study session management for spaced repetition practice.
//! Handles multi-round review of due cards with SM-2 scheduling.

use super::{Card, Rating};
use crate::database::db;
use crate::error::Result;
use rusqlite::Connection;

/// Manages a study session with multiple review rounds.
/// Cards rated hard are repeated in subsequent rounds.
pub struct StudySession {
    pub cards: Vec<Card>,
    passed: Vec<bool>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub show_answer: bool,
    pub round_number: usize,
}

impl StudySession {
    /// Creates a new session from cards that are due for review.
    pub fn new_from_due_cards(cards: Vec<Card>) -> Self {
        let indices: Vec<usize> = (0..cards.len()).collect();

        Self {
            passed: vec![false; cards.len()],
            cards,
            current_round_cards: indices,
            current_index: 0,
            show_answer: false,
            round_number: 1,
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
    }

    pub fn is_current_passed(&self) -> bool {
        self.current_round_cards
            .get(self.current_index)
            .is_some_and(|&idx| self.passed[idx])
    }

    pub fn reveal_answer(&mut self) {
        self.show_answer = true;
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
            self.show_answer = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards rated hard in this one.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| !self.passed[idx])
            .collect();

        if !failed.is_empty() {
            self.current_round_cards = failed;
            self.current_index = 0;
            self.show_answer = false;
            self.round_number += 1;
        }
    }

    /// Records the rating through the card store and keeps the updated card.
    /// Medium and easy pass the card for this session; hard repeats it.
    pub fn rate_current_card(&mut self, rating: Rating, conn: &Connection) -> Result<()> {
        let Some(&idx) = self.current_round_cards.get(self.current_index) else {
            return Ok(());
        };
        let Some(card) = self.cards.get(idx) else {
            return Ok(());
        };

        let updated = db::record_review(card.id, rating, conn)?;
        self.cards[idx] = updated;
        self.passed[idx] = rating != Rating::Hard;
        Ok(())
    }

    pub fn passed_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.passed[idx])
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    /// True when the round is empty or every card in it has been passed.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.passed_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardDraft;
    use chrono::{TimeZone, Utc};

    fn setup(fronts: &[&str]) -> (Connection, StudySession) {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        db::set_current_date(Utc.with_ymd_and_hms(2025, 4, 10, 7, 0, 0).unwrap(), &conn).unwrap();
        for front in fronts {
            db::add_card(&CardDraft::new(*front, "back"), &conn).unwrap();
        }
        let due = db::get_cards_due_for_review(&conn).unwrap();
        (conn, StudySession::new_from_due_cards(due))
    }

    #[test]
    fn test_empty_session_is_completed() {
        let mut session = StudySession::new_from_due_cards(Vec::new());
        assert!(session.is_completed());
        assert!(session.current_card().is_none());
        session.next_card();
        assert_eq!(session.round_number, 1);
    }

    #[test]
    fn test_all_passed_in_first_round() {
        let (conn, mut session) = setup(&["a", "b"]);
        assert_eq!(session.phase_message(), "Round 1: 2 cards");

        session.reveal_answer();
        session.rate_current_card(Rating::Easy, &conn).unwrap();
        session.next_card();
        assert!(!session.show_answer);
        session.rate_current_card(Rating::Medium, &conn).unwrap();

        assert!(session.is_completed());
        assert_eq!(session.passed_count(), 2);
        assert!(db::get_cards_due_for_review(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_hard_cards_repeat_in_next_round() {
        let (conn, mut session) = setup(&["a", "b", "c"]);

        session.rate_current_card(Rating::Easy, &conn).unwrap();
        session.next_card();
        session.rate_current_card(Rating::Hard, &conn).unwrap();
        session.next_card();
        session.rate_current_card(Rating::Medium, &conn).unwrap();
        assert_eq!(session.remaining_count(), 1);
        session.next_card();

        assert_eq!(session.round_number, 2);
        assert_eq!(session.total_count(), 1);
        assert_eq!(session.phase_message(), "Round 2 (Review): 1 cards to retry");
        assert_eq!(session.current_card().map(|c| c.front.as_str()), Some("b"));
        assert!(!session.is_completed());

        session.rate_current_card(Rating::Medium, &conn).unwrap();
        assert!(session.is_completed());

        // Two reviews recorded for the repeated card
        let card = session.current_card().unwrap();
        assert_eq!(card.review.review_count, 2);
        assert_eq!(card.review.error_count, 1);
        assert_eq!(card.review.interval, 6);
    }

    #[test]
    fn test_rating_updates_in_memory_card() {
        let (conn, mut session) = setup(&["a"]);
        session.rate_current_card(Rating::Hard, &conn).unwrap();

        assert!(!session.is_current_passed());
        let card = session.current_card().unwrap();
        assert_eq!(card.review.error_count, 1);
        assert_eq!(db::get_card(card.id, &conn).unwrap(), *card);
    }
}
