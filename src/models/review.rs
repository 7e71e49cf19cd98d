//! Applying the outcome of answering a card.
//!
//! Recording a review is split in two steps:
//! 1. [`record_review`] updates the in-memory card and classifies the answer
//! 2. [`PendingReview::apply`] forwards the same rating to the store
//!
//! A failure in step 2 never undoes step 1.

use super::{Difficulty, Flashcard, Outcome, SessionError};
use crate::database::CardStore;
use chrono::{DateTime, Utc};

/// Sets the card's difficulty to `difficulty_given`, stamps it as reviewed at
/// `now` and bumps the review count. The rating replaces the stored difficulty.
///
/// An out-of-range rating is rejected before the card is touched.
pub fn record_review(
    card: &mut Flashcard,
    difficulty_given: u8,
    now: DateTime<Utc>,
) -> Result<Outcome, SessionError> {
    let difficulty = Difficulty::try_from(difficulty_given)?;
    apply_locally(card, difficulty, now);
    Ok(difficulty.outcome())
}

pub(crate) fn apply_locally(card: &mut Flashcard, difficulty: Difficulty, now: DateTime<Utc>) {
    card.difficulty = difficulty.value();
    card.last_reviewed = Some(now);
    card.review_count += 1;
}

/// A review that still has to reach the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReview {
    pub card_id: String,
    pub difficulty: Difficulty,
}

impl PendingReview {
    pub fn new(card_id: &str, difficulty: Difficulty) -> Self {
        Self {
            card_id: card_id.to_string(),
            difficulty,
        }
    }

    pub fn apply<S: CardStore + ?Sized>(&self, store: &S) -> Result<(), SessionError> {
        store
            .apply_review(&self.card_id, self.difficulty)
            .map_err(SessionError::RecorderFailure)
    }
}
