//! Summaries over a collection of flashcards.
use super::Flashcard;
use serde::Serialize;

/// Number of cards kept in [`CollectionStats::recent_activity`].
const RECENT_ACTIVITY_LEN: usize = 5;

/// Per-deck figures as reported by the store.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeckStats {
    pub total_cards: u32,
    pub reviewed_cards: u32,
    /// Mean difficulty of the reviewed cards, 0 when none were reviewed.
    pub avg_difficulty: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total_cards: usize,
    pub reviewed_cards: usize,
    pub total_reviews: u64,
    /// Mean difficulty over all cards, rounded to one decimal. 0 when there are no cards.
    pub average_difficulty: f64,
    /// Ids of the most recently reviewed cards, newest first.
    pub recent_activity: Vec<String>,
}

pub fn collection_stats(cards: &[Flashcard]) -> CollectionStats {
    let total_reviews = cards.iter().map(|c| c.review_count as u64).sum();
    let average_difficulty = if cards.is_empty() {
        0.0
    } else {
        let sum: u64 = cards.iter().map(|c| c.difficulty as u64).sum();
        (sum as f64 / cards.len() as f64 * 10.0).round() / 10.0
    };

    let mut reviewed: Vec<&Flashcard> = cards.iter().filter(|c| !c.is_new()).collect();
    reviewed.sort_by(|a, b| b.last_reviewed.cmp(&a.last_reviewed));

    CollectionStats {
        total_cards: cards.len(),
        reviewed_cards: reviewed.len(),
        total_reviews,
        average_difficulty,
        recent_activity: reviewed
            .iter()
            .take(RECENT_ACTIVITY_LEN)
            .map(|c| c.id.clone())
            .collect(),
    }
}
