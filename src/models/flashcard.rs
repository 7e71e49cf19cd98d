//! Flashcard is a pair <front, back> plus the review state the scheduler reads.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub deck_id: String,
    pub front: String,
    pub back: String,
    /// 1 = Easy, 2 = Medium, 3 = Hard. Stored raw so that a bad value coming
    /// from the store still schedules (with the 1 day fallback).
    pub difficulty: u8,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub review_count: u32,
}

impl Flashcard {
    /// A card that has never been reviewed, with the default Easy difficulty.
    pub fn new(id: &str, deck_id: &str, front: &str, back: &str) -> Self {
        Self {
            id: id.to_string(),
            deck_id: deck_id.to_string(),
            front: front.to_string(),
            back: back.to_string(),
            difficulty: 1,
            last_reviewed: None,
            review_count: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none()
    }
}
