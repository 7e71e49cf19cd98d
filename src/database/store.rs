//! Data-access seam between the study core and whatever keeps the cards.
use super::db;
use super::error::Result;
use crate::models::stats::DeckStats;
use crate::models::{Deck, Difficulty, Flashcard, SessionStats, StudySessionRecord};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;

/// What the scheduler and the session engine need from storage.
pub trait CardStore {
    fn list_cards_for_deck(&self, deck_id: &str) -> Result<Vec<Flashcard>>;

    /// Replaces the card's difficulty, stamps it as reviewed now and bumps its review count.
    fn apply_review(&self, card_id: &str, difficulty: Difficulty) -> Result<()>;
}

/// SQLite-backed store. "Now" is the simulated date kept in the database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::init_database(path)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = db::init_in_memory()?;
        Ok(Self { conn })
    }

    pub fn current_date(&self) -> Result<DateTime<Utc>> {
        db::get_current_date(&self.conn)
    }

    pub fn set_current_date(&self, date: DateTime<Utc>) -> Result<()> {
        db::set_current_date(date, &self.conn)
    }

    pub fn advance_day(&self) -> Result<DateTime<Utc>> {
        db::advance_day(&self.conn)
    }

    pub fn create_deck(&self, name: &str, description: &str) -> Result<Deck> {
        db::create_deck(name, description, &self.conn)
    }

    pub fn get_deck(&self, id: &str) -> Result<Option<Deck>> {
        db::get_deck(id, &self.conn)
    }

    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        db::list_decks(&self.conn)
    }

    pub fn update_deck(&self, id: &str, name: &str, description: &str) -> Result<Deck> {
        db::update_deck(id, name, description, &self.conn)
    }

    pub fn delete_deck(&self, id: &str) -> Result<()> {
        db::delete_deck(id, &self.conn)
    }

    pub fn create_flashcard(
        &self,
        deck_id: &str,
        front: &str,
        back: &str,
        difficulty: Option<Difficulty>,
    ) -> Result<Flashcard> {
        db::create_flashcard(deck_id, front, back, difficulty, &self.conn)
    }

    pub fn get_flashcard(&self, id: &str) -> Result<Option<Flashcard>> {
        db::get_flashcard(id, &self.conn)
    }

    pub fn update_flashcard(&self, id: &str, front: &str, back: &str) -> Result<Flashcard> {
        db::update_flashcard(id, front, back, &self.conn)
    }

    pub fn delete_flashcard(&self, id: &str) -> Result<()> {
        db::delete_flashcard(id, &self.conn)
    }

    pub fn create_study_session(&self, deck_id: &str) -> Result<StudySessionRecord> {
        db::create_study_session(deck_id, &self.conn)
    }

    pub fn update_study_session(&self, id: &str, stats: &SessionStats, completed: bool) -> Result<()> {
        db::update_study_session(id, stats, completed, &self.conn)
    }

    pub fn get_study_session(&self, id: &str) -> Result<Option<StudySessionRecord>> {
        db::get_study_session(id, &self.conn)
    }

    pub fn deck_stats(&self, deck_id: &str) -> Result<DeckStats> {
        db::deck_stats(deck_id, &self.conn)
    }
}

impl CardStore for SqliteStore {
    fn list_cards_for_deck(&self, deck_id: &str) -> Result<Vec<Flashcard>> {
        db::list_flashcards_for_deck(deck_id, &self.conn)
    }

    fn apply_review(&self, card_id: &str, difficulty: Difficulty) -> Result<()> {
        db::apply_review(card_id, difficulty, &self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.sqlite3");

        let deck_id = {
            let store = SqliteStore::open(&path).unwrap();
            let deck = store.create_deck("Persisted", "").unwrap();
            store.create_flashcard(&deck.id, "front", "back", None).unwrap();
            deck.id
        };

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.list_cards_for_deck(&deck_id).unwrap().len(), 1);
    }

    #[test]
    fn test_card_store_review_round() {
        let store = SqliteStore::in_memory().unwrap();
        let deck = store.create_deck("Deck", "").unwrap();
        let card = store.create_flashcard(&deck.id, "front", "back", None).unwrap();

        store.apply_review(&card.id, Difficulty::Hard).unwrap();

        let cards = store.list_cards_for_deck(&deck.id).unwrap();
        assert_eq!(cards[0].difficulty, 3);
        assert_eq!(cards[0].review_count, 1);
        assert_eq!(cards[0].last_reviewed, Some(store.current_date().unwrap()));
    }
}
