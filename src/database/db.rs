//! Database operations for the flashcard store
//!
//! Handles SQLite database initialization, CRUD operations for decks and flashcards,
//! review recording, study session records and the simulated current date.

use super::error::{Result, StoreError};
use crate::models::stats::DeckStats;
use crate::models::{Deck, Difficulty, Flashcard, SessionStats, StudySessionRecord};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use uuid::Uuid;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS decks (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS flashcards (
        id TEXT PRIMARY KEY,
        deck_id TEXT NOT NULL,
        front TEXT NOT NULL,
        back TEXT NOT NULL,
        difficulty INTEGER NOT NULL DEFAULT 1,
        last_reviewed TEXT,
        review_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (deck_id) REFERENCES decks (id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS study_sessions (
        id TEXT PRIMARY KEY,
        deck_id TEXT NOT NULL,
        cards_studied INTEGER NOT NULL DEFAULT 0,
        correct_answers INTEGER NOT NULL DEFAULT 0,
        started_at TEXT NOT NULL,
        completed_at TEXT,
        FOREIGN KEY (deck_id) REFERENCES decks (id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS app_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Opens (or creates) the database file at `path` and prepares the schema.
pub fn init_database<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path)?;
    prepare(&conn)?;
    Ok(conn)
}

/// Same as [`init_database`] but the data lives only as long as the connection.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

/// Creates the tables and sets the current date to now if not already initialized.
fn prepare(conn: &Connection) -> Result<()> {
    // Cascading deletes need foreign keys switched on for every connection
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![Utc::now().timestamp().to_string()],
    )?;

    Ok(())
}

/// Retrieves current simulated date from database
pub fn get_current_date(conn: &Connection) -> Result<DateTime<Utc>> {
    let timestamp: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    timestamp
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| StoreError::Corrupt(format!("current_date = {timestamp:?}")))
}

pub fn set_current_date(date: DateTime<Utc>, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![date.timestamp().to_string()],
    )?;
    Ok(())
}

/// Advances current date by 24 hours (for trying out the review intervals)
pub fn advance_day(conn: &Connection) -> Result<DateTime<Utc>> {
    let next_day = get_current_date(conn)? + Duration::days(1);
    set_current_date(next_day, conn)?;
    log::debug!("Current date advanced to {}", next_day.format("%Y-%m-%d"));
    Ok(next_day)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(message.to_string()));
    }
    Ok(())
}

fn deck_from_row(row: &Row<'_>) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

fn flashcard_from_row(row: &Row<'_>) -> rusqlite::Result<Flashcard> {
    let difficulty: i64 = row.get("difficulty")?;
    Ok(Flashcard {
        id: row.get("id")?,
        deck_id: row.get("deck_id")?,
        front: row.get("front")?,
        back: row.get("back")?,
        // Out-of-range values are kept schedulable (1 day fallback)
        difficulty: u8::try_from(difficulty).unwrap_or(0),
        last_reviewed: row.get("last_reviewed")?,
        review_count: row.get("review_count")?,
    })
}

/// Creates a new deck. The name is required, the description may be empty.
pub fn create_deck(name: &str, description: &str, conn: &Connection) -> Result<Deck> {
    require(name, "Deck name is required")?;

    let deck = Deck {
        id: new_id(),
        name: name.to_string(),
        description: description.to_string(),
    };
    let now = get_current_date(conn)?;

    conn.execute(
        "INSERT INTO decks (id, name, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![deck.id, deck.name, deck.description, now],
    )?;

    log::info!("Deck '{}' created ({})", deck.name, deck.id);
    Ok(deck)
}

pub fn get_deck(id: &str, conn: &Connection) -> Result<Option<Deck>> {
    let deck = conn
        .query_row(
            "SELECT id, name, description FROM decks WHERE id = ?1",
            params![id],
            deck_from_row,
        )
        .optional()?;
    Ok(deck)
}

/// Retrieves all decks, newest first
pub fn list_decks(conn: &Connection) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description FROM decks ORDER BY created_at DESC, rowid DESC",
    )?;
    let decks = stmt
        .query_map([], deck_from_row)?
        .collect::<rusqlite::Result<Vec<Deck>>>()?;
    Ok(decks)
}

pub fn update_deck(id: &str, name: &str, description: &str, conn: &Connection) -> Result<Deck> {
    require(name, "Deck name is required")?;
    let now = get_current_date(conn)?;

    let changed = conn.execute(
        "UPDATE decks SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
        params![name, description, now, id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Deck",
            id: id.to_string(),
        });
    }

    Ok(Deck {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
}

/// Deletes a deck together with its flashcards and study session records
pub fn delete_deck(id: &str, conn: &Connection) -> Result<()> {
    let changed = conn.execute("DELETE FROM decks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Deck",
            id: id.to_string(),
        });
    }
    log::info!("Deck {} deleted", id);
    Ok(())
}

/// Adds a flashcard to a deck. Difficulty defaults to Easy.
pub fn create_flashcard(
    deck_id: &str,
    front: &str,
    back: &str,
    difficulty: Option<Difficulty>,
    conn: &Connection,
) -> Result<Flashcard> {
    require(front, "Front and back text are required")?;
    require(back, "Front and back text are required")?;
    if get_deck(deck_id, conn)?.is_none() {
        return Err(StoreError::NotFound {
            kind: "Deck",
            id: deck_id.to_string(),
        });
    }

    let mut card = Flashcard::new(&new_id(), deck_id, front, back);
    card.difficulty = difficulty.unwrap_or(Difficulty::Easy).value();
    let now = get_current_date(conn)?;

    conn.execute(
        "INSERT INTO flashcards (id, deck_id, front, back, difficulty, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![card.id, card.deck_id, card.front, card.back, card.difficulty, now],
    )?;

    log::debug!("Flashcard {} added to deck {}", card.id, deck_id);
    Ok(card)
}

pub fn get_flashcard(id: &str, conn: &Connection) -> Result<Option<Flashcard>> {
    let card = conn
        .query_row(
            "SELECT id, deck_id, front, back, difficulty, last_reviewed, review_count
             FROM flashcards WHERE id = ?1",
            params![id],
            flashcard_from_row,
        )
        .optional()?;
    Ok(card)
}

/// Retrieves all flashcards for a given deck, in creation order
pub fn list_flashcards_for_deck(deck_id: &str, conn: &Connection) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(
        "SELECT id, deck_id, front, back, difficulty, last_reviewed, review_count
         FROM flashcards WHERE deck_id = ?1
         ORDER BY created_at ASC, rowid ASC",
    )?;

    let flashcards = stmt
        .query_map(params![deck_id], flashcard_from_row)?
        .collect::<rusqlite::Result<Vec<Flashcard>>>()?;

    Ok(flashcards)
}

/// Edits the text of a flashcard. Review state is left to [`apply_review`].
pub fn update_flashcard(id: &str, front: &str, back: &str, conn: &Connection) -> Result<Flashcard> {
    require(front, "Front and back text are required")?;
    require(back, "Front and back text are required")?;
    let now = get_current_date(conn)?;

    let changed = conn.execute(
        "UPDATE flashcards SET front = ?1, back = ?2, updated_at = ?3 WHERE id = ?4",
        params![front, back, now, id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Flashcard",
            id: id.to_string(),
        });
    }

    get_flashcard(id, conn)?.ok_or_else(|| StoreError::NotFound {
        kind: "Flashcard",
        id: id.to_string(),
    })
}

pub fn delete_flashcard(id: &str, conn: &Connection) -> Result<()> {
    let changed = conn.execute("DELETE FROM flashcards WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Flashcard",
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Records a review: replaces the difficulty, stamps the current date and bumps the count
pub fn apply_review(card_id: &str, difficulty: Difficulty, conn: &Connection) -> Result<()> {
    let now = get_current_date(conn)?;

    let changed = conn.execute(
        "UPDATE flashcards
         SET difficulty = ?1, last_reviewed = ?2, review_count = review_count + 1, updated_at = ?2
         WHERE id = ?3",
        params![difficulty.value(), now, card_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Flashcard",
            id: card_id.to_string(),
        });
    }

    log::debug!("Review recorded for card {}: {}", card_id, difficulty);
    Ok(())
}

/// Opens a study session record for a deck
pub fn create_study_session(deck_id: &str, conn: &Connection) -> Result<StudySessionRecord> {
    let record = StudySessionRecord {
        id: new_id(),
        deck_id: deck_id.to_string(),
        cards_studied: 0,
        correct_answers: 0,
        started_at: get_current_date(conn)?,
        completed_at: None,
    };

    conn.execute(
        "INSERT INTO study_sessions (id, deck_id, started_at) VALUES (?1, ?2, ?3)",
        params![record.id, record.deck_id, record.started_at],
    )?;

    Ok(record)
}

/// Saves the counters of a running session. `completed` also stamps the completion time.
pub fn update_study_session(
    id: &str,
    stats: &SessionStats,
    completed: bool,
    conn: &Connection,
) -> Result<()> {
    let changed = if completed {
        conn.execute(
            "UPDATE study_sessions SET cards_studied = ?1, correct_answers = ?2, completed_at = ?3
             WHERE id = ?4",
            params![stats.studied, stats.correct, get_current_date(conn)?, id],
        )?
    } else {
        conn.execute(
            "UPDATE study_sessions SET cards_studied = ?1, correct_answers = ?2 WHERE id = ?3",
            params![stats.studied, stats.correct, id],
        )?
    };

    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "Study session",
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn get_study_session(id: &str, conn: &Connection) -> Result<Option<StudySessionRecord>> {
    let record = conn
        .query_row(
            "SELECT id, deck_id, cards_studied, correct_answers, started_at, completed_at
             FROM study_sessions WHERE id = ?1",
            params![id],
            |row| {
                Ok(StudySessionRecord {
                    id: row.get(0)?,
                    deck_id: row.get(1)?,
                    cards_studied: row.get(2)?,
                    correct_answers: row.get(3)?,
                    started_at: row.get(4)?,
                    completed_at: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

/// Card counts and mean difficulty of the reviewed cards in a deck
pub fn deck_stats(deck_id: &str, conn: &Connection) -> Result<DeckStats> {
    let total_cards: u32 = conn.query_row(
        "SELECT COUNT(*) FROM flashcards WHERE deck_id = ?1",
        params![deck_id],
        |row| row.get(0),
    )?;

    let (avg_difficulty, reviewed_cards): (Option<f64>, u32) = conn.query_row(
        "SELECT AVG(difficulty), COUNT(*) FROM flashcards
         WHERE deck_id = ?1 AND last_reviewed IS NOT NULL",
        params![deck_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(DeckStats {
        total_cards,
        reviewed_cards,
        avg_difficulty: avg_difficulty.unwrap_or(0.0),
    })
}
