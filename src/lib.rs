pub mod config;
pub mod database;
pub mod models;

pub use config::Config;
pub use database::{CardStore, SqliteStore, StoreError};
pub use models::{
    Deck, Difficulty, Flashcard, Outcome, SessionError, SessionState, SessionStats, StudySession,
    record_review, select_due,
};
