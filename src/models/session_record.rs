//! Persisted summary of a study session.
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudySessionRecord {
    pub id: String,
    pub deck_id: String,
    pub cards_studied: u32,
    pub correct_answers: u32,
    pub started_at: DateTime<Utc>,
    /// Unset while the session is still running or was abandoned.
    pub completed_at: Option<DateTime<Utc>>,
}
