use thiserror::Error;

use crate::database::StoreError;

/// Errors raised by the review recorder and the study session engine.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Difficulty outside 1..=3. Nothing was mutated.
    #[error("invalid difficulty {0}, expected 1 (Easy), 2 (Medium) or 3 (Hard)")]
    InvalidInput(u8),

    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    /// The store rejected the review. The local session has already advanced.
    #[error("failed to record review: {0}")]
    RecorderFailure(#[from] StoreError),
}
