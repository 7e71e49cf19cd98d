pub mod deck;
pub mod difficulty;
pub mod error;
pub mod flashcard;
pub mod review;
pub mod scheduler;
pub mod session_record;
pub mod session_stats;
pub mod shuffle;
pub mod stats;
pub mod study_session;

pub use deck::Deck;
pub use difficulty::{Difficulty, Outcome};
pub use error::SessionError;
pub use flashcard::Flashcard;
pub use review::{PendingReview, record_review};
pub use scheduler::select_due;
pub use session_record::StudySessionRecord;
pub use session_stats::SessionStats;
pub use study_session::{AnswerReport, AnsweredCard, SessionState, StudySession};
