//! Study session management.
//! Drives an ordered set of cards through flip, answer and advance, one card at a time.

use super::review::{PendingReview, apply_locally};
use super::shuffle::card_order;
use super::{Difficulty, Flashcard, Outcome, SessionError, SessionStats};
use crate::database::{CardStore, StoreError};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Where the session is in the present → reveal → answer cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Started on an empty card list. Terminal, distinct from `Completed`.
    NothingToStudy,
    /// Front of the current card is shown.
    Presenting,
    /// Back of the current card is shown.
    Revealed,
    /// Last card has been answered.
    Completed,
}

/// Result of a successful local answer.
#[derive(Clone, Debug)]
pub struct AnsweredCard {
    /// The answered card, with the review already applied to it.
    pub card: Flashcard,
    pub outcome: Outcome,
    /// True when this answer finished the session.
    pub completed: bool,
    /// The persistence step still owed to the store.
    pub review: PendingReview,
}

/// Result of [`StudySession::answer_and_record`].
#[derive(Debug)]
pub struct AnswerReport {
    pub answered: AnsweredCard,
    /// Store failure, if any. The session has advanced regardless.
    pub recorder_error: Option<SessionError>,
}

/// A single pass over an ordered list of cards. Owned by the caller; nothing is shared
/// between sessions.
#[derive(Clone, Debug)]
pub struct StudySession {
    cards: Vec<Flashcard>,
    order: Vec<usize>,
    position: usize,
    state: SessionState,
    stats: SessionStats,
    shuffle: bool,
    rng: StdRng,
}

impl StudySession {
    /// Starts a session, drawing the shuffle seed from the OS.
    pub fn start(cards: Vec<Flashcard>, shuffle: bool) -> Self {
        Self::with_rng(cards, shuffle, StdRng::from_entropy())
    }

    /// Starts a session whose shuffles (initial and on restart) are fixed by `seed`.
    pub fn start_seeded(cards: Vec<Flashcard>, shuffle: bool, seed: u64) -> Self {
        Self::with_rng(cards, shuffle, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cards: Vec<Flashcard>, shuffle: bool, mut rng: StdRng) -> Self {
        let order = card_order(cards.len(), shuffle, &mut rng);
        let state = Self::initial_state(&order);
        log::debug!(
            "Starting study session over {} cards (shuffle: {})",
            cards.len(),
            shuffle
        );

        Self {
            stats: SessionStats::new(cards.len()),
            cards,
            order,
            position: 0,
            state,
            shuffle,
            rng,
        }
    }

    fn initial_state(order: &[usize]) -> SessionState {
        if order.is_empty() {
            SessionState::NothingToStudy
        } else {
            SessionState::Presenting
        }
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        match self.state {
            SessionState::Presenting | SessionState::Revealed => self
                .order
                .get(self.position)
                .and_then(|&idx| self.cards.get(idx)),
            SessionState::NothingToStudy | SessionState::Completed => None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_flipped(&self) -> bool {
        self.state == SessionState::Revealed
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// Cards in visiting order.
    pub fn order(&self) -> impl Iterator<Item = &Flashcard> + '_ {
        self.order.iter().filter_map(|&idx| self.cards.get(idx))
    }

    /// Rounded percentage of the way through the order, counting the current card.
    pub fn progress_percent(&self) -> u32 {
        if self.order.is_empty() {
            return 0;
        }
        ((self.position + 1) as f64 / self.order.len() as f64 * 100.0).round() as u32
    }

    /// Toggles between front and back of the current card. Position and stats are kept.
    pub fn flip(&mut self) -> Result<SessionState, SessionError> {
        self.state = match self.state {
            SessionState::Presenting => SessionState::Revealed,
            SessionState::Revealed => SessionState::Presenting,
            SessionState::NothingToStudy => {
                return Err(SessionError::InvalidState("nothing to study"));
            }
            SessionState::Completed => {
                return Err(SessionError::InvalidState("session already completed"));
            }
        };
        Ok(self.state)
    }

    /// Answers the current card at the current time. See [`StudySession::answer_at`].
    pub fn answer(&mut self, difficulty: u8) -> Result<AnsweredCard, SessionError> {
        self.answer_at(difficulty, Utc::now())
    }

    /// Scores the current card and moves on.
    ///
    /// Allowed from both `Presenting` and `Revealed`. The rating is validated before
    /// anything changes. Only the local transition happens here, the returned
    /// [`PendingReview`] carries the store update.
    pub fn answer_at(
        &mut self,
        difficulty: u8,
        now: DateTime<Utc>,
    ) -> Result<AnsweredCard, SessionError> {
        let difficulty = Difficulty::try_from(difficulty)?;

        let card_idx = match self.state {
            SessionState::Presenting | SessionState::Revealed => self
                .order
                .get(self.position)
                .copied()
                .ok_or(SessionError::InvalidState("no current card"))?,
            SessionState::NothingToStudy => {
                return Err(SessionError::InvalidState("nothing to study"));
            }
            SessionState::Completed => {
                return Err(SessionError::InvalidState("session already completed"));
            }
        };
        let card = self
            .cards
            .get_mut(card_idx)
            .ok_or(SessionError::InvalidState("no current card"))?;

        apply_locally(card, difficulty, now);
        let answered_card = card.clone();

        let outcome = difficulty.outcome();
        self.stats.record(outcome);

        let completed = self.position + 1 >= self.order.len();
        if completed {
            self.state = SessionState::Completed;
            log::info!(
                "Study session completed: {} studied, {}% accuracy",
                self.stats.studied,
                self.stats.accuracy()
            );
        } else {
            self.position += 1;
            self.state = SessionState::Presenting;
        }

        Ok(AnsweredCard {
            review: PendingReview::new(&answered_card.id, difficulty),
            card: answered_card,
            outcome,
            completed,
        })
    }

    /// Answers locally at the current time, then forwards the review to `store`.
    /// See [`StudySession::answer_and_record_at`].
    pub fn answer_and_record<S: CardStore + ?Sized>(
        &mut self,
        store: &S,
        difficulty: u8,
    ) -> Result<AnswerReport, SessionError> {
        self.answer_and_record_at(store, difficulty, Utc::now())
    }

    /// Answers locally at `now`, then forwards the review to `store`.
    ///
    /// `now` should be the instant the store stamps reviews with, so that the
    /// returned card matches the stored one. Invalid ratings and answers without a
    /// current card are returned as errors and change nothing. A store failure is
    /// reported in the [`AnswerReport`] instead, since the session has already moved on.
    pub fn answer_and_record_at<S: CardStore + ?Sized>(
        &mut self,
        store: &S,
        difficulty: u8,
        now: DateTime<Utc>,
    ) -> Result<AnswerReport, SessionError> {
        let answered = self.answer_at(difficulty, now)?;
        let recorder_error = answered.review.apply(store).err();
        if let Some(err) = &recorder_error {
            log::warn!("Review for card {} not saved: {}", answered.card.id, err);
        }

        Ok(AnswerReport {
            answered,
            recorder_error,
        })
    }

    /// Back to the first card with zeroed counters. Reshuffles when shuffle is enabled.
    pub fn restart(&mut self) {
        self.order = card_order(self.cards.len(), self.shuffle, &mut self.rng);
        self.position = 0;
        self.stats.reset();
        self.state = Self::initial_state(&self.order);
        log::debug!("Study session restarted");
    }

    /// Changes the shuffle toggle. The current order is kept until the next restart.
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }
}

/// Loads a deck through the store and starts a session over its due cards.
///
/// With a `seed` the shuffle (initial and on restart) is reproducible, otherwise it
/// is drawn from the OS.
pub fn start_due_session<S: CardStore + ?Sized>(
    store: &S,
    deck_id: &str,
    now: DateTime<Utc>,
    shuffle: bool,
    seed: Option<u64>,
) -> Result<StudySession, StoreError> {
    let cards = store.list_cards_for_deck(deck_id)?;
    let due = super::scheduler::select_due(&cards, now);
    log::info!(
        "Deck {}: {} of {} cards due",
        deck_id,
        due.len(),
        cards.len()
    );
    Ok(match seed {
        Some(seed) => StudySession::start_seeded(due, shuffle, seed),
        None => StudySession::start(due, shuffle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStore {
        cards: Vec<Flashcard>,
        reviews: RefCell<Vec<(String, Difficulty)>>,
        fail: bool,
    }

    impl CardStore for RecordingStore {
        fn list_cards_for_deck(&self, deck_id: &str) -> Result<Vec<Flashcard>, StoreError> {
            Ok(self
                .cards
                .iter()
                .filter(|c| c.deck_id == deck_id)
                .cloned()
                .collect())
        }

        fn apply_review(&self, card_id: &str, difficulty: Difficulty) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("store offline".to_string()));
            }
            self.reviews
                .borrow_mut()
                .push((card_id.to_string(), difficulty));
            Ok(())
        }
    }

    fn cards() -> Vec<Flashcard> {
        vec![
            Flashcard::new("A", "deck", "a front", "a back"),
            Flashcard::new("B", "deck", "b front", "b back"),
            Flashcard::new("C", "deck", "c front", "c back"),
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    fn counters(session: &StudySession) -> (u32, u32, u32) {
        let stats = session.stats();
        (stats.studied, stats.correct, stats.incorrect)
    }

    fn current_id(session: &StudySession) -> Option<&str> {
        session.current_card().map(|c| c.id.as_str())
    }

    #[test]
    fn test_empty_session_has_nothing_to_study() {
        let mut session = StudySession::start(Vec::new(), false);

        assert_eq!(session.state(), SessionState::NothingToStudy);
        assert!(!session.is_completed());
        assert!(session.current_card().is_none());
        assert_eq!(session.progress_percent(), 0);
        assert!(matches!(
            session.answer(1),
            Err(SessionError::InvalidState(_))
        ));
        assert!(matches!(session.flip(), Err(SessionError::InvalidState(_))));
    }

    #[test]
    fn test_in_order_session_visits_cards_sequentially() {
        let mut session = StudySession::start(cards(), false);
        assert_eq!(session.stats().total, 3);

        assert_eq!(current_id(&session), Some("A"));
        session.answer_at(1, now()).unwrap();
        assert_eq!(current_id(&session), Some("B"));
        session.answer_at(1, now()).unwrap();
        assert_eq!(current_id(&session), Some("C"));

        let answered = session.answer_at(1, now()).unwrap();
        assert!(answered.completed);
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.position(), 2);
        assert_eq!(session.progress_percent(), 100);
    }

    #[test]
    fn test_flip_is_reversible() {
        let mut session = StudySession::start(cards(), false);

        assert_eq!(session.flip().unwrap(), SessionState::Revealed);
        assert!(session.is_flipped());
        assert_eq!(session.flip().unwrap(), SessionState::Presenting);
        assert_eq!(session.position(), 0);
        assert_eq!(session.stats().studied, 0);
    }

    #[test]
    fn test_answer_clears_flip() {
        let mut session = StudySession::start(cards(), false);
        session.flip().unwrap();
        session.answer_at(2, now()).unwrap();

        assert_eq!(session.state(), SessionState::Presenting);
        assert!(!session.is_flipped());
    }

    #[test]
    fn test_answer_without_flip_is_allowed() {
        let mut session = StudySession::start(cards(), false);
        assert!(session.answer_at(1, now()).is_ok());
    }

    #[test]
    fn test_answer_scoring() {
        let mut session = StudySession::start(cards(), false);

        session.answer_at(1, now()).unwrap();
        assert_eq!(counters(&session), (1, 1, 0));

        session.answer_at(2, now()).unwrap();
        assert_eq!(counters(&session), (2, 2, 0));

        session.answer_at(3, now()).unwrap();
        assert_eq!(counters(&session), (3, 2, 1));
    }

    #[test]
    fn test_accuracy_easy_hard_medium() {
        let mut session = StudySession::start(cards(), false);
        for rating in [1, 3, 2] {
            session.answer_at(rating, now()).unwrap();
        }
        assert_eq!(session.stats().accuracy(), 67);
    }

    #[test]
    fn test_answer_applies_review_to_card() {
        let mut session = StudySession::start(cards(), false);
        let answered = session.answer_at(3, now()).unwrap();

        assert_eq!(answered.card.id, "A");
        assert_eq!(answered.card.difficulty, 3);
        assert_eq!(answered.card.last_reviewed, Some(now()));
        assert_eq!(answered.card.review_count, 1);
        assert_eq!(answered.outcome, Outcome::Incorrect);
        assert_eq!(answered.review, PendingReview::new("A", Difficulty::Hard));
    }

    #[test]
    fn test_invalid_rating_changes_nothing() {
        let mut session = StudySession::start(cards(), false);
        session.flip().unwrap();

        assert!(matches!(
            session.answer_at(0, now()),
            Err(SessionError::InvalidInput(0))
        ));
        assert!(matches!(
            session.answer_at(4, now()),
            Err(SessionError::InvalidInput(4))
        ));
        assert_eq!(session.stats().studied, 0);
        assert_eq!(session.position(), 0);
        assert_eq!(session.state(), SessionState::Revealed);
        assert_eq!(session.current_card().unwrap().review_count, 0);
    }

    #[test]
    fn test_answer_after_completion_is_rejected() {
        let mut session = StudySession::start(cards(), false);
        for _ in 0..3 {
            session.answer_at(1, now()).unwrap();
        }
        let before = *session.stats();

        assert!(matches!(
            session.answer_at(1, now()),
            Err(SessionError::InvalidState(_))
        ));
        assert_eq!(*session.stats(), before);
        assert_eq!(session.position(), 2);
        assert!(session.is_completed());
    }

    #[test]
    fn test_restart_after_completion() {
        let mut session = StudySession::start(cards(), false);
        for rating in [1, 3, 2] {
            session.answer_at(rating, now()).unwrap();
        }

        session.restart();

        let stats = session.stats();
        assert_eq!((stats.studied, stats.correct, stats.incorrect), (0, 0, 0));
        assert_eq!(stats.total, 3);
        assert_eq!(session.state(), SessionState::Presenting);
        assert_eq!(current_id(&session), Some("A"));
    }

    #[test]
    fn test_flip_after_completion_is_rejected() {
        let mut session = StudySession::start(cards(), false);
        for _ in 0..3 {
            session.answer_at(2, now()).unwrap();
        }

        assert!(matches!(session.flip(), Err(SessionError::InvalidState(_))));
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn test_restart_shuffled_completed_session() {
        let many: Vec<Flashcard> = (0..20)
            .map(|i| Flashcard::new(&i.to_string(), "deck", "f", "b"))
            .collect();
        let mut session = StudySession::start_seeded(many, true, 11);
        let first_order: Vec<String> = session.order().map(|c| c.id.clone()).collect();
        while session.current_card().is_some() {
            session.answer_at(3, now()).unwrap();
        }
        assert!(session.is_completed());

        session.restart();

        let stats = session.stats();
        assert_eq!((stats.studied, stats.correct, stats.incorrect), (0, 0, 0));
        assert_eq!(stats.total, 20);
        assert_eq!(session.state(), SessionState::Presenting);
        assert_eq!(session.position(), 0);

        let new_order: Vec<String> = session.order().map(|c| c.id.clone()).collect();
        assert_ne!(new_order, first_order);
        assert_eq!(current_id(&session), Some(new_order[0].as_str()));

        let mut sorted = new_order.clone();
        sorted.sort();
        let mut expected = first_order.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_start_due_session_seeded_order_is_reproducible() {
        let store = RecordingStore {
            cards: (0..10)
                .map(|i| Flashcard::new(&i.to_string(), "deck", "f", "b"))
                .collect(),
            ..RecordingStore::default()
        };

        let first = start_due_session(&store, "deck", now(), true, Some(8)).unwrap();
        let second = start_due_session(&store, "deck", now(), true, Some(8)).unwrap();

        let a: Vec<&str> = first.order().map(|c| c.id.as_str()).collect();
        let b: Vec<&str> = second.order().map(|c| c.id.as_str()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_answer_and_record_at_uses_given_instant() {
        let store = RecordingStore::default();
        let mut session = StudySession::start(cards(), false);
        let later = now() + chrono::Duration::days(10);

        let report = session.answer_and_record_at(&store, 3, later).unwrap();

        assert_eq!(report.answered.card.last_reviewed, Some(later));
        assert!(!crate::models::scheduler::is_due(&report.answered.card, later));
    }

    #[test]
    fn test_restart_empty_session() {
        let mut session = StudySession::start(Vec::new(), true);
        session.restart();
        assert_eq!(session.state(), SessionState::NothingToStudy);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let first = StudySession::start_seeded(cards(), true, 99);
        let second = StudySession::start_seeded(cards(), true, 99);

        let a: Vec<&str> = first.order().map(|c| c.id.as_str()).collect();
        let b: Vec<&str> = second.order().map(|c| c.id.as_str()).collect();
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_shuffle_toggle_applies_on_restart() {
        let many: Vec<Flashcard> = (0..30)
            .map(|i| Flashcard::new(&i.to_string(), "deck", "f", "b"))
            .collect();
        let mut session = StudySession::start_seeded(many.clone(), false, 5);
        let in_order: Vec<String> = many.iter().map(|c| c.id.clone()).collect();

        session.set_shuffle(true);
        let before: Vec<String> = session.order().map(|c| c.id.clone()).collect();
        assert_eq!(before, in_order);

        session.restart();
        let after: Vec<String> = session.order().map(|c| c.id.clone()).collect();
        assert_ne!(after, in_order);
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_answer_and_record_forwards_review() {
        let store = RecordingStore::default();
        let mut session = StudySession::start(cards(), false);

        let report = session.answer_and_record(&store, 2).unwrap();

        assert!(report.recorder_error.is_none());
        assert_eq!(
            *store.reviews.borrow(),
            vec![("A".to_string(), Difficulty::Medium)]
        );
    }

    #[test]
    fn test_recorder_failure_does_not_roll_back() {
        let store = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        let mut session = StudySession::start(cards(), false);

        let report = session.answer_and_record(&store, 3).unwrap();

        assert!(matches!(
            report.recorder_error,
            Some(SessionError::RecorderFailure(_))
        ));
        assert_eq!(session.stats().studied, 1);
        assert_eq!(session.stats().incorrect, 1);
        assert_eq!(current_id(&session), Some("B"));
    }

    #[test]
    fn test_answer_and_record_rejects_invalid_rating_before_store() {
        let store = RecordingStore::default();
        let mut session = StudySession::start(cards(), false);

        assert!(matches!(
            session.answer_and_record(&store, 9),
            Err(SessionError::InvalidInput(9))
        ));
        assert!(store.reviews.borrow().is_empty());
    }

    #[test]
    fn test_start_due_session_filters_cards() {
        let mut reviewed = Flashcard::new("R", "deck", "r", "r");
        reviewed.last_reviewed = Some(now());
        let store = RecordingStore {
            cards: vec![
                Flashcard::new("A", "deck", "a", "a"),
                reviewed,
                Flashcard::new("X", "other", "x", "x"),
            ],
            ..RecordingStore::default()
        };

        let session = start_due_session(&store, "deck", now(), false, None).unwrap();

        assert_eq!(session.stats().total, 1);
        assert_eq!(current_id(&session), Some("A"));
    }
}
