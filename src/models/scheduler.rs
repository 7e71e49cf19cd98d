//! Due-card scheduling with a fixed interval table.
//!
//! - A card that was never reviewed is always due
//! - Otherwise a card is due once the whole days elapsed since its last review
//!   reach the interval looked up at `difficulty - 1`
//! - Elapsed time is floored to whole days, partial days never count
//! - A difficulty with no entry in the table falls back to a 1 day interval

use super::Flashcard;
use chrono::{DateTime, Duration, Utc};

/// Review intervals in days, indexed by `difficulty - 1`.
///
/// Only the first three entries are reachable while difficulty stays in 1..=3.
pub const INTERVALS: [i64; 6] = [1, 3, 7, 14, 30, 90];

/// Interval used when the difficulty has no entry in [`INTERVALS`].
pub const FALLBACK_INTERVAL: i64 = 1;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Looks up the review interval (in days) for a difficulty.
pub fn interval_for(difficulty: u8) -> i64 {
    (difficulty as usize)
        .checked_sub(1)
        .and_then(|idx| INTERVALS.get(idx))
        .copied()
        .unwrap_or(FALLBACK_INTERVAL)
}

/// Whole days between `from` and `to`, floored. Negative if `to` is earlier.
pub fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn is_due(card: &Flashcard, now: DateTime<Utc>) -> bool {
    match card.last_reviewed {
        None => true,
        Some(last) => whole_days_between(last, now) >= interval_for(card.difficulty),
    }
}

/// Returns the cards due for review at `now`, in input order.
pub fn select_due<'a, I>(cards: I, now: DateTime<Utc>) -> Vec<Flashcard>
where
    I: IntoIterator<Item = &'a Flashcard>,
{
    cards
        .into_iter()
        .filter(|card| is_due(card, now))
        .cloned()
        .collect()
}

/// When a card reviewed at `from` with `difficulty` becomes due again.
pub fn next_review_for(difficulty: u8, from: DateTime<Utc>) -> DateTime<Utc> {
    from + Duration::days(interval_for(difficulty))
}

/// Next due date of a card. `None` for a card that was never reviewed (it is due now).
pub fn next_review_date(card: &Flashcard) -> Option<DateTime<Utc>> {
    card.last_reviewed
        .map(|last| next_review_for(card.difficulty, last))
}
