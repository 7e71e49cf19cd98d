//! Per-session answer counters.
use serde::Serialize;

use super::Outcome;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Number of cards in the session. Survives a restart.
    pub total: usize,
    pub studied: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl SessionStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.studied += 1;
        match outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Incorrect => self.incorrect += 1,
        }
    }

    /// Zeroes the answer counters, keeping `total`.
    pub fn reset(&mut self) {
        *self = Self::new(self.total);
    }

    /// Rounded percentage of correct answers, 0 before anything was studied.
    pub fn accuracy(&self) -> u32 {
        if self.studied == 0 {
            return 0;
        }
        (self.correct as f64 / self.studied as f64 * 100.0).round() as u32
    }
}
