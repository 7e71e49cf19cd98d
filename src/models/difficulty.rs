//! Learner-assigned recall rating. The same value drives the next review interval.
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

/// How an answer counts towards the session statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Difficulty {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Easy and Medium count as correct, Hard as incorrect.
    pub fn outcome(self) -> Outcome {
        if self.value() <= 2 {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = SessionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            other => Err(SessionError::InvalidInput(other)),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.value()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ratings() {
        assert_eq!(Difficulty::try_from(1).unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::try_from(2).unwrap(), Difficulty::Medium);
        assert_eq!(Difficulty::try_from(3).unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            Difficulty::try_from(0),
            Err(SessionError::InvalidInput(0))
        ));
        assert!(matches!(
            Difficulty::try_from(4),
            Err(SessionError::InvalidInput(4))
        ));
    }

    #[test]
    fn test_outcome_threshold() {
        assert_eq!(Difficulty::Easy.outcome(), Outcome::Correct);
        assert_eq!(Difficulty::Medium.outcome(), Outcome::Correct);
        assert_eq!(Difficulty::Hard.outcome(), Outcome::Incorrect);
    }

    #[test]
    fn test_serde_uses_numeric_value() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "2");

        let parsed: Difficulty = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        assert!(serde_json::from_str::<Difficulty>("7").is_err());
    }
}
