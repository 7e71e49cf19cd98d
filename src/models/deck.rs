//! Deck is a named set of flashcards
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: "My Deck".to_string(),
            description: String::new(),
        }
    }
}
