pub mod generator;
pub mod random;
pub mod render;
pub mod session;

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("chapter has no verses")]
    NoVerses,
    #[error("verse {ordinal} has no words")]
    BlankVerse { ordinal: u32 },
    #[error("vocabulary has no words")]
    EmptyVocabulary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Verse {
    pub text: String,
    pub ordinal: u32,
}
impl Verse {
    pub fn new(text: impl Into<String>, ordinal: u32) -> Self {
        Self {
            text: text.into(),
            ordinal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub verse_text: String,
    pub verse_ordinal: u32,
    pub hidden_word_index: usize,
    pub correct_word: String,
    pub choices: Vec<String>,
}
impl Question {
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.verse_text.split_whitespace()
    }
}

/// Distinct words of a chapter, in the order they first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn from_verses(verses: &[Verse]) -> Self {
        let mut seen = HashSet::new();
        let words = verses
            .iter()
            .flat_map(|verse| verse.text.split_whitespace())
            .filter(|word| seen.insert(*word))
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
