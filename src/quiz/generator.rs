use log::debug;

use crate::quiz::random::{shuffle, RandomSource};
use crate::quiz::{InvalidInputError, Question, Verse, Vocabulary};

/// "In the name of God, the Merciful, the Compassionate"
/// Shadda before fatha, byte for byte as the verse endpoint serves it.
pub const INVOCATION: &str = "\u{0628}\u{0650}\u{0633}\u{06E1}\u{0645}\u{0650} \
     \u{0671}\u{0644}\u{0644}\u{0651}\u{064E}\u{0647}\u{0650} \u{0671}\u{0644}\u{0631}\u{0651}\u{064E}\u{062D}\u{06E1}\u{0645}\u{064E}\u{0640}\u{0670}\u{0646}\u{0650} \u{0671}\u{0644}\u{0631}\u{0651}\u{064E}\u{062D}\u{0650}\u{06CC}\u{0645}\u{0650}";

/// One correct word plus up to three distractors
pub const MAX_CHOICES: usize = 4;

pub struct QuestionGenerator<R> {
    rng: R,
    invocation: String,
}

impl<R: RandomSource> QuestionGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            invocation: INVOCATION.to_string(),
        }
    }

    pub fn with_invocation(mut self, invocation: impl Into<String>) -> Self {
        self.invocation = invocation.into();
        self
    }

    /// Builds one question per verse, in verse order.
    ///
    /// The invocation is stripped from the first verse when more text follows
    /// it, and the vocabulary is taken from the stripped verses.
    pub fn generate(&mut self, verses: &[Verse]) -> Result<Vec<Question>, InvalidInputError> {
        let mut verses = verses.to_vec();
        if let Some(first) = verses.first_mut() {
            if let Some(rest) = strip_invocation(&first.text, &self.invocation) {
                debug!("Stripping the invocation from verse {}", first.ordinal);
                first.text = rest.to_string();
            }
        }

        let vocabulary = Vocabulary::from_verses(&verses);
        self.generate_with_vocabulary(&verses, &vocabulary)
    }

    /// Same as [`generate`](Self::generate) but with a precomputed vocabulary
    /// and no invocation handling.
    pub fn generate_with_vocabulary(
        &mut self,
        verses: &[Verse],
        vocabulary: &Vocabulary,
    ) -> Result<Vec<Question>, InvalidInputError> {
        if verses.is_empty() {
            return Err(InvalidInputError::NoVerses);
        }

        let questions = verses
            .iter()
            .map(|verse| self.question_for(verse, vocabulary))
            .collect::<Result<Vec<_>, _>>()?;

        // every verse word should come from the vocabulary
        if vocabulary.is_empty() {
            return Err(InvalidInputError::EmptyVocabulary);
        }

        debug!(
            "Generated {} questions over a vocabulary of {} words",
            questions.len(),
            vocabulary.len()
        );
        Ok(questions)
    }

    fn question_for(
        &mut self,
        verse: &Verse,
        vocabulary: &Vocabulary,
    ) -> Result<Question, InvalidInputError> {
        let words = verse.text.split_whitespace().collect::<Vec<_>>();
        if words.is_empty() {
            return Err(InvalidInputError::BlankVerse {
                ordinal: verse.ordinal,
            });
        }

        let hidden_word_index = self.rng.pick(words.len());
        let correct_word = words[hidden_word_index];

        // Drawing the distractors:
        // 1. Start from every chapter word except the correct one
        // 2. Take a random word out of the pool, keep it unless it's already a choice
        // 3. Stop at MAX_CHOICES or when the pool runs dry
        let mut pool = vocabulary
            .iter()
            .filter(|word| *word != correct_word)
            .collect::<Vec<_>>();
        let mut choices = vec![correct_word.to_string()];
        while choices.len() < MAX_CHOICES && !pool.is_empty() {
            let drawn = pool.remove(self.rng.pick(pool.len()));
            if !choices.iter().any(|choice| choice == drawn) {
                choices.push(drawn.to_string());
            }
        }

        // So the correct answer isn't always the first one
        shuffle(&mut self.rng, &mut choices);

        Ok(Question {
            verse_text: verse.text.clone(),
            verse_ordinal: verse.ordinal,
            hidden_word_index,
            correct_word: correct_word.to_string(),
            choices,
        })
    }
}

/// Returns the text after a leading invocation, or `None` when the text
/// doesn't start with it or nothing but the invocation is there.
pub fn strip_invocation<'a>(text: &'a str, invocation: &str) -> Option<&'a str> {
    let rest = text.trim_start().strip_prefix(invocation)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    (!rest.is_empty()).then_some(rest)
}
