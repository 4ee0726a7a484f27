use log::debug;

use crate::quiz::{InvalidInputError, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Progress {
    Active {
        current_index: usize,
        selected_answer: Option<String>,
        score: usize,
    },
    Complete {
        score: usize,
    },
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub current_index: usize,
    pub selected_answer: Option<&'a str>,
    pub score: usize,
    pub is_complete: bool,
}

/// Question-by-question quiz over one chapter.
///
/// Calls that don't fit the current state are ignored rather than rejected,
/// so a repeated tap on an answer or on "Next" can't change the score.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    progress: Progress,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Result<Self, InvalidInputError> {
        if questions.is_empty() {
            return Err(InvalidInputError::NoVerses);
        }
        Ok(Self {
            questions,
            progress: Progress::Active {
                current_index: 0,
                selected_answer: None,
                score: 0,
            },
        })
    }

    /// Records the answer for the current question. Returns `None` when the
    /// question was already answered or the quiz is over.
    pub fn submit_answer(&mut self, choice: &str) -> Option<AnswerOutcome> {
        let Progress::Active {
            current_index,
            selected_answer: selected_answer @ None,
            score,
        } = &mut self.progress
        else {
            return None;
        };

        *selected_answer = Some(choice.to_string());
        let outcome = if choice == self.questions[*current_index].correct_word {
            *score += 1;
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        debug!(
            "Question {} answered: {:?} (score {})",
            *current_index + 1,
            outcome,
            score
        );
        Some(outcome)
    }

    /// Moves past an answered question, completing the quiz after the last one.
    pub fn advance(&mut self) {
        let Progress::Active {
            current_index,
            selected_answer: Some(_),
            score,
        } = &self.progress
        else {
            return;
        };

        let (current_index, score) = (*current_index, *score);
        self.progress = if current_index + 1 == self.questions.len() {
            debug!("Quiz complete with score {}/{}", score, self.questions.len());
            Progress::Complete { score }
        } else {
            Progress::Active {
                current_index: current_index + 1,
                selected_answer: None,
                score,
            }
        };
    }

    /// Discards the session; the caller goes back to chapter selection.
    pub fn restart(self) {
        debug!("Restarting a session of {} questions", self.questions.len());
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        match &self.progress {
            Progress::Active {
                current_index,
                selected_answer,
                score,
            } => Snapshot {
                current_index: *current_index,
                selected_answer: selected_answer.as_deref(),
                score: *score,
                is_complete: false,
            },
            Progress::Complete { score } => Snapshot {
                current_index: self.questions.len(),
                selected_answer: None,
                score: *score,
                is_complete: true,
            },
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.progress {
            Progress::Active { current_index, .. } => self.questions.get(*current_index),
            Progress::Complete { .. } => None,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.progress, Progress::Complete { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::generator::QuestionGenerator;
    use crate::quiz::random::tests::Scripted;
    use crate::quiz::random::RngSource;
    use crate::quiz::Verse;
    use rand::{Rng, SeedableRng};

    fn question(correct: &str, choices: &[&str]) -> Question {
        Question {
            verse_text: choices.join(" "),
            verse_ordinal: 1,
            hidden_word_index: choices.iter().position(|c| *c == correct).unwrap(),
            correct_word: correct.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn two_questions() -> QuizSession {
        QuizSession::new(vec![
            question("a", &["a", "b", "c"]),
            question("y", &["x", "y", "z"]),
        ])
        .unwrap()
    }

    fn assert_invariants(session: &QuizSession) {
        let snapshot = session.snapshot();
        let answered = snapshot.current_index + snapshot.selected_answer.is_some() as usize;
        assert!(snapshot.score <= answered);
        assert!(answered <= session.len());
        assert!(snapshot.current_index <= session.len());
    }

    #[test]
    fn starts_active_at_the_first_question() {
        let session = two_questions();
        assert_eq!(
            session.snapshot(),
            Snapshot {
                current_index: 0,
                selected_answer: None,
                score: 0,
                is_complete: false,
            }
        );
        assert_eq!(session.current_question().unwrap().correct_word, "a");
    }

    #[test]
    fn empty_question_list_is_rejected() {
        assert_eq!(QuizSession::new(Vec::new()), Err(InvalidInputError::NoVerses));
    }

    #[test]
    fn correct_answer_scores_once() {
        let mut session = two_questions();
        assert_eq!(session.submit_answer("a"), Some(AnswerOutcome::Correct));
        assert_eq!(session.snapshot().score, 1);
        assert_eq!(session.snapshot().selected_answer, Some("a"));
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut session = two_questions();
        assert_eq!(session.submit_answer("b"), Some(AnswerOutcome::Incorrect));
        assert_eq!(session.submit_answer("a"), None);
        assert_eq!(session.submit_answer("c"), None);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.selected_answer, Some("b"));
        assert_eq!(snapshot.score, 0);
    }

    #[test]
    fn advance_without_answer_is_ignored() {
        let mut session = two_questions();
        let before = session.clone();
        session.advance();
        assert_eq!(session, before);
    }

    #[test]
    fn advance_moves_to_next_question_and_clears_answer() {
        let mut session = two_questions();
        session.submit_answer("a");
        session.advance();
        assert_eq!(
            session.snapshot(),
            Snapshot {
                current_index: 1,
                selected_answer: None,
                score: 1,
                is_complete: false,
            }
        );
        assert_eq!(session.current_question().unwrap().correct_word, "y");
    }

    #[test]
    fn completed_session_ignores_everything() {
        let mut session = QuizSession::new(vec![question("a", &["a", "b"])]).unwrap();
        session.submit_answer("a");
        session.advance();
        assert_eq!(session.progress(), &Progress::Complete { score: 1 });
        assert!(session.current_question().is_none());

        let done = session.clone();
        assert_eq!(session.submit_answer("a"), None);
        session.advance();
        assert_eq!(session, done);
        assert_eq!(session.snapshot().current_index, 1);
        assert!(session.snapshot().is_complete);

        session.restart();
    }

    #[test]
    fn chapter_walkthrough() {
        let verses = vec![Verse::new("A B C", 1), Verse::new("D E", 2)];
        let questions = QuestionGenerator::new(Scripted::new(&[]))
            .generate(&verses)
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.choices.len() == 4));

        let mut session = QuizSession::new(questions).unwrap();
        let first = session.current_question().unwrap().correct_word.clone();
        assert_eq!(session.submit_answer(&first), Some(AnswerOutcome::Correct));
        session.advance();

        let wrong = session
            .current_question()
            .unwrap()
            .choices
            .iter()
            .find(|c| **c != session.current_question().unwrap().correct_word)
            .unwrap()
            .clone();
        assert_eq!(session.submit_answer(&wrong), Some(AnswerOutcome::Incorrect));
        assert_eq!(session.snapshot().score, 1);
        session.advance();

        assert_eq!(session.progress(), &Progress::Complete { score: 1 });
    }

    #[test]
    fn invariants_hold_under_random_calls() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let verses = vec![
                Verse::new("A B C", 1),
                Verse::new("D E", 2),
                Verse::new("F A", 3),
            ];
            let questions = QuestionGenerator::new(RngSource(rng.clone()))
                .generate(&verses)
                .unwrap();
            let mut session = QuizSession::new(questions).unwrap();

            for _ in 0..20 {
                if rng.gen_bool(0.5) {
                    let choice = session
                        .current_question()
                        .map(|q| q.choices[rng.gen_range(0..q.choices.len())].clone())
                        .unwrap_or_else(|| "A".to_string());
                    session.submit_answer(&choice);
                } else {
                    session.advance();
                }
                assert_invariants(&session);
            }
        }
    }

    #[test]
    fn session_survives_a_serde_round_trip() {
        let mut session = two_questions();
        session.submit_answer("b");
        let json = serde_json::to_string(&session).unwrap();
        let restored: QuizSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
