use teloxide::utils::html::escape;

use crate::quiz::session::{AnswerOutcome, QuizSession};
use crate::quiz::Question;

const BLANK: &str = "_____";

/// The verse with its hidden word blanked out, or revealed once answered.
pub fn masked_verse(question: &Question, reveal: Option<AnswerOutcome>) -> String {
    question
        .words()
        .enumerate()
        .map(|(i, word)| {
            if i != question.hidden_word_index {
                return escape(word);
            }
            match reveal {
                None => BLANK.to_string(),
                Some(AnswerOutcome::Correct) => format!("✅<b><u>{}</u></b>", escape(word)),
                Some(AnswerOutcome::Incorrect) => format!("❌<b><u>{}</u></b>", escape(word)),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn question_text(chapter_name: &str, session: &QuizSession) -> Option<String> {
    let question = session.current_question()?;
    let snapshot = session.snapshot();
    Some(format!(
        "<b>{}</b>\nScore: {}/{}\n\n{}\n\n<i>Verse {}</i>",
        escape(chapter_name),
        snapshot.score,
        session.len(),
        masked_verse(question, None),
        question.verse_ordinal
    ))
}

pub fn feedback_text(question: &Question, selected: &str, outcome: AnswerOutcome) -> String {
    let verdict = match outcome {
        AnswerOutcome::Correct => "Correct!".to_string(),
        AnswerOutcome::Incorrect => format!(
            "Wrong! You chose <b>{}</b>, the missing word is <b>{}</b>",
            escape(selected),
            escape(&question.correct_word)
        ),
    };
    format!("{}\n\n{}", verdict, masked_verse(question, Some(outcome)))
}

pub fn final_text(session: &QuizSession) -> String {
    format!(
        "Quiz complete!\nFinal score: {}/{}",
        session.snapshot().score,
        session.len()
    )
}
