use log::info;

use crate::quiz::generator::QuestionGenerator;
use crate::quiz::random::RandomSource;
use crate::quiz::session::QuizSession;
use crate::quiz::InvalidInputError;
use crate::source::{ChapterTextSource, DataSourceError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}

pub struct LoadedChapter {
    pub display_name: String,
    pub session: QuizSession,
}

/// Fetches a chapter, builds its questions and starts a fresh session.
pub async fn load_chapter<S, R>(
    source: &S,
    chapter: u32,
    generator: &mut QuestionGenerator<R>,
) -> Result<LoadedChapter, LoadError>
where
    S: ChapterTextSource + Sync,
    R: RandomSource + Send,
{
    let text = source.get_verses(chapter).await?;
    info!(
        "Loaded chapter {} ({}) with {} verses",
        chapter,
        text.display_name,
        text.verses.len()
    );

    let questions = generator.generate(&text.verses)?;
    Ok(LoadedChapter {
        display_name: text.display_name,
        session: QuizSession::new(questions)?,
    })
}
