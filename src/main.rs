mod config;
mod loader;
mod quiz;
mod source;

use std::sync::Arc;

use dotenv::dotenv;
use log::{info, warn};
use quiz::{generator::QuestionGenerator, random::RngSource, render, session::QuizSession};
use rand::{rngs::StdRng, SeedableRng};
use source::{ChapterSummary, ChapterTextSource, HttpChapterSource};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{ChatAction, ChatId, KeyboardButton, KeyboardMarkup, ParseMode},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveChapter,
    Quiz {
        chapter_name: String,
        session: QuizSession,
    },
}

type DialogueStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() -> HandlerResult {
    // A missing .env is fine, the variables may come from the environment
    let _ = dotenv();
    pretty_env_logger::init();
    log::info!("Starting surah quiz bot...");

    let config = Arc::new(config::Config::from_env());
    let bot = Bot::from_env();

    info!("Opening dialogue storage at {}", config.dialogue_db);
    let storage: DialogueStorage = SqliteStorage::open(&config.dialogue_db, Json)
        .await?
        .erase();

    let source = Arc::new(HttpChapterSource::new(
        config.chapters_url.clone(),
        config.verses_url.clone(),
    ));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveChapter].endpoint(receive_chapter))
            .branch(dptree::case![State::Quiz { chapter_name, session }].endpoint(answer_quiz)),
    )
    .dependencies(dptree::deps![storage, source, config])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const GREETING_TEXT: &str = "Assalamu alaikum! Pick a surah and I'll hide one word of every ayah. Find the missing word!";
const LOAD_FAILED_TEXT: &str = "Couldn't reach the Quran server. Send any message to try again.";
const NEXT_BUTTON: &str = "Next";
const BACK_BUTTON: &str = "Back";
const PLAY_AGAIN_BUTTON: &str = "Play again";

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    source: Arc<HttpChapterSource>,
) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    offer_chapters(&bot, &dialogue, msg.chat.id, source.as_ref()).await
}

/// Shows the chapter list, or stays on `Start` if it can't be fetched.
async fn offer_chapters(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat_id: ChatId,
    source: &HttpChapterSource,
) -> HandlerResult {
    let chapters = match source.list_chapters().await {
        Ok(chapters) if !chapters.is_empty() => chapters,
        Ok(_) => {
            warn!("Chapter list came back empty");
            bot.send_message(chat_id, LOAD_FAILED_TEXT).await?;
            dialogue.update(State::Start).await?;
            return Ok(());
        }
        Err(e) => {
            warn!("Failed to load the chapter list: {}", e);
            bot.send_message(chat_id, LOAD_FAILED_TEXT).await?;
            dialogue.update(State::Start).await?;
            return Ok(());
        }
    };

    bot.send_message(chat_id, "Which surah?")
        .reply_markup(chapter_keyboard(&chapters))
        .await?;
    dialogue.update(State::ReceiveChapter).await?;
    Ok(())
}

async fn receive_chapter(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    source: Arc<HttpChapterSource>,
    config: Arc<config::Config>,
) -> HandlerResult {
    let Some(chapter) = msg.text().and_then(parse_chapter_choice) else {
        bot.send_message(msg.chat.id, "Please pick a surah from the keyboard")
            .await?;
        return Ok(());
    };

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let mut generator = QuestionGenerator::new(RngSource(StdRng::from_entropy()))
        .with_invocation(config.invocation.clone());
    let loaded = match loader::load_chapter(source.as_ref(), chapter, &mut generator).await {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("Failed to load chapter {}: {}", chapter, e);
            bot.send_message(
                msg.chat.id,
                "Couldn't load that surah. Pick it again or choose another one.",
            )
            .await?;
            return Ok(());
        }
    };

    bot.send_message(
        msg.chat.id,
        format!(
            "{}: {} ayahs. Let's begin!",
            loaded.display_name,
            loaded.session.len()
        ),
    )
    .await?;
    send_question(&bot, msg.chat.id, &loaded.display_name, &loaded.session).await?;

    dialogue
        .update(State::Quiz {
            chapter_name: loaded.display_name,
            session: loaded.session,
        })
        .await?;
    Ok(())
}

async fn answer_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    (chapter_name, mut session): (String, QuizSession),
    msg: Message,
    source: Arc<HttpChapterSource>,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();

    if text == BACK_BUTTON || text == PLAY_AGAIN_BUTTON {
        session.restart();
        return offer_chapters(&bot, &dialogue, msg.chat.id, source.as_ref()).await;
    }

    if session.is_complete() {
        bot.send_message(msg.chat.id, render::final_text(&session))
            .reply_markup(final_keyboard())
            .await?;
        return Ok(());
    }

    let answered = session.snapshot().selected_answer.is_some();
    if !answered {
        let Some(question) = session.current_question().cloned() else {
            return Ok(());
        };
        if !question.choices.iter().any(|choice| choice == text) {
            bot.send_message(msg.chat.id, "Please pick one of the options")
                .await?;
            return Ok(());
        }
        if let Some(outcome) = session.submit_answer(text) {
            bot.send_message(msg.chat.id, render::feedback_text(&question, text, outcome))
                .parse_mode(ParseMode::Html)
                .reply_markup(next_keyboard())
                .await?;
        }
    } else if text == NEXT_BUTTON {
        session.advance();
        if session.is_complete() {
            bot.send_message(msg.chat.id, render::final_text(&session))
                .reply_markup(final_keyboard())
                .await?;
        } else {
            send_question(&bot, msg.chat.id, &chapter_name, &session).await?;
        }
    } else {
        bot.send_message(msg.chat.id, "Press \"Next\" to continue")
            .reply_markup(next_keyboard())
            .await?;
        return Ok(());
    }

    dialogue
        .update(State::Quiz {
            chapter_name,
            session,
        })
        .await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    chapter_name: &str,
    session: &QuizSession,
) -> HandlerResult {
    let (Some(text), Some(question)) = (
        render::question_text(chapter_name, session),
        session.current_question(),
    ) else {
        return Ok(());
    };

    let mut rows = question
        .choices
        .iter()
        .map(|choice| vec![KeyboardButton::new(choice.clone())])
        .collect::<Vec<_>>();
    rows.push(vec![KeyboardButton::new(BACK_BUTTON)]);

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

fn chapter_label(chapter: &ChapterSummary) -> String {
    format!("{}. {} {}", chapter.number, chapter.english_name, chapter.name)
}

/// Reads the chapter number back out of a `chapter_label` button.
fn parse_chapter_choice(text: &str) -> Option<u32> {
    let number = text.split('.').next()?.trim();
    number.parse().ok().filter(|n| *n > 0)
}

fn chapter_keyboard(chapters: &[ChapterSummary]) -> KeyboardMarkup {
    KeyboardMarkup::new(
        chapters
            .chunks(2)
            .map(|row| {
                row.iter()
                    .map(|chapter| KeyboardButton::new(chapter_label(chapter)))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>(),
    )
}

fn next_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(NEXT_BUTTON)],
        vec![KeyboardButton::new(BACK_BUTTON)],
    ])
}

fn final_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(PLAY_AGAIN_BUTTON)]])
}
