use std::future::Future;

use log::debug;
use reqwest::{Client, StatusCode};

use crate::quiz::Verse;

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(StatusCode),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChapterSummary {
    pub number: u32,
    pub name: String,
    #[serde(rename = "englishName")]
    pub english_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterText {
    pub display_name: String,
    pub verses: Vec<Verse>,
}

/// Where chapter lists and chapter verses come from.
pub trait ChapterTextSource {
    fn list_chapters(
        &self,
    ) -> impl Future<Output = Result<Vec<ChapterSummary>, DataSourceError>> + Send;

    fn get_verses(
        &self,
        chapter: u32,
    ) -> impl Future<Output = Result<ChapterText, DataSourceError>> + Send;
}

#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(serde::Deserialize)]
struct ChapterPayload {
    name: String,
    ayahs: Vec<AyahPayload>,
}

#[derive(serde::Deserialize)]
struct AyahPayload {
    text: String,
    #[serde(rename = "numberInSurah")]
    number_in_surah: u32,
}

pub fn parse_chapter_list(body: &str) -> Result<Vec<ChapterSummary>, DataSourceError> {
    let envelope: Envelope<Vec<ChapterSummary>> = serde_json::from_str(body)?;
    Ok(envelope.data)
}

pub fn parse_chapter_text(body: &str) -> Result<ChapterText, DataSourceError> {
    let envelope: Envelope<ChapterPayload> = serde_json::from_str(body)?;
    Ok(ChapterText {
        display_name: envelope.data.name,
        verses: envelope
            .data
            .ayahs
            .into_iter()
            .map(|ayah| Verse::new(ayah.text, ayah.number_in_surah))
            .collect(),
    })
}

/// Reads chapters from the JSON proxies the quiz was first built against.
pub struct HttpChapterSource {
    client: Client,
    chapters_url: String,
    verses_url: String,
}

impl HttpChapterSource {
    pub fn new(chapters_url: impl Into<String>, verses_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            chapters_url: chapters_url.into(),
            verses_url: verses_url.into(),
        }
    }

    fn verses_url_for(&self, chapter: u32) -> String {
        format!("{}/?number={}", self.verses_url.trim_end_matches('/'), chapter)
    }

    async fn fetch(&self, url: &str) -> Result<String, DataSourceError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::Status(status));
        }
        Ok(response.text().await?)
    }
}

impl ChapterTextSource for HttpChapterSource {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, DataSourceError> {
        let body = self.fetch(&self.chapters_url).await?;
        parse_chapter_list(&body)
    }

    async fn get_verses(&self, chapter: u32) -> Result<ChapterText, DataSourceError> {
        let body = self.fetch(&self.verses_url_for(chapter)).await?;
        parse_chapter_text(&body)
    }
}
