use crate::quiz::generator::INVOCATION;

const DEFAULT_CHAPTERS_URL: &str = "https://quran-proxy.zuha.dev";
const DEFAULT_VERSES_URL: &str = "https://surah-proxy.zuha.dev";
const DEFAULT_DIALOGUE_DB: &str = "db.sqlite";

/// Settings read from the environment (and `.env`). The bot token itself is
/// read by teloxide from `TELOXIDE_TOKEN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub chapters_url: String,
    pub verses_url: String,
    pub dialogue_db: String,
    pub invocation: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            chapters_url: read("QUIZ_CHAPTERS_URL", DEFAULT_CHAPTERS_URL),
            verses_url: read("QUIZ_VERSES_URL", DEFAULT_VERSES_URL),
            dialogue_db: read("QUIZ_DIALOGUE_DB", DEFAULT_DIALOGUE_DB),
            invocation: read("QUIZ_INVOCATION", INVOCATION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.chapters_url, DEFAULT_CHAPTERS_URL);
        assert_eq!(config.verses_url, DEFAULT_VERSES_URL);
        assert_eq!(config.dialogue_db, "db.sqlite");
        assert_eq!(config.invocation, INVOCATION);
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = HashMap::from([
            ("QUIZ_VERSES_URL", "http://localhost:8080"),
            ("QUIZ_DIALOGUE_DB", "   "),
        ]);
        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.verses_url, "http://localhost:8080");
        // blank values fall back
        assert_eq!(config.dialogue_db, DEFAULT_DIALOGUE_DB);
    }
}
