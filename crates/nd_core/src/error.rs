use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("No results for query: {0}")]
    NoResults(String),

    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Parse error for {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("Page {url} needs client-side scripting ({scripts} script tags)")]
    ScriptHeavy { url: String, scripts: usize },

    #[error("Search error: {0}")]
    Search(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Error::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(url: &str, reason: impl ToString) -> Self {
        Error::Parse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Per-article failures that the pipeline skips instead of aborting on.
    pub fn is_article_local(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. } | Error::Parse { .. } | Error::ScriptHeavy { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
