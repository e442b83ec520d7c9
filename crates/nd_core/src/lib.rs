pub mod config;
pub mod error;
pub mod models;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{PageFetcher, Scorer, SearchProvider, Synthesizer, TextGenerator, Translator};
pub use types::{
    Article, ComparativeReport, ContrastPair, ContrastSide, DigestReport, ExtractedPage,
    NarrativeOutput, NarrativeSource, SearchHit, Sentiment, SentimentDistribution,
};

/// Keeps the first occurrence of each URL, comparing without fragment or trailing slash.
pub fn dedup_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    urls.into_iter()
        .filter(|u| seen.insert(url_key(u)))
        .collect()
}

pub fn url_key(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => raw.trim().trim_end_matches('/').to_string(),
    }
}

/// Cuts `s` to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub mod prelude {
    pub use crate::{Article, Config, Error, Result, Sentiment};
}
