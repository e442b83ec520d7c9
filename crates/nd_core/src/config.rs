use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_TARGET_ARTICLES: usize = 10;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0.0.0 Safari/537.36";

/// Secrets read from the environment once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub search_api_key: String,
    pub search_engine_id: String,
    pub generation_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("search_api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .field("generation_api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub results_per_page: usize,
    pub max_candidates: usize,
    pub page_delay: Duration,
    pub safe_search: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            results_per_page: 10,
            max_candidates: 50,
            page_delay: Duration::from_secs(1),
            safe_search: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub max_scripts: usize,
    pub min_content_chars: usize,
    pub max_content_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_scripts: 30,
            min_content_chars: 10,
            max_content_chars: 2000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub summary_sentences: usize,
    pub summary_max_chars: usize,
    pub sentiment_threshold: f64,
    pub max_topics: usize,
    pub max_contrasts: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            summary_sentences: 2,
            summary_max_chars: 400,
            sentiment_threshold: 0.1,
            max_topics: 3,
            max_contrasts: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub enabled: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub endpoint: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub language: String,
    pub audio_dir: PathBuf,
    pub chunk_chars: usize,
    /// Most recent MP3 files kept in `audio_dir`; older ones are deleted on each write.
    pub max_audio_files: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            language: "hi".to_string(),
            audio_dir: std::env::temp_dir().join("nd_audio"),
            chunk_chars: 100,
            max_audio_files: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub search_timeout: Duration,
    pub page_timeout: Duration,
    pub provider_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(15),
            provider_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Process-wide settings, built once and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub target_articles: usize,
    pub search: SearchConfig,
    pub extract: ExtractConfig,
    pub analysis: AnalysisConfig,
    pub generation: GenerationConfig,
    pub translation: TranslationConfig,
    pub speech: SpeechConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Builds a config with default tunables, failing if any secret is missing or blank.
    pub fn new(
        search_api_key: Option<String>,
        search_engine_id: Option<String>,
        generation_api_key: Option<String>,
    ) -> Result<Self> {
        let credentials = Credentials {
            search_api_key: required("GOOGLE_API_KEY", search_api_key)?,
            search_engine_id: required("SEARCH_ENGINE_ID", search_engine_id)?,
            generation_api_key: required("GENERATION_API_KEY", generation_api_key)?,
        };
        Ok(Self {
            credentials,
            target_articles: DEFAULT_TARGET_ARTICLES,
            search: SearchConfig::default(),
            extract: ExtractConfig::default(),
            analysis: AnalysisConfig::default(),
            generation: GenerationConfig::default(),
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            http: HttpConfig::default(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_articles == 0 {
            return Err(Error::Configuration("target article count must be at least 1".to_string()));
        }
        if self.search.results_per_page == 0 || self.search.results_per_page > 10 {
            return Err(Error::Configuration(format!(
                "results per page must be between 1 and 10, got {}",
                self.search.results_per_page
            )));
        }
        if !(0.0..1.0).contains(&self.analysis.sentiment_threshold) {
            return Err(Error::Configuration(format!(
                "sentiment threshold must be in [0, 1), got {}",
                self.analysis.sentiment_threshold
            )));
        }
        if self.speech.chunk_chars == 0 {
            return Err(Error::Configuration("speech chunk size must be positive".to_string()));
        }
        if self.speech.max_audio_files == 0 {
            return Err(Error::Configuration("at least one audio file must be kept".to_string()));
        }
        Ok(())
    }
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Configuration(format!("{} is not set", name))),
    }
}
