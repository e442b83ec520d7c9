use std::path::PathBuf;

use async_trait::async_trait;

use crate::types::SearchHit;
use crate::Result;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns one page of hits for `query`, starting at the 1-based result index `start`
    async fn search(&self, query: &str, start: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Downloads the raw markup served at `url`
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait Scorer: Send + Sync {
    fn name(&self) -> &str;

    /// Compound polarity of `text` in [-1, 1]
    fn polarity(&self, text: &str) -> f64;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    /// Translates English `text` into the language with ISO code `target`
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Speaks `text` in language `lang` and returns the path of the written audio file
    async fn synthesize(&self, text: &str, lang: &str) -> Result<PathBuf>;
}
