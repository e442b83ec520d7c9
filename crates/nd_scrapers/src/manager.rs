use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use nd_core::config::ExtractConfig;
use nd_core::{
    Article, Config, DigestReport, Error, ExtractedPage, PageFetcher, Result, Scorer,
    SearchProvider, Synthesizer, TextGenerator, Translator,
};
use nd_inference::{
    create_generator, create_synthesizer, create_translator, ArticleAnalyzer, ComparativeAnalyzer,
    NarrativeGenerator, VaderScorer,
};
use tracing::{info, instrument, warn};

use crate::extract::{extract_page, HttpPageFetcher};
use crate::search::{CandidateSearch, GoogleSearch};

/// The external capabilities a [`ReportManager`] runs on.
pub struct Providers {
    pub search: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub scorer: Arc<dyn Scorer>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub translator: Option<Arc<dyn Translator>>,
    pub synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl Providers {
    /// Real network-backed providers for `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            search: Arc::new(GoogleSearch::new(config)?),
            fetcher: Arc::new(HttpPageFetcher::new(config)?),
            scorer: Arc::new(VaderScorer::new()),
            generator: create_generator(config)?,
            translator: Some(create_translator(config)?),
            synthesizer: Some(create_synthesizer(config)?),
        })
    }
}

/// Runs the whole digest for one company: search, download, analyze, compare,
/// narrate and speak.
pub struct ReportManager {
    search: CandidateSearch,
    fetcher: Arc<dyn PageFetcher>,
    analyzer: ArticleAnalyzer,
    comparative: ComparativeAnalyzer,
    narrator: NarrativeGenerator,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    extract: ExtractConfig,
    target_articles: usize,
    language: String,
}

impl fmt::Debug for ReportManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportManager")
            .field("search", &self.search)
            .field("analyzer", &self.analyzer)
            .field("narrator", &self.narrator)
            .field("synthesizer", &self.synthesizer.as_ref().map(|s| s.name().to_string()))
            .field("target_articles", &self.target_articles)
            .finish()
    }
}

impl ReportManager {
    pub fn new(config: &Config, providers: Providers) -> Self {
        Self {
            search: CandidateSearch::new(providers.search, config.search.clone()),
            fetcher: providers.fetcher,
            analyzer: ArticleAnalyzer::new(providers.scorer, config.analysis.clone()),
            comparative: ComparativeAnalyzer::new(config.analysis.max_contrasts),
            narrator: NarrativeGenerator::new(
                providers.generator,
                providers.translator,
                config.speech.language.clone(),
            ),
            synthesizer: providers.synthesizer,
            extract: config.extract.clone(),
            target_articles: config.target_articles,
            language: config.speech.language.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config, Providers::from_config(config)?))
    }

    /// Downloads and extracts one page without analyzing it.
    pub async fn extract_url(&self, url: &str) -> Result<ExtractedPage> {
        let html = self.fetcher.fetch(url).await?;
        extract_page(url, &html, &self.extract)
    }

    pub async fn candidates(&self, company: &str) -> Result<Vec<String>> {
        Ok(self.search.collect(company).await?.urls)
    }

    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, company: &str) -> Result<DigestReport> {
        let company = company.trim();
        if company.is_empty() {
            return Err(Error::InvalidInput("company name must not be empty".to_string()));
        }

        info!("🦗 Building digest for {}", company);
        let candidates = self.search.collect(company).await?;
        let mut warnings = candidates.warnings;

        let articles = self.gather(&candidates.urls).await?;
        if !candidates.urls.is_empty() && articles.len() < self.target_articles {
            warnings.push(format!(
                "only {} of {} requested articles could be extracted",
                articles.len(),
                self.target_articles
            ));
        }

        let comparative_report = self.comparative.analyze(&articles);
        info!(
            "📊 Compared {} articles, {} notable contrasts",
            articles.len(),
            comparative_report.notable_contrasts.len()
        );

        let mut narrative = self.narrator.generate(company, &comparative_report).await;
        if let Some(synthesizer) = &self.synthesizer {
            match synthesizer.synthesize(&narrative.text_hindi, &self.language).await {
                Ok(path) => narrative.audio_path = Some(path.to_string_lossy().into_owned()),
                Err(e) => {
                    warn!(error = %e, "Speech synthesis failed; returning text only");
                    warnings.push(format!("audio unavailable: {}", e));
                }
            }
        }

        info!("✅ Digest for {} ready", company);
        Ok(DigestReport {
            company: company.to_string(),
            generated_at: Utc::now(),
            articles,
            comparative_report,
            narrative,
            warnings,
        })
    }

    /// Walks candidates in order until `target_articles` pages were analyzed.
    async fn gather(&self, urls: &[String]) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        for url in urls {
            if articles.len() >= self.target_articles {
                break;
            }
            match self.extract_url(url).await {
                Ok(page) => {
                    let article = self.analyzer.analyze(page);
                    info!(
                        "📰 [{}] {} ({})",
                        articles.len() + 1,
                        article.title,
                        article.sentiment
                    );
                    articles.push(article);
                }
                Err(e) if e.is_article_local() => warn!(%url, error = %e, "Skipping article"),
                Err(e) => return Err(e),
            }
        }
        Ok(articles)
    }
}
