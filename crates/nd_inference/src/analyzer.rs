use std::fmt;
use std::sync::Arc;

use nd_core::config::AnalysisConfig;
use nd_core::{Article, ExtractedPage, Scorer};
use tracing::debug;

use crate::sentiment::classify;
use crate::summary::summarize;
use crate::topics::extract_topics;

/// Per-article stage: summary, sentiment and topics for one extracted page.
pub struct ArticleAnalyzer {
    scorer: Arc<dyn Scorer>,
    config: AnalysisConfig,
}

impl fmt::Debug for ArticleAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleAnalyzer")
            .field("scorer", &self.scorer.name())
            .field("config", &self.config)
            .finish()
    }
}

impl ArticleAnalyzer {
    pub fn new(scorer: Arc<dyn Scorer>, config: AnalysisConfig) -> Self {
        Self { scorer, config }
    }

    pub fn analyze(&self, page: ExtractedPage) -> Article {
        let summary = summarize(
            &page.raw_text,
            self.config.summary_sentences,
            self.config.summary_max_chars,
        );
        let (score, sentiment) =
            classify(self.scorer.as_ref(), &page.raw_text, self.config.sentiment_threshold);
        let topics = extract_topics(&page.raw_text, self.config.max_topics);
        debug!(url = %page.url, score, %sentiment, ?topics, "Analyzed article");
        Article::from_page(page, summary, score, sentiment, topics)
    }
}
