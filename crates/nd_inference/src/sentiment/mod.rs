use std::fmt;

use nd_core::{Scorer, Sentiment};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Lexicon scorer backed by VADER's compound score.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl fmt::Debug for VaderScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaderScorer").finish()
    }
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for VaderScorer {
    fn name(&self) -> &str {
        "vader"
    }

    fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

/// Scores `text` and maps the compound score onto a label.
pub fn classify(scorer: &dyn Scorer, text: &str, threshold: f64) -> (f64, Sentiment) {
    let score = scorer.polarity(text);
    (score, Sentiment::from_score(score, threshold))
}
