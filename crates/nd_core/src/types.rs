use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Classifies a compound polarity score with a symmetric threshold.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Sentiment::Positive
        } else if score < -threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result link returned by the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Title and readable text pulled out of a downloaded page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub title: String,
    pub raw_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    #[serde(skip_serializing, default)]
    pub raw_text: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub score: f64,
    pub topics: Vec<String>,
}

impl Article {
    pub fn from_page(
        page: ExtractedPage,
        summary: String,
        score: f64,
        sentiment: Sentiment,
        topics: Vec<String>,
    ) -> Self {
        Self {
            url: page.url,
            title: page.title,
            raw_text: page.raw_text,
            summary,
            sentiment,
            score,
            topics,
        }
    }
}

pub type SentimentDistribution = BTreeMap<Sentiment, usize>;

pub fn empty_distribution() -> SentimentDistribution {
    Sentiment::ALL.iter().map(|s| (*s, 0)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastSide {
    pub index: usize,
    pub title: String,
    pub url: String,
    pub sentiment: Sentiment,
}

/// Two articles that cover a shared topic with different sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastPair {
    pub first: ContrastSide,
    pub second: ContrastSide,
    pub shared_topics: Vec<String>,
    pub comparison: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    pub sentiment_distribution: SentimentDistribution,
    pub common_topics: BTreeSet<String>,
    pub unique_topics: Vec<Vec<String>>,
    pub notable_contrasts: Vec<ContrastPair>,
    pub dominant_sentiment: Option<Sentiment>,
}

impl ComparativeReport {
    pub fn empty() -> Self {
        Self {
            sentiment_distribution: empty_distribution(),
            common_topics: BTreeSet::new(),
            unique_topics: Vec::new(),
            notable_contrasts: Vec::new(),
            dominant_sentiment: None,
        }
    }

    pub fn total(&self) -> usize {
        self.sentiment_distribution.values().sum()
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.sentiment_distribution.get(&sentiment).copied().unwrap_or(0)
    }
}

impl Default for ComparativeReport {
    fn default() -> Self {
        Self::empty()
    }
}

/// Which rendering path produced the Hindi narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Generated,
    Translated,
    Phrasebook,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeOutput {
    #[serde(rename = "narrative_text")]
    pub text_hindi: String,
    #[serde(rename = "narrative_english")]
    pub text_english: String,
    #[serde(rename = "narrative_source")]
    pub source: NarrativeSource,
    pub audio_path: Option<String>,
}

/// Everything one analysis request returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestReport {
    pub company: String,
    pub generated_at: DateTime<Utc>,
    pub articles: Vec<Article>,
    pub comparative_report: ComparativeReport,
    #[serde(flatten)]
    pub narrative: NarrativeOutput,
    pub warnings: Vec<String>,
}
