use std::collections::{BTreeSet, HashMap};
use std::fmt;

use nd_core::types::empty_distribution;
use nd_core::{Article, ComparativeReport, ContrastPair, ContrastSide, Sentiment};

pub struct ComparativeAnalyzer {
    max_contrasts: usize,
}

impl fmt::Debug for ComparativeAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparativeAnalyzer")
            .field("max_contrasts", &self.max_contrasts)
            .finish()
    }
}

impl ComparativeAnalyzer {
    pub fn new(max_contrasts: usize) -> Self {
        Self { max_contrasts }
    }

    pub fn analyze(&self, articles: &[Article]) -> ComparativeReport {
        let mut distribution = empty_distribution();
        for article in articles {
            *distribution.entry(article.sentiment).or_insert(0) += 1;
        }

        let topic_sets: Vec<BTreeSet<&str>> = articles
            .iter()
            .map(|a| a.topics.iter().map(String::as_str).collect())
            .collect();

        let mut topic_counts: HashMap<&str, usize> = HashMap::new();
        for topics in &topic_sets {
            for topic in topics {
                *topic_counts.entry(*topic).or_insert(0) += 1;
            }
        }
        let common_topics: BTreeSet<String> = topic_counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(topic, _)| topic.to_string())
            .collect();

        let unique_topics: Vec<Vec<String>> = articles
            .iter()
            .map(|a| {
                a.topics
                    .iter()
                    .filter(|t| !common_topics.contains(*t))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();

        let notable_contrasts = self.contrasts(articles, &topic_sets);
        let dominant_sentiment = dominant(&distribution);

        ComparativeReport {
            sentiment_distribution: distribution,
            common_topics,
            unique_topics,
            notable_contrasts,
            dominant_sentiment,
        }
    }

    fn contrasts(&self, articles: &[Article], topic_sets: &[BTreeSet<&str>]) -> Vec<ContrastPair> {
        let mut pairs = Vec::new();
        for i in 0..articles.len() {
            for j in (i + 1)..articles.len() {
                if pairs.len() >= self.max_contrasts {
                    return pairs;
                }
                let (a, b) = (&articles[i], &articles[j]);
                if a.sentiment == b.sentiment {
                    continue;
                }
                let shared: Vec<String> = topic_sets[i]
                    .intersection(&topic_sets[j])
                    .map(|t| t.to_string())
                    .collect();
                if shared.is_empty() {
                    continue;
                }
                pairs.push(ContrastPair {
                    comparison: comparison_sentence(i, a, j, b),
                    impact: impact_sentence(a, b, &shared[0]),
                    first: side(i, a),
                    second: side(j, b),
                    shared_topics: shared,
                });
            }
        }
        pairs
    }
}

/// The label with a strict plurality, if any.
pub fn dominant(distribution: &nd_core::SentimentDistribution) -> Option<Sentiment> {
    let (best, best_count) = distribution.iter().max_by_key(|(_, count)| **count)?;
    if *best_count == 0 {
        return None;
    }
    let tied = distribution.values().filter(|c| *c == best_count).count();
    (tied == 1).then_some(*best)
}

fn side(index: usize, article: &Article) -> ContrastSide {
    ContrastSide {
        index,
        title: article.title.clone(),
        url: article.url.clone(),
        sentiment: article.sentiment,
    }
}

fn topic_list(article: &Article) -> String {
    if article.topics.is_empty() {
        "general coverage".to_string()
    } else {
        article.topics.join(", ")
    }
}

fn comparison_sentence(i: usize, a: &Article, j: usize, b: &Article) -> String {
    format!(
        "Article {} highlights {} aspects like {}, while Article {} discusses {} issues around {}.",
        i + 1,
        a.sentiment.as_str().to_lowercase(),
        topic_list(a),
        j + 1,
        b.sentiment.as_str().to_lowercase(),
        topic_list(b),
    )
}

fn stance(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "boosts confidence",
        Sentiment::Negative => "raises concerns",
        Sentiment::Neutral => "stays neutral",
    }
}

fn impact_sentence(a: &Article, b: &Article, shared_topic: &str) -> String {
    format!(
        "On {}, the first article {} while the second {}.",
        shared_topic,
        stance(a.sentiment),
        stance(b.sentiment),
    )
}
