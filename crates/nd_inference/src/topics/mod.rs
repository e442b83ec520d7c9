use std::collections::{HashMap, HashSet};

/// Topic name and the words that signal it, in priority order.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("sales", &["sales", "revenue", "market", "growth"]),
    ("stock market", &["stock", "shares", "price", "investors"]),
    ("innovation", &["technology", "latest", "innovation"]),
    ("electric vehicles", &["electric", "vehicle"]),
    ("regulations", &["regulation", "regulatory", "policy"]),
    ("autonomous vehicles", &["autonomous", "driverless"]),
    ("finance", &["finance", "funding", "loans", "credit"]),
    ("protests", &["protest", "activist", "demonstration"]),
    ("trade", &["trade", "tariff", "export", "import"]),
];

const STOP_WORDS: &[&str] = &["company", "news", "http", "https", "content"];

const MIN_WORD_CHARS: usize = 4;

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Returns up to `max_topics` topics for `text`.
///
/// Known topics are matched on keywords first; when none match, the most frequent
/// words stand in as topics (ties go to the word seen first).
pub fn extract_topics(text: &str, max_topics: usize) -> Vec<String> {
    let words = words(text);
    let vocabulary: HashSet<&str> = words.iter().map(String::as_str).collect();

    let matched: Vec<String> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| vocabulary.contains(kw)))
        .map(|(topic, _)| topic.to_string())
        .take(max_topics)
        .collect();
    if !matched.is_empty() {
        return matched;
    }

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in words.iter().enumerate() {
        counts.entry(word.as_str()).or_insert((0, position)).0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(max_topics)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
