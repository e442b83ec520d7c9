use nd_core::truncate_chars;

/// Keeps the first `max_sentences` sentences of `text`, capped at `max_chars` characters.
///
/// Sentences are split on `". "`. Text with a single sentence is returned unchanged
/// (apart from the cap), and empty input yields an empty summary.
pub fn summarize(text: &str, max_sentences: usize, max_chars: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let sentences: Vec<&str> = text
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let summary = if sentences.len() > 1 {
        let joined = sentences
            .iter()
            .take(max_sentences.max(1))
            .map(|s| s.trim_end_matches('.'))
            .collect::<Vec<_>>()
            .join(". ");
        format!("{}.", joined)
    } else {
        text.to_string()
    };

    if summary.chars().count() <= max_chars {
        return summary;
    }
    if max_chars == 0 {
        return String::new();
    }
    format!("{}…", truncate_chars(&summary, max_chars - 1).trim_end())
}
