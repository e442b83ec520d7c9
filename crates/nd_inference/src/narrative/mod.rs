//! Turns a comparative report into a short Hindi narrative.
//!
//! The English template is always built from the report. The Hindi text comes from
//! the first tier that answers: hosted generation, then machine translation of the
//! template, then a fixed phrasebook verdict. Provider failures only move the
//! narrative down a tier.

use std::fmt;
use std::sync::Arc;

use nd_core::{
    ComparativeReport, NarrativeOutput, NarrativeSource, Sentiment, TextGenerator, Translator,
};
use tracing::{info, instrument, warn};

use crate::models::check_completion;
use crate::translate::phrasebook;

pub struct NarrativeGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
    translator: Option<Arc<dyn Translator>>,
    language: String,
}

impl fmt::Debug for NarrativeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrativeGenerator")
            .field("generator", &self.generator.as_ref().map(|g| g.name().to_string()))
            .field("translator", &self.translator.as_ref().map(|t| t.name().to_string()))
            .field("language", &self.language)
            .finish()
    }
}

impl NarrativeGenerator {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        translator: Option<Arc<dyn Translator>>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            translator,
            language: language.into(),
        }
    }

    #[instrument(level = "info", skip_all, fields(%company))]
    pub async fn generate(&self, company: &str, report: &ComparativeReport) -> NarrativeOutput {
        let text_english = english_template(company, report);

        if report.total() == 0 {
            return NarrativeOutput {
                text_hindi: phrasebook::hindi_no_news(company),
                text_english,
                source: NarrativeSource::Phrasebook,
                audio_path: None,
            };
        }

        if let Some(generator) = &self.generator {
            let generated = generator.generate(&generation_prompt(company, &text_english)).await;
            match generated.and_then(check_completion) {
                Ok(text) => {
                    info!(provider = generator.name(), "🧠 Narrative generated");
                    return NarrativeOutput {
                        text_hindi: text,
                        text_english,
                        source: NarrativeSource::Generated,
                        audio_path: None,
                    };
                }
                Err(e) => warn!(
                    provider = generator.name(),
                    error = %e,
                    "Generation failed; falling back to translation"
                ),
            }
        }

        if let Some(translator) = &self.translator {
            match translator.translate(&text_english, &self.language).await {
                Ok(text) => {
                    info!(provider = translator.name(), "🌐 Narrative translated");
                    return NarrativeOutput {
                        text_hindi: text,
                        text_english,
                        source: NarrativeSource::Translated,
                        audio_path: None,
                    };
                }
                Err(e) => warn!(
                    provider = translator.name(),
                    error = %e,
                    "Translation failed; using phrasebook"
                ),
            }
        }

        NarrativeOutput {
            text_hindi: phrasebook::hindi_verdict(company, report.dominant_sentiment),
            text_english,
            source: NarrativeSource::Phrasebook,
            audio_path: None,
        }
    }
}

fn overall(dominant: Option<Sentiment>) -> &'static str {
    match dominant {
        Some(Sentiment::Positive) => "mostly positive",
        Some(Sentiment::Negative) => "mostly negative",
        Some(Sentiment::Neutral) => "mostly neutral",
        None => "mixed",
    }
}

/// Plain-English synthesis of the report's counts, topics and contrasts.
pub fn english_template(company: &str, report: &ComparativeReport) -> String {
    let total = report.total();
    if total == 0 {
        return format!("No readable news articles were found about {}.", company);
    }

    let mut parts = vec![format!(
        "{} recent news articles about {} were analysed: {} positive, {} negative and {} neutral. Overall coverage is {}.",
        total,
        company,
        report.count(Sentiment::Positive),
        report.count(Sentiment::Negative),
        report.count(Sentiment::Neutral),
        overall(report.dominant_sentiment),
    )];

    if report.common_topics.is_empty() {
        parts.push("The articles did not share a common topic.".to_string());
    } else {
        let topics: Vec<&str> = report.common_topics.iter().map(String::as_str).collect();
        parts.push(format!("Common topics include {}.", topics.join(", ")));
    }

    for contrast in &report.notable_contrasts {
        parts.push(contrast.comparison.clone());
        parts.push(contrast.impact.clone());
    }

    parts.join(" ")
}

fn generation_prompt(company: &str, english: &str) -> String {
    format!(
        "You are a business news analyst. Rewrite the following sentiment analysis of recent news about {} \
         as a short spoken summary of three to four sentences in Hindi, using Devanagari script. \
         Output only the Hindi text.\n\n{}",
        company, english
    )
}
