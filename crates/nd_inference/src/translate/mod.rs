use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nd_core::{Config, Error, Result, Translator};
use reqwest::{Client, StatusCode};
use serde_json::Value;

pub mod phrasebook;

/// Machine translation through the public Google Translate `gtx` endpoint.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GoogleTranslator {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.provider_timeout)
            .user_agent(config.http.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.translation.endpoint.clone(),
        })
    }
}

/// Joins the translated segments of a `translate_a/single` response.
fn parse_segments(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Translation("unexpected response shape".to_string()))?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(Error::Translation("empty translation".to_string()));
    }
    Ok(text.trim().to_string())
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google-translate"
    }

    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::QuotaExceeded(format!("translation provider returned {}", status)));
        }
        if !status.is_success() {
            return Err(Error::Translation(format!("provider returned {}", status)));
        }
        let body: Value = response.json().await?;
        parse_segments(&body)
    }
}

pub fn create_translator(config: &Config) -> Result<Arc<dyn Translator>> {
    Ok(Arc::new(GoogleTranslator::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_segments() {
        let body = json!([
            [["टेस्ला की खबरें। ", "Tesla news. ", null], ["अच्छी हैं।", "are good.", null]],
            null,
            "en"
        ]);
        assert_eq!(parse_segments(&body).unwrap(), "टेस्ला की खबरें। अच्छी हैं।");
    }

    #[test]
    fn test_parse_segments_rejects_bad_shapes() {
        assert!(parse_segments(&json!({"error": "nope"})).is_err());
        assert!(parse_segments(&json!([[]])).is_err());
    }
}
