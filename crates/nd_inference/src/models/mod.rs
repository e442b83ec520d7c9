use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nd_core::config::GenerationConfig;
use nd_core::{Config, Error, Result, TextGenerator};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatModel {
    pub fn new(api_key: &str, config: &GenerationConfig, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Configuration("generation API key is required".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

impl fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for ChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.4,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::QuotaExceeded(format!("generation provider returned {}", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("provider returned {}: {}", status, body.trim())));
        }

        let response = response.json::<ChatResponse>().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        let content = check_completion(content)?;
        debug!(chars = content.chars().count(), "Generated completion");
        Ok(content)
    }
}

/// Accepts a completion only if it is non-empty and written at least partly in Devanagari.
pub fn check_completion(content: String) -> Result<String> {
    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(Error::Generation("provider returned an empty completion".to_string()));
    }
    if !content.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
        return Err(Error::Generation("completion contains no Devanagari text".to_string()));
    }
    Ok(content)
}

/// Builds the hosted generator, or `None` when generation is switched off.
pub fn create_generator(config: &Config) -> Result<Option<Arc<dyn TextGenerator>>> {
    if !config.generation.enabled {
        return Ok(None);
    }
    let model = ChatModel::new(
        &config.credentials.generation_api_key,
        &config.generation,
        config.http.provider_timeout,
    )?;
    Ok(Some(Arc::new(model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_requires_api_key() {
        let config = GenerationConfig::default();
        let result = ChatModel::new("", &config, Duration::from_secs(5));
        assert!(matches!(result, Err(Error::Configuration(_))));

        let result = ChatModel::new("test-key", &config, Duration::from_secs(5));
        assert!(result.is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GenerationConfig::default();
        let model = ChatModel::new("test-key", &config, Duration::from_secs(5)).unwrap();
        let debug = format!("{:?}", model);
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("deepseek-chat"));
    }

    #[test]
    fn test_create_generator_respects_switch() {
        let mut config =
            Config::new(Some("k".into()), Some("cx".into()), Some("g".into())).unwrap();
        assert!(create_generator(&config).unwrap().is_some());
        config.generation.enabled = false;
        assert!(create_generator(&config).unwrap().is_none());
    }

    #[test]
    fn test_completion_must_be_hindi() {
        assert_eq!(
            check_completion("  टेस्ला की खबरें अच्छी हैं।\n".to_string()).unwrap(),
            "टेस्ला की खबरें अच्छी हैं।"
        );
        assert_eq!(
            check_completion("Tesla (टेस्ला) बढ़ा".to_string()).unwrap(),
            "Tesla (टेस्ला) बढ़ा"
        );

        let err = check_completion("I'm sorry, I can't help with that.".to_string()).unwrap_err();
        assert!(matches!(err, Error::Generation(ref msg) if msg.contains("Devanagari")));
        assert!(matches!(check_completion("   ".to_string()), Err(Error::Generation(_))));
    }

    #[test]
    fn test_chat_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  नमस्ते  "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.trim(), "नमस्ते");
    }
}
