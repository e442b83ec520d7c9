use std::fmt;

use async_trait::async_trait;
use nd_core::config::SearchConfig;
use nd_core::{Config, Error, Result, SearchHit, SearchProvider};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorReason>,
}

#[derive(Deserialize)]
struct ErrorReason {
    #[serde(default)]
    reason: String,
}

/// Google Custom Search JSON API client.
pub struct GoogleSearch {
    client: Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
    results_per_page: usize,
    safe_search: bool,
}

impl fmt::Debug for GoogleSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleSearch")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .field("endpoint", &self.endpoint)
            .field("results_per_page", &self.results_per_page)
            .finish()
    }
}

impl GoogleSearch {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.search_timeout)
            .user_agent(config.http.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(
            client,
            &config.credentials.search_api_key,
            &config.credentials.search_engine_id,
            &config.search,
        ))
    }

    pub fn with_client(
        client: Client,
        api_key: &str,
        engine_id: &str,
        config: &SearchConfig,
    ) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            endpoint: config.endpoint.clone(),
            results_per_page: config.results_per_page,
            safe_search: config.safe_search,
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &str {
        "google-cse"
    }

    async fn search(&self, query: &str, start: usize) -> Result<Vec<SearchHit>> {
        let num = self.results_per_page.to_string();
        let start_param = start.to_string();
        let mut params = vec![
            ("key", self.api_key.as_str()),
            ("cx", self.engine_id.as_str()),
            ("q", query),
            ("num", num.as_str()),
            ("start", start_param.as_str()),
        ];
        if self.safe_search {
            params.push(("safe", "active"));
        }

        debug!(query, start, "Querying search provider");
        let response = self.client.get(&self.endpoint).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }
        parse_hits(&body)
    }
}

fn parse_hits(body: &str) -> Result<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::Search(format!("malformed search response: {}", e)))?;
    Ok(response
        .items
        .into_iter()
        .map(|item| SearchHit {
            url: item.link,
            title: item.title,
            snippet: item.snippet,
        })
        .collect())
}

/// Maps a failed search response to an error, spotting rate and quota limits.
fn classify_failure(status: StatusCode, body: &str) -> Error {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Error::QuotaExceeded(message);
    }
    if status == StatusCode::FORBIDDEN {
        let limited = envelope
            .map(|e| {
                e.error.errors.iter().any(|r| {
                    let reason = r.reason.to_lowercase();
                    reason.contains("rate") || reason.contains("quota") || reason.contains("limit")
                })
            })
            .unwrap_or(false);
        if limited {
            return Error::QuotaExceeded(message);
        }
    }
    Error::Search(format!("{}: {}", status, message))
}
