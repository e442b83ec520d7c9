//! Candidate discovery: pages through a search provider and returns the de-duplicated
//! result URLs for a company.

use std::fmt;
use std::sync::Arc;

use nd_core::config::SearchConfig;
use nd_core::{dedup_urls, Error, Result, SearchProvider};
use tracing::{info, instrument, warn};

pub mod google;

pub use google::GoogleSearch;

/// URLs worth downloading, plus anything the caller should surface as a warning.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Candidates {
    pub urls: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct CandidateSearch {
    provider: Arc<dyn SearchProvider>,
    config: SearchConfig,
}

impl fmt::Debug for CandidateSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateSearch")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

pub fn news_query(company: &str) -> String {
    format!("{} news", company.trim())
}

impl CandidateSearch {
    pub fn new(provider: Arc<dyn SearchProvider>, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    /// Collects up to `max_candidates` unique URLs.
    ///
    /// A quota error stops paging and keeps what was already found. Any other
    /// failure on the first page is returned as an error; later pages only add a
    /// warning.
    #[instrument(level = "info", skip(self), fields(provider = self.provider.name()))]
    pub async fn collect(&self, company: &str) -> Result<Candidates> {
        let query = news_query(company);
        let per_page = self.config.results_per_page.max(1);
        let mut urls: Vec<String> = Vec::new();
        let mut warnings = Vec::new();
        let mut start = 1;

        while urls.len() < self.config.max_candidates {
            if start > 1 && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }

            match self.provider.search(&query, start).await {
                Ok(hits) if hits.is_empty() => break,
                Ok(hits) => {
                    let page_len = hits.len();
                    urls = dedup_urls(urls.into_iter().chain(hits.into_iter().map(|h| h.url)));
                    if page_len < per_page {
                        break;
                    }
                }
                Err(Error::QuotaExceeded(reason)) => {
                    warn!(%reason, collected = urls.len(), "Search quota exhausted");
                    warnings.push(format!("search quota exceeded: {}", reason));
                    break;
                }
                Err(e) if urls.is_empty() => return Err(e),
                Err(e) => {
                    warn!(
                        error = %e,
                        collected = urls.len(),
                        "Search paging failed; keeping partial results"
                    );
                    warnings.push(format!("search stopped early: {}", e));
                    break;
                }
            }
            start += per_page;
        }

        urls.truncate(self.config.max_candidates);
        if urls.is_empty() && warnings.is_empty() {
            let reason = Error::NoResults(query.clone()).to_string();
            warn!("{}", reason);
            warnings.push(reason);
        }
        info!("🔎 Found {} candidate URLs for {:?}", urls.len(), query);
        Ok(Candidates { urls, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nd_core::SearchHit;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned pages keyed by `start`, and records every call.
    struct PagedProvider {
        pages: Vec<Result<Vec<SearchHit>>>,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl PagedProvider {
        fn new(pages: Vec<Result<Vec<SearchHit>>>) -> Self {
            Self {
                pages,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for PagedProvider {
        fn name(&self) -> &str {
            "paged"
        }

        async fn search(&self, query: &str, start: usize) -> Result<Vec<SearchHit>> {
            self.calls.lock().unwrap().push((query.to_string(), start));
            let idx = (start - 1) / 10;
            match self.pages.get(idx) {
                Some(Ok(hits)) => Ok(hits.clone()),
                Some(Err(Error::QuotaExceeded(m))) => Err(Error::QuotaExceeded(m.clone())),
                Some(Err(e)) => Err(Error::Search(e.to_string())),
                None => Ok(vec![]),
            }
        }
    }

    fn hits(range: std::ops::Range<usize>) -> Vec<SearchHit> {
        range
            .map(|i| SearchHit {
                url: format!("https://news.test/{}", i),
                title: format!("Story {}", i),
                snippet: String::new(),
            })
            .collect()
    }

    fn config() -> SearchConfig {
        SearchConfig {
            page_delay: Duration::ZERO,
            ..SearchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_pages_until_ceiling() {
        let provider = Arc::new(PagedProvider::new(vec![
            Ok(hits(0..10)),
            Ok(hits(10..20)),
            Ok(hits(20..30)),
            Ok(hits(30..40)),
            Ok(hits(40..50)),
            Ok(hits(50..60)),
        ]));
        let search = CandidateSearch::new(provider.clone(), config());
        let found = search.collect("Tesla").await.unwrap();
        assert_eq!(found.urls.len(), 50);
        assert!(found.warnings.is_empty());

        let calls = provider.calls.lock().unwrap();
        let starts: Vec<usize> = calls.iter().map(|(_, s)| *s).collect();
        assert_eq!(starts, vec![1, 11, 21, 31, 41]);
        assert_eq!(calls[0].0, "Tesla news");
    }

    #[tokio::test]
    async fn test_short_page_stops_paging_and_dedups() {
        let mut page = hits(0..3);
        page.push(page[0].clone());
        let provider = Arc::new(PagedProvider::new(vec![Ok(page)]));
        let found = CandidateSearch::new(provider.clone(), config())
            .collect("Tesla")
            .await
            .unwrap();
        assert_eq!(
            found.urls,
            vec!["https://news.test/0", "https://news.test/1", "https://news.test/2"]
        );
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quota_keeps_partial_results() {
        let provider = Arc::new(PagedProvider::new(vec![
            Ok(hits(0..10)),
            Err(Error::QuotaExceeded("daily limit".to_string())),
        ]));
        let found = CandidateSearch::new(provider, config()).collect("Tesla").await.unwrap();
        assert_eq!(found.urls.len(), 10);
        assert_eq!(found.warnings, vec!["search quota exceeded: daily limit"]);
    }

    #[tokio::test]
    async fn test_quota_on_first_page_is_not_fatal() {
        let quota = Err(Error::QuotaExceeded("limit".to_string()));
        let provider = Arc::new(PagedProvider::new(vec![quota]));
        let found = CandidateSearch::new(provider, config()).collect("Tesla").await.unwrap();
        assert!(found.urls.is_empty());
        assert_eq!(found.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_fatal() {
        let provider = Arc::new(PagedProvider::new(vec![Err(Error::Search("500".to_string()))]));
        let err = CandidateSearch::new(provider, config()).collect("Tesla").await.unwrap_err();
        assert!(matches!(err, Error::Search(_)));
    }

    #[tokio::test]
    async fn test_no_results_is_a_warning() {
        let provider = Arc::new(PagedProvider::new(vec![]));
        let found = CandidateSearch::new(provider, config()).collect("Nobody").await.unwrap();
        assert!(found.urls.is_empty());
        assert_eq!(found.warnings, vec!["No results for query: Nobody news"]);
    }
}
