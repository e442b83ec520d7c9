use std::fmt;

use async_trait::async_trait;
use nd_core::config::ExtractConfig;
use nd_core::{truncate_chars, Config, Error, ExtractedPage, PageFetcher, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Elements whose text never counts as article content.
const IGNORED_TAGS: &[&str] = &[
    "script", "style", "noscript", "meta", "link", "nav", "footer", "header", "aside", "form",
];

/// Plain HTTP downloader with a browser-like user agent.
pub struct HttpPageFetcher {
    client: Client,
}

impl fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPageFetcher").finish()
    }
}

impl HttpPageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.page_timeout)
            .user_agent(config.http.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("server returned {}", status)));
        }
        response.text().await.map_err(|e| Error::fetch(url, e))
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse {
        url: String::new(),
        reason: format!("invalid selector {:?}: {}", css, e),
    })
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_ignored(name: &str) -> bool {
    IGNORED_TAGS.contains(&name)
}

/// Text under `element`, skipping anything nested in an ignored tag.
fn visible_text(element: ElementRef) -> String {
    if is_ignored(element.value().name()) {
        return String::new();
    }
    let mut pieces = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| is_ignored(e.name()));
        if !hidden {
            pieces.push(text.trim());
        }
    }
    collapse(&pieces.join(" "))
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .map(|el| collapse(&el.text().collect::<String>()))
        .find(|t| !t.is_empty()))
}

/// Title from the last path segment: `.../tesla-sales-rise` becomes `tesla sales rise`.
pub fn title_from_url(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
        })
        .unwrap_or_else(|| {
            url.trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(url)
                .to_string()
        });
    let title = collapse(&segment.replace('-', " "));
    if title.is_empty() {
        url.to_string()
    } else {
        title
    }
}

fn extract_title(document: &Html, url: &str) -> Result<String> {
    if let Some(title) = first_text(document, "title")? {
        return Ok(title);
    }
    let og = selector("meta[property='og:title']")?;
    if let Some(title) = document
        .select(&og)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse)
        .find(|t| !t.is_empty())
    {
        return Ok(title);
    }
    if let Some(title) = first_text(document, "h1")? {
        return Ok(title);
    }
    Ok(title_from_url(url))
}

fn extract_content(document: &Html) -> Result<String> {
    let articles = selector("article")?;
    if let Some(best) = document
        .select(&articles)
        .map(visible_text)
        .max_by_key(|t| t.chars().count())
        .filter(|t| !t.is_empty())
    {
        return Ok(best);
    }

    let paragraphs = selector("p")?;
    let text = document
        .select(&paragraphs)
        .map(visible_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !text.is_empty() {
        return Ok(text);
    }

    let body = selector("body")?;
    Ok(document.select(&body).next().map(visible_text).unwrap_or_default())
}

/// Pulls the title and main readable text out of a page.
///
/// Pages with more `<script>` tags than `max_scripts` are rejected as needing
/// client-side rendering. Content is capped at `max_content_chars`.
pub fn extract_page(url: &str, html: &str, config: &ExtractConfig) -> Result<ExtractedPage> {
    let document = Html::parse_document(html);

    let scripts = document.select(&selector("script")?).count();
    if scripts > config.max_scripts {
        return Err(Error::ScriptHeavy {
            url: url.to_string(),
            scripts,
        });
    }

    let title = extract_title(&document, url)?;
    let content = extract_content(&document)?;
    if content.chars().count() < config.min_content_chars {
        return Err(Error::parse(url, "no extractable text"));
    }

    let raw_text = truncate_chars(&content, config.max_content_chars).to_string();
    debug!(url, chars = raw_text.chars().count(), "Extracted page");
    Ok(ExtractedPage {
        url: url.to_string(),
        title,
        raw_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html>
          <head><title> Tesla sales   rise </title><script>var x = 1;</script></head>
          <body>
            <nav>Home | Markets</nav>
            <article>
              <h1>Tesla sales rise</h1>
              <p>Tesla reported record deliveries.</p>
              <aside>Related: other stories</aside>
              <p>Investors cheered the growth.</p>
            </article>
            <footer>Copyright</footer>
          </body>
        </html>"#;

    #[test]
    fn test_extracts_article_block() {
        let page =
            extract_page("https://news.test/tesla", ARTICLE, &ExtractConfig::default()).unwrap();
        assert_eq!(page.title, "Tesla sales rise");
        assert_eq!(
            page.raw_text,
            "Tesla sales rise Tesla reported record deliveries. Investors cheered the growth."
        );
    }

    #[test]
    fn test_falls_back_to_paragraphs() {
        let html = "<html><body><div><p>First paragraph here.</p><footer><p>Ignore me</p></footer><p>Second one.</p></div></body></html>";
        let page = extract_page("https://news.test/x", html, &ExtractConfig::default()).unwrap();
        assert_eq!(page.raw_text, "First paragraph here. Second one.");
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = "<html><body><div>Plain body text without paragraphs.</div><script>ignored()</script></body></html>";
        let page = extract_page("https://news.test/x", html, &ExtractConfig::default()).unwrap();
        assert_eq!(page.raw_text, "Plain body text without paragraphs.");
    }

    #[test]
    fn test_title_fallbacks() {
        let html = r#"<html><head><meta property="og:title" content="OG Title"></head><body><h1>Heading</h1><p>Some real text.</p></body></html>"#;
        let page = extract_page("https://news.test/x", html, &ExtractConfig::default()).unwrap();
        assert_eq!(page.title, "OG Title");

        let html = "<html><body><h1>Heading</h1><p>Some real text.</p></body></html>";
        let page = extract_page("https://news.test/x", html, &ExtractConfig::default()).unwrap();
        assert_eq!(page.title, "Heading");

        let html = "<html><body><p>Some real text.</p></body></html>";
        let page = extract_page(
            "https://news.test/2024/tesla-sales-rise/",
            html,
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(page.title, "tesla sales rise");
    }

    #[test]
    fn test_script_heavy_page_is_rejected() {
        let scripts = "<script>x()</script>".repeat(31);
        let html = format!(
            "<html><head>{}</head><body><p>Lots of text here.</p></body></html>",
            scripts
        );
        let err =
            extract_page("https://news.test/spa", &html, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ScriptHeavy { scripts: 31, .. }));
        assert!(err.is_article_local());

        let html = format!(
            "<html><head>{}</head><body><p>Lots of text here.</p></body></html>",
            "<script>x()</script>".repeat(30)
        );
        assert!(extract_page("https://news.test/ok", &html, &ExtractConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_page_is_parse_error() {
        let html = "<html><body><nav>menu</nav></body></html>";
        let err =
            extract_page("https://news.test/empty", html, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_content_is_truncated() {
        let body = "word ".repeat(1000);
        let html = format!("<html><body><p>{}</p></body></html>", body);
        let page =
            extract_page("https://news.test/long", &html, &ExtractConfig::default()).unwrap();
        assert_eq!(page.raw_text.chars().count(), 2000);
    }
}
