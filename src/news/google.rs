// Google News search + plain HTTP page download.
//
// Search uses the news vertical of the regular results page (tbm=nws) and
// parses result links out of the HTML. Pages are fetched with browser-like
// headers because many publishers reject obvious bots outright.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, info};

use super::search::parse_search_results;
use super::traits::NewsSource;

/// Default search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Live news source backed by Google News search results.
pub struct GoogleNewsSource {
    client: Client,
    search_url: String,
}

impl GoogleNewsSource {
    /// Build a source with the given search endpoint and per-request timeout.
    pub fn new(search_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            search_url: search_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("{url} returned {}", response.status());
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {url}"))
    }
}

#[async_trait]
impl NewsSource for GoogleNewsSource {
    async fn search(&self, company: &str, limit: usize) -> Result<Vec<String>> {
        let query = format!("{company} news");
        debug!(company, limit, "News search request");

        let html = self
            .get_text(&self.search_url, &[("q", query.as_str()), ("tbm", "nws")])
            .await
            .with_context(|| format!("News search for {company} failed"))?;

        let urls = parse_search_results(&html, limit);
        info!(company, found = urls.len(), "Found candidate news articles");
        Ok(urls)
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        debug!(url, "Fetching article page");
        self.get_text(url, &[]).await
    }
}
