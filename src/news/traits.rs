// News source trait: the network boundary of the fetch stage.
//
// The pipeline only needs two things from the outside world: a ranked list
// of candidate URLs for a company, and the raw HTML behind each URL. Tests
// substitute an in-memory source; production uses GoogleNewsSource.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Return up to `limit` candidate article URLs for a company, best first.
    async fn search(&self, company: &str, limit: usize) -> Result<Vec<String>>;

    /// Download a single page. One attempt, no retry.
    async fn fetch_html(&self, url: &str) -> Result<String>;
}
