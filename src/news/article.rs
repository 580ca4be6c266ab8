// Article: one fetched-and-extracted news document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article that survived extraction. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Whitespace-collapsed plain-text body
    pub body: String,
    /// First few sentences of the body, for display
    pub summary: String,
    /// Publisher host, e.g. "reuters.com"
    pub source: String,
    /// Publication date as printed by the page, when one was found
    pub published: Option<String>,
    pub retrieved_at: DateTime<Utc>,
}
