// Topic extractor trait: swap-ready abstraction.
//
// The default implementation is plain keyword frequency with stopword
// removal; anything that turns article text into a short ranked keyword
// list can stand in for it.

use serde::{Deserialize, Serialize};

/// Trait for deriving representative keywords from one article's text.
pub trait TopicExtractor: Send + Sync {
    /// Ranked keywords, most representative first. Never more than the
    /// extractor's configured K.
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Keywords for one surviving article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSet {
    /// URL of the article these topics were extracted from
    pub article_url: String,
    /// Keywords in descending frequency order
    pub keywords: Vec<String>,
}
