// Stored analysis results.
//
// These types flow from the pipeline into the store and back out to the
// terminal and HTTP layers, so they live apart from any backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comparison::ComparativeSummary;
use crate::error::ArticleFailure;
use crate::narration::{AudioOutcome, Narration};
use crate::news::Article;
use crate::sentiment::SentimentResult;
use crate::topics::TopicSet;

/// Store key for a company: trimmed and lower-cased, so "Tesla " and
/// "tesla" land on the same entry.
pub fn company_key(company: &str) -> String {
    company.trim().to_lowercase()
}

/// One surviving article with everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub article: Article,
    pub sentiment: SentimentResult,
    pub topics: TopicSet,
}

/// Latest analysis for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Display name as given in the request (trimmed)
    pub company: String,
    pub requested_count: usize,
    pub articles: Vec<ArticleAnalysis>,
    pub summary: ComparativeSummary,
    pub narration: Narration,
    pub audio: AudioOutcome,
    /// Articles dropped along the way, with the stage that dropped them
    pub failures: Vec<ArticleFailure>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn key(&self) -> String {
        company_key(&self.company)
    }

    pub fn articles_analyzed(&self) -> usize {
        self.articles.len()
    }

    /// Fewer articles survived than were asked for.
    pub fn is_partial(&self) -> bool {
        self.articles_analyzed() < self.requested_count
    }
}

/// Listing row for a stored company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEntry {
    pub company: String,
    pub articles_analyzed: usize,
    pub has_audio: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl From<&AnalysisResult> for CompanyEntry {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            company: result.company.clone(),
            articles_analyzed: result.articles_analyzed(),
            has_audio: result.audio.bytes().is_some(),
            analyzed_at: result.analyzed_at,
        }
    }
}
