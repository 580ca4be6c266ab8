// Error taxonomy for the analysis core.
//
// Internals use anyhow for context-rich errors. Only the outcomes a caller
// must branch on get a typed variant here: a run that produced nothing usable,
// a lookup miss, a cancellation. Per-article failures never surface as errors;
// they are recorded as `ArticleFailure` values on the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level failure of a core operation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request itself was malformed (empty company, count out of range).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Search failed or every candidate fetch failed.
    #[error("no articles could be retrieved for {company}: {reason}")]
    NoDocuments { company: String, reason: String },

    /// Documents were fetched but none survived extraction and classification.
    #[error("no usable articles for {company} ({attempted} candidates tried)")]
    AggregationImpossible { company: String, attempted: usize },

    /// The caller cancelled the run before it completed.
    #[error("analysis for {0} was cancelled")]
    Cancelled(String),

    /// No stored result (or no audio) for this company.
    #[error("no results found for {0}")]
    NotFound(String),

    /// The result store backend failed.
    #[error("result store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl AnalysisError {
    /// True for the failures that mean "this run produced no usable result".
    pub fn is_analysis_failure(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoDocuments { .. } | AnalysisError::AggregationImpossible { .. }
        )
    }
}

/// Speech synthesis failed; the text narration is still valid.
#[derive(Debug, Clone, Error)]
#[error("speech synthesis failed: {0}")]
pub struct SynthesisError(pub String);

/// Which per-article stage dropped an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Fetch,
    Extraction,
    Classification,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Fetch => "fetch",
            FailureStage::Extraction => "extraction",
            FailureStage::Classification => "classification",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One article that was dropped from a run, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleFailure {
    pub url: String,
    pub stage: FailureStage,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_failure_classification() {
        let none = AnalysisError::NoDocuments {
            company: "Acme".to_string(),
            reason: "search returned nothing".to_string(),
        };
        let empty = AnalysisError::AggregationImpossible {
            company: "Acme".to_string(),
            attempted: 4,
        };
        assert!(none.is_analysis_failure());
        assert!(empty.is_analysis_failure());
        assert!(!AnalysisError::NotFound("Acme".to_string()).is_analysis_failure());
        assert!(!AnalysisError::Cancelled("Acme".to_string()).is_analysis_failure());
    }

    #[test]
    fn test_failure_stage_serializes_snake_case() {
        let json = serde_json::to_string(&FailureStage::Classification).unwrap();
        assert_eq!(json, "\"classification\"");
    }
}
