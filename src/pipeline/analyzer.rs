// The Analyzer: one company in, one AnalysisResult out.
//
// Flow:
// 1. Search for 2 x count candidate URLs (some will fail)
// 2. Run per-article units (fetch -> extract -> classify -> topics) through
//    an ordered buffer of `concurrency` workers, stopping once `count`
//    articles have survived
// 3. Aggregate the survivors (barrier: only after collection ends)
// 4. Narrate and synthesize audio
// 5. Save to the injected store
//
// Per-article failures are logged and recorded on the result. Only "nothing
// usable at all" surfaces as an error.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::comparison::aggregate;
use crate::db::{AnalysisResult, ArticleAnalysis, ResultStore};
use crate::error::{AnalysisError, ArticleFailure, FailureStage};
use crate::narration::Narrator;
use crate::news::extract::extract_article;
use crate::news::NewsSource;
use crate::sentiment::traits::truncate_input;
use crate::sentiment::{SentimentClassifier, SentimentResult};
use crate::topics::{TopicExtractor, TopicSet};

use super::cancel::CancelToken;

/// Largest article count a single request may ask for.
pub const MAX_ARTICLES: usize = 15;
/// Article count used when the caller doesn't give one.
pub const DEFAULT_ARTICLES: usize = 10;
/// Candidates searched per requested article.
const OVERFETCH_FACTOR: usize = 2;

/// Tuning for a run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Per-article units in flight at once
    pub concurrency: usize,
    /// Wall-clock cap on the per-article stage
    pub deadline: Duration,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            deadline: Duration::from_secs(120),
        }
    }
}

enum UnitOutcome {
    Survived(Box<ArticleAnalysis>),
    Failed(ArticleFailure),
}

/// Core interface: analyze, get_result, get_audio, list_companies.
pub struct Analyzer {
    source: Arc<dyn NewsSource>,
    classifier: Arc<dyn SentimentClassifier>,
    topics: Arc<dyn TopicExtractor>,
    narrator: Narrator,
    store: Arc<dyn ResultStore>,
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(
        source: Arc<dyn NewsSource>,
        classifier: Arc<dyn SentimentClassifier>,
        topics: Arc<dyn TopicExtractor>,
        narrator: Narrator,
        store: Arc<dyn ResultStore>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            source,
            classifier,
            topics,
            narrator,
            store,
            options,
        }
    }

    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    /// Run a full analysis and store the result.
    pub async fn analyze(
        &self,
        company: &str,
        count: usize,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_cancel(company, count, &CancelToken::new())
            .await
    }

    /// Like `analyze`, but stops starting new articles once `cancel` fires.
    /// Articles already in flight finish; nothing is stored.
    pub async fn analyze_with_cancel(
        &self,
        company: &str,
        count: usize,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let company = validate_request(company, count)?;
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled(company));
        }

        info!(
            company = %company,
            count,
            language = %self.narrator.language(),
            "Starting analysis"
        );

        let candidates = self
            .source
            .search(&company, count * OVERFETCH_FACTOR)
            .await
            .map_err(|e| AnalysisError::NoDocuments {
                company: company.clone(),
                reason: format!("news search failed: {e:#}"),
            })?;
        if candidates.is_empty() {
            return Err(AnalysisError::NoDocuments {
                company,
                reason: "search returned no candidate articles".to_string(),
            });
        }

        let (articles, failures) = self.collect_articles(&company, candidates, count, cancel).await;

        if cancel.is_cancelled() {
            info!(company = %company, "Analysis cancelled");
            return Err(AnalysisError::Cancelled(company));
        }

        if articles.is_empty() {
            let all_fetches_failed = !failures.is_empty()
                && failures.iter().all(|f| f.stage == FailureStage::Fetch);
            if all_fetches_failed {
                return Err(AnalysisError::NoDocuments {
                    reason: format!("all {} candidate fetches failed", failures.len()),
                    company,
                });
            }
            return Err(AnalysisError::AggregationImpossible {
                company,
                attempted: failures.len(),
            });
        }

        let sentiments: Vec<SentimentResult> =
            articles.iter().map(|a| a.sentiment.clone()).collect();
        let topic_sets: Vec<TopicSet> = articles.iter().map(|a| a.topics.clone()).collect();
        let summary =
            aggregate(&sentiments, &topic_sets).ok_or_else(|| AnalysisError::AggregationImpossible {
                company: company.clone(),
                attempted: failures.len(),
            })?;

        let (narration, audio) = self.narrator.narrate(&company, &summary).await;

        let result = AnalysisResult {
            company,
            requested_count: count,
            articles,
            summary,
            narration,
            audio,
            failures,
            analyzed_at: Utc::now(),
        };

        self.store.save_result(&result).await?;

        info!(
            company = %result.company,
            articles = result.articles_analyzed(),
            requested = result.requested_count,
            failed = result.failures.len(),
            dominant = %result.summary.dominant_sentiment,
            "Analysis complete"
        );
        Ok(result)
    }

    /// Stored result for a company.
    pub async fn get_result(&self, company: &str) -> Result<AnalysisResult, AnalysisError> {
        self.store
            .get_result(company)
            .await?
            .ok_or_else(|| AnalysisError::NotFound(company.trim().to_string()))
    }

    /// Stored narration audio for a company.
    pub async fn get_audio(&self, company: &str) -> Result<Vec<u8>, AnalysisError> {
        self.store
            .get_audio(company)
            .await?
            .ok_or_else(|| AnalysisError::NotFound(company.trim().to_string()))
    }

    /// Companies with a stored result.
    pub async fn list_companies(&self) -> Result<Vec<String>, AnalysisError> {
        Ok(self.store.list_companies().await?)
    }

    /// Drive the per-article units until `count` survive, candidates run
    /// out, the deadline passes, or cancellation drains the buffer.
    async fn collect_articles(
        &self,
        company: &str,
        candidates: Vec<String>,
        count: usize,
        cancel: &CancelToken,
    ) -> (Vec<ArticleAnalysis>, Vec<ArticleFailure>) {
        let deadline = Instant::now() + self.options.deadline;
        let gate = cancel.clone();

        let units = stream::iter(candidates)
            .take_while(move |_| {
                let open = !gate.is_cancelled();
                async move { open }
            })
            .map(|url| self.process_article(url))
            .buffered(self.options.concurrency.max(1));
        let mut units = std::pin::pin!(units);

        let mut articles = Vec::new();
        let mut failures = Vec::new();

        loop {
            let next = match tokio::time::timeout_at(deadline, units.next()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(
                        company,
                        survived = articles.len(),
                        "Analysis deadline reached, aggregating what survived"
                    );
                    break;
                }
            };
            let Some(outcome) = next else { break };

            match outcome {
                UnitOutcome::Survived(analysis) => {
                    articles.push(*analysis);
                    // Once cancelled, keep draining in-flight units instead.
                    if articles.len() >= count && !cancel.is_cancelled() {
                        break;
                    }
                }
                UnitOutcome::Failed(failure) => {
                    warn!(
                        company,
                        url = %failure.url,
                        stage = %failure.stage,
                        reason = %failure.reason,
                        "Article dropped"
                    );
                    failures.push(failure);
                }
            }
        }

        articles.truncate(count);
        (articles, failures)
    }

    /// Fetch, extract, classify and extract topics for one URL.
    async fn process_article(&self, url: String) -> UnitOutcome {
        let failed = |stage, reason: String| {
            UnitOutcome::Failed(ArticleFailure {
                url: url.clone(),
                stage,
                reason,
            })
        };

        let html = match self.source.fetch_html(&url).await {
            Ok(html) => html,
            Err(e) => return failed(FailureStage::Fetch, format!("{e:#}")),
        };

        let article = match extract_article(&html, &url, Utc::now()) {
            Ok(article) => article,
            Err(discard) => return failed(FailureStage::Extraction, discard.to_string()),
        };

        let input = truncate_input(&article.body, self.classifier.max_input_chars());
        let classification = match self.classifier.classify(input).await {
            Ok(c) => c,
            Err(e) => return failed(FailureStage::Classification, format!("{e:#}")),
        };

        let keywords = self.topics.extract(&article.body);
        debug!(
            url = %url,
            label = %classification.label,
            confidence = classification.confidence,
            topics = keywords.len(),
            "Article analyzed"
        );

        UnitOutcome::Survived(Box::new(ArticleAnalysis {
            sentiment: SentimentResult {
                article_url: article.url.clone(),
                label: classification.label,
                confidence: classification.confidence,
            },
            topics: TopicSet {
                article_url: article.url.clone(),
                keywords,
            },
            article,
        }))
    }
}

/// Check a request and return the trimmed company name.
pub fn validate_request(company: &str, count: usize) -> Result<String, AnalysisError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(AnalysisError::InvalidRequest(
            "company name must not be empty".to_string(),
        ));
    }
    if !(1..=MAX_ARTICLES).contains(&count) {
        return Err(AnalysisError::InvalidRequest(format!(
            "article count must be between 1 and {MAX_ARTICLES}, got {count}"
        )));
    }
    Ok(company.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_company() {
        assert_eq!(validate_request("  Acme  ", 5).unwrap(), "Acme");
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(matches!(
            validate_request("   ", 5),
            Err(AnalysisError::InvalidRequest(_))
        ));
        assert!(validate_request("Acme", 0).is_err());
        assert!(validate_request("Acme", MAX_ARTICLES + 1).is_err());
        assert!(validate_request("Acme", MAX_ARTICLES).is_ok());
    }
}
