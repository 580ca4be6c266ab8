// Background analysis jobs, started by POST /api/analyze.
//
// One job per company at a time: the handler refuses a second request for a
// company whose job is still running. Job state lives in memory only; the
// results themselves go to the result store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::db::AnalysisResult;
use crate::error::AnalysisError;
use crate::pipeline::{Analyzer, CancelToken};

/// Live status of one company's analysis, exposed via GET /api/jobs/{company}.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub company: String,
    pub requested: usize,
    /// True while the analysis is in progress.
    pub running: bool,
    /// RFC 3339 timestamp of when the job started.
    pub started_at: String,
    pub finished_at: Option<String>,
    /// Human-readable outcome or progress message.
    pub message: String,
    /// Error from the last run, if it failed.
    pub last_error: Option<String>,
    #[serde(skip)]
    pub cancel: CancelToken,
}

impl JobStatus {
    pub fn started(company: &str, requested: usize) -> Self {
        Self {
            company: company.to_string(),
            requested,
            running: true,
            started_at: Utc::now().to_rfc3339(),
            finished_at: None,
            message: "Analysis started".to_string(),
            last_error: None,
            cancel: CancelToken::new(),
        }
    }
}

/// Jobs keyed by normalized company name.
pub type JobTable = Arc<RwLock<HashMap<String, JobStatus>>>;

/// Run the analysis in a background tokio task and record the outcome in
/// `jobs[key]`. Returns immediately.
pub fn launch_analysis(
    analyzer: Arc<Analyzer>,
    jobs: JobTable,
    key: String,
    company: String,
    count: usize,
    cancel: CancelToken,
) {
    let run_company = company.clone();
    spawn_job(jobs, key, company, async move {
        analyzer
            .analyze_with_cancel(&run_company, count, &cancel)
            .await
    });
}

/// Drive `run` in its own task and always mark the job finished, even if
/// the run panics.
pub fn spawn_job<F>(jobs: JobTable, key: String, company: String, run: F)
where
    F: Future<Output = Result<AnalysisResult, AnalysisError>> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = tokio::spawn(run).await;

        let mut jobs = jobs.write().await;
        let Some(job) = jobs.get_mut(&key) else {
            return;
        };
        job.running = false;
        job.finished_at = Some(Utc::now().to_rfc3339());

        match outcome {
            Ok(Ok(result)) => {
                info!(
                    company = %company,
                    articles = result.articles_analyzed(),
                    "Background analysis completed"
                );
                job.message = format!(
                    "Analyzed {} of {} articles",
                    result.articles_analyzed(),
                    result.requested_count
                );
                job.last_error = None;
            }
            Ok(Err(AnalysisError::Cancelled(_))) => {
                info!(company = %company, "Background analysis cancelled");
                job.message = "Analysis cancelled".to_string();
                job.last_error = None;
            }
            Ok(Err(e)) => {
                error!(company = %company, error = %e, "Background analysis failed");
                job.message = "Analysis failed".to_string();
                job.last_error = Some(e.to_string());
            }
            Err(join_error) => {
                error!(company = %company, error = %join_error, "Background analysis panicked");
                job.message = "Analysis failed".to_string();
                job.last_error = Some(format!("analysis task aborted: {join_error}"));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn poisoned_run() -> Result<AnalysisResult, AnalysisError> {
        panic!("classifier session poisoned")
    }

    async fn cancelled_run() -> Result<AnalysisResult, AnalysisError> {
        Err(AnalysisError::Cancelled("Acme".to_string()))
    }

    async fn wait_until_finished(jobs: &JobTable, key: &str) -> JobStatus {
        for _ in 0..100 {
            if let Some(job) = jobs.read().await.get(key) {
                if !job.running {
                    return job.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {key} never finished");
    }

    #[tokio::test]
    async fn test_panicking_run_still_finishes_job() {
        let jobs: JobTable = Arc::new(RwLock::new(HashMap::new()));
        jobs.write()
            .await
            .insert("acme".to_string(), JobStatus::started("Acme", 5));

        spawn_job(jobs.clone(), "acme".to_string(), "Acme".to_string(), poisoned_run());

        let job = wait_until_finished(&jobs, "acme").await;
        assert!(job.finished_at.is_some());
        assert_eq!(job.message, "Analysis failed");
        assert!(job.last_error.unwrap().contains("aborted"));
    }

    #[tokio::test]
    async fn test_cancelled_run_has_no_error() {
        let jobs: JobTable = Arc::new(RwLock::new(HashMap::new()));
        jobs.write()
            .await
            .insert("acme".to_string(), JobStatus::started("Acme", 5));

        spawn_job(jobs.clone(), "acme".to_string(), "Acme".to_string(), cancelled_run());

        let job = wait_until_finished(&jobs, "acme").await;
        assert_eq!(job.message, "Analysis cancelled");
        assert!(job.last_error.is_none());
    }
}
