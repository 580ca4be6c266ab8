// ResultStore trait: backend-agnostic async interface for stored analyses.
//
// Implementors: InMemoryStore (tests, `NEWSCAST_STORE=memory`) and
// SqliteStore (wraps rusqlite). All methods are async so a blocking
// backend behind a Mutex and a native async one fit the same interface.
//
// Lookups take the company name as the user typed it; backends normalize
// it with `company_key`.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{AnalysisResult, CompanyEntry};

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Save a result, replacing any earlier one for the same company.
    async fn save_result(&self, result: &AnalysisResult) -> Result<()>;

    /// Latest result for a company, audio bytes included.
    async fn get_result(&self, company: &str) -> Result<Option<AnalysisResult>>;

    /// Audio bytes for a company. None if there is no result or synthesis failed.
    async fn get_audio(&self, company: &str) -> Result<Option<Vec<u8>>>;

    /// All stored companies, most recently analyzed first.
    async fn list_entries(&self) -> Result<Vec<CompanyEntry>>;

    /// Display names of all stored companies, alphabetical.
    async fn list_companies(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .list_entries()
            .await?
            .into_iter()
            .map(|e| e.company)
            .collect();
        names.sort_by_key(|n| n.to_lowercase());
        Ok(names)
    }

    /// Number of stored companies.
    async fn result_count(&self) -> Result<usize> {
        Ok(self.list_entries().await?.len())
    }
}
