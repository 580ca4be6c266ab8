// InMemoryStore: HashMap-backed ResultStore.
//
// Nothing survives the process. Used by tests and when the store is
// configured as `memory`.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{company_key, AnalysisResult, CompanyEntry};
use super::traits::ResultStore;

#[derive(Default)]
pub struct InMemoryStore {
    results: RwLock<HashMap<String, AnalysisResult>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn save_result(&self, result: &AnalysisResult) -> Result<()> {
        self.results
            .write()
            .await
            .insert(result.key(), result.clone());
        Ok(())
    }

    async fn get_result(&self, company: &str) -> Result<Option<AnalysisResult>> {
        Ok(self.results.read().await.get(&company_key(company)).cloned())
    }

    async fn get_audio(&self, company: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .results
            .read()
            .await
            .get(&company_key(company))
            .and_then(|r| r.audio.bytes().map(<[u8]>::to_vec)))
    }

    async fn list_entries(&self) -> Result<Vec<CompanyEntry>> {
        let mut entries: Vec<CompanyEntry> = self
            .results
            .read()
            .await
            .values()
            .map(CompanyEntry::from)
            .collect();
        entries.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at));
        Ok(entries)
    }
}
