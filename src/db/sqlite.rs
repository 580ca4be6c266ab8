// SqliteStore: rusqlite backend implementing ResultStore.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across an .await point.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{AnalysisResult, CompanyEntry};
use super::traits::ResultStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl ResultStore for SqliteStore {
    async fn save_result(&self, result: &AnalysisResult) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::save_result(&conn, result)
    }

    async fn get_result(&self, company: &str) -> Result<Option<AnalysisResult>> {
        let conn = self.conn.lock().await;
        super::queries::get_result(&conn, company)
    }

    async fn get_audio(&self, company: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn.lock().await;
        super::queries::get_audio(&conn, company)
    }

    async fn list_entries(&self) -> Result<Vec<CompanyEntry>> {
        let conn = self.conn.lock().await;
        super::queries::list_entries(&conn)
    }
}
