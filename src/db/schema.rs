// Database schema: table creation.
//
// A `schema_version` table records which schema the file was created with.
// Results are stored as JSON so the structure can evolve without migrations;
// the audio payload sits next to it as a BLOB.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet. Idempotent.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Latest analysis per company
        CREATE TABLE IF NOT EXISTS analysis_results (
            company_key TEXT PRIMARY KEY,      -- trimmed, lower-cased name
            company TEXT NOT NULL,             -- display name of the latest request
            result_json TEXT NOT NULL,         -- AnalysisResult without audio bytes
            articles_analyzed INTEGER NOT NULL,
            requested_count INTEGER NOT NULL,
            audio BLOB,                        -- NULL when synthesis failed
            analyzed_at TEXT NOT NULL          -- RFC 3339
        );

        CREATE INDEX IF NOT EXISTS idx_results_analyzed_at
            ON analysis_results(analyzed_at);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, analysis_results
        assert_eq!(table_count(&conn).unwrap(), 2);
    }
}
