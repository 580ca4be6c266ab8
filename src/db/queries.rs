// Database queries for stored analysis results.
//
// All SQL lives here; SqliteStore only locks the connection and delegates.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{company_key, AnalysisResult, CompanyEntry};

/// Insert or replace the result for its company.
pub fn save_result(conn: &Connection, result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string(result).context("Failed to serialize analysis result")?;
    conn.execute(
        "INSERT INTO analysis_results
            (company_key, company, result_json, articles_analyzed, requested_count, audio, analyzed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(company_key) DO UPDATE SET
            company = ?2,
            result_json = ?3,
            articles_analyzed = ?4,
            requested_count = ?5,
            audio = ?6,
            analyzed_at = ?7",
        params![
            result.key(),
            result.company,
            json,
            result.articles_analyzed() as i64,
            result.requested_count as i64,
            result.audio.bytes(),
            result
                .analyzed_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        ],
    )?;
    Ok(())
}

/// Load a result with its audio bytes reattached.
pub fn get_result(conn: &Connection, company: &str) -> Result<Option<AnalysisResult>> {
    let mut stmt =
        conn.prepare("SELECT result_json, audio FROM analysis_results WHERE company_key = ?1")?;
    let row: Option<(String, Option<Vec<u8>>)> = stmt
        .query_row(params![company_key(company)], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    match row {
        Some((json, audio)) => {
            let mut result: AnalysisResult = serde_json::from_str(&json)
                .with_context(|| format!("Corrupt stored result for {company}"))?;
            if let Some(bytes) = audio {
                result.audio = result.audio.with_bytes(bytes);
            }
            Ok(Some(result))
        }
        None => Ok(None),
    }
}

/// Audio bytes for a company, if any were stored.
pub fn get_audio(conn: &Connection, company: &str) -> Result<Option<Vec<u8>>> {
    let mut stmt = conn.prepare("SELECT audio FROM analysis_results WHERE company_key = ?1")?;
    let audio: Option<Option<Vec<u8>>> = stmt
        .query_row(params![company_key(company)], |row| row.get(0))
        .optional()?;
    Ok(audio.flatten().filter(|bytes| !bytes.is_empty()))
}

/// Listing rows, most recently analyzed first.
pub fn list_entries(conn: &Connection) -> Result<Vec<CompanyEntry>> {
    let mut stmt = conn.prepare(
        "SELECT company, articles_analyzed, audio IS NOT NULL, analyzed_at
         FROM analysis_results
         ORDER BY analyzed_at DESC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(company, articles, has_audio, analyzed_at)| {
            let analyzed_at = DateTime::parse_from_rfc3339(&analyzed_at)
                .with_context(|| format!("Bad timestamp for {company}: {analyzed_at}"))?
                .with_timezone(&Utc);
            Ok(CompanyEntry {
                company,
                articles_analyzed: articles.max(0) as usize,
                has_audio,
                analyzed_at,
            })
        })
        .collect()
}
