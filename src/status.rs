// Store status display: database size, analyzed companies, latest run.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::db::ResultStore;

/// Display store status to the terminal. `db_display_path` is None for the
/// in-memory store.
pub async fn show(store: &Arc<dyn ResultStore>, db_display_path: Option<&str>) -> Result<()> {
    match db_display_path {
        Some(path) if !Path::new(path).exists() => {
            println!("Database: not initialized");
            println!("\nRun `newscast init` to set up the database.");
            return Ok(());
        }
        Some(path) => {
            let file_size = std::fs::metadata(path)
                .map(|m| format_bytes(m.len()))
                .unwrap_or_else(|_| "unknown".to_string());
            println!("Database: {} ({})", path, file_size);
        }
        None => println!("Database: in-memory (results are not kept)"),
    }

    let entries = store.list_entries().await?;
    let with_audio = entries.iter().filter(|e| e.has_audio).count();
    println!(
        "Analyzed companies: {} ({} with audio)",
        entries.len(),
        with_audio
    );

    match entries.first() {
        Some(latest) => println!(
            "Latest analysis: {} ({} articles, {})",
            latest.company,
            latest.articles_analyzed,
            latest.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => {
            println!("Latest analysis: never");
            println!("  Run `newscast analyze <company>` to create one");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
