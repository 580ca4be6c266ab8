// ResultStore behavior, run against every backend.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use newscast::comparison::aggregate;
use newscast::db::{AnalysisResult, ArticleAnalysis, InMemoryStore, ResultStore};
use newscast::error::{ArticleFailure, FailureStage, SynthesisError};
use newscast::narration::{AudioOutcome, Narration, NarrationLanguage};
use newscast::news::Article;
use newscast::sentiment::{SentimentLabel, SentimentResult};
use newscast::topics::TopicSet;

fn result(company: &str, audio: AudioOutcome, minutes: i64) -> AnalysisResult {
    let url = "https://news.example.com/story".to_string();
    let analysis = ArticleAnalysis {
        article: Article {
            url: url.clone(),
            title: "Story".into(),
            body: "Body text.".into(),
            summary: "Body text.".into(),
            source: "news.example.com".into(),
            published: None,
            retrieved_at: Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap(),
        },
        sentiment: SentimentResult {
            article_url: url.clone(),
            label: SentimentLabel::Positive,
            confidence: 0.75,
        },
        topics: TopicSet {
            article_url: url,
            keywords: vec!["story".into()],
        },
    };
    let summary = aggregate(
        std::slice::from_ref(&analysis.sentiment),
        std::slice::from_ref(&analysis.topics),
    )
    .unwrap();

    AnalysisResult {
        company: company.to_string(),
        requested_count: 2,
        articles: vec![analysis],
        summary,
        narration: Narration {
            language: NarrationLanguage::Hindi,
            text: "समाचार विश्लेषण।".into(),
        },
        audio,
        failures: vec![ArticleFailure {
            url: "https://dead.example.com".into(),
            stage: FailureStage::Fetch,
            reason: "timed out".into(),
        }],
        analyzed_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap() + Duration::minutes(minutes),
    }
}

fn mp3(bytes: &[u8]) -> AudioOutcome {
    AudioOutcome::ready("audio/mpeg", bytes.to_vec())
}

async fn roundtrip_keeps_everything(store: Arc<dyn ResultStore>) {
    let saved = result("Acme", mp3(b"abc"), 0);
    store.save_result(&saved).await.unwrap();

    let loaded = store.get_result("acme").await.unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert!(loaded.is_partial());
    assert_eq!(loaded.articles_analyzed(), 1);
    assert_eq!(store.get_audio(" ACME ").await.unwrap(), Some(b"abc".to_vec()));
}

async fn overwrite_replaces_previous(store: Arc<dyn ResultStore>) {
    store.save_result(&result("acme", mp3(b"old"), 0)).await.unwrap();
    store.save_result(&result("Acme", mp3(b"new"), 5)).await.unwrap();

    assert_eq!(store.result_count().await.unwrap(), 1);
    assert_eq!(store.list_companies().await.unwrap(), vec!["Acme"]);
    assert_eq!(store.get_audio("acme").await.unwrap(), Some(b"new".to_vec()));
}

async fn failed_audio_is_not_found(store: Arc<dyn ResultStore>) {
    let failed = AudioOutcome::failed(&SynthesisError("503".into()));
    store.save_result(&result("Acme", failed, 0)).await.unwrap();

    assert!(store.get_result("acme").await.unwrap().is_some());
    assert_eq!(store.get_audio("acme").await.unwrap(), None);
    assert_eq!(store.get_audio("unknown").await.unwrap(), None);
}

async fn listings_are_ordered(store: Arc<dyn ResultStore>) {
    store.save_result(&result("Zeta", mp3(b"z"), 10)).await.unwrap();
    store.save_result(&result("alpha", mp3(b"a"), 0)).await.unwrap();
    store.save_result(&result("Mid", mp3(b"m"), 20)).await.unwrap();

    assert_eq!(
        store.list_companies().await.unwrap(),
        vec!["alpha", "Mid", "Zeta"]
    );
    let newest_first: Vec<String> = store
        .list_entries()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.company)
        .collect();
    assert_eq!(newest_first, vec!["Mid", "Zeta", "alpha"]);
}

// ============================================================
// In-memory backend
// ============================================================

fn memory() -> Arc<dyn ResultStore> {
    Arc::new(InMemoryStore::new())
}

#[tokio::test]
async fn memory_roundtrip_keeps_everything() {
    roundtrip_keeps_everything(memory()).await;
}

#[tokio::test]
async fn memory_overwrite_replaces_previous() {
    overwrite_replaces_previous(memory()).await;
}

#[tokio::test]
async fn memory_failed_audio_is_not_found() {
    failed_audio_is_not_found(memory()).await;
}

#[tokio::test]
async fn memory_listings_are_ordered() {
    listings_are_ordered(memory()).await;
}

// ============================================================
// SQLite backend
// ============================================================

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use newscast::db::SqliteStore;

    fn sqlite() -> Arc<dyn ResultStore> {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        newscast::db::schema::create_tables(&conn).unwrap();
        Arc::new(SqliteStore::new(conn))
    }

    #[tokio::test]
    async fn sqlite_roundtrip_keeps_everything() {
        roundtrip_keeps_everything(sqlite()).await;
    }

    #[tokio::test]
    async fn sqlite_overwrite_replaces_previous() {
        overwrite_replaces_previous(sqlite()).await;
    }

    #[tokio::test]
    async fn sqlite_failed_audio_is_not_found() {
        failed_audio_is_not_found(sqlite()).await;
    }

    #[tokio::test]
    async fn sqlite_listings_are_ordered() {
        listings_are_ordered(sqlite()).await;
    }

    #[test]
    fn initialize_creates_file_and_open_requires_it() {
        let dir = std::env::temp_dir().join(format!("newscast-store-{}", std::process::id()));
        let path = dir.join("nested").join("results.db");
        let path_str = path.to_str().unwrap();

        assert!(newscast::db::open(path_str).is_err());
        newscast::db::initialize(path_str).unwrap();
        assert!(newscast::db::open(path_str).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
