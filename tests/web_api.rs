// HTTP API tests, driven through the router with tower's `oneshot`.
#![cfg(feature = "web")]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use newscast::db::InMemoryStore;
use newscast::narration::{NarrationLanguage, Narrator, SpeechSynthesizer};
use newscast::news::NewsSource;
use newscast::pipeline::{AnalysisOptions, Analyzer};
use newscast::sentiment::{Classification, SentimentClassifier, SentimentLabel};
use newscast::topics::frequency::FrequencyExtractor;
use newscast::web::{build_router, AppState};

struct StaticSource;

#[async_trait]
impl NewsSource for StaticSource {
    async fn search(&self, _company: &str, limit: usize) -> Result<Vec<String>> {
        Ok((0..limit.min(3))
            .map(|i| format!("https://n.example/{i}"))
            .collect())
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        Ok(format!(
            "<html><head><title>{url}</title></head><body>\
             <p>Acme Corp opened a new robotics plant and hired several hundred workers this spring.</p>\
             <p>Local officials welcomed the investment in the regional economy.</p>\
             </body></html>"
        ))
    }
}

struct AlwaysPositive;

#[async_trait]
impl SentimentClassifier for AlwaysPositive {
    async fn classify(&self, _text: &str) -> Result<Classification> {
        Ok(Classification {
            label: SentimentLabel::Positive,
            confidence: 0.95,
        })
    }
}

struct SilentSynth;

#[async_trait]
impl SpeechSynthesizer for SilentSynth {
    async fn synthesize(&self, _text: &str, _language: NarrationLanguage) -> Result<Vec<u8>> {
        Ok(b"ID3web".to_vec())
    }
}

fn app() -> Router {
    let analyzer = Analyzer::new(
        Arc::new(StaticSource),
        Arc::new(AlwaysPositive),
        Arc::new(FrequencyExtractor::default()),
        Narrator::new(Arc::new(SilentSynth), NarrationLanguage::Hindi),
        Arc::new(InMemoryStore::new()),
        AnalysisOptions::default(),
    );
    build_router(AppState::new(Arc::new(analyzer)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

/// Poll the job endpoint until the job stops running.
async fn wait_for_job(app: &Router, company: &str) -> serde_json::Value {
    for _ in 0..100 {
        let (status, body) = send(app, get(&format!("/api/jobs/{company}"))).await;
        assert_eq!(status, StatusCode::OK);
        let job = json(&body);
        if job["running"] == false {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job for {company} never finished");
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "ok");
}

#[tokio::test]
async fn empty_company_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json("/api/analyze", serde_json::json!({ "company_name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("invalid request"));
}

#[tokio::test]
async fn out_of_range_count_is_bad_request() {
    let (status, _) = send(
        &app(),
        post_json(
            "/api/analyze",
            serde_json::json!({ "company_name": "Acme", "num_articles": 40 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_company_is_not_found() {
    let app = app();
    for uri in ["/api/results/Globex", "/api/audio/Globex", "/api/jobs/Globex"] {
        let (status, _) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
    let (status, _) = send(
        &app,
        Request::delete("/api/analyze/Globex").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn companies_start_empty() {
    let (status, body) = send(&app(), get("/api/companies")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["companies"], serde_json::json!([]));
}

#[tokio::test]
async fn background_analysis_then_results_and_audio() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/analyze",
            serde_json::json!({ "company_name": "Acme", "num_articles": 5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json(&body)["num_articles"], 5);

    let job = wait_for_job(&app, "acme").await;
    assert_eq!(job["message"], "Analyzed 3 of 5 articles");
    assert!(job["last_error"].is_null());

    let (status, body) = send(&app, get("/api/results/Acme")).await;
    assert_eq!(status, StatusCode::OK);
    let result = json(&body);
    assert_eq!(result["company"], "Acme");
    assert_eq!(result["articles_analyzed"], 3);
    assert_eq!(result["articles_requested"], 5);
    assert_eq!(result["partial"], true);
    assert_eq!(result["summary"]["sentiment_distribution"]["positive"], 3);
    assert_eq!(result["audio"]["status"], "ready");

    let response = app.clone().oneshot(get("/api/audio/acme")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"acme_analysis.mp3\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ID3web");

    let (_, body) = send(&app, get("/api/companies")).await;
    assert_eq!(json(&body)["companies"], serde_json::json!(["Acme"]));
}
