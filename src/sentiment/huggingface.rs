// Hosted sentiment classifier: Hugging Face inference API.
//
// Sends the text to a text-classification endpoint and takes the highest
// scoring label. Same model as the local ONNX backend, so results agree
// closely; useful when the model files can't be downloaded.
//
// API docs: https://huggingface.co/docs/inference-providers/tasks/text-classification

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Classification, SentimentClassifier};
use crate::rate_limiter::RateLimiter;

/// Default hosted endpoint for DistilBERT SST-2.
pub const DEFAULT_HF_MODEL_URL: &str = "https://router.huggingface.co/hf-inference/models/distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// Hugging Face inference API classifier.
pub struct HuggingFaceClassifier {
    client: Client,
    model_url: String,
    api_token: String,
    neutral_threshold: f64,
    rate_limiter: RateLimiter,
}

impl HuggingFaceClassifier {
    pub fn new(model_url: &str, api_token: String, neutral_threshold: f64) -> Self {
        Self {
            client: Client::new(),
            model_url: model_url.to_string(),
            api_token,
            neutral_threshold,
            // Stay well under the free tier's burst limit
            rate_limiter: RateLimiter::new(5.0),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        self.rate_limiter.acquire().await;

        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(&self.api_token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .context("Failed to call Hugging Face inference API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Hugging Face inference returned {}: {}", status, body);
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .context("Failed to parse Hugging Face inference response")?;

        let best = parsed
            .into_scores()
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| anyhow::anyhow!("Hugging Face inference returned no labels"))?;

        let result =
            Classification::from_model_output(&best.label, best.score, self.neutral_threshold)?;

        debug!(
            label = %result.label,
            confidence = result.confidence,
            text_preview = %crate::output::truncate_chars(text, 50),
            "Classified text"
        );

        Ok(result)
    }
}

// --- Inference API request/response types ---

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// The API returns `[[{label, score}, ...]]` for a single input on some
/// deployments and a flat `[{label, score}, ...]` on others.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(scores) => scores,
        }
    }
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}
