// Sentiment classifier trait and the label/result types it produces.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Classifier input limit in characters, matching the model's context window
/// closely enough that truncation rarely loses the lede.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 512;

/// The three sentiment buckets an article can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels, in dominance tie-break order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Normalize a model's label name. Case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Some(SentimentLabel::Positive),
            "negative" | "neg" => Some(SentimentLabel::Negative),
            "neutral" | "neu" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classifier's verdict on one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    /// Model confidence in the label, 0.0 to 1.0
    pub confidence: f64,
}

impl Classification {
    /// Map a raw model label + score onto our three buckets.
    ///
    /// Binary sentiment models never say "neutral", so a positive/negative
    /// verdict with confidence below `neutral_threshold` is reported as
    /// neutral instead.
    pub fn from_model_output(raw_label: &str, score: f64, neutral_threshold: f64) -> Result<Self> {
        let Some(label) = SentimentLabel::parse(raw_label) else {
            anyhow::bail!("Classifier returned unknown label {raw_label:?}");
        };
        let confidence = score.clamp(0.0, 1.0);
        let label = if label != SentimentLabel::Neutral && confidence < neutral_threshold {
            SentimentLabel::Neutral
        } else {
            label
        };
        Ok(Self { label, confidence })
    }
}

/// Sentiment for one surviving article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// URL of the article this result belongs to
    pub article_url: String,
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Trait for classifying text sentiment. Async because most backends either
/// call an HTTP API or offload inference to a blocking thread.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify one text. Callers truncate to `max_input_chars` first.
    async fn classify(&self, text: &str) -> Result<Classification>;

    /// Longest input (in characters) this backend should be given.
    fn max_input_chars(&self) -> usize {
        DEFAULT_MAX_INPUT_CHARS
    }
}

/// Cut text to at most `max_chars` characters on a char boundary.
pub fn truncate_input(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
