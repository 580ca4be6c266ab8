// Local ONNX sentiment classifier using DistilBERT fine-tuned on SST-2.
//
// Runs entirely on the local CPU: no API calls, no rate limits. The model is
// binary (NEGATIVE / POSITIVE); low-confidence verdicts are folded into
// neutral by Classification::from_model_output.
//
// Model: Xenova/distilbert-base-uncased-finetuned-sst-2-english (quantized)
// Output: 2 logits per input, softmax gives class probabilities.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::download::{MODEL_FILE, TOKENIZER_FILE};
use super::traits::{Classification, SentimentClassifier};

/// Class names in the order the model emits logits.
const LABEL_ORDER: [&str; 2] = ["NEGATIVE", "POSITIVE"];

/// DistilBERT's context window in tokens.
const MAX_TOKENS: usize = 512;

/// Local ONNX-based sentiment classifier.
pub struct OnnxSentimentClassifier {
    // Session::run takes &mut self and inference runs on spawn_blocking,
    // so the session needs shared ownership plus interior mutability.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    neutral_threshold: f64,
}

impl OnnxSentimentClassifier {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Call `download::download_model()` first if the files aren't there.
    pub fn load(model_dir: &Path, neutral_threshold: f64) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `newscast download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `newscast download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        debug!("Loaded ONNX sentiment model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            neutral_threshold,
        })
    }
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();
        let neutral_threshold = self.neutral_threshold;

        // Tokenization and inference are CPU-bound; keep them off the runtime.
        tokio::task::spawn_blocking(move || {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let shape = [1_i64, input_ids.len() as i64];

            let input_ids_tensor = Tensor::from_array((shape, input_ids))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask))
                .context("Failed to create attention_mask tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape [1, 2], raw logits
                let (_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;
                data.to_vec()
            };

            if logits.len() != LABEL_ORDER.len() {
                anyhow::bail!(
                    "Expected {} logits from sentiment model, got {}",
                    LABEL_ORDER.len(),
                    logits.len()
                );
            }

            let probs = softmax(&logits.iter().map(|&l| l as f64).collect::<Vec<_>>());
            let (best, score) = argmax(&probs);
            let result =
                Classification::from_model_output(LABEL_ORDER[best], score, neutral_threshold)?;

            debug!(
                label = %result.label,
                confidence = result.confidence,
                text_preview = %crate::output::truncate_chars(&text, 50),
                "ONNX classified text"
            );

            Ok(result)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest probability. First index wins ties.
fn argmax(probs: &[f64]) -> (usize, f64) {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, p)| {
            if p > best.1 {
                (i, p)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[2.0, -1.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-10);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_softmax_equal_logits() {
        let probs = softmax(&[0.3, 0.3]);
        assert!((probs[0] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_softmax_large_logits_do_not_overflow() {
        let probs = softmax(&[1000.0, 0.0]);
        assert!((probs[0] - 1.0).abs() < 1e-10);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_argmax_picks_highest() {
        assert_eq!(argmax(&[0.2, 0.8]).0, 1);
        assert_eq!(argmax(&[0.5, 0.5]).0, 0);
    }

    #[test]
    fn test_label_order_maps_to_known_labels() {
        for label in LABEL_ORDER {
            assert!(crate::sentiment::SentimentLabel::parse(label).is_some());
        }
    }
}
