use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::narration::gtts::DEFAULT_TTS_URL;
use crate::narration::NarrationLanguage;
use crate::news::google::DEFAULT_SEARCH_URL;
use crate::pipeline::AnalysisOptions;
use crate::sentiment::huggingface::DEFAULT_HF_MODEL_URL;
use crate::topics::frequency::DEFAULT_TOP_K;

/// Which sentiment classifier backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Local ONNX model (default), no API token, no rate limits
    Onnx,
    /// Hosted Hugging Face inference, requires HF_API_TOKEN
    HuggingFace,
}

/// Where analysis results are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Sqlite,
    /// Process-lifetime only
    Memory,
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded at startup
/// via dotenvy.
pub struct Config {
    pub db_path: String,
    pub store_backend: StoreBackend,
    pub classifier_backend: ClassifierBackend,
    pub hf_api_token: String,
    pub hf_model_url: String,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    pub search_url: String,
    pub tts_url: String,
    pub language: NarrationLanguage,
    /// Per-article units in flight at once
    pub concurrency: usize,
    /// Per-request HTTP timeout
    pub fetch_timeout: Duration,
    /// Wall-clock cap on the per-article stage of one analysis
    pub analysis_timeout: Duration,
    /// Binary labels with confidence below this become neutral
    pub neutral_threshold: f64,
    pub topics_per_article: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default. A value that is set but doesn't parse is
    /// an error rather than silently falling back.
    pub fn load() -> Result<Self> {
        let classifier_backend = match env::var("NEWSCAST_CLASSIFIER").as_deref() {
            Ok("huggingface") | Ok("hf") => ClassifierBackend::HuggingFace,
            Ok("onnx") | Err(_) => ClassifierBackend::Onnx,
            Ok(other) => anyhow::bail!(
                "Unknown NEWSCAST_CLASSIFIER '{other}' (expected onnx or huggingface)"
            ),
        };

        let store_backend = match env::var("NEWSCAST_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("sqlite") | Err(_) => StoreBackend::Sqlite,
            Ok(other) => {
                anyhow::bail!("Unknown NEWSCAST_STORE '{other}' (expected sqlite or memory)")
            }
        };

        let model_dir = env::var("NEWSCAST_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::sentiment::download::default_model_dir());

        let neutral_threshold: f64 = parse_var("NEWSCAST_NEUTRAL_THRESHOLD", 0.6)?;
        if !(0.0..=1.0).contains(&neutral_threshold) {
            anyhow::bail!("NEWSCAST_NEUTRAL_THRESHOLD must be between 0 and 1, got {neutral_threshold}");
        }

        Ok(Self {
            db_path: env::var("NEWSCAST_DB_PATH").unwrap_or_else(|_| "./newscast.db".to_string()),
            store_backend,
            classifier_backend,
            hf_api_token: env::var("HF_API_TOKEN").unwrap_or_default(),
            hf_model_url: env::var("NEWSCAST_HF_MODEL_URL")
                .unwrap_or_else(|_| DEFAULT_HF_MODEL_URL.to_string()),
            model_dir,
            search_url: env::var("NEWSCAST_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string()),
            tts_url: env::var("NEWSCAST_TTS_URL").unwrap_or_else(|_| DEFAULT_TTS_URL.to_string()),
            language: parse_var("NEWSCAST_LANGUAGE", NarrationLanguage::Hindi)?,
            concurrency: parse_var::<usize>("NEWSCAST_CONCURRENCY", 4)?.max(1),
            fetch_timeout: Duration::from_secs(parse_var("NEWSCAST_FETCH_TIMEOUT_SECS", 10)?),
            analysis_timeout: Duration::from_secs(parse_var(
                "NEWSCAST_ANALYSIS_TIMEOUT_SECS",
                120,
            )?),
            neutral_threshold,
            topics_per_article: parse_var("NEWSCAST_TOPICS_PER_ARTICLE", DEFAULT_TOP_K)?,
        })
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            concurrency: self.concurrency,
            deadline: self.analysis_timeout,
        }
    }

    /// Validate that the chosen classifier backend has what it needs.
    /// For ONNX: model files must exist (or user should run download-model).
    /// For Hugging Face: the API token must be set.
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier_backend {
            ClassifierBackend::Onnx => {
                if !crate::sentiment::download::model_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "ONNX model files not found in {}\n\
                         Run `newscast download-model` to download them.\n\
                         Or set NEWSCAST_CLASSIFIER=huggingface to use hosted inference instead.",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
            ClassifierBackend::HuggingFace => {
                if self.hf_api_token.is_empty() {
                    anyhow::bail!(
                        "HF_API_TOKEN not set. Add it to your .env file.\n\
                         See .env.example for the required variables."
                    );
                }
                Ok(())
            }
        }
    }
}

/// Read and parse an env var, using `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid value for {name}: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name so parallel tests don't race.

    #[test]
    fn test_parse_var_default_when_unset() {
        let v: usize = parse_var("NEWSCAST_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("NEWSCAST_TEST_GARBAGE_VAR", "four");
        let err = parse_var::<usize>("NEWSCAST_TEST_GARBAGE_VAR", 4).unwrap_err();
        assert!(err.to_string().contains("NEWSCAST_TEST_GARBAGE_VAR"));
        env::remove_var("NEWSCAST_TEST_GARBAGE_VAR");
    }

    #[test]
    fn test_parse_var_reads_language() {
        env::set_var("NEWSCAST_TEST_LANG_VAR", " en ");
        let lang: NarrationLanguage =
            parse_var("NEWSCAST_TEST_LANG_VAR", NarrationLanguage::Hindi).unwrap();
        assert_eq!(lang, NarrationLanguage::English);
        env::remove_var("NEWSCAST_TEST_LANG_VAR");
    }
}
