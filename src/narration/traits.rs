// Speech synthesis trait, plus the outcome type stored on a result.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::template::NarrationLanguage;
use crate::error::SynthesisError;

/// MIME type of every backend we ship.
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// Turns narration text into audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: NarrationLanguage) -> Result<Vec<u8>>;

    fn mime_type(&self) -> &'static str {
        AUDIO_MPEG
    }
}

/// Result of the synthesis step. A failure here never invalidates the text.
///
/// Audio bytes are not part of the JSON form; stores keep them separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AudioOutcome {
    Ready {
        mime_type: String,
        size_bytes: usize,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    Failed {
        reason: String,
    },
}

impl AudioOutcome {
    pub fn ready(mime_type: &str, bytes: Vec<u8>) -> Self {
        AudioOutcome::Ready {
            mime_type: mime_type.to_string(),
            size_bytes: bytes.len(),
            bytes,
        }
    }

    pub fn failed(err: &SynthesisError) -> Self {
        AudioOutcome::Failed {
            reason: err.0.clone(),
        }
    }

    /// Audio bytes, if synthesis succeeded and the bytes are loaded.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            AudioOutcome::Ready { bytes, .. } if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }

    pub fn synthesis_error(&self) -> Option<SynthesisError> {
        match self {
            AudioOutcome::Failed { reason } => Some(SynthesisError(reason.clone())),
            AudioOutcome::Ready { .. } => None,
        }
    }

    /// Reattach bytes loaded from storage to a deserialized outcome.
    pub fn with_bytes(self, loaded: Vec<u8>) -> Self {
        match self {
            AudioOutcome::Ready { mime_type, .. } => AudioOutcome::Ready {
                mime_type,
                size_bytes: loaded.len(),
                bytes: loaded,
            },
            failed => failed,
        }
    }
}
