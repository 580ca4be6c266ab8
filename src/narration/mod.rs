// Narration: render the comparative summary as spoken-language text, then
// synthesize it to audio.

pub mod gtts;
pub mod template;
pub mod traits;

pub use template::{render_narration, NarrationLanguage};
pub use traits::{AudioOutcome, SpeechSynthesizer};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::comparison::ComparativeSummary;
use crate::error::SynthesisError;

/// Narrated summary text and its language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narration {
    pub language: NarrationLanguage,
    pub text: String,
}

/// Template fill plus speech synthesis.
pub struct Narrator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    language: NarrationLanguage,
}

impl Narrator {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, language: NarrationLanguage) -> Self {
        Self {
            synthesizer,
            language,
        }
    }

    pub fn language(&self) -> NarrationLanguage {
        self.language
    }

    /// Produce the narration text, then try to voice it. Synthesis failure
    /// comes back as `AudioOutcome::Failed`; the text is always returned.
    pub async fn narrate(
        &self,
        company: &str,
        summary: &ComparativeSummary,
    ) -> (Narration, AudioOutcome) {
        let text = render_narration(company, summary, self.language);

        let audio = match self.synthesizer.synthesize(&text, self.language).await {
            Ok(bytes) if !bytes.is_empty() => {
                info!(company, bytes = bytes.len(), "Narration audio ready");
                AudioOutcome::ready(self.synthesizer.mime_type(), bytes)
            }
            Ok(_) => {
                let err = SynthesisError("synthesizer returned no audio".to_string());
                warn!(company, error = %err, "Narration audio unavailable");
                AudioOutcome::failed(&err)
            }
            Err(e) => {
                let err = SynthesisError(format!("{e:#}"));
                warn!(company, error = %err, "Narration audio unavailable");
                AudioOutcome::failed(&err)
            }
        };

        (
            Narration {
                language: self.language,
                text,
            },
            audio,
        )
    }
}
