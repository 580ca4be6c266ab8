// Google Translate text-to-speech.
//
// The endpoint only accepts short inputs, so the text is split into chunks
// of at most 100 characters and each chunk is fetched as its own MP3. MP3
// frames concatenate cleanly, so the chunk bodies are simply appended.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::template::NarrationLanguage;
use super::traits::SpeechSynthesizer;

/// Default speech endpoint.
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Longest chunk the endpoint accepts.
pub const MAX_CHUNK_CHARS: usize = 100;

const SENTENCE_END: [char; 5] = ['।', '.', '!', '?', ';'];

pub struct GoogleTranslateTts {
    client: Client,
    url: String,
}

impl GoogleTranslateTts {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: NarrationLanguage,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let total = total.to_string();
        let idx_str = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language.code()),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx_str.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Speech request for chunk {idx} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("Speech endpoint returned {} for chunk {idx}", response.status());
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read audio for chunk {idx}"))?;
        if bytes.is_empty() {
            anyhow::bail!("Speech endpoint returned no audio for chunk {idx}");
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, language: NarrationLanguage) -> Result<Vec<u8>> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("Nothing to synthesize");
        }

        debug!(chunks = chunks.len(), language = %language, "Synthesizing narration");
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let part = self.fetch_chunk(chunk, language, idx, chunks.len()).await?;
            audio.extend_from_slice(&part);
        }
        Ok(audio)
    }
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Breaks between words, and always after sentence punctuation. A single word
/// longer than `max_chars` is cut at the character limit.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        let mut word_len = word.chars().count();

        while word_len > max_chars {
            flush(&mut chunks, &mut current, &mut current_len);
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            word_len -= max_chars;
            chunks.push(head);
        }
        if word_len == 0 {
            continue;
        }

        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            flush(&mut chunks, &mut current, &mut current_len);
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&word);
        current_len += word_len;

        if word.ends_with(SENTENCE_END) {
            flush(&mut chunks, &mut current, &mut current_len);
        }
    }
    flush(&mut chunks, &mut current, &mut current_len);
    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    *current_len = 0;
}
