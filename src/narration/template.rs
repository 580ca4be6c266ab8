// Narration templates.
//
// Each language has its own template written directly in that language and
// filled with data from the ComparativeSummary. Nothing is translated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::comparison::ComparativeSummary;
use crate::sentiment::SentimentLabel;

/// Topics named in a narration.
pub const NARRATED_TOPICS: usize = 3;

/// Spoken language of the narration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrationLanguage {
    #[default]
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "en")]
    English,
}

impl NarrationLanguage {
    /// ISO 639-1 code, also the `tl` parameter of the speech endpoint.
    pub fn code(&self) -> &'static str {
        match self {
            NarrationLanguage::Hindi => "hi",
            NarrationLanguage::English => "en",
        }
    }
}

impl fmt::Display for NarrationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for NarrationLanguage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hi" | "hindi" => Ok(NarrationLanguage::Hindi),
            "en" | "english" => Ok(NarrationLanguage::English),
            other => anyhow::bail!("Unsupported narration language '{other}' (expected hi or en)"),
        }
    }
}

/// Fill the template for `language` with the summary's numbers.
pub fn render_narration(
    company: &str,
    summary: &ComparativeSummary,
    language: NarrationLanguage,
) -> String {
    match language {
        NarrationLanguage::Hindi => render_hindi(company, summary),
        NarrationLanguage::English => render_english(company, summary),
    }
}

fn render_hindi(company: &str, summary: &ComparativeSummary) -> String {
    let dist = &summary.sentiment_distribution;
    let dominant = summary.dominant_sentiment;
    let mut lines = vec![
        format!("{company} के बारे में समाचार विश्लेषण।"),
        format!("हमने {} समाचार लेख खोजे।", summary.articles_analyzed),
        format!(
            "इनमें से, {} सकारात्मक, {} नकारात्मक, और {} तटस्थ थे।",
            dist.positive, dist.negative, dist.neutral
        ),
        format!("समग्र भावना: {} ({dominant})।", hindi_label(dominant)),
    ];
    if let Some(topics) = narrated_topics(summary) {
        lines.push(format!("मुख्य विषय: {topics}।"));
    }
    lines.join("\n")
}

fn render_english(company: &str, summary: &ComparativeSummary) -> String {
    let dist = &summary.sentiment_distribution;
    let mut lines = vec![
        format!("News analysis for {company}."),
        format!("We analyzed {} news articles.", summary.articles_analyzed),
        format!(
            "Of these, {} were positive, {} negative, and {} neutral.",
            dist.positive, dist.negative, dist.neutral
        ),
        format!("Overall sentiment: {}.", summary.dominant_sentiment),
    ];
    if let Some(topics) = narrated_topics(summary) {
        lines.push(format!("Main topics: {topics}."));
    }
    lines.join("\n")
}

fn hindi_label(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "सकारात्मक",
        SentimentLabel::Negative => "नकारात्मक",
        SentimentLabel::Neutral => "तटस्थ",
    }
}

fn narrated_topics(summary: &ComparativeSummary) -> Option<String> {
    if summary.common_topics.is_empty() {
        return None;
    }
    Some(
        summary
            .common_topics
            .iter()
            .take(NARRATED_TOPICS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    )
}
