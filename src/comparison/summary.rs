// Aggregation of per-article results into a ComparativeSummary.
//
// The summary carries three things:
//   - the sentiment distribution (and the dominant label derived from it)
//   - coverage-difference statements: one overall tone statement, one
//     common-themes statement when there are shared topics, then one
//     statement per unordered article pair in index order
//   - common topics: keywords that recur across articles

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sentiment::{SentimentLabel, SentimentResult};
use crate::topics::TopicSet;

/// Most common topics reported for a company.
pub const MAX_COMMON_TOPICS: usize = 5;

/// Topics named per article in a pairwise statement.
const TOPICS_PER_STATEMENT: usize = 3;

/// Article counts per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a SentimentLabel>) -> Self {
        let mut dist = Self::default();
        for label in labels {
            match label {
                SentimentLabel::Positive => dist.positive += 1,
                SentimentLabel::Negative => dist.negative += 1,
                SentimentLabel::Neutral => dist.neutral += 1,
            }
        }
        dist
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Label with the highest count. Ties go to positive, then negative.
    pub fn dominant(&self) -> SentimentLabel {
        SentimentLabel::ALL
            .into_iter()
            .fold(SentimentLabel::Positive, |best, label| {
                if self.count(label) > self.count(best) {
                    label
                } else {
                    best
                }
            })
    }
}

/// One human-readable contrast between articles, with its implication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDifference {
    pub comparison: String,
    pub impact: String,
}

/// Company-level view across all surviving articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeSummary {
    pub articles_analyzed: usize,
    pub sentiment_distribution: SentimentDistribution,
    pub dominant_sentiment: SentimentLabel,
    pub coverage_differences: Vec<CoverageDifference>,
    pub common_topics: Vec<String>,
    /// One-sentence verdict, e.g. "Coverage is predominantly positive (3/5 articles). ..."
    pub overall_assessment: String,
}

/// Build the comparative summary. Returns None when there are no articles:
/// an empty run has nothing to compare.
///
/// `sentiments[i]` and `topics[i]` must describe the same article.
pub fn aggregate(sentiments: &[SentimentResult], topics: &[TopicSet]) -> Option<ComparativeSummary> {
    debug_assert_eq!(sentiments.len(), topics.len());
    let n = sentiments.len().min(topics.len());
    if n == 0 {
        return None;
    }
    let sentiments = &sentiments[..n];
    let topics = &topics[..n];

    let distribution = SentimentDistribution::from_labels(sentiments.iter().map(|s| &s.label));
    let dominant = distribution.dominant();
    let common_topics = common_topics(topics);

    let mut differences = vec![tone_statement(&distribution)];
    if !common_topics.is_empty() {
        differences.push(themes_statement(&common_topics));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            differences.push(pair_statement(
                i,
                &sentiments[i],
                &topics[i],
                j,
                &sentiments[j],
                &topics[j],
            ));
        }
    }

    Some(ComparativeSummary {
        articles_analyzed: n,
        sentiment_distribution: distribution,
        dominant_sentiment: dominant,
        coverage_differences: differences,
        overall_assessment: overall_assessment(&distribution, dominant),
        common_topics,
    })
}

/// Keywords appearing in at least two articles (or in the only article),
/// most widespread first, ties by first appearance.
pub fn common_topics(topics: &[TopicSet]) -> Vec<String> {
    let threshold = topics.len().min(2);

    // keyword -> (articles containing it, first appearance)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order = 0;
    for set in topics {
        let mut seen_here: Vec<&str> = Vec::new();
        for keyword in &set.keywords {
            if seen_here.contains(&keyword.as_str()) {
                continue;
            }
            seen_here.push(keyword);
            let entry = counts.entry(keyword).or_insert((0, order));
            entry.0 += 1;
            order += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= threshold)
        .map(|(k, (count, first))| (k, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_COMMON_TOPICS)
        .map(|(k, _, _)| k.to_string())
        .collect()
}

fn tone_statement(dist: &SentimentDistribution) -> CoverageDifference {
    if dist.positive > dist.negative {
        CoverageDifference {
            comparison: format!(
                "{} articles have positive sentiment, while {} are negative.",
                dist.positive, dist.negative
            ),
            impact: "The majority of coverage is positive, suggesting favorable public perception."
                .to_string(),
        }
    } else if dist.negative > dist.positive {
        CoverageDifference {
            comparison: format!(
                "{} articles have negative sentiment, while {} are positive.",
                dist.negative, dist.positive
            ),
            impact: "The majority of coverage is negative, suggesting potential reputation issues."
                .to_string(),
        }
    } else {
        CoverageDifference {
            comparison: "Coverage is evenly split between positive and negative sentiment."
                .to_string(),
            impact: "Mixed reception in the media with no clear sentiment trend.".to_string(),
        }
    }
}

fn themes_statement(common: &[String]) -> CoverageDifference {
    let named: Vec<&str> = common.iter().take(3).map(String::as_str).collect();
    CoverageDifference {
        comparison: format!(
            "Common themes across articles include {}.",
            named.join(", ")
        ),
        impact: "These recurring themes represent the main public discussion points about the company."
            .to_string(),
    }
}

fn pair_statement(
    i: usize,
    sent_a: &SentimentResult,
    topics_a: &TopicSet,
    j: usize,
    sent_b: &SentimentResult,
    topics_b: &TopicSet,
) -> CoverageDifference {
    let comparison = format!(
        "Article {} focuses on {} with {} tone, while Article {} focuses on {} with {} tone.",
        i + 1,
        focus(topics_a),
        sent_a.label,
        j + 1,
        focus(topics_b),
        sent_b.label,
    );

    let shared: Vec<&str> = topics_a
        .keywords
        .iter()
        .filter(|k| topics_b.keywords.contains(k))
        .map(String::as_str)
        .collect();
    let same_tone = sent_a.label == sent_b.label;

    let impact = match (shared.is_empty(), same_tone) {
        (false, true) => format!("Both articles cover {} and agree in tone.", shared.join(", ")),
        (false, false) => format!(
            "Both articles cover {} but reach different conclusions.",
            shared.join(", ")
        ),
        (true, true) => format!(
            "The articles cover different ground with a consistently {} tone.",
            sent_a.label
        ),
        (true, false) => {
            "The articles differ in both focus and tone, widening the overall picture.".to_string()
        }
    };

    CoverageDifference { comparison, impact }
}

fn focus(topics: &TopicSet) -> String {
    if topics.keywords.is_empty() {
        return "general news".to_string();
    }
    topics
        .keywords
        .iter()
        .take(TOPICS_PER_STATEMENT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn overall_assessment(dist: &SentimentDistribution, dominant: SentimentLabel) -> String {
    let total = dist.total();
    match dominant {
        SentimentLabel::Positive => format!(
            "Coverage is predominantly positive ({}/{} articles). Suggests favorable public perception.",
            dist.positive, total
        ),
        SentimentLabel::Negative => format!(
            "Coverage is predominantly negative ({}/{} articles). May indicate challenges or controversies.",
            dist.negative, total
        ),
        SentimentLabel::Neutral => format!(
            "Coverage is mostly neutral ({}/{} articles). Suggests factual reporting with limited emotional content.",
            dist.neutral, total
        ),
    }
}
