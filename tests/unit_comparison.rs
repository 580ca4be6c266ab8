// Aggregation properties: purity, distribution totals, statement layout.

use newscast::comparison::{aggregate, SentimentDistribution};
use newscast::sentiment::{SentimentLabel, SentimentResult};
use newscast::topics::TopicSet;

fn sentiment(url: &str, label: SentimentLabel) -> SentimentResult {
    SentimentResult {
        article_url: url.to_string(),
        label,
        confidence: 0.9,
    }
}

fn topics(url: &str, keywords: &[&str]) -> TopicSet {
    TopicSet {
        article_url: url.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

fn acme_inputs() -> (Vec<SentimentResult>, Vec<TopicSet>) {
    use SentimentLabel::*;
    let labels = [Positive, Positive, Negative, Neutral, Positive];
    let keywords: [&[&str]; 5] = [
        &["robots", "revenue", "quarter"],
        &["revenue", "shares", "analysts"],
        &["lawsuit", "patent", "robots"],
        &["factory", "ohio", "jobs"],
        &["shares", "revenue", "record"],
    ];
    let sentiments = labels
        .iter()
        .enumerate()
        .map(|(i, l)| sentiment(&format!("https://n.example/{i}"), *l))
        .collect();
    let topic_sets = keywords
        .iter()
        .enumerate()
        .map(|(i, k)| topics(&format!("https://n.example/{i}"), k))
        .collect();
    (sentiments, topic_sets)
}

#[test]
fn empty_input_has_no_summary() {
    assert!(aggregate(&[], &[]).is_none());
}

#[test]
fn distribution_matches_labels_and_sums_to_article_count() {
    let (s, t) = acme_inputs();
    let summary = aggregate(&s, &t).unwrap();

    assert_eq!(
        summary.sentiment_distribution,
        SentimentDistribution {
            positive: 3,
            negative: 1,
            neutral: 1
        }
    );
    assert_eq!(summary.sentiment_distribution.total(), 5);
    assert_eq!(summary.articles_analyzed, 5);
    assert_eq!(summary.dominant_sentiment, SentimentLabel::Positive);
    assert!(summary
        .overall_assessment
        .starts_with("Coverage is predominantly positive (3/5 articles)"));
}

#[test]
fn aggregation_is_pure() {
    let (s, t) = acme_inputs();
    let first = aggregate(&s, &t).unwrap();
    let second = aggregate(&s, &t).unwrap();
    assert_eq!(first, second);
}

#[test]
fn common_topics_ranked_by_spread() {
    let (s, t) = acme_inputs();
    let summary = aggregate(&s, &t).unwrap();
    // revenue in 3 articles, robots and shares in 2 each (robots seen first)
    assert_eq!(summary.common_topics, vec!["revenue", "robots", "shares"]);
}

#[test]
fn statements_are_tone_then_themes_then_every_pair() {
    let (s, t) = acme_inputs();
    let summary = aggregate(&s, &t).unwrap();
    let diffs = &summary.coverage_differences;

    // 1 tone + 1 themes + C(5, 2) pairs
    assert_eq!(diffs.len(), 2 + 10);
    assert!(diffs[0].comparison.contains("3 articles have positive sentiment"));
    assert!(diffs[1]
        .comparison
        .starts_with("Common themes across articles include revenue, robots, shares"));
    assert!(diffs[2].comparison.starts_with("Article 1 focuses on robots, revenue, quarter with positive tone"));
    assert!(diffs[2].comparison.contains("Article 2 focuses on revenue, shares, analysts with positive tone"));
    assert!(diffs[2].impact.contains("revenue"));
    assert!(diffs.last().unwrap().comparison.starts_with("Article 4 "));
    assert!(diffs.last().unwrap().comparison.contains("Article 5 "));
}

#[test]
fn single_article_has_no_pair_statements() {
    let s = vec![sentiment("u", SentimentLabel::Negative)];
    let t = vec![topics("u", &["recall"])];
    let summary = aggregate(&s, &t).unwrap();

    assert_eq!(summary.dominant_sentiment, SentimentLabel::Negative);
    assert_eq!(summary.common_topics, vec!["recall"]);
    // tone + themes, no pairs
    assert_eq!(summary.coverage_differences.len(), 2);
    assert!(summary.coverage_differences[0]
        .comparison
        .contains("1 articles have negative sentiment"));
}

#[test]
fn even_split_is_reported_as_mixed() {
    let s = vec![
        sentiment("a", SentimentLabel::Positive),
        sentiment("b", SentimentLabel::Negative),
    ];
    let t = vec![topics("a", &["chips"]), topics("b", &["tariffs"])];
    let summary = aggregate(&s, &t).unwrap();

    assert!(summary.common_topics.is_empty());
    assert_eq!(summary.coverage_differences.len(), 2);
    assert!(summary.coverage_differences[0].comparison.contains("evenly split"));
    assert!(summary.coverage_differences[1]
        .impact
        .contains("differ in both focus and tone"));
}
