// Article extraction: raw HTML in, plain-text Article out.
//
// Content selection is heuristic: paragraphs inside containers whose class
// looks like an article body, falling back to every paragraph on the page.
// Pages whose body text is too short to be an article (paywalls, listings,
// consent walls) are discarded.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use super::article::Article;
use crate::output::truncate_chars;

/// Extracted body text must be longer than this many characters.
pub const MIN_BODY_CHARS: usize = 100;

/// Sentences kept in an article summary.
const SUMMARY_SENTENCES: usize = 3;
/// Hard cap on summary length, including the "..." suffix.
const SUMMARY_MAX_CHARS: usize = 300;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("static selector"));
static CONTAINERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article[class], div[class]").expect("static selector"));
static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("static selector"));
static PUBLISHED_META: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="article:published_time"]"#).expect("static selector")
});
static TIME_ATTR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").expect("static selector"));
static DATE_CANDIDATES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("time[class], span[class], p[class], div[class]").expect("static selector")
});

static CONTENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(article|content|story|body)").expect("static regex"));
static DATE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(date|time|published)").expect("static regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Elements whose text is never part of the article body.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Why a fetched page did not become an Article.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionDiscard {
    #[error("body text too short ({chars} chars, need more than {MIN_BODY_CHARS})")]
    BodyTooShort { chars: usize },
}

/// Parse a page into an Article, or say why it isn't one.
pub fn extract_article(
    html: &str,
    url: &str,
    retrieved_at: DateTime<Utc>,
) -> Result<Article, ExtractionDiscard> {
    let document = Html::parse_document(html);

    let body = extract_body(&document);
    let chars = body.chars().count();
    if chars <= MIN_BODY_CHARS {
        return Err(ExtractionDiscard::BodyTooShort { chars });
    }

    Ok(Article {
        url: url.to_string(),
        title: extract_title(&document),
        summary: summarize(&body),
        source: source_host(url),
        published: extract_published(&document),
        retrieved_at,
        body,
    })
}

fn extract_title(document: &Html) -> String {
    [&*TITLE, &*HEADING]
        .into_iter()
        .filter_map(|sel| document.select(sel).next())
        .map(|el| collapse_whitespace(&visible_text(el)))
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Collect paragraph text from article-like containers, each paragraph once.
fn extract_body(document: &Html) -> String {
    let mut seen = HashSet::new();
    let mut paragraphs = Vec::new();

    let containers = document.select(&CONTAINERS).filter(|el| {
        el.value()
            .attr("class")
            .is_some_and(|class| CONTENT_CLASS.is_match(class))
    });
    for container in containers {
        for p in container.select(&PARAGRAPH) {
            if seen.insert(p.id()) {
                paragraphs.push(visible_text(p));
            }
        }
    }

    if paragraphs.is_empty() {
        paragraphs = document.select(&PARAGRAPH).map(visible_text).collect();
    }

    collapse_whitespace(&paragraphs.join(" "))
}

fn extract_published(document: &Html) -> Option<String> {
    if let Some(meta) = document.select(&PUBLISHED_META).next() {
        if let Some(content) = meta.value().attr("content").map(str::trim) {
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }

    if let Some(time) = document.select(&TIME_ATTR).next() {
        if let Some(dt) = time.value().attr("datetime").map(str::trim) {
            if !dt.is_empty() {
                return Some(dt.to_string());
            }
        }
    }

    document
        .select(&DATE_CANDIDATES)
        .find(|el| {
            el.value()
                .attr("class")
                .is_some_and(|class| DATE_CLASS.is_match(class))
        })
        .map(|el| collapse_whitespace(&visible_text(el)))
        .filter(|t| !t.is_empty())
}

/// Text content of an element, skipping script/style descendants.
fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|a| a.id() != el.id())
            .any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
            });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// First few sentences of the body, capped in length.
pub fn summarize(body: &str) -> String {
    let mut end = body.len();
    let mut sentences = 0;
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            sentences += 1;
            if sentences == SUMMARY_SENTENCES {
                end = i + c.len_utf8();
                break;
            }
        }
    }

    let summary = body[..end].trim();
    if summary.chars().count() > SUMMARY_MAX_CHARS {
        truncate_chars(summary, SUMMARY_MAX_CHARS - 3)
    } else {
        summary.to_string()
    }
}

/// Publisher host for display, without a leading "www.".
pub fn source_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_keeps_three_sentences() {
        let body = "One. Two! Three? Four.";
        assert_eq!(summarize(body), "One. Two! Three?");
    }

    #[test]
    fn test_summarize_ignores_decimal_points() {
        let body = "Revenue rose 4.5 percent. Margins held. Shares rose. Analysts cheered.";
        assert_eq!(
            summarize(body),
            "Revenue rose 4.5 percent. Margins held. Shares rose."
        );
    }

    #[test]
    fn test_summarize_caps_length() {
        let body = "word ".repeat(200);
        let summary = summarize(&body);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_source_host_strips_www() {
        assert_eq!(source_host("https://www.reuters.com/business/x"), "reuters.com");
        assert_eq!(source_host("not a url"), "unknown");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
