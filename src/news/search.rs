// Search result parsing: pull candidate article URLs out of a news search page.
//
// Result blocks are `div.SoaBEf`; the first anchor in each block points at the
// article, usually through a `/url?q=<target>&sa=...` redirect. When the page
// has no result blocks (markup drift, consent pages) we fall back to any
// redirect anchor on the page.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

static RESULT_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.SoaBEf").expect("static selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static REDIRECT_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="/url?"]"#).expect("static selector"));

/// Extract up to `limit` distinct article URLs from a search results page,
/// preserving result order.
pub fn parse_search_results(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut hrefs: Vec<&str> = document
        .select(&RESULT_BLOCK)
        .filter_map(|block| block.select(&ANCHOR).next())
        .filter_map(|a| a.value().attr("href"))
        .collect();

    if hrefs.is_empty() {
        hrefs = document
            .select(&REDIRECT_ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .collect();
    }

    let mut seen = HashSet::new();
    hrefs
        .into_iter()
        .filter_map(resolve_result_href)
        .filter(|u| seen.insert(u.clone()))
        .take(limit)
        .collect()
}

/// Turn a result href into the article URL it points at.
///
/// Returns None for search-engine-internal links.
pub fn resolve_result_href(href: &str) -> Option<String> {
    let target = if href.starts_with("/url?") {
        let base = Url::parse("https://www.google.com/").ok()?;
        let redirect = base.join(href).ok()?;
        redirect
            .query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .map(|(_, v)| v.into_owned())?
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&target).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    let host = parsed.host_str()?;
    if host == "google.com" || host.ends_with(".google.com") {
        return None;
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_is_unwrapped() {
        let href = "/url?q=https://example.com/story%3Fid%3D7&sa=U&ved=abc";
        assert_eq!(
            resolve_result_href(href).as_deref(),
            Some("https://example.com/story?id=7")
        );
    }

    #[test]
    fn test_internal_links_are_dropped() {
        assert!(resolve_result_href("/search?q=acme&tbm=nws").is_none());
        assert!(resolve_result_href("https://www.google.com/preferences").is_none());
        assert!(resolve_result_href("javascript:void(0)").is_none());
    }

    #[test]
    fn test_absolute_links_kept() {
        assert_eq!(
            resolve_result_href("https://news.example.org/a").as_deref(),
            Some("https://news.example.org/a")
        );
    }
}
