// Frequency-based keyword extraction.
//
// Tokenize, drop stopwords and noise tokens, count, and keep the K most
// frequent. Ties are broken by first occurrence so the output is stable for
// a given text.

use std::collections::{HashMap, HashSet};

use stop_words::{get, LANGUAGE};

use super::traits::TopicExtractor;

/// Default number of keywords kept per article.
pub const DEFAULT_TOP_K: usize = 5;

/// Tokens this short carry no topical signal.
const MIN_TOKEN_CHARS: usize = 3;

/// News boilerplate that the general English list doesn't cover.
const EXTRA_STOPWORDS: [&str; 12] = [
    "said", "says", "according", "also", "would", "could", "year", "years", "new", "one",
    "percent", "reuters",
];

/// Keyword extractor based on raw term frequency.
pub struct FrequencyExtractor {
    /// How many keywords to keep
    pub top_k: usize,
    stopwords: HashSet<String>,
}

impl FrequencyExtractor {
    pub fn new(top_k: usize) -> Self {
        let mut stopwords: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stopwords.extend(EXTRA_STOPWORDS.iter().map(|s| s.to_string()));
        Self { top_k, stopwords }
    }

    /// Whether a token would be filtered as a stopword.
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lowercased content tokens in text order, stopwords and noise removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !(c.is_alphanumeric() || is_apostrophe(c)))
            .map(|word| word.trim_matches(is_apostrophe))
            .filter(|word| !word.is_empty())
            .map(normalize_token)
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|t| !t.chars().all(char::is_numeric))
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }
}

impl Default for FrequencyExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl TopicExtractor for FrequencyExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        // token -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (pos, token) in self.tokenize(text).into_iter().enumerate() {
            counts.entry(token).or_insert((0, pos)).0 += 1;
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(self.top_k)
            .map(|(token, _, _)| token)
            .collect()
    }
}

/// Apostrophes may sit inside a word ("l'oréal") but never at its edges.
fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '’')
}

/// Fold curly apostrophes and strip a trailing possessive.
fn normalize_token(raw: &str) -> String {
    let token = raw.replace('’', "'");
    match token.strip_suffix("'s") {
        Some(stem) => stem.to_string(),
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_by_frequency() {
        let extractor = FrequencyExtractor::new(3);
        let text = "Battery battery battery. Factory factory. Lithium.";
        assert_eq!(extractor.extract(text), vec!["battery", "factory", "lithium"]);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let extractor = FrequencyExtractor::new(5);
        let text = "zebra apple mango";
        assert_eq!(extractor.extract(text), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_possessive_folds_into_stem() {
        let extractor = FrequencyExtractor::new(1);
        let text = "Tesla's factory. Tesla expands. Tesla’s margins.";
        assert_eq!(extractor.extract(text), vec!["tesla"]);
    }

    #[test]
    fn test_numbers_and_short_tokens_dropped() {
        let extractor = FrequencyExtractor::default();
        let topics = extractor.extract("2024 2024 2024 ai ai ai chips");
        assert_eq!(topics, vec!["chips"]);
    }

    #[test]
    fn test_accented_words_stay_whole() {
        let extractor = FrequencyExtractor::default();
        let text = "Nestlé Nestlé Nestlé chocolate. Société Générale Société Générale banking.";
        assert_eq!(
            extractor.extract(text),
            vec!["nestlé", "société", "générale", "chocolate", "banking"]
        );
    }

    #[test]
    fn test_quotes_are_not_part_of_tokens() {
        let extractor = FrequencyExtractor::default();
        assert_eq!(extractor.extract("'L'Oréal' cosmetics"), vec!["l'oréal", "cosmetics"]);
    }

    #[test]
    fn test_empty_text_yields_no_topics() {
        let extractor = FrequencyExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("the and of it").is_empty());
    }
}
