// Analysis pipeline: search, fetch, extract, classify, extract topics,
// aggregate, narrate, store.

pub mod analyzer;
pub mod cancel;

pub use analyzer::{validate_request, AnalysisOptions, Analyzer, DEFAULT_ARTICLES, MAX_ARTICLES};
pub use cancel::CancelToken;
