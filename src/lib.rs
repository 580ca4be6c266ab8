// Newscast: company news sentiment analysis with spoken summaries
//
// This is the library root. Each module corresponds to one stage of the
// analysis pipeline or to the plumbing around it.

pub mod comparison;
pub mod config;
pub mod db;
pub mod error;
pub mod narration;
pub mod news;
pub mod output;
pub mod pipeline;
pub mod rate_limiter;
pub mod sentiment;
pub mod status;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;

pub use error::AnalysisError;
pub use pipeline::Analyzer;
