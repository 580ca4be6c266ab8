// Topic extraction: per-article keyword lists.

pub mod frequency;
pub mod traits;

pub use traits::{TopicExtractor, TopicSet};
