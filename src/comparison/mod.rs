// Comparative analysis: combine per-article sentiment and topics into one
// company-level summary. Deterministic and free of I/O.

pub mod summary;

pub use summary::{aggregate, ComparativeSummary, CoverageDifference, SentimentDistribution};
