// Sentiment scoring: trait-based abstraction for swappable classifiers.
//
// The SentimentClassifier trait defines the interface. The default backend
// runs DistilBERT SST-2 locally through ONNX Runtime; the hosted backend calls
// the same model on Hugging Face inference. The pipeline only sees the trait.

pub mod download;
pub mod huggingface;
pub mod onnx;
pub mod traits;

pub use traits::{Classification, SentimentClassifier, SentimentLabel, SentimentResult};
