//! Model runtime: the opaque classifier callable and its implementations.
//!
//! The service never looks inside the classifier. It only needs something that
//! maps a batch of texts to one row of outputs per text, with `P(positive)` in
//! the first slot. [`InferenceModel`] is that contract; [`ModelLoader`] builds
//! one from a model resource on disk.
//!
//! - [`bert`] runs Hugging Face BERT-family classifiers with candle.
//! - [`mock`] provides deterministic models for tests (feature `mock`).

/// Candle BERT sequence classifier.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Mock models for tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Model directory and tokenizer helpers.
pub mod utils;

#[cfg(test)]
mod tests;

pub use bert::{BertLoader, BertSentimentModel, HeadSpec};
pub use error::ModelError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBehavior, MockLoader, MockModel};

use std::path::Path;

/// A loaded classifier.
///
/// # Concurrency
///
/// Request handlers share one instance and call [`forward`](Self::forward)
/// concurrently through `&self` without any lock. Implementations must
/// therefore be safe for concurrent read-only invocation. A runtime that is not
/// reentrant has to serialize access internally.
pub trait InferenceModel: Send + Sync + 'static {
    /// Runs the classifier on `batch`, returning one output row per input.
    ///
    /// Slot `0` of each row is the probability that the input is positive.
    fn forward(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>, ModelError>;

    /// Human-readable runtime identifier, reported by the health endpoint.
    fn runtime_version(&self) -> String;
}

/// Builds an [`InferenceModel`] from a model resource.
pub trait ModelLoader: Send + Sync + 'static {
    type Model: InferenceModel;

    /// Constructs the classifier at `path`, bound to the head named `entry_point`.
    fn load(&self, path: &Path, entry_point: &str) -> Result<Self::Model, ModelError>;
}
