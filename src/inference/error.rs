use std::path::PathBuf;
use thiserror::Error;

use crate::model::ModelError;
use crate::scoring::ScoringError;

/// Failures of the inference gateway.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// `predict` was called before a successful `load`.
    #[error("model not loaded, call load() first")]
    NotLoaded,

    /// The configured model resource does not exist.
    #[error("model resource not found at {path}")]
    ResourceNotFound { path: PathBuf },

    /// Construction or warm-up of the model failed.
    #[error("failed to load sentiment analysis model: {0}")]
    ModelLoad(#[source] ModelError),

    /// Invocation or output extraction failed.
    #[error("failed to analyze sentiment: {0}")]
    Prediction(#[source] ModelError),

    #[error(transparent)]
    InvalidThreshold(#[from] ScoringError),
}

impl InferenceError {
    /// True when the gateway cannot serve predictions at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            InferenceError::NotLoaded
                | InferenceError::ResourceNotFound { .. }
                | InferenceError::ModelLoad(_)
        )
    }
}
