//! Sentiment analysis library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Scoring
//! - [`confidence`], [`round_confidence`] - Threshold-relative confidence transform
//! - [`Prediction`], [`Sentiment`] - Scored classification results
//!
//! ## Model Runtime
//! - [`InferenceModel`], [`ModelLoader`] - The opaque callable and how it is produced
//! - [`BertLoader`], [`BertSentimentModel`] - Candle sequence classifier
//!
//! ## Inference
//! - [`InferenceGateway`], [`GatewaySettings`] - Load-once model ownership and `predict`
//!
//! ## HTTP
//! - [`gateway::create_router_with_state`] - Axum router for the public endpoints
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod gateway;
pub mod inference;
pub mod model;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use constants::{MAX_TEXT_LENGTH, PROJECT_NAME, VERSION};
pub use inference::{GatewaySettings, InferenceError, InferenceGateway};
#[cfg(any(test, feature = "mock"))]
pub use model::{MockBehavior, MockLoader, MockModel};
pub use model::{BertLoader, BertSentimentModel, HeadSpec, InferenceModel, ModelError, ModelLoader};
pub use scoring::{
    DEFAULT_THRESHOLD, Prediction, ScoringError, Sentiment, confidence, round_confidence,
};
