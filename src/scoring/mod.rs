//! Confidence scoring for binary sentiment predictions.
//!
//! The model produces a raw probability `P(positive)`. This module turns that
//! probability into a [`Sentiment`] label and a threshold-relative confidence.
//!
//! # Threshold Invariant
//!
//! Every function here assumes the decision threshold lies in the open
//! interval `(0, 1)`. The invariant is enforced once, when configuration is
//! validated (see [`validate_threshold`]), and is never re-checked per request.

pub mod confidence;
pub mod error;
pub mod types;


pub use confidence::{confidence, round_confidence, validate_threshold};
pub use error::ScoringError;
pub use types::{Prediction, SUPPORTED_SENTIMENTS, Sentiment};

/// Default decision boundary between negative and positive.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
