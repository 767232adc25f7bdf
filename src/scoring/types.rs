use serde::{Deserialize, Serialize};

use super::confidence::confidence;

/// Labels the service can emit, in the order reported by `/api/v1/model-info`.
pub const SUPPORTED_SENTIMENTS: [&str; 2] = ["positive", "negative"];

/// Binary sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Applies the decision rule. A probability exactly at the threshold is positive.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Decided label.
    pub sentiment: Sentiment,
    /// Raw model output, `P(positive)`.
    pub probability: f64,
    /// Threshold-relative confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    /// Scores a raw probability against `threshold`.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        Self {
            sentiment: Sentiment::from_probability(probability, threshold),
            probability,
            confidence: confidence(probability, threshold),
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (confidence: {:.4})", self.sentiment, self.confidence)
    }
}
