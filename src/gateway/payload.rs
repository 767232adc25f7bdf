use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TEXT_LENGTH, PROJECT_NAME, VERSION};
use crate::scoring::{Prediction, SUPPORTED_SENTIMENTS, Sentiment, round_confidence};

/// Body of `POST /api/v1/predict-sentiment`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub text: String,
}

/// Successful prediction. `text` is the trimmed input that was analyzed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResponse {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub text: String,
}

impl PredictionResponse {
    pub fn new(prediction: &Prediction, text: String) -> Self {
        Self {
            sentiment: prediction.sentiment,
            confidence: round_confidence(prediction.confidence),
            text,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ModelInfoResponse {
    pub model_loaded: bool,
    pub model_endpoint: String,
    pub confidence_threshold: f64,
    pub supported_sentiments: [&'static str; 2],
    pub max_text_length: usize,
}

impl ModelInfoResponse {
    pub fn new(model_loaded: bool, model_endpoint: String, confidence_threshold: f64) -> Self {
        Self {
            model_loaded,
            model_endpoint,
            confidence_threshold,
            supported_sentiments: SUPPORTED_SENTIMENTS,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RootResponse {
    pub message: String,
    pub version: &'static str,
    pub status: &'static str,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: format!("{PROJECT_NAME} is running"),
            version: VERSION,
            status: "healthy",
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub runtime_version: Option<String>,
    pub model_loaded: bool,
}

/// Error body for every non-2xx response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: Option<String>,
}
