use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::constants::MAX_TEXT_LENGTH;
use crate::gateway::error::ApiError;
use crate::gateway::payload::{ModelInfoResponse, PredictionRequest, PredictionResponse};
use crate::gateway::state::HandlerState;
use crate::model::ModelLoader;

/// Applies the input constraints and returns the trimmed text.
///
/// Length is counted in characters on the raw input, before trimming.
pub(crate) fn validate_text(raw: &str) -> Result<String, ApiError> {
    let char_count = raw.chars().count();
    if char_count > MAX_TEXT_LENGTH {
        return Err(ApiError::Validation(format!(
            "Text must be at most {MAX_TEXT_LENGTH} characters, got {char_count}"
        )));
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(
            "Text cannot be empty or only whitespace".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// `POST /api/v1/predict-sentiment`
///
/// Inference runs on the blocking pool; the gateway call is CPU-bound and
/// never yields.
#[instrument(skip(state, payload), fields(text_len = tracing::field::Empty))]
pub async fn predict_sentiment_handler<L: ModelLoader>(
    State(state): State<HandlerState<L>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = payload?;
    let text = validate_text(&request.text)?;

    tracing::Span::current().record("text_len", text.chars().count());
    info!("Processing sentiment analysis request");

    let gateway = Arc::clone(&state.gateway);
    let input = text.clone();
    let prediction = tokio::task::spawn_blocking(move || gateway.predict(&input))
        .await
        .map_err(|e| ApiError::Internal(format!("prediction task failed: {e}")))??;

    info!(
        sentiment = %prediction.sentiment,
        confidence = prediction.confidence,
        "Successfully processed request"
    );

    Ok(Json(PredictionResponse::new(&prediction, text)))
}

/// `GET /api/v1/model-info`
#[instrument(skip(state))]
pub async fn model_info_handler<L: ModelLoader>(
    State(state): State<HandlerState<L>>,
) -> Json<ModelInfoResponse> {
    let gateway = &state.gateway;
    let settings = gateway.settings();

    Json(ModelInfoResponse::new(
        gateway.is_loaded(),
        settings.model_endpoint.clone(),
        settings.threshold,
    ))
}
