//! HTTP gateway (Axum) in front of the inference gateway.
//!
//! Routes:
//! - `POST /api/v1/predict-sentiment`
//! - `GET /api/v1/model-info`
//! - `GET /` and `GET /health`

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::ApiError;
pub use handler::{model_info_handler, predict_sentiment_handler};
pub use payload::{
    ErrorResponse, HealthResponse, ModelInfoResponse, PredictionRequest, PredictionResponse,
    RootResponse,
};
pub use state::HandlerState;

use crate::constants::VERSION;
use crate::model::ModelLoader;

pub const API_PREFIX: &str = "/api/v1";

pub fn create_router_with_state<L: ModelLoader>(state: HandlerState<L>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let api = Router::new()
        .route("/predict-sentiment", post(predict_sentiment_handler::<L>))
        .route("/model-info", get(model_info_handler::<L>));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<L>))
        .nest(API_PREFIX, api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS policy.
///
/// A `*` entry allows any origin, method and header without credentials.
/// Otherwise only the listed origins are allowed, with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin.trim() == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[tracing::instrument]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse::default())
}

#[tracing::instrument(skip(state))]
pub async fn health_handler<L: ModelLoader>(State(state): State<HandlerState<L>>) -> Response {
    let model_loaded = state.gateway.is_loaded();

    let (status_code, status) = if model_loaded {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            version: VERSION,
            runtime_version: state.gateway.runtime_version(),
            model_loaded,
        }),
    )
        .into_response()
}
