//! HTTP client helpers for tests.

use sentiment::gateway::{ErrorResponse, PredictionRequest, PredictionResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    pub fn raw(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn predict(&self, text: &str) -> Result<PredictionResponse, TestClientError> {
        let request = PredictionRequest {
            text: text.to_string(),
        };
        let resp = self
            .client
            .post(self.url("/api/v1/predict-sentiment"))
            .json(&request)
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => Ok(resp.json().await?),
            status @ (400 | 415 | 422) => {
                Err(TestClientError::Rejected(status, resp.json().await?))
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn model_info(&self) -> Result<ModelInfo, TestClientError> {
        self.get_json("/api/v1/model-info").await
    }

    pub async fn health(&self) -> Result<Health, TestClientError> {
        self.get_json("/health").await
    }

    pub async fn root(&self) -> Result<Root, TestClientError> {
        self.get_json("/").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, TestClientError> {
        let resp = self.client.get(self.url(path)).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelInfo {
    pub model_loaded: bool,
    pub model_endpoint: String,
    pub confidence_threshold: f64,
    pub supported_sentiments: Vec<String>,
    pub max_text_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub runtime_version: Option<String>,
    pub model_loaded: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Root {
    pub message: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Request rejected with {0}: {1:?}")]
    Rejected(u16, ErrorResponse),
}
