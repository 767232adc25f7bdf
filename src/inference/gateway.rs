use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, error, info};

use super::error::InferenceError;
use crate::constants::{DEFAULT_MODEL_ENDPOINT, DEFAULT_MODEL_PATH, WARMUP_INPUT};
use crate::model::{InferenceModel, ModelError, ModelLoader};
use crate::scoring::{DEFAULT_THRESHOLD, Prediction, validate_threshold};

/// Settings the gateway needs to load and score.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    /// Model resource location.
    pub model_path: PathBuf,
    /// Classification head the callable is bound to.
    pub model_endpoint: String,
    /// Decision boundary, within `(0, 1)`.
    pub threshold: f64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl GatewaySettings {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.model_endpoint = endpoint.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Owns the single model instance and turns its output into [`Prediction`]s.
///
/// The gateway starts unloaded. [`load`](Self::load) moves it to loaded, where
/// it stays for the rest of its life; there is no reload. Once loaded the model
/// is only read, so [`predict`](Self::predict) can run from many threads at once
/// without locking (see [`InferenceModel`] for the reentrancy contract).
///
/// Both operations are blocking and CPU-bound. Async callers should run them on
/// a blocking thread.
pub struct InferenceGateway<L: ModelLoader> {
    loader: L,
    settings: GatewaySettings,
    model: OnceLock<L::Model>,
}

impl<L: ModelLoader> std::fmt::Debug for InferenceGateway<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceGateway")
            .field("settings", &self.settings)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl<L: ModelLoader> InferenceGateway<L> {
    /// Creates an unloaded gateway. Fails if the threshold is outside `(0, 1)`.
    pub fn new(loader: L, settings: GatewaySettings) -> Result<Self, InferenceError> {
        validate_threshold(settings.threshold)?;
        Ok(Self {
            loader,
            settings,
            model: OnceLock::new(),
        })
    }

    /// Loads the model and runs one warm-up prediction.
    ///
    /// On failure the gateway stays unloaded. Calling this on a loaded gateway
    /// does nothing.
    pub fn load(&self) -> Result<(), InferenceError> {
        if self.is_loaded() {
            debug!("Model already loaded, skipping");
            return Ok(());
        }

        let path = &self.settings.model_path;
        if !path.exists() {
            error!(model_path = %path.display(), "Model resource not found");
            return Err(InferenceError::ResourceNotFound { path: path.clone() });
        }

        info!(
            model_path = %path.display(),
            endpoint = %self.settings.model_endpoint,
            "Loading model"
        );

        let model = self
            .loader
            .load(path, &self.settings.model_endpoint)
            .map_err(|e| {
                error!(error = %e, "Failed to load model");
                InferenceError::ModelLoad(e)
            })?;

        let warmup = run_single(&model, WARMUP_INPUT).map_err(|e| {
            error!(error = %e, "Model warm-up failed");
            InferenceError::ModelLoad(e)
        })?;
        debug!(probability = warmup, "Warm-up prediction complete");

        if self.model.set(model).is_err() {
            debug!("Model loaded concurrently, keeping the first instance");
        }

        info!(
            runtime = %self.runtime_version().unwrap_or_default(),
            "Model loaded successfully"
        );
        Ok(())
    }

    /// Classifies `text` and scores the result against the configured threshold.
    pub fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
        let model = self.model.get().ok_or(InferenceError::NotLoaded)?;

        let probability = run_single(model, text).map_err(|e| {
            error!(error = %e, "Prediction failed");
            InferenceError::Prediction(e)
        })?;

        let prediction = Prediction::from_probability(probability, self.settings.threshold);
        info!(
            sentiment = %prediction.sentiment,
            confidence = prediction.confidence,
            "Predicted sentiment"
        );

        Ok(prediction)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    pub fn threshold(&self) -> f64 {
        self.settings.threshold
    }

    /// Runtime identifier of the loaded model, `None` while unloaded.
    pub fn runtime_version(&self) -> Option<String> {
        self.model.get().map(|m| m.runtime_version())
    }
}

/// Runs the model on a one-element batch and extracts `outputs[0][0]`.
fn run_single<M: InferenceModel>(model: &M, text: &str) -> Result<f64, ModelError> {
    let outputs = model.forward(&[text])?;

    let probability = outputs
        .first()
        .and_then(|row| row.first())
        .copied()
        .ok_or_else(|| ModelError::InvalidOutput {
            reason: "model returned no output".to_string(),
        })?;

    if !probability.is_finite() {
        return Err(ModelError::InvalidOutput {
            reason: format!("non-finite probability {probability}"),
        });
    }

    Ok(f64::from(probability))
}
