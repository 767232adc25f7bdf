use std::sync::Arc;

use crate::inference::InferenceGateway;
use crate::model::ModelLoader;

/// Shared state handed to every request handler.
pub struct HandlerState<L: ModelLoader> {
    pub gateway: Arc<InferenceGateway<L>>,

    pub allowed_origins: Arc<Vec<String>>,
}

impl<L: ModelLoader> Clone for HandlerState<L> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            allowed_origins: Arc::clone(&self.allowed_origins),
        }
    }
}

impl<L: ModelLoader> HandlerState<L> {
    pub fn new(gateway: Arc<InferenceGateway<L>>, allowed_origins: Vec<String>) -> Self {
        Self {
            gateway,
            allowed_origins: Arc::new(allowed_origins),
        }
    }

    /// State that allows any CORS origin.
    pub fn with_any_origin(gateway: Arc<InferenceGateway<L>>) -> Self {
        Self::new(gateway, vec!["*".to_string()])
    }
}
