//! Inference gateway: the single stateful model resource.
//!
//! [`InferenceGateway`] owns one loaded [`InferenceModel`](crate::model::InferenceModel)
//! and exposes a blocking `predict(text)` that applies the confidence transform
//! from [`crate::scoring`]. It is built and loaded once by the binary and shared
//! with request handlers through an `Arc`.

pub mod error;
pub mod gateway;


pub use error::InferenceError;
pub use gateway::{GatewaySettings, InferenceGateway};
