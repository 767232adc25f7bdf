//! Cross-cutting, shared constants.

/// Service version reported by the health endpoints.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_NAME: &str = "Sentiment Analysis API";

pub const PROJECT_DESCRIPTION: &str = "A REST API for sentiment analysis using a pre-trained \
    Transformer model. Classifies text as positive or negative sentiment with confidence scores.";

/// Maximum accepted input length, in characters, before trimming.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Input used for the load-time warm-up call.
pub const WARMUP_INPUT: &str = "This is a test";

pub const DEFAULT_MODEL_PATH: &str = "models/sentiment_analysis_serve_model";

/// Name of the classification head inside the model weights.
pub const DEFAULT_MODEL_ENDPOINT: &str = "classifier";

/// Tokenizer truncation length for BERT-family encoders.
pub const MAX_SEQ_LEN: usize = 512;

pub const RUNTIME_NAME: &str = "candle";

/// Keep in sync with the `candle-core` requirement in Cargo.toml.
pub const RUNTIME_VERSION: &str = "0.9";
