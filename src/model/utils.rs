use std::path::Path;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};

use super::error::ModelError;

/// File names expected inside a model directory.
pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Loads `tokenizer.json` from `model_dir`, truncating to `max_len` tokens and
/// padding each batch to its longest member.
pub fn load_tokenizer(model_dir: &Path, max_len: usize) -> Result<Tokenizer, ModelError> {
    let tokenizer_path = model_dir.join(TOKENIZER_FILE);
    let mut tokenizer =
        Tokenizer::from_file(&tokenizer_path).map_err(|e| ModelError::ModelLoadFailed {
            reason: format!(
                "failed to read tokenizer {}: {}",
                tokenizer_path.display(),
                e
            ),
        })?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| ModelError::InvalidConfig {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    tokenizer.with_padding(Some(PaddingParams::default()));

    Ok(tokenizer)
}

/// Checks that every file a classifier directory needs is present.
pub fn ensure_model_files(model_dir: &Path) -> Result<(), ModelError> {
    if !model_dir.is_dir() {
        return Err(ModelError::ModelNotFound {
            path: model_dir.to_path_buf(),
        });
    }

    for name in [CONFIG_FILE, WEIGHTS_FILE, TOKENIZER_FILE] {
        if !model_dir.join(name).is_file() {
            return Err(ModelError::ModelLoadFailed {
                reason: format!("missing {} in {}", name, model_dir.display()),
            });
        }
    }

    Ok(())
}
