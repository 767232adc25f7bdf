//! BERT sequence classifier executed with candle.
//!
//! A model directory holds `config.json`, `model.safetensors` and
//! `tokenizer.json`, as exported by Hugging Face for
//! `BertForSequenceClassification` checkpoints. Encoder weights live under
//! `bert.` or at the root. The configured entry point names the linear
//! classification head inside the weights (`classifier` by default).
//!
//! Other encoder families (RoBERTa, DistilBERT) use different embeddings,
//! weight names or heads and are not supported.

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::Path;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::device::{device_label, select_device};
use super::error::ModelError;
use super::utils::{CONFIG_FILE, WEIGHTS_FILE, ensure_model_files, load_tokenizer};
use super::{InferenceModel, ModelLoader};
use crate::constants::{MAX_SEQ_LEN, RUNTIME_NAME, RUNTIME_VERSION};

const BACKBONE_PREFIX: &str = "bert";

/// Rejects configs whose `model_type` names a non-BERT encoder.
///
/// A missing `model_type` is accepted; the weight layout is checked at load.
pub fn ensure_bert_config(config: &serde_json::Value) -> Result<(), ModelError> {
    match config.get("model_type").and_then(|v| v.as_str()) {
        None | Some("bert") => Ok(()),
        Some(other) => Err(ModelError::InvalidConfig {
            reason: format!("unsupported model type '{other}', expected 'bert'"),
        }),
    }
}

/// Shape of the classification head, read from `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadSpec {
    /// Output logits per input. One means a sigmoid head, two a softmax head.
    pub num_labels: usize,
    /// Logit index holding the positive class (softmax heads only).
    pub positive_index: usize,
}

impl HeadSpec {
    /// Reads `num_labels` / `id2label` from a Hugging Face config.
    ///
    /// Without either field the head is assumed to have two labels, which is
    /// the Hugging Face default. The positive index is the label whose name
    /// contains `pos`, else `1`.
    pub fn from_config(config: &serde_json::Value) -> Result<Self, ModelError> {
        let id2label = config.get("id2label").and_then(|v| v.as_object());

        let num_labels = config
            .get("num_labels")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .or_else(|| id2label.map(|m| m.len()))
            .unwrap_or(2);

        if !(1..=2).contains(&num_labels) {
            return Err(ModelError::InvalidConfig {
                reason: format!("expected a binary classifier, found {num_labels} labels"),
            });
        }

        let positive_index = id2label
            .and_then(|labels| {
                labels.iter().find_map(|(idx, name)| {
                    let name = name.as_str()?.to_ascii_lowercase();
                    if name.contains("pos") {
                        idx.parse::<usize>().ok()
                    } else {
                        None
                    }
                })
            })
            .unwrap_or(1);

        if num_labels == 2 && positive_index > 1 {
            return Err(ModelError::InvalidConfig {
                reason: format!("positive label index {positive_index} out of range"),
            });
        }

        Ok(Self {
            num_labels,
            positive_index,
        })
    }
}

struct SequenceClassifier {
    bert: BertModel,
    pooler: Option<Linear>,
    head: Linear,
}

impl SequenceClassifier {
    fn load(
        vb: VarBuilder,
        config: &BertConfig,
        entry_point: &str,
        num_labels: usize,
    ) -> Result<Self, ModelError> {
        let backbone =
            if vb.contains_tensor(&format!("{BACKBONE_PREFIX}.embeddings.word_embeddings.weight")) {
                vb.pp(BACKBONE_PREFIX)
            } else {
                vb.clone()
            };

        let bert = BertModel::load(backbone.clone(), config).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("failed to load encoder weights: {e}"),
            }
        })?;

        let hidden_size = config.hidden_size;
        let pooler = if backbone.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(
                hidden_size,
                hidden_size,
                backbone.pp("pooler").pp("dense"),
            )?)
        } else {
            None
        };

        if !vb.contains_tensor(&format!("{entry_point}.weight")) {
            return Err(ModelError::InvalidConfig {
                reason: format!("entry point '{entry_point}' not found in model weights"),
            });
        }
        let head = candle_nn::linear(hidden_size, num_labels, vb.pp(entry_point))?;

        Ok(Self { bert, pooler, head })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> candle_core::Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        let cls = hidden.i((.., 0, ..))?;
        let features = match &self.pooler {
            Some(pooler) => pooler.forward(&cls)?.tanh()?,
            None => cls,
        };
        self.head.forward(&features)
    }
}

/// Sentiment classifier returning `P(positive)` per input.
///
/// The forward pass only reads weights, so one instance can serve concurrent
/// callers through a shared reference.
pub struct BertSentimentModel {
    model: SequenceClassifier,
    tokenizer: Tokenizer,
    head: HeadSpec,
    device: Device,
}

impl std::fmt::Debug for BertSentimentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertSentimentModel")
            .field("device", &device_label(&self.device))
            .field("head", &self.head)
            .finish()
    }
}

impl BertSentimentModel {
    fn tensor_from_rows(&self, rows: Vec<&[u32]>) -> candle_core::Result<Tensor> {
        let rows = rows
            .into_iter()
            .map(|row| Tensor::new(row, &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        Tensor::stack(&rows, 0)
    }

    fn probabilities(&self, logits: &Tensor) -> candle_core::Result<Tensor> {
        if self.head.num_labels == 1 {
            candle_nn::ops::sigmoid(logits)
        } else {
            candle_nn::ops::softmax_last_dim(logits)?
                .i((.., self.head.positive_index))?
                .unsqueeze(1)
        }
    }
}

impl InferenceModel for BertSentimentModel {
    fn forward(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self.tokenizer.encode_batch(batch.to_vec(), true).map_err(|e| {
            ModelError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let input_ids = self.tensor_from_rows(encodings.iter().map(|e| e.get_ids()).collect())?;
        let type_ids =
            self.tensor_from_rows(encodings.iter().map(|e| e.get_type_ids()).collect())?;
        let attention_mask =
            self.tensor_from_rows(encodings.iter().map(|e| e.get_attention_mask()).collect())?;

        debug!(
            batch_size = batch.len(),
            seq_len = input_ids.dim(1)?,
            "Running classifier forward pass"
        );

        let logits = self
            .model
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| ModelError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let probabilities = self.probabilities(&logits)?;
        Ok(probabilities.to_vec2::<f32>()?)
    }

    fn runtime_version(&self) -> String {
        format!(
            "{} {} ({})",
            RUNTIME_NAME,
            RUNTIME_VERSION,
            device_label(&self.device)
        )
    }
}

/// Loads [`BertSentimentModel`]s from model directories.
#[derive(Debug, Clone)]
pub struct BertLoader {
    max_seq_len: usize,
}

impl Default for BertLoader {
    fn default() -> Self {
        Self {
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl BertLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelLoader for BertLoader {
    type Model = BertSentimentModel;

    fn load(&self, path: &Path, entry_point: &str) -> Result<Self::Model, ModelError> {
        ensure_model_files(path)?;

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device for classifier");

        let raw_config = std::fs::read_to_string(path.join(CONFIG_FILE))?;
        let config_json: serde_json::Value =
            serde_json::from_str(&raw_config).map_err(|e| ModelError::InvalidConfig {
                reason: format!("failed to parse {CONFIG_FILE}: {e}"),
            })?;
        ensure_bert_config(&config_json)?;
        let head = HeadSpec::from_config(&config_json)?;
        let bert_config: BertConfig =
            serde_json::from_value(config_json).map_err(|e| ModelError::InvalidConfig {
                reason: format!("unsupported encoder config: {e}"),
            })?;

        info!(
            model_path = %path.display(),
            entry_point,
            num_labels = head.num_labels,
            "Loading sentiment classifier"
        );

        let weights_path = path.join(WEIGHTS_FILE);
        // SAFETY: the weights file is opened read-only and must not be modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? };

        let model = SequenceClassifier::load(vb, &bert_config, entry_point, head.num_labels)?;
        // Positions past the embedding table would fail inside the encoder.
        let max_len = self.max_seq_len.min(bert_config.max_position_embeddings);
        let tokenizer = load_tokenizer(path, max_len)?;

        Ok(BertSentimentModel {
            model,
            tokenizer,
            head,
            device,
        })
    }
}
