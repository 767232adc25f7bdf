//! Deterministic in-process models for tests.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::ModelError;
use super::{InferenceModel, ModelLoader};

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "fantastic", "amazing", "love", "loved", "wonderful", "best",
    "brilliant", "enjoyed", "perfect", "awesome", "superb",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "hate", "hated", "boring", "poor", "waste",
    "disappointing", "dull", "annoying", "mediocre",
];

/// How a [`MockModel`] answers.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always returns this probability.
    Fixed(f32),
    /// Scores words against small positive/negative lexicons.
    Lexicon,
    /// Every call fails with this reason.
    Fail(String),
    /// Returns no output rows.
    EmptyOutput,
}

/// A model whose output is fully determined by its [`MockBehavior`].
#[derive(Debug, Clone)]
pub struct MockModel {
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
}

impl MockModel {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `forward` invocations so far, warm-up included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Lexicon probability: `0.5` for neutral text, moving toward `0` or `1`
    /// with each net negative or positive word.
    pub fn lexicon_probability(text: &str) -> f32 {
        let lower = text.to_lowercase();
        let (pos, neg) = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .fold((0i32, 0i32), |(pos, neg), word| {
                if POSITIVE_WORDS.contains(&word) {
                    (pos + 1, neg)
                } else if NEGATIVE_WORDS.contains(&word) {
                    (pos, neg + 1)
                } else {
                    (pos, neg)
                }
            });

        let net = (pos - neg) as f32;
        1.0 / (1.0 + (-1.5 * net).exp())
    }
}

impl InferenceModel for MockModel {
    fn forward(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Fixed(p) => Ok(batch.iter().map(|_| vec![*p]).collect()),
            MockBehavior::Lexicon => Ok(batch
                .iter()
                .map(|text| vec![Self::lexicon_probability(text)])
                .collect()),
            MockBehavior::Fail(reason) => Err(ModelError::InferenceFailed {
                reason: reason.clone(),
            }),
            MockBehavior::EmptyOutput => Ok(Vec::new()),
        }
    }

    fn runtime_version(&self) -> String {
        "mock".to_string()
    }
}

/// Hands out clones of one [`MockModel`], or fails to load.
///
/// Clones of the loaded model share the call counter, so tests can keep the
/// loader's [`model`](Self::model) handle to observe invocations.
#[derive(Debug, Clone)]
pub struct MockLoader {
    model: MockModel,
    load_failure: Option<String>,
}

impl MockLoader {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            model: MockModel::new(behavior),
            load_failure: None,
        }
    }

    pub fn fixed(probability: f32) -> Self {
        Self::new(MockBehavior::Fixed(probability))
    }

    pub fn lexicon() -> Self {
        Self::new(MockBehavior::Lexicon)
    }

    /// A loader whose `load` fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            model: MockModel::new(MockBehavior::Lexicon),
            load_failure: Some(reason.into()),
        }
    }

    pub fn model(&self) -> &MockModel {
        &self.model
    }
}

impl ModelLoader for MockLoader {
    type Model = MockModel;

    fn load(&self, _path: &Path, entry_point: &str) -> Result<Self::Model, ModelError> {
        if let Some(reason) = &self.load_failure {
            return Err(ModelError::ModelLoadFailed {
                reason: reason.clone(),
            });
        }
        if entry_point.is_empty() {
            return Err(ModelError::InvalidConfig {
                reason: "entry point cannot be empty".to_string(),
            });
        }
        Ok(self.model.clone())
    }
}
