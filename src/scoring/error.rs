use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("confidence threshold must be within (0, 1) exclusive, got {value}")]
    InvalidThreshold { value: f64 },
}
