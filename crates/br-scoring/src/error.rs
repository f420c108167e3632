use br_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("invalid urgency weights: {0}")]
    InvalidWeights(String),

    #[error("invalid trainer configuration: {0}")]
    Config(String),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
