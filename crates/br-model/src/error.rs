use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("not enough training samples: need {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("model features {got:?} do not match the pipeline's {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got:      Vec<String>,
    },

    #[error("feature vector has {got} values, model expects {expected}")]
    FeatureLength { expected: usize, got: usize },

    #[error("feature {index} is not finite")]
    NonFiniteFeature { index: usize },

    #[error("model was trained with a {got}-reading window, pipeline uses {expected}")]
    WindowMismatch { expected: usize, got: usize },

    #[error("model has not been fitted")]
    NotFitted,

    #[error("malformed model: {0}")]
    MalformedModel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not replace model artifact: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type ModelResult<T> = Result<T, ModelError>;
