//! `br-model` — everything between raw readings and a servable urgency model.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`features`] | `FeaturePipeline`, `FeatureVector`, `FEATURE_NAMES`             |
//! | [`forest`]   | `RandomForest`, `ForestParams` (bootstrap-aggregated CART)      |
//! | [`metrics`]  | `mse`, `r2`                                                     |
//! | [`model`]    | `TrainedModel`, `ModelMetadata`, `ValidationMetrics`            |
//! | [`registry`] | `ModelRegistry` trait, `MemoryModelRegistry`, `FileModelRegistry` |
//! | [`error`]    | `ModelError`, `ModelResult<T>`                                  |
//!
//! Training itself lives in `br-scoring`, because the training target is the
//! rule-based urgency score.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Grow forest trees in parallel with Rayon.                   |

pub mod error;
pub mod features;
pub mod forest;
pub mod metrics;
pub mod model;
pub mod registry;


pub use error::{ModelError, ModelResult};
pub use features::{
    FEATURE_COUNT, FEATURE_NAMES, FEATURE_SET_VERSION, FeatureConfig, FeaturePipeline,
    FeatureRecord, FeatureVector, MAX_WINDOW,
};
pub use forest::{ForestParams, RandomForest};
pub use metrics::{mse, r2};
pub use model::{FeatureImportance, ModelMetadata, TrainedModel, ValidationMetrics};
pub use registry::{FileModelRegistry, MemoryModelRegistry, ModelRegistry, MODEL_FILE_NAME};
