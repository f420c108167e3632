//! The trained urgency model and its metadata.
//!
//! A serialised [`TrainedModel`] is the whole model artifact:
//!
//! ```json
//! { "metadata": { "version": "rf_100_42", "features": [...], ... },
//!   "estimator": { "params": {...}, "trees": [...], ... } }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    FEATURE_NAMES, FeatureConfig, FeatureVector, MAX_WINDOW, ModelError, ModelResult, RandomForest,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub mse:          f64,
    pub r2:           f64,
    pub n_train:      usize,
    pub n_validation: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name:       String,
    pub importance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version:             String,
    pub trained_at:          DateTime<Utc>,
    pub feature_set:         String,
    /// Ordered feature names.  Authoritative for input layout.
    pub features:            Vec<String>,
    /// Effective aggregation window of the `mean_*`/`std_*` features.
    pub window:              usize,
    pub n_samples:           usize,
    pub validation:          ValidationMetrics,
    pub feature_importances: Vec<FeatureImportance>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    metadata:  ModelMetadata,
    estimator: RandomForest,
}

impl TrainedModel {
    /// Pair an estimator with its metadata.  Fails if the metadata lists a
    /// different number of features than the estimator was fitted on, the
    /// window is out of range, or a tree is structurally broken.
    pub fn new(metadata: ModelMetadata, estimator: RandomForest) -> ModelResult<Self> {
        let model = Self { metadata, estimator };
        model.check_consistent()?;
        Ok(model)
    }

    /// Parse an artifact and check it is internally consistent, down to
    /// every tree's split features and child indices.
    pub fn from_json_slice(bytes: &[u8]) -> ModelResult<Self> {
        let model: Self = serde_json::from_slice(bytes)?;
        model.check_consistent()?;
        Ok(model)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn estimator(&self) -> &RandomForest {
        &self.estimator
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// `Ok` iff the model's feature list equals `expected`, in order.
    pub fn check_features(&self, expected: &[&str]) -> ModelResult<()> {
        if self.metadata.features.iter().map(String::as_str).eq(expected.iter().copied()) {
            Ok(())
        } else {
            Err(ModelError::FeatureMismatch {
                expected: expected.iter().map(|s| s.to_string()).collect(),
                got:      self.metadata.features.clone(),
            })
        }
    }

    /// `Ok` iff the model was trained with the window `config` aggregates
    /// over.
    pub fn check_window(&self, config: &FeatureConfig) -> ModelResult<()> {
        let (expected, got) = (config.effective_window(), self.metadata.window);
        if expected == got {
            Ok(())
        } else {
            Err(ModelError::WindowMismatch { expected, got })
        }
    }

    /// Shorthand for `check_features(&FEATURE_NAMES)`.
    pub fn check_pipeline_features(&self) -> ModelResult<()> {
        self.check_features(&FEATURE_NAMES)
    }

    /// Raw (unclamped) prediction.
    pub fn predict(&self, features: &FeatureVector) -> ModelResult<f64> {
        self.estimator.predict(features.as_slice())
    }

    fn check_consistent(&self) -> ModelResult<()> {
        let (expected, got) = (self.estimator.n_features(), self.metadata.features.len());
        if expected != got {
            return Err(ModelError::FeatureLength { expected, got });
        }
        if !(1..=MAX_WINDOW).contains(&self.metadata.window) {
            return Err(ModelError::MalformedModel(format!(
                "window {} is outside 1..={MAX_WINDOW}",
                self.metadata.window
            )));
        }
        self.estimator.validate()
    }
}
