//! Fitting the urgency model.
//!
//! The training target for each node is the rule score of its newest reading,
//! so the forest learns to reproduce (and smooth over history) the rule
//! formula from the richer feature set.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use br_core::{GeoPoint, Node, ReadingHistory, StreamRng};
use br_model::{
    FEATURE_NAMES, FEATURE_SET_VERSION, FeatureConfig, FeatureImportance, FeaturePipeline,
    FeatureVector, ForestParams, ModelError, ModelMetadata, ModelRegistry, RandomForest,
    TrainedModel, ValidationMetrics, mse, r2,
};

use crate::{ScoringError, ScoringResult, UrgencyWeights, rule_score};

/// RNG stream for the train/validation shuffle; tree streams start at 0.
const SHUFFLE_STREAM: u64 = u64::MAX;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub forest:              ForestParams,
    /// Fewer usable records than this is an error.
    pub min_samples:         usize,
    /// At or above this many records, hold out a validation split; below it,
    /// validate on the training set.
    pub split_threshold:     usize,
    pub validation_fraction: f64,
    /// Location distances are measured from.  `None` uses the centroid of
    /// the placed nodes.
    pub reference:           Option<GeoPoint>,
    pub window:              usize,
    /// Weights of the rule formula that produces the targets.
    pub weights:             UrgencyWeights,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            forest:              ForestParams::default(),
            min_samples:         5,
            split_threshold:     10,
            validation_fraction: 0.2,
            reference:           None,
            window:              FeatureConfig::default().window,
            weights:             UrgencyWeights::default(),
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> ScoringResult<()> {
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(ScoringError::Config(format!(
                "validation_fraction must be in (0, 1), got {}",
                self.validation_fraction
            )));
        }
        if self.forest.n_estimators == 0 {
            return Err(ScoringError::Config("n_estimators must be positive".into()));
        }
        self.weights.validate()
    }

    /// `rf_{n_estimators}_{seed}`
    pub fn model_version(&self) -> String {
        format!("rf_{}_{}", self.forest.n_estimators, self.forest.seed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Fit a model on the newest readings of `nodes`.
    pub fn train(&self, nodes: &[Node], history: &ReadingHistory) -> ScoringResult<TrainedModel> {
        let cfg = &self.config;
        cfg.validate()?;

        let reference = cfg.reference.unwrap_or_else(|| centroid(nodes));
        let pipeline = FeaturePipeline::new(FeatureConfig { window: cfg.window });

        let extracted = pipeline.extract(nodes, history, reference);
        let extracted_len = extracted.len();
        let records: Vec<_> = extracted.into_iter().filter(|r| r.features.is_finite()).collect();
        if records.len() < extracted_len {
            debug!(dropped = extracted_len - records.len(), "skipping records with non-finite features");
        }

        let n = records.len();
        if n < cfg.min_samples.max(1) {
            return Err(ModelError::InsufficientData { needed: cfg.min_samples.max(1), got: n }.into());
        }

        let rows: Vec<FeatureVector> = records.iter().map(|r| r.features).collect();
        let targets: Vec<f64> = records
            .iter()
            .map(|r| rule_score(&cfg.weights, r.distance, &r.latest))
            .collect();

        let (train_idx, valid_idx) = self.split(n);
        let pick = |idx: &[usize]| -> (Vec<FeatureVector>, Vec<f64>) {
            (idx.iter().map(|&i| rows[i]).collect(), idx.iter().map(|&i| targets[i]).collect())
        };
        let (train_x, train_y) = pick(&train_idx);
        let (valid_x, valid_y) = pick(&valid_idx);

        let forest = RandomForest::fit(&train_x, &train_y, &cfg.forest)?;
        let predicted = valid_x
            .iter()
            .map(|x| forest.predict(x.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;

        let validation = ValidationMetrics {
            mse:          mse(&valid_y, &predicted),
            r2:           r2(&valid_y, &predicted),
            n_train:      train_idx.len(),
            n_validation: valid_idx.len(),
        };
        let feature_importances = FEATURE_NAMES
            .iter()
            .zip(forest.feature_importances())
            .map(|(name, &importance)| FeatureImportance { name: name.to_string(), importance })
            .collect();

        let metadata = ModelMetadata {
            version: cfg.model_version(),
            trained_at: Utc::now(),
            feature_set: FEATURE_SET_VERSION.to_string(),
            features: FeaturePipeline::feature_names(),
            window: pipeline.config().effective_window(),
            n_samples: n,
            validation,
            feature_importances,
        };
        info!(
            version = %metadata.version,
            n_samples = n,
            mse = metadata.validation.mse,
            r2 = metadata.validation.r2,
            "model trained"
        );
        Ok(TrainedModel::new(metadata, forest)?)
    }

    /// Train, then store the result as the registry's current model.
    pub fn train_and_publish(
        &self,
        nodes:    &[Node],
        history:  &ReadingHistory,
        registry: &dyn ModelRegistry,
    ) -> ScoringResult<Arc<TrainedModel>> {
        let model = self.train(nodes, history)?;
        Ok(registry.put(model)?)
    }

    /// `(train, validation)` index sets over `n` records.
    fn split(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let cfg = &self.config;
        let all: Vec<usize> = (0..n).collect();
        if n < cfg.split_threshold.max(2) {
            return (all.clone(), all);
        }
        let mut shuffled = all;
        StreamRng::new(cfg.forest.seed, SHUFFLE_STREAM).shuffle(&mut shuffled);
        let n_valid = ((n as f64 * cfg.validation_fraction).round() as usize).clamp(1, n - 1);
        let valid = shuffled[..n_valid].to_vec();
        let train = shuffled[n_valid..].to_vec();
        (train, valid)
    }
}

/// Mean position of the placed nodes; the origin if none are placed.
fn centroid(nodes: &[Node]) -> GeoPoint {
    let placed: Vec<GeoPoint> = nodes.iter().filter(|n| n.is_placed()).map(Node::position).collect();
    if placed.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let k = placed.len() as f64;
    GeoPoint::new(
        placed.iter().map(|p| p.lat).sum::<f64>() / k,
        placed.iter().map(|p| p.lon).sum::<f64>() / k,
    )
}
