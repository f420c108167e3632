//! `UrgencyScorer`: model first, rules as the fallback.

use std::slice;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use br_core::urgency::clamp_unit;
use br_core::{GeoPoint, Node, NodeId, ReadingHistory, SensorSnapshot, UrgencyScores};
use br_model::{FeatureConfig, FeaturePipeline, ModelError, ModelRegistry, TrainedModel};

use crate::{ScoringResult, UrgencyWeights, rule_score};

/// Why the model could not produce a score.  Absorbed by the rule fallback.
#[derive(Debug, Error)]
pub enum ModelUnavailable {
    #[error("no model loaded")]
    NoModel,

    #[error("node has no readings")]
    NoReadings,

    #[error("prediction failed: {0}")]
    Prediction(#[from] ModelError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Model,
    Rules,
    /// The node had no readings and scores 0.0.
    NoReadings,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scored {
    pub value:  f64,
    pub source: ScoreSource,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedNode {
    pub node:   NodeId,
    pub score:  f64,
    pub source: ScoreSource,
}

/// Scores nodes against a reference location.
///
/// Cheap to clone; the model is shared behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct UrgencyScorer {
    weights:  UrgencyWeights,
    pipeline: FeaturePipeline,
    model:    Option<Arc<TrainedModel>>,
}

impl UrgencyScorer {
    /// Rules-only scorer.
    pub fn new(weights: UrgencyWeights) -> Self {
        Self { weights, pipeline: FeaturePipeline::default(), model: None }
    }

    /// Change the aggregation window.  An attached model trained with a
    /// different window is dropped, leaving the scorer rules-only.
    pub fn with_feature_config(mut self, config: FeatureConfig) -> Self {
        self.pipeline = FeaturePipeline::new(config);
        let mismatch = self
            .model
            .as_ref()
            .and_then(|m| m.check_window(&config).err().map(|e| (m.version().to_string(), e)));
        if let Some((version, e)) = mismatch {
            warn!(%version, error = %e, "detaching model trained with another window");
            self.model = None;
        }
        self
    }

    /// Attach `model`.  Fails if its feature list or aggregation window is
    /// not the pipeline's.
    pub fn with_model(mut self, model: Arc<TrainedModel>) -> ScoringResult<Self> {
        model.check_pipeline_features()?;
        model.check_window(self.pipeline.config())?;
        self.model = Some(model);
        Ok(self)
    }

    /// Scorer using whatever model `registry` currently holds.  A registry
    /// error or an incompatible model leaves the scorer rules-only.
    pub fn from_registry(
        weights:  UrgencyWeights,
        features: FeatureConfig,
        registry: &dyn ModelRegistry,
    ) -> Self {
        let scorer = Self::new(weights).with_feature_config(features);
        match registry.current() {
            Ok(Some(model)) => {
                let version = model.version().to_string();
                match scorer.clone().with_model(model) {
                    Ok(with_model) => with_model,
                    Err(e) => {
                        warn!(%version, error = %e, "ignoring incompatible model");
                        scorer
                    }
                }
            }
            Ok(None) => scorer,
            Err(e) => {
                warn!(error = %e, "model registry unavailable; scoring with rules only");
                scorer
            }
        }
    }

    pub fn weights(&self) -> &UrgencyWeights {
        &self.weights
    }

    pub fn model(&self) -> Option<&Arc<TrainedModel>> {
        self.model.as_ref()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    // ── single node ───────────────────────────────────────────────────────

    pub fn rule_score(&self, node: &Node, snapshot: &SensorSnapshot, reference: GeoPoint) -> f64 {
        rule_score(&self.weights, reference.distance_m(node.position()), snapshot)
    }

    /// Model prediction for `readings` (newest first), clamped to `[0, 1]`.
    pub fn try_model_score(
        &self,
        node:      &Node,
        readings:  &[SensorSnapshot],
        reference: GeoPoint,
    ) -> Result<f64, ModelUnavailable> {
        let model = self.model.as_ref().ok_or(ModelUnavailable::NoModel)?;
        let features = self
            .pipeline
            .vector_for(node, readings, reference)
            .ok_or(ModelUnavailable::NoReadings)?;
        Ok(clamp_unit(model.predict(&features)?))
    }

    /// Score from a single reading.
    pub fn score(&self, node: &Node, snapshot: &SensorSnapshot, reference: GeoPoint) -> f64 {
        self.score_history(node, slice::from_ref(snapshot), reference).value
    }

    /// Score from a reading history (newest first).
    pub fn score_history(
        &self,
        node:      &Node,
        readings:  &[SensorSnapshot],
        reference: GeoPoint,
    ) -> Scored {
        let Some(latest) = readings.first() else {
            return Scored { value: 0.0, source: ScoreSource::NoReadings };
        };

        match self.try_model_score(node, readings, reference) {
            Ok(value) => Scored { value, source: ScoreSource::Model },
            Err(reason) => {
                if self.model.is_some() {
                    debug!(node = %node.id, %reason, "model score unavailable; using rules");
                }
                Scored {
                    value:  self.rule_score(node, latest, reference),
                    source: ScoreSource::Rules,
                }
            }
        }
    }

    // ── node sets ─────────────────────────────────────────────────────────

    /// Score and source for every node, in `nodes` order.
    pub fn score_each(
        &self,
        nodes:     &[Node],
        history:   &ReadingHistory,
        reference: GeoPoint,
    ) -> Vec<RankedNode> {
        nodes
            .iter()
            .map(|n| {
                let s = self.score_history(n, history.readings(n.id), reference);
                RankedNode { node: n.id, score: s.value, source: s.source }
            })
            .collect()
    }

    /// Score for every node; nodes without readings score 0.0.
    pub fn score_all(
        &self,
        nodes:     &[Node],
        history:   &ReadingHistory,
        reference: GeoPoint,
    ) -> UrgencyScores {
        self.score_each(nodes, history, reference)
            .into_iter()
            .map(|r| (r.node, r.score))
            .collect()
    }

    /// Nodes with readings, most urgent first, at most `max_results` of them.
    /// Equal scores keep `nodes` order.
    pub fn rank(
        &self,
        nodes:       &[Node],
        history:     &ReadingHistory,
        reference:   GeoPoint,
        max_results: usize,
    ) -> Vec<RankedNode> {
        Self::rank_scored(self.score_each(nodes, history, reference), max_results)
    }

    /// [`rank`](Self::rank) over scores already produced by
    /// [`score_each`](Self::score_each).
    pub fn rank_scored(scored: Vec<RankedNode>, max_results: usize) -> Vec<RankedNode> {
        let mut ranked: Vec<RankedNode> =
            scored.into_iter().filter(|r| r.source != ScoreSource::NoReadings).collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(max_results);
        ranked
    }
}
