//! Planner defaults, loadable from JSON.
//!
//! Every field is optional in the JSON form; missing fields take the values
//! of [`PlannerConfig::default`].
//!
//! ```json
//! { "alpha": 0.8, "top_n": 3, "weights": { "waste": 0.5 } }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use br_model::FeatureConfig;
use br_scoring::UrgencyWeights;

use crate::{PlanError, PlanResult};

/// Largest number of targets chosen by urgency ranking.
pub const MAX_TOP_N: usize = 5;

/// Recorded on every route record.
pub const ALGORITHM_VERSION: &str = "priority_based_v2";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Urgency discount strength used when a request does not set one.
    pub alpha:    f64,
    /// Targets chosen by ranking when a request lists none.
    pub top_n:    usize,
    pub weights:  UrgencyWeights,
    pub features: FeatureConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            alpha:    0.5,
            top_n:    MAX_TOP_N,
            weights:  UrgencyWeights::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> PlanResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> PlanResult<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PlanResult<()> {
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(PlanError::Config(format!("alpha must be finite and >= 0, got {}", self.alpha)));
        }
        check_top_n(self.top_n)?;
        self.weights.validate().map_err(|e| PlanError::Config(e.to_string()))
    }
}

pub(crate) fn check_top_n(top_n: usize) -> PlanResult<usize> {
    if (1..=MAX_TOP_N).contains(&top_n) {
        Ok(top_n)
    } else {
        Err(PlanError::InvalidTopN { got: top_n, max: MAX_TOP_N })
    }
}
