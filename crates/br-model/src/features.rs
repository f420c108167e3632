//! Feature extraction shared by training and inference.
//!
//! A [`FeatureVector`] always holds [`FEATURE_COUNT`] values in the order of
//! [`FEATURE_NAMES`].  Changing either the order or the meaning of a feature
//! requires bumping [`FEATURE_SET_VERSION`]; models record both and the
//! registry refuses artifacts whose feature list differs.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use br_core::{GeoPoint, Node, NodeId, ReadingHistory, SensorSnapshot};

pub const FEATURE_SET_VERSION: &str = "v1";

pub const FEATURE_COUNT: usize = 15;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "distance_from_user",
    "temperature",
    "humidity",
    "gas_level",
    "waste_level",
    "mean_temperature",
    "std_temperature",
    "mean_humidity",
    "std_humidity",
    "mean_gas",
    "std_gas",
    "mean_waste",
    "std_waste",
    "hour",
    "day_of_week",
];

/// Upper bound on the aggregation window.
pub const MAX_WINDOW: usize = 10;

// ── FeatureConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Number of newest readings aggregated into the mean/std features.
    /// Clamped to `1..=MAX_WINDOW` at use.
    pub window: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { window: MAX_WINDOW }
    }
}

impl FeatureConfig {
    #[inline]
    pub fn effective_window(&self) -> usize {
        self.window.clamp(1, MAX_WINDOW)
    }
}

// ── FeatureVector ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of the named feature, or `None` for an unknown name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES.iter().position(|&n| n == name).map(|i| self.0[i])
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// One training row: the node, its features, and the reading they end at.
#[derive(Clone, Debug)]
pub struct FeatureRecord {
    pub node:     NodeId,
    pub features: FeatureVector,
    pub latest:   SensorSnapshot,
    /// Distance from the reference point, metres.
    pub distance: f64,
}

// ── FeaturePipeline ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct FeaturePipeline {
    config: FeatureConfig,
}

impl FeaturePipeline {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Ordered feature names as owned strings, as stored in model metadata.
    pub fn feature_names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    /// Feature vector for `node` from its readings (newest first) relative to
    /// `reference`.  `None` when there are no readings.
    pub fn vector_for(
        &self,
        node:      &Node,
        readings:  &[SensorSnapshot],
        reference: GeoPoint,
    ) -> Option<FeatureVector> {
        let latest = readings.first()?;
        let window = &readings[..readings.len().min(self.config.effective_window())];

        let (mean_t, std_t) = mean_std(window.iter().map(|r| r.temperature));
        let (mean_h, std_h) = mean_std(window.iter().map(|r| r.humidity));
        let (mean_g, std_g) = mean_std(window.iter().map(|r| r.gas_level));
        let (mean_w, std_w) = mean_std(window.iter().map(|r| r.waste_level));

        Some(FeatureVector([
            reference.distance_m(node.position()),
            latest.temperature,
            latest.humidity,
            latest.gas_level,
            latest.waste_level,
            mean_t,
            std_t,
            mean_h,
            std_h,
            mean_g,
            std_g,
            mean_w,
            std_w,
            f64::from(latest.timestamp.hour()),
            f64::from(latest.timestamp.weekday().num_days_from_monday()),
        ]))
    }

    /// One record per node that has readings, in `nodes` order.
    pub fn extract(
        &self,
        nodes:     &[Node],
        history:   &ReadingHistory,
        reference: GeoPoint,
    ) -> Vec<FeatureRecord> {
        nodes
            .iter()
            .filter_map(|node| {
                let readings = history.readings(node.id);
                let features = self.vector_for(node, readings, reference)?;
                Some(FeatureRecord {
                    node: node.id,
                    features,
                    latest: readings[0].clone(),
                    distance: features.as_slice()[0],
                })
            })
            .collect()
    }
}

/// Mean and population standard deviation.  `(0, 0)` for an empty input.
fn mean_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let n = n as f64;
    let mean = values.clone().sum::<f64>() / n;
    let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
