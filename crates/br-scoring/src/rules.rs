//! The rule formula.
//!
//! ```text
//! distance    = 1 - clamp(distance_m / max_distance_m, 0, 1)
//! waste       = clamp(waste_level, 0, 1)
//! gas         = clamp(gas_level, 0, 1)
//! temperature = clamp(|temperature - 25| / 15, 0, 1)
//! humidity    = clamp((humidity - 50) / 50, 0, 1)
//! score       = clamp(Σ weight · term, 0, 1)
//! ```
//!
//! A NaN input makes its term 0.0.

use br_core::SensorSnapshot;
use br_core::urgency::clamp_unit;

use crate::UrgencyWeights;

pub const COMFORT_TEMPERATURE_C: f64 = 25.0;
pub const TEMPERATURE_SPAN_C:    f64 = 15.0;
pub const HUMIDITY_BASELINE:     f64 = 50.0;
pub const HUMIDITY_SPAN:         f64 = 50.0;

/// The five normalised terms, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleTerms {
    pub distance:    f64,
    pub waste:       f64,
    pub gas:         f64,
    pub temperature: f64,
    pub humidity:    f64,
}

impl RuleTerms {
    pub fn compute(distance_m: f64, snapshot: &SensorSnapshot, max_distance_m: f64) -> Self {
        let distance_norm = clamp_unit(distance_m / max_distance_m);
        let distance = if distance_m.is_nan() { 0.0 } else { 1.0 - distance_norm };
        Self {
            distance,
            waste:       clamp_unit(snapshot.waste_level),
            gas:         clamp_unit(snapshot.gas_level),
            temperature: clamp_unit((snapshot.temperature - COMFORT_TEMPERATURE_C).abs() / TEMPERATURE_SPAN_C),
            humidity:    clamp_unit((snapshot.humidity - HUMIDITY_BASELINE) / HUMIDITY_SPAN),
        }
    }

    pub fn weighted(&self, w: &UrgencyWeights) -> f64 {
        clamp_unit(
            w.distance * self.distance
                + w.waste * self.waste
                + w.gas * self.gas
                + w.temperature * self.temperature
                + w.humidity * self.humidity,
        )
    }
}

/// Rule-based urgency for a reading taken `distance_m` from the requester.
pub fn rule_score(weights: &UrgencyWeights, distance_m: f64, snapshot: &SensorSnapshot) -> f64 {
    RuleTerms::compute(distance_m, snapshot, weights.max_distance_m).weighted(weights)
}
