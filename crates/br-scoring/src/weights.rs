use serde::{Deserialize, Serialize};

use crate::{ScoringError, ScoringResult};

/// Term weights of the rule formula.
///
/// The defaults sum to 1.0, so a node that maxes every term scores 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyWeights {
    pub distance:       f64,
    pub waste:          f64,
    pub gas:            f64,
    pub temperature:    f64,
    pub humidity:       f64,
    /// Distance at which the distance term reaches zero, metres.
    pub max_distance_m: f64,
}

impl Default for UrgencyWeights {
    fn default() -> Self {
        Self {
            distance:       0.25,
            waste:          0.35,
            gas:            0.25,
            temperature:    0.10,
            humidity:       0.05,
            max_distance_m: 2000.0,
        }
    }
}

impl UrgencyWeights {
    /// Every weight finite and non-negative; the distance cap finite and
    /// positive.
    pub fn validate(&self) -> ScoringResult<()> {
        let named = [
            ("distance", self.distance),
            ("waste", self.waste),
            ("gas", self.gas),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
        ];
        for (name, w) in named {
            if !(w.is_finite() && w >= 0.0) {
                return Err(ScoringError::InvalidWeights(format!("{name} weight is {w}")));
            }
        }
        if !(self.max_distance_m.is_finite() && self.max_distance_m > 0.0) {
            return Err(ScoringError::InvalidWeights(format!(
                "max_distance_m is {}",
                self.max_distance_m
            )));
        }
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.distance + self.waste + self.gas + self.temperature + self.humidity
    }
}
