//! Collection nodes and their sensor readings.
//!
//! Both types are owned by the storage collaborator; the engine only reads
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GeoPoint, NodeId};

/// A fixed waste-collection point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Name of the bin group this node belongs to, if any.
    pub group: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, lat: f64, lon: f64) -> Self {
        Self { id: id.into(), lat: Some(lat), lon: Some(lon), group: None }
    }

    /// A node whose coordinates were never recorded.
    pub fn unplaced(id: impl Into<NodeId>) -> Self {
        Self { id: id.into(), lat: None, lon: None, group: None }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Position with missing components replaced by `0.0`.
    #[inline]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat.unwrap_or(0.0), self.lon.unwrap_or(0.0))
    }

    /// `true` when both coordinates were recorded.
    pub fn is_placed(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    pub fn belongs_to(&self, group: &str) -> bool {
        self.group.as_deref() == Some(group)
    }
}

/// One sensor reading for a node.
///
/// `gas_level` is nominally in `0.0..=1.0` but is not clamped at capture;
/// `waste_level` is the fill fraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub node: NodeId,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub gas_level: f64,
    pub waste_level: f64,
    pub timestamp: DateTime<Utc>,
}
