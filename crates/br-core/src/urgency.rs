//! Urgency score map shared by the scorer and the graph builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Mapping node → urgency score, every value clamped to `[0.0, 1.0]`.
///
/// Non-finite inputs are stored as `0.0`.  Nodes absent from the map read as
/// `0.0`.  A `BTreeMap` keeps iteration (and serialized records) in node-id
/// order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrgencyScores(BTreeMap<NodeId, f64>);

impl UrgencyScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp `score` into `[0, 1]` and store it for `node`.
    pub fn insert(&mut self, node: NodeId, score: f64) {
        self.0.insert(node, clamp_unit(score));
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> f64 {
        self.0.get(&node).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.0.contains_key(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.0.iter().map(|(&id, &s)| (id, s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(NodeId, f64)> for UrgencyScores {
    fn from_iter<I: IntoIterator<Item = (NodeId, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (id, s) in iter {
            scores.insert(id, s);
        }
        scores
    }
}

/// Clamp to `[0, 1]`, mapping NaN to `0.0`.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
