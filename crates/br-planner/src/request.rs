use serde::{Deserialize, Serialize};

use br_core::{GeoPoint, NodeId};

/// One route computation request.
///
/// Only `reference` is required; everything else falls back to the
/// planner's configuration or to urgency ranking.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteRequest {
    /// The requester's location.  Scores and the virtual source use it.
    pub reference:   Option<GeoPoint>,
    /// Restrict routing to nodes in this group.
    pub group:       Option<String>,
    /// Start at this node instead of the requester's location.
    pub source_node: Option<NodeId>,
    /// Visit exactly these nodes instead of the top-ranked ones.
    pub targets:     Option<Vec<NodeId>>,
    pub alpha:       Option<f64>,
    pub top_n:       Option<usize>,
}

impl RouteRequest {
    pub fn at(reference: GeoPoint) -> Self {
        Self { reference: Some(reference), ..Self::default() }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn from_node(mut self, node: impl Into<NodeId>) -> Self {
        self.source_node = Some(node.into());
        self
    }

    pub fn to_targets(mut self, targets: impl IntoIterator<Item = NodeId>) -> Self {
        self.targets = Some(targets.into_iter().collect());
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }
}
