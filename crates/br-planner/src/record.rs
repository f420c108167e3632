//! The route audit record.
//!
//! A `RouteRecord` is serialised and stored verbatim by whoever persists
//! routes, so its JSON field names are part of the external contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use br_core::{GeoPoint, NodeId, UrgencyScores};
use br_graph::{Route, RouteEdge};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Started from the requester's location (virtual source).
    UserLocation,
    /// Started from a stored node.
    Node,
}

/// One traversed edge.  `u` is `None` for the edge leaving the virtual source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: Option<NodeId>,
    pub v: NodeId,
    pub w: f64,
}

impl EdgeRecord {
    /// `None` for an edge into the virtual source, which the urgency graph
    /// never contains.
    pub fn from_route_edge(edge: &RouteEdge) -> Option<Self> {
        Some(Self { u: edge.from.node(), v: edge.to.node()?, w: edge.weight })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Every node passed through, in order, without the virtual source.
    /// Legs may pass through earlier stops, so ids can repeat.
    pub path:              Vec<NodeId>,
    /// Each target once, in the order it was reached.
    pub visit_order:       Vec<NodeId>,
    pub edges:             Vec<EdgeRecord>,
    pub total_cost:        f64,
    pub alpha:             f64,
    /// Urgency of every routed node at computation time.
    pub priority_scores:   UrgencyScores,
    pub source:            SourceKind,
    pub reference:         GeoPoint,
    pub top_n:             usize,
    pub algorithm_version: String,
    pub computed_at:       DateTime<Utc>,
}

impl RouteRecord {
    pub(crate) fn edges_of(route: &Route) -> Vec<EdgeRecord> {
        route.edges.iter().filter_map(EdgeRecord::from_route_edge).collect()
    }

    pub(crate) fn visits_of(route: &Route) -> Vec<NodeId> {
        route.visit_order.iter().filter_map(|v| v.node()).collect()
    }

    pub fn stop_count(&self) -> usize {
        self.visit_order.len()
    }
}
