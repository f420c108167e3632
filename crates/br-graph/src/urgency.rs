//! Urgency-weighted graph construction.
//!
//! Every ordered pair of distinct nodes `(u, v)` gets an edge
//!
//! ```text
//! weight(u → v) = distance_m(u, v) / (1 + alpha * urgency[v] * URGENCY_SCALE)
//! ```
//!
//! so travelling *towards* an urgent node is cheaper.  `alpha = 0` degenerates
//! to plain distance routing.  An optional virtual source (the requester's
//! location) gets the same outbound edges and no inbound ones.

use br_core::{GeoPoint, Node, UrgencyScores};

use crate::{Graph, GraphBuilder, GraphError, GraphResult, Vertex};

/// Multiplier applied to the `[0, 1]` urgency before `alpha`.
pub const URGENCY_SCALE: f64 = 10.0;

/// Edge cost for travelling `distance_m` metres to a node of the given
/// urgency.  `urgency` is clamped to `[0, 1]`.
#[inline]
pub fn edge_weight(distance_m: f64, urgency: f64, alpha: f64) -> f64 {
    let urgency = br_core::urgency::clamp_unit(urgency);
    distance_m / (1.0 + alpha * urgency * URGENCY_SCALE)
}

/// Build the fully connected urgency graph over `nodes`.
///
/// Missing node coordinates count as `0.0`; nodes absent from `scores` have
/// urgency `0.0`.  Fails with [`GraphError::InvalidAlpha`] unless `alpha` is
/// finite and non-negative.
pub fn build_urgency_graph(
    nodes:          &[Node],
    scores:         &UrgencyScores,
    alpha:          f64,
    virtual_source: Option<GeoPoint>,
) -> GraphResult<Graph> {
    if !(alpha.is_finite() && alpha >= 0.0) {
        return Err(GraphError::InvalidAlpha(alpha));
    }

    let n = nodes.len();
    let extra = usize::from(virtual_source.is_some());
    let mut b = GraphBuilder::with_capacity(n + extra, n * n.saturating_sub(1) + extra * n);

    if virtual_source.is_some() {
        b.add_vertex(Vertex::Source);
    }
    for node in nodes {
        b.add_vertex(Vertex::Node(node.id));
    }

    if let Some(origin) = virtual_source {
        for v in nodes {
            let d = origin.distance_m(v.position());
            b.add_edge(Vertex::Source, Vertex::Node(v.id), edge_weight(d, scores.get(v.id), alpha));
        }
    }

    for u in nodes {
        let from = u.position();
        for v in nodes {
            if u.id == v.id {
                continue;
            }
            let d = from.distance_m(v.position());
            b.add_edge(Vertex::Node(u.id), Vertex::Node(v.id), edge_weight(d, scores.get(v.id), alpha));
        }
    }

    b.build()
}
