//! Flat rows derived from a `RouteRecord` for tabular backends.

use br_core::NodeId;
use br_planner::{RouteRecord, SourceKind};

/// One route, without its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRow {
    pub route_seq:   u64,
    /// RFC 3339.
    pub computed_at: String,
    pub source:      &'static str,
    pub total_cost:  f64,
    pub alpha:       f64,
    /// Node ids joined with `;`.
    pub path:        String,
}

/// One traversed edge.  `u` is `None` for the edge out of the virtual source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEdgeRow {
    pub route_seq: u64,
    pub seq:       u32,
    pub u:         Option<u32>,
    pub v:         u32,
    pub weight:    f64,
}

impl RouteRow {
    pub fn from_record(route_seq: u64, record: &RouteRecord) -> Self {
        Self {
            route_seq,
            computed_at: record.computed_at.to_rfc3339(),
            source: match record.source {
                SourceKind::UserLocation => "user_location",
                SourceKind::Node => "node",
            },
            total_cost: record.total_cost,
            alpha: record.alpha,
            path: join_ids(&record.path),
        }
    }
}

impl RouteEdgeRow {
    pub fn from_record(route_seq: u64, record: &RouteRecord) -> Vec<Self> {
        record
            .edges
            .iter()
            .enumerate()
            .map(|(seq, e)| Self {
                route_seq,
                seq: seq as u32,
                u: e.u.map(NodeId::get),
                v: e.v.get(),
                weight: e.w,
            })
            .collect()
    }
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter().map(|id| id.get().to_string()).collect::<Vec<_>>().join(";")
}
