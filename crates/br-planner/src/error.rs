use br_core::NodeId;
use br_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no nodes available for routing")]
    NoNodes,

    #[error("request has no reference location")]
    MissingReference,

    #[error("invalid coordinate ({lat}, {lon}){}", on_node(.node))]
    InvalidCoordinate {
        node: Option<NodeId>,
        lat:  f64,
        lon:  f64,
    },

    #[error("source {0} is not in the routed node set")]
    UnknownSource(NodeId),

    #[error("target {0} is not in the routed node set")]
    UnknownTarget(NodeId),

    #[error("top_n must be in 1..={max}, got {got}")]
    InvalidTopN { got: usize, max: usize },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("planner configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;

fn on_node(node: &Option<NodeId>) -> String {
    node.map(|n| format!(" on {n}")).unwrap_or_default()
}
