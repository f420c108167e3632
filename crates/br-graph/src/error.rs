//! Graph-subsystem error type.

use thiserror::Error;

use crate::Vertex;

/// Errors produced by `br-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{0} is not in the graph")]
    UnknownVertex(Vertex),

    #[error("no route from {from} to {to}")]
    UnreachableTarget { from: Vertex, to: Vertex },

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: Vertex, to: Vertex, weight: f64 },

    #[error("alpha must be finite and non-negative, got {0}")]
    InvalidAlpha(f64),
}

pub type GraphResult<T> = Result<T, GraphError>;
