//! `br-graph` — cost graph construction and route search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`graph`]    | `Vertex`, `Graph` (CSR adjacency), `GraphBuilder`            |
//! | [`urgency`]  | `build_urgency_graph`, `edge_weight`                         |
//! | [`dijkstra`] | `shortest_paths`, `ShortestPaths`                            |
//! | [`router`]   | `Router` trait, `GreedyRouter`, `plan_route`, `Route`        |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                               |

pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod router;
pub mod urgency;


pub use dijkstra::{ShortestPaths, shortest_paths};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphBuilder, Vertex};
pub use router::{GreedyRouter, Route, RouteEdge, Router, plan_route};
pub use urgency::{URGENCY_SCALE, build_urgency_graph, edge_weight};
