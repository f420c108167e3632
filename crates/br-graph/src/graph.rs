//! Directed weighted graph and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  Given
//! the dense index `i` of a vertex, its outgoing edges occupy
//!
//! ```text
//! edge_to[ out_start[i] .. out_start[i+1] ]
//! ```
//!
//! with the matching weights in `edge_weight`.  Vertices keep the order in
//! which they were first added, so dense indices (and therefore Dijkstra
//! tie-breaking) are reproducible for identical inputs.

use std::collections::HashMap;
use std::fmt;

use br_core::NodeId;

use crate::{GraphError, GraphResult};

// ── Vertex ────────────────────────────────────────────────────────────────────

/// A graph vertex: either a stored node or the requester's current location.
///
/// `Source` is never a route destination; the urgency graph gives it outbound
/// edges only.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Vertex {
    Source,
    Node(NodeId),
}

impl Vertex {
    /// The node id, or `None` for the virtual source.
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Vertex::Node(id) => Some(id),
            Vertex::Source => None,
        }
    }
}

impl From<NodeId> for Vertex {
    #[inline]
    fn from(id: NodeId) -> Self {
        Vertex::Node(id)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Source => f.write_str("requester location"),
            Vertex::Node(id) => write!(f, "{id}"),
        }
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Directed graph with non-negative, finite edge weights.
///
/// Do not construct directly; use [`GraphBuilder`] or
/// [`build_urgency_graph`](crate::build_urgency_graph).
#[derive(Clone, Debug)]
pub struct Graph {
    vertices:    Vec<Vertex>,
    index:       HashMap<Vertex, usize>,
    /// CSR row pointer.  Length = `vertex_count + 1`.
    out_start:   Vec<usize>,
    edge_to:     Vec<usize>,
    edge_weight: Vec<f64>,
}

impl Graph {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.index.contains_key(&v)
    }

    /// Dense index of `v`, if present.
    #[inline]
    pub fn index_of(&self, v: Vertex) -> Option<usize> {
        self.index.get(&v).copied()
    }

    #[inline]
    pub(crate) fn require(&self, v: Vertex) -> GraphResult<usize> {
        self.index_of(v).ok_or(GraphError::UnknownVertex(v))
    }

    /// Vertex at dense index `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn vertex(&self, i: usize) -> Vertex {
        self.vertices[i]
    }

    /// `(target index, weight)` pairs of every edge leaving index `i`.
    ///
    /// Contiguous slice scan, no heap allocation.
    #[inline]
    pub fn out_edges(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.out_start[i]..self.out_start[i + 1];
        self.edge_to[range.clone()]
            .iter()
            .copied()
            .zip(self.edge_weight[range].iter().copied())
    }

    /// Outgoing neighbours of `v` with their weights, in insertion order.
    /// Empty if `v` is not in the graph.
    pub fn neighbors(&self, v: Vertex) -> Vec<(Vertex, f64)> {
        match self.index_of(v) {
            Some(i) => self.out_edges(i).map(|(j, w)| (self.vertices[j], w)).collect(),
            None => Vec::new(),
        }
    }

    /// Weight of the cheapest `from → to` edge, if one exists.
    pub fn weight(&self, from: Vertex, to: Vertex) -> Option<f64> {
        let (i, j) = (self.index_of(from)?, self.index_of(to)?);
        self.weight_between(i, j)
    }

    pub(crate) fn weight_between(&self, i: usize, j: usize) -> Option<f64> {
        self.out_edges(i)
            .filter(|&(t, _)| t == j)
            .map(|(_, w)| w)
            .min_by(f64::total_cmp)
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// Edges may be added in any order and register their endpoints on first
/// use.  `build()` validates weights and lays edges out in CSR form.
///
/// # Example
///
/// ```
/// use br_core::NodeId;
/// use br_graph::{GraphBuilder, Vertex};
///
/// let mut b = GraphBuilder::new();
/// b.add_edge(Vertex::Node(NodeId(1)), Vertex::Node(NodeId(2)), 1.0);
/// b.add_edge(Vertex::Node(NodeId(2)), Vertex::Node(NodeId(3)), 2.0);
/// let g = b.build().unwrap();
/// assert_eq!(g.vertex_count(), 3);
/// assert_eq!(g.edge_count(), 2);
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    vertices:  Vec<Vertex>,
    index:     HashMap<Vertex, usize>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:   usize,
    to:     usize,
    weight: f64,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of vertices and edges.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices:  Vec::with_capacity(vertices),
            index:     HashMap::with_capacity(vertices),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Register `v` (idempotent) and return its dense index.
    pub fn add_vertex(&mut self, v: Vertex) -> usize {
        if let Some(&i) = self.index.get(&v) {
            return i;
        }
        let i = self.vertices.len();
        self.vertices.push(v);
        self.index.insert(v, i);
        i
    }

    /// Add a **directed** edge `from → to`.
    pub fn add_edge(&mut self, from: Vertex, to: Vertex, weight: f64) {
        let from = self.add_vertex(from);
        let to = self.add_vertex(to);
        self.raw_edges.push(RawEdge { from, to, weight });
    }

    /// Build from a node-keyed adjacency list such as
    /// `[(1, vec![(2, 1.0), (3, 4.0)]), (2, vec![(3, 2.0)]), (3, vec![])]`.
    pub fn from_adjacency<I, E>(adjacency: I) -> GraphResult<Graph>
    where
        I: IntoIterator<Item = (u32, E)>,
        E: IntoIterator<Item = (u32, f64)>,
    {
        let mut b = GraphBuilder::new();
        for (u, edges) in adjacency {
            let u = Vertex::Node(NodeId(u));
            b.add_vertex(u);
            for (v, w) in edges {
                b.add_edge(u, Vertex::Node(NodeId(v)), w);
            }
        }
        b.build()
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`Graph`].
    ///
    /// Fails with [`GraphError::InvalidWeight`] if any weight is negative or
    /// non-finite; Dijkstra's correctness depends on it.
    pub fn build(self) -> GraphResult<Graph> {
        if let Some(bad) = self.raw_edges.iter().find(|e| !(e.weight.is_finite() && e.weight >= 0.0)) {
            return Err(GraphError::InvalidWeight {
                from:   self.vertices[bad.from],
                to:     self.vertices[bad.to],
                weight: bad.weight,
            });
        }

        let vertex_count = self.vertices.len();

        // Stable sort keeps per-source insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from);

        let edge_to:     Vec<usize> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64>   = raw.iter().map(|e| e.weight).collect();

        let mut out_start = vec![0usize; vertex_count + 1];
        for e in &raw {
            out_start[e.from + 1] += 1;
        }
        for i in 1..=vertex_count {
            out_start[i] += out_start[i - 1];
        }
        debug_assert_eq!(out_start[vertex_count], edge_to.len());

        Ok(Graph {
            vertices: self.vertices,
            index: self.index,
            out_start,
            edge_to,
            edge_weight,
        })
    }
}
