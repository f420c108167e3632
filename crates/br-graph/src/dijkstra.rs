//! Single-source shortest paths (Dijkstra) over a [`Graph`].
//!
//! Requires every edge weight to be finite and `>= 0`, which
//! [`GraphBuilder::build`](crate::GraphBuilder::build) enforces.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::{Graph, GraphResult, Vertex};

/// Total-ordered wrapper so `f64` costs can live in a `BinaryHeap`.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── ShortestPaths ─────────────────────────────────────────────────────────────

/// Distance and predecessor tables from one source, indexed by dense vertex
/// index.  Unreached vertices have distance `f64::INFINITY` and no
/// predecessor.
#[derive(Debug, Clone)]
pub struct ShortestPaths<'g> {
    graph:  &'g Graph,
    source: usize,
    dist:   Vec<f64>,
    prev:   Vec<Option<usize>>,
}

impl<'g> ShortestPaths<'g> {
    pub fn source(&self) -> Vertex {
        self.graph.vertex(self.source)
    }

    /// Cost of the cheapest path to `v`; `None` if `v` is unknown or
    /// unreachable.
    pub fn distance(&self, v: Vertex) -> Option<f64> {
        let d = self.dist[self.graph.index_of(v)?];
        d.is_finite().then_some(d)
    }

    /// The vertex preceding `v` on its cheapest path.
    pub fn predecessor(&self, v: Vertex) -> Option<Vertex> {
        let p = self.prev[self.graph.index_of(v)?]?;
        Some(self.graph.vertex(p))
    }

    /// Cheapest path `source ..= v`, or `None` if `v` is unknown or
    /// unreachable.
    pub fn path_to(&self, v: Vertex) -> Option<Vec<Vertex>> {
        let i = self.graph.index_of(v)?;
        self.index_path(i)
            .map(|p| p.into_iter().map(|j| self.graph.vertex(j)).collect())
    }

    /// Every vertex's distance (`INFINITY` when unreached).
    pub fn distance_map(&self) -> HashMap<Vertex, f64> {
        self.graph
            .vertices()
            .iter()
            .zip(&self.dist)
            .map(|(&v, &d)| (v, d))
            .collect()
    }

    /// Every vertex's predecessor (`None` for the source and unreached
    /// vertices).
    pub fn predecessor_map(&self) -> HashMap<Vertex, Option<Vertex>> {
        self.graph
            .vertices()
            .iter()
            .zip(&self.prev)
            .map(|(&v, p)| (v, p.map(|j| self.graph.vertex(j))))
            .collect()
    }

    #[inline]
    pub(crate) fn dist_at(&self, i: usize) -> f64 {
        self.dist[i]
    }

    /// Walk predecessor back-pointers from `target` to the source.
    pub(crate) fn index_path(&self, target: usize) -> Option<Vec<usize>> {
        if !self.dist[target].is_finite() {
            return None;
        }
        let mut path = vec![target];
        let mut cur = target;
        while let Some(p) = self.prev[cur] {
            path.push(p);
            cur = p;
        }
        path.reverse();
        debug_assert_eq!(path[0], self.source);
        Some(path)
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Run Dijkstra from `source`.
///
/// Fails with [`GraphError::UnknownVertex`](crate::GraphError::UnknownVertex)
/// if `source` is not in the graph.
pub fn shortest_paths(graph: &Graph, source: Vertex) -> GraphResult<ShortestPaths<'_>> {
    let source = graph.require(source)?;
    Ok(from_index(graph, source))
}

pub(crate) fn from_index(graph: &Graph, source: usize) -> ShortestPaths<'_> {
    let n = graph.vertex_count();
    let mut dist    = vec![f64::INFINITY; n];
    let mut prev    = vec![None; n];
    let mut settled = vec![false; n];

    dist[source] = 0.0;

    // Min-heap: (cost, index).  Reverse makes BinaryHeap (max) behave as a
    // min-heap; the secondary index key makes tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(Cost, usize)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), source)));

    while let Some(Reverse((Cost(cost), u))) = heap.pop() {
        if settled[u] {
            continue;
        }
        settled[u] = true;

        for (v, w) in graph.out_edges(u) {
            if settled[v] {
                continue;
            }
            let candidate = cost + w;
            if candidate < dist[v] {
                dist[v] = candidate;
                prev[v] = Some(u);
                heap.push(Reverse((Cost(candidate), v)));
            }
        }
    }

    ShortestPaths { graph, source, dist, prev }
}
