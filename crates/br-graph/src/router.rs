//! Greedy multi-target route planning.
//!
//! # Algorithm
//!
//! ```text
//! state = SelectingNext, current = source, unvisited = targets
//! loop:
//!   SelectingNext: unvisited empty → Done
//!                  else Dijkstra from `current`; pick the unvisited target
//!                  with the smallest distance (ties: `targets` order);
//!                  infinite distance → UnreachableTarget (abort)
//!   Traversing:    append the predecessor path segment (dropping the
//!                  junction vertex already at the end of the route), add
//!                  its cost, mark the target visited, current = target
//!   Done:          return the route
//! ```
//!
//! Shortest paths are recomputed from the current position at every step:
//! destination-urgency weights make the graph asymmetric, so distances from
//! the starting vertex say nothing about distances from later stops.
//!
//! # Pluggability
//!
//! The planner calls routing through the [`Router`] trait so alternative
//! sequencing strategies can be swapped in.  [`GreedyRouter`] is the default.

use tracing::trace;

use crate::dijkstra::from_index;
use crate::{Graph, GraphError, GraphResult, Vertex};

// ── Route ─────────────────────────────────────────────────────────────────────

/// One traversed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEdge {
    pub from:   Vertex,
    pub to:     Vertex,
    pub weight: f64,
}

/// The result of a multi-target routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Every vertex passed through, starting with the source.
    pub vertices:    Vec<Vertex>,
    /// Edges consumed, in order; `edges[i]` joins `vertices[i]` and
    /// `vertices[i + 1]`.
    pub edges:       Vec<RouteEdge>,
    /// Targets in the order they were selected.
    pub visit_order: Vec<Vertex>,
    /// Sum of the weights actually traversed.
    pub total_cost:  f64,
}

impl Route {
    /// The path as node ids, without the virtual source.
    pub fn node_path(&self) -> Vec<br_core::NodeId> {
        self.vertices.iter().filter_map(|v| v.node()).collect()
    }

    /// `true` when no edge was traversed.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable multi-target sequencing.
///
/// Implementations must be `Send + Sync` so one planner can serve concurrent
/// requests.
pub trait Router: Send + Sync {
    /// Visit every vertex in `targets` starting from `source`.
    ///
    /// All-or-nothing: any unreachable target fails the whole call.
    fn route(&self, graph: &Graph, source: Vertex, targets: &[Vertex]) -> GraphResult<Route>;
}

/// Repeatedly travel to the nearest unvisited target.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyRouter;

impl Router for GreedyRouter {
    fn route(&self, graph: &Graph, source: Vertex, targets: &[Vertex]) -> GraphResult<Route> {
        plan_route(graph, source, targets)
    }
}

// ── plan_route ────────────────────────────────────────────────────────────────

enum Step {
    SelectingNext,
    Traversing { slot: usize, cost: f64, segment: Vec<usize> },
    Done,
}

/// Greedy multi-target traversal; see the module docs.
///
/// Duplicate entries in `targets` are visited once.
pub fn plan_route(graph: &Graph, source: Vertex, targets: &[Vertex]) -> GraphResult<Route> {
    let source_idx = graph.require(source)?;

    let mut unvisited: Vec<usize> = Vec::with_capacity(targets.len());
    for &t in targets {
        let i = graph.require(t)?;
        if !unvisited.contains(&i) {
            unvisited.push(i);
        }
    }

    let mut route = Route {
        vertices:    vec![source],
        edges:       Vec::new(),
        visit_order: Vec::with_capacity(unvisited.len()),
        total_cost:  0.0,
    };

    let mut current = source_idx;
    let mut state = Step::SelectingNext;

    loop {
        state = match state {
            Step::SelectingNext => {
                if unvisited.is_empty() {
                    Step::Done
                } else {
                    let paths = from_index(graph, current);
                    let (slot, cost) = nearest(&unvisited, |i| paths.dist_at(i));
                    let unreachable = || GraphError::UnreachableTarget {
                        from: graph.vertex(current),
                        to:   graph.vertex(unvisited[slot]),
                    };
                    if !cost.is_finite() {
                        return Err(unreachable());
                    }
                    let segment = paths.index_path(unvisited[slot]).ok_or_else(unreachable)?;
                    Step::Traversing { slot, cost, segment }
                }
            }

            Step::Traversing { slot, cost, segment } => {
                let target = unvisited.remove(slot);
                append_segment(graph, &mut route, &segment);
                route.total_cost += cost;
                route.visit_order.push(graph.vertex(target));

                trace!(stop = %graph.vertex(target), cost, "route leg");
                current = target;
                Step::SelectingNext
            }

            Step::Done => return Ok(route),
        };
    }
}

/// Index into `unvisited` of the cheapest candidate and its cost.  Strict `<`
/// keeps the earliest candidate on ties.
fn nearest(unvisited: &[usize], dist: impl Fn(usize) -> f64) -> (usize, f64) {
    let mut best = (0, dist(unvisited[0]));
    for (slot, &i) in unvisited.iter().enumerate().skip(1) {
        let d = dist(i);
        if d < best.1 {
            best = (slot, d);
        }
    }
    best
}

fn append_segment(graph: &Graph, route: &mut Route, segment: &[usize]) {
    let mut prev = segment[0];
    debug_assert_eq!(route.vertices.last().copied(), Some(graph.vertex(prev)));

    for &next in &segment[1..] {
        // Segments come from predecessor pointers, so the edge exists.
        let weight = graph.weight_between(prev, next).unwrap_or(0.0);
        route.edges.push(RouteEdge {
            from: graph.vertex(prev),
            to:   graph.vertex(next),
            weight,
        });
        route.vertices.push(graph.vertex(next));
        prev = next;
    }
}
