//! `RoutePlanner`: one request in, one complete route record out.
//!
//! ```text
//! nodes ─ group filter ─ validate ─ score_each ─┬─ explicit targets
//!                                               └─ rank_scored(top_n)
//!        ─ urgency graph (source + targets) ─ Router ─ RouteRecord
//! ```
//!
//! Any failure aborts the request; a partial record is never produced.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info};

use br_core::{Node, NodeId, ReadingHistory, UrgencyScores};
use br_graph::{GreedyRouter, Router, Vertex, build_urgency_graph};
use br_model::ModelRegistry;
use br_scoring::UrgencyScorer;

use crate::config::check_top_n;
use crate::{
    ALGORITHM_VERSION, PlanError, PlanResult, PlannerConfig, RouteRecord, RouteRequest, SourceKind,
};

pub struct RoutePlanner<R: Router = GreedyRouter> {
    config: PlannerConfig,
    scorer: UrgencyScorer,
    router: R,
}

impl RoutePlanner<GreedyRouter> {
    /// Rules-only planner.
    pub fn new(config: PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        let scorer = UrgencyScorer::new(config.weights).with_feature_config(config.features);
        Ok(Self { config, scorer, router: GreedyRouter })
    }

    /// Planner scoring with the registry's current model, if any.
    pub fn from_registry(config: PlannerConfig, registry: &dyn ModelRegistry) -> PlanResult<Self> {
        config.validate()?;
        let scorer = UrgencyScorer::from_registry(config.weights, config.features, registry);
        Ok(Self { config, scorer, router: GreedyRouter })
    }
}

impl<R: Router> RoutePlanner<R> {
    /// Swap in a different sequencing strategy.
    pub fn with_router<R2: Router>(self, router: R2) -> RoutePlanner<R2> {
        RoutePlanner { config: self.config, scorer: self.scorer, router }
    }

    /// Replace the scorer, e.g. one holding a freshly trained model.
    pub fn with_scorer(mut self, scorer: UrgencyScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn scorer(&self) -> &UrgencyScorer {
        &self.scorer
    }

    pub fn plan(
        &self,
        nodes:   &[Node],
        history: &ReadingHistory,
        request: &RouteRequest,
    ) -> PlanResult<RouteRecord> {
        // ── scope & validation ────────────────────────────────────────────
        let scoped: Vec<Node> = match &request.group {
            Some(group) => nodes.iter().filter(|n| n.belongs_to(group)).cloned().collect(),
            None => nodes.to_vec(),
        };
        if scoped.is_empty() {
            return Err(PlanError::NoNodes);
        }

        let reference = request.reference.ok_or(PlanError::MissingReference)?;
        if !reference.is_valid() {
            return Err(PlanError::InvalidCoordinate { node: None, lat: reference.lat, lon: reference.lon });
        }
        for node in &scoped {
            check_node_coordinates(node)?;
        }

        let alpha = request.alpha.unwrap_or(self.config.alpha);
        let top_n = check_top_n(request.top_n.unwrap_or(self.config.top_n))?;

        let in_scope = |id: NodeId| scoped.iter().any(|n| n.id == id);
        if let Some(source) = request.source_node {
            if !in_scope(source) {
                return Err(PlanError::UnknownSource(source));
            }
        }

        // ── scoring & target selection ────────────────────────────────────
        // One scoring pass feeds both the recorded scores and the ranking.
        let scored = self.scorer.score_each(&scoped, history, reference);
        let all_scores: UrgencyScores = scored.iter().map(|r| (r.node, r.score)).collect();

        let targets: Vec<NodeId> = match &request.targets {
            Some(explicit) => {
                if let Some(&missing) = explicit.iter().find(|&&t| !in_scope(t)) {
                    return Err(PlanError::UnknownTarget(missing));
                }
                explicit.clone()
            }
            None => UrgencyScorer::rank_scored(scored, top_n).into_iter().map(|r| r.node).collect(),
        };
        debug!(targets = targets.len(), alpha, "route targets selected");

        // ── graph & route ─────────────────────────────────────────────────
        let routed: BTreeSet<NodeId> = targets.iter().copied().chain(request.source_node).collect();
        let graph_nodes: Vec<Node> = scoped.iter().filter(|n| routed.contains(&n.id)).cloned().collect();
        let priority_scores: UrgencyScores =
            all_scores.iter().filter(|(id, _)| routed.contains(id)).collect();

        let (source, kind, virtual_source) = match request.source_node {
            Some(id) => (Vertex::Node(id), SourceKind::Node, None),
            None => (Vertex::Source, SourceKind::UserLocation, Some(reference)),
        };

        let graph = build_urgency_graph(&graph_nodes, &priority_scores, alpha, virtual_source)?;
        let target_vertices: Vec<Vertex> = targets.iter().map(|&t| Vertex::Node(t)).collect();
        let route = self.router.route(&graph, source, &target_vertices)?;

        info!(
            stops = route.visit_order.len(),
            total_cost = route.total_cost,
            source = ?kind,
            "route planned"
        );

        Ok(RouteRecord {
            path: route.node_path(),
            visit_order: RouteRecord::visits_of(&route),
            edges: RouteRecord::edges_of(&route),
            total_cost: route.total_cost,
            alpha,
            priority_scores,
            source: kind,
            reference,
            top_n,
            algorithm_version: ALGORITHM_VERSION.to_string(),
            computed_at: Utc::now(),
        })
    }
}

/// Present coordinates must be in range; missing ones are allowed.
fn check_node_coordinates(node: &Node) -> PlanResult<()> {
    let lat_ok = node.lat.is_none_or(|lat| lat.is_finite() && (-90.0..=90.0).contains(&lat));
    let lon_ok = node.lon.is_none_or(|lon| lon.is_finite() && (-180.0..=180.0).contains(&lon));
    if lat_ok && lon_ok {
        return Ok(());
    }
    Err(PlanError::InvalidCoordinate {
        node: Some(node.id),
        lat:  node.lat.unwrap_or(0.0),
        lon:  node.lon.unwrap_or(0.0),
    })
}
