//! Unit tests for br-planner.

#[cfg(test)]
mod helpers {
    use chrono::{TimeZone, Utc};

    use br_core::{GeoPoint, Node, NodeId, ReadingHistory, SensorSnapshot};

    pub const HOME: GeoPoint = GeoPoint { lat: 30.6900, lon: -88.0400 };

    /// Eight nodes: 1–4 in "north", 5–8 in "south".  Node 8 has no readings.
    pub fn district() -> (Vec<Node>, ReadingHistory) {
        let mut nodes = Vec::new();
        for i in 1..=8u32 {
            let (group, dlat) = if i <= 4 { ("north", 0.003) } else { ("south", -0.003) };
            let k = (i - 1) % 4 + 1;
            nodes.push(Node::new(i, HOME.lat + dlat * k as f64, HOME.lon + 0.001 * i as f64).in_group(group));
        }
        let readings = (1..=7u32).map(|i| SensorSnapshot {
            node:        NodeId(i),
            temperature: 20.0 + i as f64,
            humidity:    55.0,
            gas_level:   0.1 * i as f64,
            waste_level: 1.0 - 0.1 * i as f64,
            timestamp:   Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap(),
        });
        (nodes, ReadingHistory::from_readings(readings))
    }
}

// ── PlannerConfig ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{MAX_TOP_N, PlanError, PlannerConfig};

    #[test]
    fn defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.alpha, 0.5);
        assert_eq!(c.top_n, MAX_TOP_N);
        assert_eq!(c.features.window, 10);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = PlannerConfig::from_json_str(r#"{ "alpha": 0.8, "weights": { "waste": 0.5 } }"#).unwrap();
        assert_eq!(c.alpha, 0.8);
        assert_eq!(c.top_n, 5);
        assert_eq!(c.weights.waste, 0.5);
        assert_eq!(c.weights.gas, 0.25);
    }

    #[test]
    fn reader_form() {
        let c = PlannerConfig::from_json_reader(&b"{\"top_n\": 2}"[..]).unwrap();
        assert_eq!(c.top_n, 2);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            PlannerConfig::from_json_str(r#"{ "top_n": 0 }"#),
            Err(PlanError::InvalidTopN { got: 0, max: 5 })
        ));
        assert!(matches!(PlannerConfig::from_json_str(r#"{ "alpha": -1.0 }"#), Err(PlanError::Config(_))));
        assert!(matches!(
            PlannerConfig::from_json_str(r#"{ "weights": { "gas": -2.0 } }"#),
            Err(PlanError::Config(_))
        ));
        assert!(matches!(PlannerConfig::from_json_str("{"), Err(PlanError::Json(_))));
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use br_core::{GeoPoint, Node, NodeId};
    use br_graph::{GraphError, GraphResult, Graph, Route, Router, Vertex};
    use br_model::{FeatureConfig, MemoryModelRegistry};
    use br_scoring::{ModelTrainer, TrainerConfig};

    use super::helpers::{HOME, district};
    use crate::{
        ALGORITHM_VERSION, PlanError, PlannerConfig, RoutePlanner, RouteRecord, RouteRequest,
        SourceKind,
    };

    fn planner() -> RoutePlanner {
        RoutePlanner::new(PlannerConfig::default()).unwrap()
    }

    fn plan(request: &RouteRequest) -> Result<RouteRecord, PlanError> {
        let (nodes, history) = district();
        planner().plan(&nodes, &history, request)
    }

    #[test]
    fn planner_is_send_sync() {
        fn check<T: Send + Sync>() {}
        check::<RoutePlanner>();
    }

    #[test]
    fn virtual_source_top_n() {
        let record = plan(&RouteRequest::at(HOME)).unwrap();
        assert_eq!(record.source, SourceKind::UserLocation);
        assert_eq!(record.top_n, 5);
        assert_eq!(record.stop_count(), 5);
        assert!(record.path.len() >= 5);
        assert_eq!(record.algorithm_version, ALGORITHM_VERSION);
        assert_eq!(record.alpha, 0.5);
        assert_eq!(record.edges[0].u, None);
        assert_eq!(record.edges[0].v, record.path[0]);

        // Node 8 has no readings and is never ranked.
        assert!(!record.path.contains(&NodeId(8)));
        let mut sorted = record.visit_order.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
        for stop in &record.visit_order {
            assert!(record.path.contains(stop));
        }
    }

    #[test]
    fn scores_cover_routed_nodes() {
        let record = plan(&RouteRequest::at(HOME).with_top_n(3)).unwrap();
        assert_eq!(record.priority_scores.len(), 3);
        for id in &record.visit_order {
            assert!(record.priority_scores.contains(*id));
        }
    }

    #[test]
    fn cost_is_sum_of_edges() {
        let record = plan(&RouteRequest::at(HOME)).unwrap();
        let sum: f64 = record.edges.iter().map(|e| e.w).sum();
        assert!((sum - record.total_cost).abs() <= 1e-6 * record.total_cost.max(1.0));
    }

    #[test]
    fn group_filter() {
        let record = plan(&RouteRequest::at(HOME).in_group("south")).unwrap();
        assert!(record.path.iter().all(|id| (5..=7).contains(&id.get())));
        assert_eq!(record.stop_count(), 3);
    }

    #[test]
    fn unknown_group_has_no_nodes() {
        assert!(matches!(plan(&RouteRequest::at(HOME).in_group("east")), Err(PlanError::NoNodes)));
    }

    #[test]
    fn reference_required_and_validated() {
        assert!(matches!(plan(&RouteRequest::default()), Err(PlanError::MissingReference)));
        assert!(matches!(
            plan(&RouteRequest::at(GeoPoint::new(95.0, 0.0))),
            Err(PlanError::InvalidCoordinate { node: None, .. })
        ));
    }

    #[test]
    fn node_coordinates_validated() {
        let (mut nodes, history) = district();
        nodes.push(Node { id: NodeId(9), lat: Some(10.0), lon: Some(200.0), group: None });
        let err = planner().plan(&nodes, &history, &RouteRequest::at(HOME)).unwrap_err();
        assert!(matches!(err, PlanError::InvalidCoordinate { node: Some(NodeId(9)), .. }));
    }

    #[test]
    fn unplaced_nodes_are_allowed() {
        let (mut nodes, history) = district();
        nodes.push(Node::unplaced(9));
        assert!(planner().plan(&nodes, &history, &RouteRequest::at(HOME)).is_ok());
    }

    #[test]
    fn top_n_bounds() {
        assert!(matches!(
            plan(&RouteRequest::at(HOME).with_top_n(6)),
            Err(PlanError::InvalidTopN { got: 6, .. })
        ));
        assert!(matches!(plan(&RouteRequest::at(HOME).with_top_n(0)), Err(PlanError::InvalidTopN { .. })));
        let single = plan(&RouteRequest::at(HOME).with_top_n(1)).unwrap();
        assert_eq!(single.path.len(), 1);
        assert_eq!(single.visit_order, single.path);
    }

    #[test]
    fn explicit_targets_from_node() {
        let request = RouteRequest::at(HOME)
            .from_node(1)
            .to_targets([NodeId(3), NodeId(8), NodeId(2)]);
        let record = plan(&request).unwrap();
        assert_eq!(record.source, SourceKind::Node);
        assert_eq!(record.path[0], NodeId(1));
        assert_eq!(record.edges[0].u, Some(NodeId(1)));
        let mut visited = record.visit_order.clone();
        visited.sort();
        assert_eq!(visited, vec![NodeId(2), NodeId(3), NodeId(8)]);
    }

    #[test]
    fn unknown_ids_rejected() {
        assert!(matches!(
            plan(&RouteRequest::at(HOME).from_node(42)),
            Err(PlanError::UnknownSource(NodeId(42)))
        ));
        assert!(matches!(
            plan(&RouteRequest::at(HOME).to_targets([NodeId(2), NodeId(77)])),
            Err(PlanError::UnknownTarget(NodeId(77)))
        ));
        // Node 1 exists, but not in the "south" group.
        assert!(matches!(
            plan(&RouteRequest::at(HOME).in_group("south").to_targets([NodeId(1)])),
            Err(PlanError::UnknownTarget(NodeId(1)))
        ));
    }

    #[test]
    fn bad_alpha_surfaces_as_graph_error() {
        assert!(matches!(
            plan(&RouteRequest::at(HOME).with_alpha(-0.5)),
            Err(PlanError::Graph(GraphError::InvalidAlpha(_)))
        ));
    }

    #[test]
    fn alpha_zero_is_plain_distance() {
        let record = plan(&RouteRequest::at(HOME).with_alpha(0.0)).unwrap();
        assert_eq!(record.alpha, 0.0);
        assert!(record.total_cost > 0.0);
    }

    struct NeverReaches;

    impl Router for NeverReaches {
        fn route(&self, _graph: &Graph, source: Vertex, targets: &[Vertex]) -> GraphResult<Route> {
            Err(GraphError::UnreachableTarget { from: source, to: targets[0] })
        }
    }

    #[test]
    fn router_failure_aborts_the_request() {
        let (nodes, history) = district();
        let planner = planner().with_router(NeverReaches);
        assert!(matches!(
            planner.plan(&nodes, &history, &RouteRequest::at(HOME)),
            Err(PlanError::Graph(GraphError::UnreachableTarget { from: Vertex::Source, .. }))
        ));
    }

    #[test]
    fn ranked_targets_match_scorer() {
        let (nodes, history) = district();
        let planner = planner();
        let record = planner.plan(&nodes, &history, &RouteRequest::at(HOME).with_top_n(3)).unwrap();

        let mut expected: Vec<NodeId> =
            planner.scorer().rank(&nodes, &history, HOME, 3).into_iter().map(|r| r.node).collect();
        expected.sort();
        let mut visited = record.visit_order.clone();
        visited.sort();
        assert_eq!(visited, expected);

        let all = planner.scorer().score_all(&nodes, &history, HOME);
        for (id, score) in record.priority_scores.iter() {
            assert_eq!(score, all.get(id));
        }
    }

    #[test]
    fn from_registry_respects_feature_window() {
        let (nodes, history) = district();
        let registry = MemoryModelRegistry::new();
        let mut trainer_config = TrainerConfig::default();
        trainer_config.forest.n_estimators = 10;
        ModelTrainer::new(trainer_config).train_and_publish(&nodes, &history, &registry).unwrap();

        let matching = RoutePlanner::from_registry(PlannerConfig::default(), &registry).unwrap();
        assert!(matching.scorer().has_model());
        assert!(matching.plan(&nodes, &history, &RouteRequest::at(HOME)).is_ok());

        let narrow = PlannerConfig { features: FeatureConfig { window: 3 }, ..PlannerConfig::default() };
        let planner = RoutePlanner::from_registry(narrow, &registry).unwrap();
        assert!(!planner.scorer().has_model());
    }

    #[test]
    fn record_json_shape() {
        let record = plan(&RouteRequest::at(HOME).with_top_n(2)).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["source"], "user_location");
        assert!(value["edges"][0]["u"].is_null());
        assert_eq!(value["algorithm_version"], "priority_based_v2");
        assert_eq!(value["reference"]["lat"], HOME.lat);

        let back: RouteRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::helpers::{HOME, district};
    use crate::{PlannerConfig, RoutePlanner, RouteRequest};

    proptest! {
        #[test]
        fn every_ranked_target_is_visited_once(top_n in 1usize..=5, alpha in 0.0f64..3.0) {
            let (nodes, history) = district();
            let planner = RoutePlanner::new(PlannerConfig::default()).unwrap();
            let request = RouteRequest::at(HOME).with_top_n(top_n).with_alpha(alpha);
            let record = planner.plan(&nodes, &history, &request).unwrap();

            prop_assert_eq!(record.stop_count(), top_n);
            let mut visits = record.visit_order.clone();
            visits.sort();
            visits.dedup();
            prop_assert_eq!(visits.len(), top_n);

            let sum: f64 = record.edges.iter().map(|e| e.w).sum();
            prop_assert!((sum - record.total_cost).abs() <= 1e-6 * record.total_cost.max(1.0));
            prop_assert_eq!(record.edges.len(), record.path.len());
        }
    }
}
