//! Unit tests for br-scoring.

#[cfg(test)]
mod helpers {
    use chrono::{Duration, TimeZone, Utc};

    use br_core::{GeoPoint, Node, NodeId, ReadingHistory, SensorSnapshot};

    use crate::TrainerConfig;

    pub const HOME: GeoPoint = GeoPoint { lat: 30.6900, lon: -88.0400 };

    pub fn reading(node: u32, waste: f64, gas: f64, temp: f64, humidity: f64) -> SensorSnapshot {
        SensorSnapshot {
            node:        NodeId(node),
            temperature: temp,
            humidity,
            gas_level:   gas,
            waste_level: waste,
            timestamp:   Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
        }
    }

    /// `n` nodes spread north of `HOME`, three readings each.
    pub fn district(n: u32) -> (Vec<Node>, ReadingHistory) {
        let nodes: Vec<Node> = (1..=n)
            .map(|i| Node::new(i, HOME.lat + 0.002 * i as f64, HOME.lon))
            .collect();
        let mut history = ReadingHistory::new();
        for i in 1..=n {
            for age in 0..3 {
                let mut r = reading(
                    i,
                    (i as f64 * 0.07 + age as f64 * 0.01) % 1.0,
                    (i as f64 * 0.13) % 1.0,
                    18.0 + i as f64,
                    45.0 + 2.0 * i as f64,
                );
                r.timestamp -= Duration::hours(age);
                history.push(r);
            }
        }
        (nodes, history)
    }

    pub fn quick_config() -> TrainerConfig {
        let mut cfg = TrainerConfig::default();
        cfg.forest.n_estimators = 10;
        cfg.reference = Some(HOME);
        cfg
    }
}

// ── Weights & rule formula ────────────────────────────────────────────────────

#[cfg(test)]
mod rules {
    use proptest::prelude::*;

    use br_core::{Node, SensorSnapshot};

    use super::helpers::{HOME, reading};
    use crate::{RuleTerms, ScoringError, UrgencyScorer, UrgencyWeights, rule_score};

    #[test]
    fn default_weights() {
        let w = UrgencyWeights::default();
        assert_eq!(w.waste, 0.35);
        assert_eq!(w.max_distance_m, 2000.0);
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn invalid_weights_rejected() {
        let neg = UrgencyWeights { gas: -0.1, ..UrgencyWeights::default() };
        assert!(matches!(neg.validate(), Err(ScoringError::InvalidWeights(_))));
        let nan = UrgencyWeights { humidity: f64::NAN, ..UrgencyWeights::default() };
        assert!(nan.validate().is_err());
        let cap = UrgencyWeights { max_distance_m: 0.0, ..UrgencyWeights::default() };
        assert!(cap.validate().is_err());
    }

    #[test]
    fn everything_maxed_scores_one() {
        let s = rule_score(&UrgencyWeights::default(), 0.0, &reading(1, 1.0, 1.0, 40.0, 100.0));
        assert!((s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn calm_and_close_scores_distance_weight() {
        let s = rule_score(&UrgencyWeights::default(), 0.0, &reading(1, 0.0, 0.0, 25.0, 50.0));
        assert!((s - 0.25).abs() < 1e-12);
    }

    #[test]
    fn terms() {
        let t = RuleTerms::compute(500.0, &reading(1, 0.5, 1.7, 10.0, 75.0), 2000.0);
        assert!((t.distance - 0.75).abs() < 1e-12);
        assert_eq!(t.waste, 0.5);
        assert_eq!(t.gas, 1.0);
        assert_eq!(t.temperature, 1.0);
        assert!((t.humidity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn far_away_loses_distance_term() {
        let t = RuleTerms::compute(10_000.0, &reading(1, 0.0, 0.0, 25.0, 50.0), 2000.0);
        assert_eq!(t.distance, 0.0);
    }

    #[test]
    fn nan_inputs_count_as_zero() {
        let r = reading(1, f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        let t = RuleTerms::compute(f64::NAN, &r, 2000.0);
        assert_eq!(t, RuleTerms { distance: 0.0, waste: 0.0, gas: 0.0, temperature: 0.0, humidity: 0.0 });
    }

    #[test]
    fn scorer_uses_node_distance() {
        let scorer = UrgencyScorer::new(UrgencyWeights::default());
        let near = Node::new(1, HOME.lat, HOME.lon);
        let far = Node::new(2, HOME.lat + 0.1, HOME.lon);
        let r = reading(1, 0.3, 0.3, 25.0, 50.0);
        assert!(scorer.rule_score(&near, &r, HOME) > scorer.rule_score(&far, &r, HOME));
    }

    fn any_reading() -> impl Strategy<Value = SensorSnapshot> {
        use proptest::num::f64::ANY;
        (ANY, ANY, ANY, ANY).prop_map(|(w, g, t, h)| reading(1, w, g, t, h))
    }

    proptest! {
        #[test]
        fn score_always_in_unit_interval(
            r in any_reading(),
            d in proptest::num::f64::ANY,
        ) {
            let s = rule_score(&UrgencyWeights::default(), d, &r);
            prop_assert!((0.0..=1.0).contains(&s), "score {s}");
        }

        #[test]
        fn scorer_in_unit_interval(r in any_reading(), lat in -90.0f64..90.0, lon in -180.0f64..180.0) {
            let scorer = UrgencyScorer::new(UrgencyWeights::default());
            let s = scorer.score(&Node::new(1, lat, lon), &r, HOME);
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }
}

// ── UrgencyScorer ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod scorer {
    use std::sync::Arc;

    use br_core::{GeoPoint, Node, NodeId, ReadingHistory};
    use br_model::{
        FeatureConfig, FileModelRegistry, ForestParams, MemoryModelRegistry, ModelError,
        ModelMetadata, ModelRegistry, RandomForest, TrainedModel, ValidationMetrics,
    };

    use super::helpers::{HOME, district, quick_config, reading};
    use crate::{
        ModelTrainer, ModelUnavailable, ScoreSource, ScoringError, TrainerConfig, UrgencyScorer,
        UrgencyWeights,
    };

    fn trained() -> Arc<TrainedModel> {
        let (nodes, history) = district(8);
        Arc::new(ModelTrainer::new(quick_config()).train(&nodes, &history).unwrap())
    }

    #[test]
    fn rules_only_source() {
        let (nodes, history) = district(3);
        let scorer = UrgencyScorer::new(UrgencyWeights::default());
        let s = scorer.score_history(&nodes[0], history.readings(NodeId(1)), HOME);
        assert_eq!(s.source, ScoreSource::Rules);
        assert!(matches!(
            scorer.try_model_score(&nodes[0], history.readings(NodeId(1)), HOME),
            Err(ModelUnavailable::NoModel)
        ));
    }

    #[test]
    fn no_readings_scores_zero() {
        let scorer = UrgencyScorer::new(UrgencyWeights::default());
        let s = scorer.score_history(&Node::new(9, HOME.lat, HOME.lon), &[], HOME);
        assert_eq!(s.value, 0.0);
        assert_eq!(s.source, ScoreSource::NoReadings);
    }

    #[test]
    fn model_is_preferred() {
        let (nodes, history) = district(8);
        let scorer = UrgencyScorer::new(UrgencyWeights::default()).with_model(trained()).unwrap();
        assert!(scorer.has_model());
        let s = scorer.score_history(&nodes[2], history.readings(NodeId(3)), HOME);
        assert_eq!(s.source, ScoreSource::Model);
        assert!((0.0..=1.0).contains(&s.value));
    }

    #[test]
    fn non_finite_features_fall_back_to_rules() {
        let scorer = UrgencyScorer::new(UrgencyWeights::default()).with_model(trained()).unwrap();
        let node = Node::new(1, HOME.lat, HOME.lon);
        let bad = reading(1, 0.5, 0.5, f64::NAN, 50.0);
        let s = scorer.score_history(&node, std::slice::from_ref(&bad), HOME);
        assert_eq!(s.source, ScoreSource::Rules);
        assert_eq!(s.value, scorer.rule_score(&node, &bad, HOME));
    }

    #[test]
    fn mismatched_model_rejected() {
        let rows = vec![[0.0; 15], [1.0; 15]];
        let forest = RandomForest::fit(&rows, &[0.0, 1.0], &ForestParams::default()).unwrap();
        let model = TrainedModel::new(
            ModelMetadata {
                version: "other".into(),
                trained_at: chrono::Utc::now(),
                feature_set: "v0".into(),
                features: (0..15).map(|i| format!("x{i}")).collect(),
                window: 10,
                n_samples: 2,
                validation: ValidationMetrics { mse: 0.0, r2: 1.0, n_train: 2, n_validation: 2 },
                feature_importances: Vec::new(),
            },
            forest,
        )
        .unwrap();
        let result = UrgencyScorer::new(UrgencyWeights::default()).with_model(Arc::new(model));
        assert!(matches!(result, Err(ScoringError::Model(_))));
    }

    #[test]
    fn from_registry_loads_current() {
        let reg = MemoryModelRegistry::new();
        let features = FeatureConfig::default();
        assert!(!UrgencyScorer::from_registry(UrgencyWeights::default(), features, &reg).has_model());
        reg.put((*trained()).clone()).unwrap();
        assert!(UrgencyScorer::from_registry(UrgencyWeights::default(), features, &reg).has_model());
    }

    #[test]
    fn from_registry_survives_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let reg = FileModelRegistry::new(dir.path()).unwrap();
        std::fs::write(reg.artifact_path(), b"not a model").unwrap();
        let scorer = UrgencyScorer::from_registry(UrgencyWeights::default(), FeatureConfig::default(), &reg);
        assert!(!scorer.has_model());
    }

    fn trained_with_window(window: usize) -> Arc<TrainedModel> {
        let (nodes, history) = district(8);
        let cfg = TrainerConfig { window, ..quick_config() };
        Arc::new(ModelTrainer::new(cfg).train(&nodes, &history).unwrap())
    }

    #[test]
    fn model_window_must_match_pipeline() {
        let narrow = trained_with_window(1);
        assert_eq!(narrow.metadata().window, 1);

        let result = UrgencyScorer::default()
            .with_feature_config(FeatureConfig { window: 10 })
            .with_model(Arc::clone(&narrow));
        assert!(matches!(
            result,
            Err(ScoringError::Model(ModelError::WindowMismatch { expected: 10, got: 1 }))
        ));

        let (nodes, history) = district(8);
        let scorer = UrgencyScorer::default()
            .with_feature_config(FeatureConfig { window: 1 })
            .with_model(narrow)
            .unwrap();
        let s = scorer.score_history(&nodes[0], history.readings(NodeId(1)), HOME);
        assert_eq!(s.source, ScoreSource::Model);
    }

    #[test]
    fn changing_window_detaches_model() {
        let scorer = UrgencyScorer::default().with_model(trained()).unwrap();
        assert!(scorer.has_model());
        assert!(scorer.clone().with_feature_config(FeatureConfig { window: 10 }).has_model());
        assert!(!scorer.with_feature_config(FeatureConfig { window: 3 }).has_model());
    }

    #[test]
    fn from_registry_ignores_model_with_other_window() {
        let reg = MemoryModelRegistry::new();
        reg.put((*trained_with_window(2)).clone()).unwrap();
        let weights = UrgencyWeights::default();
        assert!(!UrgencyScorer::from_registry(weights, FeatureConfig::default(), &reg).has_model());
        assert!(UrgencyScorer::from_registry(weights, FeatureConfig { window: 2 }, &reg).has_model());
    }

    fn break_first_tree(model: &TrainedModel) -> serde_json::Value {
        let mut value = serde_json::to_value(model).unwrap();
        value["estimator"]["trees"][0]["nodes"][0] = serde_json::json!({
            "Split": { "feature": 99, "threshold": 0.0, "left": 0, "right": 0 }
        });
        value
    }

    #[test]
    fn broken_tree_artifact_leaves_scorer_on_rules() {
        let dir = tempfile::tempdir().unwrap();
        let reg = FileModelRegistry::new(dir.path()).unwrap();
        let value = break_first_tree(&trained());
        std::fs::write(reg.artifact_path(), serde_json::to_vec(&value).unwrap()).unwrap();

        let scorer = UrgencyScorer::from_registry(UrgencyWeights::default(), FeatureConfig::default(), &reg);
        assert!(!scorer.has_model());
        let (nodes, history) = district(3);
        let s = scorer.score_history(&nodes[0], history.readings(NodeId(1)), HOME);
        assert_eq!(s.source, ScoreSource::Rules);
    }

    #[test]
    fn unchecked_broken_model_falls_back_to_rules() {
        // Deserialising directly skips the artifact checks; prediction must
        // still fail softly.
        let broken: TrainedModel = serde_json::from_value(break_first_tree(&trained())).unwrap();
        let scorer = UrgencyScorer::default().with_model(Arc::new(broken)).unwrap();
        let (nodes, history) = district(3);
        let readings = history.readings(NodeId(1));
        assert!(matches!(
            scorer.try_model_score(&nodes[0], readings, HOME),
            Err(ModelUnavailable::Prediction(ModelError::MalformedModel(_)))
        ));
        let s = scorer.score_history(&nodes[0], readings, HOME);
        assert_eq!(s.source, ScoreSource::Rules);
        assert_eq!(s.value, scorer.rule_score(&nodes[0], &readings[0], HOME));
    }

    #[test]
    fn score_all_covers_every_node() {
        let (mut nodes, history) = district(4);
        nodes.push(Node::new(99, HOME.lat, HOME.lon));
        let scores = UrgencyScorer::default().score_all(&nodes, &history, HOME);
        assert_eq!(scores.len(), 5);
        assert_eq!(scores.get(NodeId(99)), 0.0);
        assert!(scores.iter().all(|(_, s)| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn rank_orders_and_truncates() {
        let nodes = vec![
            Node::new(1, HOME.lat, HOME.lon),
            Node::new(2, HOME.lat, HOME.lon),
            Node::new(3, HOME.lat, HOME.lon),
            Node::new(4, HOME.lat, HOME.lon),
        ];
        let history = ReadingHistory::from_readings(vec![
            reading(1, 0.2, 0.0, 25.0, 50.0),
            reading(2, 0.9, 0.0, 25.0, 50.0),
            reading(3, 0.2, 0.0, 25.0, 50.0),
        ]);
        let scorer = UrgencyScorer::default();

        let all = scorer.rank(&nodes, &history, HOME, 10);
        let ids: Vec<NodeId> = all.iter().map(|r| r.node).collect();
        // Node 4 has no readings; 1 and 3 tie and keep input order.
        assert_eq!(ids, vec![NodeId(2), NodeId(1), NodeId(3)]);

        let top = scorer.rank(&nodes, &history, HOME, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].node, NodeId(2));
    }

    #[test]
    fn rank_scored_matches_rank() {
        let (mut nodes, history) = district(6);
        nodes.push(Node::new(99, HOME.lat, HOME.lon));
        let scorer = UrgencyScorer::default();

        let each = scorer.score_each(&nodes, &history, HOME);
        assert_eq!(each.len(), 7);
        assert_eq!(each[6].source, ScoreSource::NoReadings);

        let from_scores = UrgencyScorer::rank_scored(each, 4);
        assert_eq!(from_scores, scorer.rank(&nodes, &history, HOME, 4));
        assert!(from_scores.iter().all(|r| r.node != NodeId(99)));
    }

    #[test]
    fn rank_empty() {
        let scorer = UrgencyScorer::default();
        assert!(scorer.rank(&[], &ReadingHistory::new(), GeoPoint::new(0.0, 0.0), 5).is_empty());
    }
}

// ── ModelTrainer ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod trainer {
    use br_core::ReadingHistory;
    use br_model::{FEATURE_NAMES, MemoryModelRegistry, ModelError, ModelRegistry};

    use super::helpers::{district, quick_config};
    use crate::{ModelTrainer, ScoringError, TrainerConfig};

    #[test]
    fn four_samples_is_not_enough() {
        let (nodes, history) = district(4);
        let err = ModelTrainer::new(quick_config()).train(&nodes, &history).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Model(ModelError::InsufficientData { needed: 5, got: 4 })
        ));
    }

    #[test]
    fn no_history_is_not_enough() {
        let (nodes, _) = district(6);
        let err = ModelTrainer::new(quick_config()).train(&nodes, &ReadingHistory::new()).unwrap_err();
        assert!(matches!(err, ScoringError::Model(ModelError::InsufficientData { got: 0, .. })));
    }

    #[test]
    fn five_samples_validate_on_training_set() {
        let (nodes, history) = district(5);
        let model = ModelTrainer::new(quick_config()).train(&nodes, &history).unwrap();
        let meta = model.metadata();
        assert_eq!(meta.n_samples, 5);
        assert_eq!(meta.validation.n_train, 5);
        assert_eq!(meta.validation.n_validation, 5);
    }

    #[test]
    fn larger_sets_hold_out_a_fifth() {
        let (nodes, history) = district(12);
        let model = ModelTrainer::new(quick_config()).train(&nodes, &history).unwrap();
        let v = &model.metadata().validation;
        assert_eq!(v.n_validation, 2);
        assert_eq!(v.n_train, 10);
        assert!(v.mse >= 0.0);
    }

    #[test]
    fn metadata_contents() {
        let (nodes, history) = district(8);
        let model = ModelTrainer::new(quick_config()).train(&nodes, &history).unwrap();
        let meta = model.metadata();
        assert_eq!(meta.version, "rf_10_42");
        assert_eq!(meta.feature_set, "v1");
        assert_eq!(meta.features, FEATURE_NAMES.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        assert_eq!(meta.feature_importances.len(), 15);
        assert_eq!(meta.feature_importances[0].name, "distance_from_user");
        let total: f64 = meta.feature_importances.iter().map(|f| f.importance).sum();
        assert!(total == 0.0 || (total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn deterministic_for_a_seed() {
        let (nodes, history) = district(12);
        let trainer = ModelTrainer::new(quick_config());
        let a = trainer.train(&nodes, &history).unwrap();
        let b = trainer.train(&nodes, &history).unwrap();
        assert_eq!(a.estimator(), b.estimator());
        assert_eq!(a.metadata().validation, b.metadata().validation);
    }

    #[test]
    fn bad_fraction_rejected() {
        let (nodes, history) = district(6);
        let cfg = TrainerConfig { validation_fraction: 1.0, ..quick_config() };
        assert!(matches!(
            ModelTrainer::new(cfg).train(&nodes, &history),
            Err(ScoringError::Config(_))
        ));
    }

    #[test]
    fn default_reference_is_centroid() {
        let (nodes, history) = district(6);
        let cfg = TrainerConfig { reference: None, ..quick_config() };
        assert!(ModelTrainer::new(cfg).train(&nodes, &history).is_ok());
    }

    #[test]
    fn publish_replaces_current() {
        let (nodes, history) = district(6);
        let reg = MemoryModelRegistry::new();
        let trainer = ModelTrainer::new(quick_config());
        let published = trainer.train_and_publish(&nodes, &history, &reg).unwrap();
        let current = reg.current().unwrap().unwrap();
        assert_eq!(current.metadata(), published.metadata());
    }
}
