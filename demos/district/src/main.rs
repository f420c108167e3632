//! district — end-to-end demo for the binroute engine.
//!
//! Loads twelve collection points and their recent readings, trains the
//! urgency model into a file registry, then plans two routes: one from a
//! crew's current location to the five most urgent points, and one inside
//! the downtown group starting at a fixed depot node.  Both route records
//! are written as CSV and JSON lines under `output/district/`.

mod data;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use br_core::{GeoPoint, NodeId, load_nodes_reader, load_readings_reader};
use br_model::{FileModelRegistry, ModelRegistry};
use br_output::{CsvRouteWriter, JsonLinesRouteWriter, RouteWriter};
use br_planner::{PlannerConfig, RoutePlanner, RouteRecord, RouteRequest};
use br_scoring::{ModelTrainer, TrainerConfig};

use data::{NODES_CSV, READINGS_CSV};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/district";
const CREW_LOCATION: GeoPoint = GeoPoint { lat: 30.6935, lon: -88.0430 };
const DEPOT_NODE: NodeId = NodeId(1);
const PLANNER_JSON: &str = r#"{ "alpha": 0.5, "top_n": 5 }"#;

fn main() -> Result<()> {
    println!("=== district — binroute demo ===");
    println!();

    // 1. Inputs.
    let nodes = load_nodes_reader(Cursor::new(NODES_CSV))?;
    let history = load_readings_reader(Cursor::new(READINGS_CSV))?;
    println!(
        "Loaded {} nodes, {} readings across {} instrumented nodes",
        nodes.len(),
        history.reading_count(),
        history.node_count()
    );

    // 2. Train and publish the urgency model.
    let output = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(output)?;
    let registry = FileModelRegistry::new(output.join("model"))?;

    let trainer = ModelTrainer::new(TrainerConfig {
        reference: Some(CREW_LOCATION),
        ..TrainerConfig::default()
    });
    let t0 = Instant::now();
    let model = trainer.train_and_publish(&nodes, &history, &registry)?;
    let meta = model.metadata();
    println!(
        "Trained {} on {} samples in {:.3} s (validation: mse {:.5}, r2 {:.3}, {} held out)",
        meta.version,
        meta.n_samples,
        t0.elapsed().as_secs_f64(),
        meta.validation.mse,
        meta.validation.r2,
        meta.validation.n_validation,
    );
    let mut ranked: Vec<_> = meta.feature_importances.iter().collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for fi in ranked.iter().take(3) {
        println!("  {:<20} {:.3}", fi.name, fi.importance);
    }
    println!("Model artifact: {}", registry.artifact_path().display());
    println!();

    // 3. Planner backed by the registry's current model.
    let config = PlannerConfig::from_json_str(PLANNER_JSON)?;
    let planner = RoutePlanner::from_registry(config, &registry)?;
    println!(
        "Planner: alpha {}, top_n {}, model {}",
        planner.config().alpha,
        planner.config().top_n,
        registry.current()?.map(|m| m.version().to_string()).unwrap_or_else(|| "none".into()),
    );
    println!();

    // 4. Plan.
    let crew = planner.plan(&nodes, &history, &RouteRequest::at(CREW_LOCATION))?;
    let depot = planner.plan(
        &nodes,
        &history,
        &RouteRequest::at(CREW_LOCATION).in_group("downtown").from_node(DEPOT_NODE),
    )?;

    // 5. Output.
    let mut csv_out = CsvRouteWriter::new(output)?;
    let mut json_out = JsonLinesRouteWriter::new(output)?;
    for record in [&crew, &depot] {
        csv_out.write_route(record)?;
        json_out.write_route(record)?;
    }
    csv_out.finish()?;
    json_out.finish()?;

    print_route("From crew location (top 5 by urgency)", &crew);
    print_route("Downtown loop from depot", &depot);

    println!("Wrote routes.csv, route_edges.csv, routes.jsonl to {OUTPUT_DIR}/");
    println!();
    println!("First record as stored:");
    println!("{}", serde_json::to_string_pretty(&crew)?);

    Ok(())
}

fn print_route(title: &str, record: &RouteRecord) {
    println!("{title}");
    println!("{:<6} {:<8} {:<10}", "Stop", "Node", "Urgency");
    println!("{}", "-".repeat(26));
    for (i, node) in record.visit_order.iter().enumerate() {
        println!("{:<6} {:<8} {:<10.3}", i + 1, node.get(), record.priority_scores.get(*node));
    }
    let path: Vec<String> = record.path.iter().map(|n| n.get().to_string()).collect();
    println!("Path: {}  |  cost {:.1}", path.join(" → "), record.total_cost);
    println!();
}
