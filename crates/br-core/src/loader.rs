//! CSV loaders for nodes and sensor readings.
//!
//! # CSV formats
//!
//! Nodes, one row per collection point.  Empty `lat`, `lon` or `group` cells
//! mean "not recorded":
//!
//! ```csv
//! id,lat,lon,group
//! 1,30.6954,-88.0399,downtown
//! 2,30.7012,-88.0451,
//! 3,,,downtown
//! ```
//!
//! Readings, one row per sensor sample, in any order.  Timestamps are
//! RFC 3339:
//!
//! ```csv
//! node_id,timestamp,temperature,humidity,gas_level,waste_level
//! 1,2024-05-06T08:00:00Z,27.5,64.0,0.31,0.72
//! ```

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{CoreError, CoreResult, Node, NodeId, ReadingHistory, SensorSnapshot};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:    u32,
    lat:   Option<f64>,
    lon:   Option<f64>,
    group: Option<String>,
}

#[derive(Deserialize)]
struct ReadingRecord {
    node_id:     u32,
    timestamp:   DateTime<Utc>,
    temperature: f64,
    humidity:    f64,
    gas_level:   f64,
    waste_level: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load nodes from a CSV file, preserving file order.
pub fn load_nodes_csv(path: &Path) -> CoreResult<Vec<Node>> {
    let file = std::fs::File::open(path)?;
    load_nodes_reader(file)
}

/// Like [`load_nodes_csv`] but accepts any `Read` source.
pub fn load_nodes_reader<R: Read>(reader: R) -> CoreResult<Vec<Node>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut nodes = Vec::new();

    for result in csv_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| CoreError::Parse(e.to_string()))?;
        let group = row.group.map(|g| g.trim().to_owned()).filter(|g| !g.is_empty());
        nodes.push(Node {
            id: NodeId(row.id),
            lat: row.lat,
            lon: row.lon,
            group,
        });
    }

    Ok(nodes)
}

/// Load sensor readings from a CSV file into a [`ReadingHistory`].
pub fn load_readings_csv(path: &Path) -> CoreResult<ReadingHistory> {
    let file = std::fs::File::open(path)?;
    load_readings_reader(file)
}

/// Like [`load_readings_csv`] but accepts any `Read` source.
pub fn load_readings_reader<R: Read>(reader: R) -> CoreResult<ReadingHistory> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut readings = Vec::new();

    for result in csv_reader.deserialize::<ReadingRecord>() {
        let row = result.map_err(|e| CoreError::Parse(e.to_string()))?;
        readings.push(SensorSnapshot {
            node:        NodeId(row.node_id),
            temperature: row.temperature,
            humidity:    row.humidity,
            gas_level:   row.gas_level,
            waste_level: row.waste_level,
            timestamp:   row.timestamp,
        });
    }

    Ok(ReadingHistory::from_readings(readings))
}
