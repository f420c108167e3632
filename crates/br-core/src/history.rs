//! Per-node reading history.
//!
//! Readings for each node are kept sorted **newest first**, so `latest` is an
//! O(1) lookup and rolling windows are simple prefixes.

use std::collections::HashMap;

use crate::{NodeId, SensorSnapshot};

/// Sensor readings grouped by node, each group ordered newest first.
#[derive(Clone, Debug, Default)]
pub struct ReadingHistory {
    by_node: HashMap<NodeId, Vec<SensorSnapshot>>,
}

impl ReadingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group and sort an unordered batch of readings.
    pub fn from_readings(readings: impl IntoIterator<Item = SensorSnapshot>) -> Self {
        let mut history = Self::new();
        for reading in readings {
            history.by_node.entry(reading.node).or_default().push(reading);
        }
        for readings in history.by_node.values_mut() {
            readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        history
    }

    /// Insert one reading, keeping the node's readings newest first.
    pub fn push(&mut self, reading: SensorSnapshot) {
        let readings = self.by_node.entry(reading.node).or_default();
        let pos = readings.partition_point(|r| r.timestamp >= reading.timestamp);
        readings.insert(pos, reading);
    }

    /// All readings for `node`, newest first.  Empty if the node has none.
    pub fn readings(&self, node: NodeId) -> &[SensorSnapshot] {
        self.by_node.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The newest reading for `node`.
    pub fn latest(&self, node: NodeId) -> Option<&SensorSnapshot> {
        self.readings(node).first()
    }

    pub fn has_data(&self, node: NodeId) -> bool {
        !self.readings(node).is_empty()
    }

    /// Number of nodes with at least one reading.
    pub fn node_count(&self) -> usize {
        self.by_node.len()
    }

    /// Total readings across all nodes.
    pub fn reading_count(&self) -> usize {
        self.by_node.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}
