//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `routes.csv`
//! - `route_edges.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use br_planner::RouteRecord;

use crate::writer::RouteWriter;
use crate::{OutputResult, RouteEdgeRow, RouteRow};

pub struct CsvRouteWriter {
    routes:   Writer<File>,
    edges:    Writer<File>,
    next_seq: u64,
    finished: bool,
}

impl CsvRouteWriter {
    /// Create (truncating) both CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut routes = Writer::from_path(dir.join("routes.csv"))?;
        routes.write_record(["route_seq", "computed_at", "source", "total_cost", "alpha", "path"])?;

        let mut edges = Writer::from_path(dir.join("route_edges.csv"))?;
        edges.write_record(["route_seq", "seq", "u", "v", "weight"])?;

        Ok(Self { routes, edges, next_seq: 0, finished: false })
    }
}

impl RouteWriter for CsvRouteWriter {
    fn write_route(&mut self, record: &RouteRecord) -> OutputResult<()> {
        let seq = self.next_seq;
        let row = RouteRow::from_record(seq, record);
        self.routes.write_record(&[
            row.route_seq.to_string(),
            row.computed_at,
            row.source.to_string(),
            row.total_cost.to_string(),
            row.alpha.to_string(),
            row.path,
        ])?;

        for edge in RouteEdgeRow::from_record(seq, record) {
            self.edges.write_record(&[
                edge.route_seq.to_string(),
                edge.seq.to_string(),
                edge.u.map(|u| u.to_string()).unwrap_or_default(),
                edge.v.to_string(),
                edge.weight.to_string(),
            ])?;
        }
        self.next_seq += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.routes.flush()?;
        self.edges.flush()?;
        Ok(())
    }
}
