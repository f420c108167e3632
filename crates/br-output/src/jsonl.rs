//! JSON-lines backend: one serialised `RouteRecord` per line in
//! `routes.jsonl`, exactly as the planner produced it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use br_planner::RouteRecord;

use crate::OutputResult;
use crate::writer::RouteWriter;

pub struct JsonLinesRouteWriter {
    out:      BufWriter<File>,
    finished: bool,
}

impl JsonLinesRouteWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let file = File::create(dir.join("routes.jsonl"))?;
        Ok(Self { out: BufWriter::new(file), finished: false })
    }
}

impl RouteWriter for JsonLinesRouteWriter {
    fn write_route(&mut self, record: &RouteRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        Ok(())
    }
}
