//! `br-output` — persists [`RouteRecord`](br_planner::RouteRecord)s for the
//! audit trail.
//!
//! | Writer                   | Files created                          |
//! |--------------------------|----------------------------------------|
//! | [`CsvRouteWriter`]       | `routes.csv`, `route_edges.csv`        |
//! | [`JsonLinesRouteWriter`] | `routes.jsonl`                         |
//!
//! Both implement [`RouteWriter`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use br_output::{CsvRouteWriter, RouteWriter};
//!
//! let mut out = CsvRouteWriter::new(Path::new("./output"))?;
//! out.write_route(&record)?;
//! out.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod jsonl;
pub mod row;
pub mod writer;


pub use csv::CsvRouteWriter;
pub use error::{OutputError, OutputResult};
pub use jsonl::JsonLinesRouteWriter;
pub use row::{RouteEdgeRow, RouteRow};
pub use writer::RouteWriter;
