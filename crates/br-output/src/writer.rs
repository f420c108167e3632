//! The `RouteWriter` trait implemented by all backends.

use br_planner::RouteRecord;

use crate::OutputResult;

pub trait RouteWriter {
    /// Append one route.  Writers number routes from 0 in call order.
    fn write_route(&mut self, record: &RouteRecord) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
