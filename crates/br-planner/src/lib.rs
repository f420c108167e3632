//! `br-planner` — turns a route request into an auditable route record.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`config`]  | `PlannerConfig` (JSON-loadable defaults), `MAX_TOP_N`      |
//! | [`request`] | `RouteRequest`                                             |
//! | [`planner`] | `RoutePlanner`                                             |
//! | [`record`]  | `RouteRecord`, `EdgeRecord`, `SourceKind`                  |
//! | [`error`]   | `PlanError`, `PlanResult<T>`                               |
//!
//! # Example
//!
//! ```rust,ignore
//! let planner = RoutePlanner::from_registry(PlannerConfig::default(), &registry)?;
//! let request = RouteRequest::at(GeoPoint::new(30.69, -88.04)).with_top_n(3);
//! let record = planner.plan(&nodes, &history, &request)?;
//! println!("{}", serde_json::to_string(&record)?);
//! ```

pub mod config;
pub mod error;
pub mod planner;
pub mod record;
pub mod request;

#[cfg(test)]
mod tests;

pub use config::{ALGORITHM_VERSION, MAX_TOP_N, PlannerConfig};
pub use error::{PlanError, PlanResult};
pub use planner::RoutePlanner;
pub use record::{EdgeRecord, RouteRecord, SourceKind};
pub use request::RouteRequest;
