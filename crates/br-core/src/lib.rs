//! `br-core` — foundational types for the binroute collection-routing engine.
//!
//! This crate is a dependency of every other `br-*` crate.  It has no `br-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `NodeId`                                                  |
//! | [`geo`]       | `GeoPoint`, haversine distance                            |
//! | [`node`]      | `Node`, `SensorSnapshot`                                  |
//! | [`history`]   | `ReadingHistory` (per-node readings, newest first)        |
//! | [`urgency`]   | `UrgencyScores` (node → clamped score)                    |
//! | [`rng`]       | `StreamRng` (seeded, per-stream deterministic RNG)        |
//! | [`loader`]    | CSV loaders for nodes and sensor readings                 |
//! | [`error`]     | `CoreError`, `CoreResult`                                 |

pub mod error;
pub mod geo;
pub mod history;
pub mod ids;
pub mod loader;
pub mod node;
pub mod rng;
pub mod urgency;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, distance_m};
pub use history::ReadingHistory;
pub use ids::NodeId;
pub use loader::{load_nodes_csv, load_nodes_reader, load_readings_csv, load_readings_reader};
pub use node::{Node, SensorSnapshot};
pub use rng::StreamRng;
pub use urgency::UrgencyScores;
