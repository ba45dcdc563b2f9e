//! Operator surface for the AOMDV route table.
//!
//! Loads TOML configuration, installs the tracing subscriber, and replays
//! timed scenarios against a [`RoutingTable`](aomdv_routing::RoutingTable)
//! driven by a synthetic clock.

pub mod config;
pub mod error;
pub mod logging;
pub mod scenario;

pub use config::NodeConfig;
pub use error::NodeError;
pub use scenario::{Scenario, ScenarioRunner};
