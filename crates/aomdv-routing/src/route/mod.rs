//! Route entries and the destination-keyed route table.
//!
//! The table applies a lazy two-phase expiry: an expired valid route is
//! demoted to invalid with a grace lifetime, and only an expired invalid
//! route is removed. Routes being searched for are never aged out.

pub mod entry;
pub mod prune;
pub mod table;
pub mod types;

pub use entry::RouteEntry;
pub use prune::{PrunedRoute, PrunedRoutes};
pub use table::RoutingTable;
pub use types::{RouteFlag, RouteInfo};
