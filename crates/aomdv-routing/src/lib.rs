//! Multipath route-state core for the AOMDV routing protocol.
//!
//! Each destination keeps a preferred route plus a set of alternate
//! next-hop paths. Entries age out lazily: nothing expires until an
//! operation that purges the table runs, and an expired valid route is
//! first demoted to invalid for a grace period before it is collected.

pub mod constants;
pub mod error;
pub mod path;
pub mod route;

pub use error::{PathError, RouteError};
pub use path::{Path, PathSet};
pub use route::{PrunedRoute, PrunedRoutes, RouteEntry, RouteFlag, RouteInfo, RoutingTable};
