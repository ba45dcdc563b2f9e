//! Alternate next-hop paths toward a single destination.
//!
//! A route entry keeps every node-disjoint path it has learned, each with
//! its own hop count and expiry, so that losing one neighbor does not
//! necessarily lose the destination.

pub mod set;
pub mod types;

pub use set::PathSet;
pub use types::Path;
