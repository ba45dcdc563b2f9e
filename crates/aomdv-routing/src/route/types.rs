//! Route types.

use core::fmt;

use aomdv_core::{Address, InterfaceId};

/// Lifecycle state of a route entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteFlag {
    /// Usable for forwarding.
    Valid,
    /// Broken or expired; kept for a grace period.
    Invalid,
    /// A route discovery for this destination is in progress.
    InSearch,
}

impl RouteFlag {
    /// Label used in the route table listing.
    pub fn label(&self) -> &'static str {
        match self {
            RouteFlag::Valid => "UP",
            RouteFlag::Invalid => "DOWN",
            RouteFlag::InSearch => "IN_SEARCH",
        }
    }
}

impl fmt::Display for RouteFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The currently preferred route toward a destination.
///
/// Independent of the entry's alternate paths; the protocol layer decides
/// when an alternate is promoted into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo {
    pub destination: Address,
    /// Next hop of the preferred route.
    pub gateway: Address,
    /// Local address used as the source of forwarded packets.
    pub source: Address,
    pub output_device: InterfaceId,
}
