//! Path types.

use aomdv_core::{Address, Timestamp};

/// One candidate forwarding choice toward a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path {
    /// Neighbor the packet is handed to.
    pub next_hop: Address,
    /// Hops from this node to the destination along this path.
    pub hop_count: u16,
    /// Neighbor of the destination that the route advertisement came through.
    pub last_hop: Address,
    /// Absolute expiry of this path.
    pub expires: Timestamp,
}

impl Path {
    pub fn new(next_hop: Address, hop_count: u16, expires: Timestamp, last_hop: Address) -> Self {
        Self {
            next_hop,
            hop_count,
            last_hop,
            expires,
        }
    }

    /// Uses strict `<`: a path is still usable at exactly `expires`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires < now
    }

    /// Whether this path shares a next hop or a last hop with the given pair.
    pub fn overlaps(&self, next_hop: Address, last_hop: Address) -> bool {
        self.next_hop == next_hop || self.last_hop == last_hop
    }
}
