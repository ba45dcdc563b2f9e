//! Route table keyed by destination address.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use aomdv_core::{Address, InterfaceAddress, Timestamp};

use super::entry::RouteEntry;
use super::prune::{PrunedRoute, PrunedRoutes};
use super::types::RouteFlag;
use crate::error::RouteError;

/// Header of the route table listing.
pub const TABLE_HEADER: &str =
    "\nAOMDV Routing table\nDestination\tGateway\t\tInterface\tFlag\tExpire\t\tHops\n";

/// Route table mapping destinations to route entries.
#[derive(Debug, Clone)]
#[must_use]
pub struct RoutingTable {
    entries: HashMap<Address, RouteEntry>,
    /// Grace period granted to an invalidated route before collection.
    bad_link_lifetime: Duration,
}

impl RoutingTable {
    pub fn new(bad_link_lifetime: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            bad_link_lifetime,
        }
    }

    #[must_use]
    pub fn bad_link_lifetime(&self) -> Duration {
        self.bad_link_lifetime
    }

    pub fn set_bad_link_lifetime(&mut self, lifetime: Duration) {
        self.bad_link_lifetime = lifetime;
    }

    /// Purge, then return a copy of the entry for `dst`.
    pub fn lookup(&mut self, dst: Address, now: Timestamp) -> Option<RouteEntry> {
        self.purge(now);
        let found = self.entries.get(&dst).cloned();
        tracing::trace!(%dst, found = found.is_some(), "route lookup");
        found
    }

    /// Like [`lookup`](Self::lookup), but only returns valid routes.
    pub fn lookup_valid(&mut self, dst: Address, now: Timestamp) -> Option<RouteEntry> {
        self.lookup(dst, now).filter(|e| e.flag() == RouteFlag::Valid)
    }

    /// Purge, then insert `entry` if its destination is not yet present.
    ///
    /// Never overwrites. Returns whether the entry was inserted.
    pub fn add_route(&mut self, mut entry: RouteEntry, now: Timestamp) -> bool {
        self.purge(now);
        if entry.flag() != RouteFlag::InSearch {
            entry.set_request_count(0);
        }
        let dst = entry.destination();
        if self.entries.contains_key(&dst) {
            tracing::trace!(%dst, "route already present, not added");
            return false;
        }
        tracing::debug!(%dst, next_hop = %entry.next_hop(), flag = %entry.flag(), "route added");
        self.entries.insert(dst, entry);
        true
    }

    /// Replace the stored entry for an existing destination.
    pub fn update(&mut self, mut entry: RouteEntry) -> Result<(), RouteError> {
        let dst = entry.destination();
        let Some(slot) = self.entries.get_mut(&dst) else {
            tracing::trace!(%dst, "route update failed, not found");
            return Err(RouteError::NoRoute(dst));
        };
        if entry.flag() != RouteFlag::InSearch {
            entry.set_request_count(0);
        }
        tracing::debug!(%dst, flag = %entry.flag(), paths = entry.path_count(), "route updated");
        *slot = entry;
        Ok(())
    }

    /// Set the flag of an existing entry and clear its request counter.
    pub fn set_entry_state(&mut self, dst: Address, flag: RouteFlag) -> Result<(), RouteError> {
        let entry = self
            .entries
            .get_mut(&dst)
            .ok_or(RouteError::NoRoute(dst))?;
        entry.set_flag(flag);
        entry.set_request_count(0);
        tracing::debug!(%dst, %flag, "route state set");
        Ok(())
    }

    /// Purge, then remove the entry for `dst`. Returns whether it existed.
    pub fn delete_route(&mut self, dst: Address, now: Timestamp) -> bool {
        self.purge(now);
        let removed = self.entries.remove(&dst).is_some();
        tracing::debug!(%dst, removed, "route deletion");
        removed
    }

    /// Purge, then drop every alternate path through `next_hop`, across all
    /// entries.
    ///
    /// Preferred routes and paths through other neighbors are untouched, as
    /// are the entries themselves. Returns the destinations that lost paths.
    pub fn remove_next_hop(&mut self, next_hop: Address, now: Timestamp) -> PrunedRoutes {
        self.purge(now);
        let mut pruned = Vec::new();
        for (dst, entry) in &mut self.entries {
            let removed = entry.paths_mut().remove_next_hop(next_hop);
            if removed > 0 {
                pruned.push(PrunedRoute {
                    destination: *dst,
                    removed,
                    remaining: entry.path_count(),
                    seq_no: entry.seq_no(),
                });
            }
        }
        tracing::debug!(%next_hop, affected = pruned.len(), "pruned paths via next hop");
        PrunedRoutes::from_unsorted(pruned)
    }

    /// Remove every entry bound to `iface`. Returns the number removed.
    pub fn delete_all_routes_from_interface(&mut self, iface: &InterfaceAddress) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.interface() != *iface);
        let removed = before - self.entries.len();
        tracing::debug!(iface = %iface.local, removed, "removed routes from interface");
        removed
    }

    /// Apply the two-phase expiry to every entry.
    ///
    /// Returns the number of entries removed.
    pub fn purge(&mut self, now: Timestamp) -> usize {
        let before = self.entries.len();
        let grace = self.bad_link_lifetime;
        self.entries.retain(|dst, entry| age_entry(dst, entry, grace, now));
        before - self.entries.len()
    }

    /// Apply the same expiry policy to a detached copy of the table.
    pub fn purge_snapshot(&self, snapshot: &mut BTreeMap<Address, RouteEntry>, now: Timestamp) {
        let grace = self.bad_link_lifetime;
        snapshot.retain(|dst, entry| age_entry(dst, entry, grace, now));
    }

    /// Copy of all entries, ordered by destination.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Address, RouteEntry> {
        self.entries
            .iter()
            .map(|(dst, entry)| (*dst, entry.clone()))
            .collect()
    }

    /// True if any entry is valid.
    #[must_use]
    pub fn has_active_routes(&self) -> bool {
        self.entries.values().any(|e| e.flag() == RouteFlag::Valid)
    }

    /// Blacklist `neighbor` until `blacklist_timeout`.
    pub fn mark_link_as_unidirectional(
        &mut self,
        neighbor: Address,
        blacklist_timeout: Timestamp,
    ) -> Result<(), RouteError> {
        let entry = self
            .entries
            .get_mut(&neighbor)
            .ok_or(RouteError::NoRoute(neighbor))?;
        entry.set_unidirectional(true);
        entry.set_blacklist_timeout(blacklist_timeout);
        entry.set_request_count(0);
        tracing::debug!(%neighbor, until = %blacklist_timeout, "link marked unidirectional");
        Ok(())
    }

    /// Tabular listing of a purged copy of the table.
    ///
    /// The live table is not modified.
    #[must_use]
    pub fn render(&self, now: Timestamp) -> String {
        let mut snapshot = self.snapshot();
        self.purge_snapshot(&mut snapshot, now);

        let mut out = String::from(TABLE_HEADER);
        for entry in snapshot.values() {
            out.push_str(&entry.render(now));
        }
        out.push('\n');
        out
    }

    /// Check if a destination exists in the table (regardless of expiry).
    #[must_use]
    pub fn contains(&self, dst: Address) -> bool {
        self.entries.contains_key(&dst)
    }

    /// Peek at an entry without purging.
    #[must_use]
    pub fn get(&self, dst: Address) -> Option<&RouteEntry> {
        self.entries.get(&dst)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &RouteEntry)> {
        self.entries.iter()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(crate::constants::DELETE_PERIOD)
    }
}

/// Age one entry. Returns false if it should be dropped.
fn age_entry(dst: &Address, entry: &mut RouteEntry, grace: Duration, now: Timestamp) -> bool {
    if !entry.is_expired(now) {
        return true;
    }
    match entry.flag() {
        RouteFlag::Invalid => {
            tracing::debug!(%dst, "collecting expired invalid route");
            false
        }
        RouteFlag::Valid => {
            tracing::debug!(%dst, "invalidating expired route");
            entry.invalidate(grace, now);
            true
        }
        RouteFlag::InSearch => true,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use aomdv_core::InterfaceId;
    use proptest::prelude::*;

    fn flag_from(n: u8) -> RouteFlag {
        match n % 3 {
            0 => RouteFlag::Valid,
            1 => RouteFlag::Invalid,
            _ => RouteFlag::InSearch,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn purge_twice_equals_purge_once(
            routes in proptest::collection::vec((any::<u8>(), 0..3u8, 0..50u64), 0..20),
            grace in 0..30u64,
            now in 0..80u64,
        ) {
            let mut table = RoutingTable::new(Duration::from_secs(grace));
            for (dst, flag, lifetime) in routes {
                let mut entry = RouteEntry::new(
                    InterfaceId(1),
                    Address::new([10, 0, 1, dst]),
                    false,
                    0,
                    InterfaceAddress::new(Address::new([10, 0, 0, 1]), Address::new([255, 255, 0, 0])),
                    1,
                    Address::new([10, 0, 0, 2]),
                    Duration::from_secs(lifetime),
                    Timestamp::ZERO,
                );
                entry.set_flag(flag_from(flag));
                table.add_route(entry, Timestamp::ZERO);
            }
            let now = Timestamp::from_secs(now);
            table.purge(now);
            let once = table.snapshot();
            table.purge(now);
            prop_assert_eq!(table.snapshot(), once);
            for entry in table.iter().map(|(_, e)| e) {
                if entry.flag() == RouteFlag::Invalid {
                    prop_assert_eq!(entry.request_count(), 0);
                }
                if entry.flag() != RouteFlag::InSearch {
                    prop_assert!(!entry.is_expired(now));
                }
            }
        }
    }
}
