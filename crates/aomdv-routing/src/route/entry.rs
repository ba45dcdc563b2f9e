//! Routing state for a single destination.

use std::time::Duration;

use aomdv_core::{Address, InterfaceAddress, InterfaceId, Timestamp};

use super::types::{RouteFlag, RouteInfo};
use crate::constants::INFINITY_HOPS;
use crate::path::PathSet;

/// One destination's preferred route, alternate paths, precursors and timers.
///
/// Entries are plain values: the table hands out copies, and changes reach
/// the table only through [`RoutingTable::update`](super::RoutingTable::update)
/// and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    route: RouteInfo,
    iface: InterfaceAddress,
    paths: PathSet,
    precursors: Vec<Address>,
    flag: RouteFlag,
    /// Absolute expiry.
    lifetime: Timestamp,
    valid_seq_no: bool,
    seq_no: u32,
    hops: u16,
    request_count: u32,
    advertised_hops: u16,
    highest_seq_no_heard: u32,
    route_error: bool,
    unidirectional: bool,
    blacklist_timeout: Timestamp,
}

impl RouteEntry {
    /// Create a valid entry expiring `lifetime` after `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: InterfaceId,
        destination: Address,
        valid_seq_no: bool,
        seq_no: u32,
        iface: InterfaceAddress,
        hops: u16,
        next_hop: Address,
        lifetime: Duration,
        now: Timestamp,
    ) -> Self {
        Self {
            route: RouteInfo {
                destination,
                gateway: next_hop,
                source: iface.local,
                output_device: device,
            },
            iface,
            paths: PathSet::new(),
            precursors: Vec::new(),
            flag: RouteFlag::Valid,
            lifetime: now + lifetime,
            valid_seq_no,
            seq_no,
            hops,
            request_count: 0,
            advertised_hops: INFINITY_HOPS,
            highest_seq_no_heard: 0,
            route_error: false,
            unidirectional: false,
            blacklist_timeout: now,
        }
    }

    #[must_use]
    pub fn destination(&self) -> Address {
        self.route.destination
    }

    #[must_use]
    pub fn route(&self) -> &RouteInfo {
        &self.route
    }

    /// Replace the preferred route. The destination is kept.
    pub fn set_route(&mut self, route: RouteInfo) {
        self.route = RouteInfo {
            destination: self.route.destination,
            ..route
        };
    }

    #[must_use]
    pub fn next_hop(&self) -> Address {
        self.route.gateway
    }

    pub fn set_next_hop(&mut self, next_hop: Address) {
        self.route.gateway = next_hop;
    }

    #[must_use]
    pub fn output_device(&self) -> InterfaceId {
        self.route.output_device
    }

    pub fn set_output_device(&mut self, device: InterfaceId) {
        self.route.output_device = device;
    }

    #[must_use]
    pub fn interface(&self) -> InterfaceAddress {
        self.iface
    }

    pub fn set_interface(&mut self, iface: InterfaceAddress) {
        self.iface = iface;
    }

    // --- Alternate paths ---

    #[must_use]
    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut PathSet {
        &mut self.paths
    }

    /// Number of alternate paths.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    // --- Lifecycle ---

    #[must_use]
    pub fn flag(&self) -> RouteFlag {
        self.flag
    }

    /// Set the lifecycle flag. Entering `Invalid` clears the request counter.
    pub fn set_flag(&mut self, flag: RouteFlag) {
        self.flag = flag;
        if flag == RouteFlag::Invalid {
            self.request_count = 0;
        }
    }

    /// Mark the route broken, keeping it for `bad_link_lifetime` from `now`.
    ///
    /// No-op if the entry is already invalid, so repeated invalidation does
    /// not keep extending the grace window.
    pub fn invalidate(&mut self, bad_link_lifetime: Duration, now: Timestamp) {
        if self.flag == RouteFlag::Invalid {
            return;
        }
        self.flag = RouteFlag::Invalid;
        self.request_count = 0;
        self.lifetime = now + bad_link_lifetime;
        tracing::debug!(
            dst = %self.route.destination,
            lifetime = %self.lifetime,
            "route invalidated"
        );
    }

    /// Absolute expiry.
    #[must_use]
    pub fn lifetime(&self) -> Timestamp {
        self.lifetime
    }

    /// Expire `lifetime` after `now`.
    pub fn set_lifetime(&mut self, lifetime: Duration, now: Timestamp) {
        self.lifetime = now + lifetime;
    }

    /// Signed seconds until expiry; negative once expired.
    #[must_use]
    pub fn remaining_lifetime(&self, now: Timestamp) -> f64 {
        self.lifetime.secs_from(now)
    }

    /// Uses strict `<`: the entry is still live at exactly its lifetime.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.lifetime < now
    }

    // --- Sequence numbers and hop counts ---

    #[must_use]
    pub fn valid_seq_no(&self) -> bool {
        self.valid_seq_no
    }

    pub fn set_valid_seq_no(&mut self, valid: bool) {
        self.valid_seq_no = valid;
    }

    #[must_use]
    pub fn seq_no(&self) -> u32 {
        self.seq_no
    }

    pub fn set_seq_no(&mut self, seq_no: u32) {
        self.seq_no = seq_no;
    }

    #[must_use]
    pub fn hops(&self) -> u16 {
        self.hops
    }

    pub fn set_hops(&mut self, hops: u16) {
        self.hops = hops;
    }

    #[must_use]
    pub fn advertised_hops(&self) -> u16 {
        self.advertised_hops
    }

    pub fn set_advertised_hops(&mut self, hops: u16) {
        self.advertised_hops = hops;
    }

    #[must_use]
    pub fn highest_seq_no_heard(&self) -> u32 {
        self.highest_seq_no_heard
    }

    pub fn set_highest_seq_no_heard(&mut self, seq_no: u32) {
        self.highest_seq_no_heard = seq_no;
    }

    #[must_use]
    pub fn route_error(&self) -> bool {
        self.route_error
    }

    pub fn set_route_error(&mut self, error: bool) {
        self.route_error = error;
    }

    // --- Route request retries ---

    #[must_use]
    pub fn request_count(&self) -> u32 {
        self.request_count
    }

    pub fn set_request_count(&mut self, count: u32) {
        self.request_count = count;
    }

    pub fn increment_request_count(&mut self) {
        self.request_count = self.request_count.saturating_add(1);
    }

    // --- Unidirectional link blacklist ---

    #[must_use]
    pub fn is_unidirectional(&self) -> bool {
        self.unidirectional
    }

    pub fn set_unidirectional(&mut self, unidirectional: bool) {
        self.unidirectional = unidirectional;
    }

    #[must_use]
    pub fn blacklist_timeout(&self) -> Timestamp {
        self.blacklist_timeout
    }

    pub fn set_blacklist_timeout(&mut self, timeout: Timestamp) {
        self.blacklist_timeout = timeout;
    }

    /// Whether the neighbor is still suppressed at `now`.
    #[must_use]
    pub fn is_blacklisted(&self, now: Timestamp) -> bool {
        self.unidirectional && now <= self.blacklist_timeout
    }

    // --- Precursors ---

    /// Add a precursor. Returns false if it was already present.
    pub fn insert_precursor(&mut self, id: Address) -> bool {
        if self.lookup_precursor(id) {
            return false;
        }
        self.precursors.push(id);
        true
    }

    #[must_use]
    pub fn lookup_precursor(&self, id: Address) -> bool {
        self.precursors.contains(&id)
    }

    /// Remove every occurrence of `id`. Returns true if any was removed.
    pub fn delete_precursor(&mut self, id: Address) -> bool {
        let before = self.precursors.len();
        self.precursors.retain(|p| *p != id);
        self.precursors.len() != before
    }

    pub fn delete_all_precursors(&mut self) {
        self.precursors.clear();
    }

    #[must_use]
    pub fn is_precursor_list_empty(&self) -> bool {
        self.precursors.is_empty()
    }

    #[must_use]
    pub fn precursors(&self) -> &[Address] {
        &self.precursors
    }

    /// Append this entry's precursors to `acc`, skipping ones already there.
    pub fn collect_precursors(&self, acc: &mut Vec<Address>) {
        for p in &self.precursors {
            if !acc.contains(p) {
                acc.push(*p);
            }
        }
    }

    // --- Diagnostics ---

    /// One tab-separated row of the route table listing.
    ///
    /// Columns: destination, gateway, interface address, flag, seconds
    /// until expiry, hop count.
    #[must_use]
    pub fn render(&self, now: Timestamp) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{:<14.2}\t{}\n",
            self.route.destination,
            self.route.gateway,
            self.iface.local,
            self.flag.label(),
            self.remaining_lifetime(now),
            self.hops,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        Address::new([10, 0, 0, last])
    }

    fn iface() -> InterfaceAddress {
        InterfaceAddress::new(addr(1), Address::new([255, 255, 255, 0]))
    }

    fn make_entry(now: Timestamp) -> RouteEntry {
        RouteEntry::new(
            InterfaceId(1),
            addr(50),
            true,
            7,
            iface(),
            3,
            addr(2),
            Duration::from_secs(10),
            now,
        )
    }

    #[test]
    fn test_new_entry_defaults() {
        let now = Timestamp::from_secs(100);
        let entry = make_entry(now);

        assert_eq!(entry.destination(), addr(50));
        assert_eq!(entry.next_hop(), addr(2));
        assert_eq!(entry.route().source, addr(1));
        assert_eq!(entry.output_device(), InterfaceId(1));
        assert_eq!(entry.flag(), RouteFlag::Valid);
        assert_eq!(entry.lifetime(), Timestamp::from_secs(110));
        assert_eq!(entry.seq_no(), 7);
        assert!(entry.valid_seq_no());
        assert_eq!(entry.hops(), 3);
        assert_eq!(entry.request_count(), 0);
        assert_eq!(entry.advertised_hops(), INFINITY_HOPS);
        assert_eq!(entry.highest_seq_no_heard(), 0);
        assert!(!entry.route_error());
        assert!(!entry.is_unidirectional());
        assert_eq!(entry.blacklist_timeout(), now);
        assert_eq!(entry.path_count(), 0);
        assert!(entry.is_precursor_list_empty());
    }

    #[test]
    fn test_invalidate() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        entry.set_request_count(3);

        let now = Timestamp::from_secs(105);
        entry.invalidate(Duration::from_secs(15), now);
        assert_eq!(entry.flag(), RouteFlag::Invalid);
        assert_eq!(entry.request_count(), 0);
        assert_eq!(entry.lifetime(), Timestamp::from_secs(120));
    }

    #[test]
    fn test_invalidate_twice_keeps_first_grace() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        entry.invalidate(Duration::from_secs(15), Timestamp::from_secs(105));
        entry.invalidate(Duration::from_secs(15), Timestamp::from_secs(110));
        assert_eq!(entry.lifetime(), Timestamp::from_secs(120));
    }

    #[test]
    fn test_invalidate_in_search() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        entry.set_flag(RouteFlag::InSearch);
        entry.increment_request_count();
        entry.invalidate(Duration::from_secs(1), Timestamp::from_secs(100));
        assert_eq!(entry.flag(), RouteFlag::Invalid);
        assert_eq!(entry.request_count(), 0);
    }

    #[test]
    fn test_set_flag_invalid_resets_request_count() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        entry.set_flag(RouteFlag::InSearch);
        entry.increment_request_count();
        entry.increment_request_count();
        assert_eq!(entry.request_count(), 2);

        entry.set_flag(RouteFlag::Invalid);
        assert_eq!(entry.request_count(), 0);
    }

    #[test]
    fn test_lifetime_expiry_is_strict() {
        let entry = make_entry(Timestamp::from_secs(100));
        assert!(!entry.is_expired(Timestamp::from_secs(110)));
        assert!(entry.is_expired(Timestamp::from_millis(110_001)));
    }

    #[test]
    fn test_set_lifetime_and_remaining() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        entry.set_lifetime(Duration::from_millis(2500), Timestamp::from_secs(200));
        assert_eq!(entry.lifetime(), Timestamp::from_millis(202_500));
        assert_eq!(entry.remaining_lifetime(Timestamp::from_secs(200)), 2.5);
        assert_eq!(entry.remaining_lifetime(Timestamp::from_secs(203)), -0.5);
    }

    #[test]
    fn test_set_route_keeps_destination() {
        let mut entry = make_entry(Timestamp::ZERO);
        entry.set_route(RouteInfo {
            destination: addr(99),
            gateway: addr(3),
            source: addr(1),
            output_device: InterfaceId(2),
        });
        assert_eq!(entry.destination(), addr(50));
        assert_eq!(entry.next_hop(), addr(3));
        assert_eq!(entry.output_device(), InterfaceId(2));
    }

    #[test]
    fn test_path_count_tracks_path_set() {
        let mut entry = make_entry(Timestamp::ZERO);
        let expires = Timestamp::from_secs(10);
        entry.paths_mut().insert(addr(2), 3, expires, addr(40));
        entry.paths_mut().insert(addr(3), 5, expires, addr(41));
        assert_eq!(entry.path_count(), 2);

        entry.paths_mut().remove_next_hop(addr(2));
        assert_eq!(entry.path_count(), 1);
        assert_eq!(entry.path_count(), entry.paths().len());
    }

    #[test]
    fn test_blacklist() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        assert!(!entry.is_blacklisted(Timestamp::from_secs(100)));

        entry.set_unidirectional(true);
        entry.set_blacklist_timeout(Timestamp::from_secs(105));
        assert!(entry.is_blacklisted(Timestamp::from_secs(105)));
        assert!(!entry.is_blacklisted(Timestamp::from_secs(106)));
    }

    #[test]
    fn test_precursor_insert_lookup_delete() {
        let mut entry = make_entry(Timestamp::ZERO);
        assert!(entry.insert_precursor(addr(7)));
        assert!(!entry.insert_precursor(addr(7)));
        assert!(entry.insert_precursor(addr(8)));
        assert!(entry.lookup_precursor(addr(7)));
        assert!(!entry.lookup_precursor(addr(9)));

        assert!(entry.delete_precursor(addr(7)));
        assert!(!entry.delete_precursor(addr(7)));
        assert_eq!(entry.precursors(), &[addr(8)]);

        entry.delete_all_precursors();
        assert!(entry.is_precursor_list_empty());
    }

    #[test]
    fn test_collect_precursors_is_a_union() {
        let mut a = make_entry(Timestamp::ZERO);
        a.insert_precursor(addr(7));
        a.insert_precursor(addr(8));
        let mut b = make_entry(Timestamp::ZERO);
        b.insert_precursor(addr(8));
        b.insert_precursor(addr(9));

        let mut acc = vec![addr(9)];
        a.collect_precursors(&mut acc);
        b.collect_precursors(&mut acc);
        assert_eq!(acc, vec![addr(9), addr(7), addr(8)]);
    }

    #[test]
    fn test_render_row() {
        let now = Timestamp::from_secs(100);
        let entry = make_entry(now);
        assert_eq!(
            entry.render(Timestamp::from_millis(102_500)),
            "10.0.0.50\t10.0.0.2\t10.0.0.1\tUP\t7.50          \t3\n"
        );
    }

    #[test]
    fn test_render_row_negative_remaining() {
        let mut entry = make_entry(Timestamp::from_secs(100));
        entry.invalidate(Duration::ZERO, Timestamp::from_secs(100));
        let row = entry.render(Timestamp::from_millis(101_250));
        assert!(row.contains("\tDOWN\t-1.25 "), "row was {row:?}");
    }
}
