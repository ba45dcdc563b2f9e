//! AOMDV protocol constants.

use std::time::Duration;

/// Hop count sentinel meaning "unreachable" / "not yet advertised".
pub const INFINITY_HOPS: u16 = 0xff;

/// Lifetime granted to a freshly discovered route.
pub const ACTIVE_ROUTE_TIMEOUT: Duration = Duration::from_secs(3);

/// Interval between hello messages.
pub const HELLO_INTERVAL: Duration = Duration::from_secs(1);

/// Grace window an invalidated route stays queryable before collection.
///
/// `5 * max(ACTIVE_ROUTE_TIMEOUT, HELLO_INTERVAL)`.
pub const DELETE_PERIOD: Duration = Duration::from_secs(15);

/// Route request retries before giving up on a destination.
pub const RREQ_RETRIES: u32 = 2;

/// Worst-case time for a request to traverse the network and back.
pub const NET_TRAVERSAL_TIME: Duration = Duration::from_millis(2800);

/// How long a suspected unidirectional neighbor stays blacklisted.
///
/// `RREQ_RETRIES * NET_TRAVERSAL_TIME`.
pub const BLACKLIST_TIMEOUT: Duration = Duration::from_millis(5600);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_timeouts() {
        assert_eq!(DELETE_PERIOD, ACTIVE_ROUTE_TIMEOUT.max(HELLO_INTERVAL) * 5);
        assert_eq!(BLACKLIST_TIMEOUT, NET_TRAVERSAL_TIME * RREQ_RETRIES);
    }
}
