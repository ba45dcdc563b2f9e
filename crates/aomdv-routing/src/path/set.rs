//! Ordered set of alternate paths for one destination.

use aomdv_core::{Address, Timestamp};

use super::types::Path;
use crate::constants::INFINITY_HOPS;
use crate::error::PathError;

/// Alternate paths toward one destination, in insertion order.
///
/// Insertion does not deduplicate: two paths may share a next hop unless
/// the caller checks [`PathSet::is_new_disjoint`] first. The path count is
/// always the length of the underlying vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    paths: Vec<Path>,
}

impl PathSet {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Append a path and return a reference to it.
    pub fn insert(
        &mut self,
        next_hop: Address,
        hop_count: u16,
        expires: Timestamp,
        last_hop: Address,
    ) -> &Path {
        tracing::trace!(%next_hop, hop_count, %last_hop, "inserting path");
        let index = self.paths.len();
        self.paths.push(Path::new(next_hop, hop_count, expires, last_hop));
        &self.paths[index]
    }

    /// First path forwarding through `next_hop`.
    #[must_use]
    pub fn lookup(&self, next_hop: Address) -> Option<&Path> {
        self.paths.iter().find(|p| p.next_hop == next_hop)
    }

    /// Mutable access to the first path forwarding through `next_hop`.
    pub fn lookup_mut(&mut self, next_hop: Address) -> Option<&mut Path> {
        self.paths.iter_mut().find(|p| p.next_hop == next_hop)
    }

    /// First path matching both `next_hop` and `last_hop` exactly.
    #[must_use]
    pub fn lookup_disjoint(&self, next_hop: Address, last_hop: Address) -> Option<&Path> {
        self.paths
            .iter()
            .find(|p| p.next_hop == next_hop && p.last_hop == last_hop)
    }

    /// True if no stored path shares either the next hop or the last hop.
    ///
    /// Admitting paths only when this holds keeps the set node-disjoint.
    #[must_use]
    pub fn is_new_disjoint(&self, next_hop: Address, last_hop: Address) -> bool {
        !self.paths.iter().any(|p| p.overlaps(next_hop, last_hop))
    }

    /// First path whose advertisement came through `last_hop`.
    #[must_use]
    pub fn lookup_last_hop(&self, last_hop: Address) -> Option<&Path> {
        self.paths.iter().find(|p| p.last_hop == last_hop)
    }

    /// Remove every path forwarding through `next_hop`.
    ///
    /// Returns the number of paths removed.
    pub fn remove_next_hop(&mut self, next_hop: Address) -> usize {
        let before = self.paths.len();
        self.paths.retain(|p| p.next_hop != next_hop);
        let removed = before - self.paths.len();
        if removed > 0 {
            tracing::trace!(%next_hop, removed, "removed paths via next hop");
        }
        removed
    }

    /// Remove all paths.
    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Remove the path with the largest hop count; the earliest wins ties.
    ///
    /// Returns `Ok(None)` on an empty set. Fails without touching the set if
    /// the longest path is at the unreachable sentinel, since such a path is
    /// a placeholder rather than a real alternate.
    pub fn remove_longest(&mut self) -> Result<Option<Path>, PathError> {
        let Some(index) = self.index_of_longest() else {
            return Ok(None);
        };
        let hop_count = self.paths[index].hop_count;
        if hop_count == INFINITY_HOPS {
            return Err(PathError::InfiniteHopCount(hop_count));
        }
        let path = self.paths.remove(index);
        tracing::trace!(next_hop = %path.next_hop, hop_count, "removed longest path");
        Ok(Some(path))
    }

    fn index_of_longest(&self) -> Option<usize> {
        let mut longest: Option<(usize, u16)> = None;
        for (i, p) in self.paths.iter().enumerate() {
            match longest {
                Some((_, hops)) if hops >= p.hop_count => {}
                _ => longest = Some((i, p.hop_count)),
            }
        }
        longest.map(|(i, _)| i)
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Earliest inserted path.
    #[must_use]
    pub fn first(&self) -> Option<&Path> {
        self.paths.first()
    }

    /// Path with the fewest hops; the earliest wins ties.
    #[must_use]
    pub fn min_hop(&self) -> Option<&Path> {
        self.paths.iter().min_by_key(|p| p.hop_count)
    }

    /// Largest hop count, or [`INFINITY_HOPS`] if the set is empty.
    #[must_use]
    pub fn max_hop_count(&self) -> u16 {
        self.paths
            .iter()
            .map(|p| p.hop_count)
            .max()
            .unwrap_or(INFINITY_HOPS)
    }

    /// Smallest hop count, or [`INFINITY_HOPS`] if the set is empty.
    #[must_use]
    pub fn min_hop_count(&self) -> u16 {
        self.paths
            .iter()
            .map(|p| p.hop_count)
            .min()
            .unwrap_or(INFINITY_HOPS)
    }

    /// Latest expiry across all paths, or [`Timestamp::ZERO`] if empty.
    #[must_use]
    pub fn max_expiration(&self) -> Timestamp {
        self.paths
            .iter()
            .map(|p| p.expires)
            .max()
            .unwrap_or(Timestamp::ZERO)
    }

    /// Drop every path that expired before `now`.
    ///
    /// Returns the number of paths removed.
    pub fn purge(&mut self, now: Timestamp) -> usize {
        let before = self.paths.len();
        self.paths.retain(|p| !p.is_expired(now));
        before - self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
