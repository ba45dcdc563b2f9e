//! Report of destinations affected by losing a neighbor.

use aomdv_core::Address;

/// One destination that lost alternate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunedRoute {
    pub destination: Address,
    /// Paths dropped because they went through the lost neighbor.
    pub removed: usize,
    /// Paths still left to the destination.
    pub remaining: usize,
    /// Destination sequence number at the time of pruning.
    pub seq_no: u32,
}

/// Destinations that lost at least one path, ordered by destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct PrunedRoutes {
    routes: Vec<PrunedRoute>,
}

impl PrunedRoutes {
    pub(crate) fn from_unsorted(mut routes: Vec<PrunedRoute>) -> Self {
        routes.sort_by_key(|r| r.destination);
        Self { routes }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn contains(&self, destination: Address) -> bool {
        self.get(destination).is_some()
    }

    #[must_use]
    pub fn get(&self, destination: Address) -> Option<&PrunedRoute> {
        self.routes
            .binary_search_by_key(&destination, |r| r.destination)
            .ok()
            .map(|i| &self.routes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrunedRoute> {
        self.routes.iter()
    }

    /// Every affected destination.
    pub fn destinations(&self) -> impl Iterator<Item = Address> + '_ {
        self.routes.iter().map(|r| r.destination)
    }

    /// Destinations left without any alternate path.
    pub fn exhausted(&self) -> impl Iterator<Item = Address> + '_ {
        self.routes
            .iter()
            .filter(|r| r.remaining == 0)
            .map(|r| r.destination)
    }
}

impl<'a> IntoIterator for &'a PrunedRoutes {
    type Item = &'a PrunedRoute;
    type IntoIter = std::slice::Iter<'a, PrunedRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pruned(last: u8, removed: usize, remaining: usize) -> PrunedRoute {
        PrunedRoute {
            destination: Address::new([10, 0, 0, last]),
            removed,
            remaining,
            seq_no: u32::from(last),
        }
    }

    #[test]
    fn test_sorted_by_destination() {
        let report = PrunedRoutes::from_unsorted(vec![pruned(9, 1, 0), pruned(3, 2, 1)]);
        let dsts: Vec<Address> = report.destinations().collect();
        assert_eq!(
            dsts,
            vec![Address::new([10, 0, 0, 3]), Address::new([10, 0, 0, 9])]
        );
    }

    #[test]
    fn test_lookup_and_exhausted() {
        let report = PrunedRoutes::from_unsorted(vec![pruned(9, 1, 0), pruned(3, 2, 1)]);
        assert_eq!(report.len(), 2);
        assert!(report.contains(Address::new([10, 0, 0, 3])));
        assert!(!report.contains(Address::new([10, 0, 0, 4])));
        assert_eq!(report.get(Address::new([10, 0, 0, 3])).unwrap().removed, 2);

        let exhausted: Vec<Address> = report.exhausted().collect();
        assert_eq!(exhausted, vec![Address::new([10, 0, 0, 9])]);
    }

    #[test]
    fn test_empty_report() {
        let report = PrunedRoutes::default();
        assert!(report.is_empty());
        assert_eq!(report.iter().count(), 0);
    }
}
