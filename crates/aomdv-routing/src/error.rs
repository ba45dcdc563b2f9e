//! Routing layer error types.

use aomdv_core::Address;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("longest path has infinite hop count: {0}")]
    InfiniteHopCount(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route to {0}")]
    NoRoute(Address),

    #[error("path error: {0}")]
    Path(#[from] PathError),
}
