//! Error types for the node binary and scenario replay.

use aomdv_routing::RouteError;

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("scenario error: {0}")]
    Scenario(String),
    #[error("route error: {0}")]
    Route(#[from] RouteError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
