//! subgraph::index
//!
//! The graph-query collaborator.
//!
//! # Design
//!
//! `GraphIndex` is the seam between compiled queries and whatever executes
//! them (an HTTP endpoint, a cache, a test double). It is async because
//! real implementations do network I/O. This crate ships only the
//! [`mock`](super::mock) implementation; transports live with callers.
//!
//! Implementations return the raw JSON response body. Interpreting it is
//! the job of [`SubgraphClient`](super::client::SubgraphClient).

use async_trait::async_trait;
use thiserror::Error;

use super::query::QueryDocument;

/// Errors reported by a graph index.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphIndexError {
    /// No index is deployed for the requested network.
    #[error("no graph index available for chain {0}")]
    UnsupportedNetwork(u64),

    /// The index answered with GraphQL errors.
    #[error("query rejected: {0}")]
    Rejected(String),

    /// The index could not be reached or returned garbage.
    #[error("graph index unavailable: {0}")]
    Unavailable(String),
}

/// Executes compiled query documents.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so clients can be shared across
/// tasks.
#[async_trait]
pub trait GraphIndex: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Execute `document` and return the full response body, which is
    /// expected to carry a `data` object.
    ///
    /// # Errors
    ///
    /// - `UnsupportedNetwork` if the index does not serve this chain
    /// - `Rejected` if the index reports GraphQL errors
    /// - `Unavailable` for transport failures
    async fn execute(&self, document: &QueryDocument) -> Result<serde_json::Value, GraphIndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            GraphIndexError::UnsupportedNetwork(5).to_string(),
            "no graph index available for chain 5"
        );
        assert_eq!(
            GraphIndexError::Rejected("bad field".into()).to_string(),
            "query rejected: bad field"
        );
        assert_eq!(
            GraphIndexError::Unavailable("timeout".into()).to_string(),
            "graph index unavailable: timeout"
        );
    }
}
