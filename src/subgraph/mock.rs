//! subgraph::mock
//!
//! In-memory graph index for deterministic testing.
//!
//! Responses are configured per operation name. Operations without a
//! configured response get `{"data": {<root field>: null}}`, which reads as
//! "not found". Every executed document is recorded.
//!
//! # Example
//!
//! ```
//! use hatwork::subgraph::index::GraphIndex;
//! use hatwork::subgraph::mock::MockGraphIndex;
//! use hatwork::subgraph::projection::ProjectionConfig;
//! use hatwork::subgraph::query::QueryBuilder;
//! use hatwork::core::ids::TreeId;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let index = MockGraphIndex::new()
//!     .respond("Tree", json!({ "data": { "tree": { "id": "0x00000001" } } }));
//!
//! let doc = QueryBuilder::default().tree(TreeId::new(1), &ProjectionConfig::new()).unwrap();
//! let body = index.execute(&doc).await.unwrap();
//! assert_eq!(body["data"]["tree"]["id"], "0x00000001");
//! assert_eq!(index.executed().len(), 1);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::index::{GraphIndex, GraphIndexError};
use super::query::QueryDocument;

/// Mock graph index.
///
/// Thread-safe via internal `Arc<Mutex<...>>`; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockGraphIndex {
    inner: Arc<Mutex<MockGraphIndexInner>>,
}

#[derive(Debug, Default)]
struct MockGraphIndexInner {
    /// Response bodies by operation name.
    responses: HashMap<String, Value>,
    /// Error returned for every execution while set.
    fail_with: Option<GraphIndexError>,
    /// Documents executed so far.
    executed: Vec<QueryDocument>,
}

impl MockGraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: answer `operation` with `body`.
    pub fn respond(self, operation: impl Into<String>, body: Value) -> Self {
        self.set_response(operation, body);
        self
    }

    pub fn set_response(&self, operation: impl Into<String>, body: Value) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.insert(operation.into(), body);
    }

    /// Builder: fail every execution with `error`.
    pub fn fail_with(self, error: GraphIndexError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_with = Some(error);
        }
        self
    }

    pub fn clear_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_with = None;
    }

    /// Documents executed so far, oldest first.
    pub fn executed(&self) -> Vec<QueryDocument> {
        let inner = self.inner.lock().unwrap();
        inner.executed.clone()
    }
}

#[async_trait]
impl GraphIndex for MockGraphIndex {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute(&self, document: &QueryDocument) -> Result<Value, GraphIndexError> {
        let mut inner = self.inner.lock().unwrap();
        inner.executed.push(document.clone());

        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }

        Ok(inner
            .responses
            .get(document.operation)
            .cloned()
            .unwrap_or_else(|| json!({ "data": { document.root_field: null } })))
    }
}
