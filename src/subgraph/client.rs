//! subgraph::client
//!
//! Typed entry points over a [`GraphIndex`].
//!
//! # Design
//!
//! The client owns the compiler settings (default page size and filters),
//! builds a [`QueryDocument`] for each call, executes it through the
//! collaborator and pulls the root field out of the response. Compilation
//! happens before anything reaches the index, so an invalid projection
//! never produces a network call.
//!
//! Responses are checked only as far as needed to find the result: an
//! `errors` array becomes [`GraphIndexError::Rejected`], a missing `data`
//! object is [`SubgraphError::MalformedResponse`], and a `null` single
//! entity is [`SubgraphError::NotFound`].
//!
//! # Example
//!
//! ```
//! use hatwork::core::ids::from_dotted_notation;
//! use hatwork::subgraph::client::SubgraphClient;
//! use hatwork::subgraph::mock::MockGraphIndex;
//! use hatwork::subgraph::projection::ProjectionConfig;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let id = from_dotted_notation("1.1").unwrap();
//! let index = MockGraphIndex::new().respond(
//!     "Hat",
//!     json!({ "data": { "hat": { "id": id.to_hex(), "prettyId": "1.1" } } }),
//! );
//!
//! let client = SubgraphClient::new(index);
//! let hat = client.hat(&id, &ProjectionConfig::new().field("prettyId")).await.unwrap();
//! assert_eq!(hat["prettyId"], "1.1");
//! # });
//! ```

use std::num::NonZeroU32;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::compiler::QueryCompiler;
use super::filters::Filters;
use super::index::{GraphIndex, GraphIndexError};
use super::projection::ProjectionConfig;
use super::query::{Cardinality, QueryBuilder, QueryDocument};
use super::schema::{ObjectType, SchemaError};
use crate::core::address::Address;
use crate::core::config::Config;
use crate::core::constants::DEFAULT_PAGE_SIZE;
use crate::core::ids::{HatId, TreeId};

/// Errors from subgraph client calls.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubgraphError {
    /// The projection did not match the schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The graph index failed.
    #[error(transparent)]
    Index(#[from] GraphIndexError),

    /// A single-entity lookup found nothing.
    #[error("{object} {id} not found")]
    NotFound { object: ObjectType, id: String },

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Client for the graph index.
#[derive(Debug, Clone)]
pub struct SubgraphClient<G> {
    index: G,
    page_size: NonZeroU32,
    filters: Filters,
}

impl<G: GraphIndex> SubgraphClient<G> {
    /// A client with the default page size and no filters.
    pub fn new(index: G) -> Self {
        Self {
            index,
            page_size: DEFAULT_PAGE_SIZE,
            filters: Filters::default(),
        }
    }

    /// A client using the page size and filters from `config`.
    pub fn from_config(index: G, config: &Config) -> Self {
        Self {
            index,
            page_size: config.page_size(),
            filters: config.filters(),
        }
    }

    pub fn with_page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn index(&self) -> &G {
        &self.index
    }

    /// Query builder bound to this client's compiler settings.
    pub fn builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(
            QueryCompiler::new()
                .with_page_size(self.page_size)
                .with_filters(&self.filters),
        )
    }

    /// Execute `document` and return the value of its root field.
    ///
    /// # Errors
    ///
    /// - `Index` if the collaborator fails or reports GraphQL errors
    /// - `MalformedResponse` if `data` or the root field is missing, or a
    ///   list query returns a non-list
    pub async fn run(&self, document: &QueryDocument) -> Result<Value, SubgraphError> {
        debug!(
            index = self.index.name(),
            operation = document.operation,
            "executing query"
        );
        let mut body = self.index.execute(document).await?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if let Some(first) = errors.first() {
                let message = first
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                return Err(GraphIndexError::Rejected(message).into());
            }
        }

        let root = body
            .get_mut("data")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| SubgraphError::MalformedResponse("missing data object".into()))?
            .remove(document.root_field)
            .ok_or_else(|| {
                SubgraphError::MalformedResponse(format!(
                    "missing field '{}' in data",
                    document.root_field
                ))
            })?;

        if document.cardinality == Cardinality::Many && !root.is_array() {
            return Err(SubgraphError::MalformedResponse(format!(
                "expected a list for '{}'",
                document.root_field
            )));
        }
        Ok(root)
    }

    /// Execute `document` and deserialize the root field into `T`.
    ///
    /// # Errors
    ///
    /// As for [`run`](Self::run), plus `MalformedResponse` when the value
    /// does not deserialize.
    pub async fn run_as<T: DeserializeOwned>(
        &self,
        document: &QueryDocument,
    ) -> Result<T, SubgraphError> {
        let value = self.run(document).await?;
        serde_json::from_value(value).map_err(|e| SubgraphError::MalformedResponse(e.to_string()))
    }

    async fn one(&self, document: QueryDocument, id: String) -> Result<Value, SubgraphError> {
        let value = self.run(&document).await?;
        if value.is_null() {
            return Err(SubgraphError::NotFound {
                object: document.root_type,
                id,
            });
        }
        Ok(value)
    }

    async fn many(&self, document: QueryDocument) -> Result<Vec<Value>, SubgraphError> {
        match self.run(&document).await? {
            Value::Array(items) => Ok(items),
            _ => Err(SubgraphError::MalformedResponse(format!(
                "expected a list for '{}'",
                document.root_field
            ))),
        }
    }

    /// Fetch a hat.
    ///
    /// # Errors
    ///
    /// `NotFound` if the index has no such hat; see [`run`](Self::run).
    pub async fn hat(
        &self,
        id: &HatId,
        projection: &ProjectionConfig,
    ) -> Result<Value, SubgraphError> {
        let doc = self.builder().hat(id, projection)?;
        self.one(doc, id.to_hex()).await
    }

    /// Fetch hats by id; hats the index does not know are omitted.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn hats_by_ids(
        &self,
        ids: &[HatId],
        projection: &ProjectionConfig,
    ) -> Result<Vec<Value>, SubgraphError> {
        let doc = self.builder().hats_by_ids(ids, projection)?;
        self.many(doc).await
    }

    /// Fetch a tree.
    ///
    /// # Errors
    ///
    /// `NotFound` if the index has no such tree; see [`run`](Self::run).
    pub async fn tree(
        &self,
        tree: TreeId,
        projection: &ProjectionConfig,
    ) -> Result<Value, SubgraphError> {
        let doc = self.builder().tree(tree, projection)?;
        self.one(doc, tree.to_hex()).await
    }

    /// Fetch trees by id.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn trees_by_ids(
        &self,
        trees: &[TreeId],
        projection: &ProjectionConfig,
    ) -> Result<Vec<Value>, SubgraphError> {
        let doc = self.builder().trees_by_ids(trees, projection)?;
        self.many(doc).await
    }

    /// Fetch one zero-based page of trees.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn trees_page(
        &self,
        page: u32,
        per_page: u32,
        projection: &ProjectionConfig,
    ) -> Result<Vec<Value>, SubgraphError> {
        let doc = self.builder().trees_page(page, per_page, projection)?;
        self.many(doc).await
    }

    /// Fetch a wearer.
    ///
    /// # Errors
    ///
    /// `NotFound` if the address never wore a hat; see [`run`](Self::run).
    pub async fn wearer(
        &self,
        wearer: &Address,
        projection: &ProjectionConfig,
    ) -> Result<Value, SubgraphError> {
        let doc = self.builder().wearer(wearer, projection)?;
        self.one(doc, wearer.to_string()).await
    }

    /// Fetch one page of a hat's current wearers.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn wearers_of_hat_page(
        &self,
        hat: &HatId,
        page: u32,
        per_page: u32,
        projection: &ProjectionConfig,
    ) -> Result<Vec<Value>, SubgraphError> {
        let doc = self
            .builder()
            .wearers_of_hat_page(hat, page, per_page, projection)?;
        self.many(doc).await
    }

    /// Fetch one page of events, newest first.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn events_page(
        &self,
        page: u32,
        per_page: u32,
        projection: &ProjectionConfig,
    ) -> Result<Vec<Value>, SubgraphError> {
        let doc = self.builder().events_page(page, per_page, projection)?;
        self.many(doc).await
    }

    /// Fetch a claims hatter module.
    ///
    /// # Errors
    ///
    /// `NotFound` if the index has no such module; see [`run`](Self::run).
    pub async fn claims_hatter(
        &self,
        hatter: &Address,
        projection: &ProjectionConfig,
    ) -> Result<Value, SubgraphError> {
        let doc = self.builder().claims_hatter(hatter, projection)?;
        self.one(doc, hatter.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::subgraph::mock::MockGraphIndex;

    #[tokio::test]
    async fn null_entity_is_not_found() {
        let client = SubgraphClient::new(MockGraphIndex::new());
        let err = client
            .tree(TreeId::new(9), &ProjectionConfig::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SubgraphError::NotFound {
                object: ObjectType::Tree,
                id: "0x00000009".into(),
            }
        );
    }

    #[tokio::test]
    async fn graphql_errors_are_rejections() {
        let index = MockGraphIndex::new().respond(
            "TreesPage",
            json!({ "errors": [{ "message": "Type `Tree` has no field `x`" }] }),
        );
        let client = SubgraphClient::new(index);
        let err = client
            .trees_page(0, 5, &ProjectionConfig::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SubgraphError::Index(GraphIndexError::Rejected(
                "Type `Tree` has no field `x`".into()
            ))
        );
    }

    #[tokio::test]
    async fn missing_data_is_malformed() {
        let index = MockGraphIndex::new().respond("EventsPage", json!({}));
        let client = SubgraphClient::new(index);
        let err = client
            .events_page(0, 5, &ProjectionConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SubgraphError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn list_expected_for_many() {
        let index = MockGraphIndex::new().respond("TreesPage", json!({ "data": { "trees": {} } }));
        let client = SubgraphClient::new(index);
        let err = client
            .trees_page(0, 5, &ProjectionConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SubgraphError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn invalid_projection_never_reaches_index() {
        let index = MockGraphIndex::new();
        let client = SubgraphClient::new(index.clone());
        let err = client
            .tree(
                TreeId::new(1),
                &ProjectionConfig::new().relation("wearers", ProjectionConfig::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SubgraphError::Schema(_)));
        assert!(index.executed().is_empty());
    }

    #[tokio::test]
    async fn client_settings_reach_the_query() {
        let index = MockGraphIndex::new().respond("TreesPage", json!({ "data": { "trees": [] } }));
        let client = SubgraphClient::new(index.clone())
            .with_page_size(NonZeroU32::new(25).unwrap())
            .with_filters(Filters::new().with(
                ObjectType::Tree,
                "hats",
                NonZeroU32::new(4).unwrap(),
            ));
        let projection = ProjectionConfig::new()
            .relation("hats", ProjectionConfig::new())
            .relation("events", ProjectionConfig::new());
        let trees = client.trees_page(0, 5, &projection).await.unwrap();
        assert!(trees.is_empty());

        let query = &index.executed()[0].query;
        assert!(query.contains("hats(first: 4)"));
        assert!(query.contains("events(first: 25, orderBy: timestamp, orderDirection: desc)"));
    }

    #[tokio::test]
    async fn run_as_deserializes() {
        #[derive(serde::Deserialize)]
        struct TreeRow {
            id: String,
        }

        let index = MockGraphIndex::new().respond(
            "TreesByIds",
            json!({ "data": { "trees": [{ "id": "0x00000001" }] } }),
        );
        let client = SubgraphClient::new(index);
        let doc = client
            .builder()
            .trees_by_ids(&[TreeId::new(1)], &ProjectionConfig::new())
            .unwrap();
        let rows: Vec<TreeRow> = client.run_as(&doc).await.unwrap();
        assert_eq!(rows[0].id, "0x00000001");
    }
}
