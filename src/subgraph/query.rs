//! subgraph::query
//!
//! Complete query documents for the graph index's entry points.
//!
//! Each builder compiles the caller's projection for the entry point's
//! object type and wraps it in a named operation with typed variables.
//! Identifiers cross into variables in the index's own key format: hats as
//! 64-digit hex, trees as 8-digit hex, accounts as lowercase addresses.
//!
//! # Example
//!
//! ```
//! use hatwork::core::ids::from_dotted_notation;
//! use hatwork::subgraph::projection::ProjectionConfig;
//! use hatwork::subgraph::query::QueryBuilder;
//!
//! let id = from_dotted_notation("1.1").unwrap();
//! let doc = QueryBuilder::default()
//!     .hat(&id, &ProjectionConfig::new().field("details"))
//!     .unwrap();
//!
//! assert_eq!(doc.query, "query Hat($id: ID!) { hat(id: $id) { id, details } }");
//! assert_eq!(doc.variables["id"], id.to_hex());
//! ```

use serde::Serialize;
use serde_json::{json, Value};

use super::compiler::QueryCompiler;
use super::projection::ProjectionConfig;
use super::schema::{ObjectType, SchemaError};
use crate::core::address::Address;
use crate::core::ids::{HatId, TreeId};

/// How many entities the root field returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A single entity, or `null` when absent.
    One,
    /// A list of entities.
    Many,
}

/// A query ready to hand to the graph index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDocument {
    #[serde(rename = "operationName")]
    pub operation: &'static str,
    pub query: String,
    pub variables: Value,
    /// Field under `data` that holds the result.
    #[serde(skip)]
    pub root_field: &'static str,
    #[serde(skip)]
    pub root_type: ObjectType,
    #[serde(skip)]
    pub cardinality: Cardinality,
}

/// Builds [`QueryDocument`]s with a configured compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder<'a> {
    compiler: QueryCompiler<'a>,
}

/// Description of one root field invocation.
struct RootCall<'s> {
    operation: &'static str,
    variable_defs: &'s str,
    root_field: &'static str,
    arguments: &'s str,
    root_type: ObjectType,
    cardinality: Cardinality,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(compiler: QueryCompiler<'a>) -> Self {
        Self { compiler }
    }

    pub fn compiler(&self) -> &QueryCompiler<'a> {
        &self.compiler
    }

    fn build(
        &self,
        call: RootCall<'_>,
        projection: &ProjectionConfig,
        variables: Value,
    ) -> Result<QueryDocument, SchemaError> {
        let selection = self.compiler.compile(call.root_type, projection)?;
        let query = format!(
            "query {}({}) {{ {}({}) {{ {} }} }}",
            call.operation, call.variable_defs, call.root_field, call.arguments, selection
        );
        Ok(QueryDocument {
            operation: call.operation,
            query,
            variables,
            root_field: call.root_field,
            root_type: call.root_type,
            cardinality: call.cardinality,
        })
    }

    /// A single hat by id.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn hat(
        &self,
        id: &HatId,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        self.build(
            RootCall {
                operation: "Hat",
                variable_defs: "$id: ID!",
                root_field: "hat",
                arguments: "id: $id",
                root_type: ObjectType::Hat,
                cardinality: Cardinality::One,
            },
            projection,
            json!({ "id": id.to_hex() }),
        )
    }

    /// Several hats by id.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn hats_by_ids(
        &self,
        ids: &[HatId],
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        let arguments = format!("first: {}, where: {{ id_in: $ids }}", ids.len());
        let ids: Vec<String> = ids.iter().map(HatId::to_hex).collect();
        self.build(
            RootCall {
                operation: "HatsByIds",
                variable_defs: "$ids: [ID!]!",
                root_field: "hats",
                arguments: &arguments,
                root_type: ObjectType::Hat,
                cardinality: Cardinality::Many,
            },
            projection,
            json!({ "ids": ids }),
        )
    }

    /// A single tree by id.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn tree(
        &self,
        tree: TreeId,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        self.build(
            RootCall {
                operation: "Tree",
                variable_defs: "$id: ID!",
                root_field: "tree",
                arguments: "id: $id",
                root_type: ObjectType::Tree,
                cardinality: Cardinality::One,
            },
            projection,
            json!({ "id": tree.to_hex() }),
        )
    }

    /// Several trees by id.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn trees_by_ids(
        &self,
        trees: &[TreeId],
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        let arguments = format!("first: {}, where: {{ id_in: $ids }}", trees.len());
        let ids: Vec<String> = trees.iter().map(TreeId::to_hex).collect();
        self.build(
            RootCall {
                operation: "TreesByIds",
                variable_defs: "$ids: [ID!]!",
                root_field: "trees",
                arguments: &arguments,
                root_type: ObjectType::Tree,
                cardinality: Cardinality::Many,
            },
            projection,
            json!({ "ids": ids }),
        )
    }

    /// One page of trees. Pages are zero-based.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn trees_page(
        &self,
        page: u32,
        per_page: u32,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        self.build(
            RootCall {
                operation: "TreesPage",
                variable_defs: "$skip: Int!, $first: Int!",
                root_field: "trees",
                arguments: "skip: $skip, first: $first",
                root_type: ObjectType::Tree,
                cardinality: Cardinality::Many,
            },
            projection,
            page_variables(page, per_page),
        )
    }

    /// A single wearer by address.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn wearer(
        &self,
        wearer: &Address,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        self.build(
            RootCall {
                operation: "Wearer",
                variable_defs: "$id: ID!",
                root_field: "wearer",
                arguments: "id: $id",
                root_type: ObjectType::Wearer,
                cardinality: Cardinality::One,
            },
            projection,
            json!({ "id": wearer.as_str() }),
        )
    }

    /// One page of the current wearers of a hat.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn wearers_of_hat_page(
        &self,
        hat: &HatId,
        page: u32,
        per_page: u32,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        let mut variables = page_variables(page, per_page);
        variables["hatId"] = Value::String(hat.to_hex());
        self.build(
            RootCall {
                operation: "WearersOfHat",
                variable_defs: "$hatId: ID!, $skip: Int!, $first: Int!",
                root_field: "wearers",
                arguments: "skip: $skip, first: $first, where: { currentHats_: { id: $hatId } }",
                root_type: ObjectType::Wearer,
                cardinality: Cardinality::Many,
            },
            projection,
            variables,
        )
    }

    /// One page of protocol events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn events_page(
        &self,
        page: u32,
        per_page: u32,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        self.build(
            RootCall {
                operation: "EventsPage",
                variable_defs: "$skip: Int!, $first: Int!",
                root_field: "hatsEvents",
                arguments: "skip: $skip, first: $first, orderBy: timestamp, orderDirection: desc",
                root_type: ObjectType::Event,
                cardinality: Cardinality::Many,
            },
            projection,
            page_variables(page, per_page),
        )
    }

    /// A claims hatter by its module address.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownRelation` if the projection is invalid.
    pub fn claims_hatter(
        &self,
        hatter: &Address,
        projection: &ProjectionConfig,
    ) -> Result<QueryDocument, SchemaError> {
        self.build(
            RootCall {
                operation: "ClaimsHatter",
                variable_defs: "$id: ID!",
                root_field: "claimsHatter",
                arguments: "id: $id",
                root_type: ObjectType::ClaimsHatter,
                cardinality: Cardinality::One,
            },
            projection,
            json!({ "id": hatter.as_str() }),
        )
    }
}

fn page_variables(page: u32, per_page: u32) -> Value {
    json!({
        "skip": u64::from(page) * u64::from(per_page),
        "first": per_page,
    })
}
