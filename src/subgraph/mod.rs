//! subgraph
//!
//! Query construction and execution against the Hats graph index.
//!
//! # Architecture
//!
//! A caller describes the fields it wants with a [`ProjectionConfig`]. The
//! [`QueryCompiler`] walks that projection against the static relation
//! table in [`schema`] and emits a GraphQL selection set, attaching a
//! page size to every relation and newest-first ordering to event
//! relations. [`QueryBuilder`] wraps selections in complete documents for
//! each root query, and [`SubgraphClient`] runs those documents through a
//! [`GraphIndex`] and extracts the result.
//!
//! # Modules
//!
//! - [`schema`]: Object types and their relations
//! - [`projection`]: Caller-facing field selection
//! - [`filters`]: Per-relation page size overrides
//! - [`compiler`]: Projection to selection-set compilation
//! - [`query`]: Root query documents
//! - [`index`]: The `GraphIndex` collaborator trait
//! - [`client`]: Typed fetches over a `GraphIndex`
//! - [`mock`]: Mock index for deterministic testing
//!
//! # Example
//!
//! ```
//! use hatwork::subgraph::{compile_selection, ObjectType, ProjectionConfig};
//!
//! let projection = ProjectionConfig::new()
//!     .field("prettyId")
//!     .relation("wearers", ProjectionConfig::new());
//!
//! let selection = compile_selection(ObjectType::Hat, &projection, None).unwrap();
//! assert_eq!(selection, "id, prettyId, wearers(first: 1000) { id }");
//! ```

pub mod client;
pub mod compiler;
pub mod filters;
pub mod index;
pub mod mock;
pub mod projection;
pub mod query;
pub mod schema;

pub use client::{SubgraphClient, SubgraphError};
pub use compiler::{compile_selection, QueryCompiler, SelectionSet};
pub use filters::Filters;
pub use index::{GraphIndex, GraphIndexError};
pub use projection::{ProjectionConfig, ProjectionEntry, Selection};
pub use query::{Cardinality, QueryBuilder, QueryDocument};
pub use schema::{next_type, ObjectType, SchemaError};
