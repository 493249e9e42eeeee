//! subgraph::projection
//!
//! Declarative field selections and their normalized form.
//!
//! # Design
//!
//! A [`ProjectionConfig`] is what callers write: an ordered map from field
//! name to either a flag (`true` selects a scalar, `false` opts out) or a
//! nested config (select a relation). It deserializes from JSON or TOML
//! objects with key order preserved, since order decides the shape of the
//! compiled query.
//!
//! [`normalize`] turns a config into a list of [`ProjectionEntry`] values,
//! which the compiler matches on. Normalization is not type-aware: it does
//! not know which names are relations. That check happens at compile time.
//!
//! # Example
//!
//! ```
//! use hatwork::subgraph::projection::{normalize, ProjectionConfig, ProjectionEntry};
//!
//! let config: ProjectionConfig =
//!     serde_json::from_str(r#"{ "prettyId": true, "status": false, "wearers": {} }"#).unwrap();
//!
//! assert_eq!(
//!     normalize(&config),
//!     vec![
//!         ProjectionEntry::Scalar("prettyId".into()),
//!         ProjectionEntry::Relation { name: "wearers".into(), entries: vec![] },
//!     ]
//! );
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A caller-declared selection for one object.
///
/// Equality ignores key order; use [`iter`](Self::iter) to compare order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionConfig {
    entries: IndexMap<String, Selection>,
}

/// The value attached to a field name in a [`ProjectionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    /// `true` selects a scalar field, `false` leaves it out.
    Flag(bool),
    /// Select a relation with its own projection (possibly empty).
    Nested(ProjectionConfig),
}

impl ProjectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `selection`.
    ///
    /// Re-inserting an existing name replaces its selection but keeps its
    /// original position. Deserialization goes through the same rule, so a
    /// duplicated key keeps its first position and its last value.
    pub fn insert(&mut self, name: impl Into<String>, selection: Selection) {
        self.entries.insert(name.into(), selection);
    }

    /// Builder: select a scalar field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.insert(name, Selection::Flag(true));
        self
    }

    /// Builder: explicitly leave a field out.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.insert(name, Selection::Flag(false));
        self
    }

    /// Builder: select a relation with a nested projection.
    pub fn relation(mut self, name: impl Into<String>, nested: ProjectionConfig) -> Self {
        self.insert(name, Selection::Nested(nested));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Selection> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selection)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One normalized selection entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionEntry {
    /// A scalar field.
    Scalar(String),
    /// A relation and the normalized selection of its target.
    Relation {
        name: String,
        entries: Vec<ProjectionEntry>,
    },
}

impl ProjectionEntry {
    pub fn name(&self) -> &str {
        match self {
            ProjectionEntry::Scalar(name) => name,
            ProjectionEntry::Relation { name, .. } => name,
        }
    }
}

/// Normalize a config into ordered entries.
///
/// `true` flags become scalars, nested configs become relations
/// (normalized recursively), `false` flags are dropped. Order follows the
/// config.
pub fn normalize(config: &ProjectionConfig) -> Vec<ProjectionEntry> {
    config
        .iter()
        .filter_map(|(name, selection)| match selection {
            Selection::Flag(true) => Some(ProjectionEntry::Scalar(name.to_string())),
            Selection::Flag(false) => None,
            Selection::Nested(nested) => Some(ProjectionEntry::Relation {
                name: name.to_string(),
                entries: normalize(nested),
            }),
        })
        .collect()
}
