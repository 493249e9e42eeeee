//! subgraph::filters
//!
//! Per-relation page size overrides.
//!
//! A [`Filters`] table maps object type and relation name to the number of
//! related items to request. Relations without an entry use the compiler's
//! default page size. Entries for relation names the schema does not know
//! are kept but never consulted.
//!
//! # Example
//!
//! ```
//! use hatwork::subgraph::filters::Filters;
//! use hatwork::subgraph::schema::ObjectType;
//!
//! let filters: Filters = toml::from_str(
//!     r#"
//!     [hat]
//!     wearers = 25
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(filters.page_size(ObjectType::Hat, "wearers"), Some(25));
//! assert_eq!(filters.page_size(ObjectType::Hat, "subHats"), None);
//! ```

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::schema::ObjectType;

/// Page size overrides keyed by object type, then relation name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters {
    tables: BTreeMap<ObjectType, BTreeMap<String, NonZeroU32>>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: override the page size of `relation` on `object`.
    pub fn with(mut self, object: ObjectType, relation: impl Into<String>, size: NonZeroU32) -> Self {
        self.set(object, relation, size);
        self
    }

    pub fn set(&mut self, object: ObjectType, relation: impl Into<String>, size: NonZeroU32) {
        self.tables
            .entry(object)
            .or_default()
            .insert(relation.into(), size);
    }

    /// The override for `relation` on `object`, if any.
    pub fn page_size(&self, object: ObjectType, relation: &str) -> Option<u32> {
        self.tables
            .get(&object)
            .and_then(|relations| relations.get(relation))
            .map(|size| size.get())
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    pub fn merged(&self, other: &Filters) -> Filters {
        let mut merged = self.clone();
        for (object, relations) in &other.tables {
            for (relation, size) in relations {
                merged.set(*object, relation.clone(), *size);
            }
        }
        merged
    }

    /// All overrides as `(object, relation, size)`.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectType, &str, u32)> {
        self.tables.iter().flat_map(|(object, relations)| {
            relations
                .iter()
                .map(move |(relation, size)| (*object, relation.as_str(), size.get()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }
}
