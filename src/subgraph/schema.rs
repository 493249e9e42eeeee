//! subgraph::schema
//!
//! The object types of the graph index and the relations between them.
//!
//! # Design
//!
//! The relation table is static: each [`ObjectType`] owns a fixed list of
//! `(relation name, target type)` pairs, selected by an exhaustive match.
//! Adding or removing a relation is a single edit to one of the tables
//! below. Lookups on names that are not in the table fail with
//! [`SchemaError::UnknownRelation`]; there is no fallback.
//!
//! # Example
//!
//! ```
//! use hatwork::subgraph::schema::{next_type, ObjectType};
//!
//! assert_eq!(next_type(ObjectType::Tree, "hats").unwrap(), ObjectType::Hat);
//! assert_eq!(next_type(ObjectType::Hat, "admin").unwrap(), ObjectType::Hat);
//! assert!(next_type(ObjectType::Wearer, "admin").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from schema lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A projection named a relation the object type does not have.
    #[error("unknown relation '{relation}' on {object}")]
    UnknownRelation {
        object: ObjectType,
        relation: String,
    },

    #[error("unknown object type '{0}', expected one of: hat, tree, wearer, event, claimsHatter")]
    UnknownObjectType(String),
}

/// Object types exposed by the graph index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    Hat,
    Tree,
    Wearer,
    Event,
    ClaimsHatter,
}

use ObjectType::{ClaimsHatter, Event, Hat, Tree, Wearer};

const HAT_RELATIONS: &[(&str, ObjectType)] = &[
    ("tree", Tree),
    ("wearers", Wearer),
    ("badStandings", Wearer),
    ("admin", Hat),
    ("subHats", Hat),
    ("linkRequestFromTree", Tree),
    ("linkedTrees", Tree),
    ("claimableBy", ClaimsHatter),
    ("claimableForBy", ClaimsHatter),
    ("events", Event),
];

const TREE_RELATIONS: &[(&str, ObjectType)] = &[
    ("hats", Hat),
    ("childOfTree", Tree),
    ("parentOfTrees", Tree),
    ("linkedToHat", Hat),
    ("linkRequestFromTree", Tree),
    ("requestedLinkToTree", Tree),
    ("requestedLinkToHat", Hat),
    ("events", Event),
];

const WEARER_RELATIONS: &[(&str, ObjectType)] = &[
    ("currentHats", Hat),
    ("mintEvent", Event),
    ("burnEvent", Event),
];

const EVENT_RELATIONS: &[(&str, ObjectType)] = &[("hat", Hat), ("tree", Tree)];

const CLAIMS_HATTER_RELATIONS: &[(&str, ObjectType)] =
    &[("claimableHats", Hat), ("claimableForHats", Hat)];

impl ObjectType {
    /// Every object type, in declaration order.
    pub const ALL: [ObjectType; 5] = [Hat, Tree, Wearer, Event, ClaimsHatter];

    /// Relations leaving this type, with their target types.
    pub fn relations(self) -> &'static [(&'static str, ObjectType)] {
        match self {
            Hat => HAT_RELATIONS,
            Tree => TREE_RELATIONS,
            Wearer => WEARER_RELATIONS,
            Event => EVENT_RELATIONS,
            ClaimsHatter => CLAIMS_HATTER_RELATIONS,
        }
    }

    /// Scalar fields the index exposes for this type, besides `id`.
    pub fn scalar_fields(self) -> &'static [&'static str] {
        match self {
            Hat => &[
                "prettyId",
                "status",
                "createdAt",
                "details",
                "maxSupply",
                "eligibility",
                "toggle",
                "mutable",
                "imageUri",
                "levelAtLocalTree",
                "currentSupply",
            ],
            Event => &["timestamp", "blockNumber", "transactionID"],
            Tree | Wearer | ClaimsHatter => &[],
        }
    }

    /// Name of the type in the index's GraphQL schema.
    pub fn graphql_name(self) -> &'static str {
        match self {
            Hat => "Hat",
            Tree => "Tree",
            Wearer => "Wearer",
            Event => "HatsEvent",
            ClaimsHatter => "ClaimsHatter",
        }
    }

    /// Name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Hat => "hat",
            Tree => "tree",
            Wearer => "wearer",
            Event => "event",
            ClaimsHatter => "claimsHatter",
        }
    }

    /// Whether selecting this type through a relation should be ordered
    /// newest first.
    pub fn is_timestamped(self) -> bool {
        matches!(self, Event)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graphql_name())
    }
}

impl FromStr for ObjectType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "hat" => Ok(Hat),
            "tree" => Ok(Tree),
            "wearer" => Ok(Wearer),
            "event" | "hatsevent" => Ok(Event),
            "claimshatter" => Ok(ClaimsHatter),
            _ => Err(SchemaError::UnknownObjectType(s.to_string())),
        }
    }
}

/// Resolve the target type of `relation` on `current`.
///
/// # Errors
///
/// Returns `SchemaError::UnknownRelation` if `current` has no relation
/// with that name.
pub fn next_type(current: ObjectType, relation: &str) -> Result<ObjectType, SchemaError> {
    current
        .relations()
        .iter()
        .find(|(name, _)| *name == relation)
        .map(|(_, target)| *target)
        .ok_or_else(|| SchemaError::UnknownRelation {
            object: current,
            relation: relation.to_string(),
        })
}

/// Whether `relation` on `current` leads to events.
///
/// Unknown relations are not event relations.
pub fn is_event_relation(current: ObjectType, relation: &str) -> bool {
    next_type(current, relation).is_ok_and(ObjectType::is_timestamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hat_relations() {
        let expected = [
            ("tree", Tree),
            ("wearers", Wearer),
            ("badStandings", Wearer),
            ("admin", Hat),
            ("subHats", Hat),
            ("linkRequestFromTree", Tree),
            ("linkedTrees", Tree),
            ("claimableBy", ClaimsHatter),
            ("claimableForBy", ClaimsHatter),
            ("events", Event),
        ];
        for (relation, target) in expected {
            assert_eq!(next_type(Hat, relation).unwrap(), target, "{relation}");
        }
    }

    #[test]
    fn tree_wearer_event_claims_relations() {
        assert_eq!(next_type(Tree, "hats").unwrap(), Hat);
        assert_eq!(next_type(Tree, "childOfTree").unwrap(), Tree);
        assert_eq!(next_type(Tree, "requestedLinkToHat").unwrap(), Hat);
        assert_eq!(next_type(Wearer, "currentHats").unwrap(), Hat);
        assert_eq!(next_type(Wearer, "burnEvent").unwrap(), Event);
        assert_eq!(next_type(Event, "hat").unwrap(), Hat);
        assert_eq!(next_type(Event, "tree").unwrap(), Tree);
        assert_eq!(next_type(ClaimsHatter, "claimableForHats").unwrap(), Hat);
    }

    #[test]
    fn unknown_relation_is_an_error() {
        assert_eq!(
            next_type(Tree, "wearers"),
            Err(SchemaError::UnknownRelation {
                object: Tree,
                relation: "wearers".to_string(),
            })
        );
        // Scalars are not relations.
        assert!(next_type(Hat, "prettyId").is_err());
        // Names are case sensitive.
        assert!(next_type(Hat, "SubHats").is_err());
    }

    #[test]
    fn relation_names_are_unique_per_type() {
        for object in ObjectType::ALL {
            let mut names: Vec<_> = object.relations().iter().map(|(n, _)| *n).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), before, "{object}");
        }
    }

    #[test]
    fn event_relations() {
        assert!(is_event_relation(Hat, "events"));
        assert!(is_event_relation(Tree, "events"));
        assert!(is_event_relation(Wearer, "mintEvent"));
        assert!(!is_event_relation(Hat, "wearers"));
        assert!(!is_event_relation(Hat, "nope"));
    }

    #[test]
    fn parse_object_type() {
        assert_eq!("hat".parse::<ObjectType>().unwrap(), Hat);
        assert_eq!("Tree".parse::<ObjectType>().unwrap(), Tree);
        assert_eq!("HatsEvent".parse::<ObjectType>().unwrap(), Event);
        assert_eq!("claims-hatter".parse::<ObjectType>().unwrap(), ClaimsHatter);
        assert_eq!("claimsHatter".parse::<ObjectType>().unwrap(), ClaimsHatter);
        assert!("forest".parse::<ObjectType>().is_err());
    }

    #[test]
    fn serde_names_match_cli_names() {
        for object in ObjectType::ALL {
            let json = serde_json::to_string(&object).unwrap();
            assert_eq!(json, format!("\"{}\"", object.name()));
        }
    }
}
