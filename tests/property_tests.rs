//! Property-based tests for the identifier codec and the query compiler.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use hatwork::core::ids::{
    admin_at_level, decimal_to_hex, from_dotted_notation, hat_id_to_domain, hex_to_decimal,
    hex_to_tree_domain, to_dotted_notation, tree_domain_to_hex, HatId, IdError,
};
use hatwork::subgraph::compiler::QueryCompiler;
use hatwork::subgraph::projection::ProjectionConfig;
use hatwork::subgraph::schema::{next_type, ObjectType, SchemaError};

/// Any 256-bit value.
fn any_hat_id() -> impl Strategy<Value = HatId> {
    any::<[u8; 32]>().prop_map(HatId::from_be_bytes)
}

/// Well-formed ids: a domain followed by up to 14 non-zero levels.
fn well_formed_hat_id() -> impl Strategy<Value = HatId> {
    (any::<u32>(), prop::collection::vec(1u16..=u16::MAX, 0..=14)).prop_map(|(domain, levels)| {
        let mut path = domain.to_string();
        for level in levels {
            path.push('.');
            path.push_str(&level.to_string());
        }
        from_dotted_notation(&path).unwrap()
    })
}

fn any_object_type() -> impl Strategy<Value = ObjectType> {
    prop::sample::select(ObjectType::ALL.to_vec())
}

/// A type together with one of its declared relations.
fn declared_relation() -> impl Strategy<Value = (ObjectType, &'static str, ObjectType)> {
    let pairs: Vec<_> = ObjectType::ALL
        .iter()
        .flat_map(|object| {
            object
                .relations()
                .iter()
                .map(move |(name, target)| (*object, *name, *target))
        })
        .collect();
    prop::sample::select(pairs)
}

proptest! {
    /// Hex rendering and parsing are inverse.
    #[test]
    fn hex_roundtrip(id in any_hat_id()) {
        prop_assert_eq!(hex_to_decimal(&decimal_to_hex(&id)).unwrap(), id);
    }

    /// Decimal rendering and parsing are inverse.
    #[test]
    fn decimal_roundtrip(id in any_hat_id()) {
        prop_assert_eq!(HatId::from_decimal_str(&id.to_decimal_string()).unwrap(), id);
    }

    /// Canonical hex is always 0x + 64 lowercase digits.
    #[test]
    fn canonical_hex_shape(id in any_hat_id()) {
        let hex = decimal_to_hex(&id);
        prop_assert_eq!(hex.len(), 66);
        prop_assert!(hex.starts_with("0x"));
        prop_assert!(hex[2..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    /// Tree domain hex round-trips for every domain.
    #[test]
    fn domain_hex_roundtrip(domain in any::<u32>()) {
        let hex = tree_domain_to_hex(domain);
        prop_assert_eq!(hex.len(), 10);
        prop_assert_eq!(hex_to_tree_domain(&hex).unwrap(), domain);
    }

    /// Dotted notation round-trips for well-formed ids.
    #[test]
    fn dotted_roundtrip(id in well_formed_hat_id()) {
        prop_assert!(id.is_well_formed());
        prop_assert_eq!(from_dotted_notation(&to_dotted_notation(&id)).unwrap(), id);
    }

    /// The domain is the first eight hex digits.
    #[test]
    fn domain_projection(id in any_hat_id()) {
        let hex = decimal_to_hex(&id);
        prop_assert_eq!(hat_id_to_domain(&id), hex_to_tree_domain(&hex[..10]).unwrap());
    }

    /// Truncating at a level twice is the same as once.
    #[test]
    fn admin_truncation_idempotent(id in any_hat_id(), level in 0u8..=14) {
        let once = admin_at_level(&id, level).unwrap();
        prop_assert_eq!(admin_at_level(&once, level).unwrap(), once);
        prop_assert_eq!(once.domain(), id.domain());
    }

    /// Levels past 14 are rejected.
    #[test]
    fn admin_level_out_of_range(id in any_hat_id(), level in 15u8..=u8::MAX) {
        prop_assert_eq!(admin_at_level(&id, level), Err(IdError::LevelOutOfRange(level)));
    }

    /// The admin at level `depth - 1` is one segment shorter.
    #[test]
    fn admin_drops_one_level(id in well_formed_hat_id()) {
        prop_assume!(!id.is_top_hat());
        let admin = admin_at_level(&id, id.depth() - 1).unwrap();
        prop_assert_eq!(admin.depth(), id.depth() - 1);
        let child_path = to_dotted_notation(&id);
        prop_assert!(child_path.starts_with(&to_dotted_notation(&admin)));
    }

    /// Every declared relation resolves to its declared target.
    #[test]
    fn declared_relations_resolve((object, relation, target) in declared_relation()) {
        prop_assert_eq!(next_type(object, relation).unwrap(), target);
    }

    /// Undeclared relations fail with UnknownRelation.
    #[test]
    fn undeclared_relations_fail(object in any_object_type(), relation in "[a-zA-Z]{1,16}") {
        prop_assume!(object.relations().iter().all(|(name, _)| *name != relation));
        prop_assert_eq!(
            next_type(object, &relation),
            Err(SchemaError::UnknownRelation { object, relation: relation.clone() })
        );
    }

    /// A relation without a filter carries the default page size.
    #[test]
    fn pagination_default((object, relation, _) in declared_relation()) {
        let projection = ProjectionConfig::new().relation(relation, ProjectionConfig::new());
        let text = QueryCompiler::new().compile(object, &projection).unwrap().to_string();
        let expected = format!("{}(first: 1000", relation);
        prop_assert!(text.contains(&expected), "{}", text);
    }

    /// Compiled selections always start with the id field.
    #[test]
    fn id_comes_first(object in any_object_type(), fields in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let mut projection = ProjectionConfig::new();
        for field in fields {
            if object.relations().iter().all(|(name, _)| *name != field) {
                projection = projection.field(field);
            }
        }
        let text = QueryCompiler::new().compile(object, &projection).unwrap().to_string();
        prop_assert!(text == "id" || text.starts_with("id, "), "{}", text);
    }
}
