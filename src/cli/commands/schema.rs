//! schema command - Show the relations of the graph index schema

use anyhow::Result;

use crate::subgraph::schema::ObjectType;
use crate::ui::output;

/// Print the relation table for `object`, or for every type.
pub fn schema(object: Option<&str>) -> Result<()> {
    let types = match object {
        Some(name) => vec![name.parse::<ObjectType>()?],
        None => ObjectType::ALL.to_vec(),
    };

    let blocks: Vec<String> = types.into_iter().map(describe).collect();
    println!("{}", blocks.join("\n\n"));
    Ok(())
}

fn describe(object: ObjectType) -> String {
    let mut scalars = vec!["id"];
    scalars.extend_from_slice(object.scalar_fields());
    let mut rows = vec![format!("fields: {}", scalars.join(", "))];

    let width = object
        .relations()
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    rows.extend(object.relations().iter().map(|(name, target)| {
        let ordered = if target.is_timestamped() {
            "  (newest first)"
        } else {
            ""
        };
        format!(
            "{:<width$} -> {}{}",
            name,
            target.graphql_name(),
            ordered,
            width = width
        )
    }));

    format!(
        "{} ({})\n{}",
        object.graphql_name(),
        object.name(),
        output::format_list(&rows, "  ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_wearer() {
        assert_eq!(
            describe(ObjectType::Wearer),
            "Wearer (wearer)\n  fields: id\n  currentHats -> Hat\n  mintEvent   -> HatsEvent  (newest first)\n  burnEvent   -> HatsEvent  (newest first)"
        );
    }

    #[test]
    fn describe_event() {
        assert_eq!(
            describe(ObjectType::Event),
            "HatsEvent (event)\n  fields: id, timestamp, blockNumber, transactionID\n  hat  -> Hat\n  tree -> Tree"
        );
    }

    #[test]
    fn unknown_type() {
        assert!(schema(Some("branch")).is_err());
    }
}
