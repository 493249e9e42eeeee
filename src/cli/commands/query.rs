//! query command - Compile projections and build query documents
//!
//! Projections are read as JSON when the text parses as JSON, and as TOML
//! otherwise. Page sizes and per-relation filters come from the loaded
//! configuration.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context as _, Result};

use super::id::parse_hat_id;
use crate::cli::args::EntryPoint;
use crate::cli::Context;
use crate::core::address::Address;
use crate::core::ids::TreeId;
use crate::subgraph::compiler::QueryCompiler;
use crate::subgraph::projection::ProjectionConfig;
use crate::subgraph::query::{QueryBuilder, QueryDocument};
use crate::subgraph::schema::ObjectType;

/// Read a projection from `path`, or stdin for `-`. `None` selects ids only.
pub(crate) fn read_projection(path: Option<&Path>) -> Result<ProjectionConfig> {
    let Some(path) = path else {
        return Ok(ProjectionConfig::new());
    };

    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read projection from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read projection file '{}'", path.display()))?
    };

    parse_projection(&text)
}

/// Parse projection text as JSON, falling back to TOML.
pub(crate) fn parse_projection(text: &str) -> Result<ProjectionConfig> {
    if text.trim().is_empty() {
        return Ok(ProjectionConfig::new());
    }
    match serde_json::from_str(text) {
        Ok(projection) => Ok(projection),
        Err(json_err) => toml::from_str(text).map_err(|toml_err| {
            anyhow!(
                "Projection is neither valid JSON ({}) nor valid TOML ({})",
                json_err,
                toml_err.message()
            )
        }),
    }
}

/// Compile a projection for `object` and print the selection set.
pub fn compile(ctx: &Context, object: &str, projection: Option<&Path>, pretty: bool) -> Result<()> {
    let root: ObjectType = object.parse()?;
    let projection = read_projection(projection)?;
    let config = ctx.load_config()?.config;
    let filters = config.filters();

    let selection = QueryCompiler::new()
        .with_page_size(config.page_size())
        .with_filters(&filters)
        .compile(root, &projection)?;

    if pretty {
        println!("{}", selection.render_pretty(0));
    } else {
        println!("{}", selection);
    }
    Ok(())
}

/// Build a query document for `entry` and print it as JSON.
pub fn document(
    ctx: &Context,
    entry: EntryPoint,
    arg: Option<&str>,
    projection: Option<&Path>,
    page: u32,
    per_page: u32,
) -> Result<()> {
    let projection = read_projection(projection)?;
    let config = ctx.load_config()?.config;
    let filters = config.filters();
    let builder = QueryBuilder::new(
        QueryCompiler::new()
            .with_page_size(config.page_size())
            .with_filters(&filters),
    );

    let doc = build_document(&builder, entry, arg, &projection, page, per_page)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn build_document(
    builder: &QueryBuilder<'_>,
    entry: EntryPoint,
    arg: Option<&str>,
    projection: &ProjectionConfig,
    page: u32,
    per_page: u32,
) -> Result<QueryDocument> {
    let require = || arg.ok_or_else(|| anyhow!("'{}' needs an argument", entry_name(entry)));

    let doc = match entry {
        EntryPoint::Hat => builder.hat(&parse_hat_id(require()?)?, projection)?,
        EntryPoint::Hats => {
            let ids = split_list(require()?)
                .map(parse_hat_id)
                .collect::<Result<Vec<_>>>()?;
            builder.hats_by_ids(&ids, projection)?
        }
        EntryPoint::Tree => builder.tree(parse_tree(require()?)?, projection)?,
        EntryPoint::Trees => {
            let trees = split_list(require()?)
                .map(parse_tree)
                .collect::<Result<Vec<_>>>()?;
            builder.trees_by_ids(&trees, projection)?
        }
        EntryPoint::TreesPage => {
            reject_arg(entry, arg)?;
            builder.trees_page(page, per_page, projection)?
        }
        EntryPoint::Wearer => builder.wearer(&parse_address(require()?)?, projection)?,
        EntryPoint::WearersOfHat => builder.wearers_of_hat_page(
            &parse_hat_id(require()?)?,
            page,
            per_page,
            projection,
        )?,
        EntryPoint::Events => {
            reject_arg(entry, arg)?;
            builder.events_page(page, per_page, projection)?
        }
        EntryPoint::ClaimsHatter => {
            builder.claims_hatter(&parse_address(require()?)?, projection)?
        }
    };
    Ok(doc)
}

fn entry_name(entry: EntryPoint) -> String {
    use clap::ValueEnum;
    entry
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_else(|| format!("{:?}", entry))
}

fn reject_arg(entry: EntryPoint, arg: Option<&str>) -> Result<()> {
    if let Some(arg) = arg {
        bail!(
            "'{}' takes no argument (got '{}'); use --page and --per-page",
            entry_name(entry),
            arg
        );
    }
    Ok(())
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// A tree given as a decimal domain or as hex.
fn parse_tree(input: &str) -> Result<TreeId> {
    let parsed = if input.starts_with("0x") || input.starts_with("0X") {
        TreeId::from_hex(input).ok()
    } else {
        input.parse::<u32>().ok().map(TreeId::new)
    };
    parsed.ok_or_else(|| anyhow!("Invalid tree '{}': expected a domain or 0x hex", input))
}

fn parse_address(input: &str) -> Result<Address> {
    Ok(Address::new(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subgraph::projection::Selection;

    mod projections {
        use super::*;

        #[test]
        fn json_projection() {
            let projection = parse_projection(r#"{"prettyId": true, "wearers": {}}"#).unwrap();
            assert_eq!(projection.len(), 2);
            assert!(matches!(projection.get("wearers"), Some(Selection::Nested(_))));
        }

        #[test]
        fn toml_projection() {
            let projection = parse_projection(
                r#"
                details = true
                [subHats]
                prettyId = true
                "#,
            )
            .unwrap();
            assert_eq!(projection.len(), 2);
        }

        #[test]
        fn empty_is_ids_only() {
            assert!(parse_projection("  \n").unwrap().is_empty());
            assert!(read_projection(None).unwrap().is_empty());
        }

        #[test]
        fn garbage_is_rejected() {
            let err = parse_projection("{not valid").unwrap_err();
            assert!(err.to_string().contains("neither valid JSON"));
        }
    }

    mod documents {
        use super::*;

        fn build(entry: EntryPoint, arg: Option<&str>) -> Result<QueryDocument> {
            build_document(
                &QueryBuilder::default(),
                entry,
                arg,
                &ProjectionConfig::new(),
                1,
                10,
            )
        }

        #[test]
        fn hat_accepts_dotted() {
            let doc = build(EntryPoint::Hat, Some("1.1")).unwrap();
            assert_eq!(doc.operation, "Hat");
        }

        #[test]
        fn list_entries_split_on_commas() {
            let doc = build(EntryPoint::Trees, Some("1, 0x00000002")).unwrap();
            assert_eq!(doc.variables["ids"][1], "0x00000002");
        }

        #[test]
        fn missing_argument() {
            let err = build(EntryPoint::Wearer, None).unwrap_err();
            assert!(err.to_string().contains("'wearer' needs an argument"));
        }

        #[test]
        fn paged_entries_take_no_argument() {
            assert!(build(EntryPoint::Events, Some("3")).is_err());
            let doc = build(EntryPoint::Events, None).unwrap();
            assert_eq!(doc.variables["skip"], 10);
        }

        #[test]
        fn bad_tree() {
            assert!(parse_tree("twelve").is_err());
            assert_eq!(parse_tree("12").unwrap(), TreeId::new(12));
        }
    }
}
