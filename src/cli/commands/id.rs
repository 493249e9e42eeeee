//! id command - Convert and inspect hat ids

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::ids::{admin_at_level, from_dotted_notation, to_dotted_notation, HatId};
use crate::ui::output;

/// Parse a hat id given as `0x` hex, decimal, or a dotted path.
pub(crate) fn parse_hat_id(input: &str) -> Result<HatId> {
    let input = input.trim();
    let parsed = if input.contains('.') {
        from_dotted_notation(input)
    } else {
        HatId::from_hex_or_decimal(input)
    };
    parsed.with_context(|| format!("Invalid hat id '{}'", input))
}

/// Show every representation and the structure of a hat id.
pub fn inspect(ctx: &Context, input: &str) -> Result<()> {
    let id = parse_hat_id(input)?;
    let tree = id.tree();

    let mut rows = vec![
        ("hex", id.to_hex()),
        ("decimal", id.to_decimal_string()),
        ("dotted", to_dotted_notation(&id)),
        ("domain", tree.get().to_string()),
        ("tree", tree.to_hex()),
        ("depth", id.depth().to_string()),
        ("top hat", yes_no(id.is_top_hat())),
    ];
    if !id.is_well_formed() {
        rows.push(("well formed", yes_no(false)));
        output::warn(
            "id has a non-zero level after a zero level; dotted form is truncated",
            ctx.verbosity(),
        );
    }

    println!("{}", output::format_fields(&rows));
    Ok(())
}

/// Convert a dotted path to a hat id.
pub fn from_dotted(path: &str) -> Result<()> {
    let id = from_dotted_notation(path)?;
    println!("{}", id.to_hex());
    Ok(())
}

/// Convert a hat id to its dotted path.
pub fn to_dotted(input: &str) -> Result<()> {
    let id = parse_hat_id(input)?;
    println!("{}", to_dotted_notation(&id));
    Ok(())
}

/// Show the admin of a hat at `level`.
pub fn admin(ctx: &Context, input: &str, level: u8) -> Result<()> {
    let id = parse_hat_id(input)?;
    if level >= id.depth() && !id.is_top_hat() {
        output::warn(
            format!(
                "level {} is not above the hat's own level {}",
                level,
                id.depth()
            ),
            ctx.verbosity(),
        );
    }
    let admin = admin_at_level(&id, level)?;
    println!("{}", admin.to_hex());
    output::print(format!("({})", to_dotted_notation(&admin)), ctx.verbosity());
    Ok(())
}

/// Show the id of the `index`-th child of a hat.
pub fn child(ctx: &Context, input: &str, index: u16) -> Result<()> {
    let id = parse_hat_id(input)?;
    let child = id.child(index)?;
    println!("{}", child.to_hex());
    output::print(format!("({})", to_dotted_notation(&child)), ctx.verbosity());
    Ok(())
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
