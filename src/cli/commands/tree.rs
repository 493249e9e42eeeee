//! tree command - Convert tree domains

use anyhow::{Context as _, Result};

use crate::core::ids::{domain_to_top_hat_id, hex_to_tree_domain, tree_domain_to_hex};

/// Tree domain to 8-digit hex.
pub fn hex(domain: u32) -> Result<()> {
    println!("{}", tree_domain_to_hex(domain));
    Ok(())
}

/// Tree hex to domain.
pub fn domain(hex: &str) -> Result<()> {
    let domain =
        hex_to_tree_domain(hex).with_context(|| format!("Invalid tree hex '{}'", hex))?;
    println!("{}", domain);
    Ok(())
}

/// Top hat id of a tree.
pub fn top_hat(domain: u32) -> Result<()> {
    println!("{}", domain_to_top_hat_id(domain).to_hex());
    Ok(())
}
