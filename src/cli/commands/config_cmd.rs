//! config command - Show configuration values and file locations

use anyhow::Result;

use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// List effective configuration values, one `key = value` per line.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?.config;
    output::print("# Effective Configuration", ctx.verbosity());
    println!("{}", render(&config).join("\n"));
    Ok(())
}

fn render(config: &Config) -> Vec<String> {
    let mut lines = vec![format!("page_size = {}", config.page_size())];
    match config.default_chain() {
        Some(chain) => lines.push(format!("default_chain = {}", chain)),
        None => lines.push("default_chain = (not set)".to_string()),
    }
    for (chain, url) in &config.global.endpoints {
        lines.push(format!("endpoints.{} = {}", chain, url));
    }
    for (object, relation, size) in config.filters().iter() {
        lines.push(format!("filters.{}.{} = {}", object.name(), relation, size));
    }
    lines
}

/// Show which config files are in use.
pub fn path(ctx: &Context) -> Result<()> {
    let dir = ctx.working_dir()?;
    let config = ctx.load_config()?.config;

    let describe = |loaded: Option<&std::path::Path>| {
        loaded
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    println!("global = {}", describe(config.global_config_loaded_from()));
    println!("project = {}", describe(config.project_config_loaded_from()));

    if config.global_config_loaded_from().is_none() {
        if let Ok(canonical) = Config::global_config_path() {
            output::print(
                format!("# global config is read from {}", canonical.display()),
                ctx.verbosity(),
            );
        }
    }
    if config.project_config_loaded_from().is_none() {
        output::print(
            format!(
                "# project config is read from {}",
                Config::project_config_path(&dir).display()
            ),
            ctx.verbosity(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{GlobalConfig, ProjectConfig};

    #[test]
    fn render_defaults() {
        assert_eq!(
            render(&Config::default()),
            vec!["page_size = 1000", "default_chain = (not set)"]
        );
    }

    #[test]
    fn render_merged() {
        let mut global = GlobalConfig {
            default_chain: Some(10),
            ..Default::default()
        };
        global
            .endpoints
            .insert("10".into(), "https://example.com/op".into());
        let mut project = ProjectConfig {
            page_size: Some(20),
            ..Default::default()
        };
        project
            .filters
            .entry("tree".into())
            .or_default()
            .insert("hats".into(), 5);

        let config = Config::from_parts(global, Some(project));
        assert_eq!(
            render(&config),
            vec![
                "page_size = 20",
                "default_chain = 10",
                "endpoints.10 = https://example.com/op",
                "filters.tree.hats = 5",
            ]
        );
    }
}
