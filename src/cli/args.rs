//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--config <path>`: Read global config from this file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hats - identifier codec and graph index query compiler for hats trees
#[derive(Parser, Debug)]
#[command(name = "hats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if hats was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Read global configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert and inspect hat ids
    #[command(
        name = "id",
        long_about = "Convert and inspect hat ids.\n\n\
            Hat ids are accepted as 0x-prefixed hex or as decimal. Dotted paths \
            use the tree domain followed by one child index per level.",
        after_help = "\
EXAMPLES:
    # Everything about one hat
    hats id inspect 0x0000000100020000000000000000000000000000000000000000000000000000

    # Dotted path to hex and back
    hats id from-dotted 1.2.3
    hats id to-dotted 0x0000000100020003000000000000000000000000000000000000000000000000

    # The admin of 1.2.3 at level 1
    hats id admin 1.2.3 --level 1"
    )]
    Id {
        #[command(subcommand)]
        action: IdAction,
    },

    /// Convert tree domains
    Tree {
        #[command(subcommand)]
        action: TreeAction,
    },

    /// Compile projections into graph index queries
    #[command(
        name = "query",
        long_about = "Compile projections into graph index queries.\n\n\
            A projection names the fields and relations to fetch. It is read \
            as JSON or TOML from a file, or from stdin with '-'. Without a \
            projection only ids are selected. Page sizes come from the \
            configuration.",
        after_help = "\
EXAMPLES:
    # Selection set for a hat
    echo '{\"prettyId\": true, \"wearers\": {}}' | hats query compile hat --projection -

    # Full document for tree 1
    hats query document tree 1 --projection tree.toml"
    )]
    Query {
        #[command(subcommand)]
        action: QueryAction,
    },

    /// Show the relations of the graph index schema
    Schema {
        /// Object type to show; all types when omitted
        #[arg(value_name = "TYPE")]
        object: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    hats completion bash >> ~/.bashrc
    hats completion zsh >> ~/.zshrc
    hats completion fish > ~/.config/fish/completions/hats.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Id subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum IdAction {
    /// Show every representation and the structure of a hat id
    Inspect {
        /// Hat id (hex or decimal)
        id: String,
    },
    /// Convert a dotted path to a hat id
    FromDotted {
        /// Dotted path, e.g. 1.2.3
        path: String,
    },
    /// Convert a hat id to its dotted path
    ToDotted {
        /// Hat id (hex or decimal)
        id: String,
    },
    /// Show the admin of a hat at a given level
    Admin {
        /// Hat id (hex, decimal or dotted)
        id: String,
        /// Level of the admin, 0 for the top hat
        #[arg(long)]
        level: u8,
    },
    /// Show the id of a hat's child
    Child {
        /// Hat id (hex, decimal or dotted)
        id: String,
        /// Child index, starting at 1
        index: u16,
    },
}

/// Tree subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TreeAction {
    /// Tree domain to 8-digit hex
    Hex {
        /// Tree domain (decimal)
        domain: u32,
    },
    /// Tree hex to domain
    Domain {
        /// Tree id as hex
        hex: String,
    },
    /// Top hat id of a tree
    TopHat {
        /// Tree domain (decimal)
        domain: u32,
    },
}

/// Query subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum QueryAction {
    /// Compile a projection into a selection set
    Compile {
        /// Root object type: hat, tree, wearer, event or claimsHatter
        #[arg(value_name = "TYPE")]
        object: String,

        /// Projection file (JSON or TOML), or '-' for stdin
        #[arg(long, value_name = "FILE")]
        projection: Option<PathBuf>,

        /// Render on multiple lines
        #[arg(long)]
        pretty: bool,
    },
    /// Build a complete query document and print it as JSON
    Document {
        /// Entry point
        #[arg(value_enum)]
        entry: EntryPoint,

        /// Id, comma-separated ids, or address, depending on the entry point
        arg: Option<String>,

        /// Projection file (JSON or TOML), or '-' for stdin
        #[arg(long, value_name = "FILE")]
        projection: Option<PathBuf>,

        /// Page to fetch, for paged entry points
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Items per page, for paged entry points
        #[arg(long, default_value_t = 100)]
        per_page: u32,
    },
}

/// Root query entry points.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Hat,
    Hats,
    Tree,
    Trees,
    TreesPage,
    Wearer,
    WearersOfHat,
    Events,
    ClaimsHatter,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// List effective configuration values
    List,
    /// Show which config files are in use
    Path,
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
