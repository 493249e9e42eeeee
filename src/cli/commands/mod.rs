//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Parses command-specific arguments into domain types
//! 2. Calls the library
//! 3. Formats and displays output
//!
//! Every handler is synchronous; nothing here talks to the network.

mod completion;
mod config_cmd;
mod id;
mod query;
mod schema;
mod tree;

pub use completion::completion;
pub use config_cmd::{list as config_list, path as config_path};
pub use schema::schema;

use crate::cli::args::{Command, ConfigAction, IdAction, QueryAction, TreeAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Id { action } => match action {
            IdAction::Inspect { id } => id::inspect(ctx, &id),
            IdAction::FromDotted { path } => id::from_dotted(&path),
            IdAction::ToDotted { id } => id::to_dotted(&id),
            IdAction::Admin { id, level } => id::admin(ctx, &id, level),
            IdAction::Child { id, index } => id::child(ctx, &id, index),
        },
        Command::Tree { action } => match action {
            TreeAction::Hex { domain } => tree::hex(domain),
            TreeAction::Domain { hex } => tree::domain(&hex),
            TreeAction::TopHat { domain } => tree::top_hat(domain),
        },
        Command::Query { action } => match action {
            QueryAction::Compile {
                object,
                projection,
                pretty,
            } => query::compile(ctx, &object, projection.as_deref(), pretty),
            QueryAction::Document {
                entry,
                arg,
                projection,
                page,
                per_page,
            } => query::document(
                ctx,
                entry,
                arg.as_deref(),
                projection.as_deref(),
                page,
                per_page,
            ),
        },
        Command::Schema { object } => schema::schema(object.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::List => config_cmd::list(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}
