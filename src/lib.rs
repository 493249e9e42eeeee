//! Hatwork - client-side toolkit for hats permission trees
//!
//! Hats are roles arranged in trees. Every hat is named by a fixed-width
//! 256-bit id that encodes its whole admin path, and an external graph
//! index serves the on-chain state of those trees. This crate converts
//! between the representations of hat ids and compiles declarative field
//! selections into queries for the index.
//!
//! # Architecture
//!
//! - [`core`] - Identifiers, addresses, constants and configuration
//! - [`subgraph`] - Schema-routed query compiler and graph index client
//! - [`ledger`] - Read-only protocol contract collaborator and admin resolution
//! - [`cli`] - The `hats` command-line interface
//! - [`ui`] - User-facing output
//!
//! # Invariants
//!
//! 1. Every hat id round-trips through hex and decimal unchanged
//! 2. Dotted notation round-trips for well-formed ids
//! 3. A projection naming an unknown relation compiles to nothing
//! 4. Every compiled relation carries an explicit page size

pub mod cli;
pub mod core;
pub mod ledger;
pub mod subgraph;
pub mod ui;
