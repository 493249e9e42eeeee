//! core
//!
//! Domain types, constants and configuration.
//!
//! # Modules
//!
//! - [`constants`] - Protocol and compiler constants
//! - [`ids`] - Hat and tree identifiers and their representations
//! - [`address`] - Validated account addresses
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Identifiers are fixed-width values, not strings
//! - Conversions are pure and total where the protocol allows
//! - Schemas are strict and self-describing

pub mod address;
pub mod config;
pub mod constants;
pub mod ids;
