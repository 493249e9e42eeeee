//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing output goes through this module so quiet mode and
//! formatting are handled in one place. Library diagnostics use `tracing`
//! instead.

pub mod output;
