//! ledger
//!
//! Read access to the hats protocol contract.
//!
//! # Modules
//!
//! - `traits`: The `Ledger` trait, `HatView` and `LedgerError`
//! - `errors`: `ProtocolError` and revert translation
//! - [`ancestry`]: Admin resolution on top of a `Ledger`
//! - [`mock`]: Mock implementation for deterministic testing

pub mod ancestry;
mod errors;
pub mod mock;
mod traits;

pub use ancestry::{direct_admin, local_admins, AncestryError};
pub use errors::{ProtocolError, KNOWN_NAMES};
pub use traits::*;
