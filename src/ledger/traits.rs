//! ledger::traits
//!
//! The read-only ledger collaborator.
//!
//! # Design
//!
//! The protocol contract is the source of truth for anything the hat id
//! alone cannot answer: a hat's level once trees are linked, who wears it,
//! who administers it. `Ledger` exposes those reads; submitting
//! transactions is left to callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::ProtocolError;
use crate::core::address::Address;
use crate::core::ids::{HatId, TreeId};

/// Errors from ledger reads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The contract reverted.
    #[error(transparent)]
    Reverted(#[from] ProtocolError),

    /// The ledger could not be reached.
    #[error("ledger transport error: {0}")]
    Transport(String),
}

impl LedgerError {
    /// Wrap a raw revert reason.
    pub fn from_revert(reason: &str) -> Self {
        Self::Reverted(ProtocolError::from_revert(reason))
    }
}

/// On-chain view of a hat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatView {
    pub details: String,
    pub max_supply: u32,
    pub supply: u32,
    pub eligibility: Address,
    pub toggle: Address,
    pub image_uri: String,
    /// Highest child index created under this hat so far.
    pub last_hat_id: u16,
    pub mutable: bool,
    pub active: bool,
}

/// Read calls against the hats protocol contract.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Level of `hat` counted from the root of the global tree, including
    /// any trees it is linked beneath.
    async fn hat_level(&self, hat: &HatId) -> Result<u8, LedgerError>;

    /// Level of `hat` inside its own tree. This is the level the id
    /// encodes.
    async fn local_hat_level(&self, hat: &HatId) -> Result<u8, LedgerError>;

    async fn is_wearer_of_hat(&self, wearer: &Address, hat: &HatId) -> Result<bool, LedgerError>;

    async fn is_admin_of_hat(&self, user: &Address, hat: &HatId) -> Result<bool, LedgerError>;

    /// # Errors
    ///
    /// `Reverted(HatDoesNotExist)` for unknown hats.
    async fn view_hat(&self, hat: &HatId) -> Result<HatView, LedgerError>;

    /// The hat `tree` is linked beneath, if any.
    async fn linked_tree_admin(&self, tree: TreeId) -> Result<Option<HatId>, LedgerError>;
}
