//! ledger::mock
//!
//! In-memory ledger for deterministic testing.
//!
//! # Design
//!
//! Levels default to what the id encodes. Linking a tree with
//! [`MockLedger::with_link`] places its top hat one level below the
//! linked admin, which shifts `hat_level` for every hat in the tree and
//! extends admin checks across the link. A single method can be made to
//! fail with [`MockLedger::fail_on`]; every call is recorded.
//!
//! # Example
//!
//! ```
//! use hatwork::core::address::Address;
//! use hatwork::core::ids::{from_dotted_notation, TreeId};
//! use hatwork::ledger::mock::MockLedger;
//! use hatwork::ledger::Ledger;
//!
//! # tokio_test::block_on(async {
//! let alice = Address::new("0x00000000000000000000000000000000000a11ce").unwrap();
//! let parent = from_dotted_notation("1.2").unwrap();
//! let child_tree_hat = from_dotted_notation("9.1").unwrap();
//!
//! let ledger = MockLedger::new()
//!     .with_link(TreeId::new(9), parent)
//!     .with_wearer(alice.clone(), parent);
//!
//! assert_eq!(ledger.hat_level(&child_tree_hat).await.unwrap(), 4);
//! assert!(ledger.is_admin_of_hat(&alice, &child_tree_hat).await.unwrap());
//! # });
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::errors::ProtocolError;
use super::traits::{HatView, Ledger, LedgerError};
use crate::core::address::Address;
use crate::core::constants::MAX_LEVELS;
use crate::core::ids::{admin_at_level, HatId, TreeId};

/// Mock ledger for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>`; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    inner: Arc<Mutex<MockLedgerInner>>,
}

#[derive(Debug, Default)]
struct MockLedgerInner {
    views: HashMap<HatId, HatView>,
    local_levels: HashMap<HatId, u8>,
    wearers: HashSet<(Address, HatId)>,
    links: HashMap<TreeId, HatId>,
    fail_on: Option<LedgerFailure>,
    calls: Vec<LedgerCall>,
}

/// Which ledger method should fail, and how.
#[derive(Debug, Clone)]
pub enum LedgerFailure {
    HatLevel(LedgerError),
    LocalHatLevel(LedgerError),
    IsWearerOfHat(LedgerError),
    IsAdminOfHat(LedgerError),
    ViewHat(LedgerError),
    LinkedTreeAdmin(LedgerError),
}

/// Recorded ledger call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    HatLevel(HatId),
    LocalHatLevel(HatId),
    IsWearerOfHat { wearer: Address, hat: HatId },
    IsAdminOfHat { user: Address, hat: HatId },
    ViewHat(HatId),
    LinkedTreeAdmin(TreeId),
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: store the view returned for `hat`.
    pub fn with_hat(self, hat: HatId, view: HatView) -> Self {
        self.inner.lock().unwrap().views.insert(hat, view);
        self
    }

    /// Builder: override the local level reported for `hat`.
    pub fn with_local_level(self, hat: HatId, level: u8) -> Self {
        self.inner.lock().unwrap().local_levels.insert(hat, level);
        self
    }

    /// Builder: make `wearer` wear `hat`.
    pub fn with_wearer(self, wearer: Address, hat: HatId) -> Self {
        self.inner.lock().unwrap().wearers.insert((wearer, hat));
        self
    }

    /// Builder: link `tree` beneath `admin`.
    pub fn with_link(self, tree: TreeId, admin: HatId) -> Self {
        self.inner.lock().unwrap().links.insert(tree, admin);
        self
    }

    /// Builder: fail one method.
    pub fn fail_on(self, failure: LedgerFailure) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(failure);
        }
        self
    }

    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<LedgerCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Record `call` and return the configured failure for it, if any.
    fn enter(&self, call: LedgerCall) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        let failure = match (&inner.fail_on, &call) {
            (Some(LedgerFailure::HatLevel(e)), LedgerCall::HatLevel(_))
            | (Some(LedgerFailure::LocalHatLevel(e)), LedgerCall::LocalHatLevel(_))
            | (Some(LedgerFailure::IsWearerOfHat(e)), LedgerCall::IsWearerOfHat { .. })
            | (Some(LedgerFailure::IsAdminOfHat(e)), LedgerCall::IsAdminOfHat { .. })
            | (Some(LedgerFailure::ViewHat(e)), LedgerCall::ViewHat(_))
            | (Some(LedgerFailure::LinkedTreeAdmin(e)), LedgerCall::LinkedTreeAdmin(_)) => {
                Some(e.clone())
            }
            _ => None,
        };
        inner.calls.push(call);
        failure.map_or(Ok(()), Err)
    }
}

impl MockLedgerInner {
    fn local_level(&self, hat: &HatId) -> u8 {
        self.local_levels
            .get(hat)
            .copied()
            .unwrap_or_else(|| hat.depth())
    }

    /// Every hat that administers `hat`, nearest first, crossing links.
    /// An unlinked top hat administers itself.
    fn admin_chain(&self, hat: &HatId) -> Vec<HatId> {
        let mut chain = Vec::new();
        let mut current = *hat;
        // Each hop crosses one link; a cycle cannot be longer than the map.
        for _ in 0..=self.links.len() {
            let level = self.local_level(&current).min(MAX_LEVELS);
            chain.extend((0..level).rev().filter_map(|l| admin_at_level(&current, l).ok()));
            match self.links.get(&current.tree()) {
                Some(admin) => {
                    chain.push(*admin);
                    current = *admin;
                }
                None => break,
            }
        }
        if chain.is_empty() {
            chain.push(*hat);
        }
        chain
    }

    fn global_level(&self, hat: &HatId) -> u8 {
        let mut level = self.local_level(hat);
        let mut tree = hat.tree();
        for _ in 0..self.links.len() {
            match self.links.get(&tree) {
                Some(admin) => {
                    level = level.saturating_add(self.local_level(admin).saturating_add(1));
                    tree = admin.tree();
                }
                None => break,
            }
        }
        level
    }
}

#[async_trait]
impl Ledger for MockLedger {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn hat_level(&self, hat: &HatId) -> Result<u8, LedgerError> {
        self.enter(LedgerCall::HatLevel(*hat))?;
        Ok(self.inner.lock().unwrap().global_level(hat))
    }

    async fn local_hat_level(&self, hat: &HatId) -> Result<u8, LedgerError> {
        self.enter(LedgerCall::LocalHatLevel(*hat))?;
        Ok(self.inner.lock().unwrap().local_level(hat))
    }

    async fn is_wearer_of_hat(&self, wearer: &Address, hat: &HatId) -> Result<bool, LedgerError> {
        self.enter(LedgerCall::IsWearerOfHat {
            wearer: wearer.clone(),
            hat: *hat,
        })?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.wearers.contains(&(wearer.clone(), *hat)))
    }

    async fn is_admin_of_hat(&self, user: &Address, hat: &HatId) -> Result<bool, LedgerError> {
        self.enter(LedgerCall::IsAdminOfHat {
            user: user.clone(),
            hat: *hat,
        })?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .admin_chain(hat)
            .into_iter()
            .any(|admin| inner.wearers.contains(&(user.clone(), admin))))
    }

    async fn view_hat(&self, hat: &HatId) -> Result<HatView, LedgerError> {
        self.enter(LedgerCall::ViewHat(*hat))?;
        let inner = self.inner.lock().unwrap();
        inner
            .views
            .get(hat)
            .cloned()
            .ok_or(LedgerError::Reverted(ProtocolError::HatDoesNotExist))
    }

    async fn linked_tree_admin(&self, tree: TreeId) -> Result<Option<HatId>, LedgerError> {
        self.enter(LedgerCall::LinkedTreeAdmin(tree))?;
        Ok(self.inner.lock().unwrap().links.get(&tree).copied())
    }
}
