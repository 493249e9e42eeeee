//! ledger::ancestry
//!
//! Admin resolution for hats.
//!
//! Inside one tree a hat's admins are pure functions of its id: truncate
//! the id at each level above it. Where that chain ends depends on the
//! hat's level inside its own tree, which only the ledger knows for
//! certain, so both functions ask for it instead of inferring it from the
//! id. A top hat has no local admin; if its tree is linked beneath another
//! hat, that hat is its admin.

use thiserror::Error;
use tracing::debug;

use super::traits::{Ledger, LedgerError};
use crate::core::ids::{admin_at_level, HatId, IdError};

/// Errors from admin resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AncestryError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The ledger reported a level the id cannot encode.
    #[error(transparent)]
    Id(#[from] IdError),
}

/// Admins of `hat` within its own tree, nearest first.
///
/// The last element is the tree's top hat. A top hat yields an empty list.
///
/// # Errors
///
/// - `Ledger` if the level lookup fails
/// - `Id` if the ledger reports a level above 14
///
/// # Example
///
/// ```
/// use hatwork::core::ids::from_dotted_notation;
/// use hatwork::ledger::ancestry::local_admins;
/// use hatwork::ledger::mock::MockLedger;
///
/// # tokio_test::block_on(async {
/// let ledger = MockLedger::new();
/// let hat = from_dotted_notation("3.1.2").unwrap();
/// let admins = local_admins(&ledger, &hat).await.unwrap();
/// let dotted: Vec<String> = admins.iter().map(|id| id.to_dotted()).collect();
/// assert_eq!(dotted, ["3.1", "3"]);
/// # });
/// ```
pub async fn local_admins<L>(ledger: &L, hat: &HatId) -> Result<Vec<HatId>, AncestryError>
where
    L: Ledger + ?Sized,
{
    let level = ledger.local_hat_level(hat).await?;
    let admins = (0..level)
        .rev()
        .map(|l| admin_at_level(hat, l))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(hat = %hat.to_dotted(), level, count = admins.len(), "resolved local admins");
    Ok(admins)
}

/// The hat one level above `hat`.
///
/// For a top hat this is the hat its tree is linked beneath, or `None`
/// for an unlinked tree.
///
/// # Errors
///
/// As for [`local_admins`].
pub async fn direct_admin<L>(ledger: &L, hat: &HatId) -> Result<Option<HatId>, AncestryError>
where
    L: Ledger + ?Sized,
{
    let level = ledger.local_hat_level(hat).await?;
    if level == 0 {
        return Ok(ledger.linked_tree_admin(hat.tree()).await?);
    }
    Ok(Some(admin_at_level(hat, level - 1)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{from_dotted_notation, TreeId};
    use crate::ledger::errors::ProtocolError;
    use crate::ledger::mock::{LedgerFailure, MockLedger};

    fn id(path: &str) -> HatId {
        from_dotted_notation(path).unwrap()
    }

    mod local {
        use super::*;

        #[tokio::test]
        async fn top_hat_has_none() {
            let ledger = MockLedger::new();
            assert!(local_admins(&ledger, &id("5")).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn nearest_first() {
            let ledger = MockLedger::new();
            let admins = local_admins(&ledger, &id("5.1.2.3")).await.unwrap();
            assert_eq!(admins, vec![id("5.1.2"), id("5.1"), id("5")]);
        }

        #[tokio::test]
        async fn uses_ledger_level() {
            let ledger = MockLedger::new().with_local_level(id("5.1.2.3"), 1);
            let admins = local_admins(&ledger, &id("5.1.2.3")).await.unwrap();
            assert_eq!(admins, vec![id("5")]);
        }

        #[tokio::test]
        async fn level_above_max_is_rejected() {
            let ledger = MockLedger::new().with_local_level(id("5.1"), 20);
            let err = local_admins(&ledger, &id("5.1")).await.unwrap_err();
            assert_eq!(err, AncestryError::Id(IdError::LevelOutOfRange(19)));
        }

        #[tokio::test]
        async fn ledger_errors_propagate() {
            let ledger = MockLedger::new().fail_on(LedgerFailure::LocalHatLevel(
                LedgerError::Transport("timeout".into()),
            ));
            let err = local_admins(&ledger, &id("5.1")).await.unwrap_err();
            assert_eq!(
                err,
                AncestryError::Ledger(LedgerError::Transport("timeout".into()))
            );
        }
    }

    mod direct {
        use super::*;

        #[tokio::test]
        async fn parent_of_child_hat() {
            let ledger = MockLedger::new();
            assert_eq!(
                direct_admin(&ledger, &id("5.1.2")).await.unwrap(),
                Some(id("5.1"))
            );
        }

        #[tokio::test]
        async fn unlinked_top_hat() {
            let ledger = MockLedger::new();
            assert_eq!(direct_admin(&ledger, &id("5")).await.unwrap(), None);
        }

        #[tokio::test]
        async fn linked_top_hat() {
            let ledger = MockLedger::new().with_link(TreeId::new(5), id("2.3"));
            assert_eq!(
                direct_admin(&ledger, &id("5")).await.unwrap(),
                Some(id("2.3"))
            );
        }

        #[tokio::test]
        async fn revert_propagates() {
            let ledger = MockLedger::new().fail_on(LedgerFailure::LinkedTreeAdmin(
                LedgerError::Reverted(ProtocolError::HatDoesNotExist),
            ));
            let err = direct_admin(&ledger, &id("5")).await.unwrap_err();
            assert_eq!(
                err,
                AncestryError::Ledger(LedgerError::Reverted(ProtocolError::HatDoesNotExist))
            );
        }
    }
}
