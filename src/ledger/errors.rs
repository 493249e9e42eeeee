//! ledger::errors
//!
//! Typed protocol errors recovered from revert reasons.
//!
//! Ledger transports surface contract failures as free-form strings that
//! wrap the custom error name somewhere inside, for example
//! `execution reverted: NotAdmin(0x12.., 26959..)`. [`ProtocolError::from_revert`]
//! splits the string into identifier tokens and matches them exactly, so
//! `NotAdminOrWearer` is never mistaken for `NotAdmin`.

use thiserror::Error;

/// Custom errors raised by the hats protocol.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("caller is not an admin of the hat")]
    NotAdmin,

    #[error("all hats of this kind are already worn")]
    AllHatsWorn,

    #[error("hat does not exist")]
    HatDoesNotExist,

    #[error("account is already wearing the hat")]
    AlreadyWearingHat,

    #[error("hat is not active")]
    HatNotActive,

    #[error("account is not eligible for the hat")]
    NotEligible,

    #[error("caller is not wearing the hat")]
    NotHatWearer,

    #[error("caller is neither an admin nor a wearer of the hat")]
    NotAdminOrWearer,

    #[error("tree has reached the maximum number of levels")]
    MaxLevelsReached,

    #[error("new max supply is below the current supply")]
    NewMaxSupplyTooLow,

    #[error("hat is immutable")]
    Immutable,

    #[error("string is too long")]
    StringTooLong,

    #[error("batch arrays have different lengths")]
    BatchArrayLengthMismatch,

    #[error("linking would create a cycle")]
    CircularLinkage,

    #[error("linking across trees is not allowed here")]
    CrossTreeLinkage,

    #[error("no link was requested")]
    LinkageNotRequested,

    #[error("tree cannot be unlinked")]
    InvalidUnlink,

    #[error("caller is not the hat's toggle module")]
    NotHatsToggle,

    #[error("caller is not the hat's eligibility module")]
    NotHatsEligibility,

    /// A revert with no recognised protocol error name.
    #[error("transaction reverted: {0}")]
    Unknown(String),
}

use ProtocolError::*;

/// Names of the known protocol errors.
pub const KNOWN_NAMES: &[&str] = &[
    "NotAdmin",
    "AllHatsWorn",
    "HatDoesNotExist",
    "AlreadyWearingHat",
    "HatNotActive",
    "NotEligible",
    "NotHatWearer",
    "NotAdminOrWearer",
    "MaxLevelsReached",
    "NewMaxSupplyTooLow",
    "Immutable",
    "StringTooLong",
    "BatchArrayLengthMismatch",
    "CircularLinkage",
    "CrossTreeLinkage",
    "LinkageNotRequested",
    "InvalidUnlink",
    "NotHatsToggle",
    "NotHatsEligibility",
];

impl ProtocolError {
    /// Translate a revert reason into a protocol error.
    ///
    /// The first token of `reason` that names a known protocol error wins.
    /// Reasons with no such token become [`ProtocolError::Unknown`].
    ///
    /// # Example
    ///
    /// ```
    /// use hatwork::ledger::ProtocolError;
    ///
    /// assert_eq!(
    ///     ProtocolError::from_revert("execution reverted: NotAdmin(0xab, 1)"),
    ///     ProtocolError::NotAdmin
    /// );
    /// assert_eq!(
    ///     ProtocolError::from_revert("out of gas"),
    ///     ProtocolError::Unknown("out of gas".into())
    /// );
    /// ```
    pub fn from_revert(reason: &str) -> Self {
        reason
            .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .filter(|token| !token.is_empty())
            .find_map(Self::from_name)
            .unwrap_or_else(|| Unknown(reason.to_string()))
    }

    /// The protocol error with exactly this name.
    pub fn from_name(name: &str) -> Option<Self> {
        let err = match name {
            "NotAdmin" => NotAdmin,
            "AllHatsWorn" => AllHatsWorn,
            "HatDoesNotExist" => HatDoesNotExist,
            "AlreadyWearingHat" => AlreadyWearingHat,
            "HatNotActive" => HatNotActive,
            "NotEligible" => NotEligible,
            "NotHatWearer" => NotHatWearer,
            "NotAdminOrWearer" => NotAdminOrWearer,
            "MaxLevelsReached" => MaxLevelsReached,
            "NewMaxSupplyTooLow" => NewMaxSupplyTooLow,
            "Immutable" => Immutable,
            "StringTooLong" => StringTooLong,
            "BatchArrayLengthMismatch" => BatchArrayLengthMismatch,
            "CircularLinkage" => CircularLinkage,
            "CrossTreeLinkage" => CrossTreeLinkage,
            "LinkageNotRequested" => LinkageNotRequested,
            "InvalidUnlink" => InvalidUnlink,
            "NotHatsToggle" => NotHatsToggle,
            "NotHatsEligibility" => NotHatsEligibility,
            _ => return None,
        };
        Some(err)
    }

    /// The protocol's name for this error, if it is a known one.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            NotAdmin => Some("NotAdmin"),
            AllHatsWorn => Some("AllHatsWorn"),
            HatDoesNotExist => Some("HatDoesNotExist"),
            AlreadyWearingHat => Some("AlreadyWearingHat"),
            HatNotActive => Some("HatNotActive"),
            NotEligible => Some("NotEligible"),
            NotHatWearer => Some("NotHatWearer"),
            NotAdminOrWearer => Some("NotAdminOrWearer"),
            MaxLevelsReached => Some("MaxLevelsReached"),
            NewMaxSupplyTooLow => Some("NewMaxSupplyTooLow"),
            Immutable => Some("Immutable"),
            StringTooLong => Some("StringTooLong"),
            BatchArrayLengthMismatch => Some("BatchArrayLengthMismatch"),
            CircularLinkage => Some("CircularLinkage"),
            CrossTreeLinkage => Some("CrossTreeLinkage"),
            LinkageNotRequested => Some("LinkageNotRequested"),
            InvalidUnlink => Some("InvalidUnlink"),
            NotHatsToggle => Some("NotHatsToggle"),
            NotHatsEligibility => Some("NotHatsEligibility"),
            Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_name_round_trips() {
        for name in KNOWN_NAMES {
            let err = ProtocolError::from_revert(name);
            assert_eq!(err.name(), Some(*name));
            assert_eq!(ProtocolError::from_name(name), Some(err));
        }
        assert_eq!(KNOWN_NAMES.len(), 19);
    }

    #[test]
    fn wrapped_reasons() {
        assert_eq!(
            ProtocolError::from_revert("Error: VM Exception: reverted with custom error 'NotHatWearer()'"),
            NotHatWearer
        );
        assert_eq!(
            ProtocolError::from_revert("ContractFunctionRevertedError: AllHatsWorn(0x0000000100010000)"),
            AllHatsWorn
        );
    }

    #[test]
    fn longer_names_are_not_confused() {
        assert_eq!(
            ProtocolError::from_revert("reverted: NotAdminOrWearer"),
            NotAdminOrWearer
        );
        assert_eq!(
            ProtocolError::from_revert("reverted: NotHatsEligibility()"),
            NotHatsEligibility
        );
    }

    #[test]
    fn substrings_do_not_match() {
        let reason = "reverted: NotAdministrator";
        assert_eq!(
            ProtocolError::from_revert(reason),
            Unknown(reason.to_string())
        );
    }

    #[test]
    fn unknown_has_no_name() {
        assert_eq!(Unknown("x".into()).name(), None);
        assert_eq!(
            Unknown("boom".into()).to_string(),
            "transaction reverted: boom"
        );
    }
}
