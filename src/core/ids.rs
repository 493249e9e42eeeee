//! core::ids
//!
//! Hat and tree identifiers, and conversions between their representations.
//!
//! # Layout
//!
//! A hat id is a 256-bit unsigned integer split into one 32-bit domain
//! segment followed by fourteen 16-bit level segments:
//!
//! ```text
//! 0x 0000000c 0001 0002 0000 ... 0000
//!    domain   L1   L2   L3       L14
//! ```
//!
//! A hat whose level segments are all zero is the top hat of its domain.
//!
//! # Representations
//!
//! - Canonical hex: `0x` + 64 lowercase hex digits
//! - Tree hex: `0x` + 8 lowercase hex digits
//! - Dotted ("IP") notation: `12.1.2`, stopping at the first zero level
//! - Decimal: the 256-bit value in base 10, used for contract arguments
//!
//! # Gapped identifiers
//!
//! Well-formed ids never carry a non-zero level after a zero one. The
//! codec does not enforce this: gapped ids are transformed mechanically,
//! and dotted notation silently drops everything after the first zero
//! level. [`HatId::is_well_formed`] reports the condition for callers that
//! care.
//!
//! # Example
//!
//! ```
//! use hatwork::core::ids::{from_dotted_notation, to_dotted_notation, HatId};
//!
//! let id = from_dotted_notation("1.1").unwrap();
//! assert_eq!(
//!     id.to_hex(),
//!     "0x0000000100010000000000000000000000000000000000000000000000000000"
//! );
//! assert_eq!(to_dotted_notation(&id), "1.1");
//! assert_eq!(id.domain(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constants::{
    DOMAIN_HEX_DIGITS, HAT_ID_BITS, HAT_ID_BYTES, HAT_ID_HEX_DIGITS, MAX_DOTTED_SEGMENTS,
    MAX_LEVELS,
};

/// Errors from identifier parsing and derivation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    /// A dotted path had a bad token or too many segments.
    #[error("malformed dotted path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("invalid hex identifier: {0}")]
    InvalidHex(String),

    #[error("invalid decimal identifier: {0}")]
    InvalidDecimal(String),

    #[error("value does not fit in 256 bits: {0}")]
    Overflow(String),

    #[error("level {0} is out of range (expected 0..=14)")]
    LevelOutOfRange(u8),

    #[error("hat {0} is already at the deepest level")]
    MaxLevelsReached(String),

    #[error("child index must be non-zero")]
    InvalidChildIndex,

    #[error("hat {0} has a non-zero level after a zero level")]
    NotWellFormed(String),
}

impl IdError {
    fn malformed(path: &str, reason: impl Into<String>) -> Self {
        IdError::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// A hat identifier.
///
/// Stored as 32 big-endian bytes; every bit pattern is representable.
///
/// # Example
///
/// ```
/// use hatwork::core::ids::HatId;
///
/// let id: HatId = "0x0000000c00010002000000000000000000000000000000000000000000000000"
///     .parse()
///     .unwrap();
/// assert_eq!(id.domain(), 12);
/// assert_eq!(id.level_segment(1), Some(1));
/// assert_eq!(id.level_segment(2), Some(2));
/// assert_eq!(id.depth(), 2);
/// assert_eq!(id.to_dotted(), "12.1.2");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HatId([u8; HAT_ID_BYTES]);

impl HatId {
    /// The all-zero id. Not a valid hat, but a valid value.
    pub const ZERO: HatId = HatId([0; HAT_ID_BYTES]);

    /// Build an id from its big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; HAT_ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// The big-endian bytes of this id.
    pub fn to_be_bytes(&self) -> [u8; HAT_ID_BYTES] {
        self.0
    }

    /// Parse a hex literal (`0x` prefix optional, any case, up to 64
    /// significant digits).
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidHex` for empty input, non-hex characters,
    /// or more than 64 significant digits.
    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        let digits = strip_hex_prefix(hex);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidHex(hex.to_string()));
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > HAT_ID_HEX_DIGITS {
            return Err(IdError::InvalidHex(format!(
                "{hex} (more than {HAT_ID_HEX_DIGITS} significant digits)"
            )));
        }

        let padded = format!("{significant:0>width$}", width = HAT_ID_HEX_DIGITS);
        let mut bytes = [0u8; HAT_ID_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| IdError::InvalidHex(format!("{hex} ({e})")))?;
        Ok(Self(bytes))
    }

    /// Canonical hex form: `0x` + 64 lowercase digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a base-10 rendering of the 256-bit value.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidDecimal` for empty or non-digit input, and
    /// `IdError::Overflow` if the value needs more than 256 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use hatwork::core::ids::HatId;
    ///
    /// let id = HatId::from_decimal_str("26959946667150639794667015087019630673637144422540572481103610249216").unwrap();
    /// assert_eq!(id.to_dotted(), "1");
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, IdError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidDecimal(s.to_string()));
        }

        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| IdError::InvalidDecimal(s.to_string()))?;
        if value.bits() > u64::from(HAT_ID_BITS) {
            return Err(IdError::Overflow(s.to_string()));
        }

        let be = value.to_bytes_be();
        let mut bytes = [0u8; HAT_ID_BYTES];
        bytes[HAT_ID_BYTES - be.len()..].copy_from_slice(&be);
        Ok(Self(bytes))
    }

    /// Base-10 rendering of the 256-bit value.
    pub fn to_decimal_string(&self) -> String {
        BigUint::from_bytes_be(&self.0).to_str_radix(10)
    }

    /// Parse either a `0x`-prefixed hex literal or a decimal integer.
    ///
    /// # Errors
    ///
    /// Propagates the error of whichever parser the prefix selects.
    pub fn from_hex_or_decimal(s: &str) -> Result<Self, IdError> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex(s)
        } else {
            Self::from_decimal_str(s)
        }
    }

    /// The 32-bit domain (tree id) segment.
    pub fn domain(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// The tree this hat belongs to.
    pub fn tree(&self) -> TreeId {
        TreeId(self.domain())
    }

    /// Value of level segment `level` (1-based). `None` outside 1..=14.
    pub fn level_segment(&self, level: u8) -> Option<u16> {
        if level == 0 || level > MAX_LEVELS {
            return None;
        }
        let offset = segment_offset(level);
        Some(u16::from_be_bytes([self.0[offset], self.0[offset + 1]]))
    }

    fn set_level_segment(&mut self, level: u8, value: u16) {
        let offset = segment_offset(level);
        self.0[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// All fourteen level segments, shallowest first.
    pub fn level_segments(&self) -> impl Iterator<Item = u16> + '_ {
        (1..=MAX_LEVELS).filter_map(move |level| self.level_segment(level))
    }

    /// Number of leading non-zero level segments.
    ///
    /// This is a structural count. The level the protocol reports for a
    /// hat (especially across linked trees) comes from the ledger.
    pub fn depth(&self) -> u8 {
        self.level_segments().take_while(|&s| s != 0).count() as u8
    }

    /// Whether every level segment is zero.
    pub fn is_top_hat(&self) -> bool {
        self.level_segments().all(|s| s == 0)
    }

    /// Whether no non-zero level segment follows a zero one.
    pub fn is_well_formed(&self) -> bool {
        self.level_segments()
            .skip_while(|&s| s != 0)
            .all(|s| s == 0)
    }

    /// Id of the `index`-th child of this hat.
    ///
    /// # Errors
    ///
    /// - `IdError::InvalidChildIndex` if `index` is zero
    /// - `IdError::NotWellFormed` if this id has a gap
    /// - `IdError::MaxLevelsReached` if this hat is at level 14
    ///
    /// # Example
    ///
    /// ```
    /// use hatwork::core::ids::{domain_to_top_hat_id, HatId};
    ///
    /// let top = domain_to_top_hat_id(3);
    /// let child = top.child(2).unwrap();
    /// assert_eq!(child.to_dotted(), "3.2");
    /// assert_eq!(child.child(7).unwrap().to_dotted(), "3.2.7");
    /// ```
    pub fn child(&self, index: u16) -> Result<HatId, IdError> {
        if index == 0 {
            return Err(IdError::InvalidChildIndex);
        }
        if !self.is_well_formed() {
            return Err(IdError::NotWellFormed(self.to_hex()));
        }
        let depth = self.depth();
        if depth >= MAX_LEVELS {
            return Err(IdError::MaxLevelsReached(self.to_hex()));
        }

        let mut child = *self;
        child.set_level_segment(depth + 1, index);
        Ok(child)
    }

    /// Dotted notation for this id. See [`to_dotted_notation`].
    pub fn to_dotted(&self) -> String {
        to_dotted_notation(self)
    }
}

/// Byte offset of level segment `level` (1-based).
fn segment_offset(level: u8) -> usize {
    DOMAIN_HEX_DIGITS / 2 + 2 * (usize::from(level) - 1)
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

impl FromStr for HatId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for HatId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<HatId> for String {
    fn from(id: HatId) -> Self {
        id.to_hex()
    }
}

impl From<TreeId> for HatId {
    fn from(tree: TreeId) -> Self {
        tree.top_hat()
    }
}

impl fmt::Display for HatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for HatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HatId({})", self.to_dotted())
    }
}

/// A tree id: the 32-bit domain shared by every hat in one tree.
///
/// # Example
///
/// ```
/// use hatwork::core::ids::TreeId;
///
/// let tree = TreeId::new(12);
/// assert_eq!(tree.to_hex(), "0x0000000c");
/// assert_eq!(TreeId::from_hex("0x0000000c").unwrap(), tree);
/// assert_eq!(tree.top_hat().to_dotted(), "12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(u32);

impl TreeId {
    pub const fn new(domain: u32) -> Self {
        Self(domain)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// `0x` + 8 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        tree_domain_to_hex(self.0)
    }

    /// Parse a tree hex literal.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidHex` if the input is not 1..=8 significant
    /// hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        hex_to_tree_domain(hex).map(Self)
    }

    /// The top hat of this tree.
    pub fn top_hat(&self) -> HatId {
        domain_to_top_hat_id(self.0)
    }
}

impl From<u32> for TreeId {
    fn from(domain: u32) -> Self {
        Self(domain)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --------------------------------------------------------------------------
// Codec operations
// --------------------------------------------------------------------------

/// Render a hat id as `0x` + 64 lowercase hex digits.
pub fn decimal_to_hex(id: &HatId) -> String {
    id.to_hex()
}

/// Parse any valid hex literal into a hat id.
///
/// # Errors
///
/// Returns `IdError::InvalidHex` if the literal is not hex or exceeds
/// 256 bits.
pub fn hex_to_decimal(hex: &str) -> Result<HatId, IdError> {
    HatId::from_hex(hex)
}

/// Render a domain as `0x` + 8 lowercase hex digits.
pub fn tree_domain_to_hex(domain: u32) -> String {
    format!("0x{domain:08x}")
}

/// Parse a tree hex literal into its domain.
///
/// # Errors
///
/// Returns `IdError::InvalidHex` if the literal is not hex or exceeds
/// 32 bits.
pub fn hex_to_tree_domain(hex: &str) -> Result<u32, IdError> {
    let digits = strip_hex_prefix(hex);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IdError::InvalidHex(hex.to_string()));
    }
    let significant = digits.trim_start_matches('0');
    if significant.len() > DOMAIN_HEX_DIGITS {
        return Err(IdError::InvalidHex(format!(
            "{hex} (more than {DOMAIN_HEX_DIGITS} significant digits)"
        )));
    }
    if significant.is_empty() {
        return Ok(0);
    }
    u32::from_str_radix(significant, 16).map_err(|e| IdError::InvalidHex(format!("{hex} ({e})")))
}

/// The top-hat id of a domain: the domain followed by zero levels.
pub fn domain_to_top_hat_id(domain: u32) -> HatId {
    let mut bytes = [0u8; HAT_ID_BYTES];
    bytes[..4].copy_from_slice(&domain.to_be_bytes());
    HatId(bytes)
}

/// The domain segment of a hat id.
pub fn hat_id_to_domain(id: &HatId) -> u32 {
    id.domain()
}

/// Render a hat id in dotted notation.
///
/// The domain is always rendered; level segments follow until the first
/// zero segment, which ends the rendering.
///
/// # Example
///
/// ```
/// use hatwork::core::ids::{domain_to_top_hat_id, to_dotted_notation};
///
/// assert_eq!(to_dotted_notation(&domain_to_top_hat_id(1)), "1");
/// ```
pub fn to_dotted_notation(id: &HatId) -> String {
    let mut out = id.domain().to_string();
    for segment in id.level_segments().take_while(|&s| s != 0) {
        out.push('.');
        out.push_str(&segment.to_string());
    }
    out
}

/// Parse dotted notation into a hat id.
///
/// The first token is the domain (32 bits); each further token fills the
/// next level segment (16 bits). Missing levels are zero.
///
/// # Errors
///
/// Returns `IdError::MalformedPath` if a token is not a non-negative
/// integer that fits its segment, or if there are more than 15 tokens.
///
/// # Example
///
/// ```
/// use hatwork::core::ids::from_dotted_notation;
///
/// assert!(from_dotted_notation("1.2.3").is_ok());
/// assert!(from_dotted_notation("1.65536").is_err());
/// assert!(from_dotted_notation("1..2").is_err());
/// ```
pub fn from_dotted_notation(path: &str) -> Result<HatId, IdError> {
    let tokens: Vec<&str> = path.split('.').collect();
    if tokens.len() > MAX_DOTTED_SEGMENTS {
        return Err(IdError::malformed(
            path,
            format!(
                "{} segments given, at most {MAX_DOTTED_SEGMENTS} allowed",
                tokens.len()
            ),
        ));
    }

    let domain: u32 = parse_token(path, tokens[0], "domain")?;
    let mut id = domain_to_top_hat_id(domain);
    for (i, token) in tokens.iter().enumerate().skip(1) {
        let level = i as u8;
        let value: u16 = parse_token(path, token, &format!("level {level}"))?;
        id.set_level_segment(level, value);
    }
    Ok(id)
}

fn parse_token<T: FromStr>(path: &str, token: &str, what: &str) -> Result<T, IdError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdError::malformed(
            path,
            format!("{what} '{token}' is not a non-negative integer"),
        ));
    }
    token
        .parse()
        .map_err(|_| IdError::malformed(path, format!("{what} '{token}' is out of range")))
}

/// The admin of `id` at `level`: the id truncated after the domain and
/// the first `level` level segments, zero-filled.
///
/// `level = 0` yields the top hat of the domain.
///
/// # Errors
///
/// Returns `IdError::LevelOutOfRange` if `level` exceeds 14.
///
/// # Example
///
/// ```
/// use hatwork::core::ids::{admin_at_level, from_dotted_notation};
///
/// let hat = from_dotted_notation("7.1.4.2").unwrap();
/// assert_eq!(admin_at_level(&hat, 2).unwrap().to_dotted(), "7.1.4");
/// assert_eq!(admin_at_level(&hat, 0).unwrap().to_dotted(), "7");
/// ```
pub fn admin_at_level(id: &HatId, level: u8) -> Result<HatId, IdError> {
    if level > MAX_LEVELS {
        return Err(IdError::LevelOutOfRange(level));
    }
    let keep = DOMAIN_HEX_DIGITS / 2 + 2 * usize::from(level);
    let mut bytes = [0u8; HAT_ID_BYTES];
    bytes[..keep].copy_from_slice(&id.0[..keep]);
    Ok(HatId(bytes))
}
