//! Wire format types for MultiversX chain interactions.
//!
//! This module provides types that handle serialization and deserialization
//! of MultiversX-specific values in the x402 protocol wire format.

use bech32::{Bech32, Hrp};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;
use x402_types::chain::ChainId;

/// The CAIP-2 namespace for MultiversX chains.
pub const MVX_NAMESPACE: &str = "mvx";

/// Ticker of the chain's native coin.
pub const EGLD_TOKEN_IDENTIFIER: &str = "EGLD";

/// Decimal places of the native coin.
pub const EGLD_DECIMALS: u32 = 18;

/// Human-readable part of MultiversX bech32 addresses.
pub const MVX_ADDRESS_HRP: &str = "erd";

/// Textual prefix every MultiversX user-facing address starts with.
pub const MVX_ADDRESS_PREFIX: &str = "erd1";

/// Length of a bech32-encoded MultiversX address, in characters.
pub const MVX_ADDRESS_LEN: usize = 62;

/// Length of a MultiversX public key, in bytes.
pub const MVX_PUBKEY_LEN: usize = 32;

// ============================================================================
// MvxAddress
// ============================================================================

/// A MultiversX account address that serializes as a bech32 `erd1…` string.
///
/// Internally the address is the 32-byte public key; the bech32 form is
/// computed on display.
///
/// # Example
///
/// ```
/// use x402_chain_mvx::chain::MvxAddress;
///
/// let addr: MvxAddress = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th"
///     .parse()
///     .unwrap();
/// assert!(addr.to_hex().starts_with("0139472e"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct MvxAddress([u8; MVX_PUBKEY_LEN]);

impl MvxAddress {
    /// Creates an address from a raw public key.
    pub fn from_pubkey(pubkey: [u8; MVX_PUBKEY_LEN]) -> Self {
        Self(pubkey)
    }

    /// Creates an address from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MvxAddressParseError> {
        let pubkey: [u8; MVX_PUBKEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| MvxAddressParseError::InvalidLength {
                    expected: MVX_PUBKEY_LEN,
                    got: bytes.len(),
                })?;
        Ok(Self(pubkey))
    }

    /// Returns the raw public key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the hex-encoded public key, without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the bech32 representation.
    pub fn to_bech32(&self) -> String {
        self.to_string()
    }
}

impl FromStr for MvxAddress {
    type Err = MvxAddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| MvxAddressParseError::InvalidBech32 {
                address: s.to_string(),
                reason: e.to_string(),
            })?;
        if hrp.as_str() != MVX_ADDRESS_HRP {
            return Err(MvxAddressParseError::InvalidHrp {
                address: s.to_string(),
                hrp: hrp.to_string(),
            });
        }
        Self::from_bytes(&data)
    }
}

impl Display for MvxAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hrp = Hrp::parse_unchecked(MVX_ADDRESS_HRP);
        let encoded = bech32::encode::<Bech32>(hrp, &self.0).map_err(|_| std::fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl Serialize for MvxAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MvxAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns `true` if `address` has the outward shape of a MultiversX address:
/// the `erd1` prefix and the fixed bech32 length.
///
/// This does not verify the checksum; use [`MvxAddress::from_str`] for that.
pub fn has_address_shape(address: &str) -> bool {
    address.starts_with(MVX_ADDRESS_PREFIX) && address.len() == MVX_ADDRESS_LEN
}

/// Error returned when parsing a MultiversX address.
#[derive(Debug, thiserror::Error)]
pub enum MvxAddressParseError {
    /// The string is not valid bech32.
    #[error("Invalid bech32 address {address}: {reason}")]
    InvalidBech32 { address: String, reason: String },

    /// The human-readable part is not `erd`.
    #[error("Invalid address {address}: expected hrp erd, got {hrp}")]
    InvalidHrp { address: String, hrp: String },

    /// The decoded public key has the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

// ============================================================================
// MvxChainReference
// ============================================================================

/// A MultiversX chain reference (`1`, `D`, or `T`).
///
/// Combined with the `mvx` namespace, this forms a CAIP-2 chain ID
/// like `mvx:1` or `mvx:D`. The reference is also the `chainID` field
/// carried by every MultiversX transaction.
///
/// # Example
///
/// ```
/// use x402_chain_mvx::chain::MvxChainReference;
/// use x402_types::chain::ChainId;
///
/// let devnet = MvxChainReference::devnet();
/// let chain_id: ChainId = devnet.into();
/// assert_eq!(chain_id.to_string(), "mvx:D");
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MvxChainReference(String);

impl MvxChainReference {
    /// Creates a new chain reference from a string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the MultiversX mainnet chain reference.
    pub fn mainnet() -> Self {
        Self("1".to_string())
    }

    /// Returns the MultiversX devnet chain reference.
    pub fn devnet() -> Self {
        Self("D".to_string())
    }

    /// Returns the MultiversX testnet chain reference.
    pub fn testnet() -> Self {
        Self("T".to_string())
    }

    /// Converts this chain reference to a CAIP-2 [`ChainId`].
    pub fn as_chain_id(&self) -> ChainId {
        ChainId::new(MVX_NAMESPACE, &self.0)
    }

    /// Returns the inner reference string.
    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl Display for MvxChainReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MvxChainReference> for ChainId {
    fn from(value: MvxChainReference) -> Self {
        ChainId::new(MVX_NAMESPACE, value.0)
    }
}

impl From<&MvxChainReference> for ChainId {
    fn from(value: &MvxChainReference) -> Self {
        ChainId::new(MVX_NAMESPACE, &value.0)
    }
}

impl TryFrom<ChainId> for MvxChainReference {
    type Error = MvxChainReferenceFormatError;

    fn try_from(value: ChainId) -> Result<Self, Self::Error> {
        if value.namespace != MVX_NAMESPACE {
            return Err(MvxChainReferenceFormatError::InvalidNamespace(
                value.namespace,
            ));
        }
        Ok(MvxChainReference(value.reference))
    }
}

impl TryFrom<&ChainId> for MvxChainReference {
    type Error = MvxChainReferenceFormatError;

    fn try_from(value: &ChainId) -> Result<Self, Self::Error> {
        if value.namespace != MVX_NAMESPACE {
            return Err(MvxChainReferenceFormatError::InvalidNamespace(
                value.namespace.clone(),
            ));
        }
        Ok(MvxChainReference(value.reference.clone()))
    }
}

impl TryFrom<&str> for MvxChainReference {
    type Error = MvxChainReferenceFormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "1" | "D" | "T" => Ok(MvxChainReference(value.to_string())),
            _ => Err(MvxChainReferenceFormatError::InvalidReference(
                value.to_string(),
            )),
        }
    }
}

/// Error returned when converting a [`ChainId`] to a [`MvxChainReference`].
#[derive(Debug, thiserror::Error)]
pub enum MvxChainReferenceFormatError {
    /// The chain ID namespace is not `mvx`.
    #[error("Invalid namespace {0}, expected mvx")]
    InvalidNamespace(String),
    /// The reference string is not a known MultiversX network.
    #[error("Invalid reference {0}, expected 1, D or T")]
    InvalidReference(String),
}

// ============================================================================
// MvxTokenIdentifier
// ============================================================================

static ESDT_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{3,10}-[0-9a-fA-F]+$").expect("valid ESDT identifier pattern")
});

/// A MultiversX asset: the native coin (`EGLD`) or an ESDT token
/// identified as `TICKER-hexsuffix` (e.g. `USDC-c76f1f`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum MvxTokenIdentifier {
    /// The native coin, moved through the transaction value.
    Egld,
    /// An ESDT token, moved through a transfer opcode in the data field.
    Esdt(String),
}

impl MvxTokenIdentifier {
    /// Returns `true` for the native coin.
    pub fn is_native(&self) -> bool {
        matches!(self, MvxTokenIdentifier::Egld)
    }

    /// Returns the identifier as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            MvxTokenIdentifier::Egld => EGLD_TOKEN_IDENTIFIER,
            MvxTokenIdentifier::Esdt(identifier) => identifier,
        }
    }
}

impl FromStr for MvxTokenIdentifier {
    type Err = MvxTokenIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == EGLD_TOKEN_IDENTIFIER {
            return Ok(MvxTokenIdentifier::Egld);
        }
        if ESDT_IDENTIFIER.is_match(s) {
            Ok(MvxTokenIdentifier::Esdt(s.to_string()))
        } else {
            Err(MvxTokenIdentifierError(s.to_string()))
        }
    }
}

impl Display for MvxTokenIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MvxTokenIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MvxTokenIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a token identifier is neither `EGLD` nor `TICKER-hexsuffix`.
#[derive(Debug, thiserror::Error)]
#[error("Invalid token identifier {0}: expected EGLD or TICKER-hexsuffix")]
pub struct MvxTokenIdentifierError(pub String);

// ============================================================================
// MvxTokenDeployment
// ============================================================================

/// Information about a token available on a MultiversX chain.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MvxTokenDeployment {
    /// The chain this token lives on.
    pub chain_reference: MvxChainReference,
    /// The token identifier.
    pub token: MvxTokenIdentifier,
    /// Number of decimal places for the token (18 for EGLD).
    pub decimals: u32,
}

/// A token amount paired with its deployment information.
#[derive(Debug, Clone)]
pub struct MvxDeployedTokenAmount {
    /// The amount in the token's smallest unit.
    pub amount: u128,
    /// The token deployment this amount refers to.
    pub token: MvxTokenDeployment,
}

impl MvxTokenDeployment {
    /// Creates a token amount from a raw value.
    ///
    /// The value should already be in the token's smallest unit.
    pub fn amount(&self, v: u128) -> MvxDeployedTokenAmount {
        MvxDeployedTokenAmount {
            amount: v,
            token: self.clone(),
        }
    }

    /// Parses a human-readable amount string into token units.
    ///
    /// See [`parse_price`] for the accepted formats.
    pub fn parse(&self, v: &str) -> Result<MvxDeployedTokenAmount, MvxAmountParseError> {
        let amount = parse_price(v, self.decimals)?;
        Ok(MvxDeployedTokenAmount {
            amount,
            token: self.clone(),
        })
    }
}

/// Converts a decimal amount string into atomic units, exactly.
///
/// `"1.5"` with 6 decimals is `1_500_000`. A bare integer string is
/// scaled the same way. Fractional digits beyond `decimals` are truncated.
/// No floating point is involved at any step.
///
/// # Errors
///
/// Returns [`MvxAmountParseError::InvalidFormat`] for anything that is not
/// an unsigned decimal number, and [`MvxAmountParseError::Overflow`] when
/// the scaled value does not fit into `u128`.
///
/// # Example
///
/// ```
/// use x402_chain_mvx::chain::parse_price;
///
/// assert_eq!(parse_price("0.1", 18).unwrap(), 100_000_000_000_000_000);
/// assert!(parse_price("not-a-number", 18).is_err());
/// ```
pub fn parse_price(input: &str, decimals: u32) -> Result<u128, MvxAmountParseError> {
    let invalid = || MvxAmountParseError::InvalidFormat(input.to_string());
    let overflow = || MvxAmountParseError::Overflow(input.to_string());
    let trimmed = input.trim();
    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) {
        return Err(invalid());
    }

    let scale = 10u128
        .checked_pow(decimals)
        .ok_or_else(overflow)?;
    let whole_val: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };

    let kept = &frac[..frac.len().min(decimals as usize)];
    let frac_val: u128 = if kept.is_empty() {
        0
    } else {
        kept.parse().map_err(|_| overflow())?
    };
    let frac_scale = 10u128.pow(decimals - kept.len() as u32);

    whole_val
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_val * frac_scale))
        .ok_or_else(overflow)
}

/// Error returned when parsing a token amount.
#[derive(Debug, thiserror::Error)]
pub enum MvxAmountParseError {
    /// The input string is not a valid unsigned decimal number.
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
    /// The resulting amount overflows u128.
    #[error("Amount overflow: {0}")]
    Overflow(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";
    const ALICE_HEX: &str = "0139472eff6886771a982f3083da5d421f24c29181e63888228dc81ca60d69e1";

    #[test]
    fn test_mvx_chain_reference_to_chain_id() {
        let devnet = MvxChainReference::devnet();
        let chain_id: ChainId = devnet.into();
        assert_eq!(chain_id.namespace, "mvx");
        assert_eq!(chain_id.reference, "D");
        assert_eq!(chain_id.to_string(), "mvx:D");
    }

    #[test]
    fn test_chain_id_to_mvx_chain_reference() {
        let chain_id = ChainId::new("mvx", "1");
        let reference = MvxChainReference::try_from(chain_id).unwrap();
        assert_eq!(reference, MvxChainReference::mainnet());
    }

    #[test]
    fn test_chain_id_wrong_namespace() {
        let chain_id = ChainId::new("eip155", "8453");
        assert!(MvxChainReference::try_from(chain_id).is_err());
    }

    #[test]
    fn test_mvx_address_parse() {
        let addr: MvxAddress = ALICE.parse().unwrap();
        assert_eq!(addr.to_hex(), ALICE_HEX);
        assert_eq!(addr.to_string(), ALICE);
    }

    #[test]
    fn test_mvx_address_zero_pubkey() {
        let addr = MvxAddress::from_pubkey([0u8; 32]);
        assert_eq!(
            addr.to_string(),
            "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu"
        );
    }

    #[test]
    fn test_mvx_address_rejects_bad_checksum() {
        let mut tampered = ALICE.to_string();
        tampered.pop();
        tampered.push('q');
        assert!(tampered.parse::<MvxAddress>().is_err());
    }

    #[test]
    fn test_mvx_address_rejects_wrong_hrp() {
        let other = bech32::encode::<Bech32>(Hrp::parse_unchecked("moa"), &[1u8; 32]).unwrap();
        let err = other.parse::<MvxAddress>().unwrap_err();
        assert!(matches!(err, MvxAddressParseError::InvalidHrp { .. }));
    }

    #[test]
    fn test_mvx_address_rejects_wrong_length() {
        assert!(MvxAddress::from_bytes(&[1u8; 20]).is_err());
    }

    #[test]
    fn test_mvx_address_serde_roundtrip() {
        let addr: MvxAddress = ALICE.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{ALICE}\""));
        let deserialized: MvxAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_address_shape() {
        assert!(has_address_shape(ALICE));
        assert!(!has_address_shape("erd1rec"));
        assert!(!has_address_shape(&format!("moa1{}", &ALICE[4..])));
    }

    #[test]
    fn test_token_identifier_parse() {
        assert_eq!(
            "EGLD".parse::<MvxTokenIdentifier>().unwrap(),
            MvxTokenIdentifier::Egld
        );
        let usdc: MvxTokenIdentifier = "USDC-c76f1f".parse().unwrap();
        assert!(!usdc.is_native());
        assert_eq!(usdc.as_str(), "USDC-c76f1f");
        assert!("USDC-123".parse::<MvxTokenIdentifier>().is_ok());
    }

    #[test]
    fn test_token_identifier_rejects_bad_shape() {
        assert!("INVALIDTOKEN".parse::<MvxTokenIdentifier>().is_err());
        assert!("USDC-xyz".parse::<MvxTokenIdentifier>().is_err());
        assert!("egld".parse::<MvxTokenIdentifier>().is_err());
        assert!("-abc".parse::<MvxTokenIdentifier>().is_err());
    }

    #[test]
    fn test_parse_price_exact() {
        assert_eq!(parse_price("1.0", 18).unwrap(), 10u128.pow(18));
        assert_eq!(parse_price("0.1", 18).unwrap(), 10u128.pow(17));
        assert_eq!(parse_price("0", 18).unwrap(), 0);
        assert_eq!(parse_price("1.5", 6).unwrap(), 1_500_000);
    }

    #[test]
    fn test_parse_price_integer_string() {
        assert_eq!(parse_price("1000", 6).unwrap(), 1_000_000_000);
        assert_eq!(parse_price("7", 0).unwrap(), 7);
    }

    #[test]
    fn test_parse_price_truncates_extra_digits() {
        assert_eq!(parse_price("0.1234567", 6).unwrap(), 123_456);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price("not-a-number", 18).is_err());
        assert!(parse_price("-1", 18).is_err());
        assert!(parse_price("1.2.3", 18).is_err());
        assert!(parse_price(".", 18).is_err());
        assert!(parse_price("", 18).is_err());
    }

    #[test]
    fn test_parse_price_overflow() {
        let input = "340282366920938463463374607431768211456";
        let err = parse_price(input, 0).unwrap_err();
        assert!(matches!(err, MvxAmountParseError::Overflow(ref value) if value == input));
        assert!(err.to_string().contains(input));
        assert!(parse_price("1", 39).is_err());
    }

    #[test]
    fn test_token_deployment_parse() {
        let deployment = MvxTokenDeployment {
            chain_reference: MvxChainReference::mainnet(),
            token: "USDC-c76f1f".parse().unwrap(),
            decimals: 6,
        };
        assert_eq!(deployment.parse("2.25").unwrap().amount, 2_250_000);
        assert_eq!(deployment.amount(42).amount, 42);
    }
}
