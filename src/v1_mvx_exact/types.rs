//! Type definitions for the V1 MultiversX payment scheme.
//!
//! This module defines the MultiversX-specific types used in the x402 protocol
//! wire format for payment requirements, signed payloads and errors.

use serde::{Deserialize, Serialize};
use x402_types::proto::v1;
use x402_types::timestamp::UnixTimestamp;

use crate::chain::{MvxAddress, MvxTransaction};

/// String literal for the "mvx" scheme name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MvxScheme;

impl MvxScheme {
    pub const VALUE: &'static str = "mvx";
}

impl AsRef<str> for MvxScheme {
    fn as_ref(&self) -> &str {
        Self::VALUE
    }
}

impl std::fmt::Display for MvxScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Self::VALUE)
    }
}

impl Serialize for MvxScheme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(Self::VALUE)
    }
}

impl<'de> Deserialize<'de> for MvxScheme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == Self::VALUE {
            Ok(MvxScheme)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected '{}', got '{s}'",
                Self::VALUE
            )))
        }
    }
}

/// How the asset of a requirement is moved on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMethod {
    /// Native coin in the transaction value.
    Direct,
    /// ESDT built-in function in the data field.
    #[serde(alias = "esdt")]
    Token,
}

impl TransferMethod {
    /// Transaction version implied by the transfer shape alone: `1` for
    /// direct transfers, `2` for token transfers. A relayed transaction is
    /// always version `2`.
    pub fn protocol_version(&self) -> u32 {
        match self {
            TransferMethod::Direct => 1,
            TransferMethod::Token => 2,
        }
    }
}

/// Derived values a requirement carries so the payer need not recompute them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvxRequirementsExtra {
    /// Expected data field, empty for plain EGLD transfers.
    pub data_payload: String,
    /// Chain reference the payment must be made on.
    pub chain_id: String,
    #[serde(rename = "assetTransferMethod")]
    pub asset_transfer_method: TransferMethod,
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,
    /// Account paying fees on behalf of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer: Option<MvxAddress>,
}

impl MvxRequirementsExtra {
    /// Sets the fee-paying relayer.
    pub fn with_relayer(mut self, relayer: MvxAddress) -> Self {
        self.relayer = Some(relayer);
        self
    }
}

/// The signed MultiversX transaction fields sent as the x402 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvxExactPayload {
    pub nonce: u64,
    /// Native value in atomic units, as a decimal string.
    pub value: String,
    pub receiver: MvxAddress,
    pub sender: MvxAddress,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Data field as plain text.
    pub data: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    /// Transaction version: 2 for relayed and token transfers, 1 otherwise.
    pub version: u32,
    /// Hex-encoded sender signature.
    pub signature: String,
    /// Start of the validity window.
    pub valid_after: UnixTimestamp,
    /// End of the validity window.
    pub valid_before: UnixTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer: Option<MvxAddress>,
}

impl TryFrom<&MvxExactPayload> for MvxTransaction {
    type Error = MvxExactError;

    fn try_from(payload: &MvxExactPayload) -> Result<Self, Self::Error> {
        let value = payload
            .value
            .parse::<u128>()
            .map_err(|_| MvxExactError::InvalidPayload(format!("value {}", payload.value)))?;
        let signature = hex::decode(&payload.signature).map_err(|e| {
            MvxExactError::InvalidPayload(format!("signature {}: {e}", payload.signature))
        })?;
        Ok(MvxTransaction {
            nonce: payload.nonce,
            value,
            sender: payload.sender,
            receiver: payload.receiver,
            gas_price: Some(payload.gas_price),
            gas_limit: payload.gas_limit,
            data: payload.data.as_bytes().to_vec(),
            chain_id: payload.chain_id.clone(),
            version: payload.version,
            options: 0,
            relayer: payload.relayer,
            signature,
        })
    }
}

/// Type alias for V1 payment requirements with MultiversX-specific types.
///
/// `extra` is `None` when the derived values were stripped in transit; the
/// payload builder recomputes them in that case.
pub type PaymentRequirements = v1::PaymentRequirements<MvxScheme, String, String, MvxRequirementsExtra>;

/// Type alias for V1 payment payloads with MultiversX-specific data.
///
/// The scheme stays a plain string so that a foreign scheme can be rejected
/// with a reason instead of a parse failure.
pub type PaymentPayload = v1::PaymentPayload<String, MvxExactPayload>;

/// Type alias for V1 verify requests with MultiversX-specific types.
pub type VerifyRequest = v1::VerifyRequest<PaymentPayload, PaymentRequirements>;

/// Type alias for V1 settle requests (same structure as verify requests).
pub type SettleRequest = VerifyRequest;

/// Errors specific to MultiversX payment processing.
#[derive(Debug, thiserror::Error)]
pub enum MvxExactError {
    /// The amount is zero or not an unsigned integer.
    #[error("Invalid amount: {0}, must be a positive integer")]
    InvalidAmount(String),

    /// The receiver does not look like an `erd1` address.
    #[error("Invalid receiver address: {0}")]
    InvalidReceiver(String),

    /// The token is neither EGLD nor `TICKER-hexsuffix`.
    #[error(transparent)]
    InvalidTokenIdentifier(#[from] crate::chain::MvxTokenIdentifierError),

    /// An address failed bech32 decoding.
    #[error(transparent)]
    InvalidAddress(#[from] crate::chain::MvxAddressParseError),

    /// The payload fields cannot form a transaction.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The signer capability failed.
    #[error("Signing failed: {0}")]
    Signing(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transaction factory failed.
    #[error("Transaction factory failed: {0}")]
    TransactionFactory(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The network provider failed.
    #[error("Provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Building the signing form failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
