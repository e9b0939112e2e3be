//! MultiversX transaction model and the factory that builds transfers.
//!
//! [`MvxTransaction`] is the single in-memory representation used by the
//! payment flow. Transfers are produced through the [`MvxTransactionFactory`]
//! trait so callers can plug in their own builder; [`TransferTransactionsFactory`]
//! is the default implementation.

use serde::Serialize;
use x402_types::util::Base64Bytes;

use super::{
    MvxAddress, MvxChainReference, MvxProtocolConfig, MvxTokenIdentifier, calculate_gas_limit,
    encode_multi_transfer, move_balance_gas_limit,
};

/// Transaction version signed by current MultiversX wallets.
pub const TRANSACTION_VERSION: u32 = 2;

/// A MultiversX transaction under construction or ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MvxTransaction {
    /// Sender-scoped sequence number.
    pub nonce: u64,
    /// Native coin moved, in atomic units.
    pub value: u128,
    pub sender: MvxAddress,
    pub receiver: MvxAddress,
    /// Gas price; `None` until the factory or the caller sets one.
    pub gas_price: Option<u64>,
    pub gas_limit: u64,
    /// Raw data field.
    pub data: Vec<u8>,
    /// Chain reference, e.g. `1` or `D`.
    pub chain_id: String,
    pub version: u32,
    pub options: u32,
    /// Account paying the fees, for relayed transactions.
    pub relayer: Option<MvxAddress>,
    /// Sender signature over [`MvxTransaction::serialize_for_signing`].
    pub signature: Vec<u8>,
}

/// Canonical field order of the signed JSON form.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SigningForm<'a> {
    nonce: u64,
    value: String,
    receiver: String,
    sender: String,
    gas_price: u64,
    gas_limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(rename = "chainID")]
    chain_id: &'a str,
    version: u32,
    #[serde(skip_serializing_if = "is_zero")]
    options: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    relayer: Option<String>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl MvxTransaction {
    /// Returns the data field as text (lossy for non-UTF-8 bytes).
    pub fn data_as_string(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Returns the bytes a signer should sign: the compact JSON form with
    /// the data field base64-encoded and zero/absent optional fields omitted.
    ///
    /// An unset gas price is serialized as `0`.
    pub fn serialize_for_signing(&self) -> Result<Vec<u8>, serde_json::Error> {
        let form = SigningForm {
            nonce: self.nonce,
            value: self.value.to_string(),
            receiver: self.receiver.to_string(),
            sender: self.sender.to_string(),
            gas_price: self.gas_price.unwrap_or_default(),
            gas_limit: self.gas_limit,
            data: (!self.data.is_empty()).then(|| Base64Bytes::encode(&self.data).to_string()),
            chain_id: &self.chain_id,
            version: self.version,
            options: self.options,
            relayer: self.relayer.map(|relayer| relayer.to_string()),
        };
        serde_json::to_vec(&form)
    }
}

/// Builds unsigned transfer transactions.
///
/// Both operations return a transaction whose nonce, gas limit, relayer and
/// data the caller may still overwrite before signing.
pub trait MvxTransactionFactory {
    /// Error produced by this factory.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds a native coin transfer of `value` to `receiver`, carrying
    /// `data` when it is non-empty.
    fn create_native_transfer(
        &self,
        sender: &MvxAddress,
        receiver: &MvxAddress,
        value: u128,
        data: &str,
    ) -> Result<MvxTransaction, Self::Error>;

    /// Builds a transfer of exactly one `(token, amount)` pair to `receiver`.
    fn create_esdt_transfer(
        &self,
        sender: &MvxAddress,
        receiver: &MvxAddress,
        token: &MvxTokenIdentifier,
        amount: u128,
    ) -> Result<MvxTransaction, Self::Error>;
}

/// Default [`MvxTransactionFactory`].
///
/// ESDT transfers use the multi-transfer built-in function: the transaction
/// is sent to the sender itself with zero value, and the data field names
/// the real destination.
#[derive(Debug, Clone)]
pub struct TransferTransactionsFactory {
    chain_reference: MvxChainReference,
    config: MvxProtocolConfig,
}

impl TransferTransactionsFactory {
    pub fn new(chain_reference: MvxChainReference, config: MvxProtocolConfig) -> Self {
        Self {
            chain_reference,
            config,
        }
    }

    fn base_transaction(
        &self,
        sender: &MvxAddress,
        receiver: &MvxAddress,
        value: u128,
        data: Vec<u8>,
        gas_limit: u64,
    ) -> MvxTransaction {
        MvxTransaction {
            nonce: 0,
            value,
            sender: *sender,
            receiver: *receiver,
            gas_price: Some(self.config.gas_price_default),
            gas_limit,
            data,
            chain_id: self.chain_reference.inner().to_string(),
            version: TRANSACTION_VERSION,
            options: 0,
            relayer: None,
            signature: Vec::new(),
        }
    }
}

impl MvxTransactionFactory for TransferTransactionsFactory {
    type Error = MvxTransactionError;

    fn create_native_transfer(
        &self,
        sender: &MvxAddress,
        receiver: &MvxAddress,
        value: u128,
        data: &str,
    ) -> Result<MvxTransaction, Self::Error> {
        let data = data.as_bytes().to_vec();
        let gas_limit = move_balance_gas_limit(&self.config, &data);
        Ok(self.base_transaction(sender, receiver, value, data, gas_limit))
    }

    fn create_esdt_transfer(
        &self,
        sender: &MvxAddress,
        receiver: &MvxAddress,
        token: &MvxTokenIdentifier,
        amount: u128,
    ) -> Result<MvxTransaction, Self::Error> {
        if token.is_native() {
            return Err(MvxTransactionError::NativeTokenAsEsdt);
        }
        let data = encode_multi_transfer(token, amount, receiver);
        let gas_limit = calculate_gas_limit(&self.config, &data, token);
        Ok(self.base_transaction(sender, sender, 0, data.into_bytes(), gas_limit))
    }
}

/// Errors raised by [`TransferTransactionsFactory`].
#[derive(Debug, thiserror::Error)]
pub enum MvxTransactionError {
    /// `EGLD` was passed where an ESDT identifier is required.
    #[error("EGLD cannot be sent as an ESDT transfer")]
    NativeTokenAsEsdt,
}
