//! Client-side payment signing for the V1 MultiversX scheme.
//!
//! This module provides [`V1MvxExactClient`] for building and signing
//! MultiversX transfers that satisfy a set of [`PaymentRequirements`].
//!
//! # Payment Flow
//!
//! 1. Client receives 402 response with MultiversX payment requirements
//! 2. The transfer is built from the data field and gas limit carried in
//!    the requirement's extra (recomputed when the extra is missing)
//! 3. The caller's [`MvxSignerLike`] signs the transaction
//! 4. The signed fields are returned as a V1 [`PaymentPayload`]

use x402_types::proto::v1;
use x402_types::timestamp::UnixTimestamp;

use crate::chain::{
    MvxAddress, MvxTokenIdentifier, MvxTransaction, MvxTransactionFactory,
    TransferTransactionsFactory, VALIDITY_CLOCK_SKEW_SECONDS, encode_multi_transfer,
};
use crate::v1_mvx_exact::{
    MvxExactError, MvxExactPayload, MvxScheme, PaymentPayload, PaymentRequirements, TransferMethod,
    V1MvxExact,
};

/// Transaction version required for relayed transactions.
const RELAYED_TRANSACTION_VERSION: u32 = 2;

/// Signing capability supplied by the payer.
///
/// The signer owns key material and is expected to sign the canonical form
/// returned by [`MvxTransaction::serialize_for_signing`].
pub trait MvxSignerLike {
    /// Error produced by this signer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Signs `transaction` and returns the raw signature bytes.
    fn sign_transaction(&self, transaction: &MvxTransaction) -> Result<Vec<u8>, Self::Error>;
}

impl V1MvxExact {
    /// Builds and signs a payment for `requirements` from `sender` using the
    /// default [`TransferTransactionsFactory`].
    ///
    /// See [`V1MvxExact::construct_payment_payload_with`].
    pub fn construct_payment_payload<S: MvxSignerLike>(
        &self,
        requirements: &PaymentRequirements,
        signer: &S,
        sender: &str,
        nonce: u64,
    ) -> Result<PaymentPayload, MvxExactError> {
        let factory =
            TransferTransactionsFactory::new(self.chain_reference().clone(), self.config().clone());
        self.construct_payment_payload_with(&factory, requirements, signer, sender, nonce)
    }

    /// Builds and signs a payment for `requirements` with a caller-provided
    /// transaction factory.
    ///
    /// The transaction version is `2` whenever a relayer is named, and
    /// otherwise `1` for direct transfers and `2` for token transfers. The
    /// validity window starts ten minutes in the past
    /// to absorb clock skew and ends `max_timeout_seconds` from now.
    ///
    /// # Errors
    ///
    /// - [`MvxExactError::InvalidAddress`] for a malformed sender or payee
    /// - [`MvxExactError::InvalidAmount`] / [`MvxExactError::InvalidTokenIdentifier`]
    ///   for a malformed amount or asset
    /// - [`MvxExactError::TransactionFactory`] and [`MvxExactError::Signing`]
    ///   carry the collaborator's error unchanged as their source
    pub fn construct_payment_payload_with<F, S>(
        &self,
        factory: &F,
        requirements: &PaymentRequirements,
        signer: &S,
        sender: &str,
        nonce: u64,
    ) -> Result<PaymentPayload, MvxExactError>
    where
        F: MvxTransactionFactory,
        S: MvxSignerLike,
    {
        let sender: MvxAddress = sender.parse()?;
        let pay_to: MvxAddress = requirements.pay_to.parse()?;
        let token: MvxTokenIdentifier = requirements.asset.parse()?;
        let amount: u128 = requirements
            .max_amount_required
            .parse()
            .map_err(|_| MvxExactError::InvalidAmount(requirements.max_amount_required.clone()))?;

        let (data_payload, transfer_method, gas_limit, relayer) = match &requirements.extra {
            Some(extra) => (
                extra.data_payload.clone(),
                extra.asset_transfer_method,
                extra.gas_limit,
                extra.relayer,
            ),
            None => {
                let method = if token.is_native() {
                    TransferMethod::Direct
                } else {
                    TransferMethod::Token
                };
                (
                    encode_multi_transfer(&token, amount, &pay_to),
                    method,
                    self.config().gas_base_cost,
                    None,
                )
            }
        };
        let version = match relayer {
            Some(_) => RELAYED_TRANSACTION_VERSION,
            None => transfer_method.protocol_version(),
        };

        let mut transaction = if token.is_native() {
            factory.create_native_transfer(&sender, &pay_to, amount, &data_payload)
        } else {
            factory.create_esdt_transfer(&sender, &pay_to, &token, amount)
        }
        .map_err(|e| MvxExactError::TransactionFactory(Box::new(e)))?;

        transaction.nonce = nonce;
        transaction.gas_limit = gas_limit;
        transaction.version = version;
        if relayer.is_some() {
            transaction.relayer = relayer;
        }
        let gas_price = *transaction
            .gas_price
            .get_or_insert(self.config().gas_price_default);

        let now = UnixTimestamp::now();
        let valid_after =
            UnixTimestamp::from_secs(now.as_secs().saturating_sub(VALIDITY_CLOCK_SKEW_SECONDS));
        let timeout = match requirements.max_timeout_seconds {
            0 => self.config().default_timeout_seconds,
            seconds => seconds,
        };
        let valid_before = now + timeout;

        let signature = signer
            .sign_transaction(&transaction)
            .map_err(|e| MvxExactError::Signing(Box::new(e)))?;
        transaction.signature = signature;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sender = %transaction.sender,
            receiver = %transaction.receiver,
            nonce = transaction.nonce,
            version = transaction.version,
            relayed = transaction.relayer.is_some(),
            "Signed MultiversX payment"
        );

        let payload = MvxExactPayload {
            nonce: transaction.nonce,
            value: transaction.value.to_string(),
            receiver: transaction.receiver,
            sender: transaction.sender,
            gas_price,
            gas_limit: transaction.gas_limit,
            data: transaction.data_as_string(),
            chain_id: transaction.chain_id.clone(),
            version: transaction.version,
            signature: hex::encode(&transaction.signature),
            valid_after,
            valid_before,
            relayer: transaction.relayer,
        };
        Ok(v1::PaymentPayload {
            x402_version: v1::X402Version1,
            scheme: MvxScheme.to_string(),
            network: requirements.network.clone(),
            payload,
        })
    }
}

/// Client for signing V1 MultiversX payments.
///
/// # Type Parameters
///
/// - `S`: The signer type, which must implement [`MvxSignerLike`]
///
/// # Example
///
/// ```ignore
/// use x402_chain_mvx::V1MvxExactClient;
///
/// let client = V1MvxExactClient::new(scheme, signer, sender_address);
/// let payload = client.sign_payment(&requirements, nonce)?;
/// ```
#[derive(Debug)]
pub struct V1MvxExactClient<S> {
    scheme: V1MvxExact,
    signer: S,
    sender: MvxAddress,
}

impl<S> V1MvxExactClient<S> {
    /// Creates a client signing as `sender` with `signer`.
    pub fn new(scheme: V1MvxExact, signer: S, sender: MvxAddress) -> Self {
        Self {
            scheme,
            signer,
            sender,
        }
    }

    pub fn sender(&self) -> &MvxAddress {
        &self.sender
    }
}

impl<S: MvxSignerLike> V1MvxExactClient<S> {
    /// Signs a payment for `requirements` with the given account nonce.
    pub fn sign_payment(
        &self,
        requirements: &PaymentRequirements,
        nonce: u64,
    ) -> Result<PaymentPayload, MvxExactError> {
        self.scheme.construct_payment_payload(
            requirements,
            &self.signer,
            &self.sender.to_string(),
            nonce,
        )
    }
}
