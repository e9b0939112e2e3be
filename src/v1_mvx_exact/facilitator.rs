//! Facilitator-side payment verification and settlement for the V1
//! MultiversX scheme.
//!
//! The facilitator:
//!
//! 1. **Verify**: checks that the signed fields target the requirement
//!    (network, receiver or self-transfer shape, amount, data field,
//!    relayer, validity window and a present signature)
//! 2. **Settle**: re-verifies, broadcasts through an [`MvxTransactionSource`],
//!    reads the transaction back and checks it with
//!    [`verify_transaction_content`]

use std::collections::HashMap;

use x402_types::proto;
use x402_types::proto::{PaymentVerificationError, v1};
use x402_types::scheme::{
    X402SchemeFacilitator, X402SchemeFacilitatorBuilder, X402SchemeFacilitatorError,
};
use x402_types::timestamp::UnixTimestamp;

use crate::V1MvxExact;
use crate::chain::{
    MvxAddress, MvxAddressParseError, MvxTokenIdentifier, MvxTransaction, MvxTransactionSource,
    encode_multi_transfer,
};
use crate::v1_mvx_exact::types::{self, MvxExactError, MvxScheme};
use crate::v1_mvx_exact::verify_transaction_content;

impl<P> X402SchemeFacilitatorBuilder<P> for V1MvxExact
where
    P: MvxTransactionSource + 'static,
{
    fn build(
        &self,
        provider: P,
        _config: Option<serde_json::Value>,
    ) -> Result<Box<dyn X402SchemeFacilitator>, Box<dyn std::error::Error>> {
        Ok(Box::new(V1MvxExactFacilitator::new(self.clone(), provider)))
    }
}

/// Facilitator for V1 MultiversX payments.
pub struct V1MvxExactFacilitator<P> {
    scheme: V1MvxExact,
    provider: P,
}

impl<P> V1MvxExactFacilitator<P> {
    pub fn new(scheme: V1MvxExact, provider: P) -> Self {
        Self { scheme, provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: MvxTransactionSource> V1MvxExactFacilitator<P> {
    /// Checks a signed payload against `requirements` without touching the
    /// network.
    ///
    /// Returns an invalid response carrying the reason on the first failed
    /// check; the payer is the payload sender.
    pub fn verify_payment(
        &self,
        payload: &types::PaymentPayload,
        requirements: &types::PaymentRequirements,
    ) -> v1::VerifyResponse {
        let payer = payload.payload.sender.to_string();
        match check_payment(&self.scheme, payload, requirements) {
            Ok(()) => v1::VerifyResponse::valid(payer),
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(payer = %payer, reason = %reason, "MultiversX payment rejected");
                v1::VerifyResponse::invalid(Some(payer), reason.to_string())
            }
        }
    }

    /// Verifies, broadcasts and confirms a payment.
    ///
    /// A payload that fails verification, or a transaction whose observed
    /// content does not match the requirement, yields
    /// [`v1::SettleResponse::Error`]. No retries are made.
    ///
    /// # Errors
    ///
    /// [`MvxExactError::Provider`] when the provider fails, and
    /// [`MvxExactError::InvalidPayload`] when the payload fields cannot form
    /// a transaction.
    pub async fn settle_payment(
        &self,
        payload: &types::PaymentPayload,
        requirements: &types::PaymentRequirements,
    ) -> Result<v1::SettleResponse, MvxExactError> {
        let network = self.scheme.network();
        if let Err(reason) = check_payment(&self.scheme, payload, requirements) {
            return Ok(v1::SettleResponse::Error {
                reason: reason.to_string(),
                network,
            });
        }

        let transaction = MvxTransaction::try_from(&payload.payload)?;
        let hash = self
            .provider
            .send_transaction(&transaction)
            .await
            .map_err(|e| MvxExactError::Provider(Box::new(e)))?;
        let observed = self
            .provider
            .get_transaction(&hash)
            .await
            .map_err(|e| MvxExactError::Provider(Box::new(e)))?;

        if !verify_transaction_content(&observed, requirements) {
            #[cfg(feature = "tracing")]
            tracing::warn!(hash = %hash, "Broadcast MultiversX transaction does not settle the payment");
            return Ok(v1::SettleResponse::Error {
                reason: format!("transaction {hash} does not match the payment requirements"),
                network,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::info!(hash = %hash, network = %network, "MultiversX payment settled");

        Ok(v1::SettleResponse::Success {
            payer: payload.payload.sender.to_string(),
            transaction: hash,
            network,
        })
    }
}

#[async_trait::async_trait]
impl<P: MvxTransactionSource> X402SchemeFacilitator for V1MvxExactFacilitator<P> {
    async fn verify(
        &self,
        request: &proto::VerifyRequest,
    ) -> Result<proto::VerifyResponse, X402SchemeFacilitatorError> {
        let request = types::VerifyRequest::from_proto(request.clone())?;
        let response =
            self.verify_payment(&request.payment_payload, &request.payment_requirements);
        Ok(response.into())
    }

    async fn settle(
        &self,
        request: &proto::SettleRequest,
    ) -> Result<proto::SettleResponse, X402SchemeFacilitatorError> {
        let request = types::SettleRequest::from_proto(request.clone())?;
        let response = self
            .settle_payment(&request.payment_payload, &request.payment_requirements)
            .await?;
        Ok(response.into())
    }

    async fn supported(&self) -> Result<proto::SupportedResponse, X402SchemeFacilitatorError> {
        let kinds = vec![proto::SupportedPaymentKind {
            x402_version: v1::X402Version1.into(),
            scheme: MvxScheme.to_string(),
            network: self.scheme.network(),
            extra: None,
        }];
        let mut signers = HashMap::with_capacity(1);
        signers.insert(
            self.scheme.chain_reference().as_chain_id(),
            self.provider.signer_addresses(),
        );
        Ok(proto::SupportedResponse {
            kinds,
            extensions: Vec::new(),
            signers,
        })
    }
}

/// Runs the offline checks shared by verify and settle.
fn check_payment(
    scheme: &V1MvxExact,
    payload: &types::PaymentPayload,
    requirements: &types::PaymentRequirements,
) -> Result<(), PaymentVerificationError> {
    if payload.scheme != MvxScheme.as_ref() {
        return Err(PaymentVerificationError::UnsupportedScheme);
    }
    let network = scheme.network();
    if payload.network != network || requirements.network != network {
        return Err(PaymentVerificationError::ChainIdMismatch);
    }

    let fields = &payload.payload;
    if fields.chain_id != scheme.chain_reference().inner() {
        return Err(PaymentVerificationError::ChainIdMismatch);
    }

    let pay_to: MvxAddress = requirements
        .pay_to
        .parse()
        .map_err(|e: MvxAddressParseError| PaymentVerificationError::InvalidFormat(e.to_string()))?;
    let token: MvxTokenIdentifier = requirements
        .asset
        .parse()
        .map_err(|_| PaymentVerificationError::AssetMismatch)?;
    let amount: u128 = requirements
        .max_amount_required
        .parse()
        .map_err(|_| PaymentVerificationError::InvalidPaymentAmount)?;

    let expected_data = match &requirements.extra {
        Some(extra) => extra.data_payload.clone(),
        None => encode_multi_transfer(&token, amount, &pay_to),
    };
    if token.is_native() {
        if fields.receiver != pay_to {
            return Err(PaymentVerificationError::RecipientMismatch);
        }
        if fields.value != amount.to_string() {
            return Err(PaymentVerificationError::InvalidPaymentAmount);
        }
    } else {
        if fields.receiver != fields.sender && fields.receiver != pay_to {
            return Err(PaymentVerificationError::RecipientMismatch);
        }
        if fields.value != "0" {
            return Err(PaymentVerificationError::InvalidPaymentAmount);
        }
    }
    if fields.data != expected_data {
        return Err(PaymentVerificationError::InvalidFormat(format!(
            "data field {} does not match {expected_data}",
            fields.data
        )));
    }

    let required_relayer = requirements.extra.as_ref().and_then(|extra| extra.relayer);
    if required_relayer.is_some() && fields.relayer != required_relayer {
        return Err(PaymentVerificationError::InvalidFormat(
            "relayer does not match the payment requirements".to_string(),
        ));
    }

    if fields.signature.is_empty() || hex::decode(&fields.signature).is_err() {
        return Err(PaymentVerificationError::InvalidSignature(format!(
            "invalid signature {}",
            fields.signature
        )));
    }

    let now = UnixTimestamp::now();
    if fields.valid_before <= now {
        return Err(PaymentVerificationError::Expired);
    }
    if fields.valid_after > now {
        return Err(PaymentVerificationError::Early);
    }
    Ok(())
}

impl From<MvxExactError> for X402SchemeFacilitatorError {
    fn from(value: MvxExactError) -> Self {
        match value {
            MvxExactError::InvalidPayload(msg) => X402SchemeFacilitatorError::PaymentVerification(
                PaymentVerificationError::InvalidFormat(msg),
            ),
            MvxExactError::InvalidAddress(e) => X402SchemeFacilitatorError::PaymentVerification(
                PaymentVerificationError::InvalidFormat(e.to_string()),
            ),
            other => X402SchemeFacilitatorError::OnchainFailure(other.to_string()),
        }
    }
}
