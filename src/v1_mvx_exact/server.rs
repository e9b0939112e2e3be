//! Server-side payment requirements for the V1 MultiversX scheme.
//!
//! This module provides functionality for servers to create the
//! requirements a client signs a MultiversX transfer against.
//!
//! # Example
//!
//! ```ignore
//! use x402_chain_mvx::V1MvxExact;
//!
//! let requirements = scheme.payment_requirements(
//!     100,
//!     "USDC-c76f1f",
//!     "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx",
//!     "https://api.example.com/report",
//!     "Monthly report",
//!     Some(300),
//! )?;
//! ```

use crate::V1MvxExact;
use crate::chain::{MvxAddress, MvxTokenIdentifier, has_address_shape};
use crate::v1_mvx_exact::{MvxExactError, MvxScheme, PaymentRequirements};

/// MIME type advertised for paid resources.
pub const DEFAULT_MIME_TYPE: &str = "application/json";

impl V1MvxExact {
    /// Creates V1 payment requirements for `amount` atomic units of `token`
    /// paid to `receiver`.
    ///
    /// Inputs are checked in order and the first failure is returned: the
    /// amount must be positive, the receiver must look like an `erd1`
    /// address, and the token must be `EGLD` or `TICKER-hexsuffix`. The
    /// derived data field, gas limit and transfer method are stored in the
    /// typed extra so the client does not have to recompute them.
    ///
    /// `timeout` defaults to the configured value and is raised to the
    /// configured minimum.
    ///
    /// # Errors
    ///
    /// - [`MvxExactError::InvalidAmount`] for a zero amount
    /// - [`MvxExactError::InvalidReceiver`] for a malformed receiver
    /// - [`MvxExactError::InvalidTokenIdentifier`] for a malformed token
    /// - [`MvxExactError::InvalidAddress`] when the receiver has the right
    ///   shape but is not valid bech32
    pub fn payment_requirements(
        &self,
        amount: u128,
        token: &str,
        receiver: &str,
        resource: &str,
        description: &str,
        timeout: Option<u64>,
    ) -> Result<PaymentRequirements, MvxExactError> {
        if amount == 0 {
            return Err(MvxExactError::InvalidAmount(amount.to_string()));
        }
        if !has_address_shape(receiver) {
            return Err(MvxExactError::InvalidReceiver(receiver.to_string()));
        }
        let token: MvxTokenIdentifier = token.parse()?;
        let pay_to: MvxAddress = receiver.parse()?;

        let extra = self.enhance_payment_requirements(&token, amount, &pay_to);
        let max_timeout_seconds = self.config().resolve_timeout(timeout);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            network = %self.network(),
            token = %token,
            amount = %amount,
            gas_limit = extra.gas_limit,
            "Built MultiversX payment requirements"
        );

        Ok(PaymentRequirements {
            scheme: MvxScheme,
            network: self.network(),
            max_amount_required: amount.to_string(),
            resource: resource.to_string(),
            description: description.to_string(),
            mime_type: Some(DEFAULT_MIME_TYPE.to_string()),
            output_schema: None,
            pay_to: pay_to.to_string(),
            max_timeout_seconds,
            asset: token.to_string(),
            extra: Some(extra),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MvxChainReference, MvxProtocolConfig};
    use crate::v1_mvx_exact::TransferMethod;

    const BOB: &str = "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx";

    fn scheme() -> V1MvxExact {
        V1MvxExact::new(MvxChainReference::devnet(), MvxProtocolConfig::default())
    }

    #[test]
    fn test_token_requirements() {
        let req = scheme()
            .payment_requirements(100, "USDC-123", BOB, "/r", "desc", None)
            .unwrap();
        assert_eq!(req.network, "mvx:D");
        assert_eq!(req.max_amount_required, "100");
        assert_eq!(req.asset, "USDC-123");
        assert_eq!(req.pay_to, BOB);
        assert_eq!(req.max_timeout_seconds, 600);
        assert_eq!(req.mime_type.as_deref(), Some("application/json"));
        let extra = req.extra.unwrap();
        assert_eq!(extra.asset_transfer_method, TransferMethod::Token);
        assert!(extra.data_payload.contains(&hex::encode("USDC-123")));
        assert!(extra.data_payload.ends_with("@64"));
    }

    #[test]
    fn test_native_requirements() {
        let req = scheme()
            .payment_requirements(10u128.pow(18), "EGLD", BOB, "/r", "desc", Some(120))
            .unwrap();
        assert_eq!(req.max_timeout_seconds, 120);
        let extra = req.extra.unwrap();
        assert_eq!(extra.asset_transfer_method, TransferMethod::Direct);
        assert_eq!(extra.data_payload, "");
        assert_eq!(extra.gas_limit, 300_000);
    }

    #[test]
    fn test_timeout_raised_to_minimum() {
        let req = scheme()
            .payment_requirements(1, "EGLD", BOB, "/r", "desc", Some(5))
            .unwrap();
        assert_eq!(req.max_timeout_seconds, 60);
    }

    #[test]
    fn test_validation_order() {
        let scheme = scheme();
        // Amount is checked before everything else.
        let err = scheme
            .payment_requirements(0, "bad", "bad", "/r", "d", None)
            .unwrap_err();
        assert!(matches!(err, MvxExactError::InvalidAmount(_)));

        let err = scheme
            .payment_requirements(1, "bad", "erd1short", "/r", "d", None)
            .unwrap_err();
        assert!(matches!(err, MvxExactError::InvalidReceiver(ref r) if r == "erd1short"));

        let err = scheme
            .payment_requirements(1, "usdc", BOB, "/r", "d", None)
            .unwrap_err();
        assert!(matches!(err, MvxExactError::InvalidTokenIdentifier(_)));
        assert!(err.to_string().contains("usdc"));
    }

    #[test]
    fn test_well_shaped_but_invalid_bech32_receiver() {
        let receiver = format!("erd1{}", "a".repeat(58));
        let err = scheme()
            .payment_requirements(1, "EGLD", &receiver, "/r", "d", None)
            .unwrap_err();
        assert!(matches!(err, MvxExactError::InvalidAddress(_)));
    }

    #[test]
    fn test_requirements_wire_format() {
        let req = scheme()
            .payment_requirements(100, "USDC-c76f1f", BOB, "/r", "desc", None)
            .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["scheme"], "mvx");
        assert_eq!(json["maxAmountRequired"], "100");
        assert_eq!(json["payTo"], BOB);
        assert_eq!(json["extra"]["assetTransferMethod"], "token");
        let back: PaymentRequirements = serde_json::from_value(json).unwrap();
        assert_eq!(back.extra, req.extra);
    }
}
