//! V1 MultiversX "mvx" payment scheme implementation.
//!
//! This module implements the "mvx" payment scheme for the MultiversX
//! blockchain using the V1 x402 protocol with `mvx:<chain>` network names.
//!
//! # Payment Model
//!
//! 1. The server builds [`PaymentRequirements`] whose typed extra carries the
//!    pre-computed data field, gas limit and transfer method
//! 2. The client builds a transfer from those values, signs it with its own
//!    signer and sends the signed fields as an [`MvxExactPayload`]
//! 3. The facilitator checks the payload, broadcasts it through a network
//!    provider and verifies the observed transaction against the requirement
//!
//! EGLD moves in the transaction value. ESDT tokens use the
//! `MultiESDTNFTTransfer` built-in function: the transaction is a
//! self-transfer whose data field names the real destination, which is the
//! shape relayers submit.
//!
//! # Usage
//!
//! ```ignore
//! use x402_chain_mvx::V1MvxExact;
//! use x402_chain_mvx::chain::{MvxChainReference, MvxProtocolConfig};
//!
//! let scheme = V1MvxExact::new(MvxChainReference::devnet(), MvxProtocolConfig::default());
//! let requirements = scheme.payment_requirements(
//!     1_000_000,
//!     "USDC-c76f1f",
//!     "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx",
//!     "https://api.example.com/weather",
//!     "Weather report",
//!     None,
//! )?;
//! ```

#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
#[allow(unused_imports)]
pub use server::*;

#[cfg(feature = "facilitator")]
pub mod facilitator;
#[cfg(feature = "facilitator")]
pub use facilitator::*;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub use client::*;

pub mod types;
pub use types::*;

pub mod verify;
pub use verify::*;

use x402_types::scheme::X402SchemeId;

use crate::chain::{
    MVX_NAMESPACE, MvxAddress, MvxChainReference, MvxProtocolConfig, MvxTokenIdentifier,
    calculate_gas_limit, encode_multi_transfer,
};

/// The V1 MultiversX payment scheme.
///
/// Holds the chain it targets and the protocol configuration, built once at
/// start-up. All operations are pure functions of these two values and
/// their inputs, so one instance can serve concurrent payments.
#[derive(Debug, Clone)]
pub struct V1MvxExact {
    chain_reference: MvxChainReference,
    config: MvxProtocolConfig,
}

impl V1MvxExact {
    pub fn new(chain_reference: MvxChainReference, config: MvxProtocolConfig) -> Self {
        Self {
            chain_reference,
            config,
        }
    }

    pub fn chain_reference(&self) -> &MvxChainReference {
        &self.chain_reference
    }

    pub fn config(&self) -> &MvxProtocolConfig {
        &self.config
    }

    /// The V1 network name, `mvx:<chain>`.
    pub fn network(&self) -> String {
        self.chain_reference.as_chain_id().to_string()
    }

    /// Derives the typed extra for moving `amount` of `token` to `receiver`:
    /// transfer method, data field and gas limit.
    ///
    /// EGLD gets an empty data field; ESDT tokens get the multi-transfer
    /// encoding addressed to `receiver`.
    pub fn enhance_payment_requirements(
        &self,
        token: &MvxTokenIdentifier,
        amount: u128,
        receiver: &MvxAddress,
    ) -> MvxRequirementsExtra {
        let asset_transfer_method = if token.is_native() {
            TransferMethod::Direct
        } else {
            TransferMethod::Token
        };
        let data_payload = encode_multi_transfer(token, amount, receiver);
        let gas_limit = calculate_gas_limit(&self.config, &data_payload, token);
        MvxRequirementsExtra {
            data_payload,
            chain_id: self.chain_reference.to_string(),
            asset_transfer_method,
            gas_limit,
            relayer: None,
        }
    }
}

impl X402SchemeId for V1MvxExact {
    fn x402_version(&self) -> u8 {
        1
    }

    fn namespace(&self) -> &str {
        MVX_NAMESPACE
    }

    fn scheme(&self) -> &str {
        MvxScheme.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOB: &str = "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx";

    fn scheme() -> V1MvxExact {
        V1MvxExact::new(MvxChainReference::devnet(), MvxProtocolConfig::default())
    }

    #[test]
    fn test_scheme_identity() {
        let scheme = scheme();
        assert_eq!(scheme.x402_version(), 1);
        assert_eq!(scheme.namespace(), "mvx");
        assert_eq!(scheme.scheme(), "mvx");
        assert_eq!(scheme.id(), "v1-mvx-mvx");
        assert_eq!(scheme.network(), "mvx:D");
    }

    #[test]
    fn test_network_ignores_configured_namespace() {
        let config: MvxProtocolConfig = serde_json::from_str(r#"{"namespace": "x"}"#).unwrap();
        let scheme = V1MvxExact::new(MvxChainReference::devnet(), config);
        assert_eq!(scheme.namespace(), "mvx");
        assert_eq!(scheme.network(), "mvx:D");
        assert_eq!(
            scheme.network(),
            scheme.chain_reference().as_chain_id().to_string()
        );
    }

    #[test]
    fn test_enhance_native() {
        let extra = scheme().enhance_payment_requirements(
            &MvxTokenIdentifier::Egld,
            10u128.pow(18),
            &BOB.parse().unwrap(),
        );
        assert_eq!(extra.asset_transfer_method, TransferMethod::Direct);
        assert_eq!(extra.data_payload, "");
        assert_eq!(extra.gas_limit, 300_000);
        assert_eq!(extra.chain_id, "D");
        assert!(extra.relayer.is_none());
    }

    #[test]
    fn test_enhance_token() {
        let token: MvxTokenIdentifier = "USDC-c76f1f".parse().unwrap();
        let extra =
            scheme().enhance_payment_requirements(&token, 1_000_000, &BOB.parse().unwrap());
        assert_eq!(extra.asset_transfer_method, TransferMethod::Token);
        assert!(extra.data_payload.starts_with("MultiESDTNFTTransfer@"));
        assert!(extra.data_payload.contains(&hex::encode("USDC-c76f1f")));
        assert_eq!(
            extra.gas_limit,
            calculate_gas_limit(&MvxProtocolConfig::default(), &extra.data_payload, &token)
        );
    }
}
