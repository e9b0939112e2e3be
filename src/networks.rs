//! Known MultiversX networks and token deployments.

use x402_types::chain::ChainId;

use crate::chain::{EGLD_DECIMALS, MvxChainReference, MvxTokenDeployment, MvxTokenIdentifier};

/// Identifier of native USDC on MultiversX mainnet.
pub const MAINNET_USDC_IDENTIFIER: &str = "USDC-c76f1f";

/// Trait providing convenient methods for well-known MultiversX networks.
///
/// # Example
///
/// ```
/// use x402_chain_mvx::KnownNetworkMvx;
/// use x402_types::chain::ChainId;
///
/// let devnet: ChainId = ChainId::mvx_devnet();
/// assert_eq!(devnet.to_string(), "mvx:D");
/// ```
pub trait KnownNetworkMvx<A> {
    /// Returns the instance for MultiversX mainnet (mvx:1).
    fn mvx_mainnet() -> A;
    /// Returns the instance for MultiversX devnet (mvx:D).
    fn mvx_devnet() -> A;
    /// Returns the instance for MultiversX testnet (mvx:T).
    fn mvx_testnet() -> A;
}

impl KnownNetworkMvx<MvxChainReference> for MvxChainReference {
    fn mvx_mainnet() -> MvxChainReference {
        MvxChainReference::mainnet()
    }

    fn mvx_devnet() -> MvxChainReference {
        MvxChainReference::devnet()
    }

    fn mvx_testnet() -> MvxChainReference {
        MvxChainReference::testnet()
    }
}

impl KnownNetworkMvx<ChainId> for ChainId {
    fn mvx_mainnet() -> ChainId {
        MvxChainReference::mainnet().as_chain_id()
    }

    fn mvx_devnet() -> ChainId {
        MvxChainReference::devnet().as_chain_id()
    }

    fn mvx_testnet() -> ChainId {
        MvxChainReference::testnet().as_chain_id()
    }
}

/// Marker type for the native EGLD coin, available on every network.
pub struct Egld;

impl KnownNetworkMvx<MvxTokenDeployment> for Egld {
    fn mvx_mainnet() -> MvxTokenDeployment {
        MvxTokenDeployment::egld(MvxChainReference::mainnet())
    }

    fn mvx_devnet() -> MvxTokenDeployment {
        MvxTokenDeployment::egld(MvxChainReference::devnet())
    }

    fn mvx_testnet() -> MvxTokenDeployment {
        MvxTokenDeployment::egld(MvxChainReference::testnet())
    }
}

impl MvxTokenDeployment {
    /// Returns the EGLD deployment on `chain_reference`.
    pub fn egld(chain_reference: MvxChainReference) -> Self {
        MvxTokenDeployment {
            chain_reference,
            token: MvxTokenIdentifier::Egld,
            decimals: EGLD_DECIMALS,
        }
    }

    /// Returns the mainnet USDC deployment.
    pub fn mainnet_usdc() -> Self {
        MvxTokenDeployment {
            chain_reference: MvxChainReference::mainnet(),
            token: MvxTokenIdentifier::Esdt(MAINNET_USDC_IDENTIFIER.to_string()),
            decimals: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_chain_ids() {
        assert_eq!(ChainId::mvx_mainnet().to_string(), "mvx:1");
        assert_eq!(ChainId::mvx_devnet().to_string(), "mvx:D");
        assert_eq!(ChainId::mvx_testnet().to_string(), "mvx:T");
    }

    #[test]
    fn test_egld_amounts() {
        let egld = Egld::mvx_devnet();
        assert_eq!(egld.chain_reference, MvxChainReference::devnet());
        assert_eq!(egld.parse("1.0").unwrap().amount, 10u128.pow(18));
        assert_eq!(egld.parse("0.1").unwrap().amount, 10u128.pow(17));
    }

    #[test]
    fn test_mainnet_usdc() {
        let usdc = MvxTokenDeployment::mainnet_usdc();
        assert_eq!(usdc.token.as_str(), "USDC-c76f1f");
        assert_eq!(usdc.parse("2.5").unwrap().amount, 2_500_000);
        assert_eq!(usdc.amount(7).amount, 7);
    }
}
