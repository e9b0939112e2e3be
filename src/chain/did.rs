//! `did:pkh` identifiers for MultiversX accounts.
//!
//! A MultiversX account is named as `did:pkh:mvx:<chain_reference>:<address>`.

use super::{MVX_NAMESPACE, MvxChainReference};

/// Returns the address named by a `did:pkh:mvx:<chain>:<address>` identifier.
///
/// The parser is strict: the method must be `pkh`, the namespace must be
/// `mvx`, and all five segments must be present. The address segment is
/// returned as-is and is not checksum-validated.
///
/// # Example
///
/// ```
/// use x402_chain_mvx::chain::resolve_did_to_address;
///
/// let address = resolve_did_to_address("did:pkh:mvx:1:erd1alice").unwrap();
/// assert_eq!(address, "erd1alice");
/// assert!(resolve_did_to_address("did:key:z123").is_err());
/// ```
pub fn resolve_did_to_address(did: &str) -> Result<&str, MvxDidError> {
    let parts: Vec<&str> = did.split(':').collect();
    match parts.as_slice() {
        ["did", "pkh", namespace, _chain, address, ..]
            if *namespace == MVX_NAMESPACE && !address.is_empty() =>
        {
            Ok(*address)
        }
        _ => Err(MvxDidError(did.to_string())),
    }
}

/// Builds the `did:pkh` identifier for an address on the given chain.
pub fn address_to_did(chain_reference: &MvxChainReference, address: &str) -> String {
    format!("did:pkh:{MVX_NAMESPACE}:{chain_reference}:{address}")
}

/// Error returned for identifiers that do not name a MultiversX account.
#[derive(Debug, thiserror::Error)]
#[error("Invalid MultiversX DID: {0}")]
pub struct MvxDidError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

    #[test]
    fn test_resolve_devnet() {
        let did = format!("did:pkh:mvx:D:{ADDRESS}");
        assert_eq!(resolve_did_to_address(&did).unwrap(), ADDRESS);
    }

    #[test]
    fn test_resolve_inverts_construction() {
        for chain in [
            MvxChainReference::mainnet(),
            MvxChainReference::devnet(),
            MvxChainReference::testnet(),
        ] {
            let did = address_to_did(&chain, ADDRESS);
            assert_eq!(resolve_did_to_address(&did).unwrap(), ADDRESS);
        }
    }

    #[test]
    fn test_wrong_namespace() {
        assert!(resolve_did_to_address("did:pkh:eth:1:0x1234").is_err());
    }

    #[test]
    fn test_too_few_parts() {
        assert!(resolve_did_to_address("did:pkh:mvx").is_err());
        assert!(resolve_did_to_address("did:pkh:mvx:1").is_err());
    }

    #[test]
    fn test_wrong_method() {
        assert!(resolve_did_to_address("did:web:mvx:D:erd1abc").is_err());
    }

    #[test]
    fn test_error_carries_input() {
        let err = resolve_did_to_address("did:key:z123").unwrap_err();
        assert!(err.to_string().contains("did:key:z123"));
    }
}
