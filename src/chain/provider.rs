//! Network-facing view of MultiversX transactions.
//!
//! [`ObservedTransaction`] is what a network provider reports back for a
//! broadcast transaction. With the `facilitator` feature, the
//! [`MvxTransactionSource`] trait describes the provider the facilitator
//! submits through and reads from. This crate ships no provider; callers
//! wrap their own gateway or API client.

use serde::{Deserialize, Serialize};

/// Status string a provider reports for an executed, successful transaction.
pub const SUCCESS_STATUS: &str = "success";

/// Transaction fields as reported by a network provider.
///
/// `data` may be raw text or base64, depending on the provider; see
/// [`decode_transaction_data`](super::decode_transaction_data).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedTransaction {
    pub receiver: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer: Option<String>,
}

impl ObservedTransaction {
    /// Returns `true` when the provider reports the success marker.
    pub fn is_successful(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }
}

#[cfg(feature = "facilitator")]
pub use source::MvxTransactionSource;

#[cfg(feature = "facilitator")]
mod source {
    use async_trait::async_trait;

    use super::ObservedTransaction;
    use crate::chain::MvxTransaction;

    /// Provider used by the facilitator to broadcast and look up transactions.
    ///
    /// Implementations own retries, timeouts and cancellation.
    #[async_trait]
    pub trait MvxTransactionSource: Send + Sync {
        /// Error produced by this provider.
        type Error: std::error::Error + Send + Sync + 'static;

        /// Broadcasts a signed transaction and returns its hash.
        async fn send_transaction(&self, transaction: &MvxTransaction) -> Result<String, Self::Error>;

        /// Fetches the transaction with the given hash.
        async fn get_transaction(&self, hash: &str) -> Result<ObservedTransaction, Self::Error>;

        /// Relayer accounts this provider pays fees from, as bech32 strings.
        fn signer_addresses(&self) -> Vec<String> {
            Vec::new()
        }
    }
}
