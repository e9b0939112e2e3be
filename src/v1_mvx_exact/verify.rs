//! Settlement check of an observed MultiversX transaction.

use crate::chain::{EGLD_TOKEN_IDENTIFIER, ObservedTransaction, decode_transaction_data};
use crate::v1_mvx_exact::PaymentRequirements;

/// Returns `true` when `observed` discharges `requirements`.
///
/// All of the following must hold, checked in this order:
///
/// - **receiver**: for EGLD, the observed receiver is the payee. For ESDT
///   tokens it is either the payee or the sender itself, the latter being
///   the multi-transfer shape where the data field names the destination;
/// - **data**: the decoded data field equals the requirement's stored data
///   field (empty when the requirement carries no extra);
/// - **status**: the provider reports `success`.
///
/// A `false` result is a normal outcome, for instance a transaction that is
/// still pending.
pub fn verify_transaction_content(
    observed: &ObservedTransaction,
    requirements: &PaymentRequirements,
) -> bool {
    let is_native = requirements.asset == EGLD_TOKEN_IDENTIFIER;
    let receiver_matches = if is_native {
        observed.receiver == requirements.pay_to
    } else {
        // TODO: a self-transfer cannot be told apart from an unrelated one
        // with the same data until the relayer is pinned in the requirement.
        observed.receiver == observed.sender || observed.receiver == requirements.pay_to
    };
    if !receiver_matches {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            receiver = %observed.receiver,
            pay_to = %requirements.pay_to,
            "Observed transaction receiver does not match"
        );
        return false;
    }

    let expected_data = requirements
        .extra
        .as_ref()
        .map(|extra| extra.data_payload.as_str())
        .unwrap_or_default();
    let data = decode_transaction_data(observed.data.as_deref());
    if data != expected_data {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            data = %data,
            expected = %expected_data,
            "Observed transaction data does not match"
        );
        return false;
    }

    if !observed.is_successful() {
        #[cfg(feature = "tracing")]
        tracing::warn!(status = ?observed.status, "Observed transaction is not successful");
        return false;
    }
    true
}
