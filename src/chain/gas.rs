//! Gas budget for x402 MultiversX transfers.

use super::{EXECUTION_GAS_BUFFER, MvxProtocolConfig, MvxTokenIdentifier};

/// Computes the gas limit for a transfer carrying `data` and moving `token`.
///
/// `base + per_byte * len(data) + multi_transfer + relayed`, plus
/// [`EXECUTION_GAS_BUFFER`] whenever the data field is non-empty or the
/// token is an ESDT. The result grows strictly with the data length and is
/// positive for any configuration accepted by
/// [`MvxProtocolConfig::validate`].
pub fn calculate_gas_limit(
    config: &MvxProtocolConfig,
    data: &str,
    token: &MvxTokenIdentifier,
) -> u64 {
    let data_len = data.len() as u64;
    let mut gas = config
        .gas_base_cost
        .saturating_add(config.gas_per_byte.saturating_mul(data_len))
        .saturating_add(config.gas_multi_transfer_cost)
        .saturating_add(config.gas_relayed_cost);
    if !token.is_native() || !data.is_empty() {
        gas = gas.saturating_add(EXECUTION_GAS_BUFFER);
    }
    gas
}

/// Gas limit of a plain move-balance transaction: base plus data bytes.
pub fn move_balance_gas_limit(config: &MvxProtocolConfig, data: &[u8]) -> u64 {
    config
        .gas_base_cost
        .saturating_add(config.gas_per_byte.saturating_mul(data.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> MvxTokenIdentifier {
        "USDC-c76f1f".parse().unwrap()
    }

    #[test]
    fn test_egld_no_data_floor() {
        let config = MvxProtocolConfig::default();
        let gas = calculate_gas_limit(&config, "", &MvxTokenIdentifier::Egld);
        assert_eq!(
            gas,
            config.gas_base_cost + config.gas_multi_transfer_cost + config.gas_relayed_cost
        );
        assert_eq!(gas, 300_000);
    }

    #[test]
    fn test_egld_with_data_adds_buffer() {
        let config = MvxProtocolConfig::default();
        let data = "x402-payment-id-123";
        let gas = calculate_gas_limit(&config, data, &MvxTokenIdentifier::Egld);
        assert_eq!(
            gas,
            50_000 + 1_500 * data.len() as u64 + 200_000 + 50_000 + 10_000_000
        );
    }

    #[test]
    fn test_esdt_always_adds_buffer() {
        let config = MvxProtocolConfig::default();
        let data = "MultiESDTNFTTransfer@abc@01@def@00@ff";
        let gas = calculate_gas_limit(&config, data, &usdc());
        assert_eq!(
            gas,
            50_000 + 1_500 * data.len() as u64 + 200_000 + 50_000 + 10_000_000
        );
        assert_eq!(
            calculate_gas_limit(&config, "", &usdc()),
            300_000 + EXECUTION_GAS_BUFFER
        );
    }

    #[test]
    fn test_strictly_monotonic_in_data_length() {
        let config = MvxProtocolConfig::default();
        for token in [MvxTokenIdentifier::Egld, usdc()] {
            let mut previous = calculate_gas_limit(&config, "", &token);
            for len in 1..64 {
                let gas = calculate_gas_limit(&config, &"a".repeat(len), &token);
                assert!(gas > previous, "len {len}");
                previous = gas;
            }
        }
    }

    #[test]
    fn test_positive_with_minimal_config() {
        let config = MvxProtocolConfig {
            gas_base_cost: 1,
            gas_per_byte: 0,
            gas_multi_transfer_cost: 0,
            gas_relayed_cost: 0,
            ..MvxProtocolConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(calculate_gas_limit(&config, "", &MvxTokenIdentifier::Egld), 1);

        let zero = MvxProtocolConfig {
            gas_base_cost: 0,
            ..config
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_counts_utf8_bytes() {
        let config = MvxProtocolConfig::default();
        let ascii = calculate_gas_limit(&config, "ab", &MvxTokenIdentifier::Egld);
        let wide = calculate_gas_limit(&config, "é", &MvxTokenIdentifier::Egld);
        assert_eq!(ascii, wide);
    }

    #[test]
    fn test_move_balance() {
        let config = MvxProtocolConfig::default();
        assert_eq!(move_balance_gas_limit(&config, b""), 50_000);
        assert_eq!(move_balance_gas_limit(&config, b"memo"), 56_000);
    }
}
