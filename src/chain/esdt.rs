//! Data-field codec for ESDT transfers.
//!
//! MultiversX moves ESDT tokens through built-in functions invoked from the
//! transaction data field: the function name followed by `@`-separated hex
//! arguments. This module builds those strings and reads them back from the
//! shapes in which network providers report them.

use x402_types::util::Base64Bytes;

use super::{MvxAddress, MvxTokenIdentifier};

/// Built-in function moving a single fungible ESDT.
pub const ESDT_TRANSFER: &str = "ESDTTransfer";

/// Built-in function moving one or more ESDT/NFT tokens to a destination.
pub const MULTI_ESDT_NFT_TRANSFER: &str = "MultiESDTNFTTransfer";

/// Separator between the function name and its arguments.
pub const ARGUMENT_SEPARATOR: char = '@';

/// Hex-encodes an amount with the minimum number of digits, padded to an
/// even length. Zero encodes as `"00"`.
///
/// ```
/// use x402_chain_mvx::chain::encode_amount_hex;
///
/// assert_eq!(encode_amount_hex(100), "64");
/// assert_eq!(encode_amount_hex(4096), "1000");
/// assert_eq!(encode_amount_hex(256), "0100");
/// ```
pub fn encode_amount_hex(amount: u128) -> String {
    let digits = format!("{amount:x}");
    if digits.len() % 2 == 0 {
        digits
    } else {
        format!("0{digits}")
    }
}

/// Builds the `ESDTTransfer@<token>@<amount>` data field.
///
/// The native coin needs no data field and yields an empty string.
pub fn encode_single_transfer(token: &MvxTokenIdentifier, amount: u128) -> String {
    if token.is_native() {
        return String::new();
    }
    [
        ESDT_TRANSFER.to_string(),
        hex::encode(token.as_str()),
        encode_amount_hex(amount),
    ]
    .join(&ARGUMENT_SEPARATOR.to_string())
}

/// Builds the `MultiESDTNFTTransfer@<receiver>@01@<token>@00@<amount>` data field.
///
/// The transaction carrying it is sent to the sender itself; the built-in
/// function forwards exactly one token (fungible, so nonce `00`) to
/// `receiver`. The native coin yields an empty string.
pub fn encode_multi_transfer(
    token: &MvxTokenIdentifier,
    amount: u128,
    receiver: &MvxAddress,
) -> String {
    if token.is_native() {
        return String::new();
    }
    [
        MULTI_ESDT_NFT_TRANSFER.to_string(),
        receiver.to_hex(),
        "01".to_string(),
        hex::encode(token.as_str()),
        "00".to_string(),
        encode_amount_hex(amount),
    ]
    .join(&ARGUMENT_SEPARATOR.to_string())
}

/// Normalizes a data field as reported by a network provider into text.
///
/// - absent or empty input yields `""`;
/// - bytes are read as UTF-8 first;
/// - text that already starts with a transfer function name is returned
///   untouched, even if it would also parse as base64;
/// - anything else is base64-decoded when that yields UTF-8 text, and
///   returned unchanged otherwise.
///
/// This never fails.
pub fn decode_transaction_data<T: AsRef<[u8]>>(raw: Option<T>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let bytes = raw.as_ref();
    if bytes.is_empty() {
        return String::new();
    }
    let text = String::from_utf8_lossy(bytes).into_owned();
    if text.starts_with(MULTI_ESDT_NFT_TRANSFER) || text.starts_with(ESDT_TRANSFER) {
        return text;
    }
    let decoded = Base64Bytes::from(text.as_bytes()).decode();
    match decoded {
        Ok(decoded) => String::from_utf8(decoded).unwrap_or(text),
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc() -> MvxTokenIdentifier {
        "USDC-123".parse().unwrap()
    }

    #[test]
    fn test_amount_hex_even_length() {
        assert_eq!(encode_amount_hex(0), "00");
        assert_eq!(encode_amount_hex(1), "01");
        assert_eq!(encode_amount_hex(255), "ff");
        assert_eq!(encode_amount_hex(1_000_000), "0f4240");
        for amount in [1u128, 15, 16, 4095, 65_536, 10u128.pow(18), u128::MAX] {
            assert_eq!(encode_amount_hex(amount).len() % 2, 0, "amount {amount}");
        }
    }

    #[test]
    fn test_single_transfer() {
        assert_eq!(
            encode_single_transfer(&usdc(), 100),
            "ESDTTransfer@555344432d313233@64"
        );
    }

    #[test]
    fn test_native_has_no_data() {
        let receiver = MvxAddress::from_pubkey([1u8; 32]);
        assert_eq!(encode_single_transfer(&MvxTokenIdentifier::Egld, 100), "");
        assert_eq!(
            encode_multi_transfer(&MvxTokenIdentifier::Egld, 100, &receiver),
            ""
        );
    }

    #[test]
    fn test_multi_transfer() {
        let receiver = MvxAddress::from_pubkey([0xab; 32]);
        let data = encode_multi_transfer(&usdc(), 1_000_000, &receiver);
        let expected = format!(
            "MultiESDTNFTTransfer@{}@01@555344432d313233@00@0f4240",
            "ab".repeat(32)
        );
        assert_eq!(data, expected);
    }

    #[test]
    fn test_encodings_contain_token_and_amount() {
        let receiver = MvxAddress::from_pubkey([7u8; 32]);
        let token: MvxTokenIdentifier = "WEGLD-bd4d79".parse().unwrap();
        let token_hex = hex::encode("WEGLD-bd4d79");
        for amount in [1u128, 100, 4096, 123_456_789, 10u128.pow(18)] {
            let amount_hex = encode_amount_hex(amount);
            for data in [
                encode_single_transfer(&token, amount),
                encode_multi_transfer(&token, amount, &receiver),
            ] {
                assert!(data.contains(&token_hex));
                assert!(data.ends_with(&format!("@{amount_hex}")));
            }
        }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_transaction_data(Some("")), "");
        assert_eq!(decode_transaction_data(None::<&str>), "");
    }

    #[test]
    fn test_decode_passthrough_opcodes() {
        let multi = "MultiESDTNFTTransfer@abcdef@01@aabbcc@00@ff";
        assert_eq!(decode_transaction_data(Some(multi)), multi);
        let single = "ESDTTransfer@abcdef@00ff";
        assert_eq!(decode_transaction_data(Some(single)), single);
    }

    #[test]
    fn test_decode_base64() {
        let encoded = Base64Bytes::encode("x").to_string();
        assert_eq!(decode_transaction_data(Some(encoded.as_str())), "x");
        let encoded = Base64Bytes::encode("hello-payment-data").to_string();
        assert_eq!(
            decode_transaction_data(Some(encoded.as_str())),
            "hello-payment-data"
        );
    }

    #[test]
    fn test_decode_bytes_input() {
        let data: &[u8] = b"MultiESDTNFTTransfer@abc";
        assert_eq!(decode_transaction_data(Some(data)), "MultiESDTNFTTransfer@abc");
    }

    #[test]
    fn test_decode_base64_wrapped_opcode() {
        let plain = "ESDTTransfer@555344432d313233@64";
        let encoded = Base64Bytes::encode(plain).to_string();
        assert_eq!(decode_transaction_data(Some(encoded.as_str())), plain);
    }

    #[test]
    fn test_decode_invalid_base64_returns_original() {
        let data = "plain-text-not-base64!!!";
        assert_eq!(decode_transaction_data(Some(data)), data);
    }
}
