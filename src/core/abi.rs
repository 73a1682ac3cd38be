//! Minimal ABI encoding for ERC-20 calldata.

use crate::core::errors::{Result, SignerError};
use crate::crypto::hash::keccak256;

/// `transfer(address,uint256)`
pub const ERC20_TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// 4-byte function selector: keccak256(signature)[..4]
pub fn selector_from_signature(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Left-pad a 20-byte address into a 32-byte ABI word. Accepts `0x`-prefixed or bare hex.
pub fn abi_word_address(addr_hex: &str) -> Result<[u8; 32]> {
    let addr = addr_hex.strip_prefix("0x").unwrap_or(addr_hex);
    if addr.len() != 40 {
        return Err(SignerError::invalid_input(format!(
            "ABI address must be 20 bytes of hex: {}",
            addr_hex
        )));
    }
    let bytes = hex::decode(addr).map_err(|e| SignerError::invalid_input(format!("ABI address hex: {}", e)))?;
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(&bytes);
    Ok(out)
}

/// Big-endian uint256 word. Values above `u128::MAX` are not needed by any caller.
pub fn abi_word_uint256(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// selector ‖ word ‖ word ...
pub fn abi_pack(selector: [u8; 4], words: &[[u8; 32]]) -> Vec<u8> {
    let mut calldata = selector.to_vec();
    calldata.extend(words.iter().flatten());
    calldata
}

/// `transfer(to, amount)` calldata.
pub fn erc20_transfer_calldata(to: &str, amount: u128) -> Result<Vec<u8>> {
    Ok(abi_pack(
        selector_from_signature(ERC20_TRANSFER_SIGNATURE),
        &[abi_word_address(to)?, abi_word_uint256(amount)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_signature() {
        // transfer(address,uint256) -> a9059cbb
        let sel = selector_from_signature(ERC20_TRANSFER_SIGNATURE);
        assert_eq!(sel, [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_abi_word_address_padding() {
        let word = abi_word_address("0x1111111111111111111111111111111111111111").unwrap();
        assert!(word[..12].iter().all(|&b| b == 0));
        assert!(word[12..].iter().all(|&b| b == 0x11));
        let word2 = abi_word_address("1111111111111111111111111111111111111111").unwrap();
        assert_eq!(word, word2);
        assert!(abi_word_address("0x1234").is_err());
        assert!(abi_word_address("0xzz11111111111111111111111111111111111111").is_err());
    }

    #[test]
    fn test_erc20_transfer_calldata() {
        let data = erc20_transfer_calldata("0x2222222222222222222222222222222222222222", 1000).unwrap();
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(hex::encode(&data[..4]), "a9059cbb");
        assert_eq!(&data[16..36], &[0x22u8; 20]);
        assert_eq!(&data[66..68], &[0x03, 0xe8]);
    }
}
