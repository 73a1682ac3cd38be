//! Cosmos bech32 account addresses.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};

use crate::core::errors::{Result, SignerError};
use crate::crypto::hash160;

/// `prefix1…` over RIPEMD160(SHA256(compressed_pubkey)).
pub fn encode(public_key: &[u8], prefix: &str) -> Result<String> {
    if public_key.len() != 33 {
        return Err(SignerError::encoding(format!(
            "cosmos needs a 33-byte compressed public key, got {} bytes",
            public_key.len()
        )));
    }
    encode_hash(&hash160(public_key), prefix)
}

pub fn encode_hash(hash: &[u8; 20], prefix: &str) -> Result<String> {
    let hrp = Hrp::parse(prefix).map_err(|e| SignerError::encoding(format!("invalid bech32 prefix {}: {}", prefix, e)))?;
    bech32::encode::<Bech32>(hrp, hash).map_err(|e| SignerError::encoding(format!("bech32 encoding failed: {}", e)))
}

/// Strict bech32 (not bech32m) decode; prefix must match and payload must be 20 bytes.
pub fn decode(address: &str, prefix: &str) -> Result<[u8; 20]> {
    let checked = CheckedHrpstring::new::<Bech32>(address)
        .map_err(|e| SignerError::encoding(format!("invalid bech32 address {}: {}", address, e)))?;
    if checked.hrp().as_str() != prefix {
        return Err(SignerError::encoding(format!(
            "address prefix {} does not match {}",
            checked.hrp(),
            prefix
        )));
    }
    let data: Vec<u8> = checked.byte_iter().collect();
    if data.len() != 20 {
        return Err(SignerError::encoding(format!(
            "cosmos address payload must be 20 bytes, got {}",
            data.len()
        )));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&data);
    Ok(out)
}

pub fn validate(address: &str, prefix: &str) -> bool {
    decode(address, prefix).is_ok()
}
