//! Ethereum addresses: keccak256 of the uncompressed key, EIP-55 checksum casing.

use bitcoin::secp256k1::PublicKey;
use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::core::errors::{Result, SignerError};
use crate::crypto::keccak256;

/// Address bytes from a 33-byte compressed or 65-byte uncompressed key.
pub fn address_bytes(public_key: &[u8]) -> Result<[u8; 20]> {
    if public_key.len() != 33 && public_key.len() != 65 {
        return Err(SignerError::encoding(format!(
            "ethereum needs a 33 or 65 byte public key, got {} bytes",
            public_key.len()
        )));
    }
    let pk = PublicKey::from_slice(public_key)
        .map_err(|e| SignerError::encoding(format!("invalid secp256k1 public key: {}", e)))?;
    let uncompressed = pk.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Ok(out)
}

/// `0x`-prefixed EIP-55 address.
pub fn encode(public_key: &[u8]) -> Result<String> {
    Ok(checksum(&address_bytes(public_key)?))
}

pub fn checksum(bytes: &[u8; 20]) -> String {
    to_checksum(&Address::from_slice(bytes), None)
}

/// Decode a hex address; mixed-case input must carry a valid EIP-55 checksum.
pub fn decode(address: &str) -> Result<[u8; 20]> {
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| SignerError::encoding(format!("ethereum address must start with 0x: {}", address)))?;
    if body.len() != 40 {
        return Err(SignerError::encoding(format!(
            "ethereum address must be 20 bytes: {}",
            address
        )));
    }
    let raw = hex::decode(body)?;
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&raw);

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && checksum(&bytes)[2..] != *body {
        return Err(SignerError::encoding(format!("EIP-55 checksum mismatch: {}", address)));
    }
    Ok(bytes)
}

pub fn validate(address: &str) -> bool {
    decode(address).is_ok()
}
