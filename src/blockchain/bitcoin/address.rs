//! Bitcoin address生成和validate
//!
//! 支持四种单签address类型：
//! - Legacy (P2PKH): 1xxx
//! - SegWit (P2WPKH): bc1qxxx
//! - Nested SegWit (P2SH-P2WPKH): 3xxx
//! - Taproot (P2TR): bc1pxxx

use std::str::FromStr;

use bitcoin::address::{Address, AddressType};
use bitcoin::secp256k1::{PublicKey as Secp256k1PublicKey, XOnlyPublicKey};
use bitcoin::{Network, PublicKey as BitcoinPublicKey, ScriptBuf};
use tracing::debug;

use crate::core::config::BitcoinAddressKind;
use crate::core::errors::{Result, SignerError};
use crate::crypto::secp;

/// Script template behind a decoded address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitcoinAddress {
    pub kind: ScriptKind,
    pub network: Network,
    pub script_pubkey: ScriptBuf,
}

fn compressed_key(public_key: &[u8]) -> Result<BitcoinPublicKey> {
    if public_key.len() != 33 {
        return Err(SignerError::encoding(format!(
            "expected a 33-byte compressed public key, got {} bytes",
            public_key.len()
        )));
    }
    let pk = Secp256k1PublicKey::from_slice(public_key)
        .map_err(|e| SignerError::encoding(format!("invalid secp256k1 public key: {}", e)))?;
    Ok(BitcoinPublicKey::new(pk))
}

/// x-only internal key: 32 bytes as-is, or bytes[1..33] of a compressed key.
fn x_only_key(public_key: &[u8]) -> Result<XOnlyPublicKey> {
    let raw = match public_key.len() {
        32 => public_key,
        33 => &public_key[1..33],
        n => {
            return Err(SignerError::encoding(format!(
                "P2TR needs a 32-byte x-only or 33-byte compressed key, got {} bytes",
                n
            )))
        }
    };
    XOnlyPublicKey::from_slice(raw).map_err(|e| SignerError::encoding(format!("invalid x-only key: {}", e)))
}

/// Address object for a single-key script.
pub fn address_for(public_key: &[u8], kind: BitcoinAddressKind, network: Network) -> Result<Address> {
    let address = match kind {
        BitcoinAddressKind::P2pkh => {
            // legacy also accepts uncompressed keys
            let pk = BitcoinPublicKey::from_slice(public_key)
                .map_err(|e| SignerError::encoding(format!("invalid public key: {}", e)))?;
            Address::p2pkh(&pk, network)
        }
        BitcoinAddressKind::P2wpkh => Address::p2wpkh(&compressed_key(public_key)?, network)
            .map_err(|e| SignerError::encoding(format!("P2WPKH: {}", e)))?,
        BitcoinAddressKind::P2shP2wpkh => Address::p2shwpkh(&compressed_key(public_key)?, network)
            .map_err(|e| SignerError::encoding(format!("P2SH-P2WPKH: {}", e)))?,
        // Address::p2tr applies the BIP-341 key-path tweak itself
        BitcoinAddressKind::P2tr => Address::p2tr(secp(), x_only_key(public_key)?, None, network),
    };
    Ok(address)
}

/// from公钥生成address
pub fn encode(public_key: &[u8], kind: BitcoinAddressKind, network: Network) -> Result<String> {
    let address = address_for(public_key, kind, network)?.to_string();
    debug!("✅ {:?} address生成success: {}", kind, address);
    Ok(address)
}

/// Parse an address and require it to belong to `network`.
pub fn parse(address: &str, network: Network) -> Result<Address> {
    let unchecked = Address::from_str(address.trim())
        .map_err(|e| SignerError::encoding(format!("invalid bitcoin address {}: {}", address, e)))?;
    unchecked.require_network(network).map_err(|_| {
        SignerError::invalid_input(format!("address {} is not valid for network {}", address, network))
    })
}

pub fn decode(address: &str, network: Network) -> Result<DecodedBitcoinAddress> {
    let parsed = parse(address, network)?;
    let kind = match parsed.address_type() {
        Some(AddressType::P2pkh) => ScriptKind::P2pkh,
        Some(AddressType::P2sh) => ScriptKind::P2sh,
        Some(AddressType::P2wpkh) => ScriptKind::P2wpkh,
        Some(AddressType::P2wsh) => ScriptKind::P2wsh,
        Some(AddressType::P2tr) => ScriptKind::P2tr,
        _ => {
            return Err(SignerError::encoding(format!(
                "unsupported address type: {}",
                address
            )))
        }
    };
    Ok(DecodedBitcoinAddress {
        kind,
        network,
        script_pubkey: parsed.script_pubkey(),
    })
}

/// validate Bitcoin address格式
pub fn validate(address: &str, network: Network) -> bool {
    decode(address, network).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const PK0: &str = "030e93482fd0037d589b08c36bb22afc041338ba444f9f9d7ba129348f9be731c1";

    #[test_case(BitcoinAddressKind::P2pkh, Network::Bitcoin, "1H7AcqzvVQunYftUcJMxF9KUrFayEnf83T" ; "p2pkh mainnet")]
    #[test_case(BitcoinAddressKind::P2wpkh, Network::Bitcoin, "bc1qkzkgj7n4n72yhyjmpzs3a6uzy5kj3cmkad2dk7" ; "p2wpkh mainnet")]
    #[test_case(BitcoinAddressKind::P2shP2wpkh, Network::Bitcoin, "35iXFVdZb5qxeqxgkZHBaS3KjaP89e79kP" ; "p2sh-p2wpkh mainnet")]
    #[test_case(BitcoinAddressKind::P2tr, Network::Bitcoin, "bc1p84qnytcfe8ga0jq5qe4huv2w9k7udl3qtq95x3fpammndc5hlweqch4vt6" ; "p2tr mainnet")]
    #[test_case(BitcoinAddressKind::P2pkh, Network::Testnet, "mwd7uu5uJSM3KnN6KsLL54XoiFBg4JYX7o" ; "p2pkh testnet")]
    #[test_case(BitcoinAddressKind::P2wpkh, Network::Testnet, "tb1qkzkgj7n4n72yhyjmpzs3a6uzy5kj3cmkht37dd" ; "p2wpkh testnet")]
    fn test_known_addresses(kind: BitcoinAddressKind, network: Network, expected: &str) {
        let pk = hex::decode(PK0).unwrap();
        assert_eq!(encode(&pk, kind, network).unwrap(), expected);
        assert!(validate(expected, network));
    }

    #[test]
    fn test_p2tr_accepts_x_only_key() {
        let pk = hex::decode(PK0).unwrap();
        assert_eq!(
            encode(&pk[1..], BitcoinAddressKind::P2tr, Network::Bitcoin).unwrap(),
            encode(&pk, BitcoinAddressKind::P2tr, Network::Bitcoin).unwrap()
        );
    }

    #[test]
    fn test_segwit_rejects_wrong_length() {
        let pk = hex::decode(PK0).unwrap();
        let err = encode(&pk[1..], BitcoinAddressKind::P2wpkh, Network::Bitcoin).unwrap_err();
        assert!(matches!(err, SignerError::Encoding(_)));
    }

    #[test]
    fn test_decode_kind_and_network() {
        let decoded = decode("bc1qkzkgj7n4n72yhyjmpzs3a6uzy5kj3cmkad2dk7", Network::Bitcoin).unwrap();
        assert_eq!(decoded.kind, ScriptKind::P2wpkh);
        assert_eq!(
            hex::encode(decoded.script_pubkey.as_bytes()),
            "0014b0ac897a759f944b925b08a11eeb82252d28e376"
        );
        assert!(matches!(
            decode("bc1qkzkgj7n4n72yhyjmpzs3a6uzy5kj3cmkad2dk7", Network::Testnet),
            Err(SignerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_checksum_mismatch_is_encoding_error() {
        assert!(matches!(
            decode("1H7AcqzvVQunYftUcJMxF9KUrFayEnf83U", Network::Bitcoin),
            Err(SignerError::Encoding(_))
        ));
        assert!(!validate("bc1qkzkgj7n4n72yhyjmpzs3a6uzy5kj3cmkad2dk8", Network::Bitcoin));
    }
}
