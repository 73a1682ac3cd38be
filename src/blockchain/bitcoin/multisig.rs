//! m-of-n multisig redeem scripts and their P2SH / P2WSH wrappings.
//!
//! Keys stay in the order the caller supplied; the script hash, and therefore the
//! address, depends on it.

use bitcoin::address::Address;
use bitcoin::blockdata::opcodes::all::OP_CHECKMULTISIG;
use bitcoin::blockdata::script::Builder;
use bitcoin::{Network, PublicKey, ScriptBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{Result, SignerError};

/// Largest n accepted for a bare CHECKMULTISIG redeem script.
pub const MAX_MULTISIG_KEYS: usize = 15;

/// Outer script wrapping the redeem script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultisigWrap {
    P2sh,
    P2wsh,
    P2shP2wsh,
}

impl MultisigWrap {
    pub const ALL: [MultisigWrap; 3] = [MultisigWrap::P2sh, MultisigWrap::P2wsh, MultisigWrap::P2shP2wsh];

    pub fn is_segwit(&self) -> bool {
        !matches!(self, MultisigWrap::P2sh)
    }
}

/// Parsed m-of-n policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigPolicy {
    pub threshold: usize,
    pub public_keys: Vec<PublicKey>,
}

impl MultisigPolicy {
    /// Validate 1 <= m <= n <= 15 over 33-byte compressed keys.
    pub fn new(public_keys: &[Vec<u8>], threshold: usize) -> Result<Self> {
        let n = public_keys.len();
        if n == 0 || n > MAX_MULTISIG_KEYS {
            return Err(SignerError::invalid_input(format!(
                "multisig needs 1..={} public keys, got {}",
                MAX_MULTISIG_KEYS, n
            )));
        }
        if threshold == 0 || threshold > n {
            return Err(SignerError::invalid_input(format!(
                "multisig threshold must be in 1..={}, got {}",
                n, threshold
            )));
        }
        let public_keys = public_keys
            .iter()
            .map(|raw| {
                if raw.len() != 33 {
                    return Err(SignerError::encoding(format!(
                        "multisig keys must be 33-byte compressed, got {} bytes",
                        raw.len()
                    )));
                }
                PublicKey::from_slice(raw)
                    .map_err(|e| SignerError::encoding(format!("invalid multisig key: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { threshold, public_keys })
    }

    /// Hex-encoded keys, as they arrive in transaction parameters.
    pub fn from_hex(public_keys: &[String], threshold: usize) -> Result<Self> {
        let raw = public_keys
            .iter()
            .map(|h| {
                hex::decode(h.trim_start_matches("0x"))
                    .map_err(|e| SignerError::invalid_input(format!("multisig public key hex {}: {}", h, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&raw, threshold)
    }

    /// OP_m <pubkeys...> OP_n OP_CHECKMULTISIG
    pub fn redeem_script(&self) -> ScriptBuf {
        let mut builder = Builder::new().push_int(self.threshold as i64);
        for pk in &self.public_keys {
            builder = builder.push_key(pk);
        }
        builder
            .push_int(self.public_keys.len() as i64)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script()
    }

    pub fn address(&self, wrap: MultisigWrap, network: Network) -> Result<Address> {
        let redeem = self.redeem_script();
        let address = match wrap {
            MultisigWrap::P2sh => Address::p2sh(&redeem, network)
                .map_err(|e| SignerError::encoding(format!("P2SH multisig: {}", e)))?,
            MultisigWrap::P2wsh => Address::p2wsh(&redeem, network),
            MultisigWrap::P2shP2wsh => Address::p2shwsh(&redeem, network),
        };
        debug!("✅ {}-of-{} {:?} multisig address: {}", self.threshold, self.public_keys.len(), wrap, address);
        Ok(address)
    }

    /// Which wrapping of this policy produces `script_pubkey`, if any.
    pub fn wrap_for_script(&self, script_pubkey: &ScriptBuf, network: Network) -> Option<MultisigWrap> {
        MultisigWrap::ALL.into_iter().find(|wrap| {
            self.address(*wrap, network)
                .map(|a| &a.script_pubkey() == script_pubkey)
                .unwrap_or(false)
        })
    }
}

/// Encode an m-of-n multisig address.
pub fn encode_multisig_address(
    public_keys: &[Vec<u8>],
    threshold: usize,
    wrap: MultisigWrap,
    network: Network,
) -> Result<String> {
    Ok(MultisigPolicy::new(public_keys, threshold)?.address(wrap, network)?.to_string())
}
