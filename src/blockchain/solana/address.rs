//! Solana account keys: raw ed25519 public keys, base58 encoded.

use std::fmt;
use std::str::FromStr;

use curve25519_dalek::edwards::CompressedEdwardsY;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::{Result, SignerError};
use crate::crypto::sha256;

static ADDRESS_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("Hardcoded regex should always compile")
});

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            SignerError::encoding(format!("solana public key must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    /// Program derived address: first bump from 255 down whose hash is off the curve.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
        for bump in (0..=u8::MAX).rev() {
            let mut buf = Vec::with_capacity(seeds.iter().map(|s| s.len()).sum::<usize>() + 1 + 32 + PDA_MARKER.len());
            for seed in seeds {
                buf.extend_from_slice(seed);
            }
            buf.push(bump);
            buf.extend_from_slice(&program_id.0);
            buf.extend_from_slice(PDA_MARKER);
            let candidate = Pubkey(sha256(&buf));
            if !candidate.is_on_curve() {
                return Ok((candidate, bump));
            }
        }
        Err(SignerError::derivation("no viable program address bump seed"))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl FromStr for Pubkey {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s).map(Pubkey)
    }
}

pub fn encode(public_key: &[u8]) -> Result<String> {
    Ok(Pubkey::from_slice(public_key)?.to_string())
}

pub fn decode(address: &str) -> Result<[u8; 32]> {
    if !ADDRESS_SHAPE.is_match(address) {
        return Err(SignerError::encoding(format!("not a base58 solana address: {}", address)));
    }
    let bytes = bs58::decode(address).into_vec()?;
    Ok(Pubkey::from_slice(&bytes)?.0)
}

pub fn validate(address: &str) -> bool {
    decode(address).is_ok()
}

/// Parse an address field of a transaction request.
pub(crate) fn parse_field(name: &str, value: &str) -> Result<Pubkey> {
    value
        .parse()
        .map_err(|e| SignerError::invalid_input(format!("invalid {} address: {}", name, e)))
}
