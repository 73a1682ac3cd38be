//! Core domain types: curves, chains, key pairs and signing key material.

use std::fmt;
use std::str::FromStr;

use bitcoin::secp256k1::{PublicKey as SecpPublicKey, SecretKey};
use ed25519_dalek::SigningKey;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::core::errors::{Result, SignerError};
use crate::crypto::secp;

/// Elliptic curve a key lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    Secp256k1,
    Ed25519,
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Secp256k1 => write!(f, "secp256k1"),
            Curve::Ed25519 => write!(f, "ed25519"),
        }
    }
}

/// Supported ledger families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Bitcoin,
    Ethereum,
    Cosmos,
    Solana,
    Ton,
}

impl ChainId {
    pub const ALL: [ChainId; 5] = [
        ChainId::Bitcoin,
        ChainId::Ethereum,
        ChainId::Cosmos,
        ChainId::Solana,
        ChainId::Ton,
    ];

    /// Curve used by the chain's account keys.
    pub fn curve(&self) -> Curve {
        match self {
            ChainId::Bitcoin | ChainId::Ethereum | ChainId::Cosmos => Curve::Secp256k1,
            ChainId::Solana | ChainId::Ton => Curve::Ed25519,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Bitcoin => "bitcoin",
            ChainId::Ethereum => "ethereum",
            ChainId::Cosmos => "cosmos",
            ChainId::Solana => "solana",
            ChainId::Ton => "ton",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(ChainId::Bitcoin),
            "ethereum" | "eth" => Ok(ChainId::Ethereum),
            "cosmos" | "atom" => Ok(ChainId::Cosmos),
            "solana" | "sol" => Ok(ChainId::Solana),
            "ton" => Ok(ChainId::Ton),
            other => Err(SignerError::invalid_input(format!("unknown chain: {}", other))),
        }
    }
}

/// Derived or imported key pair.
///
/// The private half stays inside a [`Secret`] and is wiped on drop. The public
/// half is always computed from the private key, never supplied separately:
/// 33-byte compressed SEC1 for secp256k1, 32 bytes for ed25519.
pub struct KeyPair {
    private_key: Secret<[u8; 32]>,
    public_key: Vec<u8>,
    curve: Curve,
}

impl KeyPair {
    /// Build a key pair from raw private key bytes.
    ///
    /// secp256k1 takes a 32-byte scalar. ed25519 takes a 32-byte seed or a 64-byte
    /// `seed ‖ public_key` keypair (Solana/TON export format), in which case the
    /// public half must match the seed.
    pub fn from_private_key(bytes: &[u8], curve: Curve) -> Result<Self> {
        match curve {
            Curve::Secp256k1 => {
                if bytes.len() != 32 {
                    return Err(SignerError::invalid_input(format!(
                        "secp256k1 private key must be 32 bytes, got {}",
                        bytes.len()
                    )));
                }
                let mut raw = [0u8; 32];
                raw.copy_from_slice(bytes);
                Self::from_secp_bytes(raw)
            }
            Curve::Ed25519 => {
                let seed: [u8; 32] = match bytes.len() {
                    32 | 64 => {
                        let mut raw = [0u8; 32];
                        raw.copy_from_slice(&bytes[..32]);
                        raw
                    }
                    n => {
                        return Err(SignerError::invalid_input(format!(
                            "ed25519 private key must be 32 or 64 bytes, got {}",
                            n
                        )))
                    }
                };
                let pair = Self::from_ed25519_seed(seed);
                if bytes.len() == 64 && pair.public_key.as_slice() != &bytes[32..] {
                    return Err(SignerError::derivation(
                        "ed25519 keypair public half does not match its seed",
                    ));
                }
                Ok(pair)
            }
        }
    }

    /// Parse a hex private key, with or without `0x`.
    pub fn from_private_key_hex(hex_key: &str, curve: Curve) -> Result<Self> {
        let stripped = hex_key.trim().trim_start_matches("0x");
        let bytes = Zeroizing::new(
            hex::decode(stripped).map_err(|e| SignerError::invalid_input(format!("private key hex: {}", e)))?,
        );
        Self::from_private_key(&bytes, curve)
    }

    pub(crate) fn from_secp_bytes(raw: [u8; 32]) -> Result<Self> {
        let sk = SecretKey::from_slice(&raw)
            .map_err(|e| SignerError::derivation(format!("invalid secp256k1 scalar: {}", e)))?;
        let public = SecpPublicKey::from_secret_key(secp(), &sk);
        Ok(Self {
            private_key: Secret::new(raw),
            public_key: public.serialize().to_vec(),
            curve: Curve::Secp256k1,
        })
    }

    pub(crate) fn from_ed25519_seed(seed: [u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(&seed);
        Self {
            public_key: signing.verifying_key().to_bytes().to_vec(),
            private_key: Secret::new(seed),
            curve: Curve::Ed25519,
        }
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    /// Scoped access to the private key bytes.
    pub fn with_secret<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8; 32]) -> R,
    {
        f(self.private_key.expose_secret())
    }

    /// Lowercase hex of the private key, wiped when dropped.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.private_key.expose_secret()))
    }

    /// 64-byte `seed ‖ public_key` form used by Solana and TON tooling.
    pub fn to_keypair_bytes(&self) -> Result<Zeroizing<[u8; 64]>> {
        if self.curve != Curve::Ed25519 {
            return Err(SignerError::invalid_input("keypair bytes are only defined for ed25519"));
        }
        let mut out = Zeroizing::new([0u8; 64]);
        out[..32].copy_from_slice(self.private_key.expose_secret());
        out[32..].copy_from_slice(&self.public_key);
        Ok(out)
    }

    pub(crate) fn secp_secret_key(&self) -> Result<SecretKey> {
        if self.curve != Curve::Secp256k1 {
            return Err(SignerError::signing(format!(
                "expected a secp256k1 key, got {}",
                self.curve
            )));
        }
        SecretKey::from_slice(self.private_key.expose_secret())
            .map_err(|e| SignerError::signing(format!("invalid secp256k1 key: {}", e)))
    }

    pub(crate) fn secp_public_key(&self) -> Result<SecpPublicKey> {
        if self.curve != Curve::Secp256k1 {
            return Err(SignerError::signing(format!(
                "expected a secp256k1 key, got {}",
                self.curve
            )));
        }
        SecpPublicKey::from_slice(&self.public_key)
            .map_err(|e| SignerError::signing(format!("invalid secp256k1 public key: {}", e)))
    }

    pub(crate) fn ed25519_signing_key(&self) -> Result<SigningKey> {
        if self.curve != Curve::Ed25519 {
            return Err(SignerError::signing(format!(
                "expected an ed25519 key, got {}",
                self.curve
            )));
        }
        Ok(SigningKey::from_bytes(self.private_key.expose_secret()))
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve
            && self.public_key == other.public_key
            && self.private_key.expose_secret() == other.private_key.expose_secret()
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("curve", &self.curve)
            .field("public_key", &hex::encode(&self.public_key))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Key material handed to `sign_transaction`.
#[derive(Debug, Clone, Copy)]
pub enum KeyMaterial<'a> {
    /// A single derived/imported key.
    KeyPair(&'a KeyPair),
    /// Raw private key bytes for the chain's curve.
    PrivateKey(&'a [u8]),
    /// Several keys: multisig co-signers, Solana nonce/stake accounts.
    KeyPairs(&'a [KeyPair]),
}

/// Key material resolved against a curve.
pub(crate) struct Signers<'a> {
    owned: Option<KeyPair>,
    borrowed: Vec<&'a KeyPair>,
}

impl<'a> Signers<'a> {
    pub(crate) fn resolve(material: &KeyMaterial<'a>, curve: Curve) -> Result<Self> {
        let signers = match *material {
            KeyMaterial::KeyPair(kp) => Self { owned: None, borrowed: vec![kp] },
            KeyMaterial::PrivateKey(bytes) => Self {
                owned: Some(KeyPair::from_private_key(bytes, curve)?),
                borrowed: Vec::new(),
            },
            KeyMaterial::KeyPairs(list) => Self { owned: None, borrowed: list.iter().collect() },
        };
        if signers.is_empty() {
            return Err(SignerError::invalid_input("no private key supplied"));
        }
        if let Some(bad) = signers.all().into_iter().find(|kp| kp.curve() != curve) {
            return Err(SignerError::signing(format!(
                "signature scheme mismatch: chain needs {}, key is {}",
                curve,
                bad.curve()
            )));
        }
        Ok(signers)
    }

    pub(crate) fn all(&self) -> Vec<&KeyPair> {
        self.owned.iter().chain(self.borrowed.iter().copied()).collect()
    }

    pub(crate) fn primary(&self) -> Result<&KeyPair> {
        self.owned
            .as_ref()
            .or_else(|| self.borrowed.first().copied())
            .ok_or_else(|| SignerError::invalid_input("no private key supplied"))
    }

    pub(crate) fn find_by_public_key(&self, public_key: &[u8]) -> Option<&KeyPair> {
        self.all().into_iter().find(|kp| kp.public_key() == public_key)
    }

    fn is_empty(&self) -> bool {
        self.owned.is_none() && self.borrowed.is_empty()
    }
}
