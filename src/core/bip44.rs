//! BIP32 / SLIP-0010 HD key derivation
//!
//! Path format: m/purpose'/coin_type'/account'/change/address_index
//!
//! - secp256k1: BIP32, hardened and normal children
//! - ed25519: SLIP-0010, hardened children only
//!
//! Derivation is a pure fold over the path components: identical
//! (seed, path, curve) always produce the identical [`KeyPair`].

use std::fmt;
use std::str::FromStr;

use bitcoin::secp256k1::{PublicKey, Scalar, SecretKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::domain::{Curve, KeyPair};
use crate::core::errors::{Result, SignerError};
use crate::crypto::secp;

type HmacSha512 = Hmac<Sha512>;

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Accepted seed lengths (BIP32: 128 to 512 bits).
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

const BITCOIN_SEED: &[u8] = b"Bitcoin seed";
const ED25519_SEED: &[u8] = b"ed25519 seed";

/// One path component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildIndex {
    Normal(u32),
    Hardened(u32),
}

impl ChildIndex {
    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildIndex::Hardened(_))
    }

    /// Raw 32-bit index as fed to the HMAC (hardened offset applied).
    pub fn to_u32(&self) -> u32 {
        match *self {
            ChildIndex::Normal(i) => i,
            ChildIndex::Hardened(i) => i | HARDENED_OFFSET,
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildIndex::Normal(i) => write!(f, "{}", i),
            ChildIndex::Hardened(i) => write!(f, "{}'", i),
        }
    }
}

/// Parsed derivation path, e.g. `m/44'/60'/0'/0/0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    pub fn new(components: Vec<ChildIndex>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[ChildIndex] {
        &self.0
    }

    /// BIP44 account path `m/44'/coin'/account'/change/index`.
    pub fn bip44(coin_type: u32, account: u32, change: u32, address_index: u32) -> Self {
        Self(vec![
            ChildIndex::Hardened(44),
            ChildIndex::Hardened(coin_type),
            ChildIndex::Hardened(account),
            ChildIndex::Normal(change),
            ChildIndex::Normal(address_index),
        ])
    }

    /// Substitute `{index}` in a template such as `m/44'/501'/0'/{index}'` and parse it.
    pub fn from_template(template: &str, index: u32) -> Result<Self> {
        if !template.contains("{index}") {
            return Err(SignerError::invalid_input(format!(
                "path template `{}` has no {{index}} placeholder",
                template
            )));
        }
        template.replace("{index}", &index.to_string()).parse()
    }
}

impl FromStr for DerivationPath {
    type Err = SignerError;

    fn from_str(path: &str) -> Result<Self> {
        let mut parts = path.trim().split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(SignerError::invalid_input(format!(
                    "derivation path must start with `m`: {}",
                    path
                )))
            }
        }

        let mut components = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'').or_else(|| part.strip_suffix('h')) {
                Some(d) => (d, true),
                None => (part, false),
            };
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(SignerError::invalid_input(format!(
                    "invalid path component `{}` in {}",
                    part, path
                )));
            }
            let index: u32 = digits
                .parse()
                .map_err(|_| SignerError::invalid_input(format!("path index out of range: {}", part)))?;
            if index >= HARDENED_OFFSET {
                return Err(SignerError::invalid_input(format!(
                    "path index must be below 2^31: {}",
                    part
                )));
            }
            components.push(if hardened {
                ChildIndex::Hardened(index)
            } else {
                ChildIndex::Normal(index)
            });
        }
        Ok(Self(components))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for c in &self.0 {
            write!(f, "/{}", c)?;
        }
        Ok(())
    }
}

/// Extended private key: key bytes plus chain code.
struct ExtendedKey {
    key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    fn split(output: &[u8]) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&output[..32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&output[32..64]);
        Self { key, chain_code }
    }
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| SignerError::derivation(format!("HMAC initialization failed: {}", e)))?;
    mac.update(data);
    Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
}

/// BIP32 key derivation engine (secp256k1)
pub struct Bip32 {
    node: ExtendedKey,
}

impl Bip32 {
    /// Create master key from seed: HMAC-SHA512("Bitcoin seed", seed)
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        check_seed(seed)?;
        let out = hmac_sha512(BITCOIN_SEED, seed)?;
        let node = ExtendedKey::split(&out);
        SecretKey::from_slice(node.key.as_ref())
            .map_err(|_| SignerError::derivation("seed produces an invalid master key"))?;
        Ok(Self { node })
    }

    /// Derive one child.
    ///
    /// Hardened: HMAC(c, 0x00 ‖ k ‖ i). Normal: HMAC(c, serP(K) ‖ i).
    /// Child key = IL + k (mod n).
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let parent = SecretKey::from_slice(self.node.key.as_ref())
            .map_err(|e| SignerError::derivation(format!("invalid parent key: {}", e)))?;

        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if index.is_hardened() {
            data.push(0x00);
            data.extend_from_slice(self.node.key.as_ref());
        } else {
            let public = PublicKey::from_secret_key(secp(), &parent);
            data.extend_from_slice(&public.serialize());
        }
        data.extend_from_slice(&index.to_u32().to_be_bytes());

        let out = hmac_sha512(self.node.chain_code.as_ref(), &data)?;
        let mut il = [0u8; 32];
        il.copy_from_slice(&out[..32]);
        let tweak = Scalar::from_be_bytes(il)
            .map_err(|_| SignerError::derivation(format!("IL out of range at index {}", index)))?;
        let child = parent
            .add_tweak(&tweak)
            .map_err(|_| SignerError::derivation(format!("invalid child key at index {}", index)))?;

        let mut node = ExtendedKey::split(&out);
        node.key.copy_from_slice(&child.secret_bytes());
        Ok(Self { node })
    }

    /// 按照路径派生
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut current = Self {
            node: ExtendedKey {
                key: self.node.key.clone(),
                chain_code: self.node.chain_code.clone(),
            },
        };
        for index in path.components() {
            current = current.derive_child(*index)?;
        }
        Ok(current)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.node.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.node.chain_code
    }

    pub fn to_keypair(&self) -> Result<KeyPair> {
        KeyPair::from_secp_bytes(*self.node.key)
    }
}

/// SLIP-0010 ed25519 derivation, hardened children only.
pub struct Slip10 {
    node: ExtendedKey,
}

impl Slip10 {
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        check_seed(seed)?;
        let out = hmac_sha512(ED25519_SEED, seed)?;
        Ok(Self { node: ExtendedKey::split(&out) })
    }

    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        if !index.is_hardened() {
            return Err(SignerError::derivation(format!(
                "ed25519 supports hardened derivation only, got {}",
                index
            )));
        }
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        data.push(0x00);
        data.extend_from_slice(self.node.key.as_ref());
        data.extend_from_slice(&index.to_u32().to_be_bytes());
        let out = hmac_sha512(self.node.chain_code.as_ref(), &data)?;
        Ok(Self { node: ExtendedKey::split(&out) })
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut current = Self {
            node: ExtendedKey {
                key: self.node.key.clone(),
                chain_code: self.node.chain_code.clone(),
            },
        };
        for index in path.components() {
            current = current.derive_child(*index)?;
        }
        Ok(current)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.node.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.node.chain_code
    }

    pub fn to_keypair(&self) -> KeyPair {
        KeyPair::from_ed25519_seed(*self.node.key)
    }
}

fn check_seed(seed: &[u8]) -> Result<()> {
    if seed.len() < MIN_SEED_LEN || seed.len() > MAX_SEED_LEN {
        return Err(SignerError::derivation(format!(
            "seed length must be {}..={} bytes, got {}",
            MIN_SEED_LEN,
            MAX_SEED_LEN,
            seed.len()
        )));
    }
    Ok(())
}

/// Derive the key pair at `path` for `curve`.
pub fn derive_key(seed: &[u8], path: &DerivationPath, curve: Curve) -> Result<KeyPair> {
    debug!(%path, %curve, "deriving key");
    match curve {
        Curve::Secp256k1 => Bip32::from_seed(seed)?.derive_path(path)?.to_keypair(),
        Curve::Ed25519 => Ok(Slip10::from_seed(seed)?.derive_path(path)?.to_keypair()),
    }
}
