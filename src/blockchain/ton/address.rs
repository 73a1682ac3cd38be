//! TON address: raw `wc:hex` and 48-character user-friendly forms.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

use super::crc::crc16;
use crate::core::errors::{Result, SignerError};

const BOUNCEABLE_TAG: u8 = 0x11;
const NON_BOUNCEABLE_TAG: u8 = 0x51;
const TEST_FLAG: u8 = 0x80;

/// Parsed TON address. The flags record how a user-friendly string was encoded;
/// raw addresses parse as non-bounceable mainnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TonAddress {
    pub workchain: i8,
    pub hash: [u8; 32],
    pub bounceable: bool,
    pub testnet: bool,
}

impl TonAddress {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash, bounceable: false, testnet: false }
    }

    /// Same account, ignoring encoding flags.
    pub fn same_account(&self, other: &TonAddress) -> bool {
        self.workchain == other.workchain && self.hash == other.hash
    }

    pub fn to_friendly(&self, bounceable: bool, testnet: bool, url_safe: bool) -> String {
        let mut raw = Vec::with_capacity(36);
        let mut tag = if bounceable { BOUNCEABLE_TAG } else { NON_BOUNCEABLE_TAG };
        if testnet {
            tag |= TEST_FLAG;
        }
        raw.push(tag);
        raw.push(self.workchain as u8);
        raw.extend_from_slice(&self.hash);
        raw.extend_from_slice(&crc16(&raw).to_be_bytes());
        if url_safe {
            URL_SAFE.encode(raw)
        } else {
            STANDARD.encode(raw)
        }
    }

    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    fn parse_raw(s: &str) -> Result<Self> {
        let (wc, hash_hex) = s
            .split_once(':')
            .ok_or_else(|| SignerError::encoding(format!("invalid raw TON address: {}", s)))?;
        let workchain: i8 = wc
            .parse()
            .map_err(|_| SignerError::encoding(format!("invalid workchain in {}", s)))?;
        if hash_hex.len() != 64 {
            return Err(SignerError::encoding(format!("raw TON address hash must be 32 bytes: {}", s)));
        }
        let mut hash = [0u8; 32];
        hex::decode_to_slice(hash_hex, &mut hash)?;
        check_workchain(workchain)?;
        Ok(Self::new(workchain, hash))
    }

    fn parse_friendly(s: &str) -> Result<Self> {
        if s.len() != 48 {
            return Err(SignerError::encoding(format!("user-friendly TON address must be 48 characters: {}", s)));
        }
        let normalized = s.replace('-', "+").replace('_', "/");
        let raw = STANDARD.decode(normalized)?;
        if raw.len() != 36 {
            return Err(SignerError::encoding("user-friendly TON address must decode to 36 bytes"));
        }
        let crc = u16::from_be_bytes([raw[34], raw[35]]);
        if crc16(&raw[..34]) != crc {
            return Err(SignerError::encoding(format!("TON address checksum mismatch: {}", s)));
        }
        let testnet = raw[0] & TEST_FLAG != 0;
        let bounceable = match raw[0] & !TEST_FLAG {
            BOUNCEABLE_TAG => true,
            NON_BOUNCEABLE_TAG => false,
            other => {
                return Err(SignerError::encoding(format!("unknown TON address tag 0x{:02x}", other)));
            }
        };
        let workchain = raw[1] as i8;
        check_workchain(workchain)?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&raw[2..34]);
        Ok(Self { workchain, hash, bounceable, testnet })
    }
}

fn check_workchain(workchain: i8) -> Result<()> {
    if workchain == 0 || workchain == -1 {
        Ok(())
    } else {
        Err(SignerError::encoding(format!("unsupported TON workchain {}", workchain)))
    }
}

impl FromStr for TonAddress {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.contains(':') {
            Self::parse_raw(s)
        } else {
            Self::parse_friendly(s)
        }
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly(self.bounceable, self.testnet, true))
    }
}

pub fn decode(address: &str) -> Result<TonAddress> {
    address.parse()
}

pub fn validate(address: &str) -> bool {
    decode(address).is_ok()
}
