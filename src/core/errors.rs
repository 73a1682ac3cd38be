//! Signer error taxonomy
//!
//! Every public operation returns [`SignerError`]. The variants map one-to-one onto
//! the failure classes callers have to distinguish: bad input, derivation problems,
//! encoding/checksum problems and signing problems.

use thiserror::Error;

/// Error type for derivation, encoding, transaction building and signing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// Malformed hex, bad network/method/chain selector, missing field,
    /// non-integer scaled amount.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Seed/path/curve incompatibility or failed private key recovery.
    #[error("Derivation error: {0}")]
    Derivation(String),

    /// Wrong key length for a format or checksum mismatch on decode.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Signature scheme mismatch, missing signer, empty serialization.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SignerError>;

impl SignerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::Derivation(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Short stable name of the variant, handy for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Derivation(_) => "derivation",
            Self::Encoding(_) => "encoding",
            Self::Signing(_) => "signing",
            Self::Config(_) => "config",
        }
    }
}

impl From<hex::FromHexError> for SignerError {
    fn from(e: hex::FromHexError) -> Self {
        Self::Encoding(format!("invalid hex: {}", e))
    }
}

impl From<bs58::decode::Error> for SignerError {
    fn from(e: bs58::decode::Error) -> Self {
        Self::Encoding(format!("invalid base58: {}", e))
    }
}

impl From<base64::DecodeError> for SignerError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Encoding(format!("invalid base64: {}", e))
    }
}

impl From<toml::de::Error> for SignerError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for SignerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Signing(format!("JSON serialization failed: {}", e))
    }
}
