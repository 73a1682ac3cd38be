use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::blockchain::{bitcoin, cosmos, ethereum, solana, ton};
use crate::core::bip44::{derive_key, DerivationPath};
use crate::core::config::BitcoinAddressKind;
use crate::core::domain::{ChainId, Curve, KeyMaterial};
use crate::core::errors::Result;

/// Address encoding scheme requested from [`crate::service::encode_address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFormat {
    Bitcoin(BitcoinAddressKind),
    Ethereum,
    Cosmos,
    Solana,
    Ton,
}

impl AddressFormat {
    pub fn chain(&self) -> ChainId {
        match self {
            AddressFormat::Bitcoin(_) => ChainId::Bitcoin,
            AddressFormat::Ethereum => ChainId::Ethereum,
            AddressFormat::Cosmos => ChainId::Cosmos,
            AddressFormat::Solana => ChainId::Solana,
            AddressFormat::Ton => ChainId::Ton,
        }
    }
}

/// Result of decoding an address string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAddress {
    Bitcoin(bitcoin::address::DecodedBitcoinAddress),
    Ethereum([u8; 20]),
    Cosmos { prefix: String, hash: [u8; 20] },
    Solana([u8; 32]),
    Ton(ton::address::TonAddress),
}

/// Per-chain transaction parameters.
#[derive(Debug, Clone)]
pub enum ChainTxParams {
    Bitcoin(bitcoin::transaction::BitcoinTxParams),
    Ethereum(ethereum::transaction::EthereumTxParams),
    Cosmos(cosmos::transaction::CosmosTxParams),
    Solana(solana::transaction::SolanaTxParams),
    Ton(ton::transaction::TonTxParams),
}

impl ChainTxParams {
    pub fn chain(&self) -> ChainId {
        match self {
            ChainTxParams::Bitcoin(_) => ChainId::Bitcoin,
            ChainTxParams::Ethereum(_) => ChainId::Ethereum,
            ChainTxParams::Cosmos(_) => ChainId::Cosmos,
            ChainTxParams::Solana(_) => ChainId::Solana,
            ChainTxParams::Ton(_) => ChainId::Ton,
        }
    }
}

/// Validated, fully-resolved transaction awaiting signatures.
#[derive(Debug, Clone)]
pub enum UnsignedTransaction {
    Bitcoin(bitcoin::transaction::BitcoinUnsignedTx),
    Ethereum(ethereum::transaction::EthereumUnsignedTx),
    Cosmos(cosmos::transaction::CosmosUnsignedTx),
    Solana(solana::transaction::SolanaUnsignedTx),
    Ton(ton::transaction::TonUnsignedTx),
}

impl UnsignedTransaction {
    pub fn chain(&self) -> ChainId {
        match self {
            UnsignedTransaction::Bitcoin(_) => ChainId::Bitcoin,
            UnsignedTransaction::Ethereum(_) => ChainId::Ethereum,
            UnsignedTransaction::Cosmos(_) => ChainId::Cosmos,
            UnsignedTransaction::Solana(_) => ChainId::Solana,
            UnsignedTransaction::Ton(_) => ChainId::Ton,
        }
    }
}

/// Broadcast-ready artifact.
///
/// `raw` is the chain's broadcast encoding (hex, base64 or a JSON body) and `hash`
/// the identifier the chain reports for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    pub chain: ChainId,
    pub raw: String,
    pub hash: String,
}

/// Key + address derived for one account index.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedAccount {
    pub path: String,
    pub private_key_hex: Zeroizing<String>,
    pub public_key_hex: String,
    pub address: String,
}

impl fmt::Debug for DerivedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedAccount")
            .field("path", &self.path)
            .field("public_key_hex", &self.public_key_hex)
            .field("address", &self.address)
            .field("private_key_hex", &"[REDACTED]")
            .finish()
    }
}

/// Per-chain orchestration: derivation path, address format, transaction model and
/// signing scheme bound together.
pub trait ChainAdapter: Send + Sync {
    fn chain(&self) -> ChainId;

    fn curve(&self) -> Curve {
        self.chain().curve()
    }

    /// Account path for `index` under the configured template.
    fn derivation_path(&self, index: u32) -> Result<DerivationPath>;

    /// Address in the adapter's configured format.
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<String>;

    fn decode_address(&self, address: &str) -> Result<DecodedAddress>;

    fn validate_address(&self, address: &str) -> bool {
        self.decode_address(address).is_ok()
    }

    fn build_transaction(&self, params: ChainTxParams) -> Result<UnsignedTransaction>;

    fn sign_transaction(&self, tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction>;

    /// Derive the key at `derivation_path(index)` and its address.
    fn derive_address(&self, seed: &[u8], index: u32) -> Result<DerivedAccount> {
        let path = self.derivation_path(index)?;
        let key = derive_key(seed, &path, self.curve())?;
        let address = self.address_from_public_key(key.public_key())?;
        tracing::debug!(chain = %self.chain(), %path, %address, "derived account");
        Ok(DerivedAccount {
            path: path.to_string(),
            private_key_hex: key.private_key_hex(),
            public_key_hex: key.public_key_hex(),
            address,
        })
    }
}
