//! Bitcoin 区块链集成模块
//!
//! - Legacy (P2PKH)、SegWit (P2WPKH)、Nested SegWit (P2SH-P2WPKH)、Taproot (P2TR) address
//! - m-of-n 多签 (P2SH / P2WSH / P2SH-P2WSH)
//! - ECDSA / Schnorr sign

pub mod address;
pub mod multisig;
pub mod transaction;

pub use address::{DecodedBitcoinAddress, ScriptKind};
pub use multisig::{encode_multisig_address, MultisigPolicy, MultisigWrap};
pub use transaction::{BitcoinInput, BitcoinOutput, BitcoinTxParams, BitcoinUnsignedTx, MultisigInput};

use crate::blockchain::traits::{
    ChainAdapter, ChainTxParams, DecodedAddress, SignedTransaction, UnsignedTransaction,
};
use crate::core::bip44::DerivationPath;
use crate::core::config::BitcoinConfig;
use crate::core::domain::{ChainId, KeyMaterial};
use crate::core::errors::{Result, SignerError};

/// Bitcoin adapter bound to one network and address kind.
#[derive(Debug, Clone)]
pub struct BitcoinAdapter {
    config: BitcoinConfig,
}

impl BitcoinAdapter {
    pub fn new(config: BitcoinConfig) -> Result<Self> {
        config.network()?;
        Ok(Self { config })
    }
}

impl ChainAdapter for BitcoinAdapter {
    fn chain(&self) -> ChainId {
        ChainId::Bitcoin
    }

    fn derivation_path(&self, index: u32) -> Result<DerivationPath> {
        DerivationPath::from_template(&self.config.path_template, index)
    }

    fn address_from_public_key(&self, public_key: &[u8]) -> Result<String> {
        address::encode(public_key, self.config.address_kind, self.config.network()?)
    }

    fn decode_address(&self, address: &str) -> Result<DecodedAddress> {
        Ok(DecodedAddress::Bitcoin(address::decode(address, self.config.network()?)?))
    }

    fn build_transaction(&self, params: ChainTxParams) -> Result<UnsignedTransaction> {
        match params {
            ChainTxParams::Bitcoin(p) => Ok(UnsignedTransaction::Bitcoin(transaction::build(&p, &self.config)?)),
            other => Err(SignerError::invalid_input(format!(
                "bitcoin adapter got {} parameters",
                other.chain()
            ))),
        }
    }

    fn sign_transaction(&self, tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
        match tx {
            UnsignedTransaction::Bitcoin(t) => transaction::sign(t, keys),
            other => Err(SignerError::invalid_input(format!(
                "bitcoin adapter got a {} transaction",
                other.chain()
            ))),
        }
    }
}
