//! Ethereum-like account chains.

pub mod address;
pub mod transaction;

pub use transaction::{EthereumTxParams, EthereumUnsignedTx};

use crate::blockchain::traits::{
    ChainAdapter, ChainTxParams, DecodedAddress, SignedTransaction, UnsignedTransaction,
};
use crate::core::bip44::DerivationPath;
use crate::core::config::EthereumConfig;
use crate::core::domain::{ChainId, KeyMaterial};
use crate::core::errors::{Result, SignerError};

#[derive(Debug, Clone)]
pub struct EthereumAdapter {
    config: EthereumConfig,
}

impl EthereumAdapter {
    pub fn new(config: EthereumConfig) -> Self {
        Self { config }
    }
}

impl ChainAdapter for EthereumAdapter {
    fn chain(&self) -> ChainId {
        ChainId::Ethereum
    }

    fn derivation_path(&self, index: u32) -> Result<DerivationPath> {
        DerivationPath::from_template(&self.config.path_template, index)
    }

    fn address_from_public_key(&self, public_key: &[u8]) -> Result<String> {
        address::encode(public_key)
    }

    fn decode_address(&self, address: &str) -> Result<DecodedAddress> {
        Ok(DecodedAddress::Ethereum(address::decode(address)?))
    }

    fn build_transaction(&self, params: ChainTxParams) -> Result<UnsignedTransaction> {
        match params {
            ChainTxParams::Ethereum(p) => Ok(UnsignedTransaction::Ethereum(transaction::build(&p, &self.config)?)),
            other => Err(SignerError::invalid_input(format!(
                "ethereum adapter got {} parameters",
                other.chain()
            ))),
        }
    }

    fn sign_transaction(&self, tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
        match tx {
            UnsignedTransaction::Ethereum(t) => transaction::sign(t, keys),
            other => Err(SignerError::invalid_input(format!(
                "ethereum adapter got a {} transaction",
                other.chain()
            ))),
        }
    }
}
