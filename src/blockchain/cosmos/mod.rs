//! Cosmos SDK 链集成 (bech32 address, `MsgSend` Amino / Direct sign)

pub mod address;
pub mod amino;
pub mod proto;
pub mod transaction;

pub use transaction::{CosmosTxParams, CosmosUnsignedTx, SignMode};

use crate::blockchain::traits::{
    ChainAdapter, ChainTxParams, DecodedAddress, SignedTransaction, UnsignedTransaction,
};
use crate::core::bip44::DerivationPath;
use crate::core::config::CosmosConfig;
use crate::core::domain::{ChainId, KeyMaterial};
use crate::core::errors::{Result, SignerError};

#[derive(Debug, Clone)]
pub struct CosmosAdapter {
    config: CosmosConfig,
}

impl CosmosAdapter {
    pub fn new(config: CosmosConfig) -> Self {
        Self { config }
    }
}

impl ChainAdapter for CosmosAdapter {
    fn chain(&self) -> ChainId {
        ChainId::Cosmos
    }

    fn derivation_path(&self, index: u32) -> Result<DerivationPath> {
        DerivationPath::from_template(&self.config.path_template, index)
    }

    fn address_from_public_key(&self, public_key: &[u8]) -> Result<String> {
        address::encode(public_key, &self.config.prefix)
    }

    fn decode_address(&self, address: &str) -> Result<DecodedAddress> {
        let hash = address::decode(address, &self.config.prefix)?;
        Ok(DecodedAddress::Cosmos { prefix: self.config.prefix.clone(), hash })
    }

    fn build_transaction(&self, params: ChainTxParams) -> Result<UnsignedTransaction> {
        match params {
            ChainTxParams::Cosmos(p) => Ok(UnsignedTransaction::Cosmos(transaction::build(&p, &self.config)?)),
            other => Err(SignerError::invalid_input(format!(
                "cosmos adapter got {} parameters",
                other.chain()
            ))),
        }
    }

    fn sign_transaction(&self, tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
        match tx {
            UnsignedTransaction::Cosmos(t) => transaction::sign(t, keys),
            other => Err(SignerError::invalid_input(format!(
                "cosmos adapter got a {} transaction",
                other.chain()
            ))),
        }
    }
}
