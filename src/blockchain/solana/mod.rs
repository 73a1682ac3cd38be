//! Solana 集成: base58 address, legacy message, System / SPL Token / Stake 指令

pub mod address;
pub mod instruction;
pub mod message;
pub mod staking;
pub mod transaction;

pub use address::Pubkey;
pub use transaction::{SolanaOperation, SolanaTxParams, SolanaUnsignedTx};

use crate::blockchain::traits::{
    ChainAdapter, ChainTxParams, DecodedAddress, SignedTransaction, UnsignedTransaction,
};
use crate::core::bip44::DerivationPath;
use crate::core::config::SolanaConfig;
use crate::core::domain::{ChainId, KeyMaterial};
use crate::core::errors::{Result, SignerError};

#[derive(Debug, Clone)]
pub struct SolanaAdapter {
    config: SolanaConfig,
}

impl SolanaAdapter {
    pub fn new(config: SolanaConfig) -> Self {
        Self { config }
    }
}

impl ChainAdapter for SolanaAdapter {
    fn chain(&self) -> ChainId {
        ChainId::Solana
    }

    fn derivation_path(&self, index: u32) -> Result<DerivationPath> {
        DerivationPath::from_template(&self.config.path_template, index)
    }

    fn address_from_public_key(&self, public_key: &[u8]) -> Result<String> {
        address::encode(public_key)
    }

    fn decode_address(&self, address: &str) -> Result<DecodedAddress> {
        Ok(DecodedAddress::Solana(address::decode(address)?))
    }

    fn build_transaction(&self, params: ChainTxParams) -> Result<UnsignedTransaction> {
        match params {
            ChainTxParams::Solana(p) => Ok(UnsignedTransaction::Solana(transaction::build(&p, &self.config)?)),
            other => Err(SignerError::invalid_input(format!(
                "solana adapter got {} parameters",
                other.chain()
            ))),
        }
    }

    fn sign_transaction(&self, tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
        match tx {
            UnsignedTransaction::Solana(t) => transaction::sign(t, keys),
            other => Err(SignerError::invalid_input(format!(
                "solana adapter got a {} transaction",
                other.chain()
            ))),
        }
    }
}
