//! TON 集成: cells / BOC, wallet v3R2 + v4R2 contracts, user-friendly address

pub mod address;
pub mod boc;
pub mod cell;
pub mod crc;
pub mod transaction;
pub mod wallet;

pub use address::TonAddress;
pub use transaction::{TonTxParams, TonUnsignedTx};
pub use wallet::WalletContract;

use crate::blockchain::traits::{
    ChainAdapter, ChainTxParams, DecodedAddress, SignedTransaction, UnsignedTransaction,
};
use crate::core::bip44::DerivationPath;
use crate::core::config::TonConfig;
use crate::core::domain::{ChainId, KeyMaterial};
use crate::core::errors::{Result, SignerError};

#[derive(Debug, Clone)]
pub struct TonAdapter {
    config: TonConfig,
}

impl TonAdapter {
    pub fn new(config: TonConfig) -> Self {
        Self { config }
    }
}

impl ChainAdapter for TonAdapter {
    fn chain(&self) -> ChainId {
        ChainId::Ton
    }

    fn derivation_path(&self, index: u32) -> Result<DerivationPath> {
        DerivationPath::from_template(&self.config.path_template, index)
    }

    /// Wallet address for the configured contract version and workchain.
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<String> {
        let wallet = WalletContract::new(self.config.wallet_version, self.config.workchain, public_key)?;
        Ok(wallet
            .address()?
            .to_friendly(self.config.bounceable, self.config.testnet, self.config.url_safe))
    }

    fn decode_address(&self, address: &str) -> Result<DecodedAddress> {
        Ok(DecodedAddress::Ton(address::decode(address)?))
    }

    fn build_transaction(&self, params: ChainTxParams) -> Result<UnsignedTransaction> {
        match params {
            ChainTxParams::Ton(p) => Ok(UnsignedTransaction::Ton(transaction::build(&p, &self.config)?)),
            other => Err(SignerError::invalid_input(format!(
                "ton adapter got {} parameters",
                other.chain()
            ))),
        }
    }

    fn sign_transaction(&self, tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
        match tx {
            UnsignedTransaction::Ton(t) => transaction::sign(t, keys),
            other => Err(SignerError::invalid_input(format!(
                "ton adapter got a {} transaction",
                other.chain()
            ))),
        }
    }
}
