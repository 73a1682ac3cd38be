//! Service layer: the public derive / encode / build / sign entry points
//!
//! 每个入口按 [`ChainId`] 分发到对应链的 adapter; 所有函数都是纯函数, 不持有密钥。

use tracing::{debug, info};

use crate::blockchain::bitcoin::{self, BitcoinAdapter, MultisigWrap};
use crate::blockchain::cosmos::{self, CosmosAdapter};
use crate::blockchain::ethereum::{self, EthereumAdapter};
use crate::blockchain::solana::{self, SolanaAdapter};
use crate::blockchain::ton::TonAdapter;
use crate::blockchain::traits::{
    AddressFormat, ChainAdapter, ChainTxParams, DecodedAddress, DerivedAccount, SignedTransaction,
    UnsignedTransaction,
};
use crate::core::bip44::{self, DerivationPath};
use crate::core::config::SignerConfig;
use crate::core::domain::{ChainId, Curve, KeyMaterial, KeyPair};
use crate::core::errors::{Result, SignerError};

/// Adapter for `chain` bound to its section of `config`.
pub fn adapter_for(chain: ChainId, config: &SignerConfig) -> Result<Box<dyn ChainAdapter>> {
    let adapter: Box<dyn ChainAdapter> = match chain {
        ChainId::Bitcoin => Box::new(BitcoinAdapter::new(config.bitcoin.clone())?),
        ChainId::Ethereum => Box::new(EthereumAdapter::new(config.ethereum.clone())),
        ChainId::Cosmos => Box::new(CosmosAdapter::new(config.cosmos.clone())),
        ChainId::Solana => Box::new(SolanaAdapter::new(config.solana.clone())),
        ChainId::Ton => Box::new(TonAdapter::new(config.ton.clone())),
    };
    Ok(adapter)
}

/// Derive the key pair at `path` (e.g. `m/44'/60'/0'/0/0`) on `curve`.
pub fn derive_key(seed: &[u8], path: &str, curve: Curve) -> Result<KeyPair> {
    let path: DerivationPath = path.parse()?;
    bip44::derive_key(seed, &path, curve)
}

/// Key and address at the chain's configured path for `index`.
pub fn derive_account(seed: &[u8], chain: ChainId, index: u32, config: &SignerConfig) -> Result<DerivedAccount> {
    let account = adapter_for(chain, config)?.derive_address(seed, index)?;
    info!("✅ {} account derived at {}: {}", chain, account.path, account.address);
    Ok(account)
}

/// Encode `public_key` in `format`. Network and prefix come from `config`; a
/// Bitcoin format carries its own script kind.
pub fn encode_address(public_key: &[u8], format: AddressFormat, config: &SignerConfig) -> Result<String> {
    let address = match format {
        AddressFormat::Bitcoin(kind) => bitcoin::address::encode(public_key, kind, config.bitcoin.network()?)?,
        AddressFormat::Ethereum => ethereum::address::encode(public_key)?,
        AddressFormat::Cosmos => cosmos::address::encode(public_key, &config.cosmos.prefix)?,
        AddressFormat::Solana => solana::address::encode(public_key)?,
        AddressFormat::Ton => adapter_for(ChainId::Ton, config)?.address_from_public_key(public_key)?,
    };
    debug!(chain = %format.chain(), %address, "address encoded");
    Ok(address)
}

/// m-of-n Bitcoin multisig address on the configured network; key order is kept.
pub fn encode_multisig_address(
    public_keys: &[Vec<u8>],
    threshold: usize,
    wrap: MultisigWrap,
    config: &SignerConfig,
) -> Result<String> {
    bitcoin::encode_multisig_address(public_keys, threshold, wrap, config.bitcoin.network()?)
}

pub fn decode_address(address: &str, chain: ChainId, config: &SignerConfig) -> Result<DecodedAddress> {
    adapter_for(chain, config)?.decode_address(address)
}

pub fn validate_address(address: &str, chain: ChainId, config: &SignerConfig) -> bool {
    adapter_for(chain, config)
        .map(|adapter| adapter.validate_address(address))
        .unwrap_or(false)
}

/// Validate `params` and resolve them into an unsigned transaction for `chain`.
pub fn build_transaction(chain: ChainId, params: ChainTxParams, config: &SignerConfig) -> Result<UnsignedTransaction> {
    if params.chain() != chain {
        return Err(SignerError::invalid_input(format!(
            "{} parameters supplied for chain {}",
            params.chain(),
            chain
        )));
    }
    let tx = adapter_for(chain, config)?.build_transaction(params)?;
    debug!(%chain, "unsigned transaction built");
    Ok(tx)
}

/// Sign `tx`. Each call yields a new [`SignedTransaction`]; `tx` is never modified.
pub fn sign_transaction(tx: &UnsignedTransaction, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
    let signed = match tx {
        UnsignedTransaction::Bitcoin(t) => bitcoin::transaction::sign(t, keys)?,
        UnsignedTransaction::Ethereum(t) => ethereum::transaction::sign(t, keys)?,
        UnsignedTransaction::Cosmos(t) => cosmos::transaction::sign(t, keys)?,
        UnsignedTransaction::Solana(t) => solana::transaction::sign(t, keys)?,
        UnsignedTransaction::Ton(t) => crate::blockchain::ton::transaction::sign(t, keys)?,
    };
    if signed.raw.is_empty() {
        return Err(SignerError::signing("serialization produced empty output"));
    }
    Ok(signed)
}
