//! Ethereum transaction构建和sign (legacy EIP-155 与 EIP-1559)

use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Eip1559TransactionRequest, NameOrAddress, TransactionRequest, U256};
use tracing::{debug, info};

use super::address;
use crate::blockchain::traits::SignedTransaction;
use crate::core::abi::erc20_transfer_calldata;
use crate::core::amount::scale_amount;
use crate::core::config::EthereumConfig;
use crate::core::domain::{ChainId, Curve, KeyMaterial, Signers};
use crate::core::errors::{Result, SignerError};
use crate::core::result_ext::{ErrorClass, ResultExt};
use crate::crypto::keccak256;

/// Default token decimals (ETH and most ERC-20s).
pub const DEFAULT_DECIMALS: u32 = 18;

/// Sentinel some callers use for "no token".
const NO_TOKEN: &str = "0x00";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EthereumTxParams {
    pub nonce: u64,
    /// Optional sender; when set it must match the signing key.
    pub from: Option<String>,
    pub to: String,
    pub gas_limit: u64,
    /// wei; legacy transactions only
    pub gas_price: Option<u128>,
    /// wei; both set selects EIP-1559
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    /// Human amount, scaled by `decimals`.
    pub amount: String,
    pub decimals: Option<u32>,
    /// ERC-20 contract; the transfer becomes a `transfer(to, amount)` call.
    pub token_address: Option<String>,
    /// Hex calldata; overrides the ERC-20 calldata when present.
    pub data: Option<String>,
    /// Overrides the configured chain id.
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct EthereumUnsignedTx {
    pub chain_id: u64,
    pub from: Option<[u8; 20]>,
    pub tx: TypedTransaction,
}

fn parse_address(s: &str) -> Result<Address> {
    address::decode(s)
        .map(|b| Address::from_slice(&b))
        .map_err(|e| SignerError::invalid_input(format!("invalid ethereum address {}: {}", s, e)))
}

pub fn build(params: &EthereumTxParams, config: &EthereumConfig) -> Result<EthereumUnsignedTx> {
    if params.to.is_empty() {
        return Err(SignerError::invalid_input("recipient address is required"));
    }
    if params.amount.is_empty() {
        return Err(SignerError::invalid_input("amount is required"));
    }
    let chain_id = params.chain_id.unwrap_or(config.chain_id);
    let decimals = params.decimals.unwrap_or(DEFAULT_DECIMALS);
    let value = scale_amount(&params.amount, decimals)?;
    let recipient = parse_address(&params.to)?;
    let from = params.from.as_deref().map(address::decode).transpose()
        .map_err(|e| SignerError::invalid_input(format!("invalid from address: {}", e)))?;

    let token = params
        .token_address
        .as_deref()
        .filter(|t| !t.is_empty() && *t != NO_TOKEN);

    let (to, value, mut data) = match token {
        Some(contract) => {
            let calldata = erc20_transfer_calldata(&params.to, value)?;
            debug!("ERC-20 transfer via {}", contract);
            (parse_address(contract)?, U256::zero(), Some(Bytes::from(calldata)))
        }
        None => (recipient, U256::from(value), None),
    };
    if let Some(raw) = params.data.as_deref().filter(|d| !d.is_empty()) {
        let bytes = hex::decode(raw.trim_start_matches("0x"))
            .map_err(|e| SignerError::invalid_input(format!("invalid data hex: {}", e)))?;
        data = Some(Bytes::from(bytes));
    }

    let tx: TypedTransaction = match (params.max_fee_per_gas, params.max_priority_fee_per_gas) {
        (Some(max_fee), Some(priority)) => {
            let mut req = Eip1559TransactionRequest::new()
                .to(NameOrAddress::Address(to))
                .value(value)
                .gas(params.gas_limit)
                .nonce(params.nonce)
                .max_fee_per_gas(U256::from(max_fee))
                .max_priority_fee_per_gas(U256::from(priority))
                .chain_id(chain_id);
            req.data = data;
            req.into()
        }
        _ => {
            let gas_price = params
                .gas_price
                .ok_or_else(|| SignerError::invalid_input("gas_price or both EIP-1559 fee fields are required"))?;
            let mut req = TransactionRequest::new()
                .to(NameOrAddress::Address(to))
                .value(value)
                .gas(params.gas_limit)
                .gas_price(U256::from(gas_price))
                .nonce(params.nonce)
                .chain_id(chain_id);
            req.data = data;
            req.into()
        }
    };
    Ok(EthereumUnsignedTx { chain_id, from, tx })
}

pub fn sign(unsigned: &EthereumUnsignedTx, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
    let signers = Signers::resolve(&keys, Curve::Secp256k1)?;
    let key = signers.primary()?;
    if let Some(from) = unsigned.from {
        let own = address::address_bytes(key.public_key())?;
        if own != from {
            return Err(SignerError::signing(format!(
                "from address {} does not belong to the signing key {}",
                address::checksum(&from),
                address::checksum(&own)
            )));
        }
    }

    let wallet = key
        .with_secret(|sk| LocalWallet::from_bytes(sk))
        .or_signer_err(ErrorClass::Signing, "invalid ethereum key")?
        .with_chain_id(unsigned.chain_id);
    let signature = wallet
        .sign_transaction_sync(&unsigned.tx)
        .or_signer_err(ErrorClass::Signing, "ethereum signing failed")?;
    let raw = unsigned.tx.rlp_signed(&signature);
    if raw.is_empty() {
        return Err(SignerError::signing("serialization produced empty output"));
    }
    let hash = format!("0x{}", hex::encode(keccak256(&raw)));
    info!("✅ ethereum transaction signed, hash={}", hash);
    Ok(SignedTransaction {
        chain: ChainId::Ethereum,
        raw: format!("0x{}", hex::encode(&raw)),
        hash,
    })
}
