//! Solana transaction构建和sign
//!
//! 支持普通转账、SPL Token 转账、nonce 账户创建以及质押操作；
//! 设置 `nonce_account` 时使用 durable nonce (首条指令为 nonceAdvance)。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info};

use super::address::{parse_field, Pubkey};
use super::instruction::{self, Instruction, NONCE_ACCOUNT_LENGTH, SYSTEM_PROGRAM};
use super::message::{encode_compact_u16, Message};
use super::staking::{self, Authorized, Lockup};
use crate::blockchain::traits::SignedTransaction;
use crate::core::amount::scale_amount_u64;
use crate::core::config::SolanaConfig;
use crate::core::domain::{ChainId, Curve, KeyMaterial, Signers};
use crate::core::errors::{Result, SignerError};
use crate::crypto::signature_utils::ed25519_sign;

/// What the transaction does. Amounts in SOL or token units are human strings;
/// rent-exempt balances are raw lamports as reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaOperation {
    Transfer {
        to: String,
        amount: String,
    },
    TokenTransfer {
        to: String,
        mint: String,
        amount: String,
        decimals: u32,
        /// Create the recipient's associated token account first.
        create_recipient_account: bool,
    },
    CreateNonceAccount {
        nonce_account: String,
        lamports: u64,
    },
    CreateStakeAccount {
        stake_account: String,
        vote_account: String,
        lamports: u64,
    },
    Delegate {
        stake_account: String,
        vote_account: String,
    },
    Deactivate {
        stake_account: String,
    },
    Withdraw {
        stake_account: String,
        /// Defaults to the fee payer.
        to: Option<String>,
        lamports: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaTxParams {
    /// Fee payer and authority for every operation.
    pub from: String,
    pub operation: SolanaOperation,
    /// Live blockhash, or the nonce value stored in `nonce_account`.
    pub recent_blockhash: String,
    pub nonce_account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaUnsignedTx {
    pub message: Message,
}

impl SolanaUnsignedTx {
    pub fn required_signers(&self) -> &[Pubkey] {
        self.message.signer_keys()
    }
}

fn parse_blockhash(s: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| SignerError::invalid_input(format!("invalid blockhash {}: {}", s, e)))?;
    bytes
        .try_into()
        .map_err(|_| SignerError::invalid_input(format!("blockhash must be 32 bytes: {}", s)))
}

fn operation_instructions(op: &SolanaOperation, from: &Pubkey, config: &SolanaConfig) -> Result<Vec<Instruction>> {
    let ixs = match op {
        SolanaOperation::Transfer { to, amount } => {
            let to = parse_field("to", to)?;
            let lamports = scale_amount_u64(amount, config.decimals)?;
            vec![instruction::transfer(from, &to, lamports)]
        }
        SolanaOperation::TokenTransfer { to, mint, amount, decimals, create_recipient_account } => {
            let to = parse_field("to", to)?;
            let mint = parse_field("mint", mint)?;
            let units = scale_amount_u64(amount, *decimals)?;
            let source = instruction::associated_token_address(from, &mint)?;
            let destination = instruction::associated_token_address(&to, &mint)?;
            debug!("SPL transfer {} -> {} (mint {})", source, destination, mint);
            let mut ixs = Vec::with_capacity(2);
            if *create_recipient_account {
                ixs.push(instruction::create_associated_token_account(from, &destination, &to, &mint));
            }
            ixs.push(instruction::token_transfer(&source, &destination, from, units));
            ixs
        }
        SolanaOperation::CreateNonceAccount { nonce_account, lamports } => {
            let nonce = parse_field("nonce_account", nonce_account)?;
            vec![
                instruction::create_account(from, &nonce, *lamports, NONCE_ACCOUNT_LENGTH, &SYSTEM_PROGRAM),
                instruction::initialize_nonce(&nonce, from),
            ]
        }
        SolanaOperation::CreateStakeAccount { stake_account, vote_account, lamports } => {
            let stake = parse_field("stake_account", stake_account)?;
            let vote = parse_field("vote_account", vote_account)?;
            let authorized = Authorized { staker: *from, withdrawer: *from };
            let lockup = Lockup { unix_timestamp: 0, epoch: 0, custodian: *from };
            let mut ixs = staking::create_account_instructions(from, &stake, &authorized, &lockup, *lamports);
            ixs.push(staking::delegate(&stake, from, &vote));
            ixs
        }
        SolanaOperation::Delegate { stake_account, vote_account } => {
            let stake = parse_field("stake_account", stake_account)?;
            let vote = parse_field("vote_account", vote_account)?;
            vec![staking::delegate(&stake, from, &vote)]
        }
        SolanaOperation::Deactivate { stake_account } => {
            let stake = parse_field("stake_account", stake_account)?;
            vec![staking::deactivate(&stake, from)]
        }
        SolanaOperation::Withdraw { stake_account, to, lamports } => {
            let stake = parse_field("stake_account", stake_account)?;
            let to = match to {
                Some(t) => parse_field("to", t)?,
                None => *from,
            };
            vec![staking::withdraw(&stake, from, &to, *lamports)]
        }
    };
    Ok(ixs)
}

pub fn build(params: &SolanaTxParams, config: &SolanaConfig) -> Result<SolanaUnsignedTx> {
    let from = parse_field("from", &params.from)?;
    let blockhash = parse_blockhash(&params.recent_blockhash)?;

    let mut instructions = Vec::new();
    if let Some(nonce_account) = params.nonce_account.as_deref().filter(|n| !n.is_empty()) {
        let nonce = parse_field("nonce_account", nonce_account)?;
        instructions.push(instruction::advance_nonce(&nonce, &from));
    }
    instructions.extend(operation_instructions(&params.operation, &from, config)?);

    let message = Message::compile(&instructions, &from, blockhash)?;
    debug!(
        "solana message compiled: {} accounts, {} signers",
        message.account_keys.len(),
        message.header.num_required_signatures
    );
    Ok(SolanaUnsignedTx { message })
}

/// Signs with every required signer; each must be present in `keys`.
pub fn sign(unsigned: &SolanaUnsignedTx, keys: KeyMaterial<'_>) -> Result<SignedTransaction> {
    let signers = Signers::resolve(&keys, Curve::Ed25519)?;
    let message = unsigned.message.serialize()?;

    let required = unsigned.required_signers();
    let mut wire = Vec::with_capacity(1 + 64 * required.len() + message.len());
    encode_compact_u16(&mut wire, required.len() as u16);
    let mut first_signature = None;
    for key in required {
        let pair = signers
            .find_by_public_key(&key.0)
            .ok_or_else(|| SignerError::signing(format!("missing signer {}", key)))?;
        let signature = ed25519_sign(&message, &pair.ed25519_signing_key()?);
        first_signature.get_or_insert(signature);
        wire.extend_from_slice(&signature);
    }
    wire.extend_from_slice(&message);

    let first = first_signature.ok_or_else(|| SignerError::signing("message has no required signer"))?;
    let hash = bs58::encode(first).into_string();
    info!("✅ solana transaction signed, signature={}", hash);
    Ok(SignedTransaction { chain: ChainId::Solana, raw: STANDARD.encode(&wire), hash })
}
