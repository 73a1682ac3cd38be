// src/lib.rs
//! Multi-chain HD key derivation and offline transaction signing.
//!
//! Bitcoin, Ethereum, Cosmos, Solana and TON share one pipeline:
//! derive a key ([`service::derive_key`]), encode its address
//! ([`service::encode_address`]), build an unsigned transaction
//! ([`service::build_transaction`]) and sign it ([`service::sign_transaction`]).
//! Nothing here touches the network or persists keys.

#![allow(clippy::doc_lazy_continuation)]

pub mod blockchain;
pub mod core;
pub mod crypto;
pub mod service;

// 重新导出常用类型
pub use crate::blockchain::traits::{
    AddressFormat, ChainAdapter, ChainTxParams, DecodedAddress, DerivedAccount, SignedTransaction,
    UnsignedTransaction,
};
pub use crate::core::config::SignerConfig;
pub use crate::core::domain::{ChainId, Curve, KeyMaterial, KeyPair};
pub use crate::core::errors::{Result, SignerError};
pub use crate::service::{
    adapter_for, build_transaction, decode_address, derive_account, derive_key, encode_address,
    encode_multisig_address, sign_transaction, validate_address,
};
