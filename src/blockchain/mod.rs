//! 链集成: one directory per ledger family, each exposing a [`traits::ChainAdapter`].

pub mod bitcoin;
pub mod cosmos;
pub mod ethereum;
pub mod solana;
pub mod ton;
pub mod traits;

pub use traits::{
    AddressFormat, ChainAdapter, ChainTxParams, DecodedAddress, DerivedAccount, SignedTransaction,
    UnsignedTransaction,
};
