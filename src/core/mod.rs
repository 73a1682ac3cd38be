pub mod abi;
pub mod amount;
pub mod bip44;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod result_ext; // Result扩展工具

// 重新导出关键结构
pub use bip44::{derive_key, ChildIndex, DerivationPath};
pub use config::SignerConfig;
pub use domain::{ChainId, Curve, KeyMaterial, KeyPair};
pub use errors::{Result, SignerError};
